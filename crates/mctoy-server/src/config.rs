//! RON configuration parsing for the locations server

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;

/// Port used when neither the config nor `PORT` names one
pub const DEFAULT_PORT: u16 = 5000;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Listen addresses (e.g., "0.0.0.0:5000")
    #[serde(default = "default_listen")]
    pub listen: Vec<String>,
    /// Database file; in-memory when absent
    #[serde(default)]
    pub database: Option<String>,
    /// Toy catalog file (`.json` or `.ron`)
    #[serde(default = "default_catalog")]
    pub catalog: String,
    /// Document root for a built front end, served on non-API paths
    #[serde(default)]
    pub static_root: Option<String>,
    /// Index files tried for directory requests under `static_root`
    #[serde(default = "default_index")]
    pub index: Vec<String>,
    /// Headers added to every response
    #[serde(default = "default_headers")]
    pub add_headers: HashMap<String, String>,
    /// Default log filter when `RUST_LOG` is unset
    #[serde(default = "default_log")]
    pub log: String,
}

fn default_listen() -> Vec<String> {
    vec![format!("0.0.0.0:{}", DEFAULT_PORT)]
}

fn default_catalog() -> String {
    "data/toys.json".to_string()
}

fn default_index() -> Vec<String> {
    vec!["index.html".to_string(), "index.htm".to_string()]
}

fn default_headers() -> HashMap<String, String> {
    HashMap::from([("Access-Control-Allow-Origin".to_string(), "*".to_string())])
}

fn default_log() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: default_listen(),
            database: None,
            catalog: default_catalog(),
            static_root: None,
            index: default_index(),
            add_headers: default_headers(),
            log: default_log(),
        }
    }
}

impl Config {
    /// Load configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    /// Parse and validate RON text
    pub fn from_ron_str(content: &str) -> Result<Self, ConfigError> {
        let config: Config =
            ron::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the port of every listen address.
    ///
    /// `None` leaves the config untouched; an unparseable value is an error.
    pub fn override_port(&mut self, port: Option<&str>) -> Result<(), ConfigError> {
        let Some(port) = port else {
            return Ok(());
        };
        let port: u16 = port
            .trim()
            .parse()
            .map_err(|_| ConfigError::Validation(format!("invalid PORT: {:?}", port)))?;
        for addr in self.listen.iter_mut() {
            let mut parsed = parse_addr(addr)?;
            parsed.set_port(port);
            *addr = parsed.to_string();
        }
        Ok(())
    }

    /// Parsed listen addresses
    pub fn listen_addrs(&self) -> Result<Vec<SocketAddr>, ConfigError> {
        self.listen.iter().map(|addr| parse_addr(addr)).collect()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.listen.is_empty() {
            return Err(ConfigError::Validation(
                "at least one listen address is required".to_string(),
            ));
        }
        self.listen_addrs()?;
        if self.catalog.trim().is_empty() {
            return Err(ConfigError::Validation("catalog path is empty".to_string()));
        }
        Ok(())
    }
}

fn parse_addr(addr: &str) -> Result<SocketAddr, ConfigError> {
    addr.parse()
        .map_err(|_| ConfigError::Validation(format!("invalid listen address: {}", addr)))
}

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_ron_str("()").unwrap();
        assert_eq!(config.listen, vec!["0.0.0.0:5000"]);
        assert_eq!(config.database, None);
        assert_eq!(config.catalog, "data/toys.json");
        assert_eq!(
            config.add_headers.get("Access-Control-Allow-Origin"),
            Some(&"*".to_string())
        );
        assert_eq!(config.log, "info");
    }

    #[test]
    fn test_full_config() {
        let config = Config::from_ron_str(
            r#"(
                listen: ["127.0.0.1:8080", "[::1]:8080"],
                database: Some("data/places.db"),
                catalog: "data/toys.ron",
                static_root: Some("./www"),
                index: ["index.html"],
                add_headers: {"X-Served-By": "mctoy"},
                log: "debug",
            )"#,
        )
        .unwrap();

        assert_eq!(config.listen_addrs().unwrap().len(), 2);
        assert_eq!(config.database.as_deref(), Some("data/places.db"));
        assert_eq!(config.static_root.as_deref(), Some("./www"));
        assert_eq!(config.add_headers.len(), 1);
        assert!(!config.add_headers.contains_key("Access-Control-Allow-Origin"));
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            Config::from_ron_str("(listen: [])"),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            Config::from_ron_str(r#"(listen: ["not an address"])"#),
            Err(ConfigError::Validation(_))
        ));
        assert!(matches!(
            Config::from_ron_str("(listen: "),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Config::load("/nonexistent/server.ron"),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_override_port() {
        let mut config = Config::from_ron_str(r#"(listen: ["127.0.0.1:8080"])"#).unwrap();

        config.override_port(None).unwrap();
        assert_eq!(config.listen, vec!["127.0.0.1:8080"]);

        config.override_port(Some("3001")).unwrap();
        assert_eq!(config.listen, vec!["127.0.0.1:3001"]);

        assert!(config.override_port(Some("http")).is_err());
    }
}
