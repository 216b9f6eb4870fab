//! McToy Server - REST surface over the place directory
//!
//! Routes:
//! - `GET /locations[?toy=NAME]`: every stored place, optionally filtered
//! - `POST /locations`: upsert a batch of places (display fields only)
//! - `PUT /locations/:placeId/toys`: replace the toys of one place
//! - `GET /toys`: the toy catalog
//! - `GET /health`
//!
//! Anything else is served from `static_root` when one is configured.

pub mod api;
pub mod config;
pub mod router;
pub mod server;
pub mod static_files;

pub use api::{dispatch, ApiResponse};
pub use config::{Config, ConfigError, DEFAULT_PORT};
pub use router::{Route, RouteError, Router};
pub use server::{handle_request, serve};

use hyper::header::{HeaderName, HeaderValue};
use mctoy_core::Catalog;
use mctoy_db::Store;

/// Server state shared across all connections
pub struct ServerState {
    /// Configuration
    pub config: Config,
    /// Place documents
    pub store: Store,
    /// Toy catalog, read once at startup
    pub catalog: Catalog,
    /// API route table
    pub router: Router,
    /// `add_headers`, parsed
    pub extra_headers: Vec<(HeaderName, HeaderValue)>,
}

impl ServerState {
    pub fn new(config: Config, store: Store, catalog: Catalog) -> Result<Self, ConfigError> {
        let router = Router::new().map_err(|e| ConfigError::Validation(e.to_string()))?;
        let extra_headers = config
            .add_headers
            .iter()
            .map(|(name, value)| {
                let name = HeaderName::from_bytes(name.as_bytes())
                    .map_err(|_| ConfigError::Validation(format!("invalid header name: {}", name)))?;
                let value = HeaderValue::from_str(value)
                    .map_err(|_| ConfigError::Validation(format!("invalid header value: {}", value)))?;
                Ok((name, value))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self {
            config,
            store,
            catalog,
            router,
            extra_headers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_header_rejected() {
        let mut config = Config::default();
        config
            .add_headers
            .insert("Bad Header".to_string(), "x".to_string());
        let result = ServerState::new(config, Store::in_memory().unwrap(), Catalog::default());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
