//! Locations server
//!
//! Usage: `mctoy-server [config/server.ron]`. The `PORT` environment
//! variable overrides the port of every listen address.

use mctoy_core::Catalog;
use mctoy_db::Store;
use mctoy_server::{serve, Config, ServerState};
use std::path::Path;
use std::sync::Arc;
use tokio::net::TcpListener;

fn setup_tracing(default_filter: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/server.ron".to_string());

    let mut config = if Path::new(&config_path).exists() {
        Config::load(&config_path)?
    } else {
        Config::default()
    };
    config.override_port(std::env::var("PORT").ok().as_deref())?;

    setup_tracing(&config.log);
    tracing::info!(config = %config_path, "configuration loaded");

    let catalog = Catalog::load(&config.catalog)?;
    let store = match config.database.as_deref() {
        Some(path) => Store::open(path)?,
        None => {
            tracing::warn!("no database configured, places are kept in memory");
            Store::in_memory()?
        }
    };
    tracing::info!(places = store.count_places()?, "place store ready");

    let addrs = config.listen_addrs()?;
    let state = Arc::new(ServerState::new(config, store, catalog)?);

    let mut handles = Vec::new();
    for addr in addrs {
        let listener = TcpListener::bind(addr).await?;
        tracing::info!("listening on http://{}", addr);
        handles.push(tokio::spawn(serve(listener, state.clone())));
    }

    for handle in handles {
        handle.await?;
    }

    Ok(())
}
