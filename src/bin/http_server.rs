//! Inventory API server entry point.

use std::process;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use almacen::config::AppConfig;
use almacen::http_server::HttpServer;
use almacen::store::MemoryStore;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("configuration error: {err}");
            process::exit(1);
        }
    };

    let store = Arc::new(MemoryStore::new());
    let server = HttpServer::new(config, store);
    if let Err(err) = server.start().await {
        tracing::error!("server error: {err}");
        process::exit(1);
    }
}
