//! Example to run the HEXCHESS server standalone
//!
//! Run with: cargo run -p hexchess-server --example run_server

use hexchess_server::{run_server, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig {
        host: "127.0.0.1".to_string(),
        ..ServerConfig::default()
    };

    println!("Starting HEXCHESS server on http://{}", config.address());
    println!("Try: curl http://{}/api/game", config.address());

    run_server(config).await
}
