//! HEXCHESS Server - HTTP API for remote boards and peers
//!
//! This crate provides the web backend:
//! - REST API for the single shared game
//! - Board geometry for renderers
//! - Notation-based move exchange and resynchronisation
//! - Optional static file serving for a UI
//!
//! Every request that touches the game goes through one mutex, so moves are
//! applied strictly in arrival order.

mod errors;
mod routes;
mod state;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

pub use errors::ApiError;
pub use state::ServerState;

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory served for any non-API path
    pub static_dir: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8003,
            static_dir: None,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Create the router with all routes
pub fn create_router(config: &ServerConfig, state: Arc<ServerState>) -> Router {
    let router = Router::new()
        // Status endpoint
        .route("/api/status", get(routes::status::status_handler))
        // Board geometry and occupancy
        .route("/api/board", get(routes::board::get_board))
        // Game API
        .route("/api/game", get(routes::game::get_game))
        .route("/api/game/moves", get(routes::game::get_piece_moves))
        .route("/api/game/move", post(routes::game::make_move))
        .route("/api/game/promote", post(routes::game::promote))
        .route("/api/game/load", post(routes::game::load_game))
        .route("/api/game/reset", post(routes::game::reset_game))
        // Shared state
        .with_state(state)
        .layer(CorsLayer::permissive());

    // Static file serving (must be last)
    match &config.static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    }
}

/// Start the HTTP server
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let state = Arc::new(ServerState::new());
    let router = create_router(&config, state);
    let addr = config.address();

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("HEXCHESS Server listening on http://{}", addr);
    if let Some(dir) = &config.static_dir {
        tracing::info!("Static files served from: {}", dir);
    }

    axum::serve(listener, router).await?;

    Ok(())
}
