//! Scrimmage Server - HTTP API for event schedules
//!
//! This crate provides the web backend:
//! - Schedule generation per event, bounded by a timeout
//! - Round persistence behind the `RoundStore` trait
//! - Stored schedule retrieval

mod routes;
mod state;

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;

pub use state::{InMemoryRoundStore, RoundRecord, RoundStore, ServerState};

/// Server configuration
#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub port: u16,
    /// Longest a single generation may run before it is cancelled
    pub generation_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8002,
            generation_timeout: Duration::from_secs(10),
        }
    }
}

/// Create the router with all routes
pub fn create_router(state: Arc<ServerState>) -> Router {
    Router::new()
        // Status endpoint
        .route("/api/status", get(routes::status::status_handler))
        // Schedules
        .route(
            "/api/events/:event_id/schedule",
            post(routes::schedule::generate_event_schedule),
        )
        .route(
            "/api/events/:event_id/rounds",
            get(routes::schedule::get_event_rounds),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// Start the HTTP server with an in-memory round store
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let state = Arc::new(ServerState::new(config.generation_timeout));
    let router = create_router(state);

    tracing::info!("Scrimmage server starting on http://0.0.0.0:{}", config.port);
    tracing::info!(
        "Generation timeout: {} ms",
        config.generation_timeout.as_millis()
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
