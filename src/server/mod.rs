//! HTTP surface
//!
//! - `POST /api/validate-idea` runs the pipeline for `{ "idea", "worklab"? }`
//! - `GET /api/ideas/{id}` reads a stored record back
//! - `GET /health` reports liveness and the crate version

mod error;
mod routes;

pub use error::{ApiError, ErrorBody};
pub use routes::ValidateIdeaRequest;

use crate::pipeline::ValidationOrchestrator;
use crate::store::RecordStore;
use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ValidationOrchestrator>,
    pub store: Arc<dyn RecordStore>,
}

impl AppState {
    /// Shares the orchestrator's store with the read endpoints
    pub fn new(orchestrator: Arc<ValidationOrchestrator>) -> Self {
        let store = orchestrator.store().clone();
        Self {
            orchestrator,
            store,
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(routes::health_handler))
        .route("/api/validate-idea", post(routes::validate_idea_handler))
        .route("/api/ideas/{id}", get(routes::get_idea_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serves until Ctrl-C
pub async fn run_server(state: AppState, addr: SocketAddr) -> Result<()> {
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Ideaforge listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
