//! Route Configuration
//!
//! Configures all HTTP routes for the API.

use axum::{
    http::Uri,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Router,
};

use super::handlers;
use crate::infrastructure::metrics;
use crate::presentation::middleware::track_http_metrics;
use crate::presentation::websocket::ws_handler;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Create the main router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", api_routes())
        // Dashboard push channel; `/` is kept for existing dashboard clients
        .route("/ws", get(ws_handler))
        .route("/", get(ws_handler))
        // Health check endpoints
        .route("/health", get(handlers::health::health_check))
        .route("/health/live", get(handlers::health::liveness))
        .route("/health/ready", get(handlers::health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        .route_layer(middleware::from_fn(track_http_metrics))
        .fallback(not_found)
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}

/// JSON 404 for unknown routes
async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

/// API routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/events", post(handlers::events::ingest_event))
        .route("/stats", get(handlers::stats::get_stats))
}
