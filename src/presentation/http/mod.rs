//! HTTP API
//!
//! Routes and handlers for ingestion, stats, health and metrics.

pub mod handlers;
pub mod routes;

pub use routes::create_router;
