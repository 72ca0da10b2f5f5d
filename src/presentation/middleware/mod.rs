//! Middleware
//!
//! Tower layers and axum middleware applied to the router.

pub mod cors;
pub mod logging;

pub use cors::create_cors_layer;
pub use logging::{create_trace_layer, track_http_metrics};
