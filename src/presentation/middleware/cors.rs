//! CORS Middleware Configuration
//!
//! Dashboards and tracked sites are usually served from other origins.

use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{Any, CorsLayer};

use crate::config::CorsSettings;

/// Create CORS layer from settings.
///
/// An empty origin list allows any origin; unparsable origins are skipped.
pub fn create_cors_layer(settings: &CorsSettings) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    let origins = allowed_origins(settings);
    if origins.is_empty() {
        base.allow_origin(Any)
    } else {
        base.allow_origin(origins)
            .max_age(Duration::from_secs(3600))
    }
}

fn allowed_origins(settings: &CorsSettings) -> Vec<HeaderValue> {
    settings
        .allowed_origins
        .iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty() && *o != "*")
        .filter_map(|o| o.parse().ok())
        .collect()
}
