//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tokio::sync::mpsc::Receiver;
use tower::ServiceExt;

use visitor_analytics::application::services::{NeverSample, SamplingPolicy};
use visitor_analytics::config::Settings;
use visitor_analytics::infrastructure::broadcast::Payload;
use visitor_analytics::startup::{build_router, AppState};

/// Test application driving the real router
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Application that never raises alerts
    pub fn new() -> Self {
        Self::with_sampling(Arc::new(NeverSample))
    }

    pub fn with_sampling(sampling: Arc<dyn SamplingPolicy>) -> Self {
        let settings = Settings::defaults().expect("default settings");
        let state = AppState::new(settings, sampling);
        Self {
            router: build_router(state.clone()),
            state,
        }
    }

    /// Make a GET request to the application
    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, uri: &str, body: &str) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Post a page view event
    pub async fn post_event(&self, event: &Value) -> (StatusCode, Value) {
        self.post_json("/api/events", &event.to_string()).await
    }

    /// GET a plain text endpoint
    pub async fn get_text(&self, uri: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    /// Subscribe a fake dashboard directly on the hub
    pub fn dashboard(&self) -> Receiver<Payload> {
        let (_handle, rx) = self.state.hub.subscribe();
        rx
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }
}

/// Well-formed event body
pub fn page_view(session_id: &str, page: &str, country: &str) -> Value {
    json!({
        "type": "page_view",
        "page": page,
        "sessionId": session_id,
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "country": country
    })
}

/// Drain every message queued for a dashboard
pub fn drain(rx: &mut Receiver<Payload>) -> Vec<Value> {
    let mut messages = Vec::new();
    while let Ok(payload) = rx.try_recv() {
        messages.push(serde_json::from_str(&payload).unwrap());
    }
    messages
}

/// Message types in arrival order
pub fn kinds(messages: &[Value]) -> Vec<String> {
    messages
        .iter()
        .map(|m| m["type"].as_str().unwrap_or_default().to_string())
        .collect()
}
