//! Health and Metrics API Tests

use axum::http::StatusCode;

use crate::common::{page_view, TestApp};

#[tokio::test]
async fn test_health_check_returns_ok() {
    let app = TestApp::new();

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(body.get("version").is_some());
}

#[tokio::test]
async fn test_liveness_probe() {
    let app = TestApp::new();

    let (status, body) = app.get("/health/live").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "alive");
}

#[tokio::test]
async fn test_readiness_reports_counters() {
    let app = TestApp::new();
    let _dashboard = app.dashboard();
    app.post_event(&page_view("s1", "/home", "US")).await;

    let (status, body) = app.get("/health/ready").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["checks"]["dashboards_connected"], 1);
    assert_eq!(body["checks"]["sessions_tracked"], 1);
    assert_eq!(body["checks"]["total_today"], 1);
}

#[tokio::test]
async fn test_metrics_exposed() {
    let app = TestApp::new();
    app.post_event(&page_view("s1", "/home", "US")).await;

    let (status, text) = app.get_text("/metrics").await;

    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("visitor_analytics_events_ingested_total"));
    assert!(text.contains("visitor_analytics_http_requests_total"));
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/nope").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 10001);
}
