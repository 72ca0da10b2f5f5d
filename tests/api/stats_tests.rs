//! Stats API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{page_view, TestApp};

async fn seeded() -> TestApp {
    let app = TestApp::new();
    app.post_event(&page_view("s1", "/home", "US")).await;
    app.post_event(&page_view("s1", "/pricing", "US")).await;
    app.post_event(&page_view("s2", "/home", "DE")).await;
    app
}

#[tokio::test]
async fn test_stats_on_empty_registry() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "totalActive": 0, "totalToday": 0, "pagesVisited": {}, "sessions": [] })
    );
}

#[tokio::test]
async fn test_unfiltered_stats() {
    let app = seeded().await;

    let (_, body) = app.get("/api/stats").await;

    assert_eq!(body["totalActive"], 2);
    assert_eq!(body["totalToday"], 2);
    assert_eq!(body["pagesVisited"], json!({ "/home": 2, "/pricing": 1 }));
    assert_eq!(body["sessions"][0]["sessionId"], "s1");
    assert_eq!(body["sessions"][0]["currentPage"], "/pricing");
}

#[tokio::test]
async fn test_country_filter() {
    let app = seeded().await;

    let (_, body) = app.get("/api/stats?country=de").await;

    assert_eq!(body["totalActive"], 1);
    assert_eq!(body["sessions"][0]["sessionId"], "s2");
    assert_eq!(body["pagesVisited"], json!({ "/home": 1 }));
    assert_eq!(body["totalToday"], 2);
}

#[tokio::test]
async fn test_page_filter() {
    let app = seeded().await;

    let (_, body) = app.get("/api/stats?page=/pricing").await;

    assert_eq!(body["totalActive"], 1);
    assert_eq!(body["pagesVisited"], json!({ "/pricing": 1 }));
}

#[tokio::test]
async fn test_empty_filter_values_are_ignored() {
    let app = seeded().await;

    let (_, body) = app.get("/api/stats?country=&page=").await;

    assert_eq!(body["totalActive"], 2);
}
