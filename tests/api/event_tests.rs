//! Event Ingestion API Tests

use std::sync::Arc;

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;

use visitor_analytics::application::services::AlwaysSample;

use crate::common::{drain, kinds, page_view, TestApp};

#[tokio::test]
async fn test_valid_event_is_acknowledged() {
    let app = TestApp::new();

    let (status, body) = app.post_event(&page_view("s1", "/home", "US")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true }));
    assert_eq!(app.state.registry.session_count(), 1);
}

#[tokio::test]
async fn test_event_reaches_every_dashboard() {
    let app = TestApp::new();
    let mut dashboards: Vec<_> = (0..3).map(|_| app.dashboard()).collect();
    for rx in dashboards.iter_mut() {
        drain(rx);
    }

    app.post_event(&page_view("s1", "/home", "US")).await;

    for rx in dashboards.iter_mut() {
        let messages = drain(rx);
        assert_eq!(kinds(&messages), vec!["visitor_update", "session_activity"]);

        let stats = &messages[0]["data"]["stats"];
        assert_eq!(stats["totalActive"], 1);
        assert_eq!(stats["totalToday"], 1);
        assert_eq!(stats["pagesVisited"], json!({ "/home": 1 }));
        assert_eq!(messages[0]["data"]["event"]["sessionId"], "s1");
        assert_eq!(messages[1]["data"]["journey"], json!(["/home"]));
    }
}

#[tokio::test]
async fn test_extra_fields_are_echoed() {
    let app = TestApp::new();
    let mut rx = app.dashboard();
    drain(&mut rx);

    let mut event = page_view("s1", "/home", "US");
    event["referrer"] = json!("https://news.example");
    app.post_event(&event).await;

    let messages = drain(&mut rx);
    assert_eq!(messages[0]["data"]["event"]["referrer"], "https://news.example");
}

#[tokio::test]
async fn test_missing_country_is_rejected() {
    let app = TestApp::new();
    let mut rx = app.dashboard();
    drain(&mut rx);

    let mut event = page_view("s1", "/home", "US");
    event.as_object_mut().unwrap().remove("country");
    let (status, body) = app.post_event(&event).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 10007);
    assert_eq!(body["errors"][0]["field"], "country");
    assert_eq!(app.state.registry.session_count(), 0);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_whitespace_session_id_is_rejected() {
    let app = TestApp::new();
    let mut rx = app.dashboard();
    drain(&mut rx);

    let (status, body) = app.post_event(&page_view("   ", "/home", "US")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "sessionId");
    assert_eq!(body["errors"][0]["message"], "must not be empty");
    assert_eq!(app.state.registry.session_count(), 0);
    assert_eq!(app.state.registry.total_today(), 0);
    assert!(drain(&mut rx).is_empty());
}

#[tokio::test]
async fn test_bad_timestamp_is_rejected() {
    let app = TestApp::new();

    let mut event = page_view("s1", "/home", "US");
    event["timestamp"] = json!("yesterday");
    let (status, body) = app.post_event(&event).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "timestamp");
}

#[tokio::test]
async fn test_non_json_body_is_bad_request() {
    let app = TestApp::new();

    let (status, body) = app.post_json("/api/events", "not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 10002);
    assert_eq!(app.state.registry.total_today(), 0);
}

#[tokio::test]
async fn test_alert_follows_updates() {
    let app = TestApp::with_sampling(Arc::new(AlwaysSample::default()));
    let mut rx = app.dashboard();
    drain(&mut rx);

    app.post_event(&page_view("s1", "/home", "US")).await;

    let messages = drain(&mut rx);
    assert_eq!(
        kinds(&messages),
        vec!["visitor_update", "session_activity", "alert"]
    );
    assert_eq!(messages[2]["data"]["details"]["visitorsLastMinute"], 1);
}

#[tokio::test]
async fn test_dashboard_join_and_leave_notices() {
    let app = TestApp::new();
    let mut first = app.dashboard();
    let (second, _second_rx) = app.state.hub.subscribe();

    let joined = drain(&mut first);
    assert_eq!(kinds(&joined), vec!["user_connected"]);
    assert_eq!(joined[0]["data"]["totalDashboards"], 1);

    app.state.hub.unsubscribe(&second.id);

    let left = drain(&mut first);
    assert_eq!(
        left,
        vec![json!({ "type": "user_disconnected", "data": { "totalDashboards": 1 } })]
    );
}

#[tokio::test]
async fn test_concurrent_submissions_are_all_counted() {
    let app = Arc::new(TestApp::new());

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let app = app.clone();
            tokio::spawn(async move {
                let session = format!("s{}", i % 5);
                app.post_event(&page_view(&session, "/home", "US")).await
            })
        })
        .collect();
    for task in tasks {
        let (status, _) = task.await.unwrap();
        assert_eq!(status, StatusCode::OK);
    }

    let (_, stats) = app.get("/api/stats").await;
    assert_eq!(stats["pagesVisited"]["/home"], 20);
    assert_eq!(stats["totalActive"], 5);
    assert_eq!(stats["totalToday"], 5);
}
