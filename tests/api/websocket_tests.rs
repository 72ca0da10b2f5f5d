//! Dashboard WebSocket Tests
//!
//! These run the real server on an ephemeral port and talk to it with a
//! WebSocket client.

use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use visitor_analytics::application::dto::IngestEventRequest;
use visitor_analytics::application::services::NeverSample;
use visitor_analytics::config::Settings;
use visitor_analytics::startup::{AppState, Application};

use crate::common::page_view;

const TIMEOUT: Duration = Duration::from_secs(5);
const QUIET: Duration = Duration::from_millis(300);

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Start the server and return its WebSocket URL and shared state
async fn spawn_server() -> (String, AppState) {
    let mut settings = Settings::defaults().expect("default settings");
    settings.server.host = "127.0.0.1".into();
    settings.server.port = 0;

    let app = Application::build_with_sampling(settings, Arc::new(NeverSample))
        .await
        .expect("server binds");
    let addr = app.local_addr().expect("bound address");
    let state = app.state().clone();
    tokio::spawn(app.run_until_stopped());

    (format!("ws://{}/ws", addr), state)
}

/// Connect a dashboard and consume its `user_connected` notice
async fn connect(url: &str) -> (WsStream, Value) {
    let (mut ws, _) = connect_async(url).await.expect("handshake");
    let joined = read_json(&mut ws).await;
    (ws, joined)
}

/// Read the next text frame as JSON
async fn read_json(ws: &mut WsStream) -> Value {
    loop {
        let msg = timeout(TIMEOUT, ws.next())
            .await
            .expect("timeout waiting for message")
            .expect("stream closed")
            .expect("ws error");
        if let Message::Text(text) = msg {
            return serde_json::from_str(&text).unwrap();
        }
    }
}

/// True when no text frame arrives within a short quiet period
async fn stays_quiet(ws: &mut WsStream) -> bool {
    loop {
        match timeout(QUIET, ws.next()).await {
            Err(_) => return true,
            Ok(Some(Ok(Message::Text(_)))) => return false,
            Ok(Some(Ok(_))) => continue,
            Ok(_) => return false,
        }
    }
}

async fn send_json(ws: &mut WsStream, body: Value) {
    ws.send(Message::text(body.to_string())).await.unwrap();
}

fn ingest(state: &AppState, session_id: &str, page: &str, country: &str) {
    let request: IngestEventRequest =
        serde_json::from_value(page_view(session_id, page, country)).unwrap();
    state.processor.handle(request).unwrap();
}

#[tokio::test]
async fn test_join_notice_arrives_first() {
    let (url, state) = spawn_server().await;

    let (_first, joined) = connect(&url).await;
    assert_eq!(joined["type"], "user_connected");
    assert_eq!(joined["data"]["totalDashboards"], 1);

    let (_second, joined) = connect(&url).await;
    assert_eq!(joined["data"]["totalDashboards"], 2);
    assert_eq!(state.hub.subscriber_count(), 2);
}

#[tokio::test]
async fn test_events_are_pushed_to_every_dashboard() {
    let (url, state) = spawn_server().await;
    let (mut first, _) = connect(&url).await;
    let (mut second, _) = connect(&url).await;

    ingest(&state, "s1", "/home", "US");

    for ws in [&mut first, &mut second] {
        let update = read_json(ws).await;
        assert_eq!(update["type"], "visitor_update");
        assert_eq!(update["data"]["event"]["sessionId"], "s1");
        assert_eq!(update["data"]["stats"]["pagesVisited"], json!({ "/home": 1 }));

        let activity = read_json(ws).await;
        assert_eq!(activity["type"], "session_activity");
        assert_eq!(activity["data"]["journey"], json!(["/home"]));
    }
}

#[tokio::test]
async fn test_detailed_stats_reply_goes_only_to_requester() {
    let (url, state) = spawn_server().await;
    let (mut asking, _) = connect(&url).await;
    let (mut watching, _) = connect(&url).await;

    ingest(&state, "s1", "/home", "US");
    ingest(&state, "s2", "/docs", "DE");
    for ws in [&mut asking, &mut watching] {
        for _ in 0..4 {
            read_json(ws).await;
        }
    }

    send_json(
        &mut asking,
        json!({ "type": "request_detailed_stats", "filter": { "country": "US" } }),
    )
    .await;

    let reply = read_json(&mut asking).await;
    assert_eq!(reply["type"], "visitor_update");
    assert_eq!(reply["data"]["event"], Value::Null);
    assert_eq!(reply["data"]["stats"]["totalActive"], 1);
    assert_eq!(reply["data"]["stats"]["pagesVisited"], json!({ "/home": 1 }));
    assert_eq!(reply["data"]["stats"]["totalToday"], 2);

    assert!(stays_quiet(&mut watching).await);
}

#[tokio::test]
async fn test_malformed_frame_keeps_connection_open() {
    let (url, state) = spawn_server().await;
    let (mut ws, _) = connect(&url).await;

    ws.send(Message::text("not json at all")).await.unwrap();
    send_json(&mut ws, json!({ "type": "request_detailed_stats", "filter": 42 })).await;
    assert!(stays_quiet(&mut ws).await);
    assert_eq!(state.hub.subscriber_count(), 1);

    send_json(&mut ws, json!({ "type": "request_detailed_stats" })).await;
    let reply = read_json(&mut ws).await;
    assert_eq!(reply["type"], "visitor_update");
    assert_eq!(reply["data"]["event"], Value::Null);
    assert_eq!(reply["data"]["stats"]["totalActive"], 0);
}

#[tokio::test]
async fn test_closing_dashboard_notifies_the_rest() {
    let (url, state) = spawn_server().await;
    let (mut leaving, _) = connect(&url).await;
    let (mut staying, _) = connect(&url).await;
    assert_eq!(state.hub.subscriber_count(), 2);

    leaving.close(None).await.unwrap();

    let notice = read_json(&mut staying).await;
    assert_eq!(notice["type"], "user_disconnected");
    assert_eq!(notice["data"]["totalDashboards"], 1);
    assert_eq!(state.hub.subscriber_count(), 1);

    ingest(&state, "s1", "/home", "US");
    let update = read_json(&mut staying).await;
    assert_eq!(update["type"], "visitor_update");
}
