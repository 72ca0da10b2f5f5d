//! WebSocket Connection Handler
//!
//! One task per dashboard reads inbound frames, and a spawned writer task
//! drains the dashboard's outgoing queue into the socket.

use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use tokio::time::{interval, timeout, MissedTickBehavior};

use super::session::SubscriberSession;
use crate::startup::AppState;

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let limits = &state.settings.websocket;
    ws.max_message_size(limits.max_message_size)
        .max_frame_size(limits.max_frame_size)
        .on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: AppState) {
    let config = state.settings.websocket.clone();
    let (handle, mut outgoing) = state.hub.subscribe();
    let mut session = SubscriberSession::new(handle);
    let subscriber_id = session.subscriber_id;

    // Split socket for concurrent read/write
    let (mut sender, mut receiver) = socket.split();

    let send_timeout = Duration::from_millis(config.send_timeout_ms);
    // tokio intervals reject a zero period
    let heartbeat_interval = Duration::from_millis(config.heartbeat_interval_ms.max(1));

    // Forward queued payloads to the socket, pinging between them
    let mut writer = tokio::spawn(async move {
        let mut ping = interval(heartbeat_interval);
        ping.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ping.tick().await; // Skip first immediate tick

        loop {
            let frame = tokio::select! {
                payload = outgoing.recv() => match payload {
                    Some(payload) => Message::Text(payload.to_string().into()),
                    // Hub dropped this dashboard
                    None => break,
                },
                _ = ping.tick() => Message::Ping(Bytes::new()),
            };

            match timeout(send_timeout, sender.send(frame)).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::debug!(subscriber_id = %subscriber_id, error = %e, "Send failed");
                    break;
                }
                Err(_) => {
                    tracing::warn!(subscriber_id = %subscriber_id, "Send timed out");
                    break;
                }
            }
        }

        let _ = sender.close().await;
    });

    let timeout_ms = config
        .heartbeat_interval_ms
        .saturating_add(config.heartbeat_grace_ms);
    let mut liveness = interval(heartbeat_interval);
    liveness.tick().await;

    // Main message loop
    loop {
        tokio::select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        session.heartbeat();
                        match session.on_text(text.as_str(), &state.stats) {
                            Ok(reply) => {
                                if !state.hub.send_to(&subscriber_id, &reply) {
                                    break;
                                }
                            }
                            Err(e) => {
                                tracing::debug!(
                                    subscriber_id = %subscriber_id,
                                    error = %e,
                                    "Ignoring malformed query"
                                );
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::debug!(subscriber_id = %subscriber_id, "Connection closed");
                        break;
                    }
                    Some(Ok(_)) => {
                        // Pong, ping or binary; pings are answered by axum
                        session.heartbeat();
                    }
                    Some(Err(e)) => {
                        tracing::debug!(
                            subscriber_id = %subscriber_id,
                            error = %e,
                            "WebSocket error"
                        );
                        break;
                    }
                }
            }

            _ = &mut writer => {
                tracing::debug!(subscriber_id = %subscriber_id, "Writer finished");
                break;
            }

            _ = liveness.tick() => {
                if !session.is_alive(timeout_ms) {
                    tracing::info!(
                        subscriber_id = %subscriber_id,
                        "Heartbeat timeout, closing connection"
                    );
                    break;
                }
            }
        }
    }

    // Cleanup
    state.hub.unsubscribe(&subscriber_id);
    writer.abort();

    tracing::debug!(
        subscriber_id = %subscriber_id,
        connected_at = %session.connected_at,
        queries = session.queries_served,
        "Dashboard connection finished"
    );
}
