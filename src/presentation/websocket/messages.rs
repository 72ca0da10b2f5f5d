//! WebSocket Message Types
//!
//! Frames a dashboard may send. Everything the server pushes is a
//! [`PushMessage`](crate::domain::PushMessage).

use serde::Deserialize;

use crate::domain::StatsFilter;

/// Inbound dashboard message
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ask for (optionally filtered) stats, answered privately
    RequestDetailedStats {
        #[serde(default)]
        filter: StatsFilter,
    },
}

/// Inbound frame that is not a valid [`ClientMessage`].
#[derive(Debug, thiserror::Error)]
#[error("Malformed query: {0}")]
pub struct MalformedQuery(#[from] serde_json::Error);

/// Parse one inbound text frame.
pub fn parse_client_message(text: &str) -> Result<ClientMessage, MalformedQuery> {
    Ok(serde_json::from_str(text)?)
}
