//! WebSocket Session Management

use std::time::Instant;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::messages::{parse_client_message, ClientMessage, MalformedQuery};
use crate::application::services::StatsService;
use crate::domain::PushMessage;
use crate::infrastructure::broadcast::SubscriberHandle;

/// Per-connection dashboard state
#[derive(Debug)]
pub struct SubscriberSession {
    pub subscriber_id: Uuid,
    pub connected_at: DateTime<Utc>,
    pub last_seen: Instant,
    pub queries_served: u64,
}

impl SubscriberSession {
    pub fn new(handle: SubscriberHandle) -> Self {
        Self {
            subscriber_id: handle.id,
            connected_at: handle.connected_at,
            last_seen: Instant::now(),
            queries_served: 0,
        }
    }

    /// Any inbound frame counts as a sign of life.
    pub fn heartbeat(&mut self) {
        self.last_seen = Instant::now();
    }

    pub fn is_alive(&self, timeout_ms: u64) -> bool {
        self.last_seen.elapsed().as_millis() < u128::from(timeout_ms)
    }

    /// Answer one inbound text frame. The reply goes to this dashboard only.
    pub fn on_text(
        &mut self,
        text: &str,
        stats: &StatsService,
    ) -> Result<PushMessage, MalformedQuery> {
        match parse_client_message(text)? {
            ClientMessage::RequestDetailedStats { filter } => {
                self.queries_served += 1;
                Ok(PushMessage::stats_reply(stats.detailed_stats(&filter)))
            }
        }
    }
}
