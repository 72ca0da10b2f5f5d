//! Messages pushed to dashboards.
//!
//! Every message goes over the wire as `{"type": ..., "data": ...}`.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use super::event::VisitorEvent;
use super::session::SessionView;
use super::stats::StatsSnapshot;

/// Server to dashboard message.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum PushMessage {
    #[serde(rename = "user_connected")]
    UserConnected(DashboardJoined),
    #[serde(rename = "user_disconnected")]
    UserDisconnected(DashboardLeft),
    #[serde(rename = "visitor_update")]
    VisitorUpdate(VisitorUpdate),
    #[serde(rename = "session_activity")]
    SessionActivity(SessionView),
    #[serde(rename = "alert")]
    Alert(Alert),
}

impl PushMessage {
    /// Wire name of the message type
    pub fn kind(&self) -> &'static str {
        match self {
            PushMessage::UserConnected(_) => "user_connected",
            PushMessage::UserDisconnected(_) => "user_disconnected",
            PushMessage::VisitorUpdate(_) => "visitor_update",
            PushMessage::SessionActivity(_) => "session_activity",
            PushMessage::Alert(_) => "alert",
        }
    }

    pub fn dashboard_joined(total_dashboards: usize, connected_at: DateTime<Utc>) -> Self {
        PushMessage::UserConnected(DashboardJoined {
            total_dashboards,
            connected_at,
        })
    }

    pub fn dashboard_left(total_dashboards: usize) -> Self {
        PushMessage::UserDisconnected(DashboardLeft { total_dashboards })
    }

    /// Broadcast update for an accepted event.
    pub fn visitor_update(event: VisitorEvent, stats: StatsSnapshot) -> Self {
        PushMessage::VisitorUpdate(VisitorUpdate {
            event: Some(event),
            stats,
        })
    }

    /// Private reply to a stats query; carries no event.
    pub fn stats_reply(stats: StatsSnapshot) -> Self {
        PushMessage::VisitorUpdate(VisitorUpdate { event: None, stats })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardJoined {
    pub total_dashboards: usize,
    pub connected_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardLeft {
    pub total_dashboards: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitorUpdate {
    /// The accepted event, or `null` for query replies
    pub event: Option<VisitorEvent>,
    pub stats: StatsSnapshot,
}

/// Supplementary notice emitted by the sampling policy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub level: String,
    pub message: String,
    pub details: Value,
}
