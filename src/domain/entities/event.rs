//! Visitor event entity.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};

/// A validated activity event reported by a client application.
///
/// Serializes back to the same shape the client sent, including any
/// extra fields, so dashboards see the raw event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisitorEvent {
    #[serde(rename = "type")]
    pub event_type: String,

    pub page: String,

    #[serde(rename = "sessionId")]
    pub session_id: String,

    /// Timestamp exactly as the client sent it
    pub timestamp: String,

    pub country: String,

    /// Parsed form of `timestamp`
    #[serde(skip)]
    pub occurred_at: DateTime<Utc>,

    /// Fields outside the required set, passed through verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VisitorEvent {
    /// Build an event from already validated parts.
    pub fn new(
        event_type: impl Into<String>,
        page: impl Into<String>,
        session_id: impl Into<String>,
        occurred_at: DateTime<Utc>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            page: page.into(),
            session_id: session_id.into(),
            timestamp: occurred_at.to_rfc3339(),
            country: country.into(),
            occurred_at,
            extra: Map::new(),
        }
    }
}

/// Parse an ISO-8601 timestamp.
///
/// Accepts RFC 3339 (`2024-05-01T12:00:00.000Z`, `...+02:00`) and, for
/// clients that omit the offset, a naive date-time taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
