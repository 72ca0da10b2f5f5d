//! Visitor session entity.
//!
//! A session is one visitor's tracked activity from the first event to the
//! most recent one, keyed by the client supplied session identifier.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::event::VisitorEvent;

/// Tracked state of one visitor session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Client supplied identifier
    pub session_id: String,

    /// Pages visited, in arrival order. Append only.
    pub journey: Vec<String>,

    /// Country reported by the most recent event
    pub country: String,

    /// Timestamp of the first event. Never changes.
    pub started_at: DateTime<Utc>,

    /// Timestamp of the most recent event
    pub last_seen_at: DateTime<Utc>,
}

impl Session {
    /// Open a session for the first event of a visitor.
    ///
    /// The journey starts empty; call [`Session::visit`] with the same event.
    pub fn start(event: &VisitorEvent) -> Self {
        Self {
            session_id: event.session_id.clone(),
            journey: Vec::new(),
            country: event.country.clone(),
            started_at: event.occurred_at,
            last_seen_at: event.occurred_at,
        }
    }

    /// Apply an event to this session.
    pub fn visit(&mut self, event: &VisitorEvent) {
        self.journey.push(event.page.clone());
        self.country.clone_from(&event.country);
        self.last_seen_at = event.occurred_at;
    }

    /// The last page visited, or an empty string before the first visit.
    pub fn current_page(&self) -> &str {
        self.journey.last().map(String::as_str).unwrap_or_default()
    }

    /// Whole seconds elapsed between the session start and `at`, never negative.
    pub fn duration_at(&self, at: DateTime<Utc>) -> u64 {
        (at - self.started_at).num_seconds().max(0) as u64
    }

    /// Whether the journey contains `page`.
    pub fn visited(&self, page: &str) -> bool {
        self.journey.iter().any(|p| p == page)
    }

    /// Read-only view of the session as dashboards see it.
    pub fn view(&self, at: DateTime<Utc>) -> SessionView {
        SessionView {
            session_id: self.session_id.clone(),
            current_page: self.current_page().to_owned(),
            journey: self.journey.clone(),
            duration: self.duration_at(at),
        }
    }
}

/// Per-session view shipped in stats snapshots and activity messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub session_id: String,
    pub current_page: String,
    pub journey: Vec<String>,
    /// Seconds since the session started
    pub duration: u64,
}

/// Result of applying one event to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionActivity {
    /// Session state right after the event, with the duration measured at
    /// the event timestamp
    pub view: SessionView,

    /// Whether the event opened a new session
    pub created: bool,
}
