//! Registry snapshots and the aggregate stats derived from them.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::session::{Session, SessionView};
use crate::domain::value_objects::PageCounters;

/// Point-in-time copy of everything the session registry tracks.
///
/// Taken atomically: no event is ever half-applied in a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrySnapshot {
    /// Sessions ordered by start time, then identifier
    pub sessions: Vec<Session>,

    /// Visits per page across all countries
    pub page_counters: PageCounters,

    /// Visits per page, split by reported country
    pub country_page_counters: BTreeMap<String, PageCounters>,

    /// Distinct sessions seen since startup
    pub total_today: u64,

    /// Reference time for session durations
    pub taken_at: DateTime<Utc>,
}

impl RegistrySnapshot {
    /// Sessions whose last activity is at or after `since`.
    pub fn active_since(&self, since: DateTime<Utc>) -> usize {
        self.sessions
            .iter()
            .filter(|s| s.last_seen_at >= since)
            .count()
    }
}

/// Aggregate statistics pushed to dashboards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Sessions currently tracked (after filtering)
    #[serde(rename = "totalActive")]
    pub total_active: usize,

    /// Distinct sessions seen today
    #[serde(rename = "totalToday")]
    pub total_today: u64,

    #[serde(rename = "pagesVisited")]
    pub pages_visited: PageCounters,

    pub sessions: Vec<SessionView>,
}
