//! In-memory Session Registry
//!
//! Single source of truth for visitor sessions, page counters and the
//! daily total.
//!
//! Sessions and counters live in sharded [`DashMap`]s: events for the same
//! session serialize on that session's shard lock, while events for other
//! sessions proceed in parallel. The snapshot gate is held shared by every
//! mutation and exclusively by [`SessionRegistry::snapshot_all`], so a
//! snapshot always sees each event either fully applied or not at all.
//!
//! Sessions are never evicted.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;

use crate::domain::{PageCounters, RegistrySnapshot, Session, SessionActivity, VisitorEvent};

/// Owns every tracked session and the counters derived from events.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, Session>,
    page_counters: DashMap<String, u64>,
    /// Keyed by (country, page)
    country_page_counters: DashMap<(String, String), u64>,
    total_today: AtomicU64,
    snapshot_gate: RwLock<()>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one validated event.
    ///
    /// Creates the session on first sight (counting it towards the daily
    /// total), appends the page to its journey and bumps the page counters.
    pub fn record(&self, event: &VisitorEvent) -> SessionActivity {
        let _gate = self.snapshot_gate.read();

        let mut created = false;
        let view = {
            let mut session = self
                .sessions
                .entry(event.session_id.clone())
                .or_insert_with(|| {
                    created = true;
                    Session::start(event)
                });
            session.visit(event);
            session.view(event.occurred_at)
        };

        if created {
            self.total_today.fetch_add(1, Ordering::Relaxed);
        }
        *self.page_counters.entry(event.page.clone()).or_insert(0) += 1;
        *self
            .country_page_counters
            .entry((event.country.clone(), event.page.clone()))
            .or_insert(0) += 1;

        tracing::trace!(
            session_id = %event.session_id,
            page = %event.page,
            created,
            "Event recorded"
        );

        SessionActivity { view, created }
    }

    /// Consistent copy of the whole registry; durations are measured at `now`.
    pub fn snapshot_all(&self, now: DateTime<Utc>) -> RegistrySnapshot {
        let _gate = self.snapshot_gate.write();

        let mut sessions: Vec<Session> = self
            .sessions
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        sessions.sort_by(|a, b| {
            a.started_at
                .cmp(&b.started_at)
                .then_with(|| a.session_id.cmp(&b.session_id))
        });

        let page_counters: PageCounters = self
            .page_counters
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect();

        let mut country_page_counters: BTreeMap<String, PageCounters> = BTreeMap::new();
        for entry in self.country_page_counters.iter() {
            let (country, page) = entry.key();
            country_page_counters
                .entry(country.clone())
                .or_default()
                .add(page, *entry.value());
        }

        RegistrySnapshot {
            sessions,
            page_counters,
            country_page_counters,
            total_today: self.total_today.load(Ordering::Relaxed),
            taken_at: now,
        }
    }

    /// View of a single session.
    #[cfg(test)]
    pub(crate) fn session(
        &self,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> Option<crate::domain::SessionView> {
        self.sessions.get(session_id).map(|s| s.view(now))
    }

    /// Number of tracked sessions
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Distinct sessions seen since startup
    pub fn total_today(&self) -> u64 {
        self.total_today.load(Ordering::Relaxed)
    }
}
