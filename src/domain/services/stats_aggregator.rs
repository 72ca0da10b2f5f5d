//! Stats Aggregator
//!
//! Derives [`StatsSnapshot`]s from registry snapshots. Pure functions: same
//! input, same output, no side effects.

use crate::domain::entities::{RegistrySnapshot, SessionView, StatsSnapshot};
use crate::domain::value_objects::{PageCounters, StatsFilter};

/// Stats over the whole registry.
pub fn compute(snapshot: &RegistrySnapshot) -> StatsSnapshot {
    compute_filtered(snapshot, &StatsFilter::default())
}

/// Stats narrowed by `filter`.
///
/// Sessions are kept when they match the filter. Page counters are limited
/// to the requested page and, with a country restriction, to visits reported
/// from that country. `total_today` is always registry-wide.
pub fn compute_filtered(snapshot: &RegistrySnapshot, filter: &StatsFilter) -> StatsSnapshot {
    let sessions: Vec<SessionView> = snapshot
        .sessions
        .iter()
        .filter(|session| filter.matches(session))
        .map(|session| session.view(snapshot.taken_at))
        .collect();

    let by_country = match filter.country() {
        None => snapshot.page_counters.clone(),
        Some(_) => {
            let mut merged = PageCounters::new();
            snapshot
                .country_page_counters
                .iter()
                .filter(|(country, _)| filter.matches_country(country))
                .for_each(|(_, counters)| merged.merge(counters));
            merged
        }
    };

    let pages_visited = match filter.page() {
        Some(page) => by_country.only(page),
        None => by_country,
    };

    StatsSnapshot {
        total_active: sessions.len(),
        total_today: snapshot.total_today,
        pages_visited,
        sessions,
    }
}
