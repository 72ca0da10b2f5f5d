//! Stats Service
//!
//! Read side of the registry: aggregate statistics on demand.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::services::stats_aggregator;
use crate::domain::{StatsFilter, StatsSnapshot};
use crate::infrastructure::registry::SessionRegistry;

/// Answers stats queries from dashboards and the HTTP API.
#[derive(Clone)]
pub struct StatsService {
    registry: Arc<SessionRegistry>,
}

impl StatsService {
    pub fn new(registry: Arc<SessionRegistry>) -> Self {
        Self { registry }
    }

    /// Unfiltered statistics as of now
    pub fn snapshot(&self) -> StatsSnapshot {
        stats_aggregator::compute(&self.registry.snapshot_all(Utc::now()))
    }

    /// Statistics restricted by `filter`.
    ///
    /// An unrestricted filter yields the same result as [`Self::snapshot`].
    pub fn detailed_stats(&self, filter: &StatsFilter) -> StatsSnapshot {
        let snapshot = self.registry.snapshot_all(Utc::now());
        if filter.is_unrestricted() {
            stats_aggregator::compute(&snapshot)
        } else {
            stats_aggregator::compute_filtered(&snapshot, filter)
        }
    }
}
