//! Event Processor
//!
//! Entry point for ingestion: validates an event, applies it to the session
//! registry, and publishes the resulting updates to every dashboard.

use std::sync::Arc;

use chrono::{Duration, Utc};
use parking_lot::Mutex;
use tracing::debug;

use super::sampling::SamplingPolicy;
use crate::application::dto::IngestEventRequest;
use crate::config::MAX_RECENT_WINDOW_SECS;
use crate::domain::services::stats_aggregator;
use crate::domain::{PushMessage, VisitorEvent};
use crate::infrastructure::broadcast::BroadcastHub;
use crate::infrastructure::metrics;
use crate::infrastructure::registry::SessionRegistry;
use crate::shared::error::{AppError, FieldError};
use crate::shared::validation::validation_error;

/// Event processing errors
#[derive(Debug, thiserror::Error)]
pub enum EventError {
    #[error("Invalid event: {} field(s) rejected", .0.len())]
    InvalidEvent(Vec<FieldError>),
}

impl From<EventError> for AppError {
    fn from(error: EventError) -> Self {
        match error {
            EventError::InvalidEvent(fields) => validation_error(fields),
        }
    }
}

/// What happened to an accepted event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestOutcome {
    pub session_id: String,
    /// The event opened a new session
    pub new_session: bool,
    /// Dashboards the `visitor_update` was attempted for
    pub deliveries: usize,
    /// An alert was published as well
    pub alerted: bool,
}

/// Orchestrates registry mutation, aggregation and fan-out for each event.
pub struct EventProcessor {
    registry: Arc<SessionRegistry>,
    hub: Arc<BroadcastHub>,
    sampling: Arc<dyn SamplingPolicy>,
    recent_window: Duration,
    /// Held across record, snapshot and publish so each event's messages
    /// reflect exactly the events applied before it.
    publish_order: Mutex<()>,
}

impl EventProcessor {
    pub fn new(
        registry: Arc<SessionRegistry>,
        hub: Arc<BroadcastHub>,
        sampling: Arc<dyn SamplingPolicy>,
        recent_window_secs: u64,
    ) -> Self {
        // Clamped so the window always fits a chrono duration
        let window_secs = recent_window_secs.clamp(1, MAX_RECENT_WINDOW_SECS) as i64;
        Self {
            registry,
            hub,
            sampling,
            recent_window: Duration::seconds(window_secs),
            publish_order: Mutex::new(()),
        }
    }

    /// Validate and process a raw ingestion request.
    ///
    /// A rejected request leaves the registry untouched and publishes nothing.
    pub fn handle(&self, request: IngestEventRequest) -> Result<IngestOutcome, EventError> {
        let event = request.into_event().map_err(|fields| {
            metrics::record_event_ingested("rejected");
            debug!(errors = ?fields, "Event rejected");
            EventError::InvalidEvent(fields)
        })?;

        metrics::record_event_ingested("accepted");
        Ok(self.process(event))
    }

    /// Process an already validated event.
    pub fn process(&self, event: VisitorEvent) -> IngestOutcome {
        let _order = self.publish_order.lock();
        let activity = self.registry.record(&event);

        let now = Utc::now();
        let snapshot = self.registry.snapshot_all(now);
        let since = now.checked_sub_signed(self.recent_window).unwrap_or(now);
        let recent_visitors = snapshot.active_since(since);
        let stats = stats_aggregator::compute(&snapshot);
        metrics::set_sessions_tracked(stats.total_active);

        let session_id = event.session_id.clone();
        let alert = self.sampling.sample(&event, recent_visitors);

        let update = self.hub.publish(&PushMessage::visitor_update(event, stats));
        self.hub.publish(&PushMessage::SessionActivity(activity.view));
        let alerted = match alert {
            Some(alert) => {
                self.hub.publish(&PushMessage::Alert(alert));
                true
            }
            None => false,
        };

        debug!(
            session_id = %session_id,
            new_session = activity.created,
            dashboards = update.attempted,
            alerted,
            "Event processed"
        );

        IngestOutcome {
            session_id,
            new_session: activity.created,
            deliveries: update.attempted,
            alerted,
        }
    }
}
