//! Broadcast Hub
//!
//! Fans push messages out to every connected dashboard.
//!
//! Each dashboard owns a bounded outgoing queue drained by its connection's
//! writer task. Publishing only ever calls `try_send`, so it never waits on
//! a socket. A dashboard whose queue is full or closed is dropped from the
//! hub (disconnect-on-overflow); dropping its sender ends the writer task,
//! which closes the socket.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::PushMessage;
use crate::infrastructure::metrics;

/// Serialized message as queued for a dashboard
pub type Payload = Arc<str>;

/// Why a message could not be queued for a dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("outgoing queue is full")]
    QueueFull,

    #[error("connection is closed")]
    Closed,
}

impl DeliveryError {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryError::QueueFull => "queue_full",
            DeliveryError::Closed => "closed",
        }
    }
}

/// One connected dashboard as seen by the hub.
struct Subscriber {
    tx: mpsc::Sender<Payload>,
}

impl Subscriber {
    fn deliver(&self, payload: Payload) -> Result<(), DeliveryError> {
        self.tx.try_send(payload).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryError::QueueFull,
            TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }
}

/// Identity of a subscription, handed to the connection that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberHandle {
    pub id: Uuid,
    pub connected_at: DateTime<Utc>,
}

/// Outcome of one publish call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Dashboards a delivery was attempted for
    pub attempted: usize,
    /// Dashboards the message was queued for
    pub delivered: usize,
    /// Dashboards dropped because they were unreachable
    pub dropped: usize,
}

/// Owns the set of connected dashboards.
pub struct BroadcastHub {
    subscribers: DashMap<Uuid, Arc<Subscriber>>,
    queue_capacity: usize,
}

impl BroadcastHub {
    /// Create a hub whose dashboards each buffer up to `queue_capacity`
    /// messages.
    pub fn new(queue_capacity: usize) -> Self {
        Self {
            subscribers: DashMap::new(),
            queue_capacity: queue_capacity.max(1),
        }
    }

    /// Register a dashboard.
    ///
    /// The returned receiver already holds the `user_connected` notice.
    pub fn subscribe(&self) -> (SubscriberHandle, mpsc::Receiver<Payload>) {
        let (tx, rx) = mpsc::channel(self.queue_capacity);
        let handle = SubscriberHandle {
            id: Uuid::new_v4(),
            connected_at: Utc::now(),
        };
        let subscriber = Arc::new(Subscriber { tx });

        // Queue the join notice before registering so it is always first.
        let total = self.subscribers.len() + 1;
        if let Some(payload) = encode(&PushMessage::dashboard_joined(total, handle.connected_at)) {
            let _ = subscriber.deliver(payload);
        }
        self.subscribers.insert(handle.id, subscriber);

        let count = self.subscribers.len();
        metrics::set_dashboards_connected(count);
        info!(subscriber_id = %handle.id, dashboards = count, "Dashboard subscribed");

        (handle, rx)
    }

    /// Remove a dashboard and tell the others.
    ///
    /// Returns `false` when the dashboard was already gone.
    pub fn unsubscribe(&self, id: &Uuid) -> bool {
        if self.subscribers.remove(id).is_none() {
            return false;
        }

        let remaining = self.subscribers.len();
        metrics::set_dashboards_connected(remaining);
        info!(subscriber_id = %id, dashboards = remaining, "Dashboard unsubscribed");

        self.publish(&PushMessage::dashboard_left(remaining));
        true
    }

    /// Queue `message` for every connected dashboard.
    pub fn publish(&self, message: &PushMessage) -> PublishReport {
        let Some(payload) = encode(message) else {
            return PublishReport::default();
        };
        metrics::record_push_message(message.kind());

        let (mut report, unreachable) = self.fan_out(&payload);
        report.dropped = unreachable.len();
        debug!(
            kind = message.kind(),
            attempted = report.attempted,
            delivered = report.delivered,
            dropped = report.dropped,
            "Published"
        );

        self.drop_unreachable(unreachable);
        report
    }

    /// Queue `message` for one dashboard only.
    pub fn send_to(&self, id: &Uuid, message: &PushMessage) -> bool {
        let Some(subscriber) = self.subscribers.get(id).map(|s| Arc::clone(s.value())) else {
            return false;
        };
        let Some(payload) = encode(message) else {
            return false;
        };

        match subscriber.deliver(payload) {
            Ok(()) => true,
            Err(reason) => {
                self.drop_unreachable(vec![(*id, reason)]);
                false
            }
        }
    }

    /// Get subscriber count
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    #[cfg(test)]
    pub(crate) fn is_subscribed(&self, id: &Uuid) -> bool {
        self.subscribers.contains_key(id)
    }

    fn fan_out(&self, payload: &Payload) -> (PublishReport, Vec<(Uuid, DeliveryError)>) {
        let mut report = PublishReport::default();
        let mut unreachable = Vec::new();

        for entry in self.subscribers.iter() {
            report.attempted += 1;
            match entry.value().deliver(Arc::clone(payload)) {
                Ok(()) => report.delivered += 1,
                Err(reason) => unreachable.push((*entry.key(), reason)),
            }
        }

        (report, unreachable)
    }

    /// Remove unreachable dashboards, then announce the new count. The
    /// announcement can itself find more unreachable dashboards; repeat
    /// until none are left.
    fn drop_unreachable(&self, mut unreachable: Vec<(Uuid, DeliveryError)>) {
        while !unreachable.is_empty() {
            let mut removed = 0;
            for (id, reason) in unreachable.drain(..) {
                if self.subscribers.remove(&id).is_some() {
                    removed += 1;
                    metrics::record_subscriber_dropped(reason.as_str());
                    warn!(subscriber_id = %id, reason = %reason, "Dropping unreachable dashboard");
                }
            }
            if removed == 0 {
                break;
            }

            let remaining = self.subscribers.len();
            metrics::set_dashboards_connected(remaining);
            let Some(payload) = encode(&PushMessage::dashboard_left(remaining)) else {
                break;
            };
            unreachable = self.fan_out(&payload).1;
        }
    }
}

fn encode(message: &PushMessage) -> Option<Payload> {
    match serde_json::to_string(message) {
        Ok(json) => Some(Arc::from(json)),
        Err(e) => {
            warn!(kind = message.kind(), error = %e, "Failed to serialize push message");
            None
        }
    }
}
