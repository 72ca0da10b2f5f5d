//! Broadcast
//!
//! Fan-out of push messages to connected dashboards.

mod hub;

pub use hub::{BroadcastHub, DeliveryError, Payload, PublishReport, SubscriberHandle};
