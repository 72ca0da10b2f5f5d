//! Application Services
//!
//! Services that coordinate the registry, the aggregator and the hub.
//!
//! ## Available Services
//!
//! - **EventProcessor**: Validates events and publishes the resulting updates
//! - **StatsService**: Aggregate statistics on demand
//! - **SamplingPolicy**: Decides when an event also raises an alert

pub mod event_processor;
pub mod sampling;
pub mod stats_service;

pub use event_processor::{EventError, EventProcessor, IngestOutcome};
pub use sampling::{AlertTemplate, AlwaysSample, NeverSample, RandomSampling, SamplingPolicy};
pub use stats_service::StatsService;
