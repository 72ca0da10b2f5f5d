//! Domain Services
//!
//! Stateless domain logic that spans several entities.

pub mod stats_aggregator;
