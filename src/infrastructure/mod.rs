//! Infrastructure Layer
//!
//! In-memory implementations backing the application services.
//!
//! - **registry**: visitor sessions and counters
//! - **broadcast**: dashboard fan-out
//! - **metrics**: Prometheus metrics

pub mod broadcast;
pub mod metrics;
pub mod registry;
