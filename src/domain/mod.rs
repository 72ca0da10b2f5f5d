//! # Domain Layer
//!
//! Core types of the visitor analytics server, free of any transport or
//! storage concerns.
//!
//! ## Structure
//!
//! - **entities**: events, sessions, snapshots and push messages
//! - **value_objects**: page counters and stats filters
//! - **services**: the stats aggregator

pub mod entities;
pub mod services;
pub mod value_objects;

// Re-export commonly used types
pub use entities::*;
pub use value_objects::*;
