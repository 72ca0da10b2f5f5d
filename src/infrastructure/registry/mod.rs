//! Session Registry
//!
//! In-memory storage for visitor sessions and counters.

mod session_registry;

pub use session_registry::SessionRegistry;
