//! # Domain Entities
//!
//! - **VisitorEvent**: a validated activity report from a client application
//! - **Session**: one visitor's journey, keyed by session identifier
//! - **RegistrySnapshot / StatsSnapshot**: consistent copies of registry state
//!   and the aggregate statistics derived from them
//! - **PushMessage**: everything the server pushes to dashboards

mod event;
mod push;
mod session;
mod stats;

pub use event::{parse_timestamp, VisitorEvent};
pub use push::{Alert, DashboardJoined, DashboardLeft, PushMessage, VisitorUpdate};
pub use session::{Session, SessionActivity, SessionView};
pub use stats::{RegistrySnapshot, StatsSnapshot};
