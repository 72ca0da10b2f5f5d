//! WebSocket Push Channel
//!
//! Dashboards connect here to receive live updates and to query stats.

pub mod handler;
pub mod messages;
pub mod session;

pub use handler::ws_handler;
pub use messages::{parse_client_message, ClientMessage, MalformedQuery};
pub use session::SubscriberSession;
