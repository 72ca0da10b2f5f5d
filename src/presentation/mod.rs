//! Presentation Layer
//!
//! HTTP routes, middleware and the WebSocket push channel.

pub mod http;
pub mod middleware;
pub mod websocket;
