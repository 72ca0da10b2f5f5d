//! HTTP API Tests

mod event_tests;
mod health_tests;
mod stats_tests;
mod websocket_tests;
