//! # Visitor Analytics Library
//!
//! Real-time visitor analytics server:
//! - HTTP ingestion of page-view events from tracked sites
//! - In-memory session registry with per-page counters
//! - WebSocket push channel fanning live updates out to dashboards
//! - Filtered stats queries over HTTP and WebSocket
//!
//! ## Architecture
//!
//! - **Domain Layer**: events, sessions, snapshots, push messages and the
//!   pure stats aggregator
//! - **Application Layer**: event processing, stats queries, alert sampling
//! - **Infrastructure Layer**: session registry, broadcast hub, metrics
//! - **Presentation Layer**: HTTP handlers and the WebSocket push channel
//!
//! ## Module Structure
//!
//! ```text
//! visitor_analytics/
//! +-- config/         Configuration management
//! +-- domain/         Entities, value objects, aggregator
//! +-- application/    Services and DTOs
//! +-- infrastructure/ Registry, broadcast hub, metrics
//! +-- presentation/   HTTP routes and WebSocket handlers
//! +-- shared/         Errors and validation helpers
//! ```

// Configuration module
pub mod config;

// Domain layer
pub mod domain;

// Application layer
pub mod application;

// Infrastructure layer
pub mod infrastructure;

// Presentation layer - HTTP and WebSocket handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
