//! Prometheus Metrics Module
//!
//! Provides application-wide metrics collection using Prometheus.
//!
//! # Metrics Collected
//! - HTTP request counts and latency by method, path, and status
//! - Ingested events by outcome
//! - Push messages by type and dropped dashboards by reason
//! - Connected dashboards and tracked sessions gauges

use once_cell::sync::Lazy;
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
};

const NAMESPACE: &str = "visitor_analytics";

/// Global metrics registry
pub static REGISTRY: Lazy<Registry> = Lazy::new(|| {
    let registry = Registry::new();
    register_metrics(&registry);
    registry
});

/// HTTP request counter - tracks total requests by method, path, and status code
pub static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests").namespace(NAMESPACE),
        &["method", "path", "status"],
    )
    .expect("Failed to create HTTP_REQUESTS_TOTAL metric")
});

/// HTTP request latency histogram - tracks request duration in seconds
pub static HTTP_REQUEST_DURATION_SECONDS: Lazy<HistogramVec> = Lazy::new(|| {
    let buckets = vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];
    HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        )
        .namespace(NAMESPACE)
        .buckets(buckets),
        &["method", "path"],
    )
    .expect("Failed to create HTTP_REQUEST_DURATION_SECONDS metric")
});

/// Ingested events by outcome ("accepted", "rejected")
pub static EVENTS_INGESTED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("events_ingested_total", "Visitor events received").namespace(NAMESPACE),
        &["outcome"],
    )
    .expect("Failed to create EVENTS_INGESTED_TOTAL metric")
});

/// Published push messages by type
pub static PUSH_MESSAGES_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new("push_messages_total", "Messages published to dashboards").namespace(NAMESPACE),
        &["type"],
    )
    .expect("Failed to create PUSH_MESSAGES_TOTAL metric")
});

/// Dashboards dropped during delivery by reason ("queue_full", "closed")
pub static SUBSCRIBERS_DROPPED_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "subscribers_dropped_total",
            "Dashboards dropped because they could not keep up or went away",
        )
        .namespace(NAMESPACE),
        &["reason"],
    )
    .expect("Failed to create SUBSCRIBERS_DROPPED_TOTAL metric")
});

/// Connected dashboards gauge
pub static DASHBOARDS_CONNECTED: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::with_opts(
        Opts::new("dashboards_connected", "Number of connected dashboards").namespace(NAMESPACE),
    )
    .expect("Failed to create DASHBOARDS_CONNECTED metric")
});

/// Tracked sessions gauge
pub static SESSIONS_TRACKED: Lazy<IntGauge> = Lazy::new(|| {
    IntGauge::with_opts(
        Opts::new("sessions_tracked", "Number of visitor sessions in memory").namespace(NAMESPACE),
    )
    .expect("Failed to create SESSIONS_TRACKED metric")
});

/// Register all metrics with the registry
fn register_metrics(registry: &Registry) {
    registry
        .register(Box::new(HTTP_REQUESTS_TOTAL.clone()))
        .expect("Failed to register HTTP_REQUESTS_TOTAL");
    registry
        .register(Box::new(HTTP_REQUEST_DURATION_SECONDS.clone()))
        .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");
    registry
        .register(Box::new(EVENTS_INGESTED_TOTAL.clone()))
        .expect("Failed to register EVENTS_INGESTED_TOTAL");
    registry
        .register(Box::new(PUSH_MESSAGES_TOTAL.clone()))
        .expect("Failed to register PUSH_MESSAGES_TOTAL");
    registry
        .register(Box::new(SUBSCRIBERS_DROPPED_TOTAL.clone()))
        .expect("Failed to register SUBSCRIBERS_DROPPED_TOTAL");
    registry
        .register(Box::new(DASHBOARDS_CONNECTED.clone()))
        .expect("Failed to register DASHBOARDS_CONNECTED");
    registry
        .register(Box::new(SESSIONS_TRACKED.clone()))
        .expect("Failed to register SESSIONS_TRACKED");
}

/// Collect and encode all metrics as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return String::new();
    }
    String::from_utf8_lossy(&buffer).into_owned()
}

/// Helper to record HTTP request metrics
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let status = status.to_string();
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[method, path, status.as_str()])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[method, path])
        .observe(duration_secs);
}

/// Helper to record the outcome of an ingestion call
pub fn record_event_ingested(outcome: &str) {
    EVENTS_INGESTED_TOTAL.with_label_values(&[outcome]).inc();
}

/// Helper to record a published push message
pub fn record_push_message(kind: &str) {
    PUSH_MESSAGES_TOTAL.with_label_values(&[kind]).inc();
}

/// Helper to record a dashboard dropped during delivery
pub fn record_subscriber_dropped(reason: &str) {
    SUBSCRIBERS_DROPPED_TOTAL.with_label_values(&[reason]).inc();
}

/// Helper to update the connected dashboards gauge
pub fn set_dashboards_connected(count: usize) {
    DASHBOARDS_CONNECTED.set(count as i64);
}

/// Helper to update the tracked sessions gauge
pub fn set_sessions_tracked(count: usize) {
    SESSIONS_TRACKED.set(count as i64);
}
