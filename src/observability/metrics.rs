//! Metrics collection and exposition.
//!
//! # Responsibilities
//! - Define application metrics (requests, latency, database connections)
//! - Expose Prometheus-compatible metrics endpoint
//!
//! # Metrics
//! - `app_requests_total` (counter): total requests by method, route, status
//! - `app_request_duration_seconds` (histogram): latency distribution
//! - `app_database_connections` (gauge): booted connection profiles
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade, so it is a no-op until an
//!   exporter is installed
//! - Route label is the matched pattern, never the raw path

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus exporter with its own HTTP listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a completed HTTP request.
pub fn record_request(method: &str, status: u16, route: &str, start: Instant) {
    let status = status.to_string();
    counter!(
        "app_requests_total",
        "method" => method.to_string(),
        "status" => status.clone(),
        "route" => route.to_string()
    )
    .increment(1);
    histogram!(
        "app_request_duration_seconds",
        "method" => method.to_string(),
        "status" => status,
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record how many connection profiles are booted.
pub fn record_connections(count: usize) {
    gauge!("app_database_connections").set(count as f64);
}
