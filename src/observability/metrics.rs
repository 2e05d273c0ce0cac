//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gate_decisions_total` (counter): decisions by category, outcome
//! - `gate_identity_lookups_total` (counter): lookups by result
//! - `gate_identity_lookup_duration_seconds` (histogram): lookup latency
//! - `gate_upstream_requests_total` (counter): forwarded requests by status
//!
//! # Design Decisions
//! - `metrics` facade; recording is a no-op until an exporter is installed
//! - Prometheus exporter served on its own listener

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

use crate::access::Decision;
use crate::routing::RouteCategory;

pub const DECISIONS_TOTAL: &str = "gate_decisions_total";
pub const IDENTITY_LOOKUPS_TOTAL: &str = "gate_identity_lookups_total";
pub const IDENTITY_LOOKUP_DURATION: &str = "gate_identity_lookup_duration_seconds";
pub const UPSTREAM_REQUESTS_TOTAL: &str = "gate_upstream_requests_total";

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_decision(category: RouteCategory, decision: &Decision) {
    counter!(
        DECISIONS_TOTAL,
        "category" => category.as_str(),
        "outcome" => decision.outcome()
    )
    .increment(1);
}

/// `result` is `resolved` or `unavailable`.
pub fn record_identity_lookup(result: &'static str, started: Instant) {
    counter!(IDENTITY_LOOKUPS_TOTAL, "result" => result).increment(1);
    histogram!(IDENTITY_LOOKUP_DURATION).record(started.elapsed().as_secs_f64());
}

pub fn record_upstream(status: u16) {
    counter!(UPSTREAM_REQUESTS_TOTAL, "status" => status.to_string()).increment(1);
}
