//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): relayed requests by route, status
//! - `relay_upstream_duration_seconds` (histogram): time to upstream headers
//! - `relay_side_calls_total` (counter): mainframe side-calls by outcome
//! - `relay_identities_minted_total` (counter): identity cookies issued
//! - `relay_bids_total` (counter): mock bids served
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Prometheus endpoint only when enabled in config

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a relayed request and its upstream latency.
pub fn record_request(route: &'static str, status: u16, start: Instant) {
    counter!("relay_requests_total", "route" => route, "status" => status.to_string())
        .increment(1);
    histogram!("relay_upstream_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_side_call(outcome: &'static str) {
    counter!("relay_side_calls_total", "outcome" => outcome).increment(1);
}

pub fn record_identity_minted() {
    counter!("relay_identities_minted_total").increment(1);
}

pub fn record_bid() {
    counter!("relay_bids_total").increment(1);
}
