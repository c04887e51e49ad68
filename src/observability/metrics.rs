//! Metrics collection and exposition.
//!
//! # Metrics
//! - `config_client_requests_total` (counter): requests by path, status
//! - `config_client_request_duration_seconds` (histogram): latency distribution
//! - `config_client_refresh_total` (counter): refreshes by outcome
//!   (`changed`, `unchanged`, `failure`)
//! - `config_client_message_loaded` (gauge): 1 once a value is held, else 0
//!
//! Without an installed recorder every call here is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(path: &str, status: u16, start: Instant) {
    counter!(
        "config_client_requests_total",
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!(
        "config_client_request_duration_seconds",
        "path" => path.to_string(),
        "status" => status.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_refresh(outcome: &'static str) {
    counter!("config_client_refresh_total", "outcome" => outcome).increment(1);
}

pub fn set_message_loaded(loaded: bool) {
    gauge!("config_client_message_loaded").set(if loaded { 1.0 } else { 0.0 });
}
