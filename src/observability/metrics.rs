//! Metrics collection and exposition.
//!
//! # Metrics
//! - `account_http_requests_total` (counter): requests by method, route, status
//! - `account_http_request_duration_seconds` (histogram): latency distribution
//! - `account_customer_lookups_total` (counter): remote lookups by outcome
//! - `account_customer_fallbacks_total` (counter): degraded account reads
//! - `account_circuit_breaker_state` (gauge): 0=closed, 1=open, 2=half-open
//! - `account_store_size` (gauge): accounts held by the in-memory store
//!
//! Without an installed recorder every call is a no-op.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];
    ::metrics::counter!("account_http_requests_total", &labels).increment(1);
    ::metrics::histogram!("account_http_request_duration_seconds", &labels)
        .record(start.elapsed().as_secs_f64());
}

pub fn record_customer_lookup(outcome: &'static str) {
    ::metrics::counter!("account_customer_lookups_total", "outcome" => outcome).increment(1);
}

pub fn record_fallback() {
    ::metrics::counter!("account_customer_fallbacks_total").increment(1);
}

pub fn record_breaker_state(name: &str, state: u8) {
    ::metrics::gauge!("account_circuit_breaker_state", "name" => name.to_string())
        .set(f64::from(state));
}

pub fn record_store_size(size: usize) {
    ::metrics::gauge!("account_store_size").set(size as f64);
}
