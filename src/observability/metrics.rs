//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): inbound actions by name, status
//! - `proxy_request_duration_seconds` (histogram): action latency
//! - `proxy_upstream_retries_total` (counter): rate-limit retries issued
//! - `proxy_host_cache_lookups_total` (counter): cache hits/misses by result
//!
//! # Design Decisions
//! - Low-overhead metric updates (atomic operations)
//! - Prometheus exposition on a separate bind address, off by default

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one handled action.
pub fn record_action(action: &str, status: u16, start: Instant) {
    let labels = [
        ("action", action.to_string()),
        ("status", status.to_string()),
    ];
    counter!("proxy_requests_total", &labels).increment(1);
    histogram!("proxy_request_duration_seconds", &labels).record(start.elapsed().as_secs_f64());
}

/// Record one rate-limit retry against the upstream.
pub fn record_upstream_retry() {
    counter!("proxy_upstream_retries_total").increment(1);
}

/// Record a host-cache lookup outcome.
pub fn record_host_cache(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("proxy_host_cache_lookups_total", "result" => result).increment(1);
}
