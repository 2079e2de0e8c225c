//! Metrics collection and exposition.
//!
//! # Metrics
//! - `router_requests_total` (counter): dispatches by outcome (`matched`, `exhausted`, `error`)
//! - `router_dispatch_duration_seconds` (histogram): time spent routing one request
//! - `router_pattern_cache_total` (counter): pattern lookups by result (`hit`, `miss`)
//! - `router_pattern_cache_entries` (gauge): compiled patterns held by the last-updated cache
//! - `router_config_reloads_total` (counter): route table swaps

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one dispatch and its duration.
pub fn record_dispatch(outcome: &'static str, start: Instant) {
    counter!("router_requests_total", "outcome" => outcome).increment(1);
    histogram!("router_dispatch_duration_seconds").record(start.elapsed().as_secs_f64());
}

pub fn record_pattern_cache(hit: bool) {
    let result = if hit { "hit" } else { "miss" };
    counter!("router_pattern_cache_total", "result" => result).increment(1);
}

pub fn record_pattern_cache_size(entries: usize) {
    gauge!("router_pattern_cache_entries").set(entries as f64);
}

pub fn record_reload() {
    counter!("router_config_reloads_total").increment(1);
}
