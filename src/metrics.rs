//! Prometheus metrics for report traffic and request latency.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// HTTP request latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";
/// Accepted battery reports counter metric name.
pub const METRIC_REPORTS_ACCEPTED: &str = "battery_reports_accepted_total";
/// Rejected battery reports counter metric name.
pub const METRIC_REPORTS_REJECTED: &str = "battery_reports_rejected_total";
/// Battery report reads counter metric name.
pub const METRIC_FETCHES: &str = "battery_fetches_total";
/// Liveness probes counter metric name.
pub const METRIC_PROBES: &str = "liveness_probes_total";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP request latency in milliseconds"
    );

    describe_counter!(
        METRIC_REPORTS_ACCEPTED,
        "Total number of battery reports stored"
    );
    describe_counter!(
        METRIC_REPORTS_REJECTED,
        "Total number of battery reports rejected as invalid"
    );
    describe_counter!(METRIC_FETCHES, "Total number of battery report reads");
    describe_counter!(METRIC_PROBES, "Total number of liveness probes");

    debug!("Metrics initialized");
}

/// Install the global Prometheus recorder and register descriptions.
pub fn install_prometheus() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Increment accepted reports counter.
pub fn inc_reports_accepted() {
    counter!(METRIC_REPORTS_ACCEPTED).increment(1);
}

/// Increment rejected reports counter.
pub fn inc_reports_rejected() {
    counter!(METRIC_REPORTS_REJECTED).increment(1);
}

/// Increment report reads counter.
pub fn inc_fetches() {
    counter!(METRIC_FETCHES).increment(1);
}

/// Increment liveness probes counter.
pub fn inc_probes() {
    counter!(METRIC_PROBES).increment(1);
}

/// RAII guard for timing requests.
/// Automatically records latency when dropped.
pub struct LatencyTimer {
    start: Instant,
    endpoint: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given endpoint.
    pub fn new(endpoint: &'static str) -> Self {
        Self {
            start: Instant::now(),
            endpoint,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        histogram!(METRIC_HTTP_REQUEST_LATENCY, "endpoint" => self.endpoint)
            .record(self.elapsed_ms());
    }
}

/// Create a latency timer for an HTTP endpoint.
pub fn timer_http(endpoint: &'static str) -> LatencyTimer {
    LatencyTimer::new(endpoint)
}
