// Prometheus metrics registry and collectors

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec_with_registry, register_histogram_vec_with_registry, CounterVec,
    Encoder, HistogramOpts, HistogramVec, Opts, Registry, TextEncoder,
};

lazy_static! {
    /// Global Prometheus registry
    pub static ref REGISTRY: Registry = Registry::new();

    // ============================================================================
    // REQUEST METRICS
    // ============================================================================

    /// Analyze requests by final status code
    pub static ref ANALYZE_REQUESTS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("analyze_requests_total", "Total /analyze requests"),
        &["status_code"],
        REGISTRY
    ).unwrap();

    /// Requests turned away before reaching the provider
    pub static ref REJECTIONS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("rejections_total", "Requests rejected by validation or access control"),
        &["reason"], // reason: invalid_request, unauthorized, rate_limited
        REGISTRY
    ).unwrap();

    // ============================================================================
    // UPSTREAM METRICS
    // ============================================================================

    /// Provider calls by HTTP status (or transport_error)
    pub static ref UPSTREAM_CALLS: CounterVec = register_counter_vec_with_registry!(
        Opts::new("upstream_calls_total", "Total inference provider calls"),
        &["status_code"],
        REGISTRY
    ).unwrap();

    /// Provider call duration
    pub static ref UPSTREAM_DURATION: HistogramVec = register_histogram_vec_with_registry!(
        HistogramOpts::new("upstream_duration_seconds", "Inference provider call duration")
            .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0, 120.0]),
        &["model"],
        REGISTRY
    ).unwrap();
}

/// Gather all metrics and return as Prometheus text format
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = REGISTRY.gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8_lossy(&buffer).into_owned()
}
