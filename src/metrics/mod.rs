// Metrics module for Prometheus observability

mod registry;

pub use registry::{gather_metrics, ANALYZE_REQUESTS, REJECTIONS, UPSTREAM_CALLS, UPSTREAM_DURATION};

/// Helper to record the outcome of an /analyze request
pub fn record_analyze(status_code: u16) {
    ANALYZE_REQUESTS
        .with_label_values(&[&status_code.to_string()])
        .inc();
}

/// Helper to record a request rejected before the provider call
pub fn record_rejection(reason: &str) {
    REJECTIONS.with_label_values(&[reason]).inc();
}

/// Helper to record provider call metrics
pub fn record_upstream_call(status: &str) {
    UPSTREAM_CALLS.with_label_values(&[status]).inc();
}

pub fn observe_upstream_duration(model: &str, duration_secs: f64) {
    UPSTREAM_DURATION
        .with_label_values(&[model])
        .observe(duration_secs);
}
