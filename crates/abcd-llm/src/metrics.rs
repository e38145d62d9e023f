//! Model evaluation metrics.
//!
//! - Request counters by model and status
//! - Latency histograms
//! - Retry counters

use metrics::{counter, histogram};

/// Metric name constants for consistency.
pub mod names {
    /// Total model requests by model and status.
    pub const REQUESTS_TOTAL: &str = "abcd_llm_requests_total";

    /// Total retry attempts by operation.
    pub const RETRIES_TOTAL: &str = "abcd_llm_retries_total";

    /// Request latency in seconds by model.
    pub const LATENCY_SECONDS: &str = "abcd_llm_latency_seconds";
}

/// Record metrics for a completed model request.
pub fn record_request(model: &str, status: u16, latency_ms: f64) {
    counter!(
        names::REQUESTS_TOTAL,
        "model" => model.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "model" => model.to_string()
    )
    .record(latency_ms / 1000.0);
}

/// Record a retry attempt.
pub fn record_retry(operation: &str) {
    counter!(
        names::RETRIES_TOTAL,
        "operation" => operation.to_string()
    )
    .increment(1);
}
