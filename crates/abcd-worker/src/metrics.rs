//! Assessment metrics.
//!
//! - Task counters by group and status
//! - Detected-feature counters by source
//! - Assessment counters and latency

use metrics::{counter, histogram};

use abcd_models::FeatureEvaluationResult;

/// Metric name constants for consistency.
pub mod names {
    /// Evaluation tasks run, by group and status.
    pub const TASKS_TOTAL: &str = "abcd_tasks_total";

    /// Detected features, by feature id and contributing source.
    pub const FEATURES_DETECTED_TOTAL: &str = "abcd_features_detected_total";

    /// Video assessments, by status.
    pub const ASSESSMENTS_TOTAL: &str = "abcd_assessments_total";

    /// Wall time of one video assessment in seconds.
    pub const ASSESSMENT_DURATION_SECONDS: &str = "abcd_assessment_duration_seconds";
}

/// Record the outcome of one evaluation task.
pub fn record_task(group: &str, succeeded: bool) {
    counter!(
        names::TASKS_TOTAL,
        "group" => group.to_string(),
        "status" => if succeeded { "ok" } else { "error" }
    )
    .increment(1);
}

/// Count a detected feature once per source that took part in it.
pub fn record_detection(result: &FeatureEvaluationResult) {
    if !result.detected {
        return;
    }
    for source in &result.sources {
        counter!(
            names::FEATURES_DETECTED_TOTAL,
            "feature_id" => result.feature_id.as_str(),
            "source" => source.as_str()
        )
        .increment(1);
    }
}

/// Record a finished video assessment.
pub fn record_assessment(status: &'static str, duration_ms: f64) {
    counter!(names::ASSESSMENTS_TOTAL, "status" => status).increment(1);
    histogram!(names::ASSESSMENT_DURATION_SECONDS).record(duration_ms / 1000.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names() {
        assert!(names::TASKS_TOTAL.starts_with("abcd_"));
        assert!(names::FEATURES_DETECTED_TOTAL.contains("detected"));
        assert!(names::ASSESSMENT_DURATION_SECONDS.ends_with("_seconds"));
    }
}
