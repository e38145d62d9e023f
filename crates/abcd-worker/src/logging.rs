//! Structured assessment logging utilities.

use tracing::{error, info, warn, Span};

use abcd_models::AssessmentId;

/// Logger for one video's assessment lifecycle.
///
/// Every event carries the assessment id and video URI.
#[derive(Debug, Clone)]
pub struct AssessmentLogger {
    assessment_id: String,
    video_uri: String,
}

impl AssessmentLogger {
    pub fn new(assessment_id: &AssessmentId, video_uri: &str) -> Self {
        Self {
            assessment_id: assessment_id.to_string(),
            video_uri: video_uri.to_string(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            assessment_id = %self.assessment_id,
            video_uri = %self.video_uri,
            "Assessment started: {}", message
        );
    }

    pub fn log_progress(&self, message: &str) {
        info!(
            assessment_id = %self.assessment_id,
            video_uri = %self.video_uri,
            "Assessment progress: {}", message
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            assessment_id = %self.assessment_id,
            video_uri = %self.video_uri,
            "Assessment warning: {}", message
        );
    }

    pub fn log_error(&self, message: &str) {
        error!(
            assessment_id = %self.assessment_id,
            video_uri = %self.video_uri,
            "Assessment error: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            assessment_id = %self.assessment_id,
            video_uri = %self.video_uri,
            "Assessment completed: {}", message
        );
    }

    pub fn assessment_id(&self) -> &str {
        &self.assessment_id
    }

    pub fn video_uri(&self) -> &str {
        &self.video_uri
    }

    /// Span covering the whole assessment of this video.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "assessment",
            assessment_id = %self.assessment_id,
            video_uri = %self.video_uri
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assessment_logger_creation() {
        let id = AssessmentId::new();
        let logger = AssessmentLogger::new(&id, "gs://bucket/ad.mp4");

        assert_eq!(logger.assessment_id(), id.to_string());
        assert_eq!(logger.video_uri(), "gs://bucket/ad.mp4");
    }
}
