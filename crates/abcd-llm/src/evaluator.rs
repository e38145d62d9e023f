//! Model evaluator abstraction.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde::Serialize;

use abcd_models::{BrandContext, FeatureDefinition, FeatureId, ModelVerdict, VideoSegment};

use crate::config::GenerationSettings;
use crate::error::{LlmError, LlmResult};

/// Video the model is asked to watch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoReference {
    pub uri: String,
    pub segment: VideoSegment,
}

/// One model call: a group of features judged against one video reference.
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    pub features: Vec<FeatureDefinition>,
    pub video: VideoReference,
    pub brand: BrandContext,
    pub generation: GenerationSettings,
}

impl EvaluationRequest {
    pub fn new(features: Vec<FeatureDefinition>, video: VideoReference, brand: BrandContext) -> Self {
        Self {
            features,
            video,
            brand,
            generation: GenerationSettings::default(),
        }
    }

    pub fn with_generation(mut self, generation: GenerationSettings) -> Self {
        self.generation = generation;
        self
    }

    pub fn feature_ids(&self) -> Vec<FeatureId> {
        self.features.iter().map(|f| f.id).collect()
    }
}

/// Judges a group of features on a video with a multimodal model.
#[async_trait]
pub trait ModelEvaluator: Send + Sync {
    /// One verdict per feature the model answered for. Features the model
    /// skipped are simply missing from the result.
    async fn evaluate(&self, request: &EvaluationRequest) -> LlmResult<Vec<ModelVerdict>>;

    /// Evaluator name for logging.
    fn name(&self) -> &str;
}

/// Evaluator that replays canned verdicts, for offline runs and tests.
#[derive(Debug, Default)]
pub struct ScriptedEvaluator {
    verdicts: HashMap<FeatureId, ModelVerdict>,
    failing_segments: HashSet<VideoSegment>,
    calls: AtomicUsize,
}

impl ScriptedEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_verdict(mut self, id: FeatureId, detected: bool, rationale: &str) -> Self {
        self.verdicts.insert(
            id,
            ModelVerdict {
                id: id.as_str().to_string(),
                detected,
                confidence_score: Some(if detected { 0.9 } else { 0.1 }),
                rationale: rationale.to_string(),
                evidence: String::new(),
                strengths: String::new(),
                weaknesses: String::new(),
            },
        );
        self
    }

    /// Every request for `segment` is rejected.
    pub fn failing_on(mut self, segment: VideoSegment) -> Self {
        self.failing_segments.insert(segment);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelEvaluator for ScriptedEvaluator {
    async fn evaluate(&self, request: &EvaluationRequest) -> LlmResult<Vec<ModelVerdict>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.failing_segments.contains(&request.video.segment) {
            return Err(LlmError::from_http_status(
                400,
                format!("scripted failure for {}", request.video.segment),
            ));
        }

        Ok(request
            .features
            .iter()
            .filter_map(|f| self.verdicts.get(&f.id).cloned())
            .collect())
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abcd_models::feature_definition;

    fn request(segment: VideoSegment, ids: &[FeatureId]) -> EvaluationRequest {
        let features = ids
            .iter()
            .filter_map(|id| feature_definition(*id).copied())
            .collect();
        EvaluationRequest::new(
            features,
            VideoReference {
                uri: "gs://bucket/ad.mp4".to_string(),
                segment,
            },
            BrandContext::new("Google"),
        )
    }

    #[tokio::test]
    async fn test_scripted_evaluator_answers_requested_features_only() {
        let evaluator = ScriptedEvaluator::new()
            .with_verdict(FeatureId::Supers, true, "Text overlays throughout")
            .with_verdict(FeatureId::CallToActionText, false, "No end card");

        let verdicts = evaluator
            .evaluate(&request(VideoSegment::FullVideo, &[FeatureId::Supers, FeatureId::BrandVisuals]))
            .await
            .unwrap();

        assert_eq!(verdicts.len(), 1);
        assert_eq!(verdicts[0].id, "a_supers");
        assert!(verdicts[0].detected);
        assert_eq!(evaluator.calls(), 1);
    }

    #[tokio::test]
    async fn test_scripted_evaluator_failing_segment() {
        let evaluator = ScriptedEvaluator::new().failing_on(VideoSegment::First5SecsVideo);
        let err = evaluator
            .evaluate(&request(VideoSegment::First5SecsVideo, &[FeatureId::VisibleFace]))
            .await
            .unwrap_err();
        assert!(!err.is_retryable());
    }
}
