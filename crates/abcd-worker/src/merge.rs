//! Combining annotation and model verdicts into one result.

use abcd_annotations::Detection;
use abcd_models::{EvaluationSource, FeatureEvaluationResult, ModelVerdict};

/// How verdicts from several sources combine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MergePolicy {
    /// A feature is detected when any source detects it. A later negative
    /// verdict never clears an earlier positive one.
    #[default]
    MonotonicOr,
}

impl MergePolicy {
    /// Fold an annotation detection into `result`.
    pub fn apply_annotation(&self, result: &mut FeatureEvaluationResult, detection: &Detection) {
        match self {
            MergePolicy::MonotonicOr => {
                result.detected |= detection.detected;
                append_line(&mut result.evidence, &detection.evidence);
                push_source(result, EvaluationSource::Annotations);
            }
        }
    }

    /// Fold a model verdict into `result`.
    pub fn apply_model(&self, result: &mut FeatureEvaluationResult, verdict: &ModelVerdict) {
        match self {
            MergePolicy::MonotonicOr => {
                result.detected |= verdict.detected;
                if verdict.confidence_score.is_some() {
                    result.confidence = verdict.confidence_score;
                }
                append_line(&mut result.rationale, &verdict.rationale);
                append_line(&mut result.evidence, &verdict.evidence);
                append_line(&mut result.strengths, &verdict.strengths);
                append_line(&mut result.weaknesses, &verdict.weaknesses);
                push_source(result, EvaluationSource::Llm);
            }
        }
    }
}

fn append_line(target: &mut String, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    if !target.is_empty() {
        target.push('\n');
    }
    target.push_str(text);
}

fn push_source(result: &mut FeatureEvaluationResult, source: EvaluationSource) {
    if !result.sources.contains(&source) {
        result.sources.push(source);
    }
}
