//! Single-feature evaluation pipeline.
//!
//! Whatever sources a feature uses, its result is built here: annotation
//! verdict first, model verdict second, folded by a [`MergePolicy`].

use tracing::warn;

use abcd_annotations::Detection;
use abcd_models::{EvaluationMethod, FeatureDefinition, FeatureEvaluationResult, ModelVerdict};

use crate::merge::MergePolicy;

/// Sources that judge a feature in this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EvaluationStrategy {
    Annotations,
    Llm,
    Both,
}

impl EvaluationStrategy {
    /// Strategy for `def` under the global source switches.
    ///
    /// Returns `None` when none of the feature's sources is enabled.
    pub fn resolve(def: &FeatureDefinition, use_annotations: bool, use_llms: bool) -> Option<Self> {
        def.method
            .restrict(use_annotations, use_llms)
            .map(|method| match method {
                EvaluationMethod::Annotations => EvaluationStrategy::Annotations,
                EvaluationMethod::Llm => EvaluationStrategy::Llm,
                EvaluationMethod::Both => EvaluationStrategy::Both,
            })
    }

    pub fn uses_annotations(&self) -> bool {
        matches!(self, EvaluationStrategy::Annotations | EvaluationStrategy::Both)
    }

    pub fn uses_llm(&self) -> bool {
        matches!(self, EvaluationStrategy::Llm | EvaluationStrategy::Both)
    }
}

/// Build the result for one feature from whatever verdicts were produced.
pub fn evaluate_feature(
    def: &FeatureDefinition,
    strategy: EvaluationStrategy,
    detection: Option<&Detection>,
    verdict: Option<&ModelVerdict>,
    policy: MergePolicy,
) -> FeatureEvaluationResult {
    let mut result = FeatureEvaluationResult::pending(def);

    if strategy.uses_annotations() {
        match detection {
            Some(detection) => policy.apply_annotation(&mut result, detection),
            None => return FeatureEvaluationResult::error(def, "no annotation detector registered"),
        }
    }

    if strategy.uses_llm() {
        match verdict {
            Some(verdict) => policy.apply_model(&mut result, verdict),
            None if strategy == EvaluationStrategy::Llm => {
                return FeatureEvaluationResult::error(def, "model returned no verdict");
            }
            None => {
                warn!(feature_id = %def.id, "Model returned no verdict, keeping annotation result");
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use abcd_models::{feature_definition, EvaluationSource, FeatureId};

    fn def(id: FeatureId) -> FeatureDefinition {
        *feature_definition(id).unwrap()
    }

    fn verdict(detected: bool) -> ModelVerdict {
        ModelVerdict {
            id: "b_brand_visuals".to_string(),
            detected,
            confidence_score: Some(0.6),
            rationale: "logo on screen".to_string(),
            evidence: String::new(),
            strengths: String::new(),
            weaknesses: String::new(),
        }
    }

    #[test]
    fn test_resolve_applies_switches() {
        let both = def(FeatureId::BrandVisuals);
        assert_eq!(EvaluationStrategy::resolve(&both, true, true), Some(EvaluationStrategy::Both));
        assert_eq!(
            EvaluationStrategy::resolve(&both, false, true),
            Some(EvaluationStrategy::Llm)
        );
        assert_eq!(
            EvaluationStrategy::resolve(&both, true, false),
            Some(EvaluationStrategy::Annotations)
        );

        let annotations_only = def(FeatureId::DynamicStart);
        assert_eq!(EvaluationStrategy::resolve(&annotations_only, false, true), None);
    }

    #[test]
    fn test_both_merges_sources() {
        let result = evaluate_feature(
            &def(FeatureId::BrandVisuals),
            EvaluationStrategy::Both,
            Some(&Detection::miss("no logo")),
            Some(&verdict(true)),
            MergePolicy::MonotonicOr,
        );
        assert!(result.detected);
        assert!(!result.is_error());
        assert_eq!(result.sources, vec![EvaluationSource::Annotations, EvaluationSource::Llm]);
    }

    #[test]
    fn test_both_without_verdict_keeps_annotation_result() {
        let result = evaluate_feature(
            &def(FeatureId::BrandVisuals),
            EvaluationStrategy::Both,
            Some(&Detection::hit("logo")),
            None,
            MergePolicy::MonotonicOr,
        );
        assert!(result.detected);
        assert!(result.confidence.is_none());
    }

    #[test]
    fn test_llm_without_verdict_is_error() {
        let result = evaluate_feature(
            &def(FeatureId::BrandVisuals),
            EvaluationStrategy::Llm,
            None,
            None,
            MergePolicy::MonotonicOr,
        );
        assert!(result.is_error());
        assert!(!result.detected);
    }

    #[test]
    fn test_annotations_ignore_verdict() {
        let result = evaluate_feature(
            &def(FeatureId::QuickPacing),
            EvaluationStrategy::Annotations,
            Some(&Detection::miss("slow")),
            Some(&verdict(true)),
            MergePolicy::MonotonicOr,
        );
        assert!(!result.detected);
        assert_eq!(result.sources, vec![EvaluationSource::Annotations]);
    }
}
