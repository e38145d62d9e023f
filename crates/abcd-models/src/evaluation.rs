//! Feature evaluation results and video assessments.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::feature::{FeatureCategory, FeatureDefinition, FeatureId};

/// Signal source that contributed to a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationSource {
    Annotations,
    Llm,
}

impl EvaluationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvaluationSource::Annotations => "annotations",
            EvaluationSource::Llm => "llm",
        }
    }
}

impl fmt::Display for EvaluationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a feature was actually evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum EvaluationOutcome {
    #[default]
    Evaluated,
    Error { message: String },
}

/// Verdict for one feature of one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FeatureEvaluationResult {
    pub feature_id: FeatureId,
    pub name: String,
    pub category: FeatureCategory,
    pub detected: bool,
    /// Model confidence, present only when the model contributed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default)]
    pub rationale: String,
    #[serde(default)]
    pub evidence: String,
    #[serde(default)]
    pub strengths: String,
    #[serde(default)]
    pub weaknesses: String,
    #[serde(default)]
    pub sources: Vec<EvaluationSource>,
    #[serde(default)]
    pub outcome: EvaluationOutcome,
}

impl FeatureEvaluationResult {
    /// Undetected result with no evidence yet.
    pub fn pending(def: &FeatureDefinition) -> Self {
        Self {
            feature_id: def.id,
            name: def.name.to_string(),
            category: def.category,
            detected: false,
            confidence: None,
            rationale: String::new(),
            evidence: String::new(),
            strengths: String::new(),
            weaknesses: String::new(),
            sources: Vec::new(),
            outcome: EvaluationOutcome::Evaluated,
        }
    }

    /// Result recording that evaluation itself failed.
    pub fn error(def: &FeatureDefinition, message: impl Into<String>) -> Self {
        Self {
            outcome: EvaluationOutcome::Error {
                message: message.into(),
            },
            ..Self::pending(def)
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, EvaluationOutcome::Error { .. })
    }
}

/// Raw per-feature verdict returned by the multimodal model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ModelVerdict {
    pub id: String,
    #[serde(deserialize_with = "lenient_bool")]
    #[schemars(with = "bool")]
    pub detected: bool,
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub rationale: String,
    #[serde(default)]
    pub evidence: String,
    #[serde(default)]
    pub strengths: String,
    #[serde(default)]
    pub weaknesses: String,
}

/// Accepts JSON booleans as well as `"true"`/`"True"` strings.
fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        Str(String),
    }

    Ok(match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(value) => value,
        BoolOrString::Str(value) => value.trim().eq_ignore_ascii_case("true"),
    })
}

/// Unique identifier for an assessment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct AssessmentId(pub String);

impl AssessmentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AssessmentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AssessmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AssessmentStatus {
    #[default]
    Completed,
    Failed { reason: String },
}

/// Final ordering of a video's results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResultOrder {
    #[default]
    Id,
    Category,
}

impl FromStr for ResultOrder {
    type Err = ResultOrderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "id" | "feature_id" => Ok(ResultOrder::Id),
            "category" => Ok(ResultOrder::Category),
            _ => Err(ResultOrderParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown result order: {0}")]
pub struct ResultOrderParseError(String);

/// All results for one video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct VideoAssessment {
    pub id: AssessmentId,
    pub video_uri: String,
    pub brand_name: String,
    pub results: Vec<FeatureEvaluationResult>,
    pub status: AssessmentStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}

impl VideoAssessment {
    pub fn completed(
        video_uri: impl Into<String>,
        brand_name: impl Into<String>,
        results: Vec<FeatureEvaluationResult>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AssessmentId::new(),
            video_uri: video_uri.into(),
            brand_name: brand_name.into(),
            results,
            status: AssessmentStatus::Completed,
            started_at,
            completed_at: Utc::now(),
        }
    }

    pub fn failed(
        video_uri: impl Into<String>,
        brand_name: impl Into<String>,
        reason: impl Into<String>,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: AssessmentId::new(),
            video_uri: video_uri.into(),
            brand_name: brand_name.into(),
            results: Vec::new(),
            status: AssessmentStatus::Failed {
                reason: reason.into(),
            },
            started_at,
            completed_at: Utc::now(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, AssessmentStatus::Failed { .. })
    }

    /// Results that were detected.
    pub fn detected(&self) -> impl Iterator<Item = &FeatureEvaluationResult> {
        self.results.iter().filter(|r| r.detected)
    }

    pub fn result(&self, id: FeatureId) -> Option<&FeatureEvaluationResult> {
        self.results.iter().find(|r| r.feature_id == id)
    }
}

/// Sort results deterministically.
pub fn sort_results(results: &mut [FeatureEvaluationResult], order: ResultOrder) {
    match order {
        ResultOrder::Id => results.sort_by(|a, b| a.feature_id.as_str().cmp(b.feature_id.as_str())),
        ResultOrder::Category => results.sort_by(|a, b| {
            a.category
                .cmp(&b.category)
                .then_with(|| a.feature_id.as_str().cmp(b.feature_id.as_str()))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::feature_definition;

    #[test]
    fn test_model_verdict_accepts_string_booleans() {
        let json = r#"[
            {"id": "a_supers", "detected": "True", "confidence_score": 0.8},
            {"id": "a_supers_with_audio", "detected": "false"},
            {"id": "b_brand_visuals", "detected": true, "rationale": "logo at 0:02"}
        ]"#;

        let verdicts: Vec<ModelVerdict> = serde_json::from_str(json).unwrap();
        assert!(verdicts[0].detected);
        assert_eq!(verdicts[0].confidence_score, Some(0.8));
        assert!(!verdicts[1].detected);
        assert!(verdicts[2].detected);
        assert_eq!(verdicts[2].rationale, "logo at 0:02");
    }

    #[test]
    fn test_error_result_is_undetected() {
        let def = feature_definition(FeatureId::Supers).unwrap();
        let result = FeatureEvaluationResult::error(def, "model unavailable");
        assert!(result.is_error());
        assert!(!result.detected);
        assert_eq!(result.category, FeatureCategory::Attract);
    }

    #[test]
    fn test_sort_by_category_then_id() {
        let mut results: Vec<FeatureEvaluationResult> = [
            FeatureId::CallToActionText,
            FeatureId::VisibleFace,
            FeatureId::Supers,
            FeatureId::DynamicStart,
        ]
        .iter()
        .map(|id| FeatureEvaluationResult::pending(feature_definition(*id).unwrap()))
        .collect();

        sort_results(&mut results, ResultOrder::Category);
        let ids: Vec<FeatureId> = results.iter().map(|r| r.feature_id).collect();
        assert_eq!(
            ids,
            vec![
                FeatureId::DynamicStart,
                FeatureId::Supers,
                FeatureId::VisibleFace,
                FeatureId::CallToActionText,
            ]
        );
    }

    #[test]
    fn test_result_order_parse() {
        assert_eq!("category".parse::<ResultOrder>().unwrap(), ResultOrder::Category);
        assert_eq!("ID".parse::<ResultOrder>().unwrap(), ResultOrder::Id);
        assert!("random".parse::<ResultOrder>().is_err());
    }
}
