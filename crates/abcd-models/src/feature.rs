//! Rubric feature identifiers and definitions.
//!
//! Every rubric item has a stable id shared by the annotation and model
//! evaluation paths. The ids are part of the output contract.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Stable identifier of a rubric item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub enum FeatureId {
    #[serde(rename = "a_dynamic_start")]
    DynamicStart,
    #[serde(rename = "a_quick_pacing")]
    QuickPacing,
    #[serde(rename = "a_quick_pacing_1st_secs")]
    QuickPacingFirst5Secs,
    #[serde(rename = "a_supers")]
    Supers,
    #[serde(rename = "a_supers_with_audio")]
    SupersWithAudio,
    #[serde(rename = "b_brand_mention_speech")]
    BrandMentionSpeech,
    #[serde(rename = "b_brand_mention_speech_1st_5_secs")]
    BrandMentionSpeechFirst5Secs,
    #[serde(rename = "b_brand_visuals")]
    BrandVisuals,
    #[serde(rename = "b_brand_visuals_1st_5_secs")]
    BrandVisualsFirst5Secs,
    #[serde(rename = "b_product_mention_speech")]
    ProductMentionSpeech,
    #[serde(rename = "b_product_mention_speech_1st_5_secs")]
    ProductMentionSpeechFirst5Secs,
    #[serde(rename = "b_product_mention_text")]
    ProductMentionText,
    #[serde(rename = "b_product_mention_text_1st_5_secs")]
    ProductMentionTextFirst5Secs,
    #[serde(rename = "b_product_visuals")]
    ProductVisuals,
    #[serde(rename = "b_product_visuals_1st_5_secs")]
    ProductVisualsFirst5Secs,
    #[serde(rename = "c_overall_pacing")]
    OverallPacing,
    #[serde(rename = "c_presence_of_people")]
    PresenceOfPeople,
    #[serde(rename = "c_presence_of_people_1st_5_secs")]
    PresenceOfPeopleFirst5Secs,
    #[serde(rename = "c_visible_face")]
    VisibleFace,
    #[serde(rename = "c_visible_face_close_up")]
    VisibleFaceCloseUp,
    #[serde(rename = "d_audio_speech_early_1st_5_secs")]
    AudioSpeechEarly,
    #[serde(rename = "d_call_to_action_speech")]
    CallToActionSpeech,
    #[serde(rename = "d_call_to_action_text")]
    CallToActionText,
}

impl FeatureId {
    pub const ALL: &'static [FeatureId] = &[
        FeatureId::DynamicStart,
        FeatureId::QuickPacing,
        FeatureId::QuickPacingFirst5Secs,
        FeatureId::Supers,
        FeatureId::SupersWithAudio,
        FeatureId::BrandMentionSpeech,
        FeatureId::BrandMentionSpeechFirst5Secs,
        FeatureId::BrandVisuals,
        FeatureId::BrandVisualsFirst5Secs,
        FeatureId::ProductMentionSpeech,
        FeatureId::ProductMentionSpeechFirst5Secs,
        FeatureId::ProductMentionText,
        FeatureId::ProductMentionTextFirst5Secs,
        FeatureId::ProductVisuals,
        FeatureId::ProductVisualsFirst5Secs,
        FeatureId::OverallPacing,
        FeatureId::PresenceOfPeople,
        FeatureId::PresenceOfPeopleFirst5Secs,
        FeatureId::VisibleFace,
        FeatureId::VisibleFaceCloseUp,
        FeatureId::AudioSpeechEarly,
        FeatureId::CallToActionSpeech,
        FeatureId::CallToActionText,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureId::DynamicStart => "a_dynamic_start",
            FeatureId::QuickPacing => "a_quick_pacing",
            FeatureId::QuickPacingFirst5Secs => "a_quick_pacing_1st_secs",
            FeatureId::Supers => "a_supers",
            FeatureId::SupersWithAudio => "a_supers_with_audio",
            FeatureId::BrandMentionSpeech => "b_brand_mention_speech",
            FeatureId::BrandMentionSpeechFirst5Secs => "b_brand_mention_speech_1st_5_secs",
            FeatureId::BrandVisuals => "b_brand_visuals",
            FeatureId::BrandVisualsFirst5Secs => "b_brand_visuals_1st_5_secs",
            FeatureId::ProductMentionSpeech => "b_product_mention_speech",
            FeatureId::ProductMentionSpeechFirst5Secs => "b_product_mention_speech_1st_5_secs",
            FeatureId::ProductMentionText => "b_product_mention_text",
            FeatureId::ProductMentionTextFirst5Secs => "b_product_mention_text_1st_5_secs",
            FeatureId::ProductVisuals => "b_product_visuals",
            FeatureId::ProductVisualsFirst5Secs => "b_product_visuals_1st_5_secs",
            FeatureId::OverallPacing => "c_overall_pacing",
            FeatureId::PresenceOfPeople => "c_presence_of_people",
            FeatureId::PresenceOfPeopleFirst5Secs => "c_presence_of_people_1st_5_secs",
            FeatureId::VisibleFace => "c_visible_face",
            FeatureId::VisibleFaceCloseUp => "c_visible_face_close_up",
            FeatureId::AudioSpeechEarly => "d_audio_speech_early_1st_5_secs",
            FeatureId::CallToActionSpeech => "d_call_to_action_speech",
            FeatureId::CallToActionText => "d_call_to_action_text",
        }
    }

    /// Rubric category, derived from the id prefix.
    pub fn category(&self) -> FeatureCategory {
        match self.as_str().as_bytes().first() {
            Some(b'a') => FeatureCategory::Attract,
            Some(b'b') => FeatureCategory::Brand,
            Some(b'c') => FeatureCategory::Connect,
            _ => FeatureCategory::Direct,
        }
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FeatureId {
    type Err = FeatureIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        FeatureId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == needle)
            .ok_or_else(|| FeatureIdParseError(s.to_string()))
    }
}

#[derive(Debug, Error)]
#[error("Unknown feature id: {0}")]
pub struct FeatureIdParseError(String);

/// ABCD rubric category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeatureCategory {
    Attract,
    Brand,
    Connect,
    Direct,
}

impl FeatureCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureCategory::Attract => "ATTRACT",
            FeatureCategory::Brand => "BRAND",
            FeatureCategory::Connect => "CONNECT",
            FeatureCategory::Direct => "DIRECT",
        }
    }
}

impl fmt::Display for FeatureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Portion of the video a feature is judged on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub enum VideoSegment {
    #[serde(rename = "FULL_VIDEO")]
    FullVideo,
    #[serde(rename = "FIRST_5_SECS_VIDEO")]
    First5SecsVideo,
}

impl VideoSegment {
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoSegment::FullVideo => "FULL_VIDEO",
            VideoSegment::First5SecsVideo => "FIRST_5_SECS_VIDEO",
        }
    }
}

impl fmt::Display for VideoSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Which signal sources evaluate a feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvaluationMethod {
    Annotations,
    Llm,
    Both,
}

impl EvaluationMethod {
    pub fn uses_annotations(&self) -> bool {
        matches!(self, EvaluationMethod::Annotations | EvaluationMethod::Both)
    }

    pub fn uses_llm(&self) -> bool {
        matches!(self, EvaluationMethod::Llm | EvaluationMethod::Both)
    }

    /// Method after applying the global source switches.
    ///
    /// Returns `None` when every source this feature relies on is disabled.
    pub fn restrict(self, use_annotations: bool, use_llms: bool) -> Option<EvaluationMethod> {
        match (self.uses_annotations() && use_annotations, self.uses_llm() && use_llms) {
            (true, true) => Some(EvaluationMethod::Both),
            (true, false) => Some(EvaluationMethod::Annotations),
            (false, true) => Some(EvaluationMethod::Llm),
            (false, false) => None,
        }
    }
}

/// One rubric item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureDefinition {
    pub id: FeatureId,
    pub name: &'static str,
    pub category: FeatureCategory,
    pub criteria: &'static str,
    pub video_segment: VideoSegment,
    pub method: EvaluationMethod,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_id_roundtrips_through_str() {
        for id in FeatureId::ALL {
            assert_eq!(id.as_str().parse::<FeatureId>().unwrap(), *id);
            let json = serde_json::to_string(id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
        assert!("z_unknown".parse::<FeatureId>().is_err());
    }

    #[test]
    fn test_declaration_order_matches_id_order() {
        let mut sorted: Vec<&str> = FeatureId::ALL.iter().map(|id| id.as_str()).collect();
        sorted.sort();
        let declared: Vec<&str> = FeatureId::ALL.iter().map(|id| id.as_str()).collect();
        assert_eq!(sorted, declared);
    }

    #[test]
    fn test_category_from_prefix() {
        assert_eq!(FeatureId::Supers.category(), FeatureCategory::Attract);
        assert_eq!(FeatureId::ProductVisuals.category(), FeatureCategory::Brand);
        assert_eq!(FeatureId::VisibleFace.category(), FeatureCategory::Connect);
        assert_eq!(FeatureId::CallToActionText.category(), FeatureCategory::Direct);
    }

    #[test]
    fn test_method_restrict() {
        let both = EvaluationMethod::Both;
        assert_eq!(both.restrict(true, true), Some(EvaluationMethod::Both));
        assert_eq!(both.restrict(true, false), Some(EvaluationMethod::Annotations));
        assert_eq!(both.restrict(false, true), Some(EvaluationMethod::Llm));
        assert_eq!(EvaluationMethod::Annotations.restrict(false, true), None);
    }
}
