//! Per-video annotation bundle.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::annotation::{
    FaceDetectionAnnotation, LabelAnnotation, LogoRecognitionAnnotation,
    PersonDetectionAnnotation, ShotAnnotation, SpeechTranscription, TextAnnotation,
};

/// Kind of annotation produced by the video-intelligence service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    Shot,
    Face,
    People,
    Text,
    Speech,
    Logo,
    Label,
}

impl AnnotationKind {
    pub const ALL: &'static [AnnotationKind] = &[
        AnnotationKind::Shot,
        AnnotationKind::Face,
        AnnotationKind::People,
        AnnotationKind::Text,
        AnnotationKind::Speech,
        AnnotationKind::Logo,
        AnnotationKind::Label,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnnotationKind::Shot => "shot",
            AnnotationKind::Face => "face",
            AnnotationKind::People => "people",
            AnnotationKind::Text => "text",
            AnnotationKind::Speech => "speech",
            AnnotationKind::Logo => "logo",
            AnnotationKind::Label => "label",
        }
    }

    /// File name of this kind's export inside a video's annotation folder.
    pub fn file_name(&self) -> String {
        format!("{}-detection.json", self.as_str())
    }
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AnnotationKind {
    type Err = AnnotationKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "shot" | "shots" => Ok(AnnotationKind::Shot),
            "face" | "faces" => Ok(AnnotationKind::Face),
            "people" | "person" => Ok(AnnotationKind::People),
            "text" => Ok(AnnotationKind::Text),
            "speech" => Ok(AnnotationKind::Speech),
            "logo" | "logos" => Ok(AnnotationKind::Logo),
            "label" | "labels" => Ok(AnnotationKind::Label),
            _ => Err(AnnotationKindParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown annotation kind: {0}")]
pub struct AnnotationKindParseError(String);

/// All annotations for one video.
///
/// Each kind is `None` when it was never fetched or the export is missing,
/// which detectors treat differently from an empty list only for logging.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnnotationBundle {
    #[serde(default)]
    pub shot_annotations: Option<Vec<ShotAnnotation>>,
    #[serde(default)]
    pub face_detection_annotations: Option<Vec<FaceDetectionAnnotation>>,
    #[serde(default)]
    pub person_detection_annotations: Option<Vec<PersonDetectionAnnotation>>,
    #[serde(default)]
    pub text_annotations: Option<Vec<TextAnnotation>>,
    #[serde(default)]
    pub speech_transcriptions: Option<Vec<SpeechTranscription>>,
    #[serde(default)]
    pub logo_recognition_annotations: Option<Vec<LogoRecognitionAnnotation>>,
    #[serde(default)]
    pub segment_label_annotations: Option<Vec<LabelAnnotation>>,
    #[serde(default)]
    pub shot_label_annotations: Option<Vec<LabelAnnotation>>,
    #[serde(default)]
    pub frame_label_annotations: Option<Vec<LabelAnnotation>>,
}

impl AnnotationBundle {
    /// True if the given kind was loaded (possibly empty).
    pub fn has(&self, kind: AnnotationKind) -> bool {
        match kind {
            AnnotationKind::Shot => self.shot_annotations.is_some(),
            AnnotationKind::Face => self.face_detection_annotations.is_some(),
            AnnotationKind::People => self.person_detection_annotations.is_some(),
            AnnotationKind::Text => self.text_annotations.is_some(),
            AnnotationKind::Speech => self.speech_transcriptions.is_some(),
            AnnotationKind::Logo => self.logo_recognition_annotations.is_some(),
            AnnotationKind::Label => {
                self.segment_label_annotations.is_some()
                    || self.shot_label_annotations.is_some()
                    || self.frame_label_annotations.is_some()
            }
        }
    }

    /// Keep only the records of one kind.
    ///
    /// Video-intelligence exports carry a single feature per file, but some
    /// exports bundle several; this makes a per-kind fetch return exactly
    /// what was asked for.
    pub fn retain_kind(self, kind: AnnotationKind) -> Self {
        let mut out = AnnotationBundle::default();
        match kind {
            AnnotationKind::Shot => out.shot_annotations = self.shot_annotations,
            AnnotationKind::Face => out.face_detection_annotations = self.face_detection_annotations,
            AnnotationKind::People => {
                out.person_detection_annotations = self.person_detection_annotations
            }
            AnnotationKind::Text => out.text_annotations = self.text_annotations,
            AnnotationKind::Speech => out.speech_transcriptions = self.speech_transcriptions,
            AnnotationKind::Logo => {
                out.logo_recognition_annotations = self.logo_recognition_annotations
            }
            AnnotationKind::Label => {
                out.segment_label_annotations = self.segment_label_annotations;
                out.shot_label_annotations = self.shot_label_annotations;
                out.frame_label_annotations = self.frame_label_annotations;
            }
        }
        out
    }

    /// Fold another bundle in; kinds present in `other` replace ours.
    pub fn merge(&mut self, other: AnnotationBundle) {
        fn take<T>(slot: &mut Option<T>, value: Option<T>) {
            if value.is_some() {
                *slot = value;
            }
        }

        take(&mut self.shot_annotations, other.shot_annotations);
        take(&mut self.face_detection_annotations, other.face_detection_annotations);
        take(&mut self.person_detection_annotations, other.person_detection_annotations);
        take(&mut self.text_annotations, other.text_annotations);
        take(&mut self.speech_transcriptions, other.speech_transcriptions);
        take(&mut self.logo_recognition_annotations, other.logo_recognition_annotations);
        take(&mut self.segment_label_annotations, other.segment_label_annotations);
        take(&mut self.shot_label_annotations, other.shot_label_annotations);
        take(&mut self.frame_label_annotations, other.frame_label_annotations);
    }

    /// Kinds that are present in this bundle.
    pub fn kinds(&self) -> Vec<AnnotationKind> {
        AnnotationKind::ALL
            .iter()
            .copied()
            .filter(|kind| self.has(*kind))
            .collect()
    }
}

/// Top-level layout of an annotation export file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct AnnotationExport {
    #[serde(default)]
    pub annotation_results: Vec<AnnotationBundle>,
}

impl AnnotationExport {
    /// The first result entry, which is the only one for single-video jobs.
    pub fn into_first(self) -> Option<AnnotationBundle> {
        self.annotation_results.into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotation::TimeSpan;

    #[test]
    fn test_kind_parse_and_file_name() {
        assert_eq!("shots".parse::<AnnotationKind>().unwrap(), AnnotationKind::Shot);
        assert_eq!("person".parse::<AnnotationKind>().unwrap(), AnnotationKind::People);
        assert!("audio".parse::<AnnotationKind>().is_err());
        assert_eq!(AnnotationKind::Logo.file_name(), "logo-detection.json");
    }

    #[test]
    fn test_absent_differs_from_empty() {
        let mut bundle = AnnotationBundle::default();
        assert!(!bundle.has(AnnotationKind::Shot));

        bundle.shot_annotations = Some(vec![]);
        assert!(bundle.has(AnnotationKind::Shot));
        assert_eq!(bundle.kinds(), vec![AnnotationKind::Shot]);
    }

    #[test]
    fn test_merge_and_retain() {
        let mut base = AnnotationBundle {
            shot_annotations: Some(vec![TimeSpan::new(0.0, 1.0)]),
            ..Default::default()
        };
        let other = AnnotationBundle {
            text_annotations: Some(vec![]),
            frame_label_annotations: Some(vec![]),
            ..Default::default()
        };

        base.merge(other);
        assert!(base.has(AnnotationKind::Shot));
        assert!(base.has(AnnotationKind::Text));
        assert!(base.has(AnnotationKind::Label));

        let labels_only = base.clone().retain_kind(AnnotationKind::Label);
        assert_eq!(labels_only.kinds(), vec![AnnotationKind::Label]);
    }

    #[test]
    fn test_export_first_result() {
        let json = r#"{"annotation_results": [{"shot_annotations": [{"end_time_offset": {"seconds": 2}}]}]}"#;
        let export: AnnotationExport = serde_json::from_str(json).unwrap();
        let bundle = export.into_first().unwrap();
        assert_eq!(bundle.shot_annotations.unwrap().len(), 1);
        assert!(bundle.text_annotations.is_none());
    }
}
