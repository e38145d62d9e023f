//! Annotation-based feature detectors.
//!
//! Every detector is a pure function of a [`DetectionInput`]. Detectors that
//! judge a feature over the whole video and over its opening window compute
//! both verdicts in one pass and return a [`PairedDetection`].

pub mod attract;
pub mod brand;
pub mod connect;
pub mod direct;

use abcd_models::{
    AnnotationBundle, AnnotationKind, BrandContext, FaceDetectionAnnotation, LabelAnnotation,
    LogoRecognitionAnnotation, PersonDetectionAnnotation, ResolvedEntities, ShotAnnotation,
    SpeechTranscription, TextAnnotation, Thresholds,
};
use tracing::debug;

/// Everything a detector may read. All of it is shared and read-only.
#[derive(Debug, Clone, Copy)]
pub struct DetectionInput<'a> {
    pub bundle: &'a AnnotationBundle,
    pub thresholds: &'a Thresholds,
    pub brand: &'a BrandContext,
    pub entities: &'a ResolvedEntities,
}

impl<'a> DetectionInput<'a> {
    pub fn new(
        bundle: &'a AnnotationBundle,
        thresholds: &'a Thresholds,
        brand: &'a BrandContext,
        entities: &'a ResolvedEntities,
    ) -> Self {
        Self {
            bundle,
            thresholds,
            brand,
            entities,
        }
    }

    pub fn shots(&self) -> Option<&'a [ShotAnnotation]> {
        present(AnnotationKind::Shot, self.bundle.shot_annotations.as_deref())
    }

    pub fn faces(&self) -> Option<&'a [FaceDetectionAnnotation]> {
        present(AnnotationKind::Face, self.bundle.face_detection_annotations.as_deref())
    }

    pub fn people(&self) -> Option<&'a [PersonDetectionAnnotation]> {
        present(AnnotationKind::People, self.bundle.person_detection_annotations.as_deref())
    }

    pub fn texts(&self) -> Option<&'a [TextAnnotation]> {
        present(AnnotationKind::Text, self.bundle.text_annotations.as_deref())
    }

    pub fn speech(&self) -> Option<&'a [SpeechTranscription]> {
        present(AnnotationKind::Speech, self.bundle.speech_transcriptions.as_deref())
    }

    pub fn logos(&self) -> Option<&'a [LogoRecognitionAnnotation]> {
        present(AnnotationKind::Logo, self.bundle.logo_recognition_annotations.as_deref())
    }

    /// Segment-, shot- and frame-level labels, in that order; absent levels are skipped.
    pub fn labels(&self) -> Option<Vec<&'a LabelAnnotation>> {
        if !self.bundle.has(AnnotationKind::Label) {
            debug!(kind = %AnnotationKind::Label, "Annotation kind absent, skipping");
            return None;
        }

        let levels = [
            self.bundle.segment_label_annotations.as_deref(),
            self.bundle.shot_label_annotations.as_deref(),
            self.bundle.frame_label_annotations.as_deref(),
        ];
        Some(levels.into_iter().flatten().flatten().collect())
    }
}

fn present<T>(kind: AnnotationKind, records: Option<&[T]>) -> Option<&[T]> {
    if records.is_none() {
        debug!(kind = %kind, "Annotation kind absent, skipping");
    }
    records
}

/// Verdict of one detector, with a short note on what was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Detection {
    pub detected: bool,
    pub evidence: String,
}

impl Detection {
    pub fn hit(evidence: impl Into<String>) -> Self {
        Self {
            detected: true,
            evidence: evidence.into(),
        }
    }

    pub fn miss(evidence: impl Into<String>) -> Self {
        Self {
            detected: false,
            evidence: evidence.into(),
        }
    }

    /// Miss reported when the annotation kind was never loaded.
    pub fn absent(kind: AnnotationKind) -> Self {
        Self::miss(format!("no {} annotations available", kind))
    }

    pub fn from_flag(detected: bool, hit: impl Into<String>, miss: impl Into<String>) -> Self {
        if detected {
            Self::hit(hit)
        } else {
            Self::miss(miss)
        }
    }
}

/// Whole-video and opening-window verdicts from a single scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairedDetection {
    pub full: Detection,
    pub first_n: Detection,
}

impl PairedDetection {
    pub fn absent(kind: AnnotationKind) -> Self {
        Self {
            full: Detection::absent(kind),
            first_n: Detection::absent(kind),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Builders shared by detector tests.

    use abcd_models::{
        AnnotationBundle, BrandContext, NormalizedBoundingBox, ResolvedEntities, SpeechAlternative,
        SpeechTranscription, TextAnnotation, TextFrame, TextSegment, Thresholds, TimeOffset,
        TimeSpan, TimestampedObject, Track, WordInfo,
    };

    use super::DetectionInput;

    pub struct Fixture {
        pub bundle: AnnotationBundle,
        pub thresholds: Thresholds,
        pub brand: BrandContext,
        pub entities: ResolvedEntities,
    }

    impl Fixture {
        pub fn new(bundle: AnnotationBundle) -> Self {
            Self {
                bundle,
                thresholds: Thresholds::default(),
                brand: BrandContext::new("Google")
                    .with_variations(&["Google"])
                    .with_products(&["Pixel"])
                    .with_categories(&["phone"]),
                entities: ResolvedEntities::default(),
            }
        }

        pub fn input(&self) -> DetectionInput<'_> {
            DetectionInput::new(&self.bundle, &self.thresholds, &self.brand, &self.entities)
        }
    }

    pub fn shots(durations: &[f64]) -> Vec<TimeSpan> {
        let mut start = 0.0;
        durations
            .iter()
            .map(|d| {
                let span = TimeSpan::new(start, start + d);
                start += d;
                span
            })
            .collect()
    }

    pub fn track(start: f64, end: f64, confidence: f64, boxes: &[NormalizedBoundingBox]) -> Track {
        Track {
            segment: Some(TimeSpan::new(start, end)),
            timestamped_objects: boxes
                .iter()
                .map(|b| TimestampedObject {
                    normalized_bounding_box: Some(*b),
                    time_offset: Some(TimeOffset::from_secs(start)),
                })
                .collect(),
            confidence,
        }
    }

    pub fn bbox(left: f64, top: f64, right: f64, bottom: f64) -> NormalizedBoundingBox {
        NormalizedBoundingBox {
            left: Some(left),
            top: Some(top),
            right: Some(right),
            bottom: Some(bottom),
        }
    }

    pub fn text(value: &str, confidence: f64, start: f64) -> TextAnnotation {
        TextAnnotation {
            text: value.to_string(),
            segments: vec![TextSegment {
                segment: Some(TimeSpan::new(start, start + 1.0)),
                confidence,
                frames: vec![TextFrame {
                    rotated_bounding_box: None,
                    time_offset: Some(TimeOffset::from_secs(start)),
                }],
            }],
        }
    }

    /// One transcription whose words start one second apart from `start`.
    pub fn speech(transcript: &str, confidence: f64, start: f64) -> SpeechTranscription {
        let words = transcript
            .split_whitespace()
            .enumerate()
            .map(|(i, w)| WordInfo {
                start_time: Some(TimeOffset::from_secs(start + i as f64)),
                end_time: Some(TimeOffset::from_secs(start + i as f64 + 0.5)),
                word: w.to_string(),
            })
            .collect();

        SpeechTranscription {
            alternatives: vec![SpeechAlternative {
                transcript: transcript.to_string(),
                confidence,
                words,
            }],
            language_code: Some("en-US".to_string()),
        }
    }
}
