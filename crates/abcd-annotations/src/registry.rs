//! Static feature-to-detector registry.
//!
//! The table is checked against the feature catalogue at startup so a
//! catalogue change without a matching detector fails fast.

use std::collections::{HashMap, HashSet};

use abcd_models::{AnnotationKind, FeatureDefinition, FeatureId};

use crate::detectors::{attract, brand, connect, direct, Detection, DetectionInput, PairedDetection};
use crate::error::{AnnotationError, AnnotationResult};

type DetectFn = for<'a> fn(&DetectionInput<'a>) -> Detection;

/// Detectors that produce two verdicts from one scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PairedDetector {
    QuickPacing,
    BrandMentionSpeech,
    BrandVisuals,
    ProductMentionSpeech,
    ProductMentionText,
    ProductVisuals,
    PresenceOfPeople,
    /// Full half is the close-up verdict, first-N half is the early face.
    VisibleFace,
}

impl PairedDetector {
    pub fn run(&self, input: &DetectionInput<'_>) -> PairedDetection {
        match self {
            PairedDetector::QuickPacing => attract::quick_pacing(input),
            PairedDetector::BrandMentionSpeech => brand::brand_mention_speech(input),
            PairedDetector::BrandVisuals => brand::brand_visuals(input),
            PairedDetector::ProductMentionSpeech => brand::product_mention_speech(input),
            PairedDetector::ProductMentionText => brand::product_mention_text(input),
            PairedDetector::ProductVisuals => brand::product_visuals(input),
            PairedDetector::PresenceOfPeople => connect::presence_of_people(input),
            PairedDetector::VisibleFace => connect::visible_face(input),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Half {
    Full,
    FirstN,
}

#[derive(Clone, Copy)]
pub enum Detector {
    Single(DetectFn),
    Paired(PairedDetector, Half),
}

impl std::fmt::Debug for Detector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Detector::Single(_) => write!(f, "Single"),
            Detector::Paired(pair, half) => write!(f, "Paired({:?}, {:?})", pair, half),
        }
    }
}

/// One registry row.
#[derive(Debug, Clone, Copy)]
pub struct DetectorEntry {
    pub id: FeatureId,
    /// Annotation kinds the detector reads.
    pub kinds: &'static [AnnotationKind],
    pub detector: Detector,
}

const fn single(id: FeatureId, kinds: &'static [AnnotationKind], f: DetectFn) -> DetectorEntry {
    DetectorEntry {
        id,
        kinds,
        detector: Detector::Single(f),
    }
}

const fn paired(
    id: FeatureId,
    kinds: &'static [AnnotationKind],
    pair: PairedDetector,
    half: Half,
) -> DetectorEntry {
    DetectorEntry {
        id,
        kinds,
        detector: Detector::Paired(pair, half),
    }
}

use AnnotationKind as K;

const SHOT: &[AnnotationKind] = &[K::Shot];
const TEXT: &[AnnotationKind] = &[K::Text];
const SPEECH: &[AnnotationKind] = &[K::Speech];
const TEXT_SPEECH: &[AnnotationKind] = &[K::Text, K::Speech];
const TEXT_LOGO: &[AnnotationKind] = &[K::Text, K::Logo];
const LABEL: &[AnnotationKind] = &[K::Label];
const PEOPLE: &[AnnotationKind] = &[K::People];
const FACE: &[AnnotationKind] = &[K::Face];

/// Every annotation detector, keyed by feature id.
pub static DETECTORS: [DetectorEntry; 23] = [
    single(FeatureId::DynamicStart, SHOT, attract::dynamic_start),
    paired(FeatureId::QuickPacing, SHOT, PairedDetector::QuickPacing, Half::Full),
    paired(FeatureId::QuickPacingFirst5Secs, SHOT, PairedDetector::QuickPacing, Half::FirstN),
    single(FeatureId::Supers, TEXT, attract::supers),
    single(FeatureId::SupersWithAudio, TEXT_SPEECH, attract::supers_with_audio),
    paired(FeatureId::BrandMentionSpeech, SPEECH, PairedDetector::BrandMentionSpeech, Half::Full),
    paired(
        FeatureId::BrandMentionSpeechFirst5Secs,
        SPEECH,
        PairedDetector::BrandMentionSpeech,
        Half::FirstN,
    ),
    paired(FeatureId::BrandVisuals, TEXT_LOGO, PairedDetector::BrandVisuals, Half::Full),
    paired(FeatureId::BrandVisualsFirst5Secs, TEXT_LOGO, PairedDetector::BrandVisuals, Half::FirstN),
    paired(FeatureId::ProductMentionSpeech, SPEECH, PairedDetector::ProductMentionSpeech, Half::Full),
    paired(
        FeatureId::ProductMentionSpeechFirst5Secs,
        SPEECH,
        PairedDetector::ProductMentionSpeech,
        Half::FirstN,
    ),
    paired(FeatureId::ProductMentionText, TEXT, PairedDetector::ProductMentionText, Half::Full),
    paired(
        FeatureId::ProductMentionTextFirst5Secs,
        TEXT,
        PairedDetector::ProductMentionText,
        Half::FirstN,
    ),
    paired(FeatureId::ProductVisuals, LABEL, PairedDetector::ProductVisuals, Half::Full),
    paired(FeatureId::ProductVisualsFirst5Secs, LABEL, PairedDetector::ProductVisuals, Half::FirstN),
    single(FeatureId::OverallPacing, SHOT, connect::overall_pacing),
    paired(FeatureId::PresenceOfPeople, PEOPLE, PairedDetector::PresenceOfPeople, Half::Full),
    paired(
        FeatureId::PresenceOfPeopleFirst5Secs,
        PEOPLE,
        PairedDetector::PresenceOfPeople,
        Half::FirstN,
    ),
    paired(FeatureId::VisibleFace, FACE, PairedDetector::VisibleFace, Half::FirstN),
    paired(FeatureId::VisibleFaceCloseUp, FACE, PairedDetector::VisibleFace, Half::Full),
    single(FeatureId::AudioSpeechEarly, SPEECH, direct::audio_speech_early),
    single(FeatureId::CallToActionSpeech, SPEECH, direct::call_to_action_speech),
    single(FeatureId::CallToActionText, TEXT, direct::call_to_action_text),
];

/// Lookup table over [`DETECTORS`].
#[derive(Debug, Clone)]
pub struct DetectorRegistry {
    entries: HashMap<FeatureId, DetectorEntry>,
}

impl Default for DetectorRegistry {
    fn default() -> Self {
        Self::from_entries(&DETECTORS)
    }
}

impl DetectorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: &[DetectorEntry]) -> Self {
        Self {
            entries: entries.iter().map(|e| (e.id, *e)).collect(),
        }
    }

    pub fn get(&self, id: FeatureId) -> Option<&DetectorEntry> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: FeatureId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check the registry against a catalogue.
    ///
    /// Every catalogue feature judged from annotations needs a detector,
    /// and every detector must belong to a catalogue feature.
    pub fn validate(&self, catalogue: &[FeatureDefinition]) -> AnnotationResult<()> {
        let missing: Vec<&str> = catalogue
            .iter()
            .filter(|def| def.method.uses_annotations() && !self.contains(def.id))
            .map(|def| def.id.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(AnnotationError::registry_mismatch(format!(
                "no detector for {}",
                missing.join(", ")
            )));
        }

        let known: HashSet<FeatureId> = catalogue.iter().map(|def| def.id).collect();
        let mut unknown: Vec<&str> = self
            .entries
            .keys()
            .filter(|id| !known.contains(*id))
            .map(|id| id.as_str())
            .collect();
        if !unknown.is_empty() {
            unknown.sort_unstable();
            return Err(AnnotationError::registry_mismatch(format!(
                "detectors without a catalogue feature: {}",
                unknown.join(", ")
            )));
        }

        Ok(())
    }

    /// Run the detectors for `ids`; paired detectors run once per call.
    ///
    /// Ids without a detector are left out of the result.
    pub fn detect(&self, ids: &[FeatureId], input: &DetectionInput<'_>) -> HashMap<FeatureId, Detection> {
        let mut pairs: HashMap<PairedDetector, PairedDetection> = HashMap::new();
        let mut out = HashMap::with_capacity(ids.len());

        for id in ids {
            let Some(entry) = self.entries.get(id) else {
                continue;
            };

            let detection = match entry.detector {
                Detector::Single(f) => f(input),
                Detector::Paired(pair, half) => {
                    let result = pairs.entry(pair).or_insert_with(|| pair.run(input));
                    match half {
                        Half::Full => result.full.clone(),
                        Half::FirstN => result.first_n.clone(),
                    }
                }
            };
            out.insert(*id, detection);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detectors::fixtures::{bbox, shots, speech, text, track, Fixture};
    use abcd_models::{
        AnnotationBundle, Entity, EvaluationMethod, FaceDetectionAnnotation, LabelAnnotation,
        LabelFrame, LabelSegment, LogoRecognitionAnnotation, NormalizedBoundingPoly,
        NormalizedVertex, PersonDetectionAnnotation, TimeOffset, TimeSpan, FEATURE_CATALOGUE,
    };

    /// Every confidence-carrying kind, each record at `confidence`, all of it
    /// within the opening window. Shots carry no confidence and are left out.
    fn early_bundle(confidence: f64) -> AnnotationBundle {
        let mut overlay = text("Google Pixel phone shop now", confidence, 0.0);
        overlay.segments[0].frames[0].rotated_bounding_box = Some(NormalizedBoundingPoly {
            vertices: vec![
                NormalizedVertex { x: 0.0, y: 0.0 },
                NormalizedVertex { x: 0.5, y: 0.0 },
                NormalizedVertex { x: 0.5, y: 0.5 },
                NormalizedVertex { x: 0.0, y: 0.5 },
            ],
        });
        // A second segment, later but equally weak.
        overlay
            .segments
            .extend(text("Google Pixel phone shop now", confidence, 12.0).segments);

        let big = [bbox(0.0, 0.0, 0.5, 0.5)];
        let entity = |description: &str| Entity {
            entity_id: String::new(),
            description: description.to_string(),
            language_code: None,
        };

        AnnotationBundle {
            text_annotations: Some(vec![overlay]),
            speech_transcriptions: Some(vec![speech("google pixel phone shop now", confidence, 0.0)]),
            logo_recognition_annotations: Some(vec![LogoRecognitionAnnotation {
                entity: entity("Google"),
                tracks: vec![track(0.0, 2.0, confidence, &big)],
                segments: vec![TimeSpan::new(0.0, 2.0)],
            }]),
            segment_label_annotations: Some(vec![LabelAnnotation {
                entity: entity("Pixel"),
                category_entities: vec![],
                segments: vec![LabelSegment {
                    segment: Some(TimeSpan::new(0.0, 2.0)),
                    confidence,
                }],
                frames: vec![LabelFrame {
                    time_offset: Some(TimeOffset::from_secs(1.0)),
                    confidence,
                }],
            }]),
            face_detection_annotations: Some(vec![FaceDetectionAnnotation {
                tracks: vec![track(0.0, 2.0, confidence, &big)],
            }]),
            person_detection_annotations: Some(vec![PersonDetectionAnnotation {
                tracks: vec![track(0.0, 2.0, confidence, &big)],
            }]),
            ..Default::default()
        }
    }

    fn detect_all(bundle: AnnotationBundle) -> HashMap<FeatureId, Detection> {
        let fixture = Fixture::new(bundle);
        let ids: Vec<FeatureId> = DETECTORS.iter().map(|e| e.id).collect();
        DetectorRegistry::new().detect(&ids, &fixture.input())
    }

    #[test]
    fn test_low_confidence_records_never_detect() {
        let results = detect_all(early_bundle(0.2));
        assert_eq!(results.len(), DETECTORS.len());

        for entry in DETECTORS.iter() {
            let detection = &results[&entry.id];
            assert!(!detection.detected, "{} detected: {}", entry.id, detection.evidence);
        }
    }

    #[test]
    fn test_confident_records_detect_every_gated_feature() {
        let results = detect_all(early_bundle(0.9));

        for entry in DETECTORS.iter().filter(|e| e.kinds != SHOT) {
            let detection = &results[&entry.id];
            assert!(detection.detected, "{} missed: {}", entry.id, detection.evidence);
        }
    }

    #[test]
    fn test_registry_matches_catalogue() {
        let registry = DetectorRegistry::new();
        assert_eq!(registry.len(), FEATURE_CATALOGUE.len());
        registry.validate(&FEATURE_CATALOGUE).unwrap();
    }

    #[test]
    fn test_validate_reports_missing_detector() {
        let entries: Vec<DetectorEntry> = DETECTORS
            .iter()
            .copied()
            .filter(|e| e.id != FeatureId::OverallPacing)
            .collect();
        let registry = DetectorRegistry::from_entries(&entries);

        let err = registry.validate(&FEATURE_CATALOGUE).unwrap_err();
        assert!(err.to_string().contains("c_overall_pacing"));
    }

    #[test]
    fn test_validate_ignores_model_only_features() {
        let mut catalogue: Vec<FeatureDefinition> = FEATURE_CATALOGUE.to_vec();
        for def in catalogue.iter_mut() {
            if def.id == FeatureId::Supers {
                def.method = EvaluationMethod::Llm;
            }
        }
        let entries: Vec<DetectorEntry> = DETECTORS
            .iter()
            .copied()
            .filter(|e| e.id != FeatureId::Supers)
            .collect();

        DetectorRegistry::from_entries(&entries).validate(&catalogue).unwrap();
    }

    #[test]
    fn test_validate_reports_unknown_detector() {
        let catalogue: Vec<FeatureDefinition> = FEATURE_CATALOGUE
            .iter()
            .copied()
            .filter(|def| def.id != FeatureId::CallToActionText)
            .collect();

        let err = DetectorRegistry::new().validate(&catalogue).unwrap_err();
        assert!(err.to_string().contains("d_call_to_action_text"));
    }

    #[test]
    fn test_detect_splits_pairs() {
        let fixture = Fixture::new(AnnotationBundle {
            shot_annotations: Some(shots(&[1.0; 6])),
            ..Default::default()
        });
        let ids = [
            FeatureId::QuickPacing,
            FeatureId::QuickPacingFirst5Secs,
            FeatureId::DynamicStart,
            FeatureId::Supers,
        ];

        let results = DetectorRegistry::new().detect(&ids, &fixture.input());
        assert_eq!(results.len(), 4);
        assert!(results[&FeatureId::QuickPacing].detected);
        assert!(results[&FeatureId::QuickPacingFirst5Secs].detected);
        assert!(results[&FeatureId::DynamicStart].detected);
        assert!(!results[&FeatureId::Supers].detected);
    }

    #[test]
    fn test_face_halves() {
        let entry = DetectorRegistry::new().get(FeatureId::VisibleFaceCloseUp).copied().unwrap();
        assert!(matches!(entry.detector, Detector::Paired(PairedDetector::VisibleFace, Half::Full)));
    }
}
