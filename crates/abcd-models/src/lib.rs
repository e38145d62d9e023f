//! Shared data models for the ABCD video assessment engine.
//!
//! This crate provides Serde-serializable types for:
//! - Video annotation records and per-video annotation bundles
//! - The feature catalogue and evaluation methods
//! - Thresholds and brand vocabulary
//! - Evaluation results and video assessments
//! - Video URI conventions for annotation storage

pub mod annotation;
pub mod brand;
pub mod bundle;
pub mod catalogue;
pub mod evaluation;
pub mod feature;
pub mod thresholds;
pub mod uri;

// Re-export common types
pub use annotation::{
    Entity, FaceDetectionAnnotation, LabelAnnotation, LabelFrame, LabelSegment,
    LogoRecognitionAnnotation, NormalizedBoundingBox, NormalizedBoundingPoly, NormalizedVertex,
    PersonDetectionAnnotation, ShotAnnotation, SpeechAlternative, SpeechTranscription,
    TextAnnotation, TextFrame, TextSegment, TimeOffset, TimeSpan, TimestampedObject, Track,
    WordInfo,
};
pub use brand::{parse_list, BrandContext, KnowledgeGraphEntity, ResolvedEntities};
pub use bundle::{AnnotationBundle, AnnotationExport, AnnotationKind};
pub use catalogue::{feature_definition, FEATURE_CATALOGUE};
pub use evaluation::{
    sort_results, AssessmentId, AssessmentStatus, EvaluationOutcome, EvaluationSource,
    FeatureEvaluationResult, ModelVerdict, ResultOrder, VideoAssessment,
};
pub use feature::{EvaluationMethod, FeatureCategory, FeatureDefinition, FeatureId, VideoSegment};
pub use thresholds::{ThresholdError, Thresholds};
pub use uri::{annotation_key, reduced_video_uri};
