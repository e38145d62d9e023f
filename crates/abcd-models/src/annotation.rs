//! Video annotation records.
//!
//! These mirror the JSON export of a video-intelligence annotation job
//! (snake_case field names). Unknown fields are ignored and missing
//! numeric sub-fields default, so partially populated exports still load.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Offset from the start of the video, split into seconds and sub-second parts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimeOffset {
    #[serde(default)]
    pub seconds: Option<f64>,
    #[serde(default)]
    pub microseconds: Option<f64>,
    #[serde(default)]
    pub nanos: Option<f64>,
}

impl TimeOffset {
    /// Offset expressed in whole and fractional seconds.
    pub fn from_secs(seconds: f64) -> Self {
        let whole = seconds.trunc();
        Self {
            seconds: Some(whole),
            microseconds: Some(((seconds - whole) * 1e6).round()),
            nanos: None,
        }
    }
}

/// A time span within the video.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimeSpan {
    #[serde(default)]
    pub start_time_offset: Option<TimeOffset>,
    #[serde(default)]
    pub end_time_offset: Option<TimeOffset>,
}

impl TimeSpan {
    pub fn new(start: f64, end: f64) -> Self {
        Self {
            start_time_offset: Some(TimeOffset::from_secs(start)),
            end_time_offset: Some(TimeOffset::from_secs(end)),
        }
    }
}

/// Shot boundaries are bare spans.
pub type ShotAnnotation = TimeSpan;

/// Normalized bounding box; coordinates are fractions of the frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NormalizedBoundingBox {
    #[serde(default)]
    pub left: Option<f64>,
    #[serde(default)]
    pub top: Option<f64>,
    #[serde(default)]
    pub right: Option<f64>,
    #[serde(default)]
    pub bottom: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NormalizedVertex {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

/// Rotated bounding polygon; text detection emits four vertices.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct NormalizedBoundingPoly {
    #[serde(default)]
    pub vertices: Vec<NormalizedVertex>,
}

/// One per-frame observation inside a track.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TimestampedObject {
    #[serde(default)]
    pub normalized_bounding_box: Option<NormalizedBoundingBox>,
    #[serde(default)]
    pub time_offset: Option<TimeOffset>,
}

/// An object followed across a span of frames.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Track {
    #[serde(default)]
    pub segment: Option<TimeSpan>,
    #[serde(default)]
    pub timestamped_objects: Vec<TimestampedObject>,
    #[serde(default)]
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FaceDetectionAnnotation {
    #[serde(default)]
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PersonDetectionAnnotation {
    #[serde(default)]
    pub tracks: Vec<Track>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TextFrame {
    #[serde(default)]
    pub rotated_bounding_box: Option<NormalizedBoundingPoly>,
    #[serde(default)]
    pub time_offset: Option<TimeOffset>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TextSegment {
    #[serde(default)]
    pub segment: Option<TimeSpan>,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub frames: Vec<TextFrame>,
}

/// Overlay text ("super") recognised on screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TextAnnotation {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub segments: Vec<TextSegment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WordInfo {
    #[serde(default)]
    pub start_time: Option<TimeOffset>,
    #[serde(default)]
    pub end_time: Option<TimeOffset>,
    #[serde(default)]
    pub word: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpeechAlternative {
    #[serde(default)]
    pub transcript: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub words: Vec<WordInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SpeechTranscription {
    #[serde(default)]
    pub alternatives: Vec<SpeechAlternative>,
    #[serde(default)]
    pub language_code: Option<String>,
}

/// Knowledge-graph entity attached to logo and label annotations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Entity {
    #[serde(default)]
    pub entity_id: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub language_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LogoRecognitionAnnotation {
    #[serde(default)]
    pub entity: Entity,
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(default)]
    pub segments: Vec<TimeSpan>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LabelSegment {
    #[serde(default)]
    pub segment: Option<TimeSpan>,
    #[serde(default)]
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LabelFrame {
    #[serde(default)]
    pub time_offset: Option<TimeOffset>,
    #[serde(default)]
    pub confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LabelAnnotation {
    #[serde(default)]
    pub entity: Entity,
    #[serde(default)]
    pub category_entities: Vec<Entity>,
    #[serde(default)]
    pub segments: Vec<LabelSegment>,
    #[serde(default)]
    pub frames: Vec<LabelFrame>,
}
