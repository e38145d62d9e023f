//! Annotation-based feature detection for ABCD video assessment.
//!
//! This crate provides:
//! - Temporal and geometric primitives over video-intelligence records
//! - Transcript and overlay text matching
//! - One detector per rubric feature, behind a validated static registry
//! - Annotation providers and knowledge-graph entity lookup

pub mod detectors;
pub mod error;
pub mod geometry;
pub mod knowledge_graph;
pub mod overlay;
pub mod provider;
pub mod registry;
pub mod time;
pub mod transcript;

pub use detectors::{Detection, DetectionInput, PairedDetection};
pub use error::{AnnotationError, AnnotationResult};
pub use geometry::{box_area, polygon_area, EdgeDefault};
pub use knowledge_graph::{resolve_entities, EntityLookup, KnowledgeGraphClient, StaticEntityLookup};
pub use provider::{load_bundle, AnnotationProvider, InMemoryAnnotationProvider, LocalAnnotationProvider};
pub use registry::{DetectorRegistry, DETECTORS};
pub use time::{time_seconds, TimeField, Timed};
pub use transcript::{find_elements, TranscriptMatch};
