//! Annotation error types.

use thiserror::Error;

pub type AnnotationResult<T> = Result<T, AnnotationError>;

#[derive(Debug, Error)]
pub enum AnnotationError {
    #[error("Annotation fetch failed: {0}")]
    FetchFailed(String),

    #[error("Invalid annotation export: {0}")]
    InvalidExport(String),

    #[error("Knowledge graph lookup failed: {0}")]
    KnowledgeGraph(String),

    #[error("Detector registry mismatch: {0}")]
    RegistryMismatch(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnnotationError {
    pub fn fetch_failed(msg: impl Into<String>) -> Self {
        Self::FetchFailed(msg.into())
    }

    pub fn invalid_export(msg: impl Into<String>) -> Self {
        Self::InvalidExport(msg.into())
    }

    pub fn knowledge_graph(msg: impl Into<String>) -> Self {
        Self::KnowledgeGraph(msg.into())
    }

    pub fn registry_mismatch(msg: impl Into<String>) -> Self {
        Self::RegistryMismatch(msg.into())
    }
}
