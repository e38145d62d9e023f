//! Worker error types.

use thiserror::Error;

use abcd_annotations::AnnotationError;
use abcd_llm::LlmError;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Task failed: {0}")]
    TaskFailed(String),

    #[error("Annotation error: {0}")]
    Annotation(#[from] AnnotationError),

    #[error("Model error: {0}")]
    Llm(#[from] LlmError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WorkerError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn task_failed(msg: impl Into<String>) -> Self {
        Self::TaskFailed(msg.into())
    }

    /// Quota and server errors from the model, already retried upstream.
    pub fn is_transient(&self) -> bool {
        matches!(self, WorkerError::Llm(e) if e.is_retryable())
    }
}
