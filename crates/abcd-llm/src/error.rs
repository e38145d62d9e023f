//! Model evaluation error types.

use thiserror::Error;

/// Result type for model evaluation.
pub type LlmResult<T> = Result<T, LlmError>;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Quota exhausted: {0}")]
    QuotaExhausted(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Model returned no content: {0}")]
    EmptyResponse(String),

    #[error("Invalid model response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Map a non-success HTTP status to an error.
    pub fn from_http_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            429 => Self::QuotaExhausted(message),
            500..=599 => Self::Server { status, message },
            _ => Self::Rejected { status, message },
        }
    }

    /// Quota and server-side failures are worth retrying; everything else is not.
    pub fn is_retryable(&self) -> bool {
        matches!(self, LlmError::QuotaExhausted(_) | LlmError::Server { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert!(matches!(LlmError::from_http_status(429, "quota"), LlmError::QuotaExhausted(_)));
        assert!(matches!(
            LlmError::from_http_status(503, "unavailable"),
            LlmError::Server { status: 503, .. }
        ));
        assert!(matches!(
            LlmError::from_http_status(400, "bad request"),
            LlmError::Rejected { status: 400, .. }
        ));
    }

    #[test]
    fn test_retryable() {
        assert!(LlmError::from_http_status(429, "").is_retryable());
        assert!(LlmError::from_http_status(500, "").is_retryable());
        assert!(!LlmError::from_http_status(403, "").is_retryable());
        assert!(!LlmError::invalid_response("not json").is_retryable());
        assert!(!LlmError::EmptyResponse("blocked".to_string()).is_retryable());
        assert!(!LlmError::config("missing project").is_retryable());
        assert!(!LlmError::auth("no credentials").is_retryable());
    }
}
