//! Multimodal model evaluation for ABCD features.
//!
//! This crate provides:
//! - The `ModelEvaluator` abstraction and a scripted implementation
//! - A Vertex AI Gemini evaluator with prompt and response schema generation
//! - Cached Google Cloud access tokens via `gcp_auth`
//! - Retry with exponential backoff for quota and server errors
//! - Request and retry metrics

pub mod auth;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod gemini;
pub mod metrics;
pub mod prompt;
pub mod retry;

pub use auth::{AccessTokenSource, GcpTokenSource, StaticToken};
pub use config::{GenerationSettings, LlmConfig};
pub use error::{LlmError, LlmResult};
pub use evaluator::{EvaluationRequest, ModelEvaluator, ScriptedEvaluator, VideoReference};
pub use gemini::GeminiEvaluator;
pub use retry::{with_retry, RetryConfig};
