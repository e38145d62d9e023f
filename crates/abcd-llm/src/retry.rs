//! Retry with exponential backoff for model calls.
//!
//! Only quota exhaustion and server errors are retried. Any other failure
//! is returned on the spot.

use std::future::Future;
use std::time::Duration;

use tracing::{info_span, warn, Instrument};

use crate::error::LlmResult;
use crate::metrics::record_retry;

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total attempts, including the first.
    pub max_attempts: u32,
    /// Delay after the first failure; doubles each attempt.
    pub base_delay: Duration,
    /// Operation name for logging.
    pub operation_name: String,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(10),
            operation_name: "model_evaluation".to_string(),
        }
    }
}

impl RetryConfig {
    pub fn new(operation_name: impl Into<String>) -> Self {
        Self {
            operation_name: operation_name.into(),
            ..Default::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn with_base_delay(mut self, base_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self
    }

    /// Delay after the failed attempt with index `attempt` (0-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }
}

/// Execute an async model call with retry.
pub async fn with_retry<T, F, Fut>(config: &RetryConfig, op: F) -> LlmResult<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = LlmResult<T>>,
{
    let mut attempt = 0u32;

    loop {
        let span = info_span!(
            "llm_retry",
            operation = %config.operation_name,
            attempt = attempt + 1
        );

        match op().instrument(span).await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt + 1 < config.max_attempts => {
                let delay = config.delay_for_attempt(attempt);
                warn!(
                    operation = %config.operation_name,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "Model call failed, retrying: {}",
                    e
                );
                record_retry(&config.operation_name);
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
