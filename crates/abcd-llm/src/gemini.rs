//! Vertex AI Gemini evaluator.
//!
//! Sends the `gs://` video by URI together with the generated prompt to the
//! publisher model's `generateContent` and parses the JSON verdict array
//! from the first candidate. Vertex reads the video from Cloud Storage with
//! the calling project's credentials.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use abcd_models::ModelVerdict;

use crate::auth::{AccessTokenSource, GcpTokenSource};
use crate::config::LlmConfig;
use crate::error::{LlmError, LlmResult};
use crate::evaluator::{EvaluationRequest, ModelEvaluator};
use crate::metrics::record_request;
use crate::prompt::{build_prompt, response_schema, strip_code_fence};
use crate::retry::{with_retry, RetryConfig};

const VIDEO_MIME_TYPE: &str = "video/mp4";

/// Gemini on Vertex AI.
pub struct GeminiEvaluator {
    config: LlmConfig,
    retry: RetryConfig,
    client: Client,
    tokens: Arc<dyn AccessTokenSource>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    File {
        #[serde(rename = "fileData")]
        file_data: FileData,
    },
    Text {
        text: String,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileData {
    mime_type: &'static str,
    file_uri: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    max_output_tokens: u32,
    temperature: f64,
    top_p: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiEvaluator {
    pub fn new(config: LlmConfig, tokens: Arc<dyn AccessTokenSource>) -> Self {
        Self {
            config,
            retry: RetryConfig::new("gemini_generate_content"),
            client: Client::new(),
            tokens,
        }
    }

    /// Create an evaluator from environment variables and default credentials.
    pub async fn from_env() -> LlmResult<Self> {
        let config = LlmConfig::from_env()?;
        let tokens = GcpTokenSource::from_env().await?;
        Ok(Self::new(config, Arc::new(tokens)))
    }

    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn build_request(&self, request: &EvaluationRequest) -> GeminiRequest {
        let generation = &request.generation;
        GeminiRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part::File {
                        file_data: FileData {
                            mime_type: VIDEO_MIME_TYPE,
                            file_uri: request.video.uri.clone(),
                        },
                    },
                    Part::Text {
                        text: build_prompt(request),
                    },
                ],
            }],
            generation_config: GenerationConfig {
                max_output_tokens: generation.max_output_tokens,
                temperature: generation.temperature,
                top_p: generation.top_p,
                top_k: generation.top_k,
                response_mime_type: "application/json",
                response_schema: response_schema(),
            },
        }
    }

    async fn post(&self, url: &str, body: &GeminiRequest) -> LlmResult<reqwest::Response> {
        let token = self.tokens.access_token().await?;
        Ok(self.client.post(url).bearer_auth(token).json(body).send().await?)
    }

    async fn call_once(&self, body: &GeminiRequest) -> LlmResult<Vec<ModelVerdict>> {
        let url = self.config.generate_content_url();

        let started = Instant::now();
        let mut response = self.post(&url, body).await?;
        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            debug!("Access token rejected, refreshing");
            self.tokens.invalidate().await;
            response = self.post(&url, body).await?;
        }

        let status = response.status();
        record_request(
            &self.config.model,
            status.as_u16(),
            started.elapsed().as_secs_f64() * 1000.0,
        );

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::from_http_status(status.as_u16(), error_text));
        }

        let parsed: GeminiResponse = response.json().await?;
        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::EmptyResponse("no candidates".to_string()))?;

        let finish_reason = candidate.finish_reason.unwrap_or_default();
        let text = candidate
            .content
            .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
            .ok_or_else(|| {
                LlmError::EmptyResponse(format!("no text part (finish reason: {})", finish_reason))
            })?;

        debug!(model = %self.config.model, "Gemini response: {}", text);
        parse_verdicts(&text)
    }
}

/// Parse a verdict array, tolerating a markdown fence.
pub fn parse_verdicts(text: &str) -> LlmResult<Vec<ModelVerdict>> {
    serde_json::from_str(strip_code_fence(text))
        .map_err(|e| LlmError::invalid_response(format!("verdict array did not parse: {}", e)))
}

#[async_trait]
impl ModelEvaluator for GeminiEvaluator {
    async fn evaluate(&self, request: &EvaluationRequest) -> LlmResult<Vec<ModelVerdict>> {
        let body = self.build_request(request);

        info!(
            model = %self.config.model,
            video_uri = %request.video.uri,
            segment = %request.video.segment,
            features = request.features.len(),
            "Requesting model evaluation"
        );

        let verdicts = with_retry(&self.retry, || self.call_once(&body)).await?;

        info!(
            model = %self.config.model,
            video_uri = %request.video.uri,
            verdicts = verdicts.len(),
            "Model evaluation complete"
        );
        Ok(verdicts)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticToken;
    use crate::evaluator::VideoReference;
    use abcd_models::{feature_definition, BrandContext, FeatureId, VideoSegment};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const MODEL_PATH: &str =
        "/v1/projects/ads-project/locations/us-central1/publishers/google/models/gemini-1.5-pro-002:generateContent";

    fn evaluator_with(server: &MockServer, tokens: Arc<dyn AccessTokenSource>) -> GeminiEvaluator {
        GeminiEvaluator::new(LlmConfig::new("ads-project").with_base_url(server.uri()), tokens)
            .with_retry_config(RetryConfig::new("test").with_base_delay(Duration::from_millis(1)))
    }

    fn evaluator(server: &MockServer) -> GeminiEvaluator {
        evaluator_with(server, Arc::new(StaticToken::new("test-token")))
    }

    /// Hands out `token-1`, `token-2`, ... and counts invalidations.
    #[derive(Default)]
    struct RotatingTokens {
        issued: AtomicUsize,
        invalidated: AtomicUsize,
    }

    #[async_trait]
    impl AccessTokenSource for RotatingTokens {
        async fn access_token(&self) -> LlmResult<String> {
            let n = self.issued.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(format!("token-{}", n))
        }

        async fn invalidate(&self) {
            self.invalidated.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn request() -> EvaluationRequest {
        EvaluationRequest::new(
            vec![*feature_definition(FeatureId::Supers).unwrap()],
            VideoReference {
                uri: "gs://bucket/ad.mp4".to_string(),
                segment: VideoSegment::FullVideo,
            },
            BrandContext::new("Google"),
        )
    }

    fn text_response(text: &str) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": text}]}, "finishReason": "STOP"}]
        }))
    }

    #[tokio::test]
    async fn test_evaluate_parses_verdicts() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(header("authorization", "Bearer test-token"))
            .and(body_partial_json(serde_json::json!({
                "contents": [{"parts": [{"fileData": {"fileUri": "gs://bucket/ad.mp4", "mimeType": "video/mp4"}}]}],
                "generationConfig": {"responseMimeType": "application/json"}
            })))
            .respond_with(text_response(
                r#"[{"id": "a_supers", "detected": "True", "confidence_score": 0.8, "rationale": "Captions"}]"#,
            ))
            .expect(1)
            .mount(&server)
            .await;

        let verdicts = evaluator(&server).evaluate(&request()).await.unwrap();
        assert_eq!(verdicts.len(), 1);
        assert!(verdicts[0].detected);
        assert_eq!(verdicts[0].confidence_score, Some(0.8));
    }

    #[tokio::test]
    async fn test_expired_token_is_refreshed_once() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(header("authorization", "Bearer token-1"))
            .respond_with(ResponseTemplate::new(401).set_body_string("UNAUTHENTICATED"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(MODEL_PATH))
            .and(header("authorization", "Bearer token-2"))
            .respond_with(text_response(r#"[{"id": "a_supers", "detected": true}]"#))
            .expect(1)
            .mount(&server)
            .await;

        let tokens = Arc::new(RotatingTokens::default());
        let verdicts = evaluator_with(&server, tokens.clone())
            .evaluate(&request())
            .await
            .unwrap();

        assert!(verdicts[0].detected);
        assert_eq!(tokens.invalidated.load(Ordering::SeqCst), 1);
        assert_eq!(tokens.issued.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_evaluate_retries_quota_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("RESOURCE_EXHAUSTED"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(text_response(r#"[{"id": "a_supers", "detected": false}]"#))
            .mount(&server)
            .await;

        let verdicts = evaluator(&server).evaluate(&request()).await.unwrap();
        assert!(!verdicts[0].detected);
    }

    #[tokio::test]
    async fn test_evaluate_does_not_retry_bad_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid argument"))
            .expect(1)
            .mount(&server)
            .await;

        let err = evaluator(&server).evaluate(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::Rejected { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_evaluate_reports_blocked_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{"finishReason": "SAFETY"}]
            })))
            .mount(&server)
            .await;

        let err = evaluator(&server).evaluate(&request()).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse(ref m) if m.contains("SAFETY")));
    }

    #[test]
    fn test_parse_verdicts_rejects_non_array() {
        assert!(parse_verdicts(r#"{"id": "a_supers"}"#).is_err());
        assert!(parse_verdicts("```json\n[]\n```").unwrap().is_empty());
    }
}
