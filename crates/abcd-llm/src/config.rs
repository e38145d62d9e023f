//! Model configuration.

use serde::{Deserialize, Serialize};

use crate::error::{LlmError, LlmResult};

pub const DEFAULT_LOCATION: &str = "us-central1";
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro-002";

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationSettings {
    pub max_output_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    /// Not every model accepts `top_k`; `None` leaves it out of the request.
    pub top_k: Option<u32>,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_output_tokens: 8192,
            temperature: 1.0,
            top_p: 0.95,
            top_k: None,
        }
    }
}

/// Vertex AI Gemini configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Google Cloud project billed for the calls; it must be able to read the videos.
    pub project_id: String,
    pub location: String,
    pub model: String,
    /// Overrides the regional `aiplatform` host.
    pub base_url: Option<String>,
    pub generation: GenerationSettings,
}

impl LlmConfig {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            location: DEFAULT_LOCATION.to_string(),
            model: DEFAULT_MODEL.to_string(),
            base_url: None,
            generation: GenerationSettings::default(),
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> LlmResult<Self> {
        let project_id = std::env::var("ABCD_GCP_PROJECT_ID")
            .or_else(|_| std::env::var("GOOGLE_CLOUD_PROJECT"))
            .ok()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| LlmError::config("ABCD_GCP_PROJECT_ID not set"))?;

        let defaults = GenerationSettings::default();

        Ok(Self {
            project_id,
            location: std::env::var("ABCD_GCP_LOCATION")
                .ok()
                .filter(|l| !l.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOCATION.to_string()),
            model: std::env::var("ABCD_LLM_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            base_url: std::env::var("ABCD_LLM_BASE_URL").ok().filter(|u| !u.trim().is_empty()),
            generation: GenerationSettings {
                max_output_tokens: std::env::var("ABCD_LLM_MAX_OUTPUT_TOKENS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.max_output_tokens),
                temperature: std::env::var("ABCD_LLM_TEMPERATURE")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.temperature),
                top_p: std::env::var("ABCD_LLM_TOP_P")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.top_p),
                top_k: std::env::var("ABCD_LLM_TOP_K").ok().and_then(|s| s.parse().ok()),
            },
        })
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// `generateContent` endpoint of the configured publisher model.
    pub fn generate_content_url(&self) -> String {
        let host = match &self.base_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}-aiplatform.googleapis.com", self.location),
        };
        format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            host, self.project_id, self.location, self.model
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LlmConfig::new("ads-project");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.location, "us-central1");
        assert_eq!(config.generation.max_output_tokens, 8192);
        assert!(config.generation.top_k.is_none());
    }

    #[test]
    fn test_vertex_endpoint() {
        let config = LlmConfig::new("ads-project").with_location("europe-west4");
        assert_eq!(
            config.generate_content_url(),
            "https://europe-west4-aiplatform.googleapis.com/v1/projects/ads-project/locations/europe-west4/publishers/google/models/gemini-1.5-pro-002:generateContent"
        );
    }

    #[test]
    fn test_base_url_override() {
        let config = LlmConfig::new("ads-project")
            .with_model("gemini-2.0-flash")
            .with_base_url("http://localhost:1234/");
        assert_eq!(
            config.generate_content_url(),
            "http://localhost:1234/v1/projects/ads-project/locations/us-central1/publishers/google/models/gemini-2.0-flash:generateContent"
        );
    }
}
