//! Access tokens for Vertex AI.
//!
//! [`GcpTokenSource`] wraps a `gcp_auth` provider (application default
//! credentials, a service account key or the metadata server) behind a
//! cache that refreshes ahead of expiry and lets one caller refresh at a time.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use gcp_auth::TokenProvider;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::error::{LlmError, LlmResult};

/// Refresh this long before the token expires.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// TTL assumed when the provider reports an expiry we cannot use.
const TOKEN_DEFAULT_TTL: Duration = Duration::from_secs(50 * 60);

/// OAuth scope for Vertex AI.
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Source of bearer tokens for model calls.
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    async fn access_token(&self) -> LlmResult<String>;

    /// Drop any cached token after the server rejected it.
    async fn invalidate(&self) {}
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_valid(&self) -> bool {
        Instant::now() + TOKEN_REFRESH_MARGIN < self.expires_at
    }

    fn is_usable(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Cached tokens from a `gcp_auth` provider.
pub struct GcpTokenSource {
    auth: Arc<dyn TokenProvider>,
    cache: RwLock<Option<CachedToken>>,
}

impl GcpTokenSource {
    pub fn new(auth: Arc<dyn TokenProvider>) -> Self {
        Self {
            auth,
            cache: RwLock::new(None),
        }
    }

    /// Discover credentials the way the Google client libraries do.
    pub async fn from_env() -> LlmResult<Self> {
        let auth = gcp_auth::provider()
            .await
            .map_err(|e| LlmError::auth(format!("no Google Cloud credentials: {}", e)))?;
        Ok(Self::new(auth))
    }

    async fn refresh(&self, cache: &mut Option<CachedToken>) -> LlmResult<String> {
        match self.auth.token(&[CLOUD_PLATFORM_SCOPE]).await {
            Ok(token) => {
                let access_token = token.as_str().to_string();
                let now = Utc::now();
                let exp = token.expires_at();
                let expires_at = if exp > now {
                    match (exp - now).to_std() {
                        Ok(ttl) => Instant::now() + ttl,
                        Err(_) => Instant::now() + TOKEN_DEFAULT_TTL,
                    }
                } else {
                    Instant::now()
                };

                *cache = Some(CachedToken {
                    access_token: access_token.clone(),
                    expires_at,
                });
                debug!("Refreshed Vertex AI access token");
                Ok(access_token)
            }
            Err(e) => {
                if let Some(cached) = cache.as_ref() {
                    if cached.is_usable() {
                        warn!("Token refresh failed, using existing token: {}", e);
                        return Ok(cached.access_token.clone());
                    }
                }
                Err(LlmError::auth(format!("failed to obtain access token: {}", e)))
            }
        }
    }
}

#[async_trait]
impl AccessTokenSource for GcpTokenSource {
    async fn access_token(&self) -> LlmResult<String> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref().filter(|c| c.is_valid()) {
                return Ok(cached.access_token.clone());
            }
        }

        let mut cache = self.cache.write().await;
        if let Some(cached) = cache.as_ref().filter(|c| c.is_valid()) {
            return Ok(cached.access_token.clone());
        }
        self.refresh(&mut cache).await
    }

    async fn invalidate(&self) {
        *self.cache.write().await = None;
    }
}

/// A fixed token, e.g. from `gcloud auth print-access-token`.
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl AccessTokenSource for StaticToken {
    async fn access_token(&self) -> LlmResult<String> {
        Ok(self.0.clone())
    }
}
