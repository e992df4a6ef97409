//! Qianfan OAuth client-credentials token provider
//!
//! `POST {base}/oauth/2.0/token?grant_type=client_credentials&client_id=..&client_secret=..`
//! answers `{"access_token": "...", "expires_in": 2592000}` or
//! `{"error": "...", "error_description": "..."}`.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::TokenProvider;
use crate::error::LlmError;
use crate::transport::{HttpRequestContext, HttpTransport, HttpTransportRequest};
use crate::utils::error_handling::classify_http_error;
use crate::utils::url::join_url;

/// Refresh this long before the vendor-reported expiry
const EXPIRY_SAFETY_WINDOW: i64 = 300; // 5 minutes

#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    token: String,
    /// Unix timestamp seconds when token expires
    exp_unix: i64,
}

/// Exchanges the Qianfan key pair for an access token and caches it.
///
/// The async mutex is held across the exchange, so concurrent callers wait
/// for a single fetch.
pub struct QianfanTokenProvider {
    api_key: SecretString,
    secret_key: SecretString,
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    cache: Mutex<Option<CachedToken>>,
}

impl QianfanTokenProvider {
    pub fn new(
        api_key: SecretString,
        secret_key: SecretString,
        base_url: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self {
            api_key,
            secret_key,
            base_url: base_url.into(),
            transport,
            cache: Mutex::new(None),
        }
    }

    fn token_url(&self) -> String {
        format!(
            "{}?grant_type=client_credentials&client_id={}&client_secret={}",
            join_url(&self.base_url, "oauth/2.0/token"),
            urlencoding::encode(self.api_key.expose_secret()),
            urlencoding::encode(self.secret_key.expose_secret()),
        )
    }

    async fn fetch_new_token(&self) -> Result<CachedToken, LlmError> {
        let url = self.token_url();
        let request = HttpTransportRequest {
            ctx: HttpRequestContext {
                provider_id: "baidu".to_string(),
                url: url.clone(),
                stream: false,
            },
            url,
            headers: Default::default(),
            body: None,
        };
        let response = self.transport.execute_json(request).await?;
        if !response.is_success() {
            return Err(classify_http_error(response.status, &response.text()));
        }

        let tr: TokenResponse = serde_json::from_slice(&response.body)
            .map_err(|e| LlmError::ParseError(format!("Failed to parse token response: {e}")))?;
        if let Some(code) = tr.error.filter(|c| !c.is_empty()) {
            return Err(LlmError::VendorError {
                message: tr.error_description.unwrap_or_else(|| code.clone()),
                code,
            });
        }
        let token = tr
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| LlmError::ParseError("token response has no access_token".into()))?;

        let expires_in = tr.expires_in.unwrap_or(0);
        tracing::debug!(provider = "baidu", expires_in, "fetched access token");
        Ok(CachedToken {
            token,
            exp_unix: chrono::Utc::now().timestamp() + expires_in,
        })
    }
}

#[async_trait]
impl TokenProvider for QianfanTokenProvider {
    async fn token(&self) -> Result<String, LlmError> {
        let mut cache = self.cache.lock().await;
        let now = chrono::Utc::now().timestamp();
        if let Some(ct) = cache.as_ref()
            && ct.exp_unix - EXPIRY_SAFETY_WINDOW > now
        {
            return Ok(ct.token.clone());
        }

        let fresh = self.fetch_new_token().await?;
        let token = fresh.token.clone();
        *cache = Some(fresh);
        Ok(token)
    }

    async fn invalidate(&self) {
        tracing::debug!(provider = "baidu", "access token invalidated");
        *self.cache.lock().await = None;
    }
}
