//! Baidu Qianfan (ERNIE) adapter
//!
//! Needs two credentials: the API key and secret key are exchanged for an
//! access token (see [`QianfanTokenProvider`]), which then travels in the
//! query string of every chat call. When the vendor reports the token invalid
//! or expired, before or during a stream, the cache is dropped; the failed
//! call itself is not retried.

pub mod models;
pub mod streaming;
pub mod transformers;

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::SecretString;
use std::sync::Arc;

use crate::auth::TokenProvider;
use crate::auth::qianfan::QianfanTokenProvider;
use crate::config::Settings;
use crate::error::LlmError;
use crate::executors::HttpChatExecutor;
use crate::observability::ProviderTracer;
use crate::providers::{finish_chat, finish_stream, require_secret, resolve_base_url};
use crate::traits::ChatCapability;
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::{ChatRequest, ChatResponse, ChatStream, Completion, Vendor};
use crate::utils::url::join_url;
use streaming::BaiduStreamTransformer;
use transformers::{
    BaiduRequestTransformer, BaiduResponseTransformer, is_token_error, is_token_error_code,
};

pub const DEFAULT_BASE_URL: &str = "https://aip.baidubce.com";
const CHAT_PATH: &str = "rpc/2.0/ai_custom/v1/wenxinworkshop/chat";

#[derive(Debug, Clone, Default)]
pub struct BaiduConfig {
    pub api_key: Option<SecretString>,
    pub secret_key: Option<SecretString>,
    pub base_url: Option<String>,
    pub default_model: Option<String>,
}

impl BaiduConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    pub fn with_secret_key(mut self, secret_key: impl Into<String>) -> Self {
        self.secret_key = Some(SecretString::from(secret_key.into()));
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = Some(model.into());
        self
    }
}

/// Qianfan chat adapter
#[derive(Clone)]
pub struct BaiduClient {
    base_url: String,
    default_model: String,
    token_provider: Arc<dyn TokenProvider>,
    transport: Arc<dyn HttpTransport>,
}

impl BaiduClient {
    pub fn from_settings(settings: &Settings) -> Result<Self, LlmError> {
        Self::new(BaiduConfig::default(), settings)
    }

    pub fn new(config: BaiduConfig, settings: &Settings) -> Result<Self, LlmError> {
        let transport = Arc::new(ReqwestTransport::from_config(&settings.http)?);
        Self::with_transport(config, settings, transport)
    }

    pub fn with_transport(
        config: BaiduConfig,
        settings: &Settings,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, LlmError> {
        let api_key = require_secret(
            Vendor::Baidu,
            "api_key",
            config.api_key,
            settings.baidu.api_key.as_ref(),
        )?;
        let secret_key = require_secret(
            Vendor::Baidu,
            "secret_key",
            config.secret_key,
            settings.baidu.secret_key.as_ref(),
        )?;
        let base_url = resolve_base_url(
            config.base_url,
            settings.baidu.base_url.as_ref(),
            DEFAULT_BASE_URL,
        );
        let token_provider = Arc::new(QianfanTokenProvider::new(
            api_key,
            secret_key,
            base_url.clone(),
            transport.clone(),
        ));
        Ok(Self {
            base_url,
            default_model: config
                .default_model
                .unwrap_or_else(|| settings.default_model(Vendor::Baidu).to_string()),
            token_provider,
            transport,
        })
    }

    /// Replace the token source (e.g. a token issued out of band)
    pub fn with_token_provider(mut self, provider: Arc<dyn TokenProvider>) -> Self {
        self.token_provider = provider;
        self
    }

    fn chat_url(&self, model: &str, access_token: &str) -> String {
        format!(
            "{}?access_token={}",
            join_url(
                &join_url(&self.base_url, CHAT_PATH),
                &models::endpoint_for(model)
            ),
            urlencoding::encode(access_token)
        )
    }

    fn executor(&self, model: &str, access_token: &str) -> HttpChatExecutor {
        let url = self.chat_url(model, access_token);
        HttpChatExecutor {
            provider_id: Vendor::Baidu.as_str().to_string(),
            transport: self.transport.clone(),
            request_transformer: Arc::new(BaiduRequestTransformer),
            response_transformer: Arc::new(BaiduResponseTransformer),
            stream_transformer: Some(Arc::new(BaiduStreamTransformer)),
            url,
            build_headers: Box::new(|| {
                let mut headers = HeaderMap::new();
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                Ok(headers)
            }),
        }
    }

    async fn invalidate_on_token_error(&self, error: &LlmError) {
        if is_token_error(error) {
            self.token_provider.invalidate().await;
        }
    }

    async fn complete(&self, request: &ChatRequest, model: &str) -> Result<Completion, LlmError> {
        request.validate()?;
        let token = self.token_provider.token().await?;
        let result = self.executor(model, &token).execute(request, model).await;
        if let Err(e) = &result {
            self.invalidate_on_token_error(e).await;
        }
        result
    }

    async fn stream(&self, request: &ChatRequest, model: &str) -> Result<ChatStream, LlmError> {
        request.validate()?;
        let token = self.token_provider.token().await?;
        let stream = match self
            .executor(model, &token)
            .execute_stream(request, model)
            .await
        {
            Ok(stream) => stream,
            Err(e) => {
                self.invalidate_on_token_error(&e).await;
                return Err(e);
            }
        };

        // token errors can also arrive as an SSE event
        let provider = self.token_provider.clone();
        Ok(Box::pin(stream.then(move |chunk| {
            let provider = provider.clone();
            async move {
                if !chunk.success && chunk.code.as_deref().is_some_and(is_token_error_code) {
                    provider.invalidate().await;
                }
                chunk
            }
        })))
    }
}

impl std::fmt::Debug for BaiduClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaiduClient")
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ChatCapability for BaiduClient {
    fn vendor(&self) -> Vendor {
        Vendor::Baidu
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    async fn chat(&self, request: &ChatRequest) -> ChatResponse {
        let model = request.resolve_model(&self.default_model);
        let tracer = ProviderTracer::new(Vendor::Baidu.as_str(), &model);
        tracer.trace_request_start(false);
        let result = self.complete(request, &model).await;
        finish_chat(&tracer, model, result)
    }

    async fn chat_stream(&self, request: &ChatRequest) -> ChatStream {
        let model = request.resolve_model(&self.default_model);
        let tracer = ProviderTracer::new(Vendor::Baidu.as_str(), &model);
        tracer.trace_request_start(true);
        let result = self.stream(request, &model).await;
        finish_stream(&tracer, model, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_secret_named() {
        let err = BaiduClient::new(BaiduConfig::new().with_api_key("ak"), &Settings::default())
            .unwrap_err();
        assert_eq!(
            err,
            LlmError::MissingCredential {
                vendor: Vendor::Baidu,
                field: "secret_key"
            }
        );

        let err = BaiduClient::new(BaiduConfig::new().with_secret_key("sk"), &Settings::default())
            .unwrap_err();
        assert!(matches!(
            err,
            LlmError::MissingCredential {
                field: "api_key",
                ..
            }
        ));
    }

    #[test]
    fn test_chat_url() {
        let client = BaiduClient::new(
            BaiduConfig::new().with_api_key("ak").with_secret_key("sk"),
            &Settings::default(),
        )
        .unwrap();
        assert_eq!(client.default_model(), "ernie-bot-turbo");
        assert_eq!(
            client.chat_url("ernie-bot-turbo", "24.abc"),
            "https://aip.baidubce.com/rpc/2.0/ai_custom/v1/wenxinworkshop/chat/eb-instant?access_token=24.abc"
        );
    }
}
