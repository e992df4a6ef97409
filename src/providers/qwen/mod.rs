//! Alibaba DashScope (Qwen) adapter
//!
//! Uses the native text-generation endpoint rather than the compatible mode,
//! so request parameters live under `parameters` and the answer under
//! `output.text`.

pub mod streaming;
pub mod transformers;
pub mod types;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

use crate::config::Settings;
use crate::error::LlmError;
use crate::executors::HttpChatExecutor;
use crate::observability::ProviderTracer;
use crate::providers::{finish_chat, finish_stream, require_secret, resolve_base_url};
use crate::traits::ChatCapability;
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::{ChatRequest, ChatResponse, ChatStream, Vendor};
use crate::utils::url::join_url;
use streaming::QwenStreamTransformer;
use transformers::{QwenRequestTransformer, QwenResponseTransformer};

pub const DEFAULT_BASE_URL: &str = "https://dashscope.aliyuncs.com/api/v1";
const GENERATION_PATH: &str = "services/aigc/text-generation/generation";

#[derive(Debug, Clone, Default)]
pub struct QwenConfig {
    pub api_key: Option<SecretString>,
    pub base_url: Option<String>,
    pub default_model: Option<String>,
}

impl QwenConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
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

/// DashScope chat adapter
#[derive(Clone)]
pub struct QwenClient {
    api_key: SecretString,
    base_url: String,
    default_model: String,
    transport: Arc<dyn HttpTransport>,
}

impl QwenClient {
    pub fn from_settings(settings: &Settings) -> Result<Self, LlmError> {
        Self::new(QwenConfig::default(), settings)
    }

    pub fn new(config: QwenConfig, settings: &Settings) -> Result<Self, LlmError> {
        let transport = Arc::new(ReqwestTransport::from_config(&settings.http)?);
        Self::with_transport(config, settings, transport)
    }

    pub fn with_transport(
        config: QwenConfig,
        settings: &Settings,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, LlmError> {
        let api_key = require_secret(
            Vendor::Qwen,
            "api_key",
            config.api_key,
            settings.qwen.api_key.as_ref(),
        )?;
        Ok(Self {
            api_key,
            base_url: resolve_base_url(
                config.base_url,
                settings.qwen.base_url.as_ref(),
                DEFAULT_BASE_URL,
            ),
            default_model: config
                .default_model
                .unwrap_or_else(|| settings.default_model(Vendor::Qwen).to_string()),
            transport,
        })
    }

    fn executor(&self, stream: bool) -> HttpChatExecutor {
        let url = join_url(&self.base_url, GENERATION_PATH);
        let api_key = self.api_key.clone();

        HttpChatExecutor {
            provider_id: Vendor::Qwen.as_str().to_string(),
            transport: self.transport.clone(),
            request_transformer: Arc::new(QwenRequestTransformer),
            response_transformer: Arc::new(QwenResponseTransformer),
            stream_transformer: Some(Arc::new(QwenStreamTransformer)),
            url,
            build_headers: Box::new(move || {
                let mut headers = HeaderMap::new();
                headers.insert(
                    AUTHORIZATION,
                    HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
                        .map_err(|e| LlmError::ConfigurationError(format!("Invalid API key: {e}")))?,
                );
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                if stream {
                    headers.insert(
                        HeaderName::from_static("x-dashscope-sse"),
                        HeaderValue::from_static("enable"),
                    );
                    headers.insert(ACCEPT, HeaderValue::from_static("text/event-stream"));
                }
                Ok(headers)
            }),
        }
    }
}

impl std::fmt::Debug for QwenClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QwenClient")
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ChatCapability for QwenClient {
    fn vendor(&self) -> Vendor {
        Vendor::Qwen
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    async fn chat(&self, request: &ChatRequest) -> ChatResponse {
        let model = request.resolve_model(&self.default_model);
        let tracer = ProviderTracer::new(Vendor::Qwen.as_str(), &model);
        tracer.trace_request_start(false);

        let result = match request.validate() {
            Ok(()) => self.executor(false).execute(request, &model).await,
            Err(e) => Err(e),
        };
        finish_chat(&tracer, model, result)
    }

    async fn chat_stream(&self, request: &ChatRequest) -> ChatStream {
        let model = request.resolve_model(&self.default_model);
        let tracer = ProviderTracer::new(Vendor::Qwen.as_str(), &model);
        tracer.trace_request_start(true);

        let result = match request.validate() {
            Ok(()) => self.executor(true).execute_stream(request, &model).await,
            Err(e) => Err(e),
        };
        finish_stream(&tracer, model, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key() {
        let err = QwenClient::from_settings(&Settings::default()).unwrap_err();
        assert_eq!(
            err,
            LlmError::MissingCredential {
                vendor: Vendor::Qwen,
                field: "api_key"
            }
        );
    }

    #[test]
    fn test_settings_default_model_and_base() {
        let mut settings = Settings::default().with_default_model(Vendor::Qwen, "qwen-max");
        settings.qwen.api_key = Some(SecretString::from("sk-dash"));
        settings.qwen.base_url = Some("https://dashscope-intl.aliyuncs.com/api/v1/".into());
        let client = QwenClient::from_settings(&settings).unwrap();
        assert_eq!(client.default_model(), "qwen-max");
        assert_eq!(client.base_url, "https://dashscope-intl.aliyuncs.com/api/v1");
    }

    #[test]
    fn test_blank_explicit_key_uses_settings() {
        let mut settings = Settings::default();
        settings.qwen.api_key = Some(SecretString::from("sk-settings"));
        let client =
            QwenClient::new(QwenConfig::new().with_api_key(""), &settings).unwrap();
        assert_eq!(client.api_key.expose_secret(), "sk-settings");
    }

    #[test]
    fn test_executor_url_same_for_both_modes() {
        let client =
            QwenClient::new(QwenConfig::new().with_api_key("sk-dash"), &Settings::default())
                .unwrap();
        let expected =
            "https://dashscope.aliyuncs.com/api/v1/services/aigc/text-generation/generation";
        assert_eq!(client.executor(false).url, expected);
        assert_eq!(client.executor(true).url, expected);
    }

    #[test]
    fn test_stream_headers() {
        let client =
            QwenClient::new(QwenConfig::new().with_api_key("sk-dash"), &Settings::default())
                .unwrap();
        let headers = (client.executor(true).build_headers)().unwrap();
        assert_eq!(headers["x-dashscope-sse"], "enable");
        let headers = (client.executor(false).build_headers)().unwrap();
        assert!(headers.get("x-dashscope-sse").is_none());
        assert_eq!(headers[AUTHORIZATION], "Bearer sk-dash");
    }
}
