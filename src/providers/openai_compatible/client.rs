//! OpenAI Compatible Client

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;

use super::config::{AuthStyle, OpenAiCompatibleConfig};
use super::streaming::OpenAiCompatStreamTransformer;
use super::transformers::{OpenAiCompatRequestTransformer, OpenAiCompatResponseTransformer};
use crate::error::LlmError;
use crate::executors::HttpChatExecutor;
use crate::observability::ProviderTracer;
use crate::providers::{finish_chat, finish_stream};
use crate::traits::ChatCapability;
use crate::transport::HttpTransport;
use crate::types::{ChatRequest, ChatResponse, ChatStream, Vendor};

fn build_headers(
    auth: AuthStyle,
    api_key: &SecretString,
    custom: &HeaderMap,
) -> Result<HeaderMap, LlmError> {
    let mut headers = HeaderMap::new();
    match auth {
        AuthStyle::Bearer => {
            let value = HeaderValue::from_str(&format!("Bearer {}", api_key.expose_secret()))
                .map_err(|e| LlmError::ConfigurationError(format!("Invalid API key: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }
        AuthStyle::ApiKeyHeader => {
            let value = HeaderValue::from_str(api_key.expose_secret())
                .map_err(|e| LlmError::ConfigurationError(format!("Invalid API key: {e}")))?;
            headers.insert(HeaderName::from_static("api-key"), value);
        }
    }
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    for (name, value) in custom {
        headers.insert(name.clone(), value.clone());
    }
    Ok(headers)
}

/// Chat client for any vendor speaking the chat-completions format.
#[derive(Clone)]
pub struct OpenAiCompatibleClient {
    config: OpenAiCompatibleConfig,
    transport: Arc<dyn HttpTransport>,
}

impl OpenAiCompatibleClient {
    pub fn new(
        config: OpenAiCompatibleConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, LlmError> {
        config.validate()?;
        Ok(Self { config, transport })
    }

    pub fn config(&self) -> &OpenAiCompatibleConfig {
        &self.config
    }

    fn executor(&self, model: &str) -> HttpChatExecutor {
        let provider_id = self.config.vendor.as_str().to_string();
        let url = self.config.chat_url(model);
        let auth = self.config.auth;
        let api_key = self.config.api_key.clone();
        let custom = self.config.custom_headers.clone();

        HttpChatExecutor {
            provider_id: provider_id.clone(),
            transport: self.transport.clone(),
            request_transformer: Arc::new(OpenAiCompatRequestTransformer {
                provider_id: provider_id.clone(),
                token_limit: self.config.token_limit.clone(),
                include_model: self.config.sends_model(),
            }),
            response_transformer: Arc::new(OpenAiCompatResponseTransformer {
                provider_id: provider_id.clone(),
            }),
            stream_transformer: Some(Arc::new(OpenAiCompatStreamTransformer { provider_id })),
            url,
            build_headers: Box::new(move || {
                let mut headers = build_headers(auth, &api_key, &custom)?;
                headers.insert(ACCEPT, HeaderValue::from_static("application/json, text/event-stream"));
                Ok(headers)
            }),
        }
    }
}

impl std::fmt::Debug for OpenAiCompatibleClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatibleClient")
            .field("vendor", &self.config.vendor)
            .field("endpoint", &self.config.endpoint)
            .field("default_model", &self.config.default_model)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ChatCapability for OpenAiCompatibleClient {
    fn vendor(&self) -> Vendor {
        self.config.vendor
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    async fn chat(&self, request: &ChatRequest) -> ChatResponse {
        let model = request.resolve_model(&self.config.default_model);
        let tracer = ProviderTracer::new(self.config.vendor.as_str(), &model);
        tracer.trace_request_start(false);

        let result = match request.validate() {
            Ok(()) => self.executor(&model).execute(request, &model).await,
            Err(e) => Err(e),
        };
        finish_chat(&tracer, model, result)
    }

    async fn chat_stream(&self, request: &ChatRequest) -> ChatStream {
        let model = request.resolve_model(&self.config.default_model);
        let tracer = ProviderTracer::new(self.config.vendor.as_str(), &model);
        tracer.trace_request_start(true);

        let result = match request.validate() {
            Ok(()) => self.executor(&model).execute_stream(request, &model).await,
            Err(e) => Err(e),
        };
        finish_stream(&tracer, model, result)
    }
}
