//! Vendor adapters
//!
//! One adapter per vendor, gathered into the closed [`VendorClient`] enum.
//! OpenAI, AIHubMix, Zhipu and Azure share the OpenAI-compatible client and
//! differ only in endpoint, auth header and token-limit policy. Qwen and Baidu
//! speak their own wire formats.

pub mod aihubmix;
pub mod azure;
pub mod baidu;
pub mod openai;
pub mod openai_compatible;
pub mod qwen;
pub mod zhipu;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::error::LlmError;
use crate::observability::ProviderTracer;
use crate::traits::ChatCapability;
use crate::types::{ChatRequest, ChatResponse, ChatStream, Completion, Vendor};
use crate::utils::streaming::StreamFactory;

pub use aihubmix::{AiHubMixClient, AiHubMixConfig};
pub use azure::{AzureClient, AzureConfig};
pub use baidu::{BaiduClient, BaiduConfig};
pub use openai::{OpenAiClient, OpenAiConfig};
pub use openai_compatible::OpenAiCompatibleClient;
pub use qwen::{QwenClient, QwenConfig};
pub use zhipu::{ZhipuClient, ZhipuConfig};

/// One adapter per vendor.
pub enum VendorClient {
    OpenAi(OpenAiClient),
    Qwen(QwenClient),
    Zhipu(ZhipuClient),
    Baidu(BaiduClient),
    AiHubMix(AiHubMixClient),
    Azure(AzureClient),
}

impl VendorClient {
    fn inner(&self) -> &dyn ChatCapability {
        match self {
            Self::OpenAi(c) => c,
            Self::Qwen(c) => c,
            Self::Zhipu(c) => c,
            Self::Baidu(c) => c,
            Self::AiHubMix(c) => c,
            Self::Azure(c) => c,
        }
    }
}

impl std::fmt::Debug for VendorClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VendorClient")
            .field("vendor", &self.vendor())
            .field("default_model", &self.default_model())
            .finish()
    }
}

#[async_trait]
impl ChatCapability for VendorClient {
    fn vendor(&self) -> Vendor {
        self.inner().vendor()
    }

    fn default_model(&self) -> &str {
        self.inner().default_model()
    }

    async fn chat(&self, request: &ChatRequest) -> ChatResponse {
        self.inner().chat(request).await
    }

    async fn chat_stream(&self, request: &ChatRequest) -> ChatStream {
        self.inner().chat_stream(request).await
    }
}

fn non_blank_secret(secret: &SecretString) -> bool {
    !secret.expose_secret().trim().is_empty()
}

/// Explicit credential first, then the settings value. Blank counts as
/// missing at both levels.
pub(crate) fn require_secret(
    vendor: Vendor,
    field: &'static str,
    explicit: Option<SecretString>,
    fallback: Option<&SecretString>,
) -> Result<SecretString, LlmError> {
    explicit
        .filter(non_blank_secret)
        .or_else(|| fallback.filter(|s| non_blank_secret(s)).cloned())
        .ok_or(LlmError::MissingCredential { vendor, field })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Same as [`require_secret`] for non-secret components (endpoint, version).
pub(crate) fn require_value(
    vendor: Vendor,
    field: &'static str,
    explicit: Option<String>,
    fallback: Option<&String>,
) -> Result<String, LlmError> {
    non_blank(explicit)
        .or_else(|| non_blank(fallback.cloned()))
        .ok_or(LlmError::MissingCredential { vendor, field })
}

/// Explicit value, settings override, then built-in default.
pub(crate) fn resolve_base_url(
    explicit: Option<String>,
    fallback: Option<&String>,
    default: &str,
) -> String {
    let base = non_blank(explicit)
        .or_else(|| non_blank(fallback.cloned()))
        .unwrap_or_else(|| default.to_string());
    crate::utils::url::normalize_base_url(&base)
}

/// Turn an adapter-internal result into the public response, logging failures.
pub(crate) fn finish_chat(
    tracer: &ProviderTracer,
    model: String,
    result: Result<Completion, LlmError>,
) -> ChatResponse {
    match &result {
        Ok(_) => tracer.trace_success(),
        Err(e) => tracer.trace_failure(e),
    }
    ChatResponse::from_result(model, result)
}

/// Streaming counterpart of [`finish_chat`]: an early failure becomes a
/// single failing chunk.
pub(crate) fn finish_stream(
    tracer: &ProviderTracer,
    model: String,
    result: Result<ChatStream, LlmError>,
) -> ChatStream {
    match result {
        Ok(stream) => stream,
        Err(e) => {
            tracer.trace_failure(&e);
            StreamFactory::failed(Some(model), &e)
        }
    }
}
