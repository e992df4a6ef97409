//! OpenAI adapter
//!
//! Chat completions with model-dependent token-limit routing: models matching a
//! new-generation marker get `max_completion_tokens`, everything else
//! `max_tokens`.

use secrecy::SecretString;
use std::sync::Arc;

use crate::config::Settings;
use crate::error::LlmError;
use crate::params::TokenLimitPolicy;
use crate::providers::openai_compatible::{
    OpenAiCompatibleClient, OpenAiCompatibleConfig, delegate_chat_capability,
};
use crate::providers::{require_secret, resolve_base_url};
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::Vendor;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Explicit OpenAI configuration; unset fields fall back to [`Settings`].
#[derive(Debug, Clone, Default)]
pub struct OpenAiConfig {
    pub api_key: Option<SecretString>,
    pub base_url: Option<String>,
    pub default_model: Option<String>,
    pub new_generation_markers: Option<Vec<String>>,
}

impl OpenAiConfig {
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

    pub fn with_new_generation_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.new_generation_markers = Some(markers.into_iter().map(Into::into).collect());
        self
    }

    fn resolve(self, settings: &Settings) -> Result<OpenAiCompatibleConfig, LlmError> {
        let api_key = require_secret(
            Vendor::OpenAi,
            "api_key",
            self.api_key,
            settings.openai.api_key.as_ref(),
        )?;
        let base_url = resolve_base_url(
            self.base_url,
            settings.openai.base_url.as_ref(),
            DEFAULT_BASE_URL,
        );
        let markers = self
            .new_generation_markers
            .unwrap_or_else(|| settings.new_generation_markers.clone());
        Ok(OpenAiCompatibleConfig::new(Vendor::OpenAi, api_key, base_url)
            .with_default_model(
                self.default_model
                    .unwrap_or_else(|| settings.default_model(Vendor::OpenAi).to_string()),
            )
            .with_token_limit(TokenLimitPolicy::with_markers(markers)))
    }
}

/// OpenAI chat adapter
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    inner: OpenAiCompatibleClient,
}

impl OpenAiClient {
    /// Everything from settings
    pub fn from_settings(settings: &Settings) -> Result<Self, LlmError> {
        Self::new(OpenAiConfig::default(), settings)
    }

    pub fn new(config: OpenAiConfig, settings: &Settings) -> Result<Self, LlmError> {
        let resolved = config.resolve(settings)?;
        let transport = Arc::new(ReqwestTransport::from_config(&settings.http)?);
        Ok(Self {
            inner: OpenAiCompatibleClient::new(resolved, transport)?,
        })
    }

    /// Use a caller-supplied transport
    pub fn with_transport(
        config: OpenAiConfig,
        settings: &Settings,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            inner: OpenAiCompatibleClient::new(config.resolve(settings)?, transport)?,
        })
    }
}

delegate_chat_capability!(OpenAiClient);
