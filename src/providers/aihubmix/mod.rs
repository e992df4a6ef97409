//! AIHubMix gateway adapter
//!
//! OpenAI-compatible gateway that fronts many model families. Token-limit
//! routing follows the OpenAI rules since the gateway forwards GPT models
//! unchanged.

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

pub const DEFAULT_BASE_URL: &str = "https://aihubmix.com/v1";

#[derive(Debug, Clone, Default)]
pub struct AiHubMixConfig {
    pub api_key: Option<SecretString>,
    pub base_url: Option<String>,
    pub default_model: Option<String>,
    pub new_generation_markers: Option<Vec<String>>,
}

impl AiHubMixConfig {
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
            Vendor::AiHubMix,
            "api_key",
            self.api_key,
            settings.aihubmix.api_key.as_ref(),
        )?;
        let base_url = resolve_base_url(
            self.base_url,
            settings.aihubmix.base_url.as_ref(),
            DEFAULT_BASE_URL,
        );
        let markers = self
            .new_generation_markers
            .unwrap_or_else(|| settings.new_generation_markers.clone());
        Ok(
            OpenAiCompatibleConfig::new(Vendor::AiHubMix, api_key, base_url)
                .with_default_model(
                    self.default_model
                        .unwrap_or_else(|| settings.default_model(Vendor::AiHubMix).to_string()),
                )
                .with_token_limit(TokenLimitPolicy::with_markers(markers)),
        )
    }
}

/// AIHubMix chat adapter
#[derive(Debug, Clone)]
pub struct AiHubMixClient {
    inner: OpenAiCompatibleClient,
}

impl AiHubMixClient {
    pub fn from_settings(settings: &Settings) -> Result<Self, LlmError> {
        Self::new(AiHubMixConfig::default(), settings)
    }

    pub fn new(config: AiHubMixConfig, settings: &Settings) -> Result<Self, LlmError> {
        let resolved = config.resolve(settings)?;
        let transport = Arc::new(ReqwestTransport::from_config(&settings.http)?);
        Ok(Self {
            inner: OpenAiCompatibleClient::new(resolved, transport)?,
        })
    }

    pub fn with_transport(
        config: AiHubMixConfig,
        settings: &Settings,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            inner: OpenAiCompatibleClient::new(config.resolve(settings)?, transport)?,
        })
    }
}

delegate_chat_capability!(AiHubMixClient);
