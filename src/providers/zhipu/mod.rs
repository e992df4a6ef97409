//! Zhipu AI adapter (GLM models, v4 chat-completions API)

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

pub const DEFAULT_BASE_URL: &str = "https://open.bigmodel.cn/api/paas/v4";

#[derive(Debug, Clone, Default)]
pub struct ZhipuConfig {
    pub api_key: Option<SecretString>,
    pub base_url: Option<String>,
    pub default_model: Option<String>,
}

impl ZhipuConfig {
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

    fn resolve(self, settings: &Settings) -> Result<OpenAiCompatibleConfig, LlmError> {
        let api_key = require_secret(
            Vendor::Zhipu,
            "api_key",
            self.api_key,
            settings.zhipu.api_key.as_ref(),
        )?;
        let base_url = resolve_base_url(
            self.base_url,
            settings.zhipu.base_url.as_ref(),
            DEFAULT_BASE_URL,
        );
        Ok(OpenAiCompatibleConfig::new(Vendor::Zhipu, api_key, base_url)
            .with_default_model(
                self.default_model
                    .unwrap_or_else(|| settings.default_model(Vendor::Zhipu).to_string()),
            )
            .with_token_limit(TokenLimitPolicy::legacy()))
    }
}

/// Zhipu chat adapter
#[derive(Debug, Clone)]
pub struct ZhipuClient {
    inner: OpenAiCompatibleClient,
}

impl ZhipuClient {
    pub fn from_settings(settings: &Settings) -> Result<Self, LlmError> {
        Self::new(ZhipuConfig::default(), settings)
    }

    pub fn new(config: ZhipuConfig, settings: &Settings) -> Result<Self, LlmError> {
        let resolved = config.resolve(settings)?;
        let transport = Arc::new(ReqwestTransport::from_config(&settings.http)?);
        Ok(Self {
            inner: OpenAiCompatibleClient::new(resolved, transport)?,
        })
    }

    pub fn with_transport(
        config: ZhipuConfig,
        settings: &Settings,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            inner: OpenAiCompatibleClient::new(config.resolve(settings)?, transport)?,
        })
    }
}

delegate_chat_capability!(ZhipuClient);
