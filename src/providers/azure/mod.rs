//! Azure OpenAI adapter
//!
//! Requests target a deployment (`/openai/deployments/{deployment}/...`) with
//! an `api-version` query parameter and an `api-key` header. The request's
//! `model` is the deployment alias and is echoed back as the response model.

use secrecy::SecretString;
use std::sync::Arc;

use crate::config::Settings;
use crate::error::LlmError;
use crate::params::TokenLimitPolicy;
use crate::providers::openai_compatible::{
    AuthStyle, Endpoint, OpenAiCompatibleClient, OpenAiCompatibleConfig, delegate_chat_capability,
};
use crate::providers::{require_secret, require_value};
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::Vendor;

#[derive(Debug, Clone, Default)]
pub struct AzureConfig {
    pub api_key: Option<SecretString>,
    /// Resource endpoint, e.g. `https://my-resource.openai.azure.com/`
    pub endpoint: Option<String>,
    pub api_version: Option<String>,
    pub default_deployment: Option<String>,
}

impl AzureConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(api_key.into()));
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = Some(api_version.into());
        self
    }

    pub fn with_default_deployment(mut self, deployment: impl Into<String>) -> Self {
        self.default_deployment = Some(deployment.into());
        self
    }

    fn resolve(self, settings: &Settings) -> Result<OpenAiCompatibleConfig, LlmError> {
        let api_key = require_secret(
            Vendor::Azure,
            "api_key",
            self.api_key,
            settings.azure.api_key.as_ref(),
        )?;
        let endpoint = require_value(
            Vendor::Azure,
            "endpoint",
            self.endpoint,
            settings.azure.endpoint.as_ref(),
        )?;
        let api_version = require_value(
            Vendor::Azure,
            "api_version",
            self.api_version,
            settings.azure.api_version.as_ref(),
        )?;
        Ok(OpenAiCompatibleConfig::new(Vendor::Azure, api_key, "")
            .with_endpoint(Endpoint::AzureDeployment {
                endpoint: crate::utils::url::normalize_base_url(&endpoint),
                api_version,
            })
            .with_auth(AuthStyle::ApiKeyHeader)
            .with_default_model(
                self.default_deployment
                    .unwrap_or_else(|| settings.default_model(Vendor::Azure).to_string()),
            )
            .with_token_limit(TokenLimitPolicy::legacy()))
    }
}

/// Azure OpenAI chat adapter
#[derive(Debug, Clone)]
pub struct AzureClient {
    inner: OpenAiCompatibleClient,
}

impl AzureClient {
    pub fn from_settings(settings: &Settings) -> Result<Self, LlmError> {
        Self::new(AzureConfig::default(), settings)
    }

    pub fn new(config: AzureConfig, settings: &Settings) -> Result<Self, LlmError> {
        let resolved = config.resolve(settings)?;
        let transport = Arc::new(ReqwestTransport::from_config(&settings.http)?);
        Ok(Self {
            inner: OpenAiCompatibleClient::new(resolved, transport)?,
        })
    }

    pub fn with_transport(
        config: AzureConfig,
        settings: &Settings,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, LlmError> {
        Ok(Self {
            inner: OpenAiCompatibleClient::new(config.resolve(settings)?, transport)?,
        })
    }
}

delegate_chat_capability!(AzureClient);
