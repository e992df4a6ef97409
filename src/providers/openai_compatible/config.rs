//! OpenAI-compatible client configuration

use reqwest::header::HeaderMap;
use secrecy::SecretString;

use crate::error::LlmError;
use crate::params::TokenLimitPolicy;
use crate::types::Vendor;

/// How the API key travels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthStyle {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// `api-key: <key>` (Azure)
    ApiKeyHeader,
}

/// Where requests go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `{base_url}/chat/completions`; the model goes in the body
    Standard { base_url: String },
    /// `{endpoint}/openai/deployments/{deployment}/chat/completions?api-version=..`;
    /// the model is the deployment in the path
    AzureDeployment {
        endpoint: String,
        api_version: String,
    },
}

/// Fully resolved configuration; every credential is present.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    pub vendor: Vendor,
    pub api_key: SecretString,
    pub endpoint: Endpoint,
    pub auth: AuthStyle,
    pub default_model: String,
    pub token_limit: TokenLimitPolicy,
    /// Extra headers sent with every request
    pub custom_headers: HeaderMap,
}

impl OpenAiCompatibleConfig {
    pub fn new(vendor: Vendor, api_key: SecretString, base_url: impl Into<String>) -> Self {
        Self {
            vendor,
            api_key,
            endpoint: Endpoint::Standard {
                base_url: base_url.into(),
            },
            auth: AuthStyle::Bearer,
            default_model: crate::config::builtin_default_model(vendor).to_string(),
            token_limit: TokenLimitPolicy::legacy(),
            custom_headers: HeaderMap::new(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    pub fn with_auth(mut self, auth: AuthStyle) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    pub fn with_token_limit(mut self, policy: TokenLimitPolicy) -> Self {
        self.token_limit = policy;
        self
    }

    /// Add a custom header
    pub fn with_header(mut self, key: &str, value: &str) -> Result<Self, LlmError> {
        let name = reqwest::header::HeaderName::from_bytes(key.as_bytes())
            .map_err(|e| LlmError::ConfigurationError(format!("Invalid header name: {e}")))?;
        let value = reqwest::header::HeaderValue::from_str(value)
            .map_err(|e| LlmError::ConfigurationError(format!("Invalid header value: {e}")))?;
        self.custom_headers.insert(name, value);
        Ok(self)
    }

    /// Whether the model id belongs in the body
    pub fn sends_model(&self) -> bool {
        matches!(self.endpoint, Endpoint::Standard { .. })
    }

    /// Chat URL for `model`
    pub fn chat_url(&self, model: &str) -> String {
        match &self.endpoint {
            Endpoint::Standard { base_url } => {
                crate::utils::url::join_url(base_url, "chat/completions")
            }
            Endpoint::AzureDeployment {
                endpoint,
                api_version,
            } => format!(
                "{}/openai/deployments/{}/chat/completions?api-version={}",
                endpoint.trim_end_matches('/'),
                urlencoding::encode(model),
                urlencoding::encode(api_version),
            ),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), LlmError> {
        let url_ok = match &self.endpoint {
            Endpoint::Standard { base_url } => base_url.starts_with("http"),
            Endpoint::AzureDeployment { endpoint, .. } => endpoint.starts_with("http"),
        };
        if !url_ok {
            return Err(LlmError::ConfigurationError(format!(
                "{}: endpoint must be an http(s) URL",
                self.vendor
            )));
        }
        if self.default_model.trim().is_empty() {
            return Err(LlmError::ConfigurationError(format!(
                "{}: default model cannot be empty",
                self.vendor
            )));
        }
        Ok(())
    }
}
