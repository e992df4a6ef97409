//! Configuration
//!
//! `Settings` is loaded once at process start and injected into adapters and
//! the registry. Adapters consult it only after their explicit configuration,
//! so a value set on e.g. [`QwenConfig`](crate::providers::qwen::QwenConfig)
//! always wins.

use secrecy::SecretString;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::error::LlmError;
use crate::params::DEFAULT_NEW_GENERATION_MARKERS;
use crate::types::Vendor;

/// Azure OpenAI API version used when none is configured
pub const DEFAULT_AZURE_API_VERSION: &str = "2024-08-01-preview";

/// Built-in default model per vendor
pub fn builtin_default_model(vendor: Vendor) -> &'static str {
    match vendor {
        Vendor::OpenAi => "gpt-4o",
        Vendor::Qwen => "qwen-turbo",
        Vendor::Zhipu => "glm-4",
        Vendor::Baidu => "ernie-bot-turbo",
        Vendor::AiHubMix => "gpt-4o",
        // Azure expects a deployment name created in the portal
        Vendor::Azure => "gpt-4o-deployment",
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpConfig {
    /// Whole-request timeout
    pub timeout: Option<Duration>,
    /// Connect timeout
    pub connect_timeout: Option<Duration>,
    /// Custom `User-Agent`
    pub user_agent: Option<String>,
}

impl HttpConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}

/// Single API key with an optional endpoint override
#[derive(Debug, Clone, Default)]
pub struct ApiKeySettings {
    pub api_key: Option<SecretString>,
    pub base_url: Option<String>,
}

/// Qianfan key pair
#[derive(Debug, Clone, Default)]
pub struct BaiduSettings {
    pub api_key: Option<SecretString>,
    pub secret_key: Option<SecretString>,
    pub base_url: Option<String>,
}

/// Azure OpenAI resource
#[derive(Debug, Clone)]
pub struct AzureSettings {
    pub api_key: Option<SecretString>,
    /// `https://<resource>.openai.azure.com/`
    pub endpoint: Option<String>,
    pub api_version: Option<String>,
}

impl Default for AzureSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: None,
            api_version: Some(DEFAULT_AZURE_API_VERSION.to_string()),
        }
    }
}

/// Process-wide configuration, passed down explicitly.
#[derive(Debug, Clone)]
pub struct Settings {
    pub openai: ApiKeySettings,
    pub qwen: ApiKeySettings,
    pub zhipu: ApiKeySettings,
    pub baidu: BaiduSettings,
    pub aihubmix: ApiKeySettings,
    pub azure: AzureSettings,
    /// Default model (or Azure deployment) per vendor
    pub default_models: HashMap<Vendor, String>,
    /// Substrings marking new-generation OpenAI model families
    pub new_generation_markers: Vec<String>,
    pub http: HttpConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            openai: ApiKeySettings::default(),
            qwen: ApiKeySettings::default(),
            zhipu: ApiKeySettings::default(),
            baidu: BaiduSettings::default(),
            aihubmix: ApiKeySettings::default(),
            azure: AzureSettings::default(),
            default_models: Vendor::ALL
                .into_iter()
                .map(|v| (v, builtin_default_model(v).to_string()))
                .collect(),
            new_generation_markers: DEFAULT_NEW_GENERATION_MARKERS
                .iter()
                .map(|m| m.to_string())
                .collect(),
            http: HttpConfig::default(),
        }
    }
}

impl Settings {
    /// Build settings from an opaque key/value lookup.
    ///
    /// Blank values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let secret = |key: &str| get(key).map(SecretString::from);
        let api_key_section = |prefix: &str| ApiKeySettings {
            api_key: secret(&format!("{prefix}_API_KEY")),
            base_url: get(&format!("{prefix}_BASE_URL")),
        };

        let mut settings = Self {
            openai: api_key_section("OPENAI"),
            qwen: api_key_section("QWEN"),
            zhipu: api_key_section("ZHIPU"),
            baidu: BaiduSettings {
                api_key: secret("BAIDU_API_KEY"),
                secret_key: secret("BAIDU_SECRET_KEY"),
                base_url: get("BAIDU_BASE_URL"),
            },
            aihubmix: api_key_section("AIHUBMIX"),
            azure: AzureSettings {
                api_key: secret("AZURE_API_KEY"),
                endpoint: get("AZURE_ENDPOINT"),
                api_version: Some(
                    get("AZURE_API_VERSION").unwrap_or_else(|| DEFAULT_AZURE_API_VERSION.to_string()),
                ),
            },
            ..Self::default()
        };

        for vendor in Vendor::ALL {
            let key = format!("{}_DEFAULT_MODEL", vendor.as_str().to_ascii_uppercase());
            if let Some(model) = get(&key) {
                settings.default_models.insert(vendor, model);
            }
        }

        if let Some(markers) = get("UNICHAT_NEW_GENERATION_MARKERS") {
            settings.new_generation_markers = markers
                .split(',')
                .map(|m| m.trim().to_string())
                .filter(|m| !m.is_empty())
                .collect();
        }

        if let Some(raw) = get("UNICHAT_HTTP_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) => settings.http.timeout = Some(Duration::from_secs(secs)),
                Err(_) => {
                    tracing::warn!(value = %raw, "ignoring invalid UNICHAT_HTTP_TIMEOUT_SECS");
                }
            }
        }

        settings
    }

    /// Build settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from the process environment, falling back to a dotenv
    /// file for keys the environment does not define.
    ///
    /// The file is read, not exported: the process environment is left untouched.
    pub fn from_dotenv(path: impl AsRef<Path>) -> Result<Self, LlmError> {
        let path = path.as_ref();
        let iter = dotenvy::from_path_iter(path).map_err(|e| {
            LlmError::ConfigurationError(format!("failed to read {}: {e}", path.display()))
        })?;

        let mut file_values = HashMap::new();
        for item in iter {
            let (key, value) = item.map_err(|e| {
                LlmError::ConfigurationError(format!("invalid entry in {}: {e}", path.display()))
            })?;
            file_values.insert(key, value);
        }
        tracing::debug!(path = %path.display(), keys = file_values.len(), "loaded dotenv file");

        Ok(Self::from_lookup(|key| {
            std::env::var(key)
                .ok()
                .or_else(|| file_values.get(key).cloned())
        }))
    }

    /// Configured default model for `vendor`
    pub fn default_model(&self, vendor: Vendor) -> &str {
        self.default_models
            .get(&vendor)
            .map(String::as_str)
            .unwrap_or_else(|| builtin_default_model(vendor))
    }

    pub fn with_default_model(mut self, vendor: Vendor, model: impl Into<String>) -> Self {
        self.default_models.insert(vendor, model.into());
        self
    }

    pub fn with_http_config(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    /// Vendors whose mandatory credentials are all present
    pub fn configured_vendors(&self) -> Vec<Vendor> {
        Vendor::ALL
            .into_iter()
            .filter(|vendor| match vendor {
                Vendor::OpenAi => self.openai.api_key.is_some(),
                Vendor::Qwen => self.qwen.api_key.is_some(),
                Vendor::Zhipu => self.zhipu.api_key.is_some(),
                Vendor::AiHubMix => self.aihubmix.api_key.is_some(),
                Vendor::Baidu => self.baidu.api_key.is_some() && self.baidu.secret_key.is_some(),
                Vendor::Azure => {
                    self.azure.api_key.is_some()
                        && self.azure.endpoint.is_some()
                        && self.azure.api_version.is_some()
                }
            })
            .collect()
    }
}
