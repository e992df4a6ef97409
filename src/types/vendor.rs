use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::LlmError;

/// The closed set of supported vendors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    /// OpenAI (direct)
    OpenAi,
    /// Alibaba DashScope (Qwen)
    Qwen,
    /// Zhipu AI (GLM)
    Zhipu,
    /// Baidu Qianfan (ERNIE)
    Baidu,
    /// AIHubMix, a third-party OpenAI-compatible gateway
    AiHubMix,
    /// Azure OpenAI
    Azure,
}

impl Vendor {
    pub const ALL: [Vendor; 6] = [
        Vendor::Qwen,
        Vendor::OpenAi,
        Vendor::Zhipu,
        Vendor::Baidu,
        Vendor::AiHubMix,
        Vendor::Azure,
    ];

    /// Dispatch token used by the registry and in configuration keys.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Vendor::OpenAi => "openai",
            Vendor::Qwen => "qwen",
            Vendor::Zhipu => "zhipu",
            Vendor::Baidu => "baidu",
            Vendor::AiHubMix => "aihubmix",
            Vendor::Azure => "azure",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Vendor {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        Vendor::ALL
            .into_iter()
            .find(|v| v.as_str() == token)
            .ok_or_else(|| LlmError::UnsupportedVendor(s.to_string()))
    }
}
