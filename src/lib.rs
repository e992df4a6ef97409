//! # unichat
//!
//! One chat interface over six LLM vendors: OpenAI, Alibaba DashScope (Qwen),
//! Zhipu AI, Baidu Qianfan, the AIHubMix gateway and Azure OpenAI.
//!
//! Every adapter takes the same [`ChatRequest`] and returns the same
//! [`ChatResponse`] (or a [`ChatStream`] of [`StreamChunk`]s). Vendor
//! differences such as token-limit parameter names, compound credentials,
//! deployment-addressed models and system-prompt placement stay inside the
//! adapters.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use unichat::prelude::*;
//!
//! # async fn run() -> Result<(), LlmError> {
//! let registry = ProviderRegistry::new(Settings::from_env());
//! let response = registry
//!     .chat("qwen", &ChatRequest::new("hello").with_system_prompt("be brief"))
//!     .await?;
//! if response.success {
//!     println!("{}", response.text());
//! } else {
//!     eprintln!("error: {}", response.error.unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! Construction problems (unknown vendor, missing credential) are `Err`.
//! Anything that goes wrong during a call comes back as a failed response.

pub mod auth;
pub mod config;
pub mod error;
pub mod executors;
pub mod observability;
pub mod params;
pub mod providers;
pub mod registry;
pub mod traits;
pub mod transformers;
pub mod transport;
pub mod types;
pub mod utils;

pub use config::{HttpConfig, Settings};
pub use error::{ErrorCategory, LlmError};
pub use providers::VendorClient;
pub use registry::ProviderRegistry;
pub use traits::ChatCapability;
pub use transport::{HttpTransport, ReqwestTransport};
pub use types::{
    ChatMessage, ChatRequest, ChatResponse, ChatStream, MessageRole, StreamChunk, Usage, Vendor,
};

/// Common imports
pub mod prelude {
    pub use crate::config::{HttpConfig, Settings};
    pub use crate::error::LlmError;
    pub use crate::providers::{
        AiHubMixClient, AiHubMixConfig, AzureClient, AzureConfig, BaiduClient, BaiduConfig,
        OpenAiClient, OpenAiConfig, QwenClient, QwenConfig, VendorClient, ZhipuClient,
        ZhipuConfig,
    };
    pub use crate::registry::ProviderRegistry;
    pub use crate::traits::ChatCapability;
    pub use crate::types::{ChatRequest, ChatResponse, ChatStream, StreamChunk, Usage, Vendor};
    pub use futures::StreamExt;
}
