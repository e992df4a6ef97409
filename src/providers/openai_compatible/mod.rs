//! OpenAI-compatible chat
//!
//! Shared by every vendor that speaks the chat-completions wire format.

pub mod client;
pub mod config;
pub mod streaming;
pub mod transformers;
pub mod types;

pub use client::OpenAiCompatibleClient;
pub use config::{AuthStyle, Endpoint, OpenAiCompatibleConfig};

/// Implement `ChatCapability` for a vendor wrapper whose `inner` field is an
/// [`OpenAiCompatibleClient`].
macro_rules! delegate_chat_capability {
    ($client:ty) => {
        #[async_trait::async_trait]
        impl $crate::traits::ChatCapability for $client {
            fn vendor(&self) -> $crate::types::Vendor {
                $crate::traits::ChatCapability::vendor(&self.inner)
            }

            fn default_model(&self) -> &str {
                $crate::traits::ChatCapability::default_model(&self.inner)
            }

            async fn chat(
                &self,
                request: &$crate::types::ChatRequest,
            ) -> $crate::types::ChatResponse {
                $crate::traits::ChatCapability::chat(&self.inner, request).await
            }

            async fn chat_stream(
                &self,
                request: &$crate::types::ChatRequest,
            ) -> $crate::types::ChatStream {
                $crate::traits::ChatCapability::chat_stream(&self.inner, request).await
            }
        }
    };
}

pub(crate) use delegate_chat_capability;
