//! Authentication helpers and token providers.
//!
//! Most vendors take a static API key. Baidu Qianfan exchanges a key pair for
//! a short-lived access token, which [`qianfan::QianfanTokenProvider`] fetches
//! and caches.

use async_trait::async_trait;

use crate::error::LlmError;

/// Supplies access tokens, refreshing them as needed.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// A currently valid access token
    async fn token(&self) -> Result<String, LlmError>;

    /// Drop any cached token so the next call fetches a fresh one.
    async fn invalidate(&self) {}
}

/// A fixed token managed outside this crate.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn token(&self) -> Result<String, LlmError> {
        Ok(self.token.clone())
    }
}

pub mod qianfan;
