//! Dispatch registry
//!
//! Resolves a vendor token to an adapter, constructing it on first use and
//! reusing it afterwards. Construction failures are returned to the caller and
//! not remembered, so a later call retries construction. There is no retry,
//! failover or load balancing between vendors.

pub mod factory;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use crate::config::Settings;
use crate::error::LlmError;
use crate::providers::VendorClient;
use crate::traits::ChatCapability;
use crate::transport::HttpTransport;
use crate::types::{ChatRequest, ChatResponse, ChatStream, Vendor};

/// Lazily populated vendor → adapter map
pub struct ProviderRegistry {
    settings: Settings,
    transport: Option<Arc<dyn HttpTransport>>,
    clients: Mutex<HashMap<Vendor, Arc<VendorClient>>>,
}

impl ProviderRegistry {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            transport: None,
            clients: Mutex::new(HashMap::new()),
        }
    }

    /// Route every adapter through `transport`
    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Adapter for a vendor token such as `"qwen"`.
    pub fn client(&self, vendor: &str) -> Result<Arc<VendorClient>, LlmError> {
        let vendor: Vendor = vendor.parse()?;
        self.client_for(vendor)
    }

    /// Adapter for a parsed vendor
    pub fn client_for(&self, vendor: Vendor) -> Result<Arc<VendorClient>, LlmError> {
        let mut clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = clients.get(&vendor) {
            return Ok(client.clone());
        }

        let client = Arc::new(factory::build_client(
            vendor,
            &self.settings,
            self.transport.clone(),
        )?);
        tracing::debug!(vendor = %vendor, default_model = %client.default_model(), "adapter constructed");
        clients.insert(vendor, client.clone());
        Ok(client)
    }

    /// Resolve and delegate. `Err` only for unknown vendors or construction
    /// failures; request failures are inside the response.
    pub async fn chat(&self, vendor: &str, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let client = self.client(vendor)?;
        Ok(client.chat(request).await)
    }

    /// Streaming counterpart of [`chat`](Self::chat)
    pub async fn chat_stream(
        &self,
        vendor: &str,
        request: &ChatRequest,
    ) -> Result<ChatStream, LlmError> {
        let client = self.client(vendor)?;
        Ok(client.chat_stream(request).await)
    }

    /// Vendors constructed so far
    pub fn cached_vendors(&self) -> Vec<Vendor> {
        let clients = self.clients.lock().unwrap_or_else(PoisonError::into_inner);
        Vendor::ALL
            .into_iter()
            .filter(|v| clients.contains_key(v))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    #[test]
    fn test_unknown_vendor() {
        let registry = ProviderRegistry::new(Settings::default());
        let err = registry.client("nonexistent").unwrap_err();
        assert_eq!(err, LlmError::UnsupportedVendor("nonexistent".into()));
    }

    #[test]
    fn test_memoized_and_case_insensitive() {
        let mut settings = Settings::default();
        settings.qwen.api_key = Some(SecretString::from("sk-dash"));
        let registry = ProviderRegistry::new(settings);

        let first = registry.client("qwen").unwrap();
        let second = registry.client(" QWEN ").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(registry.cached_vendors(), vec![Vendor::Qwen]);
    }

    #[test]
    fn test_construction_failure_not_cached() {
        let registry = ProviderRegistry::new(Settings::default());
        assert!(registry.client("baidu").unwrap_err().is_configuration());
        assert!(registry.cached_vendors().is_empty());
    }
}
