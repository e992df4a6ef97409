//! Adapter factory keyed by vendor

use std::sync::Arc;

use crate::config::Settings;
use crate::error::LlmError;
use crate::providers::{
    AiHubMixClient, AiHubMixConfig, AzureClient, AzureConfig, BaiduClient, BaiduConfig,
    OpenAiClient, OpenAiConfig, QwenClient, QwenConfig, VendorClient, ZhipuClient, ZhipuConfig,
};
use crate::transport::HttpTransport;
use crate::types::Vendor;

/// Build the adapter for `vendor` from settings.
///
/// With `transport` set, the adapter uses it instead of building its own
/// `reqwest` client.
pub fn build_client(
    vendor: Vendor,
    settings: &Settings,
    transport: Option<Arc<dyn HttpTransport>>,
) -> Result<VendorClient, LlmError> {
    let client = match (vendor, transport) {
        (Vendor::OpenAi, None) => VendorClient::OpenAi(OpenAiClient::from_settings(settings)?),
        (Vendor::OpenAi, Some(t)) => {
            VendorClient::OpenAi(OpenAiClient::with_transport(OpenAiConfig::default(), settings, t)?)
        }
        (Vendor::Qwen, None) => VendorClient::Qwen(QwenClient::from_settings(settings)?),
        (Vendor::Qwen, Some(t)) => {
            VendorClient::Qwen(QwenClient::with_transport(QwenConfig::default(), settings, t)?)
        }
        (Vendor::Zhipu, None) => VendorClient::Zhipu(ZhipuClient::from_settings(settings)?),
        (Vendor::Zhipu, Some(t)) => {
            VendorClient::Zhipu(ZhipuClient::with_transport(ZhipuConfig::default(), settings, t)?)
        }
        (Vendor::Baidu, None) => VendorClient::Baidu(BaiduClient::from_settings(settings)?),
        (Vendor::Baidu, Some(t)) => {
            VendorClient::Baidu(BaiduClient::with_transport(BaiduConfig::default(), settings, t)?)
        }
        (Vendor::AiHubMix, None) => {
            VendorClient::AiHubMix(AiHubMixClient::from_settings(settings)?)
        }
        (Vendor::AiHubMix, Some(t)) => VendorClient::AiHubMix(AiHubMixClient::with_transport(
            AiHubMixConfig::default(),
            settings,
            t,
        )?),
        (Vendor::Azure, None) => VendorClient::Azure(AzureClient::from_settings(settings)?),
        (Vendor::Azure, Some(t)) => {
            VendorClient::Azure(AzureClient::with_transport(AzureConfig::default(), settings, t)?)
        }
    };
    Ok(client)
}
