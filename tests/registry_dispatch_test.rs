//! Registry dispatch over an in-process transport.

mod support;

use secrecy::SecretString;
use serde_json::json;
use std::sync::Arc;
use support::{MockTransport, Reply};
use unichat::prelude::*;

fn settings() -> Settings {
    let mut settings = Settings::default();
    settings.qwen.api_key = Some(SecretString::from("sk-dash"));
    settings.openai.api_key = Some(SecretString::from("sk-openai"));
    settings
}

#[tokio::test]
async fn dispatches_to_named_vendor() {
    let transport = MockTransport::new(vec![Reply::json(
        200,
        json!({
            "output": {"text": "hi", "finish_reason": "stop"},
            "usage": {"input_tokens": 3, "output_tokens": 1, "total_tokens": 4}
        }),
    )]);
    let registry = ProviderRegistry::new(settings()).with_transport(transport.clone());

    let response = registry.chat("qwen", &ChatRequest::new("hello")).await.unwrap();
    assert!(response.success);
    assert_eq!(response.text(), "hi");
    assert_eq!(response.model.as_deref(), Some("qwen-turbo"));
    assert_eq!(response.usage, Some(Usage::new(3, 1, 4)));

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].url,
        "https://dashscope.aliyuncs.com/api/v1/services/aigc/text-generation/generation"
    );
    assert_eq!(requests[0].ctx.provider_id, "qwen");
}

#[tokio::test]
async fn unknown_vendor_is_err() {
    let registry = ProviderRegistry::new(settings());
    let err = registry
        .chat("nonexistent", &ChatRequest::new("hello"))
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::UnsupportedVendor(ref v) if v == "nonexistent"));
    assert!(err.is_configuration());
}

#[tokio::test]
async fn missing_credential_is_err_and_not_cached() {
    let registry = ProviderRegistry::new(settings());
    let err = registry
        .chat("zhipu", &ChatRequest::new("hello"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LlmError::MissingCredential {
            vendor: Vendor::Zhipu,
            field: "api_key"
        }
    ));
    assert!(registry.cached_vendors().is_empty());
}

#[tokio::test]
async fn adapters_are_reused() {
    let registry =
        ProviderRegistry::new(settings()).with_transport(MockTransport::new(Vec::new()));
    let a = registry.client("openai").unwrap();
    let b = registry.client_for(Vendor::OpenAi).unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(a.vendor(), Vendor::OpenAi);
    assert_eq!(a.default_model(), "gpt-4o");
}

#[tokio::test]
async fn empty_message_fails_without_network() {
    let transport = MockTransport::new(Vec::new());
    let registry = ProviderRegistry::new(settings()).with_transport(transport.clone());

    let response = registry.chat("openai", &ChatRequest::new("   ")).await.unwrap();
    assert!(!response.success);
    assert_eq!(response.code.as_deref(), Some("invalid_input"));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn transport_error_becomes_failed_response() {
    let transport = MockTransport::new(vec![Reply::Fail(LlmError::HttpError(
        "connection refused".into(),
    ))]);
    let registry = ProviderRegistry::new(settings()).with_transport(transport);

    let response = registry.chat("openai", &ChatRequest::new("hello")).await.unwrap();
    assert!(!response.success);
    assert!(response.content.is_none());
    assert!(response.error.unwrap().contains("connection refused"));
}
