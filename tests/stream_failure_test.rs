//! Streaming edge cases driven through an in-process transport.

mod support;

use futures::StreamExt;
use serde_json::json;
use support::{MockTransport, Reply, sse_body};
use unichat::prelude::*;

fn openai(transport: std::sync::Arc<MockTransport>) -> OpenAiClient {
    OpenAiClient::with_transport(
        OpenAiConfig::new().with_api_key("sk-test"),
        &Settings::default(),
        transport,
    )
    .unwrap()
}

#[tokio::test]
async fn mid_stream_transport_failure_ends_with_one_failure() {
    let transport = MockTransport::new(vec![Reply::Chunks {
        chunks: vec![sse_body(&[
            r#"{"choices":[{"index":0,"delta":{"content":"Hel"}}]}"#,
            r#"{"choices":[{"index":0,"delta":{"content":"lo"}}]}"#,
        ])],
        error: Some(LlmError::HttpError("connection reset".into())),
    }]);

    let chunks: Vec<StreamChunk> = openai(transport)
        .chat_stream(&ChatRequest::new("hello"))
        .await
        .collect()
        .await;

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].text(), "Hel");
    assert_eq!(chunks[1].text(), "lo");
    assert!(!chunks[2].success);
    assert!(chunks[2].error.as_deref().unwrap().contains("connection reset"));
}

#[tokio::test]
async fn events_split_across_chunks_are_reassembled() {
    let body = sse_body(&[
        r#"{"choices":[{"index":0,"delta":{"content":"你好"}}]}"#,
        "[DONE]",
    ]);
    let (head, tail) = body.split_at(17);
    let transport = MockTransport::new(vec![Reply::Chunks {
        chunks: vec![head.to_string(), tail.to_string()],
        error: None,
    }]);

    let chunks: Vec<StreamChunk> = openai(transport)
        .chat_stream(&ChatRequest::new("hello"))
        .await
        .collect()
        .await;
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text(), "你好");
}

#[tokio::test]
async fn malformed_event_yields_failure() {
    let transport = MockTransport::new(vec![Reply::sse(&[
        r#"{"choices":[{"index":0,"delta":{"content":"ok"}}]}"#,
        "{not json",
        r#"{"choices":[{"index":0,"delta":{"content":"never"}}]}"#,
    ])]);

    let chunks: Vec<StreamChunk> = openai(transport)
        .chat_stream(&ChatRequest::new("hello"))
        .await
        .collect()
        .await;
    assert_eq!(chunks.len(), 2);
    assert!(chunks[0].success);
    assert!(!chunks[1].success);
}

#[tokio::test]
async fn json_body_in_stream_mode_is_single_chunk() {
    let transport = MockTransport::new(vec![Reply::json(
        200,
        json!({
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "whole answer"}}],
            "usage": {"prompt_tokens": 1, "completion_tokens": 2, "total_tokens": 3}
        }),
    )]);

    let chunks: Vec<StreamChunk> = openai(transport)
        .chat_stream(&ChatRequest::new("hello"))
        .await
        .collect()
        .await;
    assert_eq!(chunks.len(), 1);
    assert!(chunks[0].success);
    assert_eq!(chunks[0].text(), "whole answer");
    assert_eq!(chunks[0].usage, Some(Usage::new(1, 2, 3)));
}

#[tokio::test]
async fn json_error_in_stream_mode_is_single_failure() {
    let transport = MockTransport::new(vec![Reply::json(
        200,
        json!({"error": {"message": "context length exceeded", "code": "context_length_exceeded"}}),
    )]);

    let chunks: Vec<StreamChunk> = openai(transport)
        .chat_stream(&ChatRequest::new("hello"))
        .await
        .collect()
        .await;
    assert_eq!(chunks.len(), 1);
    assert!(!chunks[0].success);
    assert_eq!(chunks[0].code.as_deref(), Some("context_length_exceeded"));
    assert_eq!(chunks[0].error.as_deref(), Some("context length exceeded"));
}

#[tokio::test]
async fn connect_failure_yields_single_failure() {
    let transport = MockTransport::new(vec![Reply::Fail(LlmError::HttpError(
        "dns error".into(),
    ))]);
    let chunks: Vec<StreamChunk> = openai(transport.clone())
        .chat_stream(&ChatRequest::new("hello"))
        .await
        .collect()
        .await;
    assert_eq!(chunks.len(), 1);
    assert!(!chunks[0].success);
    assert_eq!(chunks[0].model.as_deref(), Some("gpt-4o"));
    assert!(transport.requests()[0].ctx.stream);
}

#[tokio::test]
async fn empty_message_stream_has_no_request() {
    let transport = MockTransport::new(Vec::new());
    let chunks: Vec<StreamChunk> = openai(transport.clone())
        .chat_stream(&ChatRequest::new(""))
        .await
        .collect()
        .await;
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].code.as_deref(), Some("invalid_input"));
    assert!(transport.requests().is_empty());
}
