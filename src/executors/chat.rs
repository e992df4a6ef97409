//! Chat executor
//!
//! Drives one chat call: transform the request, send it through the
//! transport, classify failures and hand the body to the vendor's response or
//! stream transformer.

use reqwest::header::HeaderMap;
use serde_json::Value;
use std::sync::Arc;

use crate::error::LlmError;
use crate::transformers::{RequestTransformer, ResponseTransformer, StreamChunkTransformer};
use crate::transport::{HttpRequestContext, HttpTransport, HttpTransportRequest};
use crate::types::{ChatRequest, ChatStream, Completion, StreamChunk};
use crate::utils::streaming::StreamFactory;

/// Builds per-call headers.
pub type HeaderBuilder = Box<dyn Fn() -> Result<HeaderMap, LlmError> + Send + Sync>;

/// Generic HTTP chat executor. Cheap to construct, built per call.
pub struct HttpChatExecutor {
    pub provider_id: String,
    pub transport: Arc<dyn HttpTransport>,
    pub request_transformer: Arc<dyn RequestTransformer>,
    pub response_transformer: Arc<dyn ResponseTransformer>,
    pub stream_transformer: Option<Arc<dyn StreamChunkTransformer>>,
    /// Endpoint for this call
    pub url: String,
    pub build_headers: HeaderBuilder,
}

impl HttpChatExecutor {
    fn transport_request(&self, body: Value, stream: bool) -> Result<HttpTransportRequest, LlmError> {
        let url = self.url.clone();
        let headers = (self.build_headers)()?;
        Ok(HttpTransportRequest {
            ctx: HttpRequestContext {
                provider_id: self.provider_id.clone(),
                url: url.clone(),
                stream,
            },
            url,
            headers,
            body: Some(body),
        })
    }

    fn parse_body(&self, body: &[u8]) -> Result<Value, LlmError> {
        serde_json::from_slice(body).map_err(|e| {
            LlmError::ParseError(format!(
                "{}: failed to parse response JSON: {e}",
                self.provider_id
            ))
        })
    }

    /// Non-streaming call
    pub async fn execute(&self, req: &ChatRequest, model: &str) -> Result<Completion, LlmError> {
        let body = self.request_transformer.transform_chat(req, model, false)?;
        let request = self.transport_request(body, false)?;
        let response = self.transport.execute_json(request).await?;

        if !response.is_success() {
            return Err(self
                .response_transformer
                .classify_http_error(response.status, &response.text()));
        }

        let json = self.parse_body(&response.body)?;
        self.response_transformer.transform_chat_response(&json)
    }

    /// Streaming call.
    ///
    /// `Err` covers failures before the first chunk. A vendor that answers a
    /// streaming request with a plain JSON body gets that body decoded as
    /// either an error or a single chunk.
    pub async fn execute_stream(
        &self,
        req: &ChatRequest,
        model: &str,
    ) -> Result<ChatStream, LlmError> {
        let Some(converter) = self.stream_transformer.clone() else {
            return Err(LlmError::ConfigurationError(format!(
                "{}: streaming not supported by this executor",
                self.provider_id
            )));
        };

        let body = self.request_transformer.transform_chat(req, model, true)?;
        let request = self.transport_request(body, true)?;
        let response = self.transport.execute_stream(request).await?;

        if !response.is_success() {
            let collected = response.collect().await?;
            return Err(self
                .response_transformer
                .classify_http_error(collected.status, &collected.text()));
        }

        if response.content_type().as_deref() == Some("application/json") {
            let collected = response.collect().await?;
            let json = self.parse_body(&collected.body)?;
            let completion = self.response_transformer.transform_chat_response(&json)?;
            return Ok(StreamFactory::single(StreamChunk::delta(
                completion.content,
                model,
                completion.usage,
            )));
        }

        Ok(StreamFactory::create_eventsource_stream(
            response.body,
            converter,
            model.to_string(),
        ))
    }
}
