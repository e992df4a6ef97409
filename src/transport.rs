//! HTTP transport abstraction
//!
//! Adapters never touch `reqwest` directly. They hand a fully built request to
//! an [`HttpTransport`], which lets tests and embedders observe the final
//! URL/headers/body and return synthetic responses.

use async_trait::async_trait;
use futures::Stream;
use futures_util::StreamExt;
use reqwest::header::HeaderMap;
use std::fmt;
use std::pin::Pin;

use crate::config::HttpConfig;
use crate::error::LlmError;
use crate::observability::{format_headers_for_logging, mask_url_for_logging};

/// Raw response body chunks
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, LlmError>> + Send>>;

/// Describes the call a request belongs to.
#[derive(Clone, Debug)]
pub struct HttpRequestContext {
    pub provider_id: String,
    pub url: String,
    pub stream: bool,
}

/// Transport-level POST request.
#[derive(Debug, Clone)]
pub struct HttpTransportRequest {
    pub ctx: HttpRequestContext,
    pub url: String,
    pub headers: HeaderMap,
    /// JSON body; `None` sends an empty POST
    pub body: Option<serde_json::Value>,
}

/// Buffered response.
#[derive(Debug, Clone)]
pub struct HttpTransportResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl HttpTransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Response whose body is consumed incrementally.
pub struct HttpStreamResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: ByteStream,
}

impl HttpStreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Content type without parameters, lowercased
    pub fn content_type(&self) -> Option<String> {
        self.headers
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(';').next())
            .map(|v| v.trim().to_ascii_lowercase())
    }

    /// Drain the body into memory.
    pub async fn collect(mut self) -> Result<HttpTransportResponse, LlmError> {
        let mut body = Vec::new();
        while let Some(chunk) = self.body.next().await {
            body.extend_from_slice(&chunk?);
        }
        Ok(HttpTransportResponse {
            status: self.status,
            headers: self.headers,
            body,
        })
    }
}

impl fmt::Debug for HttpStreamResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpStreamResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

/// Pluggable HTTP transport.
///
/// Both methods return `Ok` for any HTTP status; `Err` means the exchange
/// itself failed (DNS, TLS, reset, timeout).
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute_json(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportResponse, LlmError>;

    async fn execute_stream(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpStreamResponse, LlmError>;
}

/// Default transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Build a client honoring the configured timeouts and user agent.
    pub fn from_config(config: &HttpConfig) -> Result<Self, LlmError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        builder = builder.user_agent(
            config
                .user_agent
                .clone()
                .unwrap_or_else(|| format!("unichat/{}", env!("CARGO_PKG_VERSION"))),
        );
        let client = builder.build().map_err(|e| {
            LlmError::ConfigurationError(format!("failed to build HTTP client: {e}"))
        })?;
        Ok(Self { client })
    }

    async fn send(&self, request: HttpTransportRequest) -> Result<reqwest::Response, LlmError> {
        let ctx = &request.ctx;
        tracing::debug!(
            target: "unichat::http",
            provider = %ctx.provider_id,
            url = %mask_url_for_logging(&request.url),
            stream = ctx.stream,
            headers = %format_headers_for_logging(&request.headers),
            "sending request"
        );

        let mut builder = self.client.post(&request.url).headers(request.headers.clone());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        match builder.send().await {
            Ok(response) => {
                tracing::debug!(
                    target: "unichat::http",
                    provider = %ctx.provider_id,
                    status = response.status().as_u16(),
                    "response received"
                );
                Ok(response)
            }
            Err(e) => {
                let error = LlmError::HttpError(format!("failed to send request: {e}"));
                tracing::debug!(
                    target: "unichat::http",
                    provider = %ctx.provider_id,
                    stream = ctx.stream,
                    err = %error,
                    "request error"
                );
                Err(error)
            }
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute_json(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportResponse, LlmError> {
        let response = self.send(request).await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| LlmError::HttpError(format!("failed to read response body: {e}")))?
            .to_vec();
        Ok(HttpTransportResponse {
            status,
            headers,
            body,
        })
    }

    async fn execute_stream(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpStreamResponse, LlmError> {
        let response = self.send(request).await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes_stream().map(|chunk| {
            chunk
                .map(|bytes| bytes.to_vec())
                .map_err(|e| LlmError::HttpError(format!("stream error: {e}")))
        });
        Ok(HttpStreamResponse {
            status,
            headers,
            body: Box::pin(body),
        })
    }
}
