//! Shared test helpers: a recording in-process transport and SSE builders.
#![allow(dead_code)]

use async_trait::async_trait;
use futures::stream;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use unichat::error::LlmError;
use unichat::transport::{
    HttpStreamResponse, HttpTransport, HttpTransportRequest, HttpTransportResponse,
};

/// One scripted reply
pub enum Reply {
    /// Buffered body with the given status and content type
    Body {
        status: u16,
        content_type: &'static str,
        body: String,
    },
    /// Streamed body; `error` (if any) is raised after the chunks
    Chunks {
        chunks: Vec<String>,
        error: Option<LlmError>,
    },
    /// The exchange itself fails
    Fail(LlmError),
}

impl Reply {
    pub fn json(status: u16, body: serde_json::Value) -> Self {
        Self::Body {
            status,
            content_type: "application/json",
            body: body.to_string(),
        }
    }

    pub fn sse(events: &[&str]) -> Self {
        Self::Chunks {
            chunks: vec![sse_body(events)],
            error: None,
        }
    }
}

/// `data: ...` framing for each payload
pub fn sse_body(events: &[&str]) -> String {
    events.iter().map(|e| format!("data: {e}\n\n")).collect()
}

fn headers(content_type: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers
}

/// Transport that records requests and answers from a script.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<HttpTransportRequest>>,
}

impl MockTransport {
    pub fn new(replies: Vec<Reply>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<HttpTransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn next(&self, request: HttpTransportRequest) -> Reply {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted reply left")
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute_json(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpTransportResponse, LlmError> {
        match self.next(request) {
            Reply::Body {
                status,
                content_type,
                body,
            } => Ok(HttpTransportResponse {
                status,
                headers: headers(content_type),
                body: body.into_bytes(),
            }),
            Reply::Chunks { chunks, error: None } => Ok(HttpTransportResponse {
                status: 200,
                headers: headers("text/event-stream"),
                body: chunks.concat().into_bytes(),
            }),
            Reply::Chunks {
                error: Some(error), ..
            }
            | Reply::Fail(error) => Err(error),
        }
    }

    async fn execute_stream(
        &self,
        request: HttpTransportRequest,
    ) -> Result<HttpStreamResponse, LlmError> {
        match self.next(request) {
            Reply::Body {
                status,
                content_type,
                body,
            } => Ok(HttpStreamResponse {
                status,
                headers: headers(content_type),
                body: Box::pin(stream::iter(vec![Ok(body.into_bytes())])),
            }),
            Reply::Chunks { chunks, error } => {
                let mut items: Vec<Result<Vec<u8>, LlmError>> =
                    chunks.into_iter().map(|c| Ok(c.into_bytes())).collect();
                if let Some(error) = error {
                    items.push(Err(error));
                }
                Ok(HttpStreamResponse {
                    status: 200,
                    headers: headers("text/event-stream"),
                    body: Box::pin(stream::iter(items)),
                })
            }
            Reply::Fail(error) => Err(error),
        }
    }
}
