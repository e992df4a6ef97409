//! Chat capability

use async_trait::async_trait;

use crate::types::{ChatRequest, ChatResponse, ChatStream, Vendor};

/// The uniform surface every vendor adapter exposes.
///
/// Neither method returns `Err`: request-level failures come back as data
/// (`success == false`). Configuration errors are raised when the adapter is
/// constructed, never here.
#[async_trait]
pub trait ChatCapability: Send + Sync {
    /// Vendor this adapter talks to
    fn vendor(&self) -> Vendor;

    /// Model (or Azure deployment) used when a request names none
    fn default_model(&self) -> &str;

    /// One round trip
    async fn chat(&self, request: &ChatRequest) -> ChatResponse;

    /// Incremental answer.
    ///
    /// The returned stream pulls and decodes one vendor event at a time. A
    /// failure before the first event yields a single failing chunk; a failure
    /// later yields one failing chunk and ends the stream.
    async fn chat_stream(&self, request: &ChatRequest) -> ChatStream;
}
