//! Streaming types

use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

use super::Usage;
use crate::error::LlmError;

/// Lazy, finite, pull-driven sequence of chunks.
///
/// Items are never `Err`: a failure is a chunk with `success == false`, and it
/// is always the last item.
pub type ChatStream = Pin<Box<dyn Stream<Item = StreamChunk> + Send>>;

/// One incremental piece of a streamed answer.
///
/// Same shape as [`ChatResponse`](super::ChatResponse), but `content` is the
/// delta for this chunk only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamChunk {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl StreamChunk {
    pub fn delta(content: impl Into<String>, model: impl Into<String>, usage: Option<Usage>) -> Self {
        Self {
            success: true,
            content: Some(content.into()),
            model: Some(model.into()),
            usage,
            error: None,
            code: None,
        }
    }

    pub fn failure(model: Option<String>, error: &LlmError) -> Self {
        Self {
            success: false,
            content: None,
            model,
            usage: None,
            error: Some(error.user_message()),
            code: error.error_code(),
        }
    }

    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

/// What a stream chunk transformer extracts from one vendor event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamDelta {
    pub content: Option<String>,
    pub usage: Option<Usage>,
    /// The vendor marked this event as the last one
    pub finished: bool,
}

impl StreamDelta {
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn with_usage(mut self, usage: Option<Usage>) -> Self {
        self.usage = usage;
        self
    }

    pub fn finished(mut self, finished: bool) -> Self {
        self.finished = finished;
        self
    }

    /// Nothing worth yielding to the caller
    pub fn is_empty(&self) -> bool {
        self.content.as_deref().is_none_or(str::is_empty) && self.usage.is_none()
    }
}
