//! SSE chunk conversion for the chat-completions format

use eventsource_stream::Event;

use super::transformers::envelope_error;
use super::types::OpenAiStreamChunk;
use crate::error::LlmError;
use crate::transformers::StreamChunkTransformer;
use crate::types::StreamDelta;

/// Converts `data: {...choices[].delta...}` events
#[derive(Debug, Clone)]
pub struct OpenAiCompatStreamTransformer {
    pub provider_id: String,
}

impl StreamChunkTransformer for OpenAiCompatStreamTransformer {
    fn provider_id(&self) -> &str {
        &self.provider_id
    }

    fn convert_event(&self, event: &Event) -> Result<Option<StreamDelta>, LlmError> {
        let raw: serde_json::Value = serde_json::from_str(&event.data).map_err(|e| {
            LlmError::ParseError(format!("{}: invalid stream chunk: {e}", self.provider_id))
        })?;
        if let Some(err) = envelope_error(&raw) {
            return Err(err);
        }
        let chunk: OpenAiStreamChunk = serde_json::from_value(raw).map_err(|e| {
            LlmError::ParseError(format!("{}: unexpected stream chunk: {e}", self.provider_id))
        })?;

        let content = chunk
            .choices
            .first()
            .and_then(|c| c.delta.content.clone())
            .filter(|c| !c.is_empty());
        let usage = chunk.usage.map(Into::into);
        if content.is_none() && usage.is_none() {
            // role-only, finish-reason-only and filter-result events
            return Ok(None);
        }
        Ok(Some(StreamDelta {
            content,
            usage,
            finished: false,
        }))
    }
}
