//! Qianfan SSE conversion
//!
//! Every event carries `result` (the delta) and `is_end`; the final event has
//! `is_end: true` and no `[DONE]` follows.

use eventsource_stream::Event;

use super::transformers::{QianfanResponse, body_error};
use crate::error::LlmError;
use crate::transformers::StreamChunkTransformer;
use crate::types::StreamDelta;

#[derive(Debug, Clone, Default)]
pub struct BaiduStreamTransformer;

impl StreamChunkTransformer for BaiduStreamTransformer {
    fn provider_id(&self) -> &str {
        "baidu"
    }

    fn convert_event(&self, event: &Event) -> Result<Option<StreamDelta>, LlmError> {
        let raw: serde_json::Value = serde_json::from_str(&event.data)
            .map_err(|e| LlmError::ParseError(format!("baidu: invalid stream chunk: {e}")))?;
        if let Some(err) = body_error(&raw) {
            return Err(err);
        }
        let chunk: QianfanResponse = serde_json::from_value(raw)
            .map_err(|e| LlmError::ParseError(format!("baidu: unexpected stream chunk: {e}")))?;

        let finished = chunk.is_end.unwrap_or(false);
        Ok(Some(StreamDelta {
            content: chunk.result,
            usage: if finished {
                chunk.usage.map(Into::into)
            } else {
                None
            },
            finished,
        }))
    }
}
