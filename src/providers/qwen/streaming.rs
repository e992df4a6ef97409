//! DashScope SSE conversion
//!
//! Events look like `event:result` / `data:{"output":{"text":..,"finish_reason":"null"},..}`.
//! Failures arrive as `event:error` with a `{code, message}` payload. There is
//! no `[DONE]` sentinel: the last event carries a real `finish_reason`.

use eventsource_stream::Event;

use super::transformers::body_error;
use super::types::DashScopeResponse;
use crate::error::LlmError;
use crate::transformers::StreamChunkTransformer;
use crate::types::StreamDelta;

#[derive(Debug, Clone, Default)]
pub struct QwenStreamTransformer;

impl StreamChunkTransformer for QwenStreamTransformer {
    fn provider_id(&self) -> &str {
        "qwen"
    }

    fn convert_event(&self, event: &Event) -> Result<Option<StreamDelta>, LlmError> {
        let response: DashScopeResponse = serde_json::from_str(&event.data)
            .map_err(|e| LlmError::ParseError(format!("qwen: invalid stream chunk: {e}")))?;
        if let Some(err) = body_error(&response) {
            return Err(err);
        }
        if event.event == "error" {
            return Err(LlmError::VendorError {
                code: "error".to_string(),
                message: response
                    .message
                    .unwrap_or_else(|| "stream reported an error".to_string()),
            });
        }

        let Some(output) = response.output else {
            return Ok(None);
        };
        let finished = output.is_finished();
        // usage is cumulative; report it once, with the last chunk
        let usage = if finished {
            response.usage.map(Into::into)
        } else {
            None
        };
        Ok(Some(StreamDelta {
            content: output.content(),
            usage,
            finished,
        }))
    }

    fn is_end_marker(&self, _data: &str) -> bool {
        false
    }
}
