//! Stream chunk transformation

use eventsource_stream::Event;

use crate::error::LlmError;
use crate::types::StreamDelta;

/// Convert vendor SSE events into deltas
pub trait StreamChunkTransformer: Send + Sync {
    /// Provider identifier
    fn provider_id(&self) -> &str;

    /// Convert one event. `Ok(None)` skips it (keep-alives, role-only chunks).
    fn convert_event(&self, event: &Event) -> Result<Option<StreamDelta>, LlmError>;

    /// Sentinel payload that ends the stream
    fn is_end_marker(&self, data: &str) -> bool {
        data.trim() == "[DONE]"
    }
}
