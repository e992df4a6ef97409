//! Response transformation

use crate::error::LlmError;
use crate::types::Completion;
use crate::utils::error_handling::classify_http_error;

/// Transform vendor responses into unified results
pub trait ResponseTransformer: Send + Sync {
    /// Provider identifier
    fn provider_id(&self) -> &str;

    /// Extract the completion from a 2xx body. Vendors that report failures
    /// inside a 2xx body return `Err` here.
    fn transform_chat_response(&self, raw: &serde_json::Value) -> Result<Completion, LlmError>;

    /// Map a non-2xx response to an error.
    fn classify_http_error(&self, status: u16, body: &str) -> LlmError {
        classify_http_error(status, body)
    }
}
