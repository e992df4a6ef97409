//! Request transformation
//!
//! Converts a unified [`ChatRequest`] into a vendor JSON body.

use serde_json::{Map, Value};

use crate::error::LlmError;
use crate::types::ChatRequest;

/// Transform a unified chat request into a vendor payload
pub trait RequestTransformer: Send + Sync {
    /// Provider identifier (e.g. "openai", "qwen")
    fn provider_id(&self) -> &str;

    /// Build the JSON body for `model`. `stream` selects the streaming variant.
    fn transform_chat(
        &self,
        req: &ChatRequest,
        model: &str,
        stream: bool,
    ) -> Result<Value, LlmError>;
}

/// Copy passthrough parameters into `body`. Keys the adapter already set are
/// left alone.
pub fn merge_extra(body: &mut Map<String, Value>, extra: &Map<String, Value>) {
    for (key, value) in extra {
        if !body.contains_key(key) {
            body.insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_extra_never_overwrites() {
        let mut body = json!({"model": "glm-4", "temperature": 0.7})
            .as_object()
            .cloned()
            .unwrap();
        let extra = json!({"model": "other", "top_p": 0.9})
            .as_object()
            .cloned()
            .unwrap();

        merge_extra(&mut body, &extra);
        assert_eq!(body["model"], "glm-4");
        assert_eq!(body["top_p"], 0.9);
    }
}
