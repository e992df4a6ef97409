//! Request/response transformers for the chat-completions format

use serde_json::{Map, Value};

use super::types::OpenAiChatResponse;
use crate::error::LlmError;
use crate::params::TokenLimitPolicy;
use crate::transformers::{RequestTransformer, ResponseTransformer, merge_extra};
use crate::types::{ChatRequest, Completion, SystemPromptPlacement};
use crate::utils::error_handling::code_to_string;

/// Request transformer for OpenAI-compatible vendors
#[derive(Debug, Clone)]
pub struct OpenAiCompatRequestTransformer {
    pub provider_id: String,
    pub token_limit: TokenLimitPolicy,
    /// Azure selects the model through the URL path
    pub include_model: bool,
}

impl RequestTransformer for OpenAiCompatRequestTransformer {
    fn provider_id(&self) -> &str {
        &self.provider_id
    }

    fn transform_chat(
        &self,
        req: &ChatRequest,
        model: &str,
        stream: bool,
    ) -> Result<Value, LlmError> {
        let mut body = Map::new();
        if self.include_model {
            body.insert("model".into(), Value::from(model));
        }
        body.insert(
            "messages".into(),
            serde_json::to_value(req.to_messages(SystemPromptPlacement::SystemRole))?,
        );
        body.insert("temperature".into(), Value::from(req.temperature));
        self.token_limit
            .select(model, req.max_tokens, req.max_completion_tokens)
            .apply(&mut body);
        if stream {
            body.insert("stream".into(), Value::Bool(true));
        }
        merge_extra(&mut body, &req.extra);
        Ok(Value::Object(body))
    }
}

/// `{"error": {...}}` inside a 2xx body or stream event
pub(crate) fn envelope_error(raw: &Value) -> Option<LlmError> {
    let error = raw.get("error")?.as_object()?;
    let message = error
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("Unknown error")
        .to_string();
    let code = error
        .get("code")
        .and_then(code_to_string)
        .or_else(|| error.get("type").and_then(code_to_string))
        .unwrap_or_else(|| "error".to_string());
    Some(LlmError::VendorError { code, message })
}

/// Response transformer for OpenAI-compatible vendors
#[derive(Debug, Clone)]
pub struct OpenAiCompatResponseTransformer {
    pub provider_id: String,
}

impl ResponseTransformer for OpenAiCompatResponseTransformer {
    fn provider_id(&self) -> &str {
        &self.provider_id
    }

    fn transform_chat_response(&self, raw: &Value) -> Result<Completion, LlmError> {
        if let Some(err) = envelope_error(raw) {
            return Err(err);
        }
        let response: OpenAiChatResponse = serde_json::from_value(raw.clone()).map_err(|e| {
            LlmError::ParseError(format!("{}: unexpected response shape: {e}", self.provider_id))
        })?;
        let choice = response.choices.into_iter().next().ok_or_else(|| {
            LlmError::ParseError(format!("{}: response has no choices", self.provider_id))
        })?;
        Ok(Completion {
            content: choice.message.content.unwrap_or_default(),
            usage: response.usage.map(Into::into),
        })
    }
}
