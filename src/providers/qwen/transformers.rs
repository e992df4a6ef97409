//! DashScope request/response transformers

use serde_json::{Map, Value, json};

use super::types::DashScopeResponse;
use crate::error::LlmError;
use crate::params::{TokenLimitParam, TokenLimitPolicy};
use crate::transformers::{RequestTransformer, ResponseTransformer, merge_extra};
use crate::types::{ChatRequest, Completion, SystemPromptPlacement};

/// Builds `{model, input: {messages}, parameters: {...}}`.
///
/// Passthrough parameters go into `parameters`.
#[derive(Debug, Clone, Default)]
pub struct QwenRequestTransformer;

impl RequestTransformer for QwenRequestTransformer {
    fn provider_id(&self) -> &str {
        "qwen"
    }

    fn transform_chat(
        &self,
        req: &ChatRequest,
        model: &str,
        stream: bool,
    ) -> Result<Value, LlmError> {
        let mut parameters = Map::new();
        parameters.insert("temperature".into(), Value::from(req.temperature));
        TokenLimitPolicy::Fixed(TokenLimitParam::MaxTokens)
            .select(model, req.max_tokens, None)
            .apply(&mut parameters);
        parameters.insert("result_format".into(), Value::from("text"));
        if stream {
            // deltas instead of the cumulative text
            parameters.insert("incremental_output".into(), Value::Bool(true));
        }
        merge_extra(&mut parameters, &req.extra);

        Ok(json!({
            "model": model,
            "input": {
                "messages": req.to_messages(SystemPromptPlacement::SystemRole),
            },
            "parameters": parameters,
        }))
    }
}

/// Failure reported inside a 2xx body
pub(crate) fn body_error(response: &DashScopeResponse) -> Option<LlmError> {
    let code = response.code.as_deref().filter(|c| !c.trim().is_empty())?;
    Some(LlmError::VendorError {
        code: code.to_string(),
        message: response.message.clone().unwrap_or_default(),
    })
}

#[derive(Debug, Clone, Default)]
pub struct QwenResponseTransformer;

impl ResponseTransformer for QwenResponseTransformer {
    fn provider_id(&self) -> &str {
        "qwen"
    }

    fn transform_chat_response(&self, raw: &Value) -> Result<Completion, LlmError> {
        let response: DashScopeResponse = serde_json::from_value(raw.clone())
            .map_err(|e| LlmError::ParseError(format!("qwen: unexpected response shape: {e}")))?;
        if let Some(err) = body_error(&response) {
            return Err(err);
        }
        let output = response
            .output
            .ok_or_else(|| LlmError::ParseError("qwen: response has no output".to_string()))?;
        Ok(Completion {
            content: output.content().unwrap_or_default(),
            usage: response.usage.map(Into::into),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Usage;

    #[test]
    fn test_request_body() {
        let req = ChatRequest::new("hello")
            .with_system_prompt("sys")
            .with_max_tokens(64)
            .with_extra("top_p", 0.8)
            .with_extra("max_tokens", 9999);
        let body = QwenRequestTransformer
            .transform_chat(&req, "qwen-turbo", false)
            .unwrap();
        assert_eq!(
            body,
            json!({
                "model": "qwen-turbo",
                "input": {"messages": [
                    {"role": "system", "content": "sys"},
                    {"role": "user", "content": "hello"}
                ]},
                "parameters": {
                    "temperature": 0.7,
                    "max_tokens": 64,
                    "result_format": "text",
                    "top_p": 0.8
                }
            })
        );
    }

    #[test]
    fn test_stream_body_is_incremental() {
        let body = QwenRequestTransformer
            .transform_chat(&ChatRequest::new("hi"), "qwen-plus", true)
            .unwrap();
        assert_eq!(body["parameters"]["incremental_output"], true);
    }

    #[test]
    fn test_text_response() {
        let raw = json!({
            "output": {"text": "hi", "finish_reason": "stop"},
            "usage": {"input_tokens": 3, "output_tokens": 1, "total_tokens": 4},
            "request_id": "r-1"
        });
        let completion = QwenResponseTransformer.transform_chat_response(&raw).unwrap();
        assert_eq!(completion.content, "hi");
        assert_eq!(completion.usage, Some(Usage::new(3, 1, 4)));
    }

    #[test]
    fn test_message_format_and_missing_total() {
        let raw = json!({
            "output": {"choices": [{"message": {"role": "assistant", "content": "yo"}, "finish_reason": "stop"}]},
            "usage": {"input_tokens": 2, "output_tokens": 5}
        });
        let completion = QwenResponseTransformer.transform_chat_response(&raw).unwrap();
        assert_eq!(completion.content, "yo");
        assert_eq!(completion.usage.unwrap().total_tokens, 7);
    }

    #[test]
    fn test_error_in_body() {
        let raw = json!({"code": "DataInspectionFailed", "message": "Input data may contain inappropriate content."});
        let err = QwenResponseTransformer.transform_chat_response(&raw).unwrap_err();
        assert_eq!(err.error_code().as_deref(), Some("DataInspectionFailed"));
        assert_eq!(err.user_message(), "Input data may contain inappropriate content.");
    }
}
