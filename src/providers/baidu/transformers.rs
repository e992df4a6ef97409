//! Qianfan request/response transformers

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::LlmError;
use crate::params::{TokenLimitParam, TokenLimitPolicy};
use crate::transformers::{RequestTransformer, ResponseTransformer, merge_extra};
use crate::types::{ChatRequest, Completion, SystemPromptPlacement, Usage};
use crate::utils::error_handling::code_to_string;

/// Error codes meaning the access token is invalid or expired
pub const TOKEN_ERROR_CODES: &[&str] = &["110", "111"];

#[derive(Debug, Clone, Deserialize)]
pub struct QianfanResponse {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub is_end: Option<bool>,
    #[serde(default)]
    pub usage: Option<QianfanUsage>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct QianfanUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
    #[serde(default)]
    pub total_tokens: Option<u32>,
}

impl From<QianfanUsage> for Usage {
    fn from(usage: QianfanUsage) -> Self {
        Usage::new(
            usage.prompt_tokens,
            usage.completion_tokens,
            usage
                .total_tokens
                .unwrap_or(usage.prompt_tokens + usage.completion_tokens),
        )
    }
}

/// `{"error_code": 110, "error_msg": "..."}` inside a 2xx body
pub fn body_error(raw: &Value) -> Option<LlmError> {
    let code = raw.get("error_code").and_then(code_to_string)?;
    let message = raw
        .get("error_msg")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Some(LlmError::VendorError { code, message })
}

/// Whether a vendor error code says the access token must be refreshed
pub fn is_token_error_code(code: &str) -> bool {
    TOKEN_ERROR_CODES.contains(&code)
}

/// Whether `error` says the access token must be refreshed
pub fn is_token_error(error: &LlmError) -> bool {
    match error {
        LlmError::VendorError { code, .. } => is_token_error_code(code),
        LlmError::ApiError {
            code: Some(code), ..
        } => is_token_error_code(code),
        _ => false,
    }
}

/// Qianfan has no system role: the prompt becomes a leading user turn.
#[derive(Debug, Clone, Default)]
pub struct BaiduRequestTransformer;

impl RequestTransformer for BaiduRequestTransformer {
    fn provider_id(&self) -> &str {
        "baidu"
    }

    fn transform_chat(
        &self,
        req: &ChatRequest,
        model: &str,
        stream: bool,
    ) -> Result<Value, LlmError> {
        let mut body = Map::new();
        body.insert(
            "messages".into(),
            serde_json::to_value(req.to_messages(SystemPromptPlacement::LeadingUserTurn))?,
        );
        body.insert("temperature".into(), Value::from(req.temperature));
        TokenLimitPolicy::Fixed(TokenLimitParam::MaxOutputTokens)
            .select(model, req.max_tokens, None)
            .apply(&mut body);
        if stream {
            body.insert("stream".into(), Value::Bool(true));
        }
        merge_extra(&mut body, &req.extra);
        Ok(Value::Object(body))
    }
}

#[derive(Debug, Clone, Default)]
pub struct BaiduResponseTransformer;

impl ResponseTransformer for BaiduResponseTransformer {
    fn provider_id(&self) -> &str {
        "baidu"
    }

    fn transform_chat_response(&self, raw: &Value) -> Result<Completion, LlmError> {
        if let Some(err) = body_error(raw) {
            return Err(err);
        }
        let response: QianfanResponse = serde_json::from_value(raw.clone())
            .map_err(|e| LlmError::ParseError(format!("baidu: unexpected response shape: {e}")))?;
        let content = response
            .result
            .ok_or_else(|| LlmError::ParseError("baidu: response has no result".to_string()))?;
        Ok(Completion {
            content,
            usage: response.usage.map(Into::into),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_system_prompt_folded_into_user_turns() {
        let req = ChatRequest::new("question").with_system_prompt("be brief");
        let body = BaiduRequestTransformer
            .transform_chat(&req, "ernie-bot-turbo", false)
            .unwrap();
        assert_eq!(
            body,
            json!({
                "messages": [
                    {"role": "user", "content": "be brief"},
                    {"role": "user", "content": "question"}
                ],
                "temperature": 0.7,
                "max_output_tokens": 1000
            })
        );
    }

    #[test]
    fn test_result_extraction() {
        let raw = json!({
            "id": "as-1",
            "result": "你好",
            "is_truncated": false,
            "usage": {"prompt_tokens": 2, "completion_tokens": 3, "total_tokens": 5}
        });
        let completion = BaiduResponseTransformer.transform_chat_response(&raw).unwrap();
        assert_eq!(completion.content, "你好");
        assert_eq!(completion.usage, Some(Usage::new(2, 3, 5)));
    }

    #[test]
    fn test_error_code_in_body() {
        let raw = json!({"error_code": 110, "error_msg": "Access token invalid or no longer valid"});
        let err = BaiduResponseTransformer.transform_chat_response(&raw).unwrap_err();
        assert!(is_token_error(&err));
        assert_eq!(err.error_code().as_deref(), Some("110"));

        let raw = json!({"error_code": 336003, "error_msg": "invalid argument"});
        let err = BaiduResponseTransformer.transform_chat_response(&raw).unwrap_err();
        assert!(!is_token_error(&err));
    }
}
