//! Normalized response types

use serde::{Deserialize, Serialize};

use crate::error::LlmError;

/// Token accounting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32, total_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens,
        }
    }
}

/// What a response transformer extracts from a successful vendor body.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    pub content: String,
    pub usage: Option<Usage>,
}

/// Normalized chat result.
///
/// Either `success` with `content` present, or a failure with a non-empty
/// `error`. Use the constructors to keep that invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
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

impl ChatResponse {
    pub fn success(content: impl Into<String>, model: impl Into<String>, usage: Option<Usage>) -> Self {
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

    /// Normalize an adapter-internal result.
    pub fn from_result(model: String, result: Result<Completion, LlmError>) -> Self {
        match result {
            Ok(completion) => Self::success(completion.content, model, completion.usage),
            Err(e) => Self::failure(Some(model), &e),
        }
    }

    /// Generated text, empty for failures
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }

    /// Convert to a `Result`, with the error string on failure
    pub fn into_result(self) -> Result<String, String> {
        if self.success {
            Ok(self.content.unwrap_or_default())
        } else {
            Err(self.error.unwrap_or_default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_carries_message_and_code() {
        let err = LlmError::ApiError {
            status: 401,
            code: Some("invalid_api_key".into()),
            message: "Incorrect API key provided".into(),
        };
        let resp = ChatResponse::failure(Some("gpt-4o".into()), &err);
        assert!(!resp.success);
        assert!(resp.content.is_none());
        assert_eq!(resp.error.as_deref(), Some("Incorrect API key provided"));
        assert_eq!(resp.code.as_deref(), Some("invalid_api_key"));
    }

    #[test]
    fn test_success_serializes_without_error_fields() {
        let resp = ChatResponse::success("hi", "qwen-turbo", Some(Usage::new(3, 1, 4)));
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": true,
                "content": "hi",
                "model": "qwen-turbo",
                "usage": {"prompt_tokens": 3, "completion_tokens": 1, "total_tokens": 4}
            })
        );
    }

    #[test]
    fn test_into_result() {
        assert_eq!(ChatResponse::success("a", "m", None).into_result(), Ok("a".to_string()));
        let failed = ChatResponse::failure(None, &LlmError::HttpError("reset".into()));
        assert_eq!(failed.into_result(), Err("HTTP error: reset".to_string()));
    }
}
