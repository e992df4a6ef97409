//! HTTP error classification
//!
//! Vendors report failures in several body shapes:
//! - OpenAI-compatible: `{"error": {"message", "type", "code"}}`
//! - DashScope: `{"code": "...", "message": "..."}`
//! - Qianfan: `{"error_code": 110, "error_msg": "..."}`
//! - OAuth token endpoint: `{"error": "...", "error_description": "..."}`
//!
//! Anything else is surfaced as raw text.

use serde_json::Value;

use crate::error::LlmError;

/// Render a JSON scalar code (string or number) as text.
pub fn code_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Parse the OpenAI error envelope. `None` when the body is not one.
pub fn classify_openai_envelope(status: u16, json: &Value) -> Option<LlmError> {
    let error = json.get("error")?.as_object()?;
    let message = error
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or("Unknown error");
    let code = error
        .get("code")
        .and_then(code_to_string)
        .or_else(|| error.get("type").and_then(code_to_string));
    Some(LlmError::ApiError {
        status,
        code,
        message: message.to_string(),
    })
}

/// Classify a non-2xx response.
pub fn classify_http_error(status: u16, body: &str) -> LlmError {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        if let Some(err) = classify_openai_envelope(status, &json) {
            return err;
        }
        if let Some(code) = json.get("error_code").and_then(code_to_string) {
            return LlmError::ApiError {
                status,
                code: Some(code),
                message: str_field(&json, "error_msg").unwrap_or_default().to_string(),
            };
        }
        if let Some(code) = str_field(&json, "code") {
            return LlmError::ApiError {
                status,
                code: Some(code.to_string()),
                message: str_field(&json, "message").unwrap_or_default().to_string(),
            };
        }
        if let Some(code) = str_field(&json, "error") {
            return LlmError::ApiError {
                status,
                code: Some(code.to_string()),
                message: str_field(&json, "error_description")
                    .unwrap_or(code)
                    .to_string(),
            };
        }
    }

    let text = body.trim();
    let message = if text.is_empty() {
        let reason = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or("unknown status");
        format!("HTTP {status} {reason}")
    } else {
        text.to_string()
    };
    LlmError::ApiError {
        status,
        code: None,
        message,
    }
}
