//! Log-safe rendering of credentials
//!
//! Request logs carry headers and URLs; both may hold API keys or OAuth
//! tokens. Everything passed to `tracing` goes through these helpers first.

use reqwest::header::HeaderMap;
use std::collections::BTreeMap;
use std::time::Instant;

/// Query parameters whose values are secrets
const SENSITIVE_QUERY_KEYS: &[&str] = &["access_token", "client_secret", "client_id", "api_key"];

/// Mask a credential, keeping a short prefix and suffix for correlation.
pub fn mask_sensitive_value(value: &str) -> String {
    if let Some(token) = value.strip_prefix("Bearer ") {
        return format!("Bearer {}", mask_sensitive_value(token));
    }
    let chars: Vec<char> = value.chars().collect();
    let (head, tail) = if value.starts_with("sk-") && chars.len() > 12 {
        (8, 4)
    } else if chars.len() > 16 {
        (6, 4)
    } else if chars.len() > 8 {
        (2, 2)
    } else {
        return "***".to_string();
    };
    let prefix: String = chars[..head].iter().collect();
    let suffix: String = chars[chars.len() - tail..].iter().collect();
    format!("{prefix}...{suffix}")
}

fn is_sensitive_header(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    name.contains("authorization") || name.contains("key") || name.contains("token")
}

/// Render headers as a compact JSON object with secrets masked.
pub fn format_headers_for_logging(headers: &HeaderMap) -> String {
    let map: BTreeMap<&str, String> = headers
        .iter()
        .map(|(k, v)| {
            let value = v.to_str().unwrap_or("<invalid>");
            let rendered = if is_sensitive_header(k.as_str()) {
                mask_sensitive_value(value)
            } else {
                value.to_string()
            };
            (k.as_str(), rendered)
        })
        .collect();
    serde_json::to_string(&map).unwrap_or_else(|_| format!("{map:?}"))
}

/// Mask secret query parameters (Qianfan passes its token in the URL).
pub fn mask_url_for_logging(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };
    let masked: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) if SENSITIVE_QUERY_KEYS.contains(&key) => {
                format!("{key}={}", mask_sensitive_value(value))
            }
            _ => pair.to_string(),
        })
        .collect();
    format!("{base}?{}", masked.join("&"))
}

/// Per-call tracing helper used by adapters.
#[derive(Debug, Clone)]
pub struct ProviderTracer {
    provider: &'static str,
    model: String,
    started: Instant,
}

impl ProviderTracer {
    pub fn new(provider: &'static str, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            started: Instant::now(),
        }
    }

    pub fn trace_request_start(&self, stream: bool) {
        tracing::info!(provider = %self.provider, model = %self.model, stream, "chat request started");
    }

    pub fn trace_success(&self) {
        tracing::debug!(
            provider = %self.provider,
            model = %self.model,
            duration_ms = self.started.elapsed().as_millis() as u64,
            "chat request completed"
        );
    }

    pub fn trace_failure(&self, error: &crate::error::LlmError) {
        tracing::warn!(
            provider = %self.provider,
            model = %self.model,
            duration_ms = self.started.elapsed().as_millis() as u64,
            category = ?error.category(),
            error = %error,
            "chat request failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderValue};

    #[test]
    fn test_mask_bearer_and_openai_keys() {
        assert_eq!(
            mask_sensitive_value("Bearer sk-1234567890abcdef"),
            "Bearer sk-12345...cdef"
        );
        assert_eq!(mask_sensitive_value("short"), "***");
        assert_eq!(
            mask_sensitive_value("abcdefghijklmnopqrstuvwxyz"),
            "abcdef...wxyz"
        );
    }

    #[test]
    fn test_headers_masked() {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_static("Bearer sk-1234567890abcdef"),
        );
        headers.insert("api-key", HeaderValue::from_static("0123456789abcdef0123"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let rendered = format_headers_for_logging(&headers);
        assert!(!rendered.contains("sk-1234567890abcdef"));
        assert!(!rendered.contains("0123456789abcdef0123"));
        assert!(rendered.contains("application/json"));
    }

    #[test]
    fn test_url_token_masked() {
        let url = "https://aip.baidubce.com/rpc/2.0/chat/eb-instant?access_token=24.abcdefghijklmnopqrstuvwxyz&x=1";
        let masked = mask_url_for_logging(url);
        assert!(!masked.contains("abcdefghijklmnopqrstuvwxyz"));
        assert!(masked.ends_with("&x=1"));
        assert_eq!(mask_url_for_logging("https://a/b"), "https://a/b");
    }
}
