//! Error Handling Module
//!
//! `LlmError` covers both halves of the adapter contract:
//! - construction-time failures (`ConfigurationError`, `MissingCredential`,
//!   `UnsupportedVendor`) which are returned as `Err` to the caller;
//! - request-level failures which adapters convert into a failed
//!   [`ChatResponse`](crate::types::ChatResponse) instead of raising.
//!
//! # Example
//!
//! ```rust
//! use unichat::error::{ErrorCategory, LlmError};
//!
//! let error = LlmError::ApiError {
//!     status: 401,
//!     code: Some("invalid_api_key".to_string()),
//!     message: "Incorrect API key provided".to_string(),
//! };
//! assert_eq!(error.category(), ErrorCategory::Authentication);
//! assert_eq!(error.error_code().as_deref(), Some("invalid_api_key"));
//! ```

use crate::types::Vendor;
use thiserror::Error;

/// Unified error type for every adapter.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LlmError {
    /// Invalid or incomplete configuration
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// A mandatory credential component is absent
    #[error("{vendor}: missing required credential `{field}`")]
    MissingCredential { vendor: Vendor, field: &'static str },

    /// Unknown vendor token
    #[error("Unsupported vendor: {0}")]
    UnsupportedVendor(String),

    /// The request itself is malformed (e.g. empty message)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Transport-level failure (DNS, TLS, connection reset, timeout)
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// Non-success HTTP status from the vendor
    #[error("API error {status}: {message}")]
    ApiError {
        status: u16,
        code: Option<String>,
        message: String,
    },

    /// Vendor signalled failure inside an otherwise successful body
    #[error("Vendor error {code}: {message}")]
    VendorError { code: String, message: String },

    /// The vendor body did not have the expected shape
    #[error("Parse error: {0}")]
    ParseError(String),

    /// JSON (de)serialization failure
    #[error("JSON error: {0}")]
    JsonError(String),

    /// Failure while decoding a streaming body
    #[error("Stream error: {0}")]
    StreamError(String),
}

/// Coarse classification of an [`LlmError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Authentication,
    RateLimit,
    Client,
    Server,
    Network,
    Parsing,
    Vendor,
}

impl LlmError {
    /// Coarse category used for logging and caller-side branching.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigurationError(_)
            | Self::MissingCredential { .. }
            | Self::UnsupportedVendor(_) => ErrorCategory::Configuration,
            Self::InvalidInput(_) => ErrorCategory::Client,
            Self::HttpError(_) => ErrorCategory::Network,
            Self::ApiError { status, .. } => match status {
                401 | 403 => ErrorCategory::Authentication,
                429 => ErrorCategory::RateLimit,
                500..=599 => ErrorCategory::Server,
                _ => ErrorCategory::Client,
            },
            Self::VendorError { .. } => ErrorCategory::Vendor,
            Self::ParseError(_) | Self::JsonError(_) | Self::StreamError(_) => {
                ErrorCategory::Parsing
            }
        }
    }

    /// True for errors raised at construction/dispatch time.
    pub fn is_configuration(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }

    /// HTTP status when the error came from a non-success response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::ApiError { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Vendor error code, falling back to the HTTP status.
    pub fn error_code(&self) -> Option<String> {
        match self {
            Self::ApiError { status, code, .. } => {
                Some(code.clone().unwrap_or_else(|| status.to_string()))
            }
            Self::VendorError { code, .. } => Some(code.clone()),
            Self::InvalidInput(_) => Some("invalid_input".to_string()),
            _ => None,
        }
    }

    /// The message to surface to callers: the vendor's own text when there is
    /// one, the rendered error otherwise. Never empty.
    pub fn user_message(&self) -> String {
        let raw = match self {
            Self::ApiError { message, .. } | Self::VendorError { message, .. } => {
                message.trim().to_string()
            }
            _ => String::new(),
        };
        if raw.is_empty() {
            self.to_string()
        } else {
            raw
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_credential_names_field() {
        let err = LlmError::MissingCredential {
            vendor: Vendor::Baidu,
            field: "secret_key",
        };
        assert_eq!(err.to_string(), "baidu: missing required credential `secret_key`");
        assert!(err.is_configuration());
    }

    #[test]
    fn test_api_error_categories() {
        let make = |status| LlmError::ApiError {
            status,
            code: None,
            message: "boom".into(),
        };
        assert_eq!(make(401).category(), ErrorCategory::Authentication);
        assert_eq!(make(429).category(), ErrorCategory::RateLimit);
        assert_eq!(make(400).category(), ErrorCategory::Client);
        assert_eq!(make(503).category(), ErrorCategory::Server);
        assert_eq!(make(503).status_code(), Some(503));
    }

    #[test]
    fn test_error_code_falls_back_to_status() {
        let err = LlmError::ApiError {
            status: 500,
            code: None,
            message: String::new(),
        };
        assert_eq!(err.error_code().as_deref(), Some("500"));
        // empty vendor message still yields something printable
        assert_eq!(err.user_message(), "API error 500: ");
    }

    #[test]
    fn test_user_message_is_vendor_verbatim() {
        let err = LlmError::VendorError {
            code: "110".into(),
            message: "Access token invalid or no longer valid".into(),
        };
        assert_eq!(err.user_message(), "Access token invalid or no longer valid");
        assert_eq!(err.error_code().as_deref(), Some("110"));
        assert_eq!(err.category(), ErrorCategory::Vendor);
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let llm_err: LlmError = json_err.into();
        assert!(matches!(llm_err, LlmError::JsonError(_)));
    }
}
