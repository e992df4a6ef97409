//! Token-limit parameter selection
//!
//! Newer OpenAI model families reject `max_tokens` and expect
//! `max_completion_tokens`. Which family a model belongs to is decided by a
//! case-insensitive substring match against a marker list. Model naming changes
//! over time, so the markers are configuration, not code.

use serde_json::{Map, Value};

/// Markers used when no override is configured.
pub const DEFAULT_NEW_GENERATION_MARKERS: &[&str] = &["gpt-5", "o1"];

/// Wire name of the generation length cap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLimitParam {
    /// Legacy OpenAI-style `max_tokens`
    MaxTokens,
    /// New-generation `max_completion_tokens`
    MaxCompletionTokens,
    /// Qianfan's name for the legacy limit
    MaxOutputTokens,
}

impl TokenLimitParam {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MaxTokens => "max_tokens",
            Self::MaxCompletionTokens => "max_completion_tokens",
            Self::MaxOutputTokens => "max_output_tokens",
        }
    }
}

/// A selected parameter name with its value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenLimit {
    pub param: TokenLimitParam,
    pub value: u32,
}

impl TokenLimit {
    /// Write this limit into a JSON body
    pub fn apply(&self, body: &mut Map<String, Value>) {
        body.insert(self.param.as_str().to_string(), Value::from(self.value));
    }
}

/// How an adapter chooses its token-limit parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenLimitPolicy {
    /// Always send the value under one fixed name
    Fixed(TokenLimitParam),
    /// Explicit new-generation value wins; otherwise route by model markers
    ModelMarkers(Vec<String>),
}

impl Default for TokenLimitPolicy {
    fn default() -> Self {
        Self::with_markers(DEFAULT_NEW_GENERATION_MARKERS.iter().copied())
    }
}

impl TokenLimitPolicy {
    /// Always `max_tokens`
    pub fn legacy() -> Self {
        Self::Fixed(TokenLimitParam::MaxTokens)
    }

    pub fn with_markers<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::ModelMarkers(
            markers
                .into_iter()
                .map(|m| m.as_ref().trim().to_ascii_lowercase())
                .filter(|m| !m.is_empty())
                .collect(),
        )
    }

    /// Whether `model` belongs to a new-generation family under this policy.
    pub fn is_new_generation(&self, model: &str) -> bool {
        match self {
            Self::Fixed(_) => false,
            Self::ModelMarkers(markers) => {
                let model = model.to_ascii_lowercase();
                markers.iter().any(|m| model.contains(m.as_str()))
            }
        }
    }

    /// Pick the parameter name and value for one request.
    pub fn select(&self, model: &str, max_tokens: u32, max_completion_tokens: Option<u32>) -> TokenLimit {
        match self {
            Self::Fixed(param) => TokenLimit {
                param: *param,
                value: max_tokens,
            },
            Self::ModelMarkers(_) => {
                if let Some(value) = max_completion_tokens {
                    TokenLimit {
                        param: TokenLimitParam::MaxCompletionTokens,
                        value,
                    }
                } else if self.is_new_generation(model) {
                    TokenLimit {
                        param: TokenLimitParam::MaxCompletionTokens,
                        value: max_tokens,
                    }
                } else {
                    TokenLimit {
                        param: TokenLimitParam::MaxTokens,
                        value: max_tokens,
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_generation_model_routes_to_completion_tokens() {
        let policy = TokenLimitPolicy::default();
        let limit = policy.select("gpt-5-mini", 1000, None);
        assert_eq!(limit.param, TokenLimitParam::MaxCompletionTokens);
        assert_eq!(limit.value, 1000);

        let limit = policy.select("O1-preview", 256, None);
        assert_eq!(limit.param, TokenLimitParam::MaxCompletionTokens);
    }

    #[test]
    fn test_ordinary_model_routes_to_max_tokens() {
        let limit = TokenLimitPolicy::default().select("gpt-4o", 1000, None);
        assert_eq!(
            limit,
            TokenLimit {
                param: TokenLimitParam::MaxTokens,
                value: 1000
            }
        );
    }

    #[test]
    fn test_explicit_completion_tokens_win() {
        let limit = TokenLimitPolicy::default().select("gpt-4o", 1000, Some(64));
        assert_eq!(limit.param, TokenLimitParam::MaxCompletionTokens);
        assert_eq!(limit.value, 64);
    }

    #[test]
    fn test_markers_are_overridable() {
        let policy = TokenLimitPolicy::with_markers(["o3", " GPT-6 "]);
        assert!(policy.is_new_generation("o3-mini"));
        assert!(policy.is_new_generation("gpt-6"));
        assert!(!policy.is_new_generation("gpt-5"));

        let empty = TokenLimitPolicy::with_markers(Vec::<String>::new());
        assert!(!empty.is_new_generation("gpt-5"));
    }

    #[test]
    fn test_fixed_policy_ignores_explicit_value() {
        let policy = TokenLimitPolicy::Fixed(TokenLimitParam::MaxOutputTokens);
        let limit = policy.select("gpt-5", 300, Some(10));
        assert_eq!(limit.param.as_str(), "max_output_tokens");
        assert_eq!(limit.value, 300);
    }

    #[test]
    fn test_apply_writes_single_key() {
        let mut body = Map::new();
        TokenLimitPolicy::default().select("o1-mini", 123, None).apply(&mut body);
        assert!(body.get("max_tokens").is_none());
        assert_eq!(body["max_completion_tokens"], Value::from(123));
    }
}
