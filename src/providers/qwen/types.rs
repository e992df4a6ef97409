//! DashScope text-generation wire types

use serde::Deserialize;

use crate::types::Usage;

#[derive(Debug, Clone, Deserialize)]
pub struct DashScopeResponse {
    #[serde(default)]
    pub output: Option<DashScopeOutput>,
    #[serde(default)]
    pub usage: Option<DashScopeUsage>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DashScopeOutput {
    /// Present with `result_format = "text"`
    #[serde(default)]
    pub text: Option<String>,
    /// Present with `result_format = "message"`
    #[serde(default)]
    pub choices: Vec<DashScopeChoice>,
    /// `"null"` (a string) while generating
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashScopeChoice {
    pub message: DashScopeMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DashScopeMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DashScopeUsage {
    #[serde(default, alias = "prompt_tokens")]
    pub input_tokens: u32,
    #[serde(default, alias = "completion_tokens")]
    pub output_tokens: u32,
    #[serde(default)]
    pub total_tokens: Option<u32>,
}

impl From<DashScopeUsage> for Usage {
    fn from(usage: DashScopeUsage) -> Self {
        Usage::new(
            usage.input_tokens,
            usage.output_tokens,
            usage
                .total_tokens
                .unwrap_or(usage.input_tokens + usage.output_tokens),
        )
    }
}

impl DashScopeOutput {
    /// Generated text in either result format
    pub fn content(&self) -> Option<String> {
        self.text.clone().or_else(|| {
            self.choices
                .first()
                .and_then(|c| c.message.content.clone())
        })
    }

    /// Whether generation has finished
    pub fn is_finished(&self) -> bool {
        let reason = self
            .finish_reason
            .as_deref()
            .or_else(|| self.choices.first().and_then(|c| c.finish_reason.as_deref()));
        matches!(reason, Some(r) if !r.is_empty() && r != "null")
    }
}
