//! Chat request types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::LlmError;

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
/// Default generation length cap
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A single chat turn as sent over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Where a vendor wants the system prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemPromptPlacement {
    /// A leading `system` role message
    SystemRole,
    /// A leading `user` turn, for vendors without a system role
    LeadingUserTurn,
}

/// Unified chat request.
///
/// Built per call and never retained by an adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// User turn content
    pub message: String,
    /// Optional system prompt
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// Model id (or Azure deployment alias); `None` selects the vendor default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Generation length cap
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Explicit new-generation token limit (OpenAI-compatible vendors only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
    /// Vendor passthrough parameters
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub extra: Map<String, Value>,
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            system_prompt: None,
            model: None,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
            max_completion_tokens: None,
            extra: Map::new(),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_max_completion_tokens(mut self, max_completion_tokens: u32) -> Self {
        self.max_completion_tokens = Some(max_completion_tokens);
        self
    }

    /// Add a passthrough parameter
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Model to use: the explicit one, else `default_model`.
    pub fn resolve_model(&self, default_model: &str) -> String {
        self.model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(default_model)
            .to_string()
    }

    pub fn validate(&self) -> Result<(), LlmError> {
        if self.message.trim().is_empty() {
            return Err(LlmError::InvalidInput(
                "message cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Build the wire conversation for the given system prompt placement.
    pub fn to_messages(&self, placement: SystemPromptPlacement) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = self.system_prompt.as_deref().filter(|s| !s.is_empty()) {
            messages.push(match placement {
                SystemPromptPlacement::SystemRole => ChatMessage::system(system),
                SystemPromptPlacement::LeadingUserTurn => ChatMessage::user(system),
            });
        }
        messages.push(ChatMessage::user(self.message.clone()));
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults() {
        let req = ChatRequest::new("hello");
        assert_eq!(req.temperature, 0.7);
        assert_eq!(req.max_tokens, 1000);
        assert!(req.model.is_none());
        assert!(req.extra.is_empty());
    }

    #[test]
    fn test_request_defaults_from_json() {
        let req: ChatRequest = serde_json::from_str(r#"{"message":"hi"}"#).unwrap();
        assert_eq!(req, ChatRequest::new("hi"));
    }

    #[test]
    fn test_resolve_model() {
        let req = ChatRequest::new("hi");
        assert_eq!(req.resolve_model("qwen-turbo"), "qwen-turbo");
        let req = req.with_model("qwen-max");
        assert_eq!(req.resolve_model("qwen-turbo"), "qwen-max");
        let blank = ChatRequest::new("hi").with_model("  ");
        assert_eq!(blank.resolve_model("glm-4"), "glm-4");
    }

    #[test]
    fn test_validate_rejects_blank_message() {
        assert!(ChatRequest::new("   ").validate().is_err());
        assert!(ChatRequest::new("ok").validate().is_ok());
    }

    #[test]
    fn test_system_prompt_placement() {
        let req = ChatRequest::new("question").with_system_prompt("be brief");

        let msgs = req.to_messages(SystemPromptPlacement::SystemRole);
        assert_eq!(msgs, vec![ChatMessage::system("be brief"), ChatMessage::user("question")]);

        let msgs = req.to_messages(SystemPromptPlacement::LeadingUserTurn);
        assert_eq!(msgs, vec![ChatMessage::user("be brief"), ChatMessage::user("question")]);
    }

    #[test]
    fn test_no_system_prompt_single_turn() {
        let msgs = ChatRequest::new("q").to_messages(SystemPromptPlacement::SystemRole);
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].role, MessageRole::User);
    }
}
