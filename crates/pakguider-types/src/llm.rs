//! Chat-completion request/response types for PakGuider.
//!
//! These types model the data shapes exchanged with the chat-completion
//! provider: role-tagged messages, completion requests, usage tracking,
//! and error handling. They are provider-agnostic; wire formats live in
//! `pakguider-infra`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a message in an LLM conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single message in an LLM conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
}

impl Message {
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

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Request to a chat-completion provider.
///
/// Messages are sent in order; the system preamble, when present, is
/// the first element of `messages` rather than a separate field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub max_tokens: u32,
    /// Ask the provider to prepend its content-safety guardrail prompt.
    #[serde(default)]
    pub safe_prompt: bool,
}

/// Response from a chat-completion provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub content: String,
    pub model: String,
    pub stop_reason: StopReason,
    pub usage: Usage,
}

/// Reason why the LLM stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    MaxTokens,
    Error,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::EndTurn => write!(f, "end_turn"),
            StopReason::MaxTokens => write!(f, "max_tokens"),
            StopReason::Error => write!(f, "error"),
        }
    }
}

impl FromStr for StopReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "end_turn" => Ok(StopReason::EndTurn),
            "max_tokens" => Ok(StopReason::MaxTokens),
            "error" => Ok(StopReason::Error),
            other => Err(format!("invalid stop reason: '{other}'")),
        }
    }
}

/// Token usage for a completion request/response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// Errors from chat-completion provider operations.
///
/// `Connection` is kept apart from every other variant: it is the only
/// failure the pipeline reports with its own fixed message.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("provider returned no choices")]
    EmptyResponse,
}

impl LlmError {
    /// Whether the provider could not be reached at all.
    pub fn is_connection(&self) -> bool {
        matches!(self, LlmError::Connection(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_roundtrip() {
        for role in [MessageRole::System, MessageRole::User, MessageRole::Assistant] {
            let s = role.to_string();
            let parsed: MessageRole = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_message_role_serde() {
        let role = MessageRole::Assistant;
        let json = serde_json::to_string(&role).unwrap();
        assert_eq!(json, "\"assistant\"");
        let parsed: MessageRole = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, MessageRole::Assistant);
    }

    #[test]
    fn test_message_constructors() {
        assert_eq!(Message::system("a").role, MessageRole::System);
        assert_eq!(Message::user("b").role, MessageRole::User);
        let m = Message::assistant("c");
        assert_eq!(m.role, MessageRole::Assistant);
        assert_eq!(m.content, "c");
    }

    #[test]
    fn test_stop_reason_parse_rejects_unknown() {
        assert!("length".parse::<StopReason>().is_err());
        assert_eq!("MAX_TOKENS".parse::<StopReason>().unwrap(), StopReason::MaxTokens);
    }

    #[test]
    fn test_llm_error_is_connection() {
        assert!(LlmError::Connection("refused".into()).is_connection());
        assert!(!LlmError::AuthenticationFailed.is_connection());
        assert!(
            !LlmError::Provider {
                message: "HTTP 500".into()
            }
            .is_connection()
        );
    }
}
