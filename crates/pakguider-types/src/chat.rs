//! Conversation and chat-session types for PakGuider.
//!
//! A [`Conversation`] is the append-only transcript of one session. A
//! [`ChatSession`] wraps it with the per-session presentation flags the UI
//! needs (loading indicator, example-query prefill).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

pub use crate::llm::{Message, MessageRole};

/// Assistant greeting every new conversation starts with.
pub const GREETING: &str =
    "Hi! I'm here to help you with tourism-related questions about Pakistan!";

/// Quick-fill example questions offered by the UI.
pub const EXAMPLE_QUERIES: [&str; 5] = [
    "What is the visa policy for visiting the country?",
    "Are there any important contacts?",
    "What is the best time to visit Pakistan?",
    "What are policies regarding vaccinations?",
    "What types of clothes to wear season-wise?",
];

/// Ordered user/assistant turns for one session.
///
/// Append-only: there is no way to remove or rewrite a message once pushed.
/// System preambles are never stored here; they are rebuilt every turn.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    /// An empty conversation.
    pub fn new() -> Self {
        Self::default()
    }

    /// A conversation seeded with the assistant [`GREETING`].
    pub fn with_greeting() -> Self {
        Self {
            messages: vec![Message::assistant(GREETING)],
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.messages.push(Message::assistant(content));
    }

    /// All messages, oldest first.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Lifecycle status of a chat session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Active,
    Completed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Active => write!(f, "active"),
            SessionStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(SessionStatus::Active),
            "completed" => Ok(SessionStatus::Completed),
            other => Err(format!("invalid session status: '{other}'")),
        }
    }
}

/// Per-session view-model.
///
/// Owns the session's [`Conversation`] plus the two presentation flags:
/// whether the one-time loading indicator has been shown, and a pending
/// question pre-filled by an example button.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub status: SessionStatus,
    pub loading_shown: bool,
    pub input_value: Option<String>,
    pub turn_count: u32,
    pub conversation: Conversation,
}

impl ChatSession {
    /// Start a fresh session with the greeting already in the transcript.
    pub fn new() -> Self {
        Self {
            id: Uuid::now_v7(),
            created_at: Utc::now(),
            ended_at: None,
            status: SessionStatus::Active,
            loading_shown: false,
            input_value: None,
            turn_count: 0,
            conversation: Conversation::with_greeting(),
        }
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_with_greeting() {
        let conv = Conversation::with_greeting();
        assert_eq!(conv.len(), 1);
        let first = conv.last().unwrap();
        assert_eq!(first.role, MessageRole::Assistant);
        assert_eq!(first.content, GREETING);
    }

    #[test]
    fn test_conversation_append_order() {
        let mut conv = Conversation::new();
        assert!(conv.is_empty());
        conv.push_user("q1");
        conv.push_assistant("a1");
        conv.push_user("q2");
        let roles: Vec<MessageRole> = conv.messages().iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![MessageRole::User, MessageRole::Assistant, MessageRole::User]
        );
        assert_eq!(conv.last().unwrap().content, "q2");
    }

    #[test]
    fn test_conversation_serializes_as_list() {
        let mut conv = Conversation::new();
        conv.push_user("hello");
        let json = serde_json::to_value(&conv).unwrap();
        assert!(json.is_array());
        assert_eq!(json[0]["role"], "user");
        assert_eq!(json[0]["content"], "hello");
    }

    #[test]
    fn test_session_status_roundtrip() {
        for status in [SessionStatus::Active, SessionStatus::Completed] {
            let parsed: SessionStatus = status.to_string().parse().unwrap();
            assert_eq!(status, parsed);
        }
    }

    #[test]
    fn test_new_chat_session_flags() {
        let session = ChatSession::new();
        assert!(!session.loading_shown);
        assert!(session.input_value.is_none());
        assert_eq!(session.turn_count, 0);
        assert_eq!(session.status, SessionStatus::Active);
        assert_eq!(session.conversation.len(), 1);
    }

    #[test]
    fn test_example_queries_contains_best_time() {
        assert_eq!(EXAMPLE_QUERIES.len(), 5);
        assert!(EXAMPLE_QUERIES.contains(&"What is the best time to visit Pakistan?"));
    }
}
