//! Session manager for chat sessions.
//!
//! Wraps a `ChatSession` with turn tracking, the example-query prefill slot
//! and lifecycle management.

use chrono::Utc;

use pakguider_types::chat::{ChatSession, Conversation, EXAMPLE_QUERIES, SessionStatus};
use pakguider_types::error::SessionError;

/// Manages the lifecycle and state of a single chat session.
pub struct SessionManager {
    session: ChatSession,
}

impl SessionManager {
    /// Start a fresh session seeded with the greeting.
    pub fn new() -> Self {
        Self {
            session: ChatSession::new(),
        }
    }

    pub fn session(&self) -> &ChatSession {
        &self.session
    }

    pub fn conversation(&self) -> &Conversation {
        &self.session.conversation
    }

    pub fn turn_count(&self) -> u32 {
        self.session.turn_count
    }

    pub fn is_active(&self) -> bool {
        self.session.status == SessionStatus::Active
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.session.conversation.push_user(content);
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.session.conversation.push_assistant(content);
    }

    /// A "turn" is one user message + one assistant response.
    pub fn increment_turn(&mut self) {
        self.session.turn_count += 1;
    }

    /// Record that the one-time loading indicator has been displayed.
    ///
    /// Returns `true` only on the first call for this session.
    pub fn mark_loading_shown(&mut self) -> bool {
        let first = !self.session.loading_shown;
        self.session.loading_shown = true;
        first
    }

    /// Set the pending question, replacing any earlier prefill.
    pub fn prefill(&mut self, query: impl Into<String>) {
        self.session.input_value = Some(query.into());
    }

    /// Prefill one of the fixed example queries. `index` is 1-based.
    pub fn prefill_example(&mut self, index: usize) -> Result<&'static str, SessionError> {
        let query = index
            .checked_sub(1)
            .and_then(|i| EXAMPLE_QUERIES.get(i))
            .copied()
            .ok_or(SessionError::ExampleOutOfRange {
                index,
                max: EXAMPLE_QUERIES.len(),
            })?;
        self.prefill(query);
        Ok(query)
    }

    /// Take the pending question, leaving the slot empty.
    pub fn take_input(&mut self) -> Option<String> {
        self.session.input_value.take()
    }

    /// Decide which question a submission asks.
    ///
    /// A pending prefill wins over the submitted text and is consumed.
    /// Whatever remains must be non-blank.
    pub fn resolve_question(&mut self, submitted: Option<&str>) -> Result<String, SessionError> {
        if !self.is_active() {
            return Err(SessionError::Ended);
        }

        let question = match self.take_input() {
            Some(pending) => pending,
            None => submitted.unwrap_or_default().to_string(),
        };

        if question.trim().is_empty() {
            return Err(SessionError::EmptyQuestion);
        }
        Ok(question)
    }

    /// Sets status to `Completed` and records the end timestamp.
    pub fn mark_completed(&mut self) {
        self.session.status = SessionStatus::Completed;
        self.session.ended_at = Some(Utc::now());
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}
