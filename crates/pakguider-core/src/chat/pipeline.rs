//! Query-augmentation pipeline.
//!
//! One user turn runs search, prompt assembly and completion in sequence.
//! The pipeline never surfaces an error to its caller: any failure is turned
//! into a fixed fallback sentence that is shown to the user like an answer.

use tracing::{Instrument, Span, field, info_span, warn};

use pakguider_observe::genai_attrs::{
    GEN_AI_RESPONSE_FINISH_REASONS, GEN_AI_RESPONSE_ID, GEN_AI_USAGE_INPUT_TOKENS,
    GEN_AI_USAGE_OUTPUT_TOKENS, OP_CHAT, SEARCH_RESULT_COUNT,
};
use pakguider_types::config::ChatSettings;
use pakguider_types::llm::{CompletionRequest, LlmError, Message, MessageRole};
use pakguider_types::search::SearchError;

use crate::llm::box_provider::BoxLlmProvider;
use crate::prompt::assembler::PromptAssembler;
use crate::search::client::DocumentSearchClient;

use super::session::SessionManager;

/// Shown when the completion endpoint cannot be reached.
pub const CONNECTION_ERROR_MESSAGE: &str =
    "There was a connection error. Please check your internet connection and try again.";

/// Failure of a single turn.
#[derive(Debug, thiserror::Error)]
pub enum TurnError {
    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Completion(#[from] LlmError),
}

impl TurnError {
    /// The user-facing sentence for this failure.
    pub fn fallback_message(&self) -> String {
        match self {
            TurnError::Completion(err) if err.is_connection() => {
                CONNECTION_ERROR_MESSAGE.to_string()
            }
            other => format!("An unexpected error occurred: {other}"),
        }
    }
}

/// Search -> assemble -> complete, once per user turn.
///
/// Holds no per-session state; a single instance is shared by every session.
pub struct QueryPipeline {
    search: DocumentSearchClient,
    llm: BoxLlmProvider,
    settings: ChatSettings,
}

impl QueryPipeline {
    pub fn new(search: DocumentSearchClient, llm: BoxLlmProvider, settings: ChatSettings) -> Self {
        Self {
            search,
            llm,
            settings,
        }
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    pub fn llm_name(&self) -> &str {
        self.llm.name()
    }

    pub fn search_name(&self) -> &str {
        self.search.provider_name()
    }

    /// Answer `query` given the prior turns. Never fails.
    pub async fn answer(&self, query: &str, history: &[Message]) -> String {
        match self.try_answer(query, history).await {
            Ok(text) => text,
            Err(err) => {
                warn!(error = %err, "Turn failed, returning fallback message");
                err.fallback_message()
            }
        }
    }

    /// Answer `query` and record both sides of the exchange in the session.
    ///
    /// The history sent to the model is the conversation as it was before
    /// this turn; the user message is appended only afterwards so it is not
    /// sent twice.
    pub async fn run_turn(&self, session: &mut SessionManager, query: &str) -> String {
        let history = session.conversation().messages().to_vec();
        session.push_user(query);

        let answer = self.answer(query, &history).await;

        session.push_assistant(answer.clone());
        session.increment_turn();
        answer
    }

    /// Same as [`answer`](Self::answer) but with the failure preserved.
    pub async fn try_answer(&self, query: &str, history: &[Message]) -> Result<String, TurnError> {
        let span = info_span!(
            "gen_ai.chat",
            gen_ai.operation.name = OP_CHAT,
            gen_ai.provider.name = self.llm.name(),
            gen_ai.request.model = %self.settings.model,
            gen_ai.request.max_tokens = self.settings.max_tokens,
            search.result_count = field::Empty,
            gen_ai.response.id = field::Empty,
            gen_ai.response.finish_reasons = field::Empty,
            gen_ai.usage.input_tokens = field::Empty,
            gen_ai.usage.output_tokens = field::Empty,
        );

        self.run(query, history, &span).instrument(span.clone()).await
    }

    async fn run(&self, query: &str, history: &[Message], span: &Span) -> Result<String, TurnError> {
        let passages = self.search.search(query).await?;
        span.record(SEARCH_RESULT_COUNT, passages.len() as u64);

        let system = PromptAssembler::build_system_message(&passages, query);
        let request = self.build_request(system, history, query);

        let response = self.llm.complete(&request).await?;
        span.record(GEN_AI_RESPONSE_ID, response.id.as_str());
        span.record(
            GEN_AI_RESPONSE_FINISH_REASONS,
            response.stop_reason.to_string().as_str(),
        );
        span.record(GEN_AI_USAGE_INPUT_TOKENS, response.usage.input_tokens);
        span.record(GEN_AI_USAGE_OUTPUT_TOKENS, response.usage.output_tokens);

        Ok(response.content)
    }

    /// `[system] + prior turns + [user]`.
    ///
    /// Any system message in `history` is dropped so only the fresh preamble
    /// reaches the model.
    pub fn build_request(&self, system: Message, history: &[Message], query: &str) -> CompletionRequest {
        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(system);
        messages.extend(
            history
                .iter()
                .filter(|m| m.role != MessageRole::System)
                .cloned(),
        );
        messages.push(Message::user(query));

        CompletionRequest {
            model: self.settings.model.clone(),
            messages,
            max_tokens: self.settings.max_tokens,
            safe_prompt: self.settings.safe_prompt,
        }
    }
}
