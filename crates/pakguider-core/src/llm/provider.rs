//! LlmProvider trait definition.

use pakguider_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for chat-completion backends.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). Not
/// object-safe; wrap in [`BoxLlmProvider`](super::box_provider::BoxLlmProvider)
/// for runtime dispatch.
///
/// Implementations live in pakguider-infra (e.g., `MistralProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "mistral").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    ///
    /// Failures to reach the endpoint at all must be reported as
    /// [`LlmError::Connection`].
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
