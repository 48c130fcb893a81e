//! SearchProvider trait definition.

use pakguider_types::search::{SearchError, SearchRequest, SearchResponse};

/// Trait for managed document-search backends.
///
/// A provider is bound to one search service at construction time; each
/// call issues exactly one query against it and returns the rows in the
/// provider's ranking order.
///
/// Implementations live in pakguider-infra (e.g., `CortexSearchProvider`).
pub trait SearchProvider: Send + Sync {
    /// Human-readable provider name (e.g., "cortex_search").
    fn name(&self) -> &str;

    fn search(
        &self,
        request: &SearchRequest,
    ) -> impl std::future::Future<Output = Result<SearchResponse, SearchError>> + Send;
}
