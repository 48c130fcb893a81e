//! Passage lookup over a search provider.

use tracing::{Instrument, debug, info_span};

use pakguider_types::search::{
    DEFAULT_RESULT_LIMIT, PassageRecord, SearchError, SearchRequest,
};

use super::box_provider::BoxSearchProvider;

/// Fetches ranked passage records for a user query.
///
/// Every lookup requests the `CHUNK`, `FILE_URL` and `CATEGORY` columns and
/// at most `limit` results (20 unless overridden).
pub struct DocumentSearchClient {
    provider: BoxSearchProvider,
    limit: u32,
}

impl DocumentSearchClient {
    pub fn new(provider: BoxSearchProvider) -> Self {
        Self {
            provider,
            limit: DEFAULT_RESULT_LIMIT,
        }
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Run one search and validate every returned row.
    ///
    /// An empty or whitespace-only query is rejected before the provider is
    /// called. An empty result list is not an error.
    pub async fn search(&self, query: &str) -> Result<Vec<PassageRecord>, SearchError> {
        if query.trim().is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let mut request = SearchRequest::passages(query);
        request.limit = self.limit;

        let span = info_span!(
            "search.query",
            search.provider = self.provider.name(),
            search.limit = request.limit,
        );

        let response = self.provider.search(&request).instrument(span).await?;

        let passages = response
            .results
            .iter()
            .enumerate()
            .map(|(index, row)| PassageRecord::from_row(index, row))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(count = passages.len(), "Retrieved passages");
        Ok(passages)
    }
}
