//! Document-search types for PakGuider.
//!
//! Models the request sent to the managed search service, the raw rows it
//! returns, and the validated [`PassageRecord`] the prompt assembler consumes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Column holding the passage text.
pub const CHUNK_COLUMN: &str = "CHUNK";

/// Column holding the source document URL.
pub const FILE_URL_COLUMN: &str = "FILE_URL";

/// Column holding the source category label.
pub const CATEGORY_COLUMN: &str = "CATEGORY";

/// The columns requested for every search, in request order.
pub const PASSAGE_COLUMNS: [&str; 3] = [CHUNK_COLUMN, FILE_URL_COLUMN, CATEGORY_COLUMN];

/// Upper bound on results per search.
pub const DEFAULT_RESULT_LIMIT: u32 = 20;

/// Coordinates of a managed search service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchServiceRef {
    pub database: String,
    pub schema: String,
    pub service: String,
}

impl std::fmt::Display for SearchServiceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.database, self.schema, self.service)
    }
}

/// A single search request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub columns: Vec<String>,
    pub limit: u32,
}

impl SearchRequest {
    /// Build the passage lookup request: the three passage columns, capped at
    /// [`DEFAULT_RESULT_LIMIT`] results.
    pub fn passages(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            columns: PASSAGE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            limit: DEFAULT_RESULT_LIMIT,
        }
    }
}

/// Raw response from the search service.
///
/// Each result exposes the requested columns by name. Rows are kept as
/// untyped maps so that a missing column is detected explicitly when
/// converting into a [`PassageRecord`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// One retrieved snippet of source text plus its metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassageRecord {
    pub chunk: String,
    pub file_url: String,
    pub category: String,
}

impl PassageRecord {
    /// Validate a raw result row.
    ///
    /// `CHUNK` and `CATEGORY` are required string columns; a row lacking
    /// either fails with [`SearchError::MissingField`]. `FILE_URL` is
    /// nominal and defaults to an empty string.
    pub fn from_row(index: usize, row: &Map<String, Value>) -> Result<Self, SearchError> {
        let required = |column: &str| -> Result<String, SearchError> {
            row.get(column)
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| SearchError::MissingField {
                    field: column.to_string(),
                    index,
                })
        };

        Ok(Self {
            chunk: required(CHUNK_COLUMN)?,
            file_url: row
                .get(FILE_URL_COLUMN)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            category: required(CATEGORY_COLUMN)?,
        })
    }
}

/// Errors from document-search operations.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    #[error("search query is empty")]
    EmptyQuery,

    #[error("search service not configured: {0}")]
    NotConfigured(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("search provider error: {message}")]
    Provider { message: String },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("search result {index} is missing field '{field}'")]
    MissingField { field: String, index: usize },
}
