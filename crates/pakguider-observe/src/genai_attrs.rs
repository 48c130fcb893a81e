//! OpenTelemetry GenAI Semantic Convention attribute names.
//!
//! Usable with `Span::record`. Field names inside `info_span!` must be
//! literals, so spans declare the same dotted names inline and then record
//! late values through these constants.

/// The name of the operation being performed (e.g., "chat").
pub const GEN_AI_OPERATION_NAME: &str = "gen_ai.operation.name";

/// The name of the GenAI provider (e.g., "mistral").
pub const GEN_AI_PROVIDER_NAME: &str = "gen_ai.provider.name";

/// The model ID requested (e.g., "mistral-large-latest").
pub const GEN_AI_REQUEST_MODEL: &str = "gen_ai.request.model";

/// The maximum number of output tokens requested.
pub const GEN_AI_REQUEST_MAX_TOKENS: &str = "gen_ai.request.max_tokens";

pub const GEN_AI_USAGE_INPUT_TOKENS: &str = "gen_ai.usage.input_tokens";

pub const GEN_AI_USAGE_OUTPUT_TOKENS: &str = "gen_ai.usage.output_tokens";

/// The finish reason for the response (e.g., "end_turn", "max_tokens").
pub const GEN_AI_RESPONSE_FINISH_REASONS: &str = "gen_ai.response.finish_reasons";

/// The unique response ID from the provider.
pub const GEN_AI_RESPONSE_ID: &str = "gen_ai.response.id";

// --- Retrieval attributes ---

/// Number of passages the document search returned for the turn.
pub const SEARCH_RESULT_COUNT: &str = "search.result_count";

// --- Values ---

pub const OP_CHAT: &str = "chat";

pub const PROVIDER_MISTRAL: &str = "mistral";

pub const PROVIDER_CORTEX_SEARCH: &str = "cortex_search";
