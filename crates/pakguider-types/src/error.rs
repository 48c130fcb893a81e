use thiserror::Error;

/// Errors related to loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {message}")]
    Read { path: String, message: String },

    #[error("failed to parse config file '{path}': {message}")]
    Parse { path: String, message: String },

    #[error("missing required setting: {0}")]
    Missing(String),

    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}

/// Errors related to chat-session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session not found")]
    NotFound,

    #[error("session has ended")]
    Ended,

    #[error("no question to submit")]
    EmptyQuestion,

    #[error("example index {index} out of range (1-{max})")]
    ExampleOutOfRange { index: usize, max: usize },
}
