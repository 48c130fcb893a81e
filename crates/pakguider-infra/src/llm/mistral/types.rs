//! Mistral chat-completions API types.
//!
//! Wire structures for `POST /chat/completions`. These are NOT the generic
//! completion types from pakguider-types -- those are provider-agnostic.

use serde::{Deserialize, Serialize};

/// Request body for the chat-completions endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct MistralRequest {
    pub model: String,
    pub messages: Vec<MistralMessage>,
    pub max_tokens: u32,
    pub safe_prompt: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct MistralMessage {
    pub role: String,
    pub content: String,
}

/// Non-streaming response body.
#[derive(Debug, Clone, Deserialize)]
pub struct MistralResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub choices: Vec<MistralChoice>,
    #[serde(default)]
    pub usage: Option<MistralUsage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MistralChoice {
    #[serde(default)]
    pub index: u32,
    pub message: MistralResponseMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MistralResponseMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MistralUsage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}
