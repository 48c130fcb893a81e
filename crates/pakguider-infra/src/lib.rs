//! Infrastructure layer for PakGuider.
//!
//! Contains implementations of the provider traits defined in
//! `pakguider-core` (Mistral chat completions, Snowflake Cortex Search),
//! the layered configuration loader, and the startup connectivity probe.

pub mod config;
pub mod llm;
pub mod probe;
pub mod search;
