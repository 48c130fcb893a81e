//! Shared domain types for PakGuider.
//!
//! Messages and completion shapes, search requests and passage records,
//! conversations and session view-models, settings, and their error types.
//!
//! Zero infrastructure dependencies -- only serde, uuid, chrono, thiserror.

pub mod chat;
pub mod config;
pub mod error;
pub mod llm;
pub mod search;
