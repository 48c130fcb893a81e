//! Provider ports and pure logic for PakGuider.
//!
//! This crate defines the traits the infrastructure layer implements
//! (`LlmProvider`, `SearchProvider`) and the query-augmentation pipeline
//! built on top of them. It depends on `pakguider-types` and on
//! `pakguider-observe` for span attribute names, never on `pakguider-infra`
//! or any HTTP crate.

pub mod chat;
pub mod llm;
pub mod prompt;
pub mod search;
