//! Snowflake Cortex Search provider.

pub mod client;
pub mod types;

pub use client::{CortexAuth, CortexSearchProvider};
