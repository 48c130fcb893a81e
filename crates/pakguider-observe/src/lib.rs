//! Observability setup for PakGuider.

pub mod genai_attrs;
pub mod tracing_setup;

pub use tracing_setup::{filter_for_verbosity, init_tracing, shutdown_tracing};
