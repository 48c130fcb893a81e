//! Chat turn handling: the query pipeline and per-session state.

pub mod pipeline;
pub mod session;
