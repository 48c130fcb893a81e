//! HTTP layer for the web chat.
//!
//! Axum router serving the single-page UI at `/` and a JSON API at
//! `/api/v1/` using the envelope response format.

pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
