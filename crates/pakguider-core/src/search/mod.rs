//! Document-search abstractions.
//!
//! - `SearchProvider`: RPITIT trait for concrete search backends
//! - `BoxSearchProvider`: Object-safe wrapper for dynamic dispatch
//! - `DocumentSearchClient`: passage lookup on top of any provider

pub mod box_provider;
pub mod client;
pub mod provider;
