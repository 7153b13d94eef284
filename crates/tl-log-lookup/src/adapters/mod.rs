//! # Adapters Module
//!
//! Concrete implementations at the engine's edges: an in-memory store and
//! a JSON query handler.

pub mod api_handler;
pub mod memory_store;

pub use api_handler::{handle_api_query, ApiQueryError, ApiQueryHandler};
pub use memory_store::InMemoryLogStore;
