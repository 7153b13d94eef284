//! # Domain Module
//!
//! Core domain types for the lookup engine.

pub mod errors;
pub mod leaf_index;
pub mod proofs;
pub mod state;

pub use errors::*;
pub use leaf_index::*;
pub use proofs::*;
pub use state::*;
