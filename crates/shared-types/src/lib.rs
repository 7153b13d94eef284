//! # Shared Types Crate
//!
//! Entities shared across the transparency log workspace.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `LeafRecord` and `SignedTreeHead` are
//!   defined once and used by the store port, the engine and the tests.
//! - **Opaque Signatures**: signatures travel with tree heads but are never
//!   produced or checked here.

pub mod entities;
pub mod errors;

pub use entities::*;
pub use errors::*;
