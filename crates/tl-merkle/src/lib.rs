//! # TL Merkle
//!
//! RFC 6962 Merkle tree driver for the transparency log.
//!
//! ## Purpose
//!
//! - Hash leaves and interior nodes with domain separation
//! - Hold an append-only tree and answer root, audit-path and
//!   consistency-path queries for any size it has reached
//! - Verify those paths on the client side
//!
//! ## Module Structure
//!
//! ```text
//! tl-merkle/
//! ├── hasher.rs    # Leaf/node hashing, empty root
//! ├── tree.rs      # MerkleTree, Frontier
//! ├── verify.rs    # Audit and consistency path verification
//! └── error.rs     # MerkleError
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod hasher;
pub mod tree;
pub mod verify;

// Re-exports
pub use error::{MerkleError, MerkleResult};
pub use hasher::{empty_root, hash_children, hash_leaf};
pub use tree::{Frontier, MerkleTree};
pub use verify::{root_from_audit_path, verify_audit_path, verify_consistency};
