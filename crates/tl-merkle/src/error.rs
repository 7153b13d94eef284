//! Error types for proof verification.

use thiserror::Error;

/// Reasons a proof fails to verify.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MerkleError {
    /// Leaf index is not below the tree size.
    #[error("Leaf index {index} out of range for tree size {tree_size}")]
    IndexOutOfRange {
        /// Requested leaf index
        index: u64,
        /// Size of the tree
        tree_size: u64,
    },

    /// Consistency proof requested from a larger tree to a smaller one.
    #[error("Invalid tree sizes: first {first} > second {second}")]
    InvalidSizes {
        /// Older tree size
        first: u64,
        /// Newer tree size
        second: u64,
    },

    /// Proof has the wrong number of hashes for its sizes.
    #[error("Invalid proof length: {0}")]
    InvalidProofLength(String),

    /// Recomputed root does not match the expected root.
    #[error("Root mismatch: expected {expected}, computed {computed}")]
    RootMismatch {
        /// Hex of the root the caller trusts
        expected: String,
        /// Hex of the root rebuilt from the proof
        computed: String,
    },
}

/// Result type for proof verification.
pub type MerkleResult<T> = Result<T, MerkleError>;
