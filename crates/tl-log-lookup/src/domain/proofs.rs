//! # Proof Types
//!
//! Audit and consistency proofs handed back by the query façade.

use serde::{Deserialize, Serialize};
use shared_types::{DigitallySigned, Hash, SignedTreeHead};
use tl_merkle::{verify_audit_path, verify_consistency, MerkleResult};

/// Audit proof pinned to an explicit tree size.
///
/// The same `(leaf_index, tree_size)` always yields the same path on every
/// replica that has reached `tree_size`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizedAuditProof {
    /// Position of the proven leaf.
    pub leaf_index: u64,
    /// Tree size the path leads to.
    pub tree_size: u64,
    /// Sibling hashes, leaf level first.
    pub path: Vec<Hash>,
}

impl SizedAuditProof {
    /// Check the proof for `leaf_hash` against the root at `tree_size`.
    pub fn verify(&self, leaf_hash: &Hash, root: &Hash) -> MerkleResult<()> {
        verify_audit_path(leaf_hash, self.leaf_index, self.tree_size, &self.path, root)
    }
}

/// Audit proof against whichever tree head was published when it was built.
///
/// Carries the tree head's metadata so a client can check it against the
/// signature. Two replicas at different sizes answer the same query with
/// different proofs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedAuditProof {
    /// Format version of the tree head.
    pub version: u8,
    /// Log the tree head belongs to.
    pub log_id: Hash,
    /// Size of the published tree head.
    pub tree_size: u64,
    /// Timestamp of the published tree head.
    pub timestamp: u64,
    /// Position of the proven leaf.
    pub leaf_index: u64,
    /// Sibling hashes, leaf level first.
    pub path: Vec<Hash>,
    /// Tree head signature.
    pub tree_head_signature: DigitallySigned,
}

impl SignedAuditProof {
    /// Wrap a sized proof with the tree head it was built against.
    pub fn from_sized(proof: SizedAuditProof, sth: &SignedTreeHead) -> Self {
        Self {
            version: sth.version,
            log_id: sth.log_id,
            tree_size: proof.tree_size,
            timestamp: sth.timestamp,
            leaf_index: proof.leaf_index,
            path: proof.path,
            tree_head_signature: sth.signature.clone(),
        }
    }

    /// Check the proof for `leaf_hash` against `root`.
    pub fn verify(&self, leaf_hash: &Hash, root: &Hash) -> MerkleResult<()> {
        verify_audit_path(leaf_hash, self.leaf_index, self.tree_size, &self.path, root)
    }
}

/// Proof that the tree at `second` leaves extends the tree at `first`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsistencyProof {
    /// Older tree size.
    pub first: u64,
    /// Newer tree size.
    pub second: u64,
    /// Proof hashes, deepest first.
    pub path: Vec<Hash>,
}

impl ConsistencyProof {
    /// Check the proof between two trusted roots.
    pub fn verify(&self, first_root: &Hash, second_root: &Hash) -> MerkleResult<()> {
        verify_consistency(self.first, self.second, first_root, second_root, &self.path)
    }
}
