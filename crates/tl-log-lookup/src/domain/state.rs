//! # Lookup State
//!
//! The tree, the leaf index and the published tree head, owned together.
//!
//! All three change in one step under one lock, so a reader always sees a
//! triple where the index covers exactly the tree's leaves and the tree
//! has exactly the published size.

use serde::{Deserialize, Serialize};
use shared_types::{Hash, SignedTreeHead};
use tl_merkle::MerkleTree;

use super::errors::LookupError;
use super::leaf_index::LeafIndex;
use super::proofs::{ConsistencyProof, SignedAuditProof, SizedAuditProof};

/// Mutable engine state.
#[derive(Debug, Default)]
pub struct LookupState {
    tree: MerkleTree,
    index: LeafIndex,
    published: Option<SignedTreeHead>,
}

impl LookupState {
    /// Empty tree, empty index, no tree head.
    pub fn new() -> Self {
        Self {
            tree: MerkleTree::new(),
            index: LeafIndex::new(),
            published: None,
        }
    }

    /// Number of leaves in the tree.
    pub fn tree_size(&self) -> u64 {
        self.tree.leaf_count()
    }

    /// Read access to the tree.
    pub fn tree(&self) -> &MerkleTree {
        &self.tree
    }

    /// Currently published tree head.
    pub fn published(&self) -> Option<&SignedTreeHead> {
        self.published.as_ref()
    }

    /// Append verified leaf hashes and publish `sth` in one step.
    ///
    /// The caller has already checked that the hashes extend the tree to
    /// `sth.tree_size` with root `sth.sha256_root_hash`.
    pub fn commit(&mut self, leaf_hashes: &[Hash], sth: SignedTreeHead) {
        for leaf_hash in leaf_hashes {
            let position = self.tree.add_leaf_hash(*leaf_hash);
            self.index.insert(*leaf_hash, position);
        }
        debug_assert_eq!(self.tree.leaf_count(), sth.tree_size);
        debug_assert_eq!(self.index.covered(), self.tree.leaf_count());
        self.published = Some(sth);
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Position of a leaf hash.
    pub fn locate(&self, leaf_hash: &Hash) -> Option<u64> {
        self.index.locate(leaf_hash)
    }

    /// Audit path for `position` in the tree of `tree_size` leaves.
    pub fn audit_proof(&self, position: u64, tree_size: u64) -> Option<SizedAuditProof> {
        let path = self.tree.path_to_root_at_snapshot(position, tree_size)?;
        Some(SizedAuditProof {
            leaf_index: position,
            tree_size,
            path,
        })
    }

    /// Audit path for a leaf hash against the published tree head.
    pub fn signed_audit_proof(&self, leaf_hash: &Hash) -> Option<SignedAuditProof> {
        let sth = self.published.as_ref()?;
        let position = self.locate(leaf_hash)?;
        let sized = self.audit_proof(position, sth.tree_size)?;
        Some(SignedAuditProof::from_sized(sized, sth))
    }

    /// Consistency path between two sizes.
    pub fn consistency_proof(
        &self,
        first: u64,
        second: u64,
    ) -> Result<Option<ConsistencyProof>, LookupError> {
        if first > second {
            return Err(LookupError::InvalidRange { first, second });
        }
        Ok(self
            .tree
            .snapshot_consistency(first, second)
            .map(|path| ConsistencyProof {
                first,
                second,
                path,
            }))
    }

    /// Counters describing the state.
    pub fn stats(&self) -> StateStats {
        StateStats {
            tree_size: self.tree.leaf_count(),
            distinct_leaves: self.index.len() as u64,
            published_size: self.published.as_ref().map(|sth| sth.tree_size),
            published_timestamp: self.published.as_ref().map(|sth| sth.timestamp),
        }
    }
}

/// Point-in-time description of the state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateStats {
    /// Leaves in the tree.
    pub tree_size: u64,
    /// Distinct leaf hashes in the index.
    pub distinct_leaves: u64,
    /// Size of the published tree head.
    pub published_size: Option<u64>,
    /// Timestamp of the published tree head.
    pub published_timestamp: Option<u64>,
}
