//! # Inbound Ports
//!
//! Query API served to the RPC layer.
//!
//! Every query runs against one consistent snapshot of the engine state.
//! Positions and sizes the engine has not reached yet yield `None`.

use shared_types::{Hash, LeafRecord, SignedTreeHead};

use crate::domain::{ConsistencyProof, LookupError, SignedAuditProof, SizedAuditProof, StateStats};

/// Proof query façade.
pub trait LogLookupApi: Send + Sync {
    /// Position of the leaf with this hash.
    fn get_index(&self, leaf_hash: &Hash) -> Option<u64>;

    /// Audit proof for a leaf hash against the currently published tree head.
    ///
    /// Replicas at different sizes return different proofs. Use
    /// [`audit_proof_by_hash_at`](Self::audit_proof_by_hash_at) for a
    /// reproducible answer.
    fn audit_proof_by_hash(&self, leaf_hash: &Hash) -> Option<SignedAuditProof>;

    /// Audit proof for `position` in the tree of `tree_size` leaves.
    ///
    /// `None` unless `position < tree_size <= current size`.
    fn audit_proof(&self, position: u64, tree_size: u64) -> Option<SizedAuditProof>;

    /// Audit proof for a leaf hash in the tree of `tree_size` leaves.
    fn audit_proof_by_hash_at(&self, leaf_hash: &Hash, tree_size: u64) -> Option<SizedAuditProof>;

    /// Consistency proof between two sizes.
    ///
    /// `Err` when `first > second`, `Ok(None)` when `second` is beyond the
    /// current size.
    fn consistency_proof(
        &self,
        first: u64,
        second: u64,
    ) -> Result<Option<ConsistencyProof>, LookupError>;

    /// Currently published tree head.
    fn get_sth(&self) -> Option<SignedTreeHead>;

    /// Leaf hash of a store record. Does not read engine state.
    fn leaf_hash(&self, record: &LeafRecord) -> Hash {
        tl_merkle::hash_leaf(&record.merkle_leaf)
    }

    /// Number of leaves the engine holds.
    fn tree_size(&self) -> u64;

    /// State and serving counters.
    fn stats(&self) -> LookupStats;
}

/// Snapshot of engine counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct LookupStats {
    /// Tree, index and tree head sizes.
    pub state: StateStats,
    /// Refreshes that published a tree head.
    pub refreshes_applied: u64,
    /// Refreshes abandoned for any reason.
    pub refresh_failures: u64,
    /// Refreshes abandoned because the store and tree heads disagree.
    pub integrity_faults: u64,
    /// Proofs returned to callers.
    pub proofs_served: u64,
}
