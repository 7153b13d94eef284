//! # In-Memory Log Store
//!
//! A [`ReadOnlyLogStore`] backed by a vector, with a write side for tests
//! and demos: append leaves, publish tree heads, and inject faults.

use async_trait::async_trait;
use parking_lot::RwLock;
use shared_types::{
    DigitallySigned, Hash, LeafRecord, SignedTreeHead, SignatureAlgorithm, LOG_FORMAT_VERSION,
};
use tl_merkle::{hash_leaf, MerkleTree};
use tokio::sync::broadcast;

use crate::ports::{ReadOnlyLogStore, StoreError};

/// Default capacity of the tree head notification channel.
pub const DEFAULT_NOTIFY_CAPACITY: usize = 64;

#[derive(Debug, Default)]
struct StoreInner {
    leaves: Vec<LeafRecord>,
    tree: MerkleTree,
    latest: Option<SignedTreeHead>,
    /// Logical clock for leaf and tree head timestamps.
    clock: u64,
    /// Reads at or beyond this position fail.
    fail_from: Option<u64>,
    /// Size and tree head reads fail.
    metadata_down: bool,
}

impl StoreInner {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn check_readable(&self, position: u64) -> Result<(), StoreError> {
        match self.fail_from {
            Some(limit) if position >= limit => Err(StoreError::Unavailable(format!(
                "injected read failure at position {position}"
            ))),
            _ => Ok(()),
        }
    }

    fn check_metadata(&self) -> Result<(), StoreError> {
        if self.metadata_down {
            return Err(StoreError::Unavailable(
                "injected size and tree head read failure".to_string(),
            ));
        }
        Ok(())
    }
}

/// Vector-backed append log with tree head publication.
pub struct InMemoryLogStore {
    log_id: Hash,
    inner: RwLock<StoreInner>,
    tree_heads: broadcast::Sender<SignedTreeHead>,
}

impl Default for InMemoryLogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryLogStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::with_notify_capacity(DEFAULT_NOTIFY_CAPACITY)
    }

    /// Create an empty store whose notification channel keeps `capacity`
    /// unread tree heads per subscriber.
    pub fn with_notify_capacity(capacity: usize) -> Self {
        let (tree_heads, _) = broadcast::channel(capacity.max(1));
        Self {
            log_id: hash_leaf(b"in-memory log"),
            inner: RwLock::new(StoreInner {
                tree: MerkleTree::new(),
                ..StoreInner::default()
            }),
            tree_heads,
        }
    }

    /// Sequence a leaf and return its position.
    pub fn append(&self, merkle_leaf: Vec<u8>) -> u64 {
        let mut inner = self.inner.write();
        let timestamp = inner.tick();
        let position = inner.leaves.len() as u64;
        inner.tree.add_leaf_hash(hash_leaf(&merkle_leaf));
        inner
            .leaves
            .push(LeafRecord::new(position, timestamp, merkle_leaf));
        position
    }

    /// Sign a tree head over all sequenced leaves, keep it as the latest
    /// and notify subscribers.
    pub fn publish_tree_head(&self) -> SignedTreeHead {
        let sth = {
            let mut inner = self.inner.write();
            let tree_size = inner.tree.leaf_count();
            let root = inner.tree.current_root();
            let sth = self.build_tree_head(&mut inner, tree_size, root);
            inner.latest = Some(sth.clone());
            sth
        };
        // No subscribers is fine.
        let _ = self.tree_heads.send(sth.clone());
        sth
    }

    /// Sign an arbitrary tree head without storing or announcing it.
    pub fn sign_tree_head(&self, tree_size: u64, root: Hash) -> SignedTreeHead {
        let mut inner = self.inner.write();
        self.build_tree_head(&mut inner, tree_size, root)
    }

    /// Announce a tree head to subscribers as if the store had published it.
    pub fn announce(&self, sth: SignedTreeHead) {
        let _ = self.tree_heads.send(sth);
    }

    /// Latest published tree head.
    pub fn current_tree_head(&self) -> Option<SignedTreeHead> {
        self.inner.read().latest.clone()
    }

    /// Root over the first `tree_size` sequenced leaves.
    pub fn root_at(&self, tree_size: u64) -> Option<Hash> {
        self.inner.read().tree.root_at_snapshot(tree_size)
    }

    /// Stored record at `position`.
    pub fn leaf_record(&self, position: u64) -> Option<LeafRecord> {
        self.inner.read().leaves.get(position as usize).cloned()
    }

    /// Make reads at or beyond `position` fail; `None` clears the fault.
    pub fn fail_reads_from(&self, position: Option<u64>) {
        self.inner.write().fail_from = position;
    }

    /// Make size and latest tree head reads fail while `down` is set.
    pub fn fail_metadata_reads(&self, down: bool) {
        self.inner.write().metadata_down = down;
    }

    /// Replace the stored record at `position` without touching the tree
    /// that signs tree heads.
    pub fn overwrite_leaf(&self, position: u64, record: LeafRecord) {
        let mut inner = self.inner.write();
        if let Some(slot) = inner.leaves.get_mut(position as usize) {
            *slot = record;
        }
    }

    fn build_tree_head(&self, inner: &mut StoreInner, tree_size: u64, root: Hash) -> SignedTreeHead {
        let timestamp = inner.tick();
        SignedTreeHead {
            version: LOG_FORMAT_VERSION,
            log_id: self.log_id,
            tree_size,
            timestamp,
            sha256_root_hash: root,
            signature: DigitallySigned {
                signature_algorithm: SignatureAlgorithm::Anonymous,
                ..DigitallySigned::default()
            },
        }
    }
}

#[async_trait]
impl ReadOnlyLogStore for InMemoryLogStore {
    async fn get_leaf(&self, position: u64) -> Result<LeafRecord, StoreError> {
        let inner = self.inner.read();
        inner.check_readable(position)?;
        inner
            .leaves
            .get(position as usize)
            .cloned()
            .ok_or(StoreError::LeafNotFound(position))
    }

    async fn get_leaves(&self, start: u64, count: u64) -> Result<Vec<LeafRecord>, StoreError> {
        let inner = self.inner.read();
        let end = start.saturating_add(count);
        if end > inner.leaves.len() as u64 {
            return Err(StoreError::LeafNotFound(inner.leaves.len() as u64));
        }
        if let Some(limit) = inner.fail_from {
            if end > limit {
                inner.check_readable(start.max(limit))?;
            }
        }
        Ok(inner.leaves[start as usize..end as usize].to_vec())
    }

    async fn get_size(&self) -> Result<u64, StoreError> {
        let inner = self.inner.read();
        inner.check_metadata()?;
        Ok(inner.leaves.len() as u64)
    }

    async fn latest_sth(&self) -> Result<Option<SignedTreeHead>, StoreError> {
        let inner = self.inner.read();
        inner.check_metadata()?;
        Ok(inner.latest.clone())
    }

    fn subscribe_tree_heads(&self) -> broadcast::Receiver<SignedTreeHead> {
        self.tree_heads.subscribe()
    }
}
