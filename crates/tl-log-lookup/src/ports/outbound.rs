//! # Outbound Ports
//!
//! What the engine needs from the authoritative log store.

use async_trait::async_trait;
use shared_types::{LeafRecord, SignedTreeHead};
use thiserror::Error;
use tokio::sync::broadcast;

/// Errors reported by a log store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No leaf is stored at this position.
    #[error("No leaf at position {0}")]
    LeafNotFound(u64),

    /// The store could not be read.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Read-only view of the append log.
#[async_trait]
pub trait ReadOnlyLogStore: Send + Sync {
    /// Leaf at `position`.
    async fn get_leaf(&self, position: u64) -> Result<LeafRecord, StoreError>;

    /// Up to `count` consecutive leaves starting at `start`.
    async fn get_leaves(&self, start: u64, count: u64) -> Result<Vec<LeafRecord>, StoreError> {
        let mut leaves = Vec::new();
        for position in start..start.saturating_add(count) {
            leaves.push(self.get_leaf(position).await?);
        }
        Ok(leaves)
    }

    /// Number of leaves sequenced by the store.
    async fn get_size(&self) -> Result<u64, StoreError>;

    /// Most recent tree head the store has published, if any.
    async fn latest_sth(&self) -> Result<Option<SignedTreeHead>, StoreError>;

    /// Stream of tree heads as the store publishes them.
    fn subscribe_tree_heads(&self) -> broadcast::Receiver<SignedTreeHead>;
}
