//! # Leaf Index
//!
//! Maps a leaf hash to the position it was first appended at.
//!
//! The index is rebuilt by replaying the log on startup and is never
//! persisted. Keys are full 32-byte hashes.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use shared_types::Hash;

/// Leaf hash to position map, grown in strict append order.
#[derive(Debug, Clone, Default)]
pub struct LeafIndex {
    positions: HashMap<Hash, u64>,
    covered: u64,
}

impl LeafIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Position of the first leaf with this hash.
    pub fn locate(&self, leaf_hash: &Hash) -> Option<u64> {
        self.positions.get(leaf_hash).copied()
    }

    /// Record the leaf appended at `position`.
    ///
    /// `position` must be the next slot (`covered()`); anything else is
    /// refused and returns `false`. A hash already present keeps its
    /// earlier position. Returns whether a new entry was created.
    pub fn insert(&mut self, leaf_hash: Hash, position: u64) -> bool {
        if position != self.covered {
            return false;
        }
        self.covered += 1;
        match self.positions.entry(leaf_hash) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(position);
                true
            }
        }
    }

    /// Number of tree positions replayed into the index.
    pub fn covered(&self) -> u64 {
        self.covered
    }

    /// Number of distinct leaf hashes.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether nothing has been indexed.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
