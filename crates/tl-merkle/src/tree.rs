//! # Append-Only Merkle Tree
//!
//! In-memory RFC 6962 tree that keeps every complete subtree hash, so roots,
//! audit paths and consistency paths for any historical size are computed
//! in `O(log n)` hash operations without rehashing leaves.
//!
//! ## Layout
//!
//! `levels[0]` holds the leaf hashes in append order. `levels[k][i]` is the
//! hash of the complete subtree over leaves `[i * 2^k, (i + 1) * 2^k)`.
//! A level only ever holds complete subtrees, so `levels[k].len()` is
//! `leaf_count >> k`.

use shared_types::Hash;

use crate::hasher::{empty_root, hash_children, split_point};

/// Append-only Merkle tree over leaf hashes.
#[derive(Debug, Clone, Default)]
pub struct MerkleTree {
    levels: Vec<Vec<Hash>>,
}

impl MerkleTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self {
            levels: vec![Vec::new()],
        }
    }

    /// Number of leaves appended so far.
    pub fn leaf_count(&self) -> u64 {
        self.levels.first().map_or(0, |leaves| leaves.len() as u64)
    }

    /// Whether no leaf has been appended.
    pub fn is_empty(&self) -> bool {
        self.leaf_count() == 0
    }

    /// Append a leaf hash and return its 0-based position.
    pub fn add_leaf_hash(&mut self, leaf_hash: Hash) -> u64 {
        if self.levels.is_empty() {
            self.levels.push(Vec::new());
        }
        let position = self.leaf_count();
        self.levels[0].push(leaf_hash);

        // Close every subtree completed by this leaf.
        let mut level = 0;
        while self.levels[level].len() % 2 == 0 {
            let len = self.levels[level].len();
            let parent = hash_children(&self.levels[level][len - 2], &self.levels[level][len - 1]);
            if self.levels.len() == level + 1 {
                self.levels.push(Vec::new());
            }
            self.levels[level + 1].push(parent);
            level += 1;
        }

        position
    }

    /// Hash of the leaf at `position`.
    pub fn leaf_hash(&self, position: u64) -> Option<Hash> {
        let index = usize::try_from(position).ok()?;
        self.levels.first()?.get(index).copied()
    }

    /// Root over all leaves.
    pub fn current_root(&self) -> Hash {
        self.subtree_root(0, self.leaf_count())
    }

    /// Root the tree had when it held `size` leaves.
    pub fn root_at_snapshot(&self, size: u64) -> Option<Hash> {
        if size > self.leaf_count() {
            return None;
        }
        Some(self.subtree_root(0, size))
    }

    /// Audit path for the leaf at `position` in the tree of `size` leaves,
    /// ordered from the leaf's sibling up to the root's child.
    ///
    /// Returns `None` unless `position < size <= leaf_count`.
    pub fn path_to_root_at_snapshot(&self, position: u64, size: u64) -> Option<Vec<Hash>> {
        if position >= size || size > self.leaf_count() {
            return None;
        }
        let mut path = Vec::new();
        self.collect_path(position, 0, size, &mut path);
        Some(path)
    }

    /// Consistency path proving the tree of `second` leaves extends the tree
    /// of `first` leaves.
    ///
    /// Empty when `first == 0` or `first == second`. Returns `None` unless
    /// `first <= second <= leaf_count`.
    pub fn snapshot_consistency(&self, first: u64, second: u64) -> Option<Vec<Hash>> {
        if first > second || second > self.leaf_count() {
            return None;
        }
        let mut path = Vec::new();
        if first > 0 && first < second {
            self.collect_subproof(first, 0, second, true, &mut path);
        }
        Some(path)
    }

    /// Right border of the current tree, usable to compute future roots
    /// without touching the tree.
    pub fn frontier(&self) -> Frontier {
        let size = self.leaf_count();
        let mut peaks = Vec::new();
        let mut offset = 0u64;
        for level in (0..self.levels.len()).rev() {
            let width = 1u64 << level;
            if size & width != 0 {
                peaks.push((self.levels[level][(offset >> level) as usize], width));
                offset += width;
            }
        }
        Frontier { peaks, size }
    }

    /// MTH over leaves `[start, start + size)`.
    fn subtree_root(&self, start: u64, size: u64) -> Hash {
        match size {
            0 => empty_root(),
            _ if size.is_power_of_two() && start % size == 0 => {
                let level = size.trailing_zeros() as usize;
                self.levels[level][(start >> level) as usize]
            }
            _ => {
                let k = split_point(size);
                let left = self.subtree_root(start, k);
                let right = self.subtree_root(start + k, size - k);
                hash_children(&left, &right)
            }
        }
    }

    fn collect_path(&self, position: u64, start: u64, size: u64, path: &mut Vec<Hash>) {
        if size <= 1 {
            return;
        }
        let k = split_point(size);
        if position < k {
            self.collect_path(position, start, k, path);
            path.push(self.subtree_root(start + k, size - k));
        } else {
            self.collect_path(position - k, start + k, size - k, path);
            path.push(self.subtree_root(start, k));
        }
    }

    fn collect_subproof(
        &self,
        first: u64,
        start: u64,
        size: u64,
        whole_subtree: bool,
        path: &mut Vec<Hash>,
    ) {
        if first == size {
            if !whole_subtree {
                path.push(self.subtree_root(start, size));
            }
            return;
        }
        let k = split_point(size);
        if first <= k {
            self.collect_subproof(first, start, k, whole_subtree, path);
            path.push(self.subtree_root(start + k, size - k));
        } else {
            self.collect_subproof(first - k, start + k, size - k, false, path);
            path.push(self.subtree_root(start, k));
        }
    }
}

/// Complete-subtree peaks on the right border of a tree, largest first.
#[derive(Debug, Clone, Default)]
pub struct Frontier {
    peaks: Vec<(Hash, u64)>,
    size: u64,
}

impl Frontier {
    /// Number of leaves covered.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Extend the frontier by one leaf hash.
    pub fn push(&mut self, leaf_hash: Hash) {
        self.peaks.push((leaf_hash, 1));
        self.size += 1;
        while self.peaks.len() >= 2 {
            let (right, right_width) = self.peaks[self.peaks.len() - 1];
            let (left, left_width) = self.peaks[self.peaks.len() - 2];
            if left_width != right_width {
                break;
            }
            self.peaks.truncate(self.peaks.len() - 2);
            self.peaks.push((hash_children(&left, &right), left_width * 2));
        }
    }

    /// Root over the covered leaves.
    pub fn root(&self) -> Hash {
        let mut peaks = self.peaks.iter().rev();
        let Some(&(mut root, _)) = peaks.next() else {
            return empty_root();
        };
        for (peak, _) in peaks {
            root = hash_children(peak, &root);
        }
        root
    }
}
