//! # Tree Hashing
//!
//! RFC 6962 domain-separated SHA-256:
//! - leaf: `SHA-256(0x00 || data)`
//! - node: `SHA-256(0x01 || left || right)`
//! - empty tree: `SHA-256("")`

use sha2::{Digest, Sha256};
use shared_types::Hash;

/// Prefix for leaf inputs.
pub const LEAF_HASH_PREFIX: u8 = 0x00;

/// Prefix for interior nodes.
pub const NODE_HASH_PREFIX: u8 = 0x01;

/// Hash a leaf input.
pub fn hash_leaf(data: &[u8]) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update([LEAF_HASH_PREFIX]);
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash two child nodes into their parent.
pub fn hash_children(left: &Hash, right: &Hash) -> Hash {
    let mut hasher = Sha256::new();
    hasher.update([NODE_HASH_PREFIX]);
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Root hash of the tree with no leaves.
pub fn empty_root() -> Hash {
    Sha256::digest([]).into()
}

/// Largest power of two strictly below `n`. Requires `n > 1`.
pub(crate) fn split_point(n: u64) -> u64 {
    debug_assert!(n > 1);
    1 << (63 - (n - 1).leading_zeros())
}
