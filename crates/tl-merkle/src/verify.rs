//! # Proof Verification
//!
//! Client-side checks for audit and consistency paths produced by
//! [`MerkleTree`](crate::MerkleTree). Both walk the path bottom-up using the
//! binary representation of the leaf index and the last index of the tree.

use shared_types::Hash;

use crate::error::{MerkleError, MerkleResult};
use crate::hasher::hash_children;

/// Recompute the root implied by an audit path.
pub fn root_from_audit_path(
    leaf_hash: &Hash,
    leaf_index: u64,
    tree_size: u64,
    path: &[Hash],
) -> MerkleResult<Hash> {
    if leaf_index >= tree_size {
        return Err(MerkleError::IndexOutOfRange {
            index: leaf_index,
            tree_size,
        });
    }

    let mut node = leaf_index;
    let mut last = tree_size - 1;
    let mut root = *leaf_hash;

    for sibling in path {
        if last == 0 {
            return Err(MerkleError::InvalidProofLength(format!(
                "audit path for leaf {leaf_index} in tree of {tree_size} is too long"
            )));
        }
        if node & 1 == 1 || node == last {
            root = hash_children(sibling, &root);
            // Skip levels where this node has no right sibling.
            while node & 1 == 0 && node != 0 {
                node >>= 1;
                last >>= 1;
            }
        } else {
            root = hash_children(&root, sibling);
        }
        node >>= 1;
        last >>= 1;
    }

    if last != 0 {
        return Err(MerkleError::InvalidProofLength(format!(
            "audit path for leaf {leaf_index} in tree of {tree_size} is too short"
        )));
    }
    Ok(root)
}

/// Check that `path` proves `leaf_hash` sits at `leaf_index` under `root`.
pub fn verify_audit_path(
    leaf_hash: &Hash,
    leaf_index: u64,
    tree_size: u64,
    path: &[Hash],
    root: &Hash,
) -> MerkleResult<()> {
    let computed = root_from_audit_path(leaf_hash, leaf_index, tree_size, path)?;
    check_root(root, &computed)
}

/// Check that `path` proves the tree with root `second_root` over `second`
/// leaves extends the tree with root `first_root` over `first` leaves.
pub fn verify_consistency(
    first: u64,
    second: u64,
    first_root: &Hash,
    second_root: &Hash,
    path: &[Hash],
) -> MerkleResult<()> {
    if first > second {
        return Err(MerkleError::InvalidSizes { first, second });
    }
    if first == second {
        if !path.is_empty() {
            return Err(MerkleError::InvalidProofLength(
                "consistency path between equal sizes must be empty".to_string(),
            ));
        }
        return check_root(first_root, second_root);
    }
    if first == 0 {
        if !path.is_empty() {
            return Err(MerkleError::InvalidProofLength(
                "consistency path from the empty tree must be empty".to_string(),
            ));
        }
        return Ok(());
    }
    if path.is_empty() {
        return Err(MerkleError::InvalidProofLength(
            "consistency path is empty".to_string(),
        ));
    }

    // A power-of-two first tree is a complete subtree of the second, and
    // its root is left out of the path.
    let mut nodes: Vec<Hash> = Vec::with_capacity(path.len() + 1);
    if first.is_power_of_two() {
        nodes.push(*first_root);
    }
    nodes.extend_from_slice(path);

    let mut node = first - 1;
    let mut last = second - 1;
    while node & 1 == 1 {
        node >>= 1;
        last >>= 1;
    }

    let mut old_hash = nodes[0];
    let mut new_hash = nodes[0];
    for sibling in &nodes[1..] {
        if last == 0 {
            return Err(MerkleError::InvalidProofLength(
                "consistency path is too long".to_string(),
            ));
        }
        if node & 1 == 1 || node == last {
            old_hash = hash_children(sibling, &old_hash);
            new_hash = hash_children(sibling, &new_hash);
            while node & 1 == 0 && node != 0 {
                node >>= 1;
                last >>= 1;
            }
        } else {
            new_hash = hash_children(&new_hash, sibling);
        }
        node >>= 1;
        last >>= 1;
    }

    if last != 0 {
        return Err(MerkleError::InvalidProofLength(
            "consistency path is too short".to_string(),
        ));
    }
    check_root(first_root, &old_hash)?;
    check_root(second_root, &new_hash)
}

fn check_root(expected: &Hash, computed: &Hash) -> MerkleResult<()> {
    if expected != computed {
        return Err(MerkleError::RootMismatch {
            expected: hex::encode(expected),
            computed: hex::encode(computed),
        });
    }
    Ok(())
}
