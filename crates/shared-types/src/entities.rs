//! # Log Entities
//!
//! Types exchanged between the log store, the lookup engine and its callers.
//!
//! ## Clusters
//!
//! - **Leaves**: `LeafRecord`, `Hash`
//! - **Tree heads**: `SignedTreeHead`, `DigitallySigned`, `Succession`

use serde::{Deserialize, Serialize};

use crate::errors::TreeHeadError;

// =============================================================================
// CLUSTER A: LEAVES
// =============================================================================

/// A 32-byte SHA-256 digest.
pub type Hash = [u8; 32];

/// Protocol version carried by tree heads and legacy proofs.
pub const LOG_FORMAT_VERSION: u8 = 1;

/// A logged entry as stored by the authoritative append log.
///
/// The lookup engine derives the leaf hash from `merkle_leaf` once and only
/// keeps the hash afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct LeafRecord {
    /// 0-based position the store assigned to this leaf.
    pub sequence_number: u64,
    /// Milliseconds since the epoch at which the leaf was accepted.
    pub timestamp: u64,
    /// Serialized leaf input hashed into the tree.
    pub merkle_leaf: Vec<u8>,
}

impl LeafRecord {
    /// Create a record for `merkle_leaf` at `sequence_number`.
    pub fn new(sequence_number: u64, timestamp: u64, merkle_leaf: impl Into<Vec<u8>>) -> Self {
        Self {
            sequence_number,
            timestamp,
            merkle_leaf: merkle_leaf.into(),
        }
    }
}

// =============================================================================
// CLUSTER B: TREE HEADS
// =============================================================================

/// Hash algorithm used when producing a signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum HashAlgorithm {
    /// No hashing.
    None,
    /// SHA-256.
    #[default]
    Sha256,
}

/// Signature scheme of a `DigitallySigned` blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum SignatureAlgorithm {
    /// Unsigned.
    Anonymous,
    /// RSA PKCS#1 v1.5.
    Rsa,
    /// ECDSA over P-256.
    #[default]
    Ecdsa,
}

/// An opaque signature with its algorithm identifiers.
///
/// Signatures are carried through untouched; producing or checking them is
/// the job of the signer and of clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DigitallySigned {
    /// Digest algorithm.
    pub hash_algorithm: HashAlgorithm,
    /// Signature algorithm.
    pub signature_algorithm: SignatureAlgorithm,
    /// Raw signature bytes.
    pub signature: Vec<u8>,
}

/// A published, attested snapshot of the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SignedTreeHead {
    /// Format version.
    pub version: u8,
    /// SHA-256 of the log's public key.
    pub log_id: Hash,
    /// Number of leaves covered by this head.
    pub tree_size: u64,
    /// Milliseconds since the epoch at which the head was signed.
    pub timestamp: u64,
    /// Merkle tree hash of the first `tree_size` leaves.
    pub sha256_root_hash: Hash,
    /// Signature over the head.
    pub signature: DigitallySigned,
}

/// How a candidate tree head relates to the currently published one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Succession {
    /// Byte-for-byte the same head.
    Identical,
    /// Signed earlier than the published head; superseded.
    Older,
    /// Signed later with the same or a larger tree size.
    Newer,
}

impl SignedTreeHead {
    /// Classify `self` as a successor of `published`.
    ///
    /// Heads are ordered by timestamp and a later head may never cover fewer
    /// leaves than an earlier one. Two different heads with the same
    /// timestamp cannot both be genuine.
    pub fn succession(&self, published: &SignedTreeHead) -> Result<Succession, TreeHeadError> {
        if self == published {
            return Ok(Succession::Identical);
        }

        if self.timestamp == published.timestamp {
            return Err(TreeHeadError::ConflictingHeads {
                timestamp: self.timestamp,
            });
        }

        let candidate_is_newer = self.timestamp > published.timestamp;
        let (older, newer) = if candidate_is_newer {
            (published, self)
        } else {
            (self, published)
        };

        if newer.tree_size < older.tree_size {
            return Err(TreeHeadError::SizeRegression {
                older_size: older.tree_size,
                newer_size: newer.tree_size,
            });
        }

        Ok(if candidate_is_newer {
            Succession::Newer
        } else {
            Succession::Older
        })
    }
}
