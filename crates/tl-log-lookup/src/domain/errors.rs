//! # Domain Errors
//!
//! Error types for the lookup engine.
//!
//! Missing data is not an error here: queries that have no answer yet
//! return `None`. Errors are reserved for refresh failures and for callers
//! that pass an impossible range.

use shared_types::{Hash, TreeHeadError};
use thiserror::Error;

use crate::ports::StoreError;

/// Why a refresh from a candidate tree head was abandoned.
///
/// Every variant leaves the previously published state untouched.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The store failed to return a leaf. Retried on the next notification.
    #[error("Store fetch failed at position {position}: {source}")]
    StoreFetch {
        /// First position of the failed read
        position: u64,
        /// Underlying store error
        #[source]
        source: StoreError,
    },

    /// The store failed outside of leaf reads (size, tree head).
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Leaves fetched from the store do not hash to the attested root.
    #[error(
        "Root mismatch at tree size {tree_size}: tree head declares {}, leaves hash to {}",
        hex::encode(.declared),
        hex::encode(.computed)
    )]
    RootMismatch {
        /// Size of the candidate tree head
        tree_size: u64,
        /// Root signed into the tree head
        declared: Hash,
        /// Root computed from the store's leaves
        computed: Hash,
    },

    /// The store returned a leaf for a different position than requested.
    #[error("Leaf out of sequence: expected position {expected}, store returned {actual}")]
    LeafOutOfSequence {
        /// Position requested
        expected: u64,
        /// Sequence number on the record
        actual: u64,
    },

    /// A leaf claims to be newer than the tree head that covers it.
    #[error("Leaf {position} timestamp {leaf_timestamp} is after tree head timestamp {sth_timestamp}")]
    LeafAfterTreeHead {
        /// Position of the offending leaf
        position: u64,
        /// Timestamp on the leaf
        leaf_timestamp: u64,
        /// Timestamp on the candidate tree head
        sth_timestamp: u64,
    },

    /// The store returned a different number of leaves than requested.
    #[error("Store returned {returned} leaves from position {position}, expected {expected}")]
    LeafCountMismatch {
        /// First position requested
        position: u64,
        /// Leaves requested
        expected: u64,
        /// Leaves returned
        returned: u64,
    },

    /// The candidate cannot follow the published tree head.
    #[error("Inconsistent tree head: {0}")]
    InconsistentTreeHead(#[from] TreeHeadError),
}

impl SyncError {
    /// Whether the store and the attested tree heads disagree.
    ///
    /// These are operational alarms. Everything else is transient.
    pub fn is_integrity_fault(&self) -> bool {
        matches!(
            self,
            SyncError::RootMismatch { .. }
                | SyncError::LeafOutOfSequence { .. }
                | SyncError::LeafAfterTreeHead { .. }
                | SyncError::InconsistentTreeHead(_)
        )
    }

    /// Short label used for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            SyncError::StoreFetch { .. } => "store_fetch",
            SyncError::Store(_) => "store",
            SyncError::RootMismatch { .. } => "root_mismatch",
            SyncError::LeafOutOfSequence { .. } => "leaf_out_of_sequence",
            SyncError::LeafAfterTreeHead { .. } => "leaf_after_tree_head",
            SyncError::LeafCountMismatch { .. } => "leaf_count_mismatch",
            SyncError::InconsistentTreeHead(_) => "inconsistent_tree_head",
        }
    }
}

/// Caller errors on query operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// A consistency proof was requested from a larger size to a smaller one.
    #[error("Invalid range: first {first} > second {second}")]
    InvalidRange {
        /// Older tree size
        first: u64,
        /// Newer tree size
        second: u64,
    },
}

/// Result type for refresh operations.
pub type SyncResult<T> = Result<T, SyncError>;
