//! # Error Types
//!
//! Errors shared by every crate that reasons about tree heads.

use thiserror::Error;

/// Two tree heads that cannot both have been signed by an honest log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeHeadError {
    /// A later head covers fewer leaves than an earlier one.
    #[error("Tree head size regression: {older_size} leaves then {newer_size}")]
    SizeRegression { older_size: u64, newer_size: u64 },

    /// Distinct heads share a timestamp.
    #[error("Conflicting tree heads signed at timestamp {timestamp}")]
    ConflictingHeads { timestamp: u64 },
}
