//! # Lookup Configuration
//!
//! Configuration for the lookup engine's refresh protocol.

use std::env;

use serde::{Deserialize, Serialize};

/// Default number of leaves requested from the store per read.
pub const DEFAULT_FETCH_BATCH_SIZE: u64 = 1000;

/// Lookup engine configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Maximum leaves requested from the store in one call.
    pub fetch_batch_size: u64,

    /// Reject leaves timestamped after the tree head that covers them.
    pub verify_leaf_timestamps: bool,

    /// Reject leaves whose sequence number differs from their position.
    pub verify_leaf_sequence: bool,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            fetch_batch_size: DEFAULT_FETCH_BATCH_SIZE,
            verify_leaf_timestamps: true,
            verify_leaf_sequence: true,
        }
    }
}

impl LookupConfig {
    /// Create a config for testing (small batches to exercise batching).
    pub fn for_testing() -> Self {
        Self {
            fetch_batch_size: 3,
            ..Self::default()
        }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `TL_FETCH_BATCH_SIZE`: Leaves per store read (default: 1000)
    /// - `TL_VERIFY_LEAF_TIMESTAMPS`: Check leaf timestamps (default: true)
    /// - `TL_VERIFY_LEAF_SEQUENCE`: Check leaf sequence numbers (default: true)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let flag = |key: &str, default: bool| {
            lookup(key)
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(default)
        };

        Self {
            fetch_batch_size: lookup("TL_FETCH_BATCH_SIZE")
                .and_then(|v| v.parse().ok())
                .filter(|size: &u64| *size > 0)
                .unwrap_or(defaults.fetch_batch_size),
            verify_leaf_timestamps: flag(
                "TL_VERIFY_LEAF_TIMESTAMPS",
                defaults.verify_leaf_timestamps,
            ),
            verify_leaf_sequence: flag("TL_VERIFY_LEAF_SEQUENCE", defaults.verify_leaf_sequence),
        }
    }
}
