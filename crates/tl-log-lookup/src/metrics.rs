//! # Lookup Metrics
//!
//! Prometheus metrics for the refresh protocol and the query façade.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! tl-log-lookup = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `tl_lookup_refreshes_total` - Counter of refreshes that published a tree head
//! - `tl_lookup_refresh_failures_total` - Counter of abandoned refreshes (by kind)
//! - `tl_lookup_leaves_indexed_total` - Counter of leaves appended to the tree
//! - `tl_lookup_proofs_served_total` - Counter of proofs returned (by type)
//! - `tl_lookup_tree_size` - Gauge of the published tree size

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_int_counter, register_int_counter_vec, register_int_gauge, IntCounter,
    IntCounterVec, IntGauge,
};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Refreshes that published a tree head
    pub static ref REFRESHES_APPLIED: IntCounter = register_int_counter!(
        "tl_lookup_refreshes_total",
        "Total number of refreshes that published a tree head"
    )
    .expect("Failed to create REFRESHES_APPLIED metric");

    /// Abandoned refreshes, labeled by error kind
    pub static ref REFRESH_FAILURES: IntCounterVec = register_int_counter_vec!(
        "tl_lookup_refresh_failures_total",
        "Total number of abandoned refreshes",
        &["kind"]
    )
    .expect("Failed to create REFRESH_FAILURES metric");

    /// Leaves appended to the tree
    pub static ref LEAVES_INDEXED: IntCounter = register_int_counter!(
        "tl_lookup_leaves_indexed_total",
        "Total number of leaves appended to the tree and index"
    )
    .expect("Failed to create LEAVES_INDEXED metric");

    /// Proofs served, labeled by proof type
    pub static ref PROOFS_SERVED: IntCounterVec = register_int_counter_vec!(
        "tl_lookup_proofs_served_total",
        "Total number of proofs returned to callers",
        &["type"]
    )
    .expect("Failed to create PROOFS_SERVED metric");

    /// Published tree size
    pub static ref TREE_SIZE: IntGauge = register_int_gauge!(
        "tl_lookup_tree_size",
        "Size of the currently published tree head"
    )
    .expect("Failed to create TREE_SIZE metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Record a published refresh
#[cfg(feature = "metrics")]
pub fn record_refresh_applied(leaves_added: u64, tree_size: u64) {
    REFRESHES_APPLIED.inc();
    LEAVES_INDEXED.inc_by(leaves_added);
    TREE_SIZE.set(tree_size as i64);
}

/// Record an abandoned refresh
#[cfg(feature = "metrics")]
pub fn record_refresh_failure(kind: &str) {
    REFRESH_FAILURES.with_label_values(&[kind]).inc();
}

/// Record a proof returned to a caller
#[cfg(feature = "metrics")]
pub fn record_proof_served(proof_type: &str) {
    PROOFS_SERVED.with_label_values(&[proof_type]).inc();
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

/// Record a published refresh
#[cfg(not(feature = "metrics"))]
pub fn record_refresh_applied(_leaves_added: u64, _tree_size: u64) {}

/// Record an abandoned refresh
#[cfg(not(feature = "metrics"))]
pub fn record_refresh_failure(_kind: &str) {}

/// Record a proof returned to a caller
#[cfg(not(feature = "metrics"))]
pub fn record_proof_served(_proof_type: &str) {}
