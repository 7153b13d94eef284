//! # TL Log Lookup
//!
//! Read-side proof engine for an append-only transparency log.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Purpose
//!
//! Answer, against a tree that tracks the log's signed tree heads:
//! - which position a leaf hash occupies
//! - an audit proof that a leaf is included in a tree of a given size
//! - a consistency proof that one tree size extends another
//!
//! ## Guarantees
//!
//! | Property | How |
//! |----------|-----|
//! | Consistent reads | Tree, index and tree head share one lock |
//! | No partial publication | Leaves are checked against the signed root before any append |
//! | Single writer | Refreshes pass through an async gate one at a time |
//! | Loud integrity faults | Root mismatches are logged at `error` and counted, never retried silently |
//!
//! ## Module Structure
//!
//! ```text
//! tl-log-lookup/
//! ├── domain/          # LeafIndex, LookupState, proofs, errors
//! ├── ports/           # LogLookupApi (inbound) + ReadOnlyLogStore (outbound)
//! ├── application/     # LogLookup service, tree head follower
//! ├── adapters/        # InMemoryLogStore, JSON query handler
//! ├── metrics.rs       # Prometheus metrics (feature "metrics")
//! └── config.rs        # LookupConfig
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod metrics;
pub mod ports;

// Re-exports
pub use adapters::{handle_api_query, ApiQueryError, ApiQueryHandler, InMemoryLogStore};
pub use application::{LogLookup, RefreshOutcome};
pub use config::LookupConfig;
pub use domain::{
    ConsistencyProof, LeafIndex, LookupError, LookupState, SignedAuditProof, SizedAuditProof,
    StateStats, SyncError, SyncResult,
};
pub use ports::{LogLookupApi, LookupStats, ReadOnlyLogStore, StoreError};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
