//! # Log Lookup Service
//!
//! Keeps the tree, leaf index and published tree head in step with the
//! authoritative store, and answers proof queries against them.
//!
//! ## Locking
//!
//! - `state` (`parking_lot::Mutex`) guards tree, index and tree head
//!   together. Queries hold it for their whole computation.
//! - `refresh_gate` (`tokio::sync::Mutex`) admits one refresh at a time.
//!   Leaves are fetched under the gate only. Root verification, appends and
//!   publication then happen in a single `state` critical section, so no
//!   reader sees leaves the published tree head does not cover.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use shared_types::{Hash, SignedTreeHead, Succession, TreeHeadError};
use tracing::{debug, error, info, warn};

use crate::config::LookupConfig;
use crate::domain::{
    ConsistencyProof, LookupError, LookupState, SignedAuditProof, SizedAuditProof, SyncError,
    SyncResult,
};
use crate::metrics;
use crate::ports::{LogLookupApi, LookupStats, ReadOnlyLogStore};

/// What a refresh did with a candidate tree head.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Candidate equals the published tree head.
    Unchanged,
    /// Candidate was signed before the published tree head and was ignored.
    Stale,
    /// Candidate is now the published tree head.
    Published {
        /// Tree size before the refresh
        previous_size: u64,
        /// Tree size after the refresh
        tree_size: u64,
    },
}

impl RefreshOutcome {
    /// Leaves appended by this refresh.
    pub fn leaves_added(&self) -> u64 {
        match self {
            RefreshOutcome::Published {
                previous_size,
                tree_size,
            } => tree_size - previous_size,
            _ => 0,
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    refreshes_applied: AtomicU64,
    refresh_failures: AtomicU64,
    integrity_faults: AtomicU64,
    proofs_served: AtomicU64,
}

/// Read-side lookup engine over a log store.
pub struct LogLookup<S: ReadOnlyLogStore> {
    store: Arc<S>,
    config: LookupConfig,
    state: Mutex<LookupState>,
    refresh_gate: tokio::sync::Mutex<()>,
    counters: Counters,
}

impl<S: ReadOnlyLogStore> LogLookup<S> {
    /// Create an engine with an empty tree and no tree head.
    ///
    /// Nothing is read from the store until the first refresh. Most callers
    /// want [`bootstrap`](Self::bootstrap).
    pub fn new(store: Arc<S>, config: LookupConfig) -> Self {
        Self {
            store,
            config,
            state: Mutex::new(LookupState::new()),
            refresh_gate: tokio::sync::Mutex::new(()),
            counters: Counters::default(),
        }
    }

    /// Create an engine and replay the store up to its latest tree head.
    pub async fn bootstrap(store: Arc<S>, config: LookupConfig) -> SyncResult<Self> {
        let engine = Self::new(store, config);
        engine.catch_up().await?;
        Ok(engine)
    }

    /// Refresh from the store's latest tree head.
    ///
    /// A store that cannot report its size or latest tree head counts as a
    /// failed refresh.
    pub async fn catch_up(&self) -> SyncResult<RefreshOutcome> {
        let (store_size, latest) = match self.read_store_head().await {
            Ok(head) => head,
            Err(e) => {
                self.record_failure(&e);
                warn!("[tl-lookup] Catch-up abandoned: {}", e);
                return Err(e);
            }
        };
        match latest {
            Some(sth) => {
                if sth.tree_size > store_size {
                    warn!(
                        tree_size = sth.tree_size,
                        store_size, "[tl-lookup] Tree head is ahead of the store"
                    );
                }
                self.on_new_sth(sth).await
            }
            None => {
                info!(store_size, "[tl-lookup] Store has not published a tree head yet");
                Ok(RefreshOutcome::Unchanged)
            }
        }
    }

    /// Bring the tree and index up to `candidate` and publish it.
    ///
    /// On any error the previously published state is left as it was.
    pub async fn on_new_sth(&self, candidate: SignedTreeHead) -> SyncResult<RefreshOutcome> {
        let _gate = self.refresh_gate.lock().await;
        let tree_size = candidate.tree_size;

        match self.refresh(candidate).await {
            Ok(outcome) => {
                if let RefreshOutcome::Published {
                    previous_size,
                    tree_size,
                } = outcome
                {
                    self.counters
                        .refreshes_applied
                        .fetch_add(1, Ordering::Relaxed);
                    metrics::record_refresh_applied(outcome.leaves_added(), tree_size);
                    info!(
                        previous_size,
                        tree_size, "[tl-lookup] Published tree head"
                    );
                }
                Ok(outcome)
            }
            Err(e) => {
                self.record_failure(&e);
                if e.is_integrity_fault() {
                    error!(
                        tree_size,
                        kind = e.kind(),
                        "[tl-lookup] INTEGRITY FAULT, keeping last good tree head: {}",
                        e
                    );
                } else {
                    warn!(tree_size, "[tl-lookup] Refresh abandoned: {}", e);
                }
                Err(e)
            }
        }
    }

    async fn read_store_head(&self) -> SyncResult<(u64, Option<SignedTreeHead>)> {
        let store_size = self.store.get_size().await?;
        let latest = self.store.latest_sth().await?;
        Ok((store_size, latest))
    }

    fn record_failure(&self, e: &SyncError) {
        self.counters.refresh_failures.fetch_add(1, Ordering::Relaxed);
        if e.is_integrity_fault() {
            self.counters.integrity_faults.fetch_add(1, Ordering::Relaxed);
        }
        metrics::record_refresh_failure(e.kind());
    }

    async fn refresh(&self, candidate: SignedTreeHead) -> SyncResult<RefreshOutcome> {
        // Only refreshes mutate state and the gate is held, so this read
        // stays valid until the commit below.
        let (current_size, published) = {
            let state = self.state.lock();
            (state.tree_size(), state.published().cloned())
        };

        if let Some(published) = &published {
            match candidate.succession(published)? {
                Succession::Identical => return Ok(RefreshOutcome::Unchanged),
                Succession::Older => {
                    debug!(
                        candidate_size = candidate.tree_size,
                        candidate_timestamp = candidate.timestamp,
                        published_timestamp = published.timestamp,
                        "[tl-lookup] Ignoring stale tree head"
                    );
                    return Ok(RefreshOutcome::Stale);
                }
                Succession::Newer => {}
            }
        }
        if candidate.tree_size < current_size {
            return Err(TreeHeadError::SizeRegression {
                older_size: current_size,
                newer_size: candidate.tree_size,
            }
            .into());
        }

        let leaf_hashes = self.fetch_leaf_hashes(current_size, &candidate).await?;

        let mut state = self.state.lock();
        let mut frontier = state.tree().frontier();
        for leaf_hash in &leaf_hashes {
            frontier.push(*leaf_hash);
        }
        let computed = frontier.root();
        if computed != candidate.sha256_root_hash {
            return Err(SyncError::RootMismatch {
                tree_size: candidate.tree_size,
                declared: candidate.sha256_root_hash,
                computed,
            });
        }

        let tree_size = candidate.tree_size;
        state.commit(&leaf_hashes, candidate);
        Ok(RefreshOutcome::Published {
            previous_size: current_size,
            tree_size,
        })
    }

    /// Read and check leaves `[from, candidate.tree_size)`.
    async fn fetch_leaf_hashes(
        &self,
        from: u64,
        candidate: &SignedTreeHead,
    ) -> SyncResult<Vec<Hash>> {
        let to = candidate.tree_size;
        let batch_size = self.config.fetch_batch_size.max(1);
        // Sized by what the store returns; `to` is untrusted.
        let mut hashes = Vec::new();
        let mut position = from;

        while position < to {
            let count = batch_size.min(to - position);
            let records = self
                .store
                .get_leaves(position, count)
                .await
                .map_err(|source| SyncError::StoreFetch { position, source })?;
            if records.len() as u64 != count {
                return Err(SyncError::LeafCountMismatch {
                    position,
                    expected: count,
                    returned: records.len() as u64,
                });
            }

            hashes.reserve(records.len());
            for record in records {
                if self.config.verify_leaf_sequence && record.sequence_number != position {
                    return Err(SyncError::LeafOutOfSequence {
                        expected: position,
                        actual: record.sequence_number,
                    });
                }
                if self.config.verify_leaf_timestamps && record.timestamp > candidate.timestamp {
                    return Err(SyncError::LeafAfterTreeHead {
                        position,
                        leaf_timestamp: record.timestamp,
                        sth_timestamp: candidate.timestamp,
                    });
                }
                hashes.push(tl_merkle::hash_leaf(&record.merkle_leaf));
                position += 1;
            }
            debug!(position, target_size = to, "[tl-lookup] Fetched leaf batch");
        }

        Ok(hashes)
    }

    /// Engine configuration.
    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// Handle to the underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    fn served<T>(&self, proof: Option<T>, proof_type: &str) -> Option<T> {
        if proof.is_some() {
            self.counters.proofs_served.fetch_add(1, Ordering::Relaxed);
            metrics::record_proof_served(proof_type);
        }
        proof
    }
}

impl<S: ReadOnlyLogStore> LogLookupApi for LogLookup<S> {
    fn get_index(&self, leaf_hash: &Hash) -> Option<u64> {
        self.state.lock().locate(leaf_hash)
    }

    fn audit_proof_by_hash(&self, leaf_hash: &Hash) -> Option<SignedAuditProof> {
        let proof = self.state.lock().signed_audit_proof(leaf_hash);
        self.served(proof, "signed_audit")
    }

    fn audit_proof(&self, position: u64, tree_size: u64) -> Option<SizedAuditProof> {
        let proof = self.state.lock().audit_proof(position, tree_size);
        self.served(proof, "audit")
    }

    fn audit_proof_by_hash_at(&self, leaf_hash: &Hash, tree_size: u64) -> Option<SizedAuditProof> {
        let proof = {
            let state = self.state.lock();
            state
                .locate(leaf_hash)
                .and_then(|position| state.audit_proof(position, tree_size))
        };
        self.served(proof, "audit")
    }

    fn consistency_proof(
        &self,
        first: u64,
        second: u64,
    ) -> Result<Option<ConsistencyProof>, LookupError> {
        let proof = self.state.lock().consistency_proof(first, second)?;
        Ok(self.served(proof, "consistency"))
    }

    fn get_sth(&self) -> Option<SignedTreeHead> {
        self.state.lock().published().cloned()
    }

    fn tree_size(&self) -> u64 {
        self.state.lock().tree_size()
    }

    fn stats(&self) -> LookupStats {
        LookupStats {
            state: self.state.lock().stats(),
            refreshes_applied: self.counters.refreshes_applied.load(Ordering::Relaxed),
            refresh_failures: self.counters.refresh_failures.load(Ordering::Relaxed),
            integrity_faults: self.counters.integrity_faults.load(Ordering::Relaxed),
            proofs_served: self.counters.proofs_served.load(Ordering::Relaxed),
        }
    }
}
