//! Integration flows across the merkle, lookup and telemetry crates.

use std::sync::Arc;

use tl_log_lookup::{InMemoryLogStore, LogLookup, LookupConfig};

pub mod concurrency;
pub mod sync_flows;

/// Leaf payload used throughout the suite.
pub fn leaf_data(i: u64) -> Vec<u8> {
    format!("entry-{i}").into_bytes()
}

/// Store holding `count` leaves and no tree head.
pub fn populated_store(count: u64) -> Arc<InMemoryLogStore> {
    let store = Arc::new(InMemoryLogStore::new());
    for i in 0..count {
        store.append(leaf_data(i));
    }
    store
}

/// Publish a tree head over everything in `store` and bootstrap an engine on it.
pub async fn engine_over(store: &Arc<InMemoryLogStore>) -> LogLookup<InMemoryLogStore> {
    store.publish_tree_head();
    match LogLookup::bootstrap(Arc::clone(store), LookupConfig::for_testing()).await {
        Ok(engine) => engine,
        Err(e) => panic!("bootstrap failed: {e}"),
    }
}
