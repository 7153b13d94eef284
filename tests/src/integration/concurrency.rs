//! # Concurrency Integration Tests
//!
//! Readers query the engine while a writer grows the log and the follower
//! applies tree heads. Every answer a reader gets must verify against the
//! tree head it was built from.

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use rand::Rng;
    use tl_log_lookup::{InMemoryLogStore, LogLookup, LogLookupApi};
    use tl_merkle::hash_leaf;
    use tokio::sync::watch;
    use tokio::time::timeout;

    use crate::integration::{engine_over, leaf_data, populated_store};

    const FINAL_SIZE: u64 = 200;

    async fn wait_for_size(engine: &LogLookup<InMemoryLogStore>, size: u64) {
        let waited = timeout(Duration::from_secs(10), async {
            while engine.tree_size() < size {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await;
        assert!(waited.is_ok(), "engine stuck at {}", engine.tree_size());
    }

    /// Check one randomly chosen leaf against whatever head is published now.
    fn check_snapshot(engine: &LogLookup<InMemoryLogStore>, store: &InMemoryLogStore) {
        let Some(sth) = engine.get_sth() else {
            return;
        };
        if sth.tree_size == 0 {
            return;
        }
        let position = rand::thread_rng().gen_range(0..sth.tree_size);
        let leaf = hash_leaf(&leaf_data(position));

        let sized = engine.audit_proof(position, sth.tree_size).unwrap();
        sized.verify(&leaf, &sth.sha256_root_hash).unwrap();

        // The head may have moved on; the proof names the size it used.
        let signed = engine.audit_proof_by_hash(&leaf).unwrap();
        assert!(signed.tree_size >= sth.tree_size);
        assert!(signed.timestamp >= sth.timestamp);
        let root = store.root_at(signed.tree_size).unwrap();
        signed.verify(&leaf, &root).unwrap();

        assert!(engine.get_index(&leaf).unwrap() < engine.tree_size());
    }

    // =============================================================================
    // READERS DURING REFRESH
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_readers_see_consistent_snapshots() {
        tl_telemetry::try_init_for_tests();
        let store = populated_store(1);
        let engine = Arc::new(engine_over(&store).await);
        let done = Arc::new(AtomicBool::new(false));

        let mut readers = Vec::new();
        for _ in 0..4 {
            let engine = Arc::clone(&engine);
            let store = Arc::clone(&store);
            let done = Arc::clone(&done);
            readers.push(tokio::spawn(async move {
                let mut checks = 0u64;
                while !done.load(Ordering::Acquire) {
                    check_snapshot(&engine, &store);
                    checks += 1;
                    tokio::task::yield_now().await;
                }
                checks
            }));
        }

        let writer = {
            let engine = Arc::clone(&engine);
            let store = Arc::clone(&store);
            tokio::spawn(async move {
                for i in 1..FINAL_SIZE {
                    store.append(leaf_data(i));
                    if i % 7 == 0 || i == FINAL_SIZE - 1 {
                        let sth = store.publish_tree_head();
                        engine.on_new_sth(sth).await.unwrap();
                    }
                    tokio::task::yield_now().await;
                }
            })
        };

        writer.await.unwrap();
        done.store(true, Ordering::Release);
        for reader in readers {
            assert!(reader.await.unwrap() > 0);
        }

        assert_eq!(engine.tree_size(), FINAL_SIZE);
        check_snapshot(&engine, &store);
    }

    // =============================================================================
    // FOLLOWER
    // =============================================================================

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_follower_tracks_published_heads() {
        let store = populated_store(4);
        let engine = Arc::new(engine_over(&store).await);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let follower = engine.spawn_follower(shutdown_rx);

        for i in 4..FINAL_SIZE {
            store.append(leaf_data(i));
            if i % 16 == 0 {
                store.publish_tree_head();
            }
        }
        let last = store.publish_tree_head();

        wait_for_size(&engine, FINAL_SIZE).await;
        assert_eq!(engine.get_sth(), Some(last.clone()));
        check_snapshot(&engine, &store);

        shutdown_tx.send(true).unwrap();
        timeout(Duration::from_secs(5), follower)
            .await
            .unwrap()
            .unwrap();

        // Heads published after shutdown are not applied.
        store.append(leaf_data(FINAL_SIZE));
        store.publish_tree_head();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(engine.get_sth(), Some(last));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_follower_recovers_after_lagging() {
        let store = Arc::new(InMemoryLogStore::with_notify_capacity(2));
        store.append(leaf_data(0));
        let engine = Arc::new(engine_over(&store).await);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let follower = engine.spawn_follower(shutdown_rx);

        // Far more heads than the channel holds; the follower drops the
        // backlog and still applies the newest one.
        for i in 1..64 {
            store.append(leaf_data(i));
            store.publish_tree_head();
        }

        wait_for_size(&engine, 64).await;
        assert_eq!(engine.get_sth(), store.current_tree_head());

        shutdown_tx.send(true).unwrap();
        follower.await.unwrap();
    }
}
