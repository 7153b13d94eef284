//! # Sync Flow Integration Tests
//!
//! Drives the lookup engine through the life of a log: bootstrap on an
//! existing store, follow new tree heads, and answer audit and consistency
//! queries that an independent verifier accepts.
//!
//! ## Flows Tested:
//!
//! 1. **Bootstrap**: empty store, populated store, store with no tree head
//! 2. **Proof round trips**: every leaf at every size verifies against the
//!    store's own roots
//! 3. **Monotonic growth**: sizes, indices and proofs only ever extend
//! 4. **JSON surface**: the query dispatcher returns the same proofs

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shared_types::SignedTreeHead;
    use tl_log_lookup::{
        handle_api_query, ApiQueryHandler, InMemoryLogStore, LogLookup, LogLookupApi,
        LookupConfig, RefreshOutcome,
    };
    use tl_merkle::{empty_root, hash_leaf};

    use crate::integration::{engine_over, leaf_data, populated_store};

    fn root_of(store: &InMemoryLogStore, size: u64) -> [u8; 32] {
        store.root_at(size).unwrap()
    }

    // =============================================================================
    // BOOTSTRAP
    // =============================================================================

    #[tokio::test]
    async fn test_bootstrap_on_empty_log() {
        tl_telemetry::try_init_for_tests();
        let store = Arc::new(InMemoryLogStore::new());
        let engine = engine_over(&store).await;

        assert_eq!(engine.tree_size(), 0);
        let sth = engine.get_sth().unwrap();
        assert_eq!(sth.tree_size, 0);
        assert_eq!(sth.sha256_root_hash, empty_root());
        assert!(engine.audit_proof(0, 0).is_none());
        assert!(engine.get_index(&hash_leaf(b"")).is_none());
    }

    #[tokio::test]
    async fn test_bootstrap_without_tree_head_serves_nothing() {
        let store = populated_store(5);
        let engine = LogLookup::bootstrap(Arc::clone(&store), LookupConfig::for_testing())
            .await
            .unwrap();

        assert_eq!(engine.get_sth(), None);
        assert_eq!(engine.tree_size(), 0);
        assert!(engine.audit_proof_by_hash(&hash_leaf(&leaf_data(0))).is_none());

        let sth = store.publish_tree_head();
        let outcome = engine.on_new_sth(sth.clone()).await.unwrap();
        assert_eq!(
            outcome,
            RefreshOutcome::Published {
                previous_size: 0,
                tree_size: 5
            }
        );
        assert_eq!(engine.get_sth(), Some(sth));
    }

    // =============================================================================
    // FOUR-LEAF WALKTHROUGH
    // =============================================================================

    #[tokio::test]
    async fn test_four_leaf_log() {
        let store = Arc::new(InMemoryLogStore::new());
        for leaf in ["A", "B", "C", "D"] {
            store.append(leaf.as_bytes().to_vec());
        }
        let engine = engine_over(&store).await;
        let root = engine.get_sth().unwrap().sha256_root_hash;

        let c = hash_leaf(b"C");
        assert_eq!(engine.get_index(&c), Some(2));

        let proof = engine.audit_proof(2, 4).unwrap();
        assert_eq!(proof.path.len(), 2);
        assert_eq!(proof.path[0], hash_leaf(b"D"));
        proof.verify(&c, &root).unwrap();

        let by_hash = engine.audit_proof_by_hash(&c).unwrap();
        assert_eq!(by_hash.path, proof.path);
        assert_eq!(by_hash.tree_size, 4);
        by_hash.verify(&c, &root).unwrap();

        let consistency = engine.consistency_proof(2, 4).unwrap().unwrap();
        consistency.verify(&root_of(&store, 2), &root).unwrap();
    }

    // =============================================================================
    // PROOF ROUND TRIPS
    // =============================================================================

    #[tokio::test]
    async fn test_every_audit_proof_verifies() {
        let store = populated_store(13);
        let engine = engine_over(&store).await;

        for size in 1..=13u64 {
            let root = root_of(&store, size);
            for position in 0..size {
                let proof = engine.audit_proof(position, size).unwrap();
                let leaf = hash_leaf(&leaf_data(position));
                proof.verify(&leaf, &root).unwrap();

                let by_hash = engine.audit_proof_by_hash_at(&leaf, size).unwrap();
                assert_eq!(by_hash, proof);
            }
            assert!(engine.audit_proof(size, size).is_none());
        }
    }

    #[tokio::test]
    async fn test_every_consistency_proof_verifies() {
        let store = populated_store(11);
        let engine = engine_over(&store).await;

        for second in 0..=11u64 {
            for first in 0..=second {
                let proof = engine.consistency_proof(first, second).unwrap().unwrap();
                if first == 0 || first == second {
                    assert!(proof.path.is_empty());
                }
                proof
                    .verify(&root_of(&store, first), &root_of(&store, second))
                    .unwrap();
            }
        }
        assert!(engine.consistency_proof(3, 12).unwrap().is_none());
        assert!(engine.consistency_proof(5, 4).is_err());
    }

    #[tokio::test]
    async fn test_proof_against_wrong_root_fails() {
        let store = populated_store(6);
        let engine = engine_over(&store).await;

        let proof = engine.audit_proof(3, 6).unwrap();
        let leaf = hash_leaf(&leaf_data(3));
        assert!(proof.verify(&leaf, &root_of(&store, 5)).is_err());
        assert!(proof
            .verify(&hash_leaf(&leaf_data(4)), &root_of(&store, 6))
            .is_err());
    }

    // =============================================================================
    // MONOTONIC GROWTH
    // =============================================================================

    #[tokio::test]
    async fn test_growth_is_monotonic_and_proofs_are_stable() {
        let store = populated_store(3);
        let engine = engine_over(&store).await;
        let pinned = engine.audit_proof(1, 3).unwrap();

        let mut previous: SignedTreeHead = engine.get_sth().unwrap();
        let mut next = 3u64;
        for round in 0..5u64 {
            for _ in 0..=round {
                store.append(leaf_data(next));
                next += 1;
            }
            let sth = store.publish_tree_head();
            engine.on_new_sth(sth.clone()).await.unwrap();

            let current = engine.get_sth().unwrap();
            assert!(current.tree_size >= previous.tree_size);
            assert!(current.timestamp > previous.timestamp);

            // Sized proofs never change once their size is reached.
            assert_eq!(engine.audit_proof(1, 3).unwrap(), pinned);

            let consistency = engine
                .consistency_proof(previous.tree_size, current.tree_size)
                .unwrap()
                .unwrap();
            consistency
                .verify(&previous.sha256_root_hash, &current.sha256_root_hash)
                .unwrap();
            previous = current;
        }
    }

    #[tokio::test]
    async fn test_redelivered_heads_are_noops() {
        let store = populated_store(4);
        let engine = engine_over(&store).await;
        let sth = engine.get_sth().unwrap();
        let before = engine.stats();

        for _ in 0..3 {
            assert_eq!(
                engine.on_new_sth(sth.clone()).await.unwrap(),
                RefreshOutcome::Unchanged
            );
        }
        let after = engine.stats();
        assert_eq!(after.state, before.state);
        assert_eq!(after.refreshes_applied, before.refreshes_applied);
    }

    #[tokio::test]
    async fn test_duplicate_leaves_keep_first_position() {
        let store = Arc::new(InMemoryLogStore::new());
        for leaf in ["x", "y", "x", "z", "y"] {
            store.append(leaf.as_bytes().to_vec());
        }
        let engine = engine_over(&store).await;

        assert_eq!(engine.tree_size(), 5);
        assert_eq!(engine.get_index(&hash_leaf(b"x")), Some(0));
        assert_eq!(engine.get_index(&hash_leaf(b"y")), Some(1));
        assert_eq!(engine.get_index(&hash_leaf(b"z")), Some(3));
        assert_eq!(engine.stats().state.distinct_leaves, 3);

        // The later copy is still provable by position.
        let root = engine.get_sth().unwrap().sha256_root_hash;
        engine.audit_proof(2, 5).unwrap().verify(&hash_leaf(b"x"), &root).unwrap();
    }

    // =============================================================================
    // JSON SURFACE
    // =============================================================================

    #[tokio::test]
    async fn test_json_queries_match_engine() {
        let store = populated_store(7);
        let engine: Arc<dyn LogLookupApi> = Arc::new(engine_over(&store).await);
        let handler = ApiQueryHandler::new(Arc::clone(&engine));
        let sth = engine.get_sth().unwrap();

        let head = handle_api_query(&handler, "get_sth", &serde_json::json!({})).unwrap();
        assert_eq!(head["tree_size"], 7);
        assert_eq!(head["sha256_root_hash"], hex::encode(sth.sha256_root_hash));

        let leaf = hash_leaf(&leaf_data(5));
        let params = serde_json::json!({ "leaf_hash": hex::encode(leaf) });
        let index = handle_api_query(&handler, "get_index", &params).unwrap();
        assert_eq!(index["leaf_index"], 5);

        let proof = handle_api_query(
            &handler,
            "get_audit_proof",
            &serde_json::json!({ "leaf_index": 5, "tree_size": 7 }),
        )
        .unwrap();
        let expected: Vec<String> = engine
            .audit_proof(5, 7)
            .unwrap()
            .path
            .iter()
            .map(hex::encode)
            .collect();
        assert_eq!(proof["audit_path"], serde_json::json!(expected));

        let leaf_hash = handle_api_query(
            &handler,
            "get_leaf_hash",
            &serde_json::json!({ "leaf_input": hex::encode(leaf_data(5)) }),
        )
        .unwrap();
        assert_eq!(leaf_hash["leaf_hash"], hex::encode(leaf));

        let err = handle_api_query(
            &handler,
            "get_consistency",
            &serde_json::json!({ "first": 6, "second": 2 }),
        )
        .unwrap_err();
        assert_eq!(err.code, -32602);
    }
}
