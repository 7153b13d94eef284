//! # Lookup Engine Benchmarks
//!
//! | Operation | Expected Cost |
//! |-----------|---------------|
//! | Leaf index lookup | O(1) |
//! | Audit proof generation | O(log n) |
//! | Consistency proof generation | O(log n) |
//! | Refresh | O(new leaves) plus one store round trip per batch |

use std::sync::Arc;
use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use tl_log_lookup::{InMemoryLogStore, LogLookup, LogLookupApi, LookupConfig};
use tl_merkle::{hash_leaf, MerkleTree};

fn leaf_data(i: u64) -> Vec<u8> {
    format!("entry-{i}").into_bytes()
}

fn runtime() -> tokio::runtime::Runtime {
    match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => panic!("runtime: {e}"),
    }
}

fn engine_with(rt: &tokio::runtime::Runtime, size: u64) -> LogLookup<InMemoryLogStore> {
    let store = Arc::new(InMemoryLogStore::new());
    for i in 0..size {
        store.append(leaf_data(i));
    }
    store.publish_tree_head();
    let config = LookupConfig::default();
    match rt.block_on(LogLookup::bootstrap(store, config)) {
        Ok(engine) => engine,
        Err(e) => panic!("bootstrap: {e}"),
    }
}

// ============================================================================
// Merkle tree: root and path computation
// ============================================================================

fn bench_merkle_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("tl-merkle");
    group.measurement_time(Duration::from_secs(5));

    for size in [1_000u64, 10_000, 100_000] {
        let mut tree = MerkleTree::new();
        for i in 0..size {
            tree.add_leaf_hash(hash_leaf(&leaf_data(i)));
        }

        group.bench_with_input(BenchmarkId::new("current_root", size), &size, |b, _| {
            b.iter(|| black_box(tree.current_root()))
        });

        group.bench_with_input(BenchmarkId::new("audit_path", size), &size, |b, &size| {
            let mut rng = rand::thread_rng();
            b.iter(|| {
                let position = rng.gen_range(0..size);
                black_box(tree.path_to_root_at_snapshot(position, size))
            })
        });

        group.bench_with_input(BenchmarkId::new("frontier_root", size), &size, |b, _| {
            let frontier = tree.frontier();
            b.iter(|| {
                let mut frontier = frontier.clone();
                frontier.push(hash_leaf(b"next"));
                black_box(frontier.root())
            })
        });
    }

    group.finish();
}

// ============================================================================
// Query façade: index lookups and proofs under the state lock
// ============================================================================

fn bench_queries(c: &mut Criterion) {
    let rt = runtime();
    let size = 50_000u64;
    let engine = engine_with(&rt, size);

    let mut group = c.benchmark_group("tl-lookup-queries");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("get_index", |b| {
        let mut rng = rand::thread_rng();
        b.iter(|| {
            let leaf = hash_leaf(&leaf_data(rng.gen_range(0..size)));
            black_box(engine.get_index(&leaf))
        })
    });

    group.bench_function("audit_proof_by_hash", |b| {
        let mut rng = rand::thread_rng();
        b.iter(|| {
            let leaf = hash_leaf(&leaf_data(rng.gen_range(0..size)));
            black_box(engine.audit_proof_by_hash(&leaf))
        })
    });

    group.bench_function("consistency_proof", |b| {
        let mut rng = rand::thread_rng();
        b.iter(|| {
            let first = rng.gen_range(1..size);
            black_box(engine.consistency_proof(first, size))
        })
    });

    group.finish();
}

// ============================================================================
// Refresh: fetching, checking and indexing new leaves
// ============================================================================

fn bench_refresh(c: &mut Criterion) {
    let rt = runtime();
    let mut group = c.benchmark_group("tl-lookup-refresh");
    group.measurement_time(Duration::from_secs(10));
    group.sample_size(20);

    for batch in [100u64, 1_000, 10_000] {
        group.throughput(Throughput::Elements(batch));
        group.bench_with_input(BenchmarkId::new("bootstrap", batch), &batch, |b, &batch| {
            let store = Arc::new(InMemoryLogStore::new());
            for i in 0..batch {
                store.append(leaf_data(i));
            }
            store.publish_tree_head();
            b.to_async(&rt).iter(|| {
                let store = Arc::clone(&store);
                async move {
                    black_box(
                        LogLookup::bootstrap(store, LookupConfig::default())
                            .await
                            .map(|engine| engine.tree_size()),
                    )
                }
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_merkle_tree, bench_queries, bench_refresh);

criterion_main!(benches);
