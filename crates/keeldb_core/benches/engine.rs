use criterion::{black_box, criterion_group, criterion_main, Criterion};
use keeldb_core::index::BTree;
use keeldb_core::wal::{LogRecord, WalManager};
use keeldb_core::{Engine, MemoryEngine};
use keeldb_storage::InMemoryBackend;

fn bench_memory_engine(c: &mut Criterion) {
    c.bench_function("memory_engine_put", |b| {
        let engine = MemoryEngine::new();
        let mut i = 0u64;
        b.iter(|| {
            let key = format!("key{i}");
            engine.put(black_box(&key), black_box(b"value")).unwrap();
            i += 1;
        });
    });

    c.bench_function("memory_engine_get", |b| {
        let engine = MemoryEngine::new();
        for i in 0..1000 {
            engine.put(&format!("key{i}"), b"value").unwrap();
        }
        b.iter(|| {
            engine.get(black_box("key500")).unwrap();
        });
    });
}

fn bench_wal_append(c: &mut Criterion) {
    c.bench_function("wal_append", |b| {
        let wal = WalManager::new(Box::new(InMemoryBackend::new()), false);
        b.iter(|| {
            wal.append(black_box(&LogRecord::put("key", b"value".to_vec())))
                .unwrap();
        });
    });
}

fn bench_btree(c: &mut Criterion) {
    c.bench_function("btree_insert_1000", |b| {
        b.iter(|| {
            let mut tree = BTree::new(8);
            for i in 0..1000u32 {
                let key = format!("key{i:04}");
                tree.insert(&key, &i.to_le_bytes());
            }
            black_box(tree.len())
        });
    });

    c.bench_function("btree_search", |b| {
        let mut tree = BTree::new(8);
        for i in 0..1000u32 {
            tree.insert(&format!("key{i:04}"), &i.to_le_bytes());
        }
        b.iter(|| tree.search(black_box("key0500")));
    });
}

criterion_group!(benches, bench_memory_engine, bench_wal_append, bench_btree);
criterion_main!(benches);
