//! Criterion micro-benchmarks comparing order-preserving and fast
//! mutation, plus push throughput.

use bytevec::{ByteVec, GrowthPolicy, SystemAllocator};
use bytevec_bench::{filled, index_sequence};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

const LEN: usize = 10_000;
const OPS: usize = 1_000;

/// Benchmark: push 10K 16-byte elements from the default capacity.
fn bench_push_10k(c: &mut Criterion) {
    let elem = [7u8; 16];
    c.bench_function("push_10k", |b| {
        b.iter(|| {
            let mut vec = ByteVec::new(16).unwrap();
            for _ in 0..LEN {
                vec.push(&elem).unwrap();
            }
            black_box(vec.len());
        });
    });
}

/// Benchmark: push 10K elements starting from an empty buffer.
fn bench_push_from_empty(c: &mut Criterion) {
    let elem = [7u8; 16];
    let policy = GrowthPolicy::new().with_initial_capacity(0);
    c.bench_function("push_from_empty_10k", |b| {
        b.iter(|| {
            let mut vec = ByteVec::with_policy(SystemAllocator, 16, policy.clone()).unwrap();
            for _ in 0..LEN {
                vec.push(&elem).unwrap();
            }
            black_box(vec.capacity());
        });
    });
}

/// Benchmark: 1K order-preserving vs fast inserts into a 10K vector.
fn bench_insert(c: &mut Criterion) {
    let elem = [1u8; 16];
    let positions = index_sequence(LEN, OPS, 42);

    c.bench_function("insert_1k_into_10k", |b| {
        b.iter_batched(
            || filled(SystemAllocator, 16, LEN).unwrap(),
            |mut vec| {
                for &at in &positions {
                    vec.insert(&elem, at).unwrap();
                }
                black_box(vec.len());
            },
            BatchSize::LargeInput,
        );
    });

    c.bench_function("insert_fast_1k_into_10k", |b| {
        b.iter_batched(
            || filled(SystemAllocator, 16, LEN).unwrap(),
            |mut vec| {
                for &at in &positions {
                    vec.insert_fast(&elem, at).unwrap();
                }
                black_box(vec.len());
            },
            BatchSize::LargeInput,
        );
    });
}

/// Benchmark: 1K order-preserving vs fast removals from a 10K vector.
fn bench_remove(c: &mut Criterion) {
    // Positions generated for a shrinking vector: k-th removal sees LEN - k elements.
    let positions: Vec<usize> = index_sequence(LEN, OPS, 7)
        .into_iter()
        .enumerate()
        .map(|(k, i)| i % (LEN - k))
        .collect();

    c.bench_function("remove_1k_from_10k", |b| {
        b.iter_batched(
            || filled(SystemAllocator, 16, LEN).unwrap(),
            |mut vec| {
                for &at in &positions {
                    vec.remove(at).unwrap();
                }
                black_box(vec.len());
            },
            BatchSize::LargeInput,
        );
    });

    c.bench_function("remove_fast_1k_from_10k", |b| {
        b.iter_batched(
            || filled(SystemAllocator, 16, LEN).unwrap(),
            |mut vec| {
                for &at in &positions {
                    vec.remove_fast(at).unwrap();
                }
                black_box(vec.len());
            },
            BatchSize::LargeInput,
        );
    });
}

criterion_group!(
    benches,
    bench_push_10k,
    bench_push_from_empty,
    bench_insert,
    bench_remove
);
criterion_main!(benches);
