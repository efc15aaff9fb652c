//! Concurrent Cache Benchmarks
//!
//! Throughput of `ConcurrentArcCache` under different thread counts and
//! access patterns.

use arc_cache::ConcurrentArcCache;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::thread;

const CACHE_SIZE: usize = 10_000;
const OPS_PER_THREAD: usize = 1_000;

fn make_cache() -> Arc<ConcurrentArcCache<usize, usize>> {
    Arc::new(ConcurrentArcCache::new(
        NonZeroUsize::new(CACHE_SIZE).unwrap(),
    ))
}

/// Benchmark concurrent hits on a fully populated cache
fn concurrent_hits(c: &mut Criterion) {
    let mut group = c.benchmark_group("Concurrent Hits");

    let cache = make_cache();
    for _ in 0..2 {
        for i in 0..CACHE_SIZE {
            cache.get(i, || i);
        }
    }

    for threads in [1, 2, 4, 8] {
        group.throughput(Throughput::Elements((threads * OPS_PER_THREAD) as u64));
        group.bench_with_input(BenchmarkId::new("threads", threads), &threads, |b, &n| {
            b.iter(|| run_concurrent(Arc::clone(&cache), n, OPS_PER_THREAD, CACHE_SIZE));
        });
    }

    group.finish();
}

/// Benchmark a key space twice the capacity, so roughly half the calls load
fn concurrent_mixed(c: &mut Criterion) {
    let mut group = c.benchmark_group("Concurrent Mixed (2x key space)");

    for threads in [1, 2, 4, 8] {
        group.throughput(Throughput::Elements((threads * OPS_PER_THREAD) as u64));
        group.bench_with_input(BenchmarkId::new("threads", threads), &threads, |b, &n| {
            let cache = make_cache();
            b.iter(|| run_concurrent(Arc::clone(&cache), n, OPS_PER_THREAD, CACHE_SIZE * 2));
        });
    }

    group.finish();
}

/// Benchmark reading a field through `get_with` against cloning the value
fn get_with_vs_clone(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_with vs get");
    let cache: ConcurrentArcCache<usize, Vec<u8>> =
        ConcurrentArcCache::new(NonZeroUsize::new(1_000).unwrap());
    for i in 0..1_000 {
        cache.get(i, || vec![0u8; 1024]);
    }

    group.bench_function("get (clone)", |b| {
        b.iter(|| {
            for i in 0..100 {
                black_box(cache.get(i, || vec![0u8; 1024]).len());
            }
        });
    });

    group.bench_function("get_with", |b| {
        b.iter(|| {
            for i in 0..100 {
                black_box(cache.get_with(i, || vec![0u8; 1024], |v: &Vec<u8>| v.len()));
            }
        });
    });

    group.finish();
}

fn run_concurrent(
    cache: Arc<ConcurrentArcCache<usize, usize>>,
    num_threads: usize,
    ops_per_thread: usize,
    key_space: usize,
) {
    let handles: Vec<_> = (0..num_threads)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..ops_per_thread {
                    let key = (i * 31 + t * 7919) % key_space;
                    black_box(cache.get(key, || key));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

criterion_group!(benches, concurrent_hits, concurrent_mixed, get_with_vs_clone);
criterion_main!(benches);
