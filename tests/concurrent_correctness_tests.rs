//! Concurrent Cache Correctness Tests
//!
//! These tests validate that `ConcurrentArcCache` keeps the exact ARC semantics
//! of the single-threaded cache and stays consistent under contention.
//!
//! ## Segments
//!
//! 1. **Algorithm Correctness**: single-threaded traces must match `ArcCache`
//! 2. **Thread Safety Invariants**: cache state consistency under concurrency
//! 3. **Stress**: many threads, small cache, high contention

#![cfg(feature = "concurrent")]

use arc_cache::config::ArcCacheConfig;
use arc_cache::metrics::CacheMetrics;
use arc_cache::{ArcCache, ConcurrentArcCache};
use scoped_threadpool::Pool;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

const NUM_THREADS: usize = 16;
const OPS_PER_THREAD: usize = 10_000;

fn make_concurrent(cap: usize) -> ConcurrentArcCache<u64, u64> {
    let config = ArcCacheConfig {
        capacity: NonZeroUsize::new(cap).unwrap(),
    };
    ConcurrentArcCache::init(config, None)
}

// ============================================================================
// SEGMENT 1: ALGORITHM CORRECTNESS
// ============================================================================

#[test]
fn test_concurrent_matches_single_threaded_trace() {
    let concurrent = make_concurrent(10);
    let mut single: ArcCache<u64, u64> = ArcCache::new(NonZeroUsize::new(10).unwrap());

    let trace: Vec<u64> = (0..20)
        .chain(11..15)
        .chain(0..20)
        .chain(11..40)
        .chain([39])
        .chain((32..=38).rev())
        .chain([16, 17, 11, 41])
        .collect();

    for key in trace {
        assert_eq!(concurrent.get(key, || key * 3), *single.get(key, || key * 3));
        assert_eq!(concurrent.partition(), single.partition());
        assert_eq!(concurrent.len(), single.len());
    }

    assert_eq!(concurrent.partition(), 5);
    assert!(concurrent.contains(&41));
    assert!(!concurrent.contains(&38));
    concurrent.check_invariants().unwrap();
}

#[test]
fn test_concurrent_get_with_avoids_clone() {
    let cache: ConcurrentArcCache<u32, Vec<u8>> =
        ConcurrentArcCache::new(NonZeroUsize::new(4).unwrap());

    let len = cache.get_with(1, || vec![0u8; 4096], |v: &Vec<u8>| v.len());
    assert_eq!(len, 4096);

    let first = cache.get_with(1, || unreachable!(), |v: &Vec<u8>| v[0]);
    assert_eq!(first, 0);
}

#[test]
fn test_concurrent_metrics() {
    let cache = make_concurrent(2);
    cache.get(1, || 1);
    cache.get(1, || 1);
    cache.get(2, || 2);
    cache.get(3, || 3);
    let _ = cache.try_get(4, || Err::<u64, ()>(()));

    let metrics = cache.metrics();
    assert_eq!(metrics.get("requests"), Some(&4.0));
    assert_eq!(metrics.get("cache_hits"), Some(&1.0));
    assert_eq!(metrics.get("loader_failures"), Some(&1.0));
    assert_eq!(metrics.get("b1_size"), Some(&1.0));
    assert_eq!(cache.algorithm_name(), "ConcurrentARC");
}

// ============================================================================
// SEGMENT 2: THREAD SAFETY INVARIANTS
// ============================================================================

#[test]
fn test_concurrent_each_key_loaded_once_when_it_fits() {
    let cache = Arc::new(make_concurrent(128));
    let loads = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let loads = Arc::clone(&loads);
            thread::spawn(move || {
                for key in 0..100u64 {
                    let v = cache.get(key, || {
                        loads.fetch_add(1, Ordering::SeqCst);
                        key + 7
                    });
                    assert_eq!(v, key + 7);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(loads.load(Ordering::SeqCst), 100);
    assert_eq!(cache.len(), 100);
}

#[test]
fn test_concurrent_failures_do_not_poison() {
    let cache = make_concurrent(16);
    let mut pool = Pool::new(4);

    pool.scoped(|scope| {
        for t in 0..4u64 {
            let cache = &cache;
            scope.execute(move || {
                for i in 0..1000u64 {
                    let key = (i + t) % 40;
                    let result = cache.try_get(key, || if key % 5 == 0 { Err(key) } else { Ok(key) });
                    match result {
                        Ok(v) => assert_eq!(v, key),
                        Err(k) => assert_eq!(k % 5, 0),
                    }
                }
            });
        }
    });

    // Keys divisible by 5 never load, so they are never cached
    for key in (0..40).step_by(5) {
        assert!(!cache.contains(&key));
    }
    cache.check_invariants().unwrap();
}

#[test]
fn test_concurrent_clear_during_access() {
    let cache = Arc::new(make_concurrent(32));

    let handles: Vec<_> = (0..4u64)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for i in 0..2000u64 {
                    let key = (i * 13 + t) % 100;
                    assert_eq!(cache.get(key, || key), key);
                    if t == 0 && i % 500 == 0 {
                        cache.clear();
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cache.len() <= 32);
    cache.check_invariants().unwrap();
}

// ============================================================================
// SEGMENT 3: STRESS
// ============================================================================

#[test]
fn test_concurrent_stress_high_contention() {
    let cache = Arc::new(make_concurrent(64));

    let handles: Vec<_> = (0..NUM_THREADS)
        .map(|t| {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                let mut state = t as u64 + 1;
                for _ in 0..OPS_PER_THREAD {
                    state = state.wrapping_mul(1103515245).wrapping_add(12345) & 0x7fffffff;
                    // A quarter of the traffic goes to 16 hot keys
                    let key = if state % 4 == 0 { state % 16 } else { state % 512 };
                    assert_eq!(cache.get(key, || key * 2), key * 2);
                    if let Some(v) = cache.peek(&key) {
                        assert_eq!(v, key * 2);
                    }
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(cache.len() <= 64);
    assert!(cache.partition() <= 64);
    cache.check_invariants().unwrap();

    let metrics = cache.metrics();
    assert_eq!(
        metrics.get("requests"),
        Some(&((NUM_THREADS * OPS_PER_THREAD) as f64))
    );
}
