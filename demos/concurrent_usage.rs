//! Concurrent Cache Usage Examples
//!
//! This example demonstrates multi-threaded usage patterns for `ConcurrentArcCache`.
//!
//! Run with: cargo run --example concurrent_usage --features concurrent

extern crate arc_cache;

use arc_cache::config::ArcCacheConfig;
use arc_cache::metrics::CacheMetrics;
use arc_cache::ConcurrentArcCache;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

fn arc_config(capacity: usize) -> ArcCacheConfig {
    ArcCacheConfig {
        capacity: NonZeroUsize::new(capacity).unwrap(),
    }
}

fn main() {
    println!("Concurrent Cache Usage Examples");
    println!("================================\n");

    basic_concurrent_usage();
    println!();

    zero_copy_get_with();
    println!();

    fallible_loads();
    println!();

    throughput_by_thread_count();
}

/// Basic multi-threaded get-or-load usage
fn basic_concurrent_usage() {
    println!("1. Basic Concurrent Usage");
    println!("   -----------------------");

    let cache = Arc::new(ConcurrentArcCache::init(arc_config(1000), None));
    let loads = Arc::new(AtomicUsize::new(0));

    let num_threads = 4;
    let ops_per_thread = 1000;

    let handles: Vec<_> = (0..num_threads)
        .map(|thread_id| {
            let cache = Arc::clone(&cache);
            let loads = Arc::clone(&loads);
            thread::spawn(move || {
                for i in 0..ops_per_thread {
                    // Threads overlap on half of their keys
                    let key = format!("key{}", (thread_id * ops_per_thread / 2) + i);
                    let value = cache.get(key.clone(), || {
                        loads.fetch_add(1, Ordering::Relaxed);
                        key.len()
                    });
                    assert_eq!(value, key.len());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    println!(
        "   Completed {} lookups across {} threads",
        num_threads * ops_per_thread,
        num_threads
    );
    println!("   Loader calls: {}", loads.load(Ordering::Relaxed));
    println!("   Final cache size: {} items", cache.len());
    println!("   Partition target: {}", cache.partition());
}

/// Zero-copy access pattern using get_with()
fn zero_copy_get_with() {
    println!("2. Zero-Copy Access with get_with()");
    println!("   ---------------------------------");

    let cache: ConcurrentArcCache<u32, Vec<u8>> = ConcurrentArcCache::init(arc_config(16), None);

    // get() would clone the whole buffer; get_with() reads it under the lock
    let checksum = cache.get_with(
        7,
        || (0..=255u8).collect(),
        |buf: &Vec<u8>| buf.iter().map(|&b| b as u64).sum::<u64>(),
    );
    let len = cache.get_with(7, || unreachable!(), |buf: &Vec<u8>| buf.len());

    println!("   Buffer length: {}", len);
    println!("   Checksum: {}", checksum);
}

/// Loader errors are returned to the caller and leave no trace in the cache
fn fallible_loads() {
    println!("3. Fallible Loads with try_get()");
    println!("   ------------------------------");

    let cache = ConcurrentArcCache::init(arc_config(8), None);

    for key in 0..12u32 {
        let result = cache.try_get(key, || {
            if key % 4 == 0 {
                Err(format!("record {} missing", key))
            } else {
                Ok(key * 100)
            }
        });
        if let Err(reason) = result {
            println!("   key {:>2}: {}", key, reason);
        }
    }

    let metrics = cache.metrics();
    println!("   Cached entries: {}", cache.len());
    println!(
        "   Loader failures: {}",
        metrics.get("loader_failures").copied().unwrap_or_default()
    );
}

/// Measure hit throughput as threads are added to a single shared cache
fn throughput_by_thread_count() {
    println!("4. Throughput by Thread Count");
    println!("   ---------------------------");

    let ops_per_thread = 100_000u64;

    for &num_threads in &[1u64, 2, 4, 8] {
        let cache = Arc::new(ConcurrentArcCache::init(arc_config(1024), None));
        for key in 0..1024u64 {
            cache.get(key, || key);
        }

        let start = Instant::now();
        let handles: Vec<_> = (0..num_threads)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..ops_per_thread {
                        let key = (i * 7 + t) % 1024;
                        std::hint::black_box(cache.get(key, || key));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().expect("Thread panicked");
        }
        let elapsed = start.elapsed();

        let total = (num_threads * ops_per_thread) as f64;
        println!(
            "   {} thread(s): {:>10.0} ops/sec",
            num_threads,
            total / elapsed.as_secs_f64()
        );
    }
}
