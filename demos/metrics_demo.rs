//! ARC Metrics Demonstration
//!
//! Runs a few access patterns through `ArcCache` and prints the core and
//! ARC-specific metrics, showing how the partition target moves as the
//! workload shifts between recency and frequency.
//!
//! Run with: cargo run --example metrics_demo

use arc_cache::config::ArcCacheConfig;
use arc_cache::metrics::CacheMetrics;
use arc_cache::{ArcCache, ArcList};
use core::num::NonZeroUsize;
use std::collections::BTreeMap;

fn main() {
    println!("ARC Metrics Demonstration");
    println!("=========================\n");

    let capacity = NonZeroUsize::new(8).unwrap();
    println!("Capacity: {} items\n", capacity.get());

    let mut cache = ArcCache::init(ArcCacheConfig::new(capacity), None);

    run_phase(&mut cache, "Warm up a hot set", (0..6).chain(0..6));
    run_phase(&mut cache, "One-off scan", 100..124);
    run_phase(&mut cache, "Hot set returns", (0..6).chain(0..6));
    run_phase(&mut cache, "Recently evicted keys come back", (116..124).rev());

    display_lists(&cache);
    demonstrate_deterministic_ordering(&cache);
}

fn run_phase<I>(cache: &mut ArcCache<u32, u32>, name: &str, keys: I)
where
    I: IntoIterator<Item = u32>,
{
    let mut loads = 0;
    for key in keys {
        cache.get(key, || {
            loads += 1;
            key * 10
        });
    }

    println!("Phase: {}", name);
    println!("  loads: {}, partition: {}", loads, cache.partition());
    print_core_metrics(&cache.metrics());
    print_arc_metrics(&cache.metrics());
    println!();
}

fn print_core_metrics(metrics: &BTreeMap<String, f64>) {
    for key in ["requests", "cache_hits", "hit_rate", "evictions"] {
        if let Some(value) = metrics.get(key) {
            println!("  • {}: {:.2}", key.replace('_', " "), value);
        }
    }
}

fn print_arc_metrics(metrics: &BTreeMap<String, f64>) {
    let keys = [
        "recent_hits",
        "frequent_hits",
        "recent_ghost_hits",
        "frequent_ghost_hits",
        "direct_drops",
        "partition_ratio",
    ];
    for key in &keys {
        if let Some(value) = metrics.get(*key) {
            println!("  • {}: {:.2}", key.replace('_', " "), value);
        }
    }
}

fn display_lists(cache: &ArcCache<u32, u32>) {
    println!("Final list contents (MRU first):");
    for which in ArcList::ALL {
        let keys: Vec<u32> = cache.keys(which).copied().collect();
        let kind = if which.is_ghost() { "ghost" } else { "live" };
        println!("  {} ({}): {:?}", which, kind, keys);
    }
    println!();
}

/// Metrics come back in a BTreeMap, so key order is stable between runs
fn demonstrate_deterministic_ordering(cache: &dyn CacheMetrics) {
    println!("Metrics reported by {}:", cache.algorithm_name());
    for (i, (key, value)) in cache.metrics().iter().enumerate() {
        println!("  {:>2}. {} = {:.2}", i + 1, key, value);
    }
}
