//! Cache Metrics System
//!
//! Provides metrics reporting through BTreeMap-based snapshots. The ARC cache tracks
//! its own counters on top of a shared [`CoreCacheMetrics`] and exposes everything
//! through the [`CacheMetrics`] trait.
//!
//! BTreeMap is used instead of HashMap so that metrics always come out in the same
//! order, which keeps test assertions and logged snapshots reproducible.
//!
//! All counters are entry based. The cache never inspects values, so there is no
//! byte accounting.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

pub mod arc;

pub use arc::ArcCacheMetrics;

/// Common metrics tracked by every cache
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CoreCacheMetrics {
    /// Total number of lookups made against the cache
    pub requests: u64,

    /// Number of lookups answered from a live entry
    pub cache_hits: u64,

    /// Number of values written into the cache after a miss
    pub insertions: u64,

    /// Number of live values dropped to make room
    pub evictions: u64,
}

impl CoreCacheMetrics {
    /// Creates a zeroed metrics block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a cache hit
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.cache_hits += 1;
    }

    /// Records a cache miss
    ///
    /// Cache misses are derived as (requests - cache_hits).
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    /// Records a value written after a successful load
    pub fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    /// Records an eviction of a live value
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Number of lookups that were not answered from the cache
    pub fn cache_misses(&self) -> u64 {
        self.requests - self.cache_hits
    }

    /// Calculates the cache hit rate
    ///
    /// # Returns
    /// A value between 0.0 and 1.0, or 0.0 if no requests have been made
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Calculates the cache miss rate
    ///
    /// # Returns
    /// A value between 0.0 and 1.0, or 0.0 if no requests have been made
    pub fn miss_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_misses() as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Convert core metrics to BTreeMap for reporting
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert("cache_misses".to_string(), self.cache_misses() as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("requests".to_string(), self.requests as f64);

        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        if self.requests > 0 {
            metrics.insert(
                "eviction_rate".to_string(),
                self.evictions as f64 / self.requests as f64,
            );
        }

        metrics
    }
}

/// Trait that caches implement for metrics reporting
///
/// The trait uses BTreeMap to ensure deterministic ordering of metrics.
pub trait CacheMetrics {
    /// Returns all metrics as key-value pairs in deterministic order
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Algorithm name for identification (e.g. "ARC")
    fn algorithm_name(&self) -> &'static str;
}
