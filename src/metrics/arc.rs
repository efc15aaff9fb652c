//! ARC Cache Metrics
//!
//! Metrics specific to the Adaptive Replacement Cache: where hits land (T1 or T2),
//! how often ghost lists catch a returning key, and where the adaptive partition
//! currently sits.

extern crate alloc;

use super::{CacheMetrics, CoreCacheMetrics};
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// ARC-specific metrics (extends CoreCacheMetrics)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcCacheMetrics {
    /// Core metrics common to all caches
    pub core: CoreCacheMetrics,

    /// Fixed capacity of the cache
    pub capacity: u64,

    /// Hits on keys seen once recently (T1), each one a promotion to T2
    pub recent_hits: u64,

    /// Hits on keys already seen more than once (T2)
    pub frequent_hits: u64,

    /// Misses whose key was still remembered in B1
    pub recent_ghost_hits: u64,

    /// Misses whose key was still remembered in B2
    pub frequent_ghost_hits: u64,

    /// Live values moved from T1 to the B1 ghost list
    pub recent_evictions: u64,

    /// Live values moved from T2 to the B2 ghost list
    pub frequent_evictions: u64,

    /// Ghost keys forgotten from the tail of B1 or B2
    pub ghost_drops: u64,

    /// Values dropped from T1 without leaving a ghost (T1 alone filled the cache)
    pub direct_drops: u64,

    /// Loader invocations that returned an error
    pub loader_failures: u64,

    /// Current adaptive target size for T1
    pub partition: u64,

    /// Current number of keys in T1, T2, B1 and B2
    pub list_sizes: [u64; 4],
}

impl ArcCacheMetrics {
    /// Creates a new ArcCacheMetrics instance for a cache of `capacity` entries
    pub fn new(capacity: u64) -> Self {
        Self {
            core: CoreCacheMetrics::new(),
            capacity,
            recent_hits: 0,
            frequent_hits: 0,
            recent_ghost_hits: 0,
            frequent_ghost_hits: 0,
            recent_evictions: 0,
            frequent_evictions: 0,
            ghost_drops: 0,
            direct_drops: 0,
            loader_failures: 0,
            partition: 0,
            list_sizes: [0; 4],
        }
    }

    /// Records a hit in T1
    pub fn record_recent_hit(&mut self) {
        self.core.record_hit();
        self.recent_hits += 1;
    }

    /// Records a hit in T2
    pub fn record_frequent_hit(&mut self) {
        self.core.record_hit();
        self.frequent_hits += 1;
    }

    /// Records a miss that was followed by a successful load
    pub fn record_load(&mut self) {
        self.core.record_miss();
        self.core.record_insertion();
    }

    /// Records a ghost hit in B1
    pub fn record_recent_ghost_hit(&mut self) {
        self.recent_ghost_hits += 1;
    }

    /// Records a ghost hit in B2
    pub fn record_frequent_ghost_hit(&mut self) {
        self.frequent_ghost_hits += 1;
    }

    /// Records a T1 -> B1 eviction
    pub fn record_recent_eviction(&mut self) {
        self.core.record_eviction();
        self.recent_evictions += 1;
    }

    /// Records a T2 -> B2 eviction
    pub fn record_frequent_eviction(&mut self) {
        self.core.record_eviction();
        self.frequent_evictions += 1;
    }

    /// Records a ghost key falling off B1 or B2
    pub fn record_ghost_drop(&mut self) {
        self.ghost_drops += 1;
    }

    /// Records a T1 tail dropped without a ghost
    pub fn record_direct_drop(&mut self) {
        self.core.record_eviction();
        self.direct_drops += 1;
    }

    /// Records a loader that returned an error
    pub fn record_loader_failure(&mut self) {
        self.loader_failures += 1;
    }

    /// Updates the partition and list size gauges
    pub fn update_state(&mut self, partition: usize, list_sizes: [usize; 4]) {
        self.partition = partition as u64;
        self.list_sizes = list_sizes.map(|len| len as u64);
    }

    /// Fraction of misses that were caught by a ghost list
    pub fn ghost_hit_ratio(&self) -> f64 {
        let misses = self.core.cache_misses();
        if misses > 0 {
            (self.recent_ghost_hits + self.frequent_ghost_hits) as f64 / misses as f64
        } else {
            0.0
        }
    }

    /// Partition as a fraction of capacity (0.0 = all room to T2, 1.0 = all room to T1)
    pub fn partition_ratio(&self) -> f64 {
        if self.capacity > 0 {
            self.partition as f64 / self.capacity as f64
        } else {
            0.0
        }
    }

    /// Converts ARC metrics to a BTreeMap for reporting
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();

        metrics.insert("capacity".to_string(), self.capacity as f64);
        metrics.insert("partition".to_string(), self.partition as f64);
        metrics.insert("partition_ratio".to_string(), self.partition_ratio());

        // List sizes
        let [t1, t2, b1, b2] = self.list_sizes;
        metrics.insert("t1_size".to_string(), t1 as f64);
        metrics.insert("t2_size".to_string(), t2 as f64);
        metrics.insert("b1_size".to_string(), b1 as f64);
        metrics.insert("b2_size".to_string(), b2 as f64);

        // Hit breakdown
        metrics.insert("recent_hits".to_string(), self.recent_hits as f64);
        metrics.insert("frequent_hits".to_string(), self.frequent_hits as f64);
        metrics.insert(
            "recent_ghost_hits".to_string(),
            self.recent_ghost_hits as f64,
        );
        metrics.insert(
            "frequent_ghost_hits".to_string(),
            self.frequent_ghost_hits as f64,
        );
        metrics.insert("ghost_hit_ratio".to_string(), self.ghost_hit_ratio());

        // Eviction breakdown
        metrics.insert("recent_evictions".to_string(), self.recent_evictions as f64);
        metrics.insert(
            "frequent_evictions".to_string(),
            self.frequent_evictions as f64,
        );
        metrics.insert("ghost_drops".to_string(), self.ghost_drops as f64);
        metrics.insert("direct_drops".to_string(), self.direct_drops as f64);

        metrics.insert("loader_failures".to_string(), self.loader_failures as f64);

        metrics
    }
}

impl CacheMetrics for ArcCacheMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "ARC"
    }
}
