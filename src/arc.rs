//! Adaptive Replacement Cache (ARC) Implementation
//!
//! ARC balances recency against frequency and retunes that balance on every miss
//! that hits its eviction history. Scans that would flush an LRU cache mostly churn
//! through the recency side, while keys that keep coming back settle on the
//! frequency side.
//!
//! # How the Algorithm Works
//!
//! The cache keeps four ordered key lists. Two of them hold live entries, two of them
//! only remember keys that were recently evicted ("ghosts"):
//!
//! ```text
//!            ◀── partition (target size of T1) ──▶
//!   ┌────────────────────────────┬────────────────────────────┐
//!   │ B1 ghosts │ T1 seen once   │ T2 seen twice+ │ B2 ghosts │
//!   │ (keys)    │ (keys+values)  │ (keys+values)  │ (keys)    │
//!   └────────────────────────────┴────────────────────────────┘
//!                │◀──────── capacity live ──────▶│
//! ```
//!
//! - **T1**: keys accessed exactly once recently.
//! - **T2**: keys accessed at least twice recently.
//! - **B1** / **B2**: keys recently evicted from T1 / T2. No values are kept.
//!
//! Every access goes through [`ArcCache::get`] (or [`ArcCache::try_get`]):
//!
//! 1. Hit in T1: the key moves to the front of T2.
//! 2. Hit in T2: the key moves to the front of T2.
//! 3. Miss: the loader runs, then
//!    - ghost hit in B1: the partition grows by `max(|B2| / |B1|, 1)`, one entry is
//!      replaced, and the key enters T2;
//!    - ghost hit in B2: the partition shrinks by `max(|B1| / |B2|, 1)`, one entry is
//!      replaced, and the key enters T2;
//!    - unknown key: room is made (see below) and the key enters T1.
//!
//! To make room for an unknown key when `|T1| + |B1| == capacity`, the oldest B1
//! ghost is forgotten and one entry is replaced, or, if T1 alone fills the cache,
//! T1's oldest entry is dropped outright without leaving a ghost. Otherwise, once
//! the four lists track `capacity` keys or more, the oldest B2 ghost is forgotten
//! when the lists are at `2 × capacity`, and one entry is replaced.
//!
//! Replacing evicts T1's oldest entry into B1 when T1 is above its target (or exactly
//! at it while the incoming key is a B2 ghost), and T2's oldest entry into B2
//! otherwise.
//!
//! # Performance Characteristics
//!
//! - **Time Complexity**: every step of `get` is O(1) (hash lookups plus linked list
//!   relinks).
//! - **Space Complexity**: O(capacity) values and up to 2 × capacity keys.
//!
//! # Thread Safety
//!
//! `ArcCache` is not thread-safe: `get` takes `&mut self`. Wrap it in a `Mutex` held
//! for the whole call, or use `ConcurrentArcCache` (`concurrent` feature), which does
//! exactly that.
//!
//! The loader runs while the cache is mutably borrowed, so it cannot call back into
//! the same cache.

use crate::config::ArcCacheConfig;
use crate::error::InvariantViolation;
use crate::key_set::{KeySet, Keys};
use crate::metrics::{ArcCacheMetrics, CacheMetrics};
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::borrow::Borrow;
use core::cmp;
use core::convert::Infallible;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;
use tracing::{debug, error, trace};

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// Identifies one of the four ARC lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArcList {
    /// Live keys seen once recently.
    T1,
    /// Live keys seen at least twice recently.
    T2,
    /// Ghost keys evicted from T1.
    B1,
    /// Ghost keys evicted from T2.
    B2,
}

impl ArcList {
    /// All four lists, live ones first.
    pub const ALL: [ArcList; 4] = [ArcList::T1, ArcList::T2, ArcList::B1, ArcList::B2];

    /// Short name of the list.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArcList::T1 => "T1",
            ArcList::T2 => "T2",
            ArcList::B1 => "B1",
            ArcList::B2 => "B2",
        }
    }

    /// Returns `true` for the lists that only remember keys.
    pub fn is_ghost(&self) -> bool {
        matches!(self, ArcList::B1 | ArcList::B2)
    }
}

impl fmt::Display for ArcList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Internal ARC segment containing the actual cache algorithm.
///
/// This is shared between `ArcCache` (single-threaded) and
/// `ConcurrentArcCache` (one lock around a segment). All algorithm logic is
/// implemented here.
pub(crate) struct ArcSegment<K, V, S = DefaultHashBuilder> {
    config: ArcCacheConfig,
    /// Target size of T1, always within `0..=capacity`.
    p: usize,
    t1: KeySet<K, S>,
    t2: KeySet<K, S>,
    b1: KeySet<K, S>,
    b2: KeySet<K, S>,
    /// Values of exactly the keys in T1 and T2.
    data: HashMap<K, V, S>,
    metrics: ArcCacheMetrics,
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher + Clone> ArcSegment<K, V, S> {
    pub(crate) fn init(config: ArcCacheConfig, hash_builder: S) -> Self {
        let cap = config.capacity.get();
        ArcSegment {
            config,
            p: 0,
            t1: KeySet::with_hasher("T1", cap, hash_builder.clone()),
            t2: KeySet::with_hasher("T2", cap, hash_builder.clone()),
            b1: KeySet::with_hasher("B1", cap, hash_builder.clone()),
            b2: KeySet::with_hasher("B2", cap, hash_builder.clone()),
            data: HashMap::with_capacity_and_hasher(cap, hash_builder),
            metrics: ArcCacheMetrics::new(cap as u64),
        }
    }

    #[inline]
    pub(crate) fn cap(&self) -> NonZeroUsize {
        self.config.capacity
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub(crate) fn partition(&self) -> usize {
        self.p
    }

    #[inline]
    pub(crate) fn metrics(&self) -> &ArcCacheMetrics {
        &self.metrics
    }

    pub(crate) fn list(&self, which: ArcList) -> &KeySet<K, S> {
        match which {
            ArcList::T1 => &self.t1,
            ArcList::T2 => &self.t2,
            ArcList::B1 => &self.b1,
            ArcList::B2 => &self.b2,
        }
    }

    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.data.contains_key(key)
    }

    pub(crate) fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.data.get(key)
    }

    pub(crate) fn is_ghost<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.b1.contains(key) || self.b2.contains(key)
    }

    /// Returns the cached value for `key`, loading it with `loader` on a miss.
    ///
    /// The loader runs before any list is touched, so an `Err` leaves the segment as
    /// it was.
    pub(crate) fn try_get<F, E>(&mut self, key: K, loader: F) -> Result<&V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        if self.t1.contains(&key) || self.t2.contains(&key) {
            if let Err(violation) = self.touch(&key) {
                corrupted(violation);
            }
        } else {
            let value = match loader() {
                Ok(value) => value,
                Err(err) => {
                    self.metrics.record_loader_failure();
                    return Err(err);
                }
            };
            self.metrics.record_load();
            if let Err(violation) = self.admit(key.clone(), value) {
                corrupted(violation);
            }
        }
        self.update_gauges();

        match self.data.get(&key) {
            Some(value) => Ok(value),
            None => corrupted(InvariantViolation::Inconsistent(
                "live key has no cached value",
            )),
        }
    }

    /// Handles a hit in T1 or T2.
    fn touch(&mut self, key: &K) -> Result<(), InvariantViolation> {
        if self.t1.contains(key) {
            let key = self.t1.remove(key)?;
            self.t2.push_front(key);
            self.metrics.record_recent_hit();
        } else {
            self.t2.move_to_front(key)?;
            self.metrics.record_frequent_hit();
        }
        Ok(())
    }

    /// Stores a freshly loaded value and files its key under the right list.
    fn admit(&mut self, key: K, value: V) -> Result<(), InvariantViolation> {
        let cap = self.cap().get();
        // The new key is in neither T1 nor T2, so `replace` cannot evict it.
        self.data.insert(key.clone(), value);

        if self.b1.contains(&key) {
            let p_was = self.p;
            let delta = cmp::max(self.b2.len() / self.b1.len(), 1);
            self.p = cmp::min(cap, self.p + delta);
            trace!(p_was, p = self.p, "B1 ghost hit");
            self.metrics.record_recent_ghost_hit();

            self.replace(&key)?;
            let key = self.b1.remove(&key)?;
            self.t2.push_front(key);
            return Ok(());
        }

        if self.b2.contains(&key) {
            let p_was = self.p;
            let delta = cmp::max(self.b1.len() / self.b2.len(), 1);
            self.p = self.p.saturating_sub(delta);
            trace!(p_was, p = self.p, "B2 ghost hit");
            self.metrics.record_frequent_ghost_hit();

            self.replace(&key)?;
            let key = self.b2.remove(&key)?;
            self.t2.push_front(key);
            return Ok(());
        }

        if self.t1.len() + self.b1.len() == cap {
            if self.t1.len() < cap {
                self.b1.pop_back()?;
                self.metrics.record_ghost_drop();
                self.replace(&key)?;
            } else {
                let old = self.t1.pop_back()?;
                self.data.remove(&old);
                self.metrics.record_direct_drop();
                trace!("T1 fills the cache, tail dropped without a ghost");
            }
        } else {
            let total = self.t1.len() + self.t2.len() + self.b1.len() + self.b2.len();
            if total >= cap {
                if total == 2 * cap {
                    self.b2.pop_back()?;
                    self.metrics.record_ghost_drop();
                }
                self.replace(&key)?;
            }
        }

        self.t1.push_front(key);
        Ok(())
    }

    /// Evicts one live entry into its ghost list.
    ///
    /// The order of the conditions matters when `|T1| == p == 0`.
    fn replace(&mut self, key: &K) -> Result<(), InvariantViolation> {
        let t1_len = self.t1.len();
        let (from, to) = if (t1_len > 0 && self.b2.contains(key) && t1_len == self.p)
            || t1_len > self.p
        {
            self.metrics.record_recent_eviction();
            (&mut self.t1, &mut self.b1)
        } else {
            self.metrics.record_frequent_eviction();
            (&mut self.t2, &mut self.b2)
        };

        let old = from.pop_back()?;
        trace!(from = from.name(), to = to.name(), "evicted into ghost list");
        self.data.remove(&old);
        to.push_front(old);
        Ok(())
    }

    fn update_gauges(&mut self) {
        self.metrics.update_state(
            self.p,
            [self.t1.len(), self.t2.len(), self.b1.len(), self.b2.len()],
        );
    }

    /// Drops every value and ghost and resets the partition.
    pub(crate) fn clear(&mut self) {
        debug!(len = self.data.len(), "clearing ARC cache");
        self.t1.clear();
        self.t2.clear();
        self.b1.clear();
        self.b2.clear();
        self.data.clear();
        self.p = 0;
        self.update_gauges();
    }

    pub(crate) fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let cap = self.cap().get();
        let lists = [&self.t1, &self.t2, &self.b1, &self.b2];

        for list in lists {
            list.check()?;
        }
        for (i, list) in lists.iter().enumerate() {
            for key in list.iter() {
                if lists[i + 1..].iter().any(|other| other.contains(key)) {
                    return Err(InvariantViolation::Inconsistent(
                        "key present in more than one list",
                    ));
                }
            }
        }

        if self.data.len() != self.t1.len() + self.t2.len() {
            return Err(InvariantViolation::Inconsistent(
                "value map size differs from |T1| + |T2|",
            ));
        }
        if self
            .t1
            .iter()
            .chain(self.t2.iter())
            .any(|key| !self.data.contains_key(key))
        {
            return Err(InvariantViolation::Inconsistent(
                "live key has no cached value",
            ));
        }
        if self.data.len() > cap {
            return Err(InvariantViolation::Inconsistent(
                "live entries exceed capacity",
            ));
        }
        if self.p > cap {
            return Err(InvariantViolation::Inconsistent(
                "partition exceeds capacity",
            ));
        }
        if self.t1.len() + self.b1.len() > cap {
            return Err(InvariantViolation::Inconsistent(
                "|T1| + |B1| exceeds capacity",
            ));
        }
        let total = self.t1.len() + self.t2.len() + self.b1.len() + self.b2.len();
        if total > 2 * cap {
            return Err(InvariantViolation::Inconsistent(
                "tracked keys exceed twice the capacity",
            ));
        }
        // Ghosts exist only once the cache has filled
        if self.data.len() < cap && !(self.b1.is_empty() && self.b2.is_empty()) {
            return Err(InvariantViolation::Inconsistent(
                "ghost keys tracked while the cache has free slots",
            ));
        }
        Ok(())
    }
}

#[cold]
#[inline(never)]
fn corrupted(violation: InvariantViolation) -> ! {
    error!(%violation, "ARC bookkeeping corrupted");
    panic!("ARC cache invariant violated: {}", violation)
}

impl<K, V, S> fmt::Debug for ArcSegment<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArcSegment")
            .field("capacity", &self.config.capacity)
            .field("partition", &self.p)
            .field("len", &self.data.len())
            .field("t1", &self.t1)
            .field("t2", &self.t2)
            .field("b1", &self.b1)
            .field("b2", &self.b2)
            .finish()
    }
}

/// An Adaptive Replacement Cache.
///
/// The cache has a fixed capacity of live entries. Lookups and insertions are a single
/// operation: [`get`](ArcCache::get) returns the cached value or calls the loader and
/// caches what it returns.
///
/// # Examples
///
/// ```
/// use arc_cache::ArcCache;
/// use core::num::NonZeroUsize;
///
/// let mut cache = ArcCache::new(NonZeroUsize::new(2).unwrap());
///
/// // Misses call the loader
/// assert_eq!(cache.get("apple", || 1), &1);
/// assert_eq!(cache.get("banana", || 2), &2);
///
/// // Hits do not
/// assert_eq!(cache.get("apple", || unreachable!()), &1);
///
/// // "apple" was seen twice, so a new key pushes out "banana" instead
/// cache.get("cherry", || 3);
/// assert!(cache.contains(&"apple"));
/// assert!(!cache.contains(&"banana"));
/// assert!(cache.is_ghost(&"banana"));
/// ```
pub struct ArcCache<K, V, S = DefaultHashBuilder> {
    segment: ArcSegment<K, V, S>,
}

impl<K: Hash + Eq + Clone, V> ArcCache<K, V> {
    /// Creates a new ARC cache holding at most `cap` values.
    pub fn new(cap: NonZeroUsize) -> ArcCache<K, V, DefaultHashBuilder> {
        ArcCache::with_hasher(cap, DefaultHashBuilder::default())
    }

    /// Creates a new ARC cache from a configuration.
    ///
    /// # Arguments
    /// * `config` - The cache configuration
    /// * `hasher` - Optional custom hasher. If `None`, uses the default hasher.
    pub fn init(
        config: ArcCacheConfig,
        hasher: Option<DefaultHashBuilder>,
    ) -> ArcCache<K, V, DefaultHashBuilder> {
        ArcCache {
            segment: ArcSegment::init(config, hasher.unwrap_or_default()),
        }
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher + Clone> ArcCache<K, V, S> {
    /// Creates a new ARC cache with the specified capacity and hash builder.
    pub fn with_hasher(cap: NonZeroUsize, hash_builder: S) -> Self {
        Self {
            segment: ArcSegment::init(ArcCacheConfig::new(cap), hash_builder),
        }
    }

    /// Returns the maximum number of live values.
    #[inline]
    pub fn cap(&self) -> NonZeroUsize {
        self.segment.cap()
    }

    /// Returns the number of live values.
    #[inline]
    pub fn len(&self) -> usize {
        self.segment.len()
    }

    /// Returns `true` if no values are cached.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.segment.is_empty()
    }

    /// Returns the current target size of T1.
    #[inline]
    pub fn partition(&self) -> usize {
        self.segment.partition()
    }

    /// Returns the value for `key`, calling `loader` to produce it on a miss.
    ///
    /// `loader` runs at most once and only when `key` has no live value.
    #[inline]
    pub fn get<F>(&mut self, key: K, loader: F) -> &V
    where
        F: FnOnce() -> V,
    {
        match self.segment.try_get(key, || Ok::<V, Infallible>(loader())) {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Like [`get`](ArcCache::get), for loaders that can fail.
    ///
    /// A loader error is returned unchanged and the cache is left exactly as it was
    /// before the call.
    ///
    /// ```
    /// use arc_cache::ArcCache;
    /// use core::num::NonZeroUsize;
    ///
    /// let mut cache: ArcCache<u32, String> = ArcCache::new(NonZeroUsize::new(4).unwrap());
    /// let err = cache.try_get(7, || Err("backend down")).unwrap_err();
    /// assert_eq!(err, "backend down");
    /// assert!(cache.is_empty());
    ///
    /// let v = cache.try_get(7, || Ok::<_, &str>("seven".to_string())).unwrap();
    /// assert_eq!(v, "seven");
    /// ```
    #[inline]
    pub fn try_get<F, E>(&mut self, key: K, loader: F) -> Result<&V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        self.segment.try_get(key, loader)
    }

    /// Returns `true` if `key` has a live value. Does not touch recency.
    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.contains(key)
    }

    /// Returns the live value for `key` without updating any list or metric.
    #[inline]
    pub fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.peek(key)
    }

    /// Returns `true` if `key` was evicted recently and is remembered in B1 or B2.
    #[inline]
    pub fn is_ghost<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.is_ghost(key)
    }

    /// Returns the number of keys in one of the four lists.
    #[inline]
    pub fn list_len(&self, which: ArcList) -> usize {
        self.segment.list(which).len()
    }

    /// Iterates over the keys of one list, most recently touched first.
    pub fn keys(&self, which: ArcList) -> Keys<'_, K> {
        self.segment.list(which).iter()
    }

    /// Drops all values and ghosts and resets the partition to 0.
    ///
    /// Metric counters are kept.
    #[inline]
    pub fn clear(&mut self) {
        self.segment.clear()
    }

    /// Verifies the list bookkeeping.
    ///
    /// Checks that every key is in at most one list, that values exist for exactly
    /// the T1 and T2 keys, and that all size bounds hold.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.segment.check_invariants()
    }

    /// Returns the ARC-specific metrics.
    #[inline]
    pub fn arc_metrics(&self) -> &ArcCacheMetrics {
        self.segment.metrics()
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher + Clone> CacheMetrics for ArcCache<K, V, S> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        self.segment.metrics().algorithm_name()
    }
}

impl<K, V, S> fmt::Debug for ArcCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArcCache")
            .field("segment", &self.segment)
            .finish()
    }
}
