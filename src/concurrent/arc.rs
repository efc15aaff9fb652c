//! Concurrent ARC Cache Implementation
//!
//! The multi-threaded counterpart to [`ArcCache`](crate::ArcCache): the same
//! segment, behind a `parking_lot::Mutex`.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │             ConcurrentArcCache               │
//! │                                              │
//! │  get(key, loader) ──▶ lock ──▶ ArcSegment    │
//! │                         │     (T1 T2 B1 B2)  │
//! │  value.clone()  ◀── unlock ◀──┘              │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Values leave the lock by clone. Use [`get_with`](ConcurrentArcCache::get_with)
//! to read a value in place instead.

extern crate alloc;

use crate::arc::ArcSegment;
use crate::config::ArcCacheConfig;
use crate::error::InvariantViolation;
use crate::metrics::CacheMetrics;
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::borrow::Borrow;
use core::convert::Infallible;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;
use parking_lot::Mutex;

#[cfg(feature = "hashbrown")]
use hashbrown::DefaultHashBuilder;

#[cfg(not(feature = "hashbrown"))]
use std::collections::hash_map::RandomState as DefaultHashBuilder;

/// A thread-safe ARC cache.
///
/// # Type Parameters
///
/// - `K`: Key type. Must implement `Hash + Eq + Clone + Send`.
/// - `V`: Value type. Must implement `Clone + Send`.
/// - `S`: Hash builder type. Defaults to `DefaultHashBuilder`.
///
/// # Example
///
/// ```rust
/// use arc_cache::concurrent::ConcurrentArcCache;
/// use core::num::NonZeroUsize;
///
/// let cache = ConcurrentArcCache::new(NonZeroUsize::new(2).unwrap());
///
/// assert_eq!(cache.get("key".to_string(), || 42), 42);
/// assert_eq!(cache.get("key".to_string(), || unreachable!()), 42);
/// ```
pub struct ConcurrentArcCache<K, V, S = DefaultHashBuilder> {
    segment: Mutex<ArcSegment<K, V, S>>,
}

impl<K, V> ConcurrentArcCache<K, V, DefaultHashBuilder>
where
    K: Hash + Eq + Clone + Send,
    V: Clone + Send,
{
    /// Creates a new concurrent ARC cache holding at most `cap` values.
    pub fn new(cap: NonZeroUsize) -> Self {
        Self::init(ArcCacheConfig::new(cap), None)
    }

    /// Creates a new concurrent ARC cache from a configuration with an optional hasher.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration specifying the capacity
    /// * `hasher` - Optional custom hash builder. If `None`, uses `DefaultHashBuilder`
    pub fn init(config: ArcCacheConfig, hasher: Option<DefaultHashBuilder>) -> Self {
        Self {
            segment: Mutex::new(ArcSegment::init(config, hasher.unwrap_or_default())),
        }
    }
}

impl<K, V, S> ConcurrentArcCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Clone + Send,
    S: BuildHasher + Clone + Send,
{
    /// Creates a concurrent ARC cache with a custom hash builder.
    pub fn with_hasher(cap: NonZeroUsize, hash_builder: S) -> Self {
        Self {
            segment: Mutex::new(ArcSegment::init(ArcCacheConfig::new(cap), hash_builder)),
        }
    }

    /// Returns the maximum number of live values.
    pub fn cap(&self) -> NonZeroUsize {
        self.segment.lock().cap()
    }

    /// Returns the number of live values.
    pub fn len(&self) -> usize {
        self.segment.lock().len()
    }

    /// Returns `true` if the cache holds no values.
    pub fn is_empty(&self) -> bool {
        self.segment.lock().is_empty()
    }

    /// Returns the current target size of T1.
    pub fn partition(&self) -> usize {
        self.segment.lock().partition()
    }

    /// Returns a **clone** of the value for `key`, loading it on a miss.
    ///
    /// The lock is held while `loader` runs. See the [module docs](crate::concurrent)
    /// for what the loader must not do.
    pub fn get<F>(&self, key: K, loader: F) -> V
    where
        F: FnOnce() -> V,
    {
        self.get_with(key, loader, V::clone)
    }

    /// Like [`get`](Self::get), for loaders that can fail.
    ///
    /// The loader's error is returned unchanged and the cache is left as it was.
    pub fn try_get<F, E>(&self, key: K, loader: F) -> Result<V, E>
    where
        F: FnOnce() -> Result<V, E>,
    {
        let mut segment = self.segment.lock();
        segment.try_get(key, loader).cloned()
    }

    /// Gets or loads the value for `key` and applies `f` to it while holding the lock.
    ///
    /// Avoids cloning the value when only part of it is needed.
    ///
    /// ```rust
    /// use arc_cache::concurrent::ConcurrentArcCache;
    /// use core::num::NonZeroUsize;
    ///
    /// let cache = ConcurrentArcCache::new(NonZeroUsize::new(8).unwrap());
    /// let len = cache.get_with(1, || "hello world".to_string(), |v: &String| v.len());
    /// assert_eq!(len, 11);
    /// ```
    pub fn get_with<F, R, G>(&self, key: K, loader: F, f: G) -> R
    where
        F: FnOnce() -> V,
        G: FnOnce(&V) -> R,
    {
        let mut segment = self.segment.lock();
        match segment.try_get(key, || Ok::<V, Infallible>(loader())) {
            Ok(value) => f(value),
            Err(never) => match never {},
        }
    }

    /// Returns a clone of the live value for `key` without touching recency.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().peek(key).cloned()
    }

    /// Returns `true` if `key` has a live value. Does not touch recency.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.segment.lock().contains(key)
    }

    /// Drops all values and ghosts and resets the partition.
    pub fn clear(&self) {
        self.segment.lock().clear();
    }

    /// Verifies the list bookkeeping under the lock.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.segment.lock().check_invariants()
    }
}

impl<K, V, S> CacheMetrics for ConcurrentArcCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Clone + Send,
    S: BuildHasher + Clone + Send,
{
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.segment.lock().metrics().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        "ConcurrentARC"
    }
}

impl<K, V, S> core::fmt::Debug for ConcurrentArcCache<K, V, S>
where
    K: Hash + Eq + Clone + Send,
    V: Clone + Send,
    S: BuildHasher + Clone + Send,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let segment = self.segment.lock();
        f.debug_struct("ConcurrentArcCache")
            .field("capacity", &segment.cap())
            .field("len", &segment.len())
            .field("partition", &segment.partition())
            .finish()
    }
}
