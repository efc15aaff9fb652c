//! Configuration for the Adaptive Replacement Cache (ARC).
//!
//! ARC has a single sizing knob: the number of live entries. The cache additionally
//! remembers up to the same number of recently evicted keys (without their values), so
//! plan for roughly `capacity × (value + 2 × key + ~150 bytes)` of memory.
//!
//! # Examples
//!
//! ```
//! use arc_cache::config::ArcCacheConfig;
//! use arc_cache::ArcCache;
//! use core::num::NonZeroUsize;
//!
//! let config = ArcCacheConfig {
//!     capacity: NonZeroUsize::new(10_000).unwrap(),
//! };
//! let cache: ArcCache<String, Vec<u8>> = ArcCache::init(config, None);
//! assert_eq!(cache.cap().get(), 10_000);
//! ```

use core::fmt;
use core::num::NonZeroUsize;

/// Configuration for an ARC (Adaptive Replacement Cache).
///
/// # Fields
///
/// - `capacity`: Maximum number of live entries. The ghost lists track at most the
///   same number of evicted keys on top of that. A zero capacity cannot be expressed.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct ArcCacheConfig {
    /// Maximum number of key-value pairs the cache can hold.
    pub capacity: NonZeroUsize,
}

impl ArcCacheConfig {
    /// Creates a configuration with the given capacity.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self { capacity }
    }
}

impl From<NonZeroUsize> for ArcCacheConfig {
    fn from(capacity: NonZeroUsize) -> Self {
        Self::new(capacity)
    }
}

impl fmt::Debug for ArcCacheConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArcCacheConfig")
            .field("capacity", &self.capacity)
            .finish()
    }
}
