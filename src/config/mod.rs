//! Cache Configuration Module
//!
//! Configuration structs have all public fields for simple instantiation:
//!
//! - **Simple**: Just create the struct with all fields set
//! - **Type safety**: A zero capacity is unrepresentable (`NonZeroUsize`)
//! - **No boilerplate**: No builder needed
//!
//! | Config | Cache | Description |
//! |--------|-------|-------------|
//! | `ArcCacheConfig` | [`ArcCache`](crate::ArcCache) | Adaptive Replacement Cache |
//! | `ArcCacheConfig` | `ConcurrentArcCache` (`concurrent` feature) | Same cache behind one lock |
//!
//! # Examples
//!
//! ```
//! use arc_cache::config::ArcCacheConfig;
//! use arc_cache::ArcCache;
//! use core::num::NonZeroUsize;
//!
//! let config = ArcCacheConfig {
//!     capacity: NonZeroUsize::new(1000).unwrap(),
//! };
//! let cache: ArcCache<String, i32> = ArcCache::init(config, None);
//! assert!(cache.is_empty());
//! ```

pub mod arc;

pub use arc::ArcCacheConfig;
