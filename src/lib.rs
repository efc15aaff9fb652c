#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## The Four Lists
//!
//! ```text
//!   get(key) ──▶ in T1? ──yes──▶ move to T2 front ─────────────────────┐
//!                 │no                                                   │
//!                 ▼                                                     │
//!               in T2? ──yes──▶ move to T2 front ──────────────────────┤
//!                 │no                                                   │
//!                 ▼                                                     │
//!             loader() ──err──▶ return error, nothing changed           │
//!                 │ok                                                   │
//!                 ▼                                                     │
//!               in B1? ──yes──▶ grow partition, replace, T2 front ─────┤
//!                 │no                                                   │
//!               in B2? ──yes──▶ shrink partition, replace, T2 front ───┤
//!                 │no                                                   │
//!                 ▼                                                     ▼
//!          make room, T1 front ──────────────────────────────────▶ return &value
//! ```
//!
//! ## Quick Reference
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ArcCache`] | Single-threaded ARC, `get` takes `&mut self` |
//! | `ConcurrentArcCache` | The same cache behind one `parking_lot::Mutex` (`concurrent` feature) |
//! | [`ArcCacheConfig`](config::ArcCacheConfig) | Capacity configuration consumed by `init` |
//! | [`ArcCacheMetrics`](metrics::ArcCacheMetrics) | Hit, ghost-hit, eviction and partition counters |
//!
//! ## Performance Characteristics
//!
//! | Operation | Cost | Allocates |
//! |-----------|------|-----------|
//! | hit in T2 | O(1) | no |
//! | hit in T1 | O(1) | one key node |
//! | miss      | O(1) + loader | key node, value slot |
//!
//! Up to `capacity` values and `2 × capacity` keys are held at any time.
//!
//! ## Code Examples
//!
//! ```rust
//! use arc_cache::{ArcCache, ArcList};
//! use arc_cache::config::ArcCacheConfig;
//! use core::num::NonZeroUsize;
//!
//! let config = ArcCacheConfig {
//!     capacity: NonZeroUsize::new(3).unwrap(),
//! };
//! let mut cache: ArcCache<u32, String> = ArcCache::init(config, None);
//!
//! for key in [1, 2, 3, 1, 4] {
//!     cache.get(key, || format!("value-{key}"));
//! }
//!
//! // 1 was read twice and sits in T2; 2 was pushed out but is remembered
//! assert_eq!(cache.keys(ArcList::T2).collect::<Vec<_>>(), [&1]);
//! assert_eq!(cache.keys(ArcList::B1).collect::<Vec<_>>(), [&2]);
//! assert_eq!(cache.peek(&4).map(String::as_str), Some("value-4"));
//! cache.check_invariants().unwrap();
//! ```
//!
//! Fallible loaders go through `try_get`:
//!
//! ```rust
//! use arc_cache::ArcCache;
//! use core::num::NonZeroUsize;
//!
//! fn fetch(id: u32) -> Result<String, String> {
//!     if id == 0 { Err("no such record".into()) } else { Ok(format!("record {id}")) }
//! }
//!
//! let mut cache = ArcCache::new(NonZeroUsize::new(16).unwrap());
//! assert!(cache.try_get(0, || fetch(0)).is_err());
//! assert_eq!(cache.try_get(7, || fetch(7)).unwrap(), "record 7");
//! assert_eq!(cache.len(), 1);
//! ```
//!
//! ## Metrics
//!
//! ```rust
//! use arc_cache::ArcCache;
//! use arc_cache::metrics::CacheMetrics;
//! use core::num::NonZeroUsize;
//!
//! let mut cache = ArcCache::new(NonZeroUsize::new(2).unwrap());
//! cache.get("a", || 1);
//! cache.get("a", || 1);
//!
//! let metrics = cache.metrics();
//! assert_eq!(metrics["cache_hits"], 1.0);
//! assert_eq!(metrics["t2_size"], 1.0);
//! assert_eq!(cache.algorithm_name(), "ARC");
//! ```
//!
//! ## Modules
//!
//! - [`arc`]: The ARC algorithm and the single-threaded cache
//! - [`config`]: Configuration structures
//! - [`metrics`]: Metrics collection for cache performance monitoring
//! - [`error`]: Invariant violation reporting
//! - `concurrent`: Thread-safe cache (requires `concurrent` feature)

#![no_std]

extern crate alloc;

#[cfg(any(test, feature = "std", not(feature = "hashbrown")))]
extern crate std;

#[cfg(test)]
extern crate scoped_threadpool;

/// Doubly linked list with stable node addresses.
///
/// **Note**: This module is internal infrastructure. It exposes unsafe raw pointer
/// operations that require careful invariant maintenance.
pub(crate) mod list;

/// Ordered key sets backing T1, T2, B1 and B2.
pub(crate) mod key_set;

/// Error types.
pub mod error;

/// Cache configuration structures.
pub mod config;

/// Adaptive Replacement Cache (ARC) implementation.
///
/// Provides a fixed-size cache that splits its room between recently and frequently
/// used entries and moves that split based on which side's evictions get re-requested.
pub mod arc;

/// Cache metrics system.
///
/// Provides hit, eviction and partition counters through a common reporting trait.
pub mod metrics;

/// Concurrent cache implementation.
///
/// Available when the `concurrent` feature is enabled.
#[cfg(feature = "concurrent")]
pub mod concurrent;

pub use arc::{ArcCache, ArcList};
pub use error::InvariantViolation;
pub use key_set::Keys;

#[cfg(feature = "concurrent")]
pub use concurrent::ConcurrentArcCache;
