//! Concurrent Cache Implementation
//!
//! This module provides a thread-safe wrapper around the ARC algorithm.
//!
//! # Architecture
//!
//! [`ConcurrentArcCache`] guards a single ARC segment with one `parking_lot::Mutex`.
//! The lock is held for the whole get-or-load call, loader included, so the four
//! lists and the partition are always observed in a consistent state.
//!
//! ## Why One Mutex?
//!
//! Every `get()` rewrites ARC state: a hit promotes a key into T2, a miss may move the
//! partition and shuffle keys between live and ghost lists. A `RwLock` would take the
//! write side on every call anyway.
//!
//! Splitting keys across several independently locked segments would give each shard
//! its own partition and its own ghost history, so the adaptation would no longer see
//! the whole workload. The cache keeps one global ARC instead.
//!
//! # Loader Rules
//!
//! - The loader runs while the lock is held. Slow loaders block every other caller.
//! - A loader that calls back into the same cache deadlocks. Don't.
//! - A loader error releases the lock and leaves the cache untouched.
//!
//! # Example
//!
//! ```rust
//! use arc_cache::concurrent::ConcurrentArcCache;
//! use core::num::NonZeroUsize;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let cache = Arc::new(ConcurrentArcCache::new(NonZeroUsize::new(100).unwrap()));
//!
//! let handles: Vec<_> = (0..4).map(|t| {
//!     let cache = Arc::clone(&cache);
//!     thread::spawn(move || {
//!         for i in 0..250u64 {
//!             let key = (t * 31 + i) % 150;
//!             assert_eq!(cache.get(key, || key * 2), key * 2);
//!         }
//!     })
//! }).collect();
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//!
//! assert!(cache.len() <= 100);
//! ```

mod arc;

pub use self::arc::ConcurrentArcCache;
