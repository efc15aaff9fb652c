//! Ordered key set with O(1) membership, reordering, and removal.
//!
//! ```text
//!   index: HashMap<K, *mut Entry<K>>        list: List<K>
//!   ┌─────────┬─────────┐                   head ─► [A] ◄──► [B] ◄──► [C] ◄── tail
//!   │  key A  │  node_a │                          front                back
//!   │  key B  │  node_b │                     (most recent)      (least recent)
//!   │  key C  │  node_c │
//!   └─────────┴─────────┘
//! ```
//!
//! The ARC cache keeps four of these (T1, T2, B1, B2). Each set only stores keys; values
//! live in the cache's own map.

use crate::error::InvariantViolation;
use crate::list::{self, Entry, List};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};

#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// A set of unique keys kept in recency order.
///
/// # Safety
///
/// `index` stores raw pointers into `list`. They are valid as long as:
/// - The pointer was obtained from `list.push_front()`
/// - The node has not been removed from `list`
/// - The set has not been dropped
pub(crate) struct KeySet<K, S> {
    name: &'static str,
    list: List<K>,
    index: HashMap<K, *mut Entry<K>, S>,
}

// SAFETY: KeySet owns every node its raw pointers refer to. Concurrent access is safe
// when wrapped in proper synchronization primitives.
unsafe impl<K: Send, S: Send> Send for KeySet<K, S> {}

// SAFETY: All mutation requires &mut self; shared references cannot cause data races.
unsafe impl<K: Sync, S: Sync> Sync for KeySet<K, S> {}

impl<K: Hash + Eq + Clone, S: BuildHasher> KeySet<K, S> {
    /// Creates an empty set. `name` shows up in violation reports.
    pub(crate) fn with_hasher(name: &'static str, capacity: usize, hash_builder: S) -> Self {
        KeySet {
            name,
            list: List::new(),
            index: HashMap::with_capacity_and_hasher(capacity, hash_builder),
        }
    }

    #[inline]
    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub(crate) fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    #[inline]
    pub(crate) fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.index.contains_key(key)
    }

    /// Inserts `key` at the front. The key must not already be in the set.
    pub(crate) fn push_front(&mut self, key: K) {
        debug_assert!(
            !self.index.contains_key(&key),
            "push_front of a key already in {}",
            self.name
        );
        let node = self.list.push_front(key.clone());
        self.index.insert(key, node);
    }

    /// Relinks an existing key at the front without reallocating its node.
    pub(crate) fn move_to_front<Q>(&mut self, key: &Q) -> Result<(), InvariantViolation>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = self.node(key)?;
        // SAFETY: node comes from our index
        unsafe { self.list.move_to_front(node) };
        Ok(())
    }

    /// Removes `key` from anywhere in the set and hands back the owned key.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Result<K, InvariantViolation>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let node = self
            .index
            .remove(key)
            .ok_or(InvariantViolation::MissingKey { list: self.name })?;
        // SAFETY: node comes from our index and was just unregistered
        Ok(unsafe { self.list.remove(node) })
    }

    /// Removes and returns the least recently touched key.
    pub(crate) fn pop_back(&mut self) -> Result<K, InvariantViolation> {
        let key = self
            .list
            .pop_back()
            .ok_or(InvariantViolation::EmptyList { list: self.name })?;
        self.index.remove(&key);
        Ok(key)
    }

    pub(crate) fn iter(&self) -> Keys<'_, K> {
        Keys {
            inner: self.list.iter(),
        }
    }

    pub(crate) fn clear(&mut self) {
        self.index.clear();
        self.list.clear();
    }

    /// Confirms the index and the list describe the same keys.
    pub(crate) fn check(&self) -> Result<(), InvariantViolation> {
        if self.index.len() != self.list.len() {
            return Err(InvariantViolation::Inconsistent(
                "key set index and list lengths differ",
            ));
        }
        if self.list.iter().any(|key| !self.index.contains_key(key)) {
            return Err(InvariantViolation::MissingKey { list: self.name });
        }
        Ok(())
    }

    fn node<Q>(&self, key: &Q) -> Result<*mut Entry<K>, InvariantViolation>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.index
            .get(key)
            .copied()
            .ok_or(InvariantViolation::MissingKey { list: self.name })
    }
}

impl<K, S> fmt::Debug for KeySet<K, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeySet")
            .field("name", &self.name)
            .field("len", &self.list.len())
            .finish()
    }
}

/// Iterator over the keys of one ARC list, from most to least recently touched.
///
/// Returned by [`ArcCache::keys`](crate::ArcCache::keys).
pub struct Keys<'a, K> {
    inner: list::Iter<'a, K>,
}

impl<'a, K> Iterator for Keys<'a, K> {
    type Item = &'a K;

    #[inline]
    fn next(&mut self) -> Option<&'a K> {
        self.inner.next()
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K> ExactSizeIterator for Keys<'_, K> {}

impl<K> fmt::Debug for Keys<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Keys")
            .field("remaining", &self.inner.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use alloc::vec::Vec;

    #[cfg(feature = "hashbrown")]
    use hashbrown::DefaultHashBuilder;

    #[cfg(not(feature = "hashbrown"))]
    use std::collections::hash_map::RandomState as DefaultHashBuilder;

    fn make_set<K: Hash + Eq + Clone>() -> KeySet<K, DefaultHashBuilder> {
        KeySet::with_hasher("T1", 8, DefaultHashBuilder::default())
    }

    fn keys<K: Hash + Eq + Clone>(set: &KeySet<K, DefaultHashBuilder>) -> Vec<K> {
        set.iter().cloned().collect()
    }

    #[test]
    fn test_push_front_and_contains() {
        let mut set = make_set();
        assert!(set.is_empty());
        set.push_front(1);
        set.push_front(2);
        assert_eq!(set.len(), 2);
        assert!(set.contains(&1));
        assert!(set.contains(&2));
        assert!(!set.contains(&3));
        assert_eq!(keys(&set), [2, 1]);
    }

    #[test]
    fn test_move_to_front() {
        let mut set = make_set();
        for k in [1, 2, 3] {
            set.push_front(k);
        }
        set.move_to_front(&1).unwrap();
        assert_eq!(keys(&set), [1, 3, 2]);
        assert_eq!(set.len(), 3);
        set.check().unwrap();
    }

    #[test]
    fn test_move_to_front_missing_key() {
        let mut set = make_set();
        set.push_front(1);
        assert_eq!(
            set.move_to_front(&9),
            Err(InvariantViolation::MissingKey { list: "T1" })
        );
        assert_eq!(keys(&set), [1]);
    }

    #[test]
    fn test_remove_anywhere() {
        let mut set = make_set();
        for k in [1, 2, 3] {
            set.push_front(k);
        }
        assert_eq!(set.remove(&2), Ok(2));
        assert!(!set.contains(&2));
        assert_eq!(keys(&set), [3, 1]);
        set.check().unwrap();
    }

    #[test]
    fn test_remove_missing_key_is_violation() {
        let mut set: KeySet<i32, _> = make_set();
        assert_eq!(
            set.remove(&7),
            Err(InvariantViolation::MissingKey { list: "T1" })
        );
    }

    #[test]
    fn test_pop_back_returns_oldest() {
        let mut set = make_set();
        for k in [1, 2, 3] {
            set.push_front(k);
        }
        assert_eq!(set.pop_back(), Ok(1));
        assert_eq!(set.pop_back(), Ok(2));
        assert!(!set.contains(&1));
        assert_eq!(keys(&set), [3]);
    }

    #[test]
    fn test_pop_back_empty_is_violation() {
        let mut set: KeySet<i32, _> = make_set();
        assert_eq!(
            set.pop_back(),
            Err(InvariantViolation::EmptyList { list: "T1" })
        );
    }

    #[test]
    fn test_borrowed_lookup() {
        let mut set = make_set();
        set.push_front(String::from("apple"));
        set.push_front(String::from("banana"));
        assert!(set.contains("apple"));
        set.move_to_front("apple").unwrap();
        assert_eq!(set.remove("banana"), Ok(String::from("banana")));
        assert_eq!(keys(&set), ["apple"]);
    }

    #[test]
    fn test_clear_resets_both_structures() {
        let mut set = make_set();
        for k in 0..5 {
            set.push_front(k);
        }
        set.clear();
        assert!(set.is_empty());
        assert!(!set.contains(&0));
        set.check().unwrap();
        set.push_front(9);
        assert_eq!(keys(&set), [9]);
    }

    #[test]
    fn test_reinsert_after_remove() {
        let mut set = make_set();
        set.push_front(1);
        set.push_front(2);
        let k = set.remove(&1).unwrap();
        set.push_front(k);
        assert_eq!(keys(&set), [1, 2]);
        set.check().unwrap();
    }
}
