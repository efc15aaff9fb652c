//! Error types for the ARC cache.
//!
//! The cache has exactly two failure modes:
//!
//! - [`InvariantViolation`]: an internal list operation was asked to act on a key
//!   or position that does not exist, or [`check_invariants`] found the four lists
//!   out of sync with the value map. This only happens if the cache structure is
//!   corrupted. The `get` path treats it as fatal and panics.
//! - Loader failure: whatever error the caller's loader returns. It is handed back
//!   unchanged by [`ArcCache::try_get`] and needs no type of its own.
//!
//! [`check_invariants`]: crate::ArcCache::check_invariants
//! [`ArcCache::try_get`]: crate::ArcCache::try_get

use core::fmt;

/// Error raised when the ARC bookkeeping is inconsistent.
///
/// # Examples
///
/// ```
/// use arc_cache::error::InvariantViolation;
///
/// let err = InvariantViolation::EmptyList { list: "B1" };
/// assert_eq!(err.to_string(), "pop_back on empty list B1");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// A key expected in `list` was not there.
    MissingKey {
        /// Name of the list that was searched.
        list: &'static str,
    },
    /// The tail of `list` was requested while it was empty.
    EmptyList {
        /// Name of the empty list.
        list: &'static str,
    },
    /// A cross-list invariant does not hold.
    Inconsistent(&'static str),
}

impl InvariantViolation {
    /// Returns the name of the list involved, if the violation concerns one list.
    pub fn list(&self) -> Option<&'static str> {
        match self {
            InvariantViolation::MissingKey { list } | InvariantViolation::EmptyList { list } => {
                Some(list)
            }
            InvariantViolation::Inconsistent(_) => None,
        }
    }
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvariantViolation::MissingKey { list } => write!(f, "key not found in list {list}"),
            InvariantViolation::EmptyList { list } => write!(f, "pop_back on empty list {list}"),
            InvariantViolation::Inconsistent(detail) => f.write_str(detail),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvariantViolation {}
