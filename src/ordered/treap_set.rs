//! Ordered set based on a treap.
//!
//! [`TreapSet`] is a [`TreapMap`] with unit values. It exposes the same
//! structural operations (split, merge, rank) in set vocabulary, with bound
//! queries returning plain `Option<&T>` instead of cursors.
//!
//! # Examples
//!
//! ```rust
//! use ts_collections::ordered::TreapSet;
//!
//! let mut set: TreapSet<i32> = [5, 1, 3].into_iter().collect();
//! assert!(set.insert(4));
//! assert!(!set.insert(4));
//!
//! assert_eq!(set.less(&4), Some(&3));
//! assert_eq!(set.greater_or_equal(&4), Some(&4));
//! assert_eq!(set.greater(&5), None);
//!
//! let upper = set.split_less_or_equal(&3);
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), vec![1, 3]);
//! assert_eq!(upper.iter().copied().collect::<Vec<_>>(), vec![4, 5]);
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::{FromIterator, FusedIterator};
use std::ops::RangeBounds;

use super::comparator::{Comparator, NaturalOrder};
use super::config::TreapConfig;
use super::error::MergeError;
use super::iter::{IntoIter, Keys};
use super::treap_map::TreapMap;

/// An ordered set backed by a treap.
///
/// Complexities match [`TreapMap`]: O(log N) expected for membership,
/// insertion, removal, bound queries and rank.
#[derive(Clone)]
pub struct TreapSet<T, C = NaturalOrder> {
    map: TreapMap<T, (), C>,
}

impl<T> TreapSet<T, NaturalOrder> {
    /// Creates an empty set ordered by [`Ord`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            map: TreapMap::new(),
        }
    }

    /// Creates an empty set with deterministic priorities.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            map: TreapMap::with_seed(seed),
        }
    }
}

impl<T, C> TreapSet<T, C> {
    /// Creates an empty set ordered by `comparator`.
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            map: TreapMap::with_comparator(comparator),
        }
    }

    /// Creates an empty set from explicit construction options.
    #[must_use]
    pub fn with_config(config: TreapConfig, comparator: C) -> Self {
        Self {
            map: TreapMap::with_config(config, comparator),
        }
    }

    /// Returns the number of elements.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns `true` if the set has no elements.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Removes every element.
    pub fn clear(&mut self) {
        self.map.clear();
    }

    /// The smallest element.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.map.first_key_value().map(|(value, ())| value)
    }

    /// The largest element.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.map.last_key_value().map(|(value, ())| value)
    }

    /// Removes and returns the smallest element.
    pub fn pop_first(&mut self) -> Option<T> {
        self.map.pop_first().map(|(value, ())| value)
    }

    /// Removes and returns the largest element.
    pub fn pop_last(&mut self) -> Option<T> {
        self.map.pop_last().map(|(value, ())| value)
    }

    /// The element at zero-based position `index` in order.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&T> {
        self.map.get_index(index).map(|(value, ())| value)
    }

    /// Returns an iterator over the elements in order.
    #[must_use]
    pub fn iter(&self) -> TreapSetIterator<'_, T> {
        TreapSetIterator {
            inner: self.map.keys(),
        }
    }

    /// Keeps only the elements for which `keep` returns `true`.
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        self.map.retain(|value, ()| keep(value));
    }

    /// Returns `true` if the set contains `value`.
    #[must_use]
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.map.contains_key(value)
    }

    /// Removes `value`, returning whether it was present.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.map.delete(value)
    }

    /// Removes and returns the element equal to `value`.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.map.remove_entry(value).map(|(value, ())| value)
    }

    /// The greatest element strictly less than `value`.
    #[must_use]
    pub fn less<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.map.find_less(value).key()
    }

    /// The greatest element less than or equal to `value`.
    #[must_use]
    pub fn less_or_equal<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.map.find_less_or_equal(value).key()
    }

    /// The smallest element strictly greater than `value`.
    #[must_use]
    pub fn greater<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.map.find_greater(value).key()
    }

    /// The smallest element greater than or equal to `value`.
    #[must_use]
    pub fn greater_or_equal<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.map.find_greater_or_equal(value).key()
    }

    /// Number of elements strictly less than `value`.
    #[must_use]
    pub fn rank<Q>(&self, value: &Q) -> usize
    where
        T: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.map.rank(value)
    }

    /// Returns an iterator over the elements within `range`.
    ///
    /// ```rust
    /// use ts_collections::ordered::TreapSet;
    ///
    /// let set: TreapSet<u32> = (0..10).collect();
    /// let middle: Vec<u32> = set.range(3..6).copied().collect();
    /// assert_eq!(middle, vec![3, 4, 5]);
    /// ```
    #[must_use]
    pub fn range<Q, R>(&self, range: R) -> TreapSetIterator<'_, T>
    where
        T: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
        R: RangeBounds<Q>,
    {
        TreapSetIterator {
            inner: Keys {
                inner: self.map.range(range),
            },
        }
    }
}

impl<T, C: Comparator<T>> TreapSet<T, C> {
    /// Adds `value`, returning `false` if it was already present.
    ///
    /// An existing element is left untouched.
    pub fn insert(&mut self, value: T) -> bool {
        if self.map.contains_key(&value) {
            return false;
        }
        self.map.insert(value, ());
        true
    }

    /// Absorbs `other`, whose elements must all be greater than this set's.
    ///
    /// # Errors
    ///
    /// Returns a [`MergeError`] carrying `other` unchanged if the ranges
    /// overlap; `self` is not modified.
    pub fn merge(&mut self, other: Self) -> Result<(), MergeError<Self>> {
        self.map
            .merge(other.map)
            .map_err(|error| MergeError::new(Self { map: error.into_inner() }))
    }
}

impl<T, C: Clone> TreapSet<T, C> {
    /// Moves the elements greater than or equal to `value` into a new set.
    #[must_use = "the split-off elements are dropped if the returned set is unused"]
    pub fn split_less<Q>(&mut self, value: &Q) -> Self
    where
        T: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        Self {
            map: self.map.split_less(value),
        }
    }

    /// Moves the elements strictly greater than `value` into a new set.
    #[must_use = "the split-off elements are dropped if the returned set is unused"]
    pub fn split_less_or_equal<Q>(&mut self, value: &Q) -> Self
    where
        T: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        Self {
            map: self.map.split_less_or_equal(value),
        }
    }
}

// =============================================================================
// Iterators
// =============================================================================

/// An iterator over the elements of a [`TreapSet`], in order.
#[derive(Clone)]
pub struct TreapSetIterator<'a, T> {
    inner: Keys<'a, T, ()>,
}

impl<'a, T> Iterator for TreapSetIterator<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for TreapSetIterator<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for TreapSetIterator<'_, T> {}

impl<T> FusedIterator for TreapSetIterator<'_, T> {}

/// An owning iterator over the elements of a [`TreapSet`], in order.
pub struct TreapSetIntoIterator<T> {
    inner: IntoIter<T, ()>,
}

impl<T> Iterator for TreapSetIntoIterator<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(value, ())| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for TreapSetIntoIterator<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(value, ())| value)
    }
}

impl<T> ExactSizeIterator for TreapSetIntoIterator<T> {}

impl<T> FusedIterator for TreapSetIntoIterator<T> {}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<T, C: Default> Default for TreapSet<T, C> {
    fn default() -> Self {
        Self {
            map: TreapMap::default(),
        }
    }
}

impl<T, C: Comparator<T> + Default> FromIterator<T> for TreapSet<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}

impl<T, C: Comparator<T>> Extend<T> for TreapSet<T, C> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

impl<T, C> IntoIterator for TreapSet<T, C> {
    type Item = T;
    type IntoIter = TreapSetIntoIterator<T>;

    fn into_iter(self) -> Self::IntoIter {
        TreapSetIntoIterator {
            inner: self.map.into_iter(),
        }
    }
}

impl<'a, T, C> IntoIterator for &'a TreapSet<T, C> {
    type Item = &'a T;
    type IntoIter = TreapSetIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: PartialEq, C> PartialEq for TreapSet<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.map == other.map
    }
}

impl<T: Eq, C> Eq for TreapSet<T, C> {}

impl<T: Hash, C> Hash for TreapSet<T, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for value in self {
            value.hash(state);
        }
    }
}

impl<T: fmt::Debug, C> fmt::Debug for TreapSet<T, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_set().entries(self.iter()).finish()
    }
}

impl<T: fmt::Display, C> fmt::Display for TreapSet<T, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        for (index, value) in self.iter().enumerate() {
            if index > 0 {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{value}")?;
        }
        write!(formatter, "}}")
    }
}

static_assertions::assert_impl_all!(TreapSet<String>: Send, Sync, Clone);

#[cfg(feature = "serde")]
impl<T: serde::Serialize, C> serde::Serialize for TreapSet<T, C> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

#[cfg(feature = "serde")]
impl<'de, T, C> serde::Deserialize<'de> for TreapSet<T, C>
where
    T: serde::Deserialize<'de>,
    C: Comparator<T> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let values = <Vec<T> as serde::Deserialize>::deserialize(deserializer)?;
        Ok(values.into_iter().collect())
    }
}
