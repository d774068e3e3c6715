use std::borrow::Borrow;
use std::fmt;

use parking_lot::RwLock;

use crate::ordered::{Comparator, MergeError, NaturalOrder, TreapConfig, TreapSet};

/// A [`TreapSet`] guarded by a reader/writer lock.
///
/// ```rust
/// use ts_collections::sync::SyncTreapSet;
///
/// let set = SyncTreapSet::new();
/// assert!(set.insert(3));
/// assert!(set.insert(1));
/// assert!(!set.insert(3));
/// assert_eq!(set.greater(&1), Some(3));
/// assert_eq!(set.snapshot().into_iter().collect::<Vec<_>>(), vec![1, 3]);
/// ```
pub struct SyncTreapSet<T, C = NaturalOrder> {
    inner: RwLock<TreapSet<T, C>>,
}

impl<T> SyncTreapSet<T, NaturalOrder> {
    /// Creates an empty set ordered by [`Ord`].
    #[must_use]
    pub fn new() -> Self {
        Self::from_set(TreapSet::new())
    }

    /// Creates an empty set with deterministic priorities.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_set(TreapSet::with_seed(seed))
    }
}

impl<T, C> SyncTreapSet<T, C> {
    /// Wraps an existing set.
    #[must_use]
    pub fn from_set(set: TreapSet<T, C>) -> Self {
        Self {
            inner: RwLock::new(set),
        }
    }

    /// Creates an empty set ordered by `comparator`.
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        Self::from_set(TreapSet::with_comparator(comparator))
    }

    /// Creates an empty set from explicit construction options.
    #[must_use]
    pub fn with_config(config: TreapConfig, comparator: C) -> Self {
        Self::from_set(TreapSet::with_config(config, comparator))
    }

    /// Unwraps the inner set.
    pub fn into_inner(self) -> TreapSet<T, C> {
        self.inner.into_inner()
    }

    /// Number of elements at the time of the call.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns `true` if the set was empty at the time of the call.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Removes every element.
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Returns `true` if `value` is present.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.inner.read().contains(value)
    }

    /// Removes `value`, returning whether it was present.
    pub fn remove<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.inner.write().remove(value)
    }

    /// Runs `action` with shared access to the set.
    pub fn with_read<R>(&self, action: impl FnOnce(&TreapSet<T, C>) -> R) -> R {
        action(&self.inner.read())
    }

    /// Runs `action` with exclusive access to the set.
    pub fn with_write<R>(&self, action: impl FnOnce(&mut TreapSet<T, C>) -> R) -> R {
        action(&mut self.inner.write())
    }
}

impl<T: Clone, C> SyncTreapSet<T, C> {
    /// The greatest element strictly less than `value`.
    pub fn less<Q>(&self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.inner.read().less(value).cloned()
    }

    /// The greatest element less than or equal to `value`.
    pub fn less_or_equal<Q>(&self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.inner.read().less_or_equal(value).cloned()
    }

    /// The smallest element strictly greater than `value`.
    pub fn greater<Q>(&self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.inner.read().greater(value).cloned()
    }

    /// The smallest element greater than or equal to `value`.
    pub fn greater_or_equal<Q>(&self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.inner.read().greater_or_equal(value).cloned()
    }
}

impl<T: Clone, C: Clone> SyncTreapSet<T, C> {
    /// A point-in-time copy of the whole set.
    pub fn snapshot(&self) -> TreapSet<T, C> {
        self.inner.read().clone()
    }
}

impl<T, C: Comparator<T>> SyncTreapSet<T, C> {
    /// Adds `value`, returning `false` if it was already present.
    pub fn insert(&self, value: T) -> bool {
        self.inner.write().insert(value)
    }

    /// Absorbs `other`, whose elements must all be greater than this set's.
    ///
    /// # Errors
    ///
    /// Returns a [`MergeError`] carrying `other` if the ranges overlap.
    pub fn merge(&self, other: TreapSet<T, C>) -> Result<(), MergeError<TreapSet<T, C>>> {
        self.inner.write().merge(other)
    }
}

impl<T, C: Clone> SyncTreapSet<T, C> {
    /// Moves the elements greater than or equal to `value` out into a plain
    /// set.
    #[must_use = "the split-off elements are dropped if the returned set is unused"]
    pub fn split_less<Q>(&self, value: &Q) -> TreapSet<T, C>
    where
        T: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.inner.write().split_less(value)
    }

    /// Moves the elements strictly greater than `value` out into a plain
    /// set.
    #[must_use = "the split-off elements are dropped if the returned set is unused"]
    pub fn split_less_or_equal<Q>(&self, value: &Q) -> TreapSet<T, C>
    where
        T: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.inner.write().split_less_or_equal(value)
    }
}

impl<T, C: Default> Default for SyncTreapSet<T, C> {
    fn default() -> Self {
        Self::from_set(TreapSet::default())
    }
}

impl<T, C> From<TreapSet<T, C>> for SyncTreapSet<T, C> {
    fn from(set: TreapSet<T, C>) -> Self {
        Self::from_set(set)
    }
}

impl<T, C: Comparator<T> + Default> FromIterator<T> for SyncTreapSet<T, C> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_set(iter.into_iter().collect())
    }
}

impl<T: fmt::Debug, C> fmt::Debug for SyncTreapSet<T, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_tuple("SyncTreapSet")
            .field(&*self.inner.read())
            .finish()
    }
}

static_assertions::assert_impl_all!(SyncTreapSet<u64>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Arc;
    use std::thread;

    #[rstest]
    fn test_bounds_return_owned_values() {
        let set: SyncTreapSet<String> = ["b", "d"].into_iter().map(String::from).collect();
        assert_eq!(set.less_or_equal("c"), Some("b".to_string()));
        assert_eq!(set.greater_or_equal("c"), Some("d".to_string()));
        assert_eq!(set.less("b"), None);
        assert!(set.contains("d"));
        assert_eq!(format!("{set:?}"), r#"SyncTreapSet({"b", "d"})"#);
    }

    #[rstest]
    fn test_concurrent_inserts_count_each_value_once() {
        let set = Arc::new(SyncTreapSet::with_seed(17));
        let workers: Vec<_> = (0..8)
            .map(|_| {
                let set = Arc::clone(&set);
                thread::spawn(move || (0..200).filter(|value| set.insert(*value)).count())
            })
            .collect();
        let inserted: usize = workers.into_iter().map(|worker| worker.join().unwrap()).sum();
        assert_eq!(inserted, 200);
        assert_eq!(set.len(), 200);
    }

    #[rstest]
    fn test_split_then_merge() {
        let set: SyncTreapSet<u8> = (0..20).collect();
        let upper = set.split_less_or_equal(&9);
        assert_eq!(set.len(), 10);
        set.merge(upper).unwrap();
        assert_eq!(set.len(), 20);
        set.clear();
        assert!(set.is_empty());
    }
}
