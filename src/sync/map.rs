use std::borrow::Borrow;
use std::fmt;

use parking_lot::RwLock;

use crate::ordered::{Comparator, MergeError, NaturalOrder, TreapConfig, TreapMap};

/// A [`TreapMap`] guarded by a reader/writer lock.
///
/// See the [module documentation](super) for the locking discipline.
pub struct SyncTreapMap<K, V, C = NaturalOrder> {
    inner: RwLock<TreapMap<K, V, C>>,
}

impl<K, V> SyncTreapMap<K, V, NaturalOrder> {
    /// Creates an empty map ordered by [`Ord`].
    #[must_use]
    pub fn new() -> Self {
        Self::from_map(TreapMap::new())
    }

    /// Creates an empty map with deterministic priorities.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_map(TreapMap::with_seed(seed))
    }
}

impl<K, V, C> SyncTreapMap<K, V, C> {
    /// Wraps an existing map.
    #[must_use]
    pub fn from_map(map: TreapMap<K, V, C>) -> Self {
        Self {
            inner: RwLock::new(map),
        }
    }

    /// Creates an empty map ordered by `comparator`.
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        Self::from_map(TreapMap::with_comparator(comparator))
    }

    /// Creates an empty map from explicit construction options.
    #[must_use]
    pub fn with_config(config: TreapConfig, comparator: C) -> Self {
        Self::from_map(TreapMap::with_config(config, comparator))
    }

    /// Unwraps the inner map.
    pub fn into_inner(self) -> TreapMap<K, V, C> {
        self.inner.into_inner()
    }

    /// Number of entries at the time of the call.
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Returns `true` if the map was empty at the time of the call.
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.inner.write().clear();
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.inner.read().contains_key(key)
    }

    /// Removes `key`, returning whether it was present.
    pub fn delete<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.inner.write().delete(key)
    }

    /// Removes `key` and returns its value.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.inner.write().remove(key)
    }

    /// Removes and returns the entry with the smallest key.
    pub fn pop_first(&self) -> Option<(K, V)> {
        self.inner.write().pop_first()
    }

    /// Removes and returns the entry with the largest key.
    pub fn pop_last(&self) -> Option<(K, V)> {
        self.inner.write().pop_last()
    }

    /// Number of keys strictly less than `key`.
    pub fn rank<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.inner.read().rank(key)
    }

    /// Runs `action` with shared access to the map.
    ///
    /// The read lock is held for the duration of `action`.
    pub fn with_read<R>(&self, action: impl FnOnce(&TreapMap<K, V, C>) -> R) -> R {
        action(&self.inner.read())
    }

    /// Runs `action` with exclusive access to the map.
    ///
    /// The write lock is held for the duration of `action`, which makes a
    /// read-modify-write sequence atomic.
    pub fn with_write<R>(&self, action: impl FnOnce(&mut TreapMap<K, V, C>) -> R) -> R {
        action(&mut self.inner.write())
    }
}

impl<K, V: Clone, C> SyncTreapMap<K, V, C> {
    /// Returns a clone of the value stored under `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.inner.read().get(key).cloned()
    }
}

impl<K: Clone, V: Clone, C> SyncTreapMap<K, V, C> {
    /// The entry with the greatest key strictly less than `key`.
    pub fn find_less<Q>(&self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        owned(self.inner.read().find_less(key).key_value())
    }

    /// The entry with the greatest key less than or equal to `key`.
    pub fn find_less_or_equal<Q>(&self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        owned(self.inner.read().find_less_or_equal(key).key_value())
    }

    /// The entry with the smallest key strictly greater than `key`.
    pub fn find_greater<Q>(&self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        owned(self.inner.read().find_greater(key).key_value())
    }

    /// The entry with the smallest key greater than or equal to `key`.
    pub fn find_greater_or_equal<Q>(&self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        owned(self.inner.read().find_greater_or_equal(key).key_value())
    }

    /// The entry with the smallest key.
    pub fn first_key_value(&self) -> Option<(K, V)> {
        owned(self.inner.read().first_key_value())
    }

    /// The entry with the largest key.
    pub fn last_key_value(&self) -> Option<(K, V)> {
        owned(self.inner.read().last_key_value())
    }
}

impl<K: Clone, V: Clone, C: Clone> SyncTreapMap<K, V, C> {
    /// A point-in-time copy of the whole map.
    pub fn snapshot(&self) -> TreapMap<K, V, C> {
        self.inner.read().clone()
    }
}

impl<K, V, C: Comparator<K>> SyncTreapMap<K, V, C> {
    /// Inserts a key-value pair, returning the previous value for `key`.
    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.inner.write().insert(key, value)
    }

    /// Returns a clone of the value under `key`, inserting `V::default()`
    /// first if the key is absent.
    pub fn get_or_insert_default(&self, key: K) -> V
    where
        V: Default + Clone,
    {
        self.inner.write().get_or_insert_default(key).clone()
    }

    /// Absorbs `other`, whose keys must all be greater than this map's.
    ///
    /// # Errors
    ///
    /// Returns a [`MergeError`] carrying `other` if the key ranges overlap.
    pub fn merge(&self, other: TreapMap<K, V, C>) -> Result<(), MergeError<TreapMap<K, V, C>>> {
        self.inner.write().merge(other)
    }
}

impl<K, V, C: Clone> SyncTreapMap<K, V, C> {
    /// Moves the entries with keys greater than or equal to `key` out into
    /// a plain map.
    #[must_use = "the split-off entries are dropped if the returned map is unused"]
    pub fn split_less<Q>(&self, key: &Q) -> TreapMap<K, V, C>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.inner.write().split_less(key)
    }

    /// Moves the entries with keys strictly greater than `key` out into a
    /// plain map.
    #[must_use = "the split-off entries are dropped if the returned map is unused"]
    pub fn split_less_or_equal<Q>(&self, key: &Q) -> TreapMap<K, V, C>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.inner.write().split_less_or_equal(key)
    }
}

fn owned<K: Clone, V: Clone>(entry: Option<(&K, &V)>) -> Option<(K, V)> {
    entry.map(|(key, value)| (key.clone(), value.clone()))
}

impl<K, V, C: Default> Default for SyncTreapMap<K, V, C> {
    fn default() -> Self {
        Self::from_map(TreapMap::default())
    }
}

impl<K, V, C> From<TreapMap<K, V, C>> for SyncTreapMap<K, V, C> {
    fn from(map: TreapMap<K, V, C>) -> Self {
        Self::from_map(map)
    }
}

impl<K, V, C: Comparator<K> + Default> FromIterator<(K, V)> for SyncTreapMap<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_map(iter.into_iter().collect())
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for SyncTreapMap<K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_tuple("SyncTreapMap")
            .field(&*self.inner.read())
            .finish()
    }
}

static_assertions::assert_impl_all!(SyncTreapMap<u64, String>: Send, Sync);
