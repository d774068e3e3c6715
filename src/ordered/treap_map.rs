//! Ordered map based on a treap.
//!
//! This module provides [`TreapMap`], a mutable ordered map whose nodes
//! carry a random priority in addition to their key.
//!
//! # Overview
//!
//! A treap is a binary search tree by key and, at the same time, a heap by
//! priority. Because priorities are drawn uniformly at random, the expected
//! height is O(log N) without any rotations or rebalancing. Every mutation
//! is expressed with two primitives:
//!
//! - **split**: partition a tree into the keys below a pivot and the rest
//! - **merge**: join two trees whose key ranges do not overlap
//!
//! Insertion splits at the new key and merges the new node in between;
//! deletion splits twice to isolate the matching node and merges the outer
//! parts back together.
//!
//! - O(log N) expected get, insert, remove and bound queries
//! - O(log N) expected rank and positional access (cached subtree sizes)
//! - O(1) len and `is_empty`
//!
//! The balance is probabilistic: there is no worst-case height bound.
//!
//! # Examples
//!
//! ```rust
//! use ts_collections::ordered::TreapMap;
//!
//! let mut map = TreapMap::new();
//! map.insert(3, "three");
//! map.insert(1, "one");
//! map.insert(2, "two");
//!
//! let keys: Vec<&i32> = map.keys().collect();
//! assert_eq!(keys, vec![&1, &2, &3]);
//!
//! // Bound queries return cursors
//! assert_eq!(map.find_less(&3).key(), Some(&2));
//! assert!(map.find_greater(&3).is_end());
//!
//! // Structural split: keys >= 2 move into the returned map
//! let upper = map.split_less(&2);
//! assert_eq!(map.len(), 1);
//! assert_eq!(upper.len(), 2);
//! ```

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::iter::FromIterator;
use std::ops::{Bound, Index, RangeBounds};

use super::arena::{Link, NodeArena, NodeId, SplitMode};
use super::comparator::{Comparator, NaturalOrder};
use super::config::{PrioritySource, TreapConfig};
use super::cursor::{Cursor, CursorMut};
use super::error::{MergeError, TreapError};
use super::iter::{IntoIter, Iter, Keys, Values};

// =============================================================================
// TreapMap Definition
// =============================================================================

/// An ordered map backed by a treap.
///
/// Keys are ordered by the comparator `C` (by default [`NaturalOrder`],
/// i.e. [`Ord`]). Lookups accept any borrowed form `Q` of the key as long as
/// the comparator can order `Q`.
///
/// # Time Complexity
///
/// | Operation                  | Complexity                 |
/// |----------------------------|----------------------------|
/// | `get` / `contains_key`     | O(log N) expected          |
/// | `insert`                   | O(log N) expected          |
/// | `remove` / `delete`        | O(log N) expected          |
/// | `find_*` bound queries     | O(log N) expected          |
/// | `rank` / `get_index`       | O(log N) expected          |
/// | `split_less*`              | O(log N + min side)        |
/// | `merge`                    | O(log N + smaller map)     |
/// | `len` / `is_empty`         | O(1)                       |
/// | `clone`                    | O(N)                       |
///
/// Splits and merges move nodes between two maps' storage, so the smaller
/// side is copied; the tree surgery itself is logarithmic.
///
/// # Examples
///
/// ```rust
/// use ts_collections::ordered::TreapMap;
///
/// let mut map = TreapMap::with_seed(7);
/// map.insert(1, 10);
/// map.insert(2, 20);
/// map.insert(3, 30);
/// assert_eq!(map.len(), 3);
///
/// *map.get_or_insert_default(4) = 40;
/// assert_eq!(map.len(), 4);
///
/// assert!(map.delete(&2));
/// assert!(map.delete(&3));
/// assert!(!map.delete(&3));
///
/// assert_eq!(map.find(&1), map.begin());
/// assert_eq!(map.find(&2), map.end());
/// assert_eq!(map.find(&4), map.back());
/// ```
#[derive(Clone)]
pub struct TreapMap<K, V, C = NaturalOrder> {
    pub(crate) arena: NodeArena<K, V>,
    pub(crate) root: Link,
    comparator: C,
    priorities: PrioritySource,
}

impl<K, V> TreapMap<K, V, NaturalOrder> {
    /// Creates an empty map ordered by [`Ord`], with OS-seeded priorities.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ts_collections::ordered::TreapMap;
    ///
    /// let map: TreapMap<i32, String> = TreapMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }

    /// Creates an empty map ordered by [`Ord`] whose priorities come from a
    /// generator seeded with `seed`. Maps built with the same seed and the
    /// same sequence of operations have identical shapes.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::with_config(TreapConfig::new().seed(seed), NaturalOrder)
    }
}

impl<K, V, C> TreapMap<K, V, C> {
    /// Creates an empty map ordered by `comparator`.
    #[must_use]
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_config(TreapConfig::new(), comparator)
    }

    /// Creates an empty map from explicit construction options.
    #[must_use]
    pub fn with_config(config: TreapConfig, comparator: C) -> Self {
        Self::from_parts(
            NodeArena::with_capacity(config.capacity_value()),
            comparator,
            config.priority_source(),
        )
    }

    const fn from_parts(arena: NodeArena<K, V>, comparator: C, priorities: PrioritySource) -> Self {
        Self {
            arena,
            root: None,
            comparator,
            priorities,
        }
    }

    /// Returns the number of entries in the map.
    ///
    /// # Complexity
    ///
    /// O(1): the root caches the size of the whole tree.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.arena.size(self.root)
    }

    /// Returns `true` if the map contains no entries.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Removes every entry.
    pub fn clear(&mut self) {
        log::trace!("treap map: clearing {} entries", self.len());
        self.arena.clear();
        self.root = None;
    }

    /// The comparator ordering this map.
    pub const fn comparator(&self) -> &C {
        &self.comparator
    }

    // =========================================================================
    // Cursors
    // =========================================================================

    /// Cursor at the first entry, or the end sentinel if the map is empty.
    #[must_use]
    pub fn begin(&self) -> Cursor<'_, K, V, C> {
        Cursor::new(self, self.arena.leftmost(self.root))
    }

    /// Cursor at the end sentinel, one past the last entry.
    #[must_use]
    pub const fn end(&self) -> Cursor<'_, K, V, C> {
        Cursor::new(self, None)
    }

    /// Cursor at the last entry, or the end sentinel if the map is empty.
    #[must_use]
    pub fn back(&self) -> Cursor<'_, K, V, C> {
        Cursor::new(self, self.arena.rightmost(self.root))
    }

    /// Mutable cursor at the first entry.
    pub fn begin_mut(&mut self) -> CursorMut<'_, K, V, C> {
        let position = self.arena.leftmost(self.root);
        CursorMut::new(self, position)
    }

    /// Mutable cursor at the last entry.
    pub fn back_mut(&mut self) -> CursorMut<'_, K, V, C> {
        let position = self.arena.rightmost(self.root);
        CursorMut::new(self, position)
    }

    // =========================================================================
    // Ordered Access
    // =========================================================================

    /// The entry with the smallest key.
    #[must_use]
    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.begin().key_value()
    }

    /// The entry with the largest key.
    #[must_use]
    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.back().key_value()
    }

    /// Removes and returns the entry with the smallest key.
    pub fn pop_first(&mut self) -> Option<(K, V)> {
        self.begin_mut().remove_current()
    }

    /// Removes and returns the entry with the largest key.
    pub fn pop_last(&mut self) -> Option<(K, V)> {
        self.back_mut().remove_current()
    }

    /// The entry at zero-based position `index` in key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ts_collections::ordered::TreapMap;
    ///
    /// let map: TreapMap<char, u8> = [('c', 3), ('a', 1), ('b', 2)].into_iter().collect();
    /// assert_eq!(map.get_index(1), Some((&'b', &2)));
    /// assert_eq!(map.get_index(3), None);
    /// ```
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<(&K, &V)> {
        self.arena.select(self.root, index).map(|id| {
            let node = &self.arena[id];
            (&node.key, &node.value)
        })
    }

    // =========================================================================
    // Iteration
    // =========================================================================

    /// Returns an iterator over the entries in key order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ts_collections::ordered::TreapMap;
    ///
    /// let map: TreapMap<i32, &str> = [(2, "b"), (1, "a")].into_iter().collect();
    /// let entries: Vec<(&i32, &&str)> = map.iter().collect();
    /// assert_eq!(entries, vec![(&1, &"a"), (&2, &"b")]);
    ///
    /// let reversed: Vec<&i32> = map.keys().rev().collect();
    /// assert_eq!(reversed, vec![&2, &1]);
    /// ```
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(
            &self.arena,
            self.arena.leftmost(self.root),
            self.arena.rightmost(self.root),
            self.len(),
        )
    }

    /// Returns an iterator over the keys in order.
    #[must_use]
    pub fn keys(&self) -> Keys<'_, K, V> {
        Keys { inner: self.iter() }
    }

    /// Returns an iterator over the values in key order.
    #[must_use]
    pub fn values(&self) -> Values<'_, K, V> {
        Values { inner: self.iter() }
    }

    /// Keeps only the entries for which `keep` returns `true`.
    ///
    /// Entries are visited in key order and may be modified in place.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ts_collections::ordered::TreapMap;
    ///
    /// let mut map: TreapMap<i32, i32> = (1..=6).map(|key| (key, key)).collect();
    /// map.retain(|key, value| {
    ///     *value *= 10;
    ///     key % 3 != 0
    /// });
    /// let entries: Vec<(i32, i32)> = map.into_iter().collect();
    /// assert_eq!(entries, vec![(1, 10), (2, 20), (4, 40), (5, 50)]);
    /// ```
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&K, &mut V) -> bool,
    {
        for id in self.arena.in_order(self.root) {
            let node = &mut self.arena[id];
            if !keep(&node.key, &mut node.value) {
                let (root, _) = self.arena.splice_out(self.root, id);
                self.root = root;
            }
        }
    }

    // =========================================================================
    // Internal Descents
    // =========================================================================

    fn find_node<Q>(&self, key: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.arena[id];
            current = match self.comparator.compare(key, node.key.borrow()) {
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
                Ordering::Equal => return Some(id),
            };
        }
        None
    }

    /// Deepest node whose key satisfies `accepts(node_key.cmp(key))`.
    ///
    /// With `toward_greater` the search keeps moving right after a hit (the
    /// best candidate is the largest accepted key); otherwise it moves left.
    fn bound_node<Q>(&self, key: &Q, accepts: fn(Ordering) -> bool, toward_greater: bool) -> Link
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let mut current = self.root;
        let mut best = None;
        while let Some(id) = current {
            let node = &self.arena[id];
            let hit = accepts(self.comparator.compare(node.key.borrow(), key));
            if hit {
                best = Some(id);
            }
            current = if hit == toward_greater {
                node.right
            } else {
                node.left
            };
        }
        best
    }

    fn less_node<Q>(&self, key: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.bound_node(key, Ordering::is_lt, true)
    }

    fn less_or_equal_node<Q>(&self, key: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.bound_node(key, Ordering::is_le, true)
    }

    fn greater_node<Q>(&self, key: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.bound_node(key, Ordering::is_gt, false)
    }

    fn greater_or_equal_node<Q>(&self, key: &Q) -> Link
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.bound_node(key, Ordering::is_ge, false)
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Returns a reference to the value stored under `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ts_collections::ordered::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// map.insert("hello".to_string(), 42);
    ///
    /// // Can use &str to look up String keys
    /// assert_eq!(map.get("hello"), Some(&42));
    /// assert_eq!(map.get("world"), None);
    /// ```
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.find_node(key).map(|id| &self.arena[id].value)
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let id = self.find_node(key)?;
        Some(&mut self.arena[id].value)
    }

    /// Like [`get`](Self::get), but reports a miss as an error.
    ///
    /// # Errors
    ///
    /// Returns [`TreapError::KeyNotFound`] if `key` is absent.
    pub fn try_get<Q>(&self, key: &Q) -> Result<&V, TreapError>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.get(key).ok_or(TreapError::KeyNotFound)
    }

    /// Returns `true` if the map contains `key`.
    #[must_use]
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.find_node(key).is_some()
    }

    /// Number of keys strictly less than `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ts_collections::ordered::TreapMap;
    ///
    /// let map: TreapMap<i32, ()> = [10, 20, 30].into_iter().map(|key| (key, ())).collect();
    /// assert_eq!(map.rank(&5), 0);
    /// assert_eq!(map.rank(&20), 1);
    /// assert_eq!(map.rank(&25), 2);
    /// assert_eq!(map.rank(&99), 3);
    /// ```
    #[must_use]
    pub fn rank<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let mut rank = 0;
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.arena[id];
            if self.comparator.compare(node.key.borrow(), key) == Ordering::Less {
                rank += self.arena.size(node.left) + 1;
                current = node.right;
            } else {
                current = node.left;
            }
        }
        rank
    }

    /// Cursor at the entry stored under `key`, or the end sentinel.
    #[must_use]
    pub fn find<Q>(&self, key: &Q) -> Cursor<'_, K, V, C>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        Cursor::new(self, self.find_node(key))
    }

    /// Mutable cursor at the entry stored under `key`, or the end sentinel.
    pub fn find_mut<Q>(&mut self, key: &Q) -> CursorMut<'_, K, V, C>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let position = self.find_node(key);
        CursorMut::new(self, position)
    }

    /// Cursor at the greatest key strictly less than `key`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ts_collections::ordered::TreapMap;
    ///
    /// let map: TreapMap<i32, &str> = [(1, "a"), (3, "c"), (5, "e")].into_iter().collect();
    /// assert_eq!(map.find_less(&4).key_value(), Some((&3, &"c")));
    /// assert_eq!(map.find_less(&1), map.end());
    /// ```
    #[must_use]
    pub fn find_less<Q>(&self, key: &Q) -> Cursor<'_, K, V, C>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        Cursor::new(self, self.less_node(key))
    }

    /// Cursor at the greatest key less than or equal to `key`.
    #[must_use]
    pub fn find_less_or_equal<Q>(&self, key: &Q) -> Cursor<'_, K, V, C>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        Cursor::new(self, self.less_or_equal_node(key))
    }

    /// Cursor at the smallest key strictly greater than `key`.
    #[must_use]
    pub fn find_greater<Q>(&self, key: &Q) -> Cursor<'_, K, V, C>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        Cursor::new(self, self.greater_node(key))
    }

    /// Cursor at the smallest key greater than or equal to `key`.
    #[must_use]
    pub fn find_greater_or_equal<Q>(&self, key: &Q) -> Cursor<'_, K, V, C>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        Cursor::new(self, self.greater_or_equal_node(key))
    }

    /// Returns an iterator over the entries whose keys fall within `range`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ts_collections::ordered::TreapMap;
    ///
    /// let map: TreapMap<i32, i32> = (1..=5).map(|key| (key, key * key)).collect();
    /// let squares: Vec<&i32> = map.range(2..=4).map(|(_, value)| value).collect();
    /// assert_eq!(squares, vec![&4, &9, &16]);
    /// assert_eq!(map.range(..2).len(), 1);
    /// assert_eq!(map.range(6..).len(), 0);
    /// ```
    #[must_use]
    pub fn range<Q, R>(&self, range: R) -> Iter<'_, K, V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
        R: RangeBounds<Q>,
    {
        let front = match range.start_bound() {
            Bound::Included(start) => self.greater_or_equal_node(start),
            Bound::Excluded(start) => self.greater_node(start),
            Bound::Unbounded => self.arena.leftmost(self.root),
        };
        let back = match range.end_bound() {
            Bound::Included(end) => self.less_or_equal_node(end),
            Bound::Excluded(end) => self.less_node(end),
            Bound::Unbounded => self.arena.rightmost(self.root),
        };
        let (Some(front_id), Some(back_id)) = (front, back) else {
            return Iter::empty(&self.arena);
        };
        let (first, last) = (self.arena.position(front_id), self.arena.position(back_id));
        if first > last {
            return Iter::empty(&self.arena);
        }
        Iter::new(&self.arena, front, back, last - first + 1)
    }

    // =========================================================================
    // Removal
    // =========================================================================

    /// Removes `key` and returns the stored entry.
    ///
    /// The tree is split below `key` and again above it; because keys are
    /// unique the middle part is either empty or exactly the matching node,
    /// detached from any children. The outer parts are merged back.
    pub fn remove_entry<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let root = self.root.take();
        let (left, rest) = self
            .arena
            .split_root(root, key, SplitMode::Less, &self.comparator);
        let (matched, right) =
            self.arena
                .split_root(rest, key, SplitMode::LessOrEqual, &self.comparator);
        self.root = self.arena.merge_root(left, right);

        let id = matched?;
        debug_assert!(
            self.arena[id].left.is_none() && self.arena[id].right.is_none(),
            "treap map: isolated node still has children"
        );
        let node = self.arena.release(id);
        Some((node.key, node.value))
    }

    /// Removes `key` and returns its value.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.remove_entry(key).map(|(_, value)| value)
    }

    /// Removes `key`, returning whether it was present.
    ///
    /// Deleting an absent key leaves the map unchanged.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.remove_entry(key).is_some()
    }
}

impl<K, V, C: Comparator<K>> TreapMap<K, V, C> {
    /// Inserts a key-value pair, returning the previous value for `key`.
    ///
    /// Updating an existing key overwrites the value in place: the node
    /// keeps its priority and its position in the tree.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ts_collections::ordered::TreapMap;
    ///
    /// let mut map = TreapMap::new();
    /// assert_eq!(map.insert(1, "one"), None);
    /// assert_eq!(map.insert(1, "ONE"), Some("one"));
    /// assert_eq!(map.get(&1), Some(&"ONE"));
    /// assert_eq!(map.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.find_node(&key) {
            Some(id) => Some(std::mem::replace(&mut self.arena[id].value, value)),
            None => {
                self.attach(key, value);
                None
            }
        }
    }

    /// Returns the value under `key`, inserting `V::default()` first if the
    /// key is absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ts_collections::ordered::TreapMap;
    ///
    /// let mut counts: TreapMap<&str, usize> = TreapMap::new();
    /// for word in ["a", "b", "a"] {
    ///     *counts.get_or_insert_default(word) += 1;
    /// }
    /// assert_eq!(counts.get("a"), Some(&2));
    /// assert_eq!(counts.get("b"), Some(&1));
    /// ```
    pub fn get_or_insert_default(&mut self, key: K) -> &mut V
    where
        V: Default,
    {
        self.get_or_insert_with(key, V::default)
    }

    /// Returns the value under `key`, inserting `make()` first if the key is
    /// absent.
    pub fn get_or_insert_with<F>(&mut self, key: K, make: F) -> &mut V
    where
        F: FnOnce() -> V,
    {
        let id = match self.find_node(&key) {
            Some(id) => id,
            None => self.attach(key, make()),
        };
        &mut self.arena[id].value
    }

    /// Links a new node for a key known to be absent.
    fn attach(&mut self, key: K, value: V) -> NodeId {
        let priority = self.priorities.draw();
        let root = self.root.take();
        let (left, right) = self
            .arena
            .split_root(root, &key, SplitMode::Less, &self.comparator);
        let id = self.arena.allocate(key, value, priority);
        let left = self.arena.merge_root(left, Some(id));
        self.root = self.arena.merge_root(left, right);
        id
    }

    /// Absorbs `other`, whose keys must all be strictly greater than every
    /// key of `self`.
    ///
    /// The check costs two O(log N) descents. `other` is assumed to share
    /// this map's ordering.
    ///
    /// # Errors
    ///
    /// Returns a [`MergeError`] carrying `other` unchanged if its smallest
    /// key is not greater than this map's largest key. `self` is not
    /// modified in that case.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ts_collections::ordered::TreapMap;
    ///
    /// let mut map: TreapMap<i32, i32> = (1..=10).map(|key| (key, key)).collect();
    /// let upper = map.split_less_or_equal(&4);
    /// assert_eq!(map.len(), 4);
    ///
    /// map.merge(upper).unwrap();
    /// let keys: Vec<i32> = map.keys().copied().collect();
    /// assert_eq!(keys, (1..=10).collect::<Vec<_>>());
    /// ```
    pub fn merge(&mut self, mut other: Self) -> Result<(), MergeError<Self>> {
        let boundary = (
            self.arena.rightmost(self.root),
            other.arena.leftmost(other.root),
        );
        if let (Some(last), Some(first)) = boundary {
            let ordering = self
                .comparator
                .compare(&self.arena[last].key, &other.arena[first].key);
            if ordering != Ordering::Less {
                log::debug!(
                    "treap map: rejected merge of {} entries overlapping {} entries",
                    other.len(),
                    self.len()
                );
                return Err(MergeError::new(other));
            }
        }

        let moved = other.len();
        if self.len() < other.len() {
            let left = self.arena.relocate(self.root.take(), &mut other.arena);
            std::mem::swap(&mut self.arena, &mut other.arena);
            self.root = self.arena.merge_root(left, other.root.take());
        } else {
            let right = other.arena.relocate(other.root.take(), &mut self.arena);
            self.root = self.arena.merge_root(self.root, right);
        }
        log::debug!("treap map: merged {moved} entries, now {}", self.len());
        Ok(())
    }
}

impl<K, V, C: Clone> TreapMap<K, V, C> {
    /// Moves every entry with a key greater than or equal to `key` into a
    /// new map and returns it; `self` keeps the keys strictly less than `key`.
    ///
    /// The returned map shares the comparator and forks the priority
    /// generator of `self`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ts_collections::ordered::TreapMap;
    ///
    /// let mut map: TreapMap<i32, i32> = (1..=5).map(|key| (key, key)).collect();
    /// let upper = map.split_less(&3);
    /// assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    /// assert_eq!(upper.keys().copied().collect::<Vec<_>>(), vec![3, 4, 5]);
    /// ```
    #[must_use = "the split-off entries are dropped if the returned map is unused"]
    pub fn split_less<Q>(&mut self, key: &Q) -> Self
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.split_off_at(key, SplitMode::Less)
    }

    /// Moves every entry with a key strictly greater than `key` into a new
    /// map and returns it; `self` keeps the keys less than or equal to `key`.
    #[must_use = "the split-off entries are dropped if the returned map is unused"]
    pub fn split_less_or_equal<Q>(&mut self, key: &Q) -> Self
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        self.split_off_at(key, SplitMode::LessOrEqual)
    }

    fn split_off_at<Q>(&mut self, key: &Q, mode: SplitMode) -> Self
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let root = self.root.take();
        let (left, right) = self.arena.split_root(root, key, mode, &self.comparator);
        let mut detached = Self::from_parts(
            NodeArena::default(),
            self.comparator.clone(),
            self.priorities.fork(),
        );

        // Relocate whichever side is smaller; the other keeps the storage.
        if self.arena.size(left) >= self.arena.size(right) {
            detached.root = self.arena.relocate(right, &mut detached.arena);
            self.root = left;
        } else {
            let mut kept = NodeArena::with_capacity(self.arena.size(left));
            self.root = self.arena.relocate(left, &mut kept);
            detached.arena = std::mem::replace(&mut self.arena, kept);
            detached.root = right;
        }
        log::debug!(
            "treap map: split {mode:?}, kept {} entries, detached {}",
            self.len(),
            detached.len()
        );
        detached
    }
}

// =============================================================================
// Standard Trait Implementations
// =============================================================================

impl<K, V, C: Default> Default for TreapMap<K, V, C> {
    fn default() -> Self {
        Self::with_comparator(C::default())
    }
}

impl<K, V, C: Comparator<K> + Default> FromIterator<(K, V)> for TreapMap<K, V, C> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::default();
        map.extend(iter);
        map
    }
}

impl<K, V, C: Comparator<K>> Extend<(K, V)> for TreapMap<K, V, C> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, C> IntoIterator for TreapMap<K, V, C> {
    type Item = (K, V);
    type IntoIter = IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.arena, self.root)
    }
}

impl<'a, K, V, C> IntoIterator for &'a TreapMap<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Panicking lookup, mirroring `BTreeMap`.
///
/// # Panics
///
/// Panics if the key is not present. Use [`TreapMap::get`] or
/// [`TreapMap::try_get`] for fallible access.
impl<K, Q, V, C> Index<&Q> for TreapMap<K, V, C>
where
    K: Borrow<Q>,
    Q: ?Sized,
    C: Comparator<Q>,
{
    type Output = V;

    fn index(&self, key: &Q) -> &Self::Output {
        match self.get(key) {
            Some(value) => value,
            None => panic!("TreapMap: key not found"),
        }
    }
}

impl<K: PartialEq, V: PartialEq, C> PartialEq for TreapMap<K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<K: Eq, V: Eq, C> Eq for TreapMap<K, V, C> {}

/// Hashes the length, then every entry in key order, so equal maps hash
/// equally regardless of their tree shapes.
impl<K: Hash, V: Hash, C> Hash for TreapMap<K, V, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        for (key, value) in self {
            key.hash(state);
            value.hash(state);
        }
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for TreapMap<K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_map().entries(self.iter()).finish()
    }
}

impl<K: fmt::Display, V: fmt::Display, C> fmt::Display for TreapMap<K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{{")?;
        let mut first = true;
        for (key, value) in self {
            if first {
                first = false;
            } else {
                write!(formatter, ", ")?;
            }
            write!(formatter, "{key}: {value}")?;
        }
        write!(formatter, "}}")
    }
}

static_assertions::assert_impl_all!(TreapMap<i32, String>: Send, Sync, Clone);

// =============================================================================
// Serde Support
// =============================================================================

#[cfg(feature = "serde")]
impl<K, V, C> serde::Serialize for TreapMap<K, V, C>
where
    K: serde::Serialize,
    V: serde::Serialize,
{
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[cfg(feature = "serde")]
struct TreapMapVisitor<K, V, C> {
    marker: std::marker::PhantomData<fn() -> TreapMap<K, V, C>>,
}

#[cfg(feature = "serde")]
impl<'de, K, V, C> serde::de::Visitor<'de> for TreapMapVisitor<K, V, C>
where
    K: serde::Deserialize<'de>,
    V: serde::Deserialize<'de>,
    C: Comparator<K> + Default,
{
    type Value = TreapMap<K, V, C>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map")
    }

    fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
    where
        A: serde::de::MapAccess<'de>,
    {
        let mut map = TreapMap::default();
        while let Some((key, value)) = access.next_entry()? {
            map.insert(key, value);
        }
        Ok(map)
    }
}

#[cfg(feature = "serde")]
impl<'de, K, V, C> serde::Deserialize<'de> for TreapMap<K, V, C>
where
    K: serde::Deserialize<'de>,
    V: serde::Deserialize<'de>,
    C: Comparator<K> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_map(TreapMapVisitor {
            marker: std::marker::PhantomData,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ordered::comparator::ReverseOrder;
    use rstest::rstest;

    fn assert_valid<K: fmt::Debug, V, C: Comparator<K>>(map: &TreapMap<K, V, C>) {
        let count = map
            .arena
            .check_invariants(map.root, &map.comparator)
            .unwrap_or_else(|message| panic!("invariant violated: {message}"));
        assert_eq!(count, map.len());
        assert_eq!(map.arena.live(), map.len());
    }

    fn seeded(entries: impl IntoIterator<Item = (i32, i32)>) -> TreapMap<i32, i32> {
        let mut map = TreapMap::with_seed(0x5EED);
        map.extend(entries);
        map
    }

    // =========================================================================
    // Display Tests
    // =========================================================================

    #[rstest]
    fn test_display_empty_map() {
        let map: TreapMap<i32, String> = TreapMap::new();
        assert_eq!(format!("{map}"), "{}");
    }

    #[rstest]
    fn test_display_sorted() {
        let mut map = TreapMap::new();
        map.insert(3, "three");
        map.insert(1, "one");
        map.insert(2, "two");
        assert_eq!(format!("{map}"), "{1: one, 2: two, 3: three}");
        assert_eq!(format!("{map:?}"), r#"{1: "one", 2: "two", 3: "three"}"#);
    }

    // =========================================================================
    // Invariant Tests
    // =========================================================================

    #[rstest]
    fn test_invariants_hold_through_inserts_and_deletes() {
        let mut map = seeded(std::iter::empty());
        for key in (0..200).map(|index| (index * 37) % 101) {
            map.insert(key, key);
            assert_valid(&map);
        }
        for key in (0..101).filter(|key| key % 3 == 0) {
            assert!(map.delete(&key));
            assert_valid(&map);
        }
        assert_eq!(map.len(), 101 - 34);
    }

    #[rstest]
    fn test_update_keeps_priority_and_shape() {
        let mut map = seeded((0..32).map(|key| (key, 0)));
        let before: Vec<(i32, u64, Link)> = map
            .arena
            .in_order(map.root)
            .into_iter()
            .map(|id| (map.arena[id].key, map.arena[id].priority, map.arena[id].parent))
            .collect();
        for key in 0..32 {
            assert_eq!(map.insert(key, key + 100), Some(0));
        }
        let after: Vec<(i32, u64, Link)> = map
            .arena
            .in_order(map.root)
            .into_iter()
            .map(|id| (map.arena[id].key, map.arena[id].priority, map.arena[id].parent))
            .collect();
        assert_eq!(before, after);
    }

    #[rstest]
    fn test_clone_reproduces_shape() {
        let map = seeded((0..64).map(|key| (key, key)));
        let copy = map.clone();
        assert_eq!(copy, map);
        let shape = |tree: &TreapMap<i32, i32>| -> Vec<(i32, u64, usize)> {
            tree.arena
                .in_order(tree.root)
                .into_iter()
                .map(|id| (tree.arena[id].key, tree.arena[id].priority, tree.arena[id].size))
                .collect()
        };
        assert_eq!(shape(&copy), shape(&map));
        assert_valid(&copy);
    }

    #[rstest]
    fn test_seeded_maps_have_identical_shapes() {
        let first = seeded((0..50).map(|key| (key, key)));
        let second = seeded((0..50).map(|key| (key, key)));
        let root_key = |map: &TreapMap<i32, i32>| map.root.map(|id| map.arena[id].key);
        assert_eq!(root_key(&first), root_key(&second));
    }

    // =========================================================================
    // Split and Merge Tests
    // =========================================================================

    #[rstest]
    #[case(0)]
    #[case(1)]
    #[case(17)]
    #[case(40)]
    #[case(41)]
    #[case(100)]
    fn test_split_less_then_merge_restores(#[case] pivot: i32) {
        let mut map = seeded((1..=40).map(|key| (key, key * 2)));
        let original = map.clone();
        let upper = map.split_less(&pivot);
        assert_valid(&map);
        assert_valid(&upper);
        assert!(map.keys().all(|key| *key < pivot));
        assert!(upper.keys().all(|key| *key >= pivot));
        map.merge(upper).unwrap();
        assert_valid(&map);
        assert_eq!(map, original);
    }

    #[rstest]
    #[case(0)]
    #[case(5)]
    #[case(35)]
    #[case(40)]
    fn test_split_less_or_equal_then_merge_restores(#[case] pivot: i32) {
        let mut map = seeded((1..=40).map(|key| (key, key * 2)));
        let original = map.clone();
        let upper = map.split_less_or_equal(&pivot);
        assert_valid(&map);
        assert_valid(&upper);
        assert!(map.keys().all(|key| *key <= pivot));
        assert!(upper.keys().all(|key| *key > pivot));
        map.merge(upper).unwrap();
        assert_eq!(map, original);
    }

    #[rstest]
    fn test_merge_small_into_large_and_large_into_small() {
        let mut small = seeded((1..=3).map(|key| (key, key)));
        let large = seeded((10..=60).map(|key| (key, key)));
        small.merge(large).unwrap();
        assert_valid(&small);
        assert_eq!(small.len(), 54);

        let mut large = seeded((1..=50).map(|key| (key, key)));
        let small = seeded((100..=102).map(|key| (key, key)));
        large.merge(small).unwrap();
        assert_valid(&large);
        assert_eq!(large.len(), 53);
    }

    #[rstest]
    fn test_merge_rejects_overlap_and_keeps_both_sides() {
        let mut map = seeded((1..=5).map(|key| (key, key)));
        let overlapping = seeded((5..=9).map(|key| (key, key)));
        let error = map.merge(overlapping).unwrap_err();
        assert_eq!(map.len(), 5);
        let rejected = error.into_inner();
        assert_eq!(rejected.len(), 5);
        assert_valid(&rejected);
    }

    #[rstest]
    fn test_merge_with_empty_sides() {
        let mut empty: TreapMap<i32, i32> = TreapMap::new();
        empty.merge(seeded([(1, 1)])).unwrap();
        assert_eq!(empty.len(), 1);
        empty.merge(TreapMap::new()).unwrap();
        assert_eq!(empty.len(), 1);
    }

    #[rstest]
    fn test_reverse_order_split() {
        let mut map: TreapMap<i32, (), ReverseOrder> = (1..=6).map(|key| (key, ())).collect();
        let rest = map.split_less(&3);
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![6, 5, 4]);
        assert_eq!(rest.keys().copied().collect::<Vec<_>>(), vec![3, 2, 1]);
        assert_valid(&map);
        assert_valid(&rest);
    }

    // =========================================================================
    // Cursor Removal Tests
    // =========================================================================

    #[rstest]
    fn test_pop_first_and_last() {
        let mut map = seeded((1..=4).map(|key| (key, key * 10)));
        assert_eq!(map.pop_first(), Some((1, 10)));
        assert_eq!(map.pop_last(), Some((4, 40)));
        assert_valid(&map);
        assert_eq!(map.keys().copied().collect::<Vec<_>>(), vec![2, 3]);
    }

    #[rstest]
    fn test_retain_keeps_invariants() {
        let mut map = seeded((0..100).map(|key| (key, key)));
        map.retain(|key, _| key % 7 != 0);
        assert_valid(&map);
        assert_eq!(map.len(), 100 - 15);
    }

    #[rstest]
    fn test_clear_releases_storage() {
        let mut map = seeded((0..10).map(|key| (key, key)));
        map.clear();
        assert!(map.is_empty());
        assert_eq!(map.arena.live(), 0);
        map.insert(1, 1);
        assert_valid(&map);
    }

    #[rstest]
    #[should_panic(expected = "TreapMap: key not found")]
    fn test_index_missing_key_panics() {
        let map = seeded([(1, 1)]);
        let _value = map[&2];
    }
}
