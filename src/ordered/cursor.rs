//! Positions inside a [`TreapMap`].
//!
//! A cursor is a map reference plus either a node or the end sentinel.
//! The end sentinel sits one past the last entry and also anchors reverse
//! traversal: stepping back from it lands on the last entry, and stepping
//! forward from it wraps to the first.
//!
//! ```rust
//! use ts_collections::ordered::TreapMap;
//!
//! let map: TreapMap<i32, &str> = [(1, "a"), (2, "b"), (3, "c")].into_iter().collect();
//!
//! let mut cursor = map.end();
//! cursor.move_prev();
//! assert_eq!(cursor.key_value(), Some((&3, &"c")));
//! assert_eq!(cursor, map.back());
//!
//! cursor = map.begin();
//! cursor.move_prev();
//! assert!(cursor.is_end());
//! ```

use std::fmt;

use super::arena::Link;
use super::error::TreapError;
use super::treap_map::TreapMap;

// =============================================================================
// Cursor
// =============================================================================

/// A read-only position inside a [`TreapMap`].
///
/// Two cursors are equal when they point into the same map at the same
/// position.
pub struct Cursor<'a, K, V, C> {
    map: &'a TreapMap<K, V, C>,
    position: Link,
}

impl<'a, K, V, C> Cursor<'a, K, V, C> {
    pub(crate) const fn new(map: &'a TreapMap<K, V, C>, position: Link) -> Self {
        Self { map, position }
    }

    /// Returns `true` if the cursor is at the end sentinel.
    #[inline]
    #[must_use]
    pub const fn is_end(&self) -> bool {
        self.position.is_none()
    }

    /// The key at the cursor, or `None` at the end.
    #[must_use]
    pub fn key(&self) -> Option<&'a K> {
        self.key_value().map(|(key, _)| key)
    }

    /// The value at the cursor, or `None` at the end.
    #[must_use]
    pub fn value(&self) -> Option<&'a V> {
        self.key_value().map(|(_, value)| value)
    }

    /// The entry at the cursor, or `None` at the end.
    #[must_use]
    pub fn key_value(&self) -> Option<(&'a K, &'a V)> {
        let map = self.map;
        self.position.map(|id| {
            let node = &map.arena[id];
            (&node.key, &node.value)
        })
    }

    /// The entry at the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is at the end sentinel. Use
    /// [`key_value`](Self::key_value) or [`try_entry`](Self::try_entry) when
    /// the position may be the end.
    #[must_use]
    pub fn entry(&self) -> (&'a K, &'a V) {
        match self.key_value() {
            Some(entry) => entry,
            None => panic!("TreapMap cursor: dereferenced the end position"),
        }
    }

    /// The entry at the cursor, or [`TreapError::EndOfMap`] at the end.
    ///
    /// # Errors
    ///
    /// Returns [`TreapError::EndOfMap`] if the cursor is at the end sentinel.
    pub fn try_entry(&self) -> Result<(&'a K, &'a V), TreapError> {
        self.key_value().ok_or(TreapError::EndOfMap)
    }

    /// Zero-based position of the entry in key order, or `None` at the end.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        self.position.map(|id| self.map.arena.position(id))
    }

    /// Advances to the in-order successor. From the last entry this reaches
    /// the end; from the end it wraps to the first entry.
    pub fn move_next(&mut self) {
        self.position = match self.position {
            Some(id) => self.map.arena.successor(id),
            None => self.map.arena.leftmost(self.map.root),
        };
    }

    /// Steps back to the in-order predecessor. From the first entry this
    /// reaches the end; from the end it moves to the last entry.
    pub fn move_prev(&mut self) {
        self.position = match self.position {
            Some(id) => self.map.arena.predecessor(id),
            None => self.map.arena.rightmost(self.map.root),
        };
    }

    /// Returns a cursor at the successor, leaving this one in place.
    #[must_use]
    pub fn peek_next(&self) -> Self {
        let mut next = *self;
        next.move_next();
        next
    }

    /// Returns a cursor at the predecessor, leaving this one in place.
    #[must_use]
    pub fn peek_prev(&self) -> Self {
        let mut previous = *self;
        previous.move_prev();
        previous
    }
}

impl<K, V, C> Clone for Cursor<'_, K, V, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V, C> Copy for Cursor<'_, K, V, C> {}

impl<K, V, C> PartialEq for Cursor<'_, K, V, C> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.map, other.map) && self.position == other.position
    }
}

impl<K, V, C> Eq for Cursor<'_, K, V, C> {}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for Cursor<'_, K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_tuple("Cursor")
            .field(&self.key_value())
            .finish()
    }
}

// =============================================================================
// CursorMut
// =============================================================================

/// A position inside a [`TreapMap`] that can modify the value under it or
/// remove the entry.
///
/// ```rust
/// use ts_collections::ordered::TreapMap;
///
/// let mut map: TreapMap<i32, i32> = (1..=6).map(|key| (key, key * 10)).collect();
///
/// let mut cursor = map.begin_mut();
/// while let Some((key, value)) = cursor.key_value_mut() {
///     if key % 2 == 0 {
///         cursor.remove_current();
///     } else {
///         *value += 1;
///         cursor.move_next();
///     }
/// }
///
/// let entries: Vec<(i32, i32)> = map.into_iter().collect();
/// assert_eq!(entries, vec![(1, 11), (3, 31), (5, 51)]);
/// ```
pub struct CursorMut<'a, K, V, C> {
    map: &'a mut TreapMap<K, V, C>,
    position: Link,
}

impl<'a, K, V, C> CursorMut<'a, K, V, C> {
    pub(crate) const fn new(map: &'a mut TreapMap<K, V, C>, position: Link) -> Self {
        Self { map, position }
    }

    /// Returns `true` if the cursor is at the end sentinel.
    #[inline]
    #[must_use]
    pub const fn is_end(&self) -> bool {
        self.position.is_none()
    }

    /// The key at the cursor, or `None` at the end.
    #[must_use]
    pub fn key(&self) -> Option<&K> {
        self.position.map(|id| &self.map.arena[id].key)
    }

    /// The value at the cursor, or `None` at the end.
    #[must_use]
    pub fn value(&self) -> Option<&V> {
        self.position.map(|id| &self.map.arena[id].value)
    }

    /// Mutable access to the value at the cursor.
    pub fn value_mut(&mut self) -> Option<&mut V> {
        let id = self.position?;
        Some(&mut self.map.arena[id].value)
    }

    /// The key and a mutable reference to the value at the cursor.
    pub fn key_value_mut(&mut self) -> Option<(&K, &mut V)> {
        let id = self.position?;
        let node = &mut self.map.arena[id];
        Some((&node.key, &mut node.value))
    }

    /// See [`Cursor::move_next`].
    pub fn move_next(&mut self) {
        self.position = match self.position {
            Some(id) => self.map.arena.successor(id),
            None => self.map.arena.leftmost(self.map.root),
        };
    }

    /// See [`Cursor::move_prev`].
    pub fn move_prev(&mut self) {
        self.position = match self.position {
            Some(id) => self.map.arena.predecessor(id),
            None => self.map.arena.rightmost(self.map.root),
        };
    }

    /// Removes the entry at the cursor and moves to its successor.
    ///
    /// Returns `None` (and does nothing) at the end sentinel.
    pub fn remove_current(&mut self) -> Option<(K, V)> {
        let id = self.position?;
        let next = self.map.arena.successor(id);
        let (root, node) = self.map.arena.splice_out(self.map.root, id);
        self.map.root = root;
        self.position = next;
        Some((node.key, node.value))
    }

    /// A read-only view of the same position.
    #[must_use]
    pub fn as_cursor(&self) -> Cursor<'_, K, V, C> {
        Cursor::new(self.map, self.position)
    }
}

impl<K: fmt::Debug, V: fmt::Debug, C> fmt::Debug for CursorMut<'_, K, V, C> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_tuple("CursorMut")
            .field(&self.as_cursor().key_value())
            .finish()
    }
}
