//! Iterators over treap containers.
//!
//! Borrowing iterators walk the tree through parent links, one in-order
//! successor (or predecessor, from the back) at a time, so they need no
//! auxiliary stack. The remaining length is known up front from the cached
//! subtree sizes.

use std::iter::FusedIterator;

use super::arena::{Link, NodeArena, NodeId};

// =============================================================================
// Iter
// =============================================================================

/// An iterator over the entries of a [`TreapMap`](super::TreapMap), in key
/// order. Also returned by `range`.
pub struct Iter<'a, K, V> {
    arena: &'a NodeArena<K, V>,
    front: Link,
    back: Link,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    pub(crate) const fn new(
        arena: &'a NodeArena<K, V>,
        front: Link,
        back: Link,
        remaining: usize,
    ) -> Self {
        Self {
            arena,
            front,
            back,
            remaining,
        }
    }

    pub(crate) const fn empty(arena: &'a NodeArena<K, V>) -> Self {
        Self::new(arena, None, None, 0)
    }

    fn entry(&self, id: NodeId) -> (&'a K, &'a V) {
        let node = &self.arena[id];
        (&node.key, &node.value)
    }
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        self.remaining -= 1;
        self.front = self.arena.successor(id);
        Some(self.entry(id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        self.remaining -= 1;
        self.back = self.arena.predecessor(id);
        Some(self.entry(id))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {
    fn len(&self) -> usize {
        self.remaining
    }
}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

// =============================================================================
// Keys and Values
// =============================================================================

/// An iterator over the keys of a [`TreapMap`](super::TreapMap), in order.
#[derive(Clone)]
pub struct Keys<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Keys<'a, K, V> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(key, _)| key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Keys<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(key, _)| key)
    }
}

impl<K, V> ExactSizeIterator for Keys<'_, K, V> {}

impl<K, V> FusedIterator for Keys<'_, K, V> {}

/// An iterator over the values of a [`TreapMap`](super::TreapMap), in key
/// order.
#[derive(Clone)]
pub struct Values<'a, K, V> {
    pub(crate) inner: Iter<'a, K, V>,
}

impl<'a, K, V> Iterator for Values<'a, K, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for Values<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back().map(|(_, value)| value)
    }
}

impl<K, V> ExactSizeIterator for Values<'_, K, V> {}

impl<K, V> FusedIterator for Values<'_, K, V> {}

// =============================================================================
// IntoIter
// =============================================================================

/// An owning iterator over the entries of a [`TreapMap`](super::TreapMap),
/// in key order.
pub struct IntoIter<K, V> {
    arena: NodeArena<K, V>,
    order: std::vec::IntoIter<NodeId>,
}

impl<K, V> IntoIter<K, V> {
    pub(crate) fn new(arena: NodeArena<K, V>, root: Link) -> Self {
        let order = arena.in_order(root).into_iter();
        Self { arena, order }
    }
}

impl<K, V> Iterator for IntoIter<K, V> {
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.arena.release(self.order.next()?);
        Some((node.key, node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.order.size_hint()
    }
}

impl<K, V> DoubleEndedIterator for IntoIter<K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let node = self.arena.release(self.order.next_back()?);
        Some((node.key, node.value))
    }
}

impl<K, V> ExactSizeIterator for IntoIter<K, V> {}

impl<K, V> FusedIterator for IntoIter<K, V> {}
