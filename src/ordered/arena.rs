//! Node storage and the treap primitives: split, merge and push-up.
//!
//! Nodes of one tree live in a [`NodeArena`], a vector of slots addressed
//! by [`NodeId`]. Child links own their target; the parent link is a plain
//! back-reference kept in sync by [`NodeArena::push_up`]. Split and merge
//! take the links they restructure by value and hand back the links they
//! produce, so a subtree root is always held in exactly one place.
//!
//! The heap order is a min-heap on priorities: a node's priority is never
//! greater than its children's.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::ops::{Index, IndexMut};

use super::comparator::Comparator;

/// Stable address of a node inside its arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

/// An optional subtree root.
pub(crate) type Link = Option<NodeId>;

#[derive(Clone, Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) priority: u64,
    pub(crate) left: Link,
    pub(crate) right: Link,
    pub(crate) parent: Link,
    pub(crate) size: usize,
}

impl<K, V> Node<K, V> {
    const fn singleton(key: K, value: V, priority: u64) -> Self {
        Self {
            key,
            value,
            priority,
            left: None,
            right: None,
            parent: None,
            size: 1,
        }
    }
}

/// Which side of a split receives keys equal to the pivot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SplitMode {
    /// Left receives keys strictly less than the pivot.
    Less,
    /// Left receives keys less than or equal to the pivot.
    LessOrEqual,
}

impl SplitMode {
    /// `ordering` is `node_key.cmp(pivot)`.
    const fn goes_left(self, ordering: Ordering) -> bool {
        match self {
            Self::Less => matches!(ordering, Ordering::Less),
            Self::LessOrEqual => !matches!(ordering, Ordering::Greater),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct NodeArena<K, V> {
    slots: Vec<Option<Node<K, V>>>,
    vacant: Vec<usize>,
}

impl<K, V> Default for NodeArena<K, V> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<K, V> Index<NodeId> for NodeArena<K, V> {
    type Output = Node<K, V>;

    fn index(&self, id: NodeId) -> &Self::Output {
        match self.slots.get(id.0) {
            Some(Some(node)) => node,
            _ => panic!("treap arena: link to vacant slot {}", id.0),
        }
    }
}

impl<K, V> IndexMut<NodeId> for NodeArena<K, V> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        match self.slots.get_mut(id.0) {
            Some(Some(node)) => node,
            _ => panic!("treap arena: link to vacant slot {}", id.0),
        }
    }
}

impl<K, V> NodeArena<K, V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            vacant: Vec::new(),
        }
    }

    /// Number of live nodes.
    pub(crate) fn live(&self) -> usize {
        self.slots.len() - self.vacant.len()
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.vacant.clear();
    }

    /// Stores a detached single-node tree and returns its id.
    pub(crate) fn allocate(&mut self, key: K, value: V, priority: u64) -> NodeId {
        self.store(Node::singleton(key, value, priority))
    }

    fn store(&mut self, node: Node<K, V>) -> NodeId {
        if let Some(index) = self.vacant.pop() {
            self.slots[index] = Some(node);
            NodeId(index)
        } else {
            self.slots.push(Some(node));
            NodeId(self.slots.len() - 1)
        }
    }

    /// Frees a node and returns its contents. The caller must already have
    /// unlinked it from the tree.
    pub(crate) fn release(&mut self, id: NodeId) -> Node<K, V> {
        match self.slots.get_mut(id.0).and_then(Option::take) {
            Some(node) => {
                self.vacant.push(id.0);
                node
            }
            None => panic!("treap arena: double release of slot {}", id.0),
        }
    }

    pub(crate) fn size(&self, link: Link) -> usize {
        link.map_or(0, |id| self[id].size)
    }

    /// Recomputes the cached size of `id` and points its children back at it.
    pub(crate) fn push_up(&mut self, id: NodeId) {
        let (left, right) = (self[id].left, self[id].right);
        let mut size = 1;
        if let Some(child) = left {
            size += self[child].size;
            self[child].parent = Some(id);
        }
        if let Some(child) = right {
            size += self[child].size;
            self[child].parent = Some(id);
        }
        self[id].size = size;
    }

    fn detach(&mut self, link: Link) -> Link {
        if let Some(id) = link {
            self[id].parent = None;
        }
        link
    }

    // =========================================================================
    // Split and Merge
    // =========================================================================

    fn split<Q, C>(&mut self, link: Link, pivot: &Q, mode: SplitMode, comparator: &C) -> (Link, Link)
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let Some(id) = link else {
            return (None, None);
        };
        let ordering = comparator.compare(self[id].key.borrow(), pivot);
        if mode.goes_left(ordering) {
            let right = self[id].right;
            let (middle, rest) = self.split(right, pivot, mode, comparator);
            self[id].right = middle;
            self.push_up(id);
            (Some(id), rest)
        } else {
            let left = self[id].left;
            let (rest, middle) = self.split(left, pivot, mode, comparator);
            self[id].left = middle;
            self.push_up(id);
            (rest, Some(id))
        }
    }

    /// Splits the tree rooted at `root` around `pivot`. Both outputs come
    /// back as proper roots (no parent).
    pub(crate) fn split_root<Q, C>(
        &mut self,
        root: Link,
        pivot: &Q,
        mode: SplitMode,
        comparator: &C,
    ) -> (Link, Link)
    where
        K: Borrow<Q>,
        Q: ?Sized,
        C: Comparator<Q>,
    {
        let (left, right) = self.split(root, pivot, mode, comparator);
        (self.detach(left), self.detach(right))
    }

    /// Joins two trees whose keys are disjoint, every key of `left` ordering
    /// before every key of `right`. The precondition is not checked here.
    fn merge(&mut self, left: Link, right: Link) -> Link {
        let (left_id, right_id) = match (left, right) {
            (None, other) | (other, None) => return other,
            (Some(left_id), Some(right_id)) => (left_id, right_id),
        };
        if self[left_id].priority < self[right_id].priority {
            let child = self[left_id].right;
            let merged = self.merge(child, right);
            self[left_id].right = merged;
            self.push_up(left_id);
            left
        } else {
            let child = self[right_id].left;
            let merged = self.merge(left, child);
            self[right_id].left = merged;
            self.push_up(right_id);
            right
        }
    }

    pub(crate) fn merge_root(&mut self, left: Link, right: Link) -> Link {
        let merged = self.merge(left, right);
        self.detach(merged)
    }

    /// Removes `id` from the tree rooted at `root` by merging its children
    /// into its place. Returns the new root and the freed node.
    pub(crate) fn splice_out(&mut self, root: Link, id: NodeId) -> (Link, Node<K, V>) {
        let (left, right, parent) = (self[id].left, self[id].right, self[id].parent);
        let replacement = self.merge(left, right);
        let new_root = match parent {
            None => self.detach(replacement),
            Some(parent_id) => {
                if self[parent_id].left == Some(id) {
                    self[parent_id].left = replacement;
                } else {
                    self[parent_id].right = replacement;
                }
                let mut ancestor = Some(parent_id);
                while let Some(current) = ancestor {
                    self.push_up(current);
                    ancestor = self[current].parent;
                }
                root
            }
        };
        (new_root, self.release(id))
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    pub(crate) fn leftmost(&self, link: Link) -> Link {
        let mut current = link?;
        while let Some(left) = self[current].left {
            current = left;
        }
        Some(current)
    }

    pub(crate) fn rightmost(&self, link: Link) -> Link {
        let mut current = link?;
        while let Some(right) = self[current].right {
            current = right;
        }
        Some(current)
    }

    /// In-order successor, or `None` past the last node.
    pub(crate) fn successor(&self, id: NodeId) -> Link {
        if self[id].right.is_some() {
            return self.leftmost(self[id].right);
        }
        let mut current = id;
        while let Some(parent) = self[current].parent {
            if self[parent].right == Some(current) {
                current = parent;
            } else {
                return Some(parent);
            }
        }
        None
    }

    /// In-order predecessor, or `None` before the first node.
    pub(crate) fn predecessor(&self, id: NodeId) -> Link {
        if self[id].left.is_some() {
            return self.rightmost(self[id].left);
        }
        let mut current = id;
        while let Some(parent) = self[current].parent {
            if self[parent].left == Some(current) {
                current = parent;
            } else {
                return Some(parent);
            }
        }
        None
    }

    /// Zero-based in-order position of `id` within its tree.
    pub(crate) fn position(&self, id: NodeId) -> usize {
        let mut position = self.size(self[id].left);
        let mut current = id;
        while let Some(parent) = self[current].parent {
            if self[parent].right == Some(current) {
                position += self.size(self[parent].left) + 1;
            }
            current = parent;
        }
        position
    }

    /// Node at zero-based in-order `index` in the tree rooted at `root`.
    pub(crate) fn select(&self, root: Link, mut index: usize) -> Link {
        let mut current = root?;
        loop {
            let left_size = self.size(self[current].left);
            match index.cmp(&left_size) {
                Ordering::Less => current = self[current].left?,
                Ordering::Equal => return Some(current),
                Ordering::Greater => {
                    index -= left_size + 1;
                    current = self[current].right?;
                }
            }
        }
    }

    /// Node ids of the tree rooted at `root`, in key order.
    pub(crate) fn in_order(&self, root: Link) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.size(root));
        let mut cursor = self.leftmost(root);
        while let Some(id) = cursor {
            order.push(id);
            cursor = self.successor(id);
        }
        order
    }

    // =========================================================================
    // Relocation
    // =========================================================================

    /// Moves the detached tree rooted at `root` into `target`, keeping its
    /// shape and priorities. Returns the root's id in `target`.
    pub(crate) fn relocate(&mut self, root: Link, target: &mut Self) -> Link {
        let moved = root.map(|id| self.relocate_node(id, target));
        log::trace!("treap arena: relocated {} nodes", target.size(moved));
        moved
    }

    fn relocate_node(&mut self, id: NodeId, target: &mut Self) -> NodeId {
        let node = self.release(id);
        let left = node.left.map(|child| self.relocate_node(child, target));
        let right = node.right.map(|child| self.relocate_node(child, target));
        let moved = target.store(Node {
            left,
            right,
            parent: None,
            ..node
        });
        target.push_up(moved);
        moved
    }

    // =========================================================================
    // Invariant checks
    // =========================================================================

    /// Verifies every tree invariant below `root`, returning the node count.
    #[cfg(test)]
    pub(crate) fn check_invariants<C>(&self, root: Link, comparator: &C) -> Result<usize, String>
    where
        C: Comparator<K>,
        K: std::fmt::Debug,
    {
        if let Some(id) = root {
            if self[id].parent.is_some() {
                return Err(format!("root {id:?} has a parent"));
            }
        }
        let count = self.check_subtree(root, comparator)?;
        let order = self.in_order(root);
        for pair in order.windows(2) {
            let (previous, next) = (&self[pair[0]].key, &self[pair[1]].key);
            if comparator.compare(previous, next) != Ordering::Less {
                return Err(format!("keys out of order: {previous:?} then {next:?}"));
            }
        }
        if order.len() != count {
            return Err(format!("walked {} nodes but sizes say {count}", order.len()));
        }
        Ok(count)
    }

    #[cfg(test)]
    fn check_subtree<C>(&self, link: Link, comparator: &C) -> Result<usize, String>
    where
        C: Comparator<K>,
        K: std::fmt::Debug,
    {
        let Some(id) = link else {
            return Ok(0);
        };
        let node = &self[id];
        let mut count = 1;
        for (child, is_left) in [(node.left, true), (node.right, false)] {
            let Some(child_id) = child else {
                continue;
            };
            let child_node = &self[child_id];
            if child_node.parent != Some(id) {
                return Err(format!("{:?} has a stale parent link", child_node.key));
            }
            if child_node.priority < node.priority {
                return Err(format!("heap order broken below {:?}", node.key));
            }
            let expected = if is_left { Ordering::Less } else { Ordering::Greater };
            if comparator.compare(&child_node.key, &node.key) != expected {
                return Err(format!("{:?} is on the wrong side of {:?}", child_node.key, node.key));
            }
            count += self.check_subtree(child, comparator)?;
        }
        if node.size != count {
            return Err(format!("{:?} caches size {} but has {count}", node.key, node.size));
        }
        Ok(count)
    }
}
