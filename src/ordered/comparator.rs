//! Key ordering for the treap containers.
//!
//! Every ordered container in this crate is parameterized by a
//! [`Comparator`], a strict weak order over the key type. The default is
//! [`NaturalOrder`], which defers to [`Ord`].
//!
//! # Examples
//!
//! ```rust
//! use ts_collections::ordered::{CompareBy, ReverseOrder, TreapMap};
//!
//! let mut descending = TreapMap::with_comparator(ReverseOrder);
//! descending.insert(1, "one");
//! descending.insert(3, "three");
//! descending.insert(2, "two");
//! let keys: Vec<&i32> = descending.keys().collect();
//! assert_eq!(keys, vec![&3, &2, &1]);
//!
//! let by_length = CompareBy(|left: &&str, right: &&str| left.len().cmp(&right.len()));
//! let mut map = TreapMap::with_comparator(by_length);
//! map.insert("ccc", 3);
//! map.insert("a", 1);
//! assert_eq!(map.first_key_value(), Some((&"a", &1)));
//! ```

use std::cmp::Ordering;

/// A strict weak order over values of type `T`.
///
/// Implementations must be consistent: `compare(a, b) == Less` exactly when
/// `compare(b, a) == Greater`, and the relation must be transitive. A
/// comparator that violates this corrupts the tree's ordering invariant.
pub trait Comparator<T: ?Sized> {
    /// Compares two values.
    fn compare(&self, left: &T, right: &T) -> Ordering;
}

/// Orders keys by their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct NaturalOrder;

impl<T: Ord + ?Sized> Comparator<T> for NaturalOrder {
    #[inline]
    fn compare(&self, left: &T, right: &T) -> Ordering {
        left.cmp(right)
    }
}

/// Orders keys by the reverse of their [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ReverseOrder;

impl<T: Ord + ?Sized> Comparator<T> for ReverseOrder {
    #[inline]
    fn compare(&self, left: &T, right: &T) -> Ordering {
        right.cmp(left)
    }
}

/// Adapts a closure `Fn(&T, &T) -> Ordering` into a [`Comparator`].
#[derive(Clone, Copy, Default)]
pub struct CompareBy<F>(pub F);

impl<T: ?Sized, F> Comparator<T> for CompareBy<F>
where
    F: Fn(&T, &T) -> Ordering,
{
    #[inline]
    fn compare(&self, left: &T, right: &T) -> Ordering {
        (self.0)(left, right)
    }
}

impl<F> std::fmt::Debug for CompareBy<F> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.write_str("CompareBy(..)")
    }
}
