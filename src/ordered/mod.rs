//! Ordered containers built on a treap.
//!
//! This module provides mutable, key-ordered containers whose balance comes
//! from random node priorities rather than rotations:
//!
//! - [`TreapMap`]: ordered map with cursors, bound queries, rank and
//!   structural split/merge
//! - [`TreapSet`]: ordered set over the same tree
//!
//! Ordering is pluggable through the [`Comparator`] trait; [`NaturalOrder`]
//! (the default) uses [`Ord`], [`ReverseOrder`] inverts it, and
//! [`CompareBy`] adapts a closure.
//!
//! # Split and Merge
//!
//! Every structural change is a split or a merge. They are also public:
//! a map can be cut at any key in O(log N) tree work, and two maps with
//! disjoint, ordered key ranges can be joined.
//!
//! ```rust
//! use ts_collections::ordered::TreapMap;
//!
//! let mut map: TreapMap<u32, &str> = TreapMap::with_seed(1);
//! map.extend([(1, "a"), (2, "b"), (3, "c"), (4, "d")]);
//!
//! let upper = map.split_less(&3);
//! assert_eq!(map.len(), 2);
//! assert_eq!(upper.first_key_value(), Some((&3, &"c")));
//!
//! map.merge(upper).unwrap();
//! assert_eq!(map.len(), 4);
//! ```
//!
//! # Cursors
//!
//! `begin`, `end`, `back` and the `find*` family return a [`Cursor`], a
//! position that can step in both directions. The end position is a
//! sentinel one past the last entry.
//!
//! ```rust
//! use ts_collections::ordered::TreapMap;
//!
//! let map: TreapMap<i32, i32> = [(1, 10), (3, 30), (5, 50)].into_iter().collect();
//! let mut cursor = map.find_greater_or_equal(&2);
//! assert_eq!(cursor.key(), Some(&3));
//! cursor.move_next();
//! assert_eq!(cursor.value(), Some(&50));
//! cursor.move_next();
//! assert!(cursor.is_end());
//! ```

mod arena;
mod comparator;
mod config;
mod cursor;
mod error;
mod iter;
mod treap_map;
mod treap_set;

pub use comparator::CompareBy;
pub use comparator::Comparator;
pub use comparator::NaturalOrder;
pub use comparator::ReverseOrder;
pub use config::TreapConfig;
pub use cursor::Cursor;
pub use cursor::CursorMut;
pub use error::MergeError;
pub use error::TreapError;
pub use iter::IntoIter;
pub use iter::Iter;
pub use iter::Keys;
pub use iter::Values;
pub use treap_map::TreapMap;
pub use treap_set::TreapSet;
pub use treap_set::TreapSetIntoIterator;
pub use treap_set::TreapSetIterator;
