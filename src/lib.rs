//! # ts-collections
//!
//! Ordered container types built on randomized balanced binary search
//! trees (treaps).
//!
//! ## Overview
//!
//! - **Ordered map**: [`TreapMap`](ordered::TreapMap), with bidirectional
//!   cursors, predecessor/successor queries, rank and positional access,
//!   and public split/merge
//! - **Ordered set**: [`TreapSet`](ordered::TreapSet) over the same tree
//! - **Synchronized variants**: [`SyncTreapMap`](sync::SyncTreapMap) and
//!   [`SyncTreapSet`](sync::SyncTreapSet), one lock acquisition per call
//!
//! The trees are balanced by random priorities: every operation runs in
//! O(log N) expected time, with no worst-case bound.
//!
//! ## Feature Flags
//!
//! - `sync` (default): lock-guarded wrappers, backed by `parking_lot`
//! - `serde`: `Serialize`/`Deserialize` for the maps and sets
//! - `full`: Enable all features
//!
//! ## Logging
//!
//! Structural operations emit records through the [`log`] facade (`debug`
//! for split and merge, `trace` for node relocation). The crate never
//! installs a logger.
//!
//! ## Example
//!
//! ```rust
//! use ts_collections::prelude::*;
//!
//! let mut map = TreapMap::new();
//! map.insert(1, 10);
//! map.insert(2, 20);
//! map.insert(3, 30);
//! *map.get_or_insert_default(4) = 40;
//! map.delete(&2);
//! map.delete(&3);
//!
//! assert_eq!(format!("{map}"), "{1: 10, 4: 40}");
//! assert_eq!(map.find(&1), map.begin());
//! assert_eq!(map.find(&2), map.end());
//! assert_eq!(map.find(&4), map.back());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Prelude module for convenient imports.
///
/// Re-exports the container types, the comparators and the error types.
///
/// # Usage
///
/// ```rust
/// use ts_collections::prelude::*;
/// ```
pub mod prelude {
    pub use crate::ordered::*;

    #[cfg(feature = "sync")]
    pub use crate::sync::*;
}

pub mod ordered;

#[cfg(feature = "sync")]
pub mod sync;
