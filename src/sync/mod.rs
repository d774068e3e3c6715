//! Thread-safe wrappers around the ordered containers.
//!
//! [`SyncTreapMap`] and [`SyncTreapSet`] keep their tree behind a
//! [`parking_lot::RwLock`]. Each method takes the lock exactly once, shared
//! for queries and exclusive for mutations, and releases it before
//! returning. A sequence of calls is therefore not atomic: two threads
//! interleaving `contains_key` and `insert` can both observe the key as
//! absent.
//!
//! Because no guard escapes a call, lookups return owned values (`V:
//! Clone`) and [`snapshot`](SyncTreapMap::snapshot) clones the whole tree
//! for read-heavy work such as iteration.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use std::thread;
//! use ts_collections::sync::SyncTreapMap;
//!
//! let map = Arc::new(SyncTreapMap::new());
//! let workers: Vec<_> = (0..4)
//!     .map(|worker| {
//!         let map = Arc::clone(&map);
//!         thread::spawn(move || {
//!             for key in 0..100 {
//!                 map.insert(worker * 100 + key, worker);
//!             }
//!         })
//!     })
//!     .collect();
//! for worker in workers {
//!     worker.join().unwrap();
//! }
//! assert_eq!(map.len(), 400);
//! assert_eq!(map.get(&250), Some(2));
//! ```

mod map;
mod set;

pub use map::SyncTreapMap;
pub use set::SyncTreapSet;
