//! Error types for the ordered containers.
//!
//! Lookups that simply miss are not errors: they return `None` or an end
//! cursor. These types exist for callers who prefer `?` propagation and for
//! the one structural precondition the containers can check cheaply, the
//! key ordering required by [`TreapMap::merge`](super::TreapMap::merge).

use std::fmt;

/// Represents a failed lookup or a read at the end position.
///
/// # Examples
///
/// ```rust
/// use ts_collections::ordered::{TreapError, TreapMap};
///
/// let map: TreapMap<i32, &str> = TreapMap::new();
/// assert_eq!(map.try_get(&1), Err(TreapError::KeyNotFound));
/// assert_eq!(format!("{}", TreapError::KeyNotFound), "key not found");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreapError {
    /// No entry is stored under the requested key.
    KeyNotFound,
    /// The cursor is positioned at the end sentinel, which has no entry.
    EndOfMap,
}

impl fmt::Display for TreapError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyNotFound => write!(formatter, "key not found"),
            Self::EndOfMap => write!(formatter, "cursor is at the end of the map"),
        }
    }
}

impl std::error::Error for TreapError {}

/// Returned by `merge` when the argument's keys do not all come strictly
/// after the receiver's keys.
///
/// The rejected container is handed back unchanged so no entries are lost.
///
/// # Examples
///
/// ```rust
/// use ts_collections::ordered::TreapMap;
///
/// let mut low: TreapMap<i32, i32> = (1..=5).map(|key| (key, key)).collect();
/// let overlapping: TreapMap<i32, i32> = (5..=8).map(|key| (key, key)).collect();
///
/// let error = low.merge(overlapping).unwrap_err();
/// assert_eq!(low.len(), 5);
/// assert_eq!(error.into_inner().len(), 4);
/// ```
pub struct MergeError<T> {
    rejected: T,
}

impl<T> MergeError<T> {
    pub(crate) const fn new(rejected: T) -> Self {
        Self { rejected }
    }

    /// Returns the container that could not be merged.
    pub fn into_inner(self) -> T {
        self.rejected
    }

    /// Borrows the container that could not be merged.
    pub const fn rejected(&self) -> &T {
        &self.rejected
    }
}

impl<T> fmt::Debug for MergeError<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.debug_struct("MergeError").finish_non_exhaustive()
    }
}

impl<T> fmt::Display for MergeError<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "merge: keys of the merged container must all be greater than the receiver's keys"
        )
    }
}

impl<T> std::error::Error for MergeError<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TreapError::KeyNotFound, "key not found")]
    #[case(TreapError::EndOfMap, "cursor is at the end of the map")]
    fn test_treap_error_display(#[case] error: TreapError, #[case] expected: &str) {
        assert_eq!(format!("{error}"), expected);
    }

    #[rstest]
    fn test_merge_error_returns_rejected_value() {
        let error = MergeError::new(vec![1, 2, 3]);
        assert_eq!(error.rejected(), &vec![1, 2, 3]);
        assert_eq!(error.into_inner(), vec![1, 2, 3]);
    }

    #[rstest]
    fn test_merge_error_is_std_error() {
        fn assert_error<E: std::error::Error>(_: &E) {}
        let error = MergeError::new(());
        assert_error(&error);
        assert_eq!(format!("{error:?}"), "MergeError { .. }");
    }
}
