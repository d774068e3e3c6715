//! Integration tests for TreapSet.

use proptest::prelude::*;
use rstest::rstest;
use std::collections::BTreeSet;
use ts_collections::ordered::{ReverseOrder, TreapSet};

// =============================================================================
// Basic Tests
// =============================================================================

#[rstest]
fn test_new_set_is_empty() {
    let set: TreapSet<u8> = TreapSet::new();
    assert!(set.is_empty());
    assert_eq!(set.first(), None);
    assert_eq!(set.last(), None);
    assert_eq!(format!("{set}"), "{}");
}

#[rstest]
fn test_duplicates_are_ignored() {
    let set: TreapSet<i32> = [3, 1, 3, 2, 1].into_iter().collect();
    assert_eq!(set.len(), 3);
    assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[rstest]
#[case(0, None, Some(10))]
#[case(10, Some(10), Some(10))]
#[case(15, Some(10), Some(20))]
#[case(30, Some(30), Some(30))]
#[case(31, Some(30), None)]
fn test_inclusive_bounds(
    #[case] probe: i32,
    #[case] at_most: Option<i32>,
    #[case] at_least: Option<i32>,
) {
    let set: TreapSet<i32> = [10, 20, 30].into_iter().collect();
    assert_eq!(set.less_or_equal(&probe).copied(), at_most);
    assert_eq!(set.greater_or_equal(&probe).copied(), at_least);
}

#[rstest]
fn test_split_and_merge_round_trip() {
    let mut set: TreapSet<u32> = (0..100).collect();
    let upper = set.split_less(&40);
    assert_eq!(set.len(), 40);
    assert_eq!(upper.first(), Some(&40));
    set.merge(upper).unwrap();
    assert_eq!(set, (0..100).collect::<TreapSet<u32>>());
}

#[rstest]
fn test_reverse_set_range_follows_comparator() {
    let set: TreapSet<i32, ReverseOrder> = (0..10).collect();
    let window: Vec<i32> = set.range(7..=4).copied().collect();
    assert_eq!(window, vec![7, 6, 5, 4]);
}

#[rstest]
fn test_borrowed_lookup_on_string_set() {
    let mut set: TreapSet<String> = ["kiwi", "lime"].into_iter().map(String::from).collect();
    assert!(set.contains("kiwi"));
    assert!(set.remove("kiwi"));
    assert!(!set.remove("kiwi"));
    assert_eq!(set.iter().collect::<Vec<_>>(), vec!["lime"]);
}

// =============================================================================
// Model Laws
// =============================================================================

proptest! {
    /// Law: inserts and removals match BTreeSet.
    #[test]
    fn prop_set_matches_btreeset(
        inserts in prop::collection::vec(-50_i32..50, 0..100),
        removals in prop::collection::vec(-50_i32..50, 0..50),
        seed: u64
    ) {
        let mut set = TreapSet::with_seed(seed);
        let mut model = BTreeSet::new();
        for value in inserts {
            prop_assert_eq!(set.insert(value), model.insert(value));
        }
        for value in removals {
            prop_assert_eq!(set.remove(&value), model.remove(&value));
        }
        prop_assert!(set.iter().eq(model.iter()));
        for (index, value) in model.iter().enumerate() {
            prop_assert_eq!(set.get_index(index), Some(value));
            prop_assert_eq!(set.rank(value), index);
        }
    }
}
