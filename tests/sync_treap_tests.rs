#![cfg(feature = "sync")]
//! Integration tests for the synchronized treap wrappers.
//!
//! Each public call takes the lock once, so the containers must stay
//! consistent while many threads write and read concurrently.

use rstest::rstest;
use std::sync::{Arc, Barrier};
use std::thread;
use ts_collections::ordered::TreapMap;
use ts_collections::sync::{SyncTreapMap, SyncTreapSet};

#[rstest]
#[case(2)]
#[case(8)]
fn test_parallel_disjoint_inserts(#[case] threads: usize) {
    let map = Arc::new(SyncTreapMap::with_seed(3));
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|worker| {
            let map = Arc::clone(&map);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for index in 0..200 {
                    assert_eq!(map.insert(index * threads + worker, worker), None);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let snapshot = map.snapshot();
    assert_eq!(snapshot.len(), threads * 200);
    assert!(snapshot.keys().copied().eq(0..threads * 200));
    assert_eq!(map.get(&(threads + 1)), Some(1));
}

#[rstest]
fn test_contended_counter_with_write_closure() {
    let map: Arc<SyncTreapMap<&str, u64>> = Arc::new(SyncTreapMap::new());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let map = Arc::clone(&map);
            thread::spawn(move || {
                for _ in 0..500 {
                    map.with_write(|inner| *inner.get_or_insert_default("total") += 1);
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(map.get("total"), Some(2000));
}

#[rstest]
fn test_readers_see_consistent_bounds_during_writes() {
    let map = Arc::new(SyncTreapMap::from_map(
        (0..1000).map(|key| (key * 2, key)).collect::<TreapMap<i64, i64>>(),
    ));
    let writer = {
        let map = Arc::clone(&map);
        thread::spawn(move || {
            for key in 0..1000 {
                map.insert(key * 2 + 1, -key);
            }
        })
    };
    let reader = {
        let map = Arc::clone(&map);
        thread::spawn(move || {
            for probe in 0..1000 {
                let below = map.find_less_or_equal(&(probe * 2));
                assert_eq!(below.map(|(key, _)| key), Some(probe * 2));
            }
        })
    };
    writer.join().unwrap();
    reader.join().unwrap();
    assert_eq!(map.len(), 2000);
    assert_eq!(map.rank(&1000), 1000);
}

#[rstest]
fn test_set_wrapper_round_trip_through_into_inner() {
    let set: SyncTreapSet<i32> = SyncTreapSet::new();
    for value in [5, 3, 9] {
        set.insert(value);
    }
    let upper = set.split_less(&5);
    assert_eq!(set.len(), 1);
    assert_eq!(upper.len(), 2);
    set.merge(upper).unwrap();
    let inner = set.into_inner();
    assert_eq!(inner.iter().copied().collect::<Vec<_>>(), vec![3, 5, 9]);
}
