//! Benchmark for TreapMap vs standard BTreeMap.
//!
//! Compares TreapMap against Rust's standard BTreeMap for point operations,
//! bound queries and iteration, and measures the structural split/merge that
//! BTreeMap only offers as `split_off`/`append`.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::BTreeMap;
use std::hint::black_box;
use ts_collections::ordered::TreapMap;

const SIZES: [i32; 3] = [100, 1000, 10000];

/// Spreads `0..size` over a scattered insertion order.
fn scattered(size: i32) -> impl Iterator<Item = i32> {
    (0..size).map(move |index| (index * 7919) % size)
}

// =============================================================================
// insert Benchmark
// =============================================================================

fn benchmark_insert(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("insert");

    for size in SIZES {
        group.bench_with_input(BenchmarkId::new("TreapMap", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut map = TreapMap::with_seed(1);
                for key in scattered(size) {
                    map.insert(black_box(key), black_box(key * 2));
                }
                black_box(map)
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut map = BTreeMap::new();
                for key in scattered(size) {
                    map.insert(black_box(key), black_box(key * 2));
                }
                black_box(map)
            });
        });
    }

    group.finish();
}

// =============================================================================
// get Benchmark
// =============================================================================

fn benchmark_get(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("get");

    for size in SIZES {
        let treap_map: TreapMap<i32, i32> = (0..size).map(|key| (key, key * 2)).collect();
        let standard_map: BTreeMap<i32, i32> = (0..size).map(|key| (key, key * 2)).collect();

        group.bench_with_input(BenchmarkId::new("TreapMap", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut sum = 0_i64;
                for key in 0..size {
                    if let Some(&value) = treap_map.get(&black_box(key)) {
                        sum += i64::from(value);
                    }
                }
                black_box(sum)
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut sum = 0_i64;
                for key in 0..size {
                    if let Some(&value) = standard_map.get(&black_box(key)) {
                        sum += i64::from(value);
                    }
                }
                black_box(sum)
            });
        });
    }

    group.finish();
}

// =============================================================================
// delete Benchmark
// =============================================================================

fn benchmark_delete(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("delete");

    for size in SIZES {
        let treap_map: TreapMap<i32, i32> = (0..size).map(|key| (key, key)).collect();
        let standard_map: BTreeMap<i32, i32> = (0..size).map(|key| (key, key)).collect();

        group.bench_with_input(BenchmarkId::new("TreapMap", size), &size, |bencher, &size| {
            bencher.iter_batched(
                || treap_map.clone(),
                |mut map| {
                    for key in scattered(size) {
                        map.delete(&black_box(key));
                    }
                    map
                },
                criterion::BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |bencher, &size| {
            bencher.iter_batched(
                || standard_map.clone(),
                |mut map| {
                    for key in scattered(size) {
                        map.remove(&black_box(key));
                    }
                    map
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

// =============================================================================
// find_less Benchmark
// =============================================================================

fn benchmark_find_less(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("find_less");

    for size in SIZES {
        let treap_map: TreapMap<i32, i32> = (0..size).map(|key| (key * 2, key)).collect();
        let standard_map: BTreeMap<i32, i32> = (0..size).map(|key| (key * 2, key)).collect();

        group.bench_with_input(BenchmarkId::new("TreapMap", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut hits = 0;
                for probe in 0..size {
                    if !treap_map.find_less(&black_box(probe * 2 + 1)).is_end() {
                        hits += 1;
                    }
                }
                black_box(hits)
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |bencher, &size| {
            bencher.iter(|| {
                let mut hits = 0;
                for probe in 0..size {
                    if standard_map.range(..black_box(probe * 2 + 1)).next_back().is_some() {
                        hits += 1;
                    }
                }
                black_box(hits)
            });
        });
    }

    group.finish();
}

// =============================================================================
// iteration Benchmark
// =============================================================================

fn benchmark_iteration(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("iteration");

    for size in SIZES {
        let treap_map: TreapMap<i32, i32> = (0..size).map(|key| (key, key)).collect();
        let standard_map: BTreeMap<i32, i32> = (0..size).map(|key| (key, key)).collect();

        group.bench_with_input(BenchmarkId::new("TreapMap", size), &size, |bencher, _| {
            bencher.iter(|| {
                let sum: i64 = treap_map.values().map(|&value| i64::from(value)).sum();
                black_box(sum)
            });
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |bencher, _| {
            bencher.iter(|| {
                let sum: i64 = standard_map.values().map(|&value| i64::from(value)).sum();
                black_box(sum)
            });
        });
    }

    group.finish();
}

// =============================================================================
// split/merge Benchmark
// =============================================================================

fn benchmark_split_merge(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("split_merge");

    for size in SIZES {
        let treap_map: TreapMap<i32, i32> = (0..size).map(|key| (key, key)).collect();
        let standard_map: BTreeMap<i32, i32> = (0..size).map(|key| (key, key)).collect();
        let pivot = size * 9 / 10;

        group.bench_with_input(BenchmarkId::new("TreapMap", size), &size, |bencher, _| {
            bencher.iter_batched(
                || treap_map.clone(),
                |mut map| {
                    let upper = map.split_less(&black_box(pivot));
                    let _ = map.merge(upper);
                    map
                },
                criterion::BatchSize::LargeInput,
            );
        });

        group.bench_with_input(BenchmarkId::new("BTreeMap", size), &size, |bencher, _| {
            bencher.iter_batched(
                || standard_map.clone(),
                |mut map| {
                    let mut upper = map.split_off(&black_box(pivot));
                    map.append(&mut upper);
                    map
                },
                criterion::BatchSize::LargeInput,
            );
        });
    }

    group.finish();
}

// =============================================================================
// Criterion Group and Main
// =============================================================================

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_get,
    benchmark_delete,
    benchmark_find_less,
    benchmark_iteration,
    benchmark_split_merge
);

criterion_main!(benches);
