use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::collections::{BTreeMap, BTreeSet};

use crimson_tree::{RBTreeMap, RBTreeSet};

const N: usize = 10_000;

// ─── Helper functions to generate key sequences ─────────────────────────────

fn ordered_keys(n: usize) -> Vec<i64> {
    (0..n as i64).collect()
}

fn random_keys(n: usize) -> Vec<i64> {
    // Use a simple LCG for a deterministic pseudo-random sequence
    let mut keys = Vec::with_capacity(n);
    let mut x: u64 = 12345;
    for _ in 0..n {
        x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
        keys.push((x >> 33) as i64);
    }
    keys
}

// ─── Map Benchmarks ─────────────────────────────────────────────────────────

fn bench_map_insert_ordered(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_insert_ordered");

    group.bench_function(BenchmarkId::new("RBTreeMap", N), |b| {
        b.iter(|| {
            let mut map = RBTreeMap::new();
            for i in 0..N as i64 {
                map.insert(i, i);
            }
            map
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut map = BTreeMap::new();
            for i in 0..N as i64 {
                map.insert(i, i);
            }
            map
        });
    });

    group.finish();
}

fn bench_map_insert_reverse(c: &mut Criterion) {
    let mut group = c.benchmark_group("map_insert_reverse");

    group.bench_function(BenchmarkId::new("RBTreeMap", N), |b| {
        b.iter(|| {
            let mut map = RBTreeMap::new();
            for i in (0..N as i64).rev() {
                map.insert(i, i);
            }
            map
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut map = BTreeMap::new();
            for i in (0..N as i64).rev() {
                map.insert(i, i);
            }
            map
        });
    });

    group.finish();
}

fn bench_map_insert_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("map_insert_random");

    group.bench_function(BenchmarkId::new("RBTreeMap", N), |b| {
        b.iter(|| {
            let mut map = RBTreeMap::new();
            for &k in &keys {
                map.insert(k, k);
            }
            map
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut map = BTreeMap::new();
            for &k in &keys {
                map.insert(k, k);
            }
            map
        });
    });

    group.finish();
}

fn bench_map_extend_sorted(c: &mut Criterion) {
    // The hinted insertion path: bulk-loading already sorted pairs.
    let mut group = c.benchmark_group("map_extend_sorted");

    group.bench_function(BenchmarkId::new("RBTreeMap", N), |b| {
        b.iter(|| {
            let map: RBTreeMap<i64, i64> = (0..N as i64).map(|k| (k, k)).collect();
            map
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let map: BTreeMap<i64, i64> = (0..N as i64).map(|k| (k, k)).collect();
            map
        });
    });

    group.finish();
}

fn bench_map_get_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let rb_map: RBTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    let bt_map: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();

    let mut group = c.benchmark_group("map_get_random");

    group.bench_function(BenchmarkId::new("RBTreeMap", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for k in &keys {
                if let Some(&v) = rb_map.get(k) {
                    sum = sum.wrapping_add(v);
                }
            }
            sum
        });
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| {
            let mut sum = 0i64;
            for k in &keys {
                if let Some(&v) = bt_map.get(k) {
                    sum = sum.wrapping_add(v);
                }
            }
            sum
        });
    });

    group.finish();
}

fn bench_map_remove_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("map_remove_random");

    group.bench_function(BenchmarkId::new("RBTreeMap", N), |b| {
        b.iter_with_setup(
            || keys.iter().map(|&k| (k, k)).collect::<RBTreeMap<i64, i64>>(),
            |mut map| {
                for k in &keys {
                    map.remove(k);
                }
                map
            },
        );
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter_with_setup(
            || keys.iter().map(|&k| (k, k)).collect::<BTreeMap<i64, i64>>(),
            |mut map| {
                for k in &keys {
                    map.remove(k);
                }
                map
            },
        );
    });

    group.finish();
}

fn bench_map_iterate(c: &mut Criterion) {
    let keys = ordered_keys(N);
    let rb_map: RBTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();
    let bt_map: BTreeMap<i64, i64> = keys.iter().map(|&k| (k, k)).collect();

    let mut group = c.benchmark_group("map_iterate");

    group.bench_function(BenchmarkId::new("RBTreeMap", N), |b| {
        b.iter(|| rb_map.iter().map(|(_, &v)| v).sum::<i64>());
    });

    group.bench_function(BenchmarkId::new("BTreeMap", N), |b| {
        b.iter(|| bt_map.iter().map(|(_, &v)| v).sum::<i64>());
    });

    group.finish();
}

// ─── Set Benchmarks ─────────────────────────────────────────────────────────

fn bench_set_insert_random(c: &mut Criterion) {
    let keys = random_keys(N);
    let mut group = c.benchmark_group("set_insert_random");

    group.bench_function(BenchmarkId::new("RBTreeSet", N), |b| {
        b.iter(|| {
            let mut set = RBTreeSet::new();
            for &k in &keys {
                set.insert(k);
            }
            set
        });
    });

    group.bench_function(BenchmarkId::new("BTreeSet", N), |b| {
        b.iter(|| {
            let mut set = BTreeSet::new();
            for &k in &keys {
                set.insert(k);
            }
            set
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_map_insert_ordered,
    bench_map_insert_reverse,
    bench_map_insert_random,
    bench_map_extend_sorted,
    bench_map_get_random,
    bench_map_remove_random,
    bench_map_iterate,
    bench_set_insert_random,
);
criterion_main!(benches);
