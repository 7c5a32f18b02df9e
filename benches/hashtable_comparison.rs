use core::hint::black_box;

use chained_hash::BucketHasher;
use chained_hash::ChainedHashTable;
use chained_hash::Fibonacci;
use chained_hash::hasher::FoldHashIndex;
use criterion::AxisScale;
use criterion::BatchSize;
use criterion::Criterion;
use criterion::PlotConfiguration;
use criterion::Throughput;
use criterion::criterion_group;
use criterion::criterion_main;
use hashbrown::HashMap as HashbrownMap;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand_distr::Zipf;

/// The operations every contender has to provide.
trait IntTable {
    const NAME: &'static str;

    fn new() -> Self;
    fn insert(&mut self, key: i64, value: i64);
    fn get(&self, key: i64) -> Option<i64>;
    fn remove(&mut self, key: i64) -> Option<i64>;
}

impl<H: BucketHasher + Default> IntTable for ChainedHashTable<H>
where
    H: NamedHasher,
{
    const NAME: &'static str = H::NAME;

    fn new() -> Self {
        ChainedHashTable::with_hasher(H::default())
    }

    fn insert(&mut self, key: i64, value: i64) {
        ChainedHashTable::insert(self, key, value)
    }

    fn get(&self, key: i64) -> Option<i64> {
        ChainedHashTable::get(self, key)
    }

    fn remove(&mut self, key: i64) -> Option<i64> {
        ChainedHashTable::remove(self, key)
    }
}

trait NamedHasher {
    const NAME: &'static str;
}

impl NamedHasher for Fibonacci {
    const NAME: &'static str = "chained_fibonacci";
}

impl NamedHasher for FoldHashIndex {
    const NAME: &'static str = "chained_foldhash";
}

impl IntTable for HashbrownMap<i64, i64> {
    const NAME: &'static str = "hashbrown";

    fn new() -> Self {
        HashbrownMap::new()
    }

    fn insert(&mut self, key: i64, value: i64) {
        HashbrownMap::insert(self, key, value);
    }

    fn get(&self, key: i64) -> Option<i64> {
        HashbrownMap::get(self, &key).copied()
    }

    fn remove(&mut self, key: i64) -> Option<i64> {
        HashbrownMap::remove(self, &key)
    }
}

const SIZES: &[usize] = &[
    (1 << 10),
    (1 << 12),
    (1 << 14),
    (1 << 16),
    (1 << 18),
];

fn unique_keys(count: usize, rng: &mut SmallRng) -> Vec<i64> {
    let mut keys = (0..count)
        .map(|_| rng.random::<i64>())
        .collect::<Vec<i64>>();
    keys.sort_unstable();
    keys.dedup();
    keys.shuffle(rng);
    keys
}

fn filled<T: IntTable>(keys: &[i64]) -> T {
    let mut table = T::new();
    for &key in keys {
        table.insert(key, key);
    }
    table
}

fn bench_insert<T: IntTable>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("insert_{}", T::NAME));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    let mut rng = SmallRng::from_os_rng();
    for &size in SIZES {
        let keys = unique_keys(size, &mut rng);
        group.throughput(Throughput::Elements(keys.len() as u64));
        group.bench_function(format!("{size}"), |b| {
            b.iter_batched(
                || keys.clone(),
                |keys| black_box(filled::<T>(&keys)),
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_find_hit_miss<T: IntTable>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("find_hit_miss_{}", T::NAME));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    let mut rng = SmallRng::from_os_rng();
    for &size in SIZES {
        let keys = unique_keys(size * 2, &mut rng);
        let (present, absent) = keys.split_at(keys.len() / 2);
        let table = filled::<T>(present);

        group.throughput(Throughput::Elements(present.len() as u64));
        group.bench_function(format!("hit_{size}"), |b| {
            b.iter(|| {
                for &key in present {
                    black_box(table.get(key));
                }
            })
        });
        group.throughput(Throughput::Elements(absent.len() as u64));
        group.bench_function(format!("miss_{size}"), |b| {
            b.iter(|| {
                for &key in absent {
                    black_box(table.get(key));
                }
            })
        });
    }
    group.finish();
}

fn bench_remove<T: IntTable>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("remove_{}", T::NAME));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    let mut rng = SmallRng::from_os_rng();
    for &size in SIZES {
        let keys = unique_keys(size, &mut rng);
        group.throughput(Throughput::Elements(keys.len() as u64));
        group.bench_function(format!("{size}"), |b| {
            b.iter_batched(
                || {
                    let mut order = keys.clone();
                    order.shuffle(&mut SmallRng::from_os_rng());
                    (filled::<T>(&keys), order)
                },
                |(mut table, order)| {
                    for key in order {
                        black_box(table.remove(key));
                    }
                    black_box(table)
                },
                BatchSize::LargeInput,
            )
        });
    }
    group.finish();
}

#[derive(Clone, Copy)]
enum Operation {
    Insert,
    Find,
    Remove,
}

fn bench_mixed_zipf<T: IntTable>(c: &mut Criterion) {
    let mut group = c.benchmark_group(format!("mixed_zipf_{}", T::NAME));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Logarithmic));

    for &size in SIZES {
        let mut rng = SmallRng::from_os_rng();
        let op_distr = Zipf::new(3.0, 1.0).unwrap();
        let key_distr = Zipf::new(size as f64, 1.0).unwrap();

        let operations = (0..size * 3)
            .map(|_| {
                let key = rng.sample(key_distr) as i64;
                let op: f64 = rng.sample(op_distr);
                let op = if op <= 1.0 {
                    Operation::Find
                } else if op <= 2.0 {
                    Operation::Insert
                } else {
                    Operation::Remove
                };
                (op, key)
            })
            .collect::<Vec<(Operation, i64)>>();

        group.throughput(Throughput::Elements(operations.len() as u64));
        group.bench_function(format!("{size}"), |b| {
            b.iter(|| {
                let mut table = T::new();
                for &(op, key) in &operations {
                    match op {
                        Operation::Insert => table.insert(key, key),
                        Operation::Find => {
                            black_box(table.get(key));
                        }
                        Operation::Remove => {
                            black_box(table.remove(key));
                        }
                    }
                }
                black_box(table)
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_insert::<ChainedHashTable<Fibonacci>>,
    bench_insert::<ChainedHashTable<FoldHashIndex>>,
    bench_insert::<HashbrownMap<i64, i64>>,
    bench_find_hit_miss::<ChainedHashTable<Fibonacci>>,
    bench_find_hit_miss::<ChainedHashTable<FoldHashIndex>>,
    bench_find_hit_miss::<HashbrownMap<i64, i64>>,
    bench_remove::<ChainedHashTable<Fibonacci>>,
    bench_remove::<ChainedHashTable<FoldHashIndex>>,
    bench_remove::<HashbrownMap<i64, i64>>,
    bench_mixed_zipf::<ChainedHashTable<Fibonacci>>,
    bench_mixed_zipf::<ChainedHashTable<FoldHashIndex>>,
    bench_mixed_zipf::<HashbrownMap<i64, i64>>,
);

criterion_main!(benches);
