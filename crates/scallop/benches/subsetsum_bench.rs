//! Criterion benchmarks for the bounded subset-sum solvers.
//! Focus sizes: n in {8, 16, 32, 64} items, targets around 500.
//! Results live under target/criterion.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use scallop::subsetsum::{solve_dual, solve_single, SubsetSumCfg};

fn random_values(n: usize, seed: u64) -> Vec<usize> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut v: Vec<usize> = (0..n).map(|_| rng.gen_range(1..120)).collect();
    v.push(rng.gen_range(200..800));
    v
}

fn random_pool(n: usize, first_id: usize, rng: &mut StdRng) -> Vec<(usize, usize)> {
    (0..n).map(|k| (rng.gen_range(1..60), first_id + k)).collect()
}

fn bench_single(c: &mut Criterion) {
    let mut group = c.benchmark_group("subsetsum_single");
    for &n in &[8usize, 16, 32, 64] {
        group.bench_with_input(BenchmarkId::new("plain", n), &n, |b, &n| {
            b.iter_batched(
                || random_values(n, 41),
                |values| {
                    let _ = solve_single(&values, SubsetSumCfg::default());
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("rescaled", n), &n, |b, &n| {
            let cfg = SubsetSumCfg {
                rescale: true,
                max_table_size: 2_000,
                ..SubsetSumCfg::default()
            };
            b.iter_batched(
                || random_values(n, 42),
                |values| {
                    let _ = solve_single(&values, cfg);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

fn bench_dual(c: &mut Criterion) {
    let mut group = c.benchmark_group("subsetsum_dual");
    for &n in &[4usize, 8, 16] {
        group.bench_with_input(BenchmarkId::new("pools", n), &n, |b, &n| {
            b.iter_batched(
                || {
                    let mut rng = StdRng::seed_from_u64(43);
                    let s = random_pool(n, 0, &mut rng);
                    let t = random_pool(n, n, &mut rng);
                    (s, t)
                },
                |(s, t)| {
                    let _ = solve_dual(&s, &t);
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single, bench_dual);
criterion_main!(benches);
