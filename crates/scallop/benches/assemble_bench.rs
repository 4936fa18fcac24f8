//! Criterion benchmarks for end-to-end decomposition of random splice graphs.
//!
//! - Graph sizes: 3-8, 8-16 and 16-32 internal vertices.
//! - Strategies: full (equations + greedy) against greedy only.
//!
//! Results live under target/criterion.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use scallop::api::{
    draw_splice_graph, Scallop, ScallopCfg, Strategy, SynthCfg, SynthCount, SynthReplay,
};

fn synth_cfg(min: usize, max: usize) -> SynthCfg {
    SynthCfg {
        internal_vertices: SynthCount::Uniform { min, max },
        transcripts: SynthCount::Uniform { min: 2, max: 6 },
        ..SynthCfg::default()
    }
}

fn bench_assemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble");
    for &(min, max) in &[(3usize, 8usize), (8, 16), (16, 32)] {
        let label = format!("{min}-{max}");
        for algo in [Strategy::Full, Strategy::Greedy] {
            group.bench_function(BenchmarkId::new(algo.as_str(), &label), |b| {
                let mut tok = SynthReplay { seed: 7, index: 0 };
                b.iter_batched(
                    || {
                        tok.index = tok.index.wrapping_add(1);
                        draw_splice_graph(synth_cfg(min, max), tok).graph
                    },
                    |gr| {
                        let cfg = ScallopCfg {
                            algo,
                            ..ScallopCfg::default()
                        };
                        let mut sc = Scallop::new("bench", gr, cfg);
                        let _ = sc.assemble().len();
                    },
                    BatchSize::SmallInput,
                )
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_assemble);
criterion_main!(benches);
