//! Random splice graphs with known transcripts.
//!
//! Purpose
//! - Reproducible instances for property tests, benches and the CLI
//!   `generate` command.
//!
//! Model
//! - Internal vertices `1..=m` sit between source `0` and sink `m+1`.
//! - Each transcript keeps every internal vertex independently with
//!   probability `keep_prob` (at least one is kept), then walks the kept
//!   vertices in increasing order. Its integer abundance is added to every
//!   edge it uses, so the graph conserves flow exactly.
//! - Determinism uses a replay token `(seed, index)` mixed into one RNG.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::engine::Path;
use crate::graph::SpliceGraph;

/// Count distribution for vertices or transcripts.
#[derive(Clone, Copy, Debug)]
pub enum Count {
    Fixed(usize),
    Uniform { min: usize, max: usize },
}

impl Count {
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match *self {
            Count::Fixed(n) => n.max(1),
            Count::Uniform { min, max } => {
                let lo = min.max(1);
                let hi = max.max(lo);
                rng.gen_range(lo..=hi)
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SynthCfg {
    pub internal_vertices: Count,
    pub transcripts: Count,
    /// Probability that a transcript visits a given internal vertex. Clamped to [0.05, 1].
    pub keep_prob: f64,
    /// Abundances are drawn from `1..=max_abundance`.
    pub max_abundance: u32,
}

impl Default for SynthCfg {
    fn default() -> Self {
        Self {
            internal_vertices: Count::Uniform { min: 3, max: 8 },
            transcripts: Count::Uniform { min: 1, max: 4 },
            keep_prob: 0.6,
            max_abundance: 50,
        }
    }
}

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    fn to_std_rng(self) -> StdRng {
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// A drawn graph together with the transcripts that produced it.
#[derive(Clone, Debug)]
pub struct SyntheticGraph {
    pub graph: SpliceGraph,
    pub transcripts: Vec<Path>,
}

pub fn draw_splice_graph(cfg: SynthCfg, tok: ReplayToken) -> SyntheticGraph {
    let mut rng = tok.to_std_rng();
    let m = cfg.internal_vertices.sample(&mut rng);
    let k = cfg.transcripts.sample(&mut rng);
    let p = cfg.keep_prob.clamp(0.05, 1.0);
    let sink = m + 1;

    let mut weights: BTreeMap<(usize, usize), f64> = BTreeMap::new();
    let mut transcripts = Vec::with_capacity(k);
    for _ in 0..k {
        let mut vertices = vec![0];
        vertices.extend((1..=m).filter(|_| rng.gen_bool(p)));
        if vertices.len() == 1 {
            vertices.push(rng.gen_range(1..=m));
        }
        vertices.push(sink);
        let abundance = f64::from(rng.gen_range(1..=cfg.max_abundance.max(1)));
        for w in vertices.windows(2) {
            *weights.entry((w[0], w[1])).or_insert(0.0) += abundance;
        }
        transcripts.push(Path {
            vertices,
            abundance,
        });
    }

    let mut graph = SpliceGraph::with_vertices(m + 2);
    for (&(s, t), &w) in &weights {
        graph.add_weighted_edge(s, t, w, 1.0);
    }
    SyntheticGraph { graph, transcripts }
}
