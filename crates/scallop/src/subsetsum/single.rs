//! Single-target solver: items plus one target, boolean table with inclusion bits.

use super::SubsetSumCfg;

/// One reachable sum and the items that produce it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubsetSolution {
    /// Sum of the original (unscaled) values at `indices`.
    pub sum: usize,
    /// Positions into the input slice; never the target's position.
    pub indices: Vec<usize>,
}

/// Solve for `values[..n-1]` against the target `values[n-1]`.
///
/// Returns up to `cfg.max_solutions` subsets, ordered by how close the table
/// sum is to the target (`t, t-1, t+1, t-2, ...`). Fewer than two values, or
/// nothing reachable within `(0, 2t]`, yields an empty vector.
pub fn solve_single(values: &[usize], cfg: SubsetSumCfg) -> Vec<SubsetSolution> {
    if values.len() <= 1 {
        return Vec::new();
    }
    let mut runner = SingleRunner::new(values, cfg);
    if cfg.rescale {
        runner.rescale();
    }
    runner.fill();
    runner
        .optimize()
        .into_iter()
        .map(|opt| runner.recover(&runner.backtrace(opt)))
        .collect()
}

struct SingleRunner<'a> {
    raw: &'a [usize],
    cfg: SubsetSumCfg,
    /// (value, original index), ascending.
    seeds: Vec<(usize, usize)>,
    target: usize,
    ubound: usize,
    table: Vec<Vec<bool>>,
    btptr: Vec<Vec<bool>>,
}

impl<'a> SingleRunner<'a> {
    fn new(raw: &'a [usize], cfg: SubsetSumCfg) -> Self {
        let n = raw.len() - 1;
        let mut seeds: Vec<(usize, usize)> = raw[..n].iter().copied().zip(0..n).collect();
        seeds.sort_unstable();
        let target = raw[n];
        Self {
            raw,
            cfg,
            seeds,
            target,
            ubound: target * 2,
            table: Vec::new(),
            btptr: Vec::new(),
        }
    }

    /// Shrink seeds and target so that `|seeds| * target` fits the cell budget.
    fn rescale(&mut self) {
        let cells = self.seeds.len() * self.target;
        if cells <= self.cfg.max_table_size {
            return;
        }
        let f = self.cfg.max_table_size as f64 / cells as f64;
        for seed in &mut self.seeds {
            seed.0 = (seed.0 as f64 * f).ceil() as usize;
        }
        self.target = (self.target as f64 * f).ceil() as usize;
        self.ubound = (self.target as f64 * 1.05).ceil() as usize;
        tracing::debug!(
            cells,
            f,
            target = self.target,
            ubound = self.ubound,
            "rescaled subset-sum table"
        );
    }

    fn fill(&mut self) {
        let rows = self.seeds.len() + 1;
        let cols = self.ubound + 1;
        self.table = vec![vec![false; cols]; rows];
        self.btptr = vec![vec![false; cols]; rows];
        for row in &mut self.table {
            row[0] = true;
        }
        for j in 1..cols {
            for i in 1..rows {
                let s = self.seeds[i - 1].0;
                if j >= s && self.table[i - 1][j - s] {
                    // inclusion wins ties
                    self.table[i][j] = true;
                    self.btptr[i][j] = true;
                } else if self.table[i - 1][j] {
                    self.table[i][j] = true;
                }
            }
        }
    }

    /// Reachable sums in outward order from the target.
    fn optimize(&self) -> Vec<usize> {
        let n = self.seeds.len();
        let mut opts = Vec::new();
        let mut d = 0usize;
        let mut above = true;
        loop {
            let k = if above {
                Some(self.target + d)
            } else {
                self.target.checked_sub(d)
            };
            let Some(k) = k.filter(|&k| k > 0 && k <= self.ubound) else {
                break;
            };
            if self.table[n][k] {
                opts.push(k);
                if opts.len() >= self.cfg.max_solutions {
                    break;
                }
            }
            if above {
                d += 1;
            }
            above = !above;
        }
        opts
    }

    /// Sorted positions of the items summing to `opt`.
    fn backtrace(&self, opt: usize) -> Vec<usize> {
        let mut picked = Vec::new();
        let mut x = opt;
        let mut s = self.seeds.len();
        while x >= 1 && s >= 1 {
            assert!(self.table[s][x], "backtrace left the reachable set at ({s}, {x})");
            if self.btptr[s][x] {
                x -= self.seeds[s - 1].0;
                picked.push(s - 1);
            }
            s -= 1;
        }
        picked
    }

    fn recover(&self, picked: &[usize]) -> SubsetSolution {
        let indices: Vec<usize> = picked.iter().map(|&k| self.seeds[k].1).collect();
        let sum = indices.iter().map(|&r| self.raw[r]).sum();
        SubsetSolution { sum, indices }
    }
}
