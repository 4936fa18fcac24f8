//! Dual-pool solver: closest pair of achievable sums across two item pools.

use crate::equation::Equation;
use crate::graph::EdgeId;

/// Largest pool sum after rescaling.
pub const DUAL_SUM_CAP: usize = 1000;

/// Closest pair of achievable sums and the items behind each.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DualSolution {
    /// Gap between the two sums, in rescaled units.
    pub error: usize,
    /// Item ids behind the smaller sum.
    pub s: Vec<usize>,
    /// Item ids behind the larger sum.
    pub t: Vec<usize>,
}

impl From<DualSolution> for Equation {
    fn from(sol: DualSolution) -> Self {
        Equation::new(
            sol.s.into_iter().map(EdgeId).collect(),
            sol.t.into_iter().map(EdgeId).collect(),
            sol.error as f64,
        )
    }
}

/// Reconcile two pools of `(value, id)` items.
///
/// Each pool is scaled by `min(max(s1, s2), DUAL_SUM_CAP) / s_i` (values are
/// floored), then every positive sum below the pool's scaled total is
/// collected. The adjacent pair with the smallest gap wins; on ties the pair
/// with the smaller sums is kept. Returns `None` if either pool sums to zero
/// or fewer than two sums are reachable.
pub fn solve_dual(source: &[(usize, usize)], target: &[(usize, usize)]) -> Option<DualSolution> {
    let s1: usize = source.iter().map(|p| p.0).sum();
    let s2: usize = target.iter().map(|p| p.0).sum();
    if s1 == 0 || s2 == 0 {
        return None;
    }
    let cap = s1.max(s2).min(DUAL_SUM_CAP);
    let p1 = Pool::new(source, cap as f64 / s1 as f64);
    let p2 = Pool::new(target, cap as f64 / s2 as f64);

    let mut sums: Vec<(usize, u8)> = p1
        .reachable()
        .map(|v| (v, 1))
        .chain(p2.reachable().map(|v| (v, 2)))
        .collect();
    sums.sort_unstable();
    if sums.len() < 2 {
        return None;
    }
    let mut k = 0;
    let mut gap = usize::MAX;
    for (i, w) in sums.windows(2).enumerate() {
        let d = w[1].0 - w[0].0;
        if d < gap {
            gap = d;
            k = i;
        }
    }
    let pick = |(v, tag): (usize, u8)| if tag == 1 { p1.backtrace(v) } else { p2.backtrace(v) };
    Some(DualSolution {
        error: gap,
        s: pick(sums[k]),
        t: pick(sums[k + 1]),
    })
}

struct Pool {
    /// (scaled value, id), ascending.
    items: Vec<(usize, usize)>,
    ubound: usize,
    /// `table[i][j]`: row of the last item used to first reach `j` with items `..i`.
    table: Vec<Vec<Option<usize>>>,
}

impl Pool {
    fn new(raw: &[(usize, usize)], ratio: f64) -> Self {
        let mut items: Vec<(usize, usize)> = raw
            .iter()
            .map(|&(v, id)| ((v as f64 * ratio) as usize, id))
            .collect();
        let total: usize = items.iter().map(|p| p.0).sum();
        items.sort_unstable();
        let mut pool = Self {
            items,
            ubound: total.saturating_sub(1),
            table: Vec::new(),
        };
        pool.fill();
        pool
    }

    fn fill(&mut self) {
        let rows = self.items.len() + 1;
        let cols = self.ubound + 1;
        self.table = vec![vec![None; cols]; rows];
        for row in &mut self.table {
            row[0] = Some(0);
        }
        for j in 1..cols {
            for i in 1..rows {
                let s = self.items[i - 1].0;
                if j >= s && self.table[i - 1][j - s].is_some() {
                    self.table[i][j] = Some(i);
                }
                // an earlier row keeps priority
                if self.table[i - 1][j].is_some() {
                    self.table[i][j] = self.table[i - 1][j];
                }
            }
        }
    }

    fn reachable(&self) -> impl Iterator<Item = usize> + '_ {
        let last = &self.table[self.items.len()];
        (1..=self.ubound).filter(move |&j| last[j].is_some())
    }

    fn backtrace(&self, sum: usize) -> Vec<usize> {
        let mut ids = Vec::new();
        let mut x = sum;
        let mut s = self.table[self.items.len()][x].unwrap_or(0);
        while x >= 1 && s >= 1 {
            let (value, id) = self.items[s - 1];
            ids.push(id);
            x -= value;
            s = self.table[s - 1][x].unwrap_or(0);
        }
        ids
    }
}
