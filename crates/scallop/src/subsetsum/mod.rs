//! Bounded subset-sum over small non-negative integers.
//!
//! Purpose
//! - Find subsets of edge weights whose sum lands on (or near) a target, so
//!   the engine can propose balance equations between one edge and several.
//! - Reconcile two pools of weights by finding the pair of achievable sums
//!   (one per pool, or both from the same pool) with the smallest gap.
//!
//! Model
//! - `single`: 0/1 knapsack table plus an inclusion bit per cell. Reachable
//!   sums are scanned outward from the target and backtraced into index sets.
//! - `dual`: one table per pool storing the row of the last included item, so
//!   backtrace needs no separate pointer table. Pools are rescaled first so
//!   the larger sum is at most `DUAL_SUM_CAP`.
//! - The two variants break ties differently and are kept apart.
//!
//! Tables live for one call only; nothing is cached between calls.

mod dual;
mod single;

pub use dual::{solve_dual, DualSolution, DUAL_SUM_CAP};
pub use single::{solve_single, SubsetSolution};

/// Knobs for the single-target solver.
#[derive(Clone, Copy, Debug)]
pub struct SubsetSumCfg {
    /// Stop after this many reachable sums.
    pub max_solutions: usize,
    /// Cell budget for the rescale step.
    pub max_table_size: usize,
    /// Enable the rescale step. Off by default.
    pub rescale: bool,
}

impl Default for SubsetSumCfg {
    fn default() -> Self {
        Self {
            max_solutions: 10,
            max_table_size: 10_000,
            rescale: false,
        }
    }
}

#[cfg(test)]
mod tests;
