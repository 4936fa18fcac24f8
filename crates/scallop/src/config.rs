//! Engine configuration and numeric tolerances.
//!
//! - `ScallopCfg`: knobs consumed by equation discovery, the subset-sum solver,
//!   and the iteration driver. Passed explicitly to `Scallop::new`.
//! - `Strategy`: which parts of the machinery a run uses.
//! - `SMIN`: tolerance for floating-point weight comparisons.

use std::fmt;
use std::str::FromStr;

use crate::smoother::SmootherKind;
use crate::subsetsum::SubsetSumCfg;

/// Two weights closer than this are treated as equal by split/merge.
pub const SMIN: f64 = 1e-5;

/// Top-level assembly strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Smoothing and trivial-vertex elimination only; no paths are collected.
    Basic,
    /// Iterate equations, then collect the direct source→sink edges.
    Core,
    /// Iterate equations, then extract the rest greedily.
    #[default]
    Full,
    /// Skip equations; greedy extraction right after the structural pass.
    Greedy,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Basic => "basic",
            Strategy::Core => "core",
            Strategy::Full => "full",
            Strategy::Greedy => "greedy",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(Strategy::Basic),
            "core" => Ok(Strategy::Core),
            "full" => Ok(Strategy::Full),
            "greedy" => Ok(Strategy::Greedy),
            other => Err(format!(
                "unknown strategy `{other}` (expected basic|core|full|greedy)"
            )),
        }
    }
}

/// Engine configuration.
#[derive(Clone, Debug)]
pub struct ScallopCfg {
    pub algo: Strategy,
    pub smoother: SmootherKind,
    /// Largest accepted `error / seed weight` for subset-sum equations (levels 2 and 3).
    pub max_equation_error_ratio: f64,
    /// Cell budget for the single-target table; only read when `rescale_dp_table` is set.
    pub max_dp_table_size: usize,
    /// Stop collecting subset-sum candidates after this many reachable sums.
    pub max_num_subsetsum_solutions: usize,
    /// Shrink oversized subset-sum tables by rescaling. Off unless asked for:
    /// rescaling changes which equations are accepted on large instances.
    pub rescale_dp_table: bool,
    /// Also try pair-seeded equations (level 3) when levels 0-2 yield nothing.
    pub use_pair_equations: bool,
    /// Upper bound on iteration-driver rounds.
    pub max_iterations: usize,
    /// Render the splice graph as TikZ after every round.
    pub output_tex_files: bool,
    /// Path prefix for rendered rounds (`<prefix>.<round>.tex`).
    pub tex_prefix: String,
}

impl Default for ScallopCfg {
    fn default() -> Self {
        Self {
            algo: Strategy::Full,
            smoother: SmootherKind::Proportional,
            max_equation_error_ratio: 0.2,
            max_dp_table_size: 10_000,
            max_num_subsetsum_solutions: 10,
            rescale_dp_table: false,
            use_pair_equations: false,
            max_iterations: 100_000,
            output_tex_files: false,
            tex_prefix: String::from("splice"),
        }
    }
}

impl ScallopCfg {
    /// Subset-sum settings derived from this configuration.
    pub fn subsetsum(&self) -> SubsetSumCfg {
        SubsetSumCfg {
            max_solutions: self.max_num_subsetsum_solutions,
            max_table_size: self.max_dp_table_size,
            rescale: self.rescale_dp_table,
        }
    }
}
