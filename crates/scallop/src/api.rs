//! Curated API for the CLI and benches (UNSTABLE).
//!
//! Important
//! - Convenience surface for in-workspace callers. Breaking changes are
//!   allowed; downstream crates should prefer the module paths.

// Splice graph and restructuring
pub use crate::graph::{Edge, EdgeId, SpliceGraph};
pub use crate::nested::{Exchange, NestedGraph};
// Decomposition engine
pub use crate::config::{ScallopCfg, Strategy, SMIN};
pub use crate::engine::{GraphClass, Outcome, Path, Scallop};
pub use crate::equation::{Equation, Resolution};
pub use crate::smoother::{NoopSmoother, ProportionalSmoother, Smoother, SmootherKind};
// Subset-sum solvers
pub use crate::subsetsum::{
    solve_dual, solve_single, DualSolution, SubsetSolution, SubsetSumCfg, DUAL_SUM_CAP,
};
// Random splice graphs
pub use crate::synth::{
    draw_splice_graph, Count as SynthCount, ReplayToken as SynthReplay, SynthCfg, SyntheticGraph,
};
