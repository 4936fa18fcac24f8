//! Splice-graph decomposition: equation discovery, bounded subset-sum, and
//! iterative path extraction.
//!
//! A splice graph is a weighted DAG whose source (vertex 0) and sink (vertex
//! N-1) stand for transcript start and end. The engine in [`engine`] reduces it
//! to a small set of source-to-sink paths whose abundances reconstruct the
//! observed edge weights.
//!
//! Layout
//! - `graph`: edge-arena splice graph with traversal and restructuring primitives.
//! - `nested`: plans series-block exchanges that make two edges adjacent.
//! - `subsetsum`: single-target and dual-pool bounded subset-sum solvers.
//! - `equation`: candidate balance equations and their orderings.
//! - `engine`: the decomposition loop (`Scallop`).
//! - `smoother`: weight-adjustment seam run before decomposition.
//! - `synth`: reproducible random splice graphs for tests and benches.

pub mod api;
pub mod config;
pub mod engine;
pub mod equation;
pub mod graph;
pub mod nested;
pub mod smoother;
pub mod subsetsum;
pub mod synth;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use config::{ScallopCfg, Strategy, SMIN};
pub use engine::{Path, Scallop};
pub use equation::{Equation, Resolution};
pub use graph::{EdgeId, SpliceGraph};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::config::{ScallopCfg, Strategy, SMIN};
    pub use crate::engine::{GraphClass, Path, Scallop};
    pub use crate::equation::{Equation, Resolution};
    pub use crate::graph::{Edge, EdgeId, SpliceGraph};
    pub use crate::smoother::{NoopSmoother, ProportionalSmoother, Smoother, SmootherKind};
    pub use crate::subsetsum::{solve_dual, solve_single, DualSolution, SubsetSolution, SubsetSumCfg};
    pub use crate::synth::{draw_splice_graph, ReplayToken, SynthCfg, SyntheticGraph};
}
