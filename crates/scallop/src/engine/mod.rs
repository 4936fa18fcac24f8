//! Decomposition engine: reduce a splice graph to weighted source→sink paths.
//!
//! Purpose
//! - Own the mutable splice graph and the per-edge annotation (`mev`: the
//!   original vertices an edge stands for), rewrite the graph by splits,
//!   merges and exchanges, and collect every edge that spans source→sink as
//!   a finished [`Path`].
//!
//! Model
//! - Structural pass: smooth, seed annotations, collapse pass-through
//!   vertices into super-edges (`edit.rs`).
//! - Iteration: trivial vertices first, then balance equations at levels
//!   0..=2 (3 on request), committing to the first level that fully resolves
//!   (`identify.rs`, `resolve.rs`, `drive.rs`).
//! - Extraction: collect direct source→sink edges, or peel widest paths.
//!
//! Invariants
//! - Every live edge has exactly one annotation and retired ids have none
//!   (`check_annotations`).
//! - A stale id or a malformed merge is a logic error and panics.

use std::collections::HashMap;

use crate::config::{ScallopCfg, Strategy};
use crate::graph::{EdgeId, SpliceGraph};
use crate::smoother::Smoother;

mod drive;
mod edit;
mod identify;
mod resolve;

pub use drive::Outcome;

/// A finished transcript: original vertices from source to sink.
#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    pub vertices: Vec<usize>,
    pub abundance: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphClass {
    /// Path count already equals the decomposition lower bound.
    Trivial,
    Normal,
}

impl GraphClass {
    pub fn as_str(self) -> &'static str {
        match self {
            GraphClass::Trivial => "trivial",
            GraphClass::Normal => "normal",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Scallop {
    pub name: String,
    cfg: ScallopCfg,
    gr: SpliceGraph,
    mev: HashMap<EdgeId, Vec<usize>>,
    /// Position of each original vertex in the input's topological order.
    rank: Vec<usize>,
    round: usize,
    paths: Vec<Path>,
    /// Set once `assemble` has classified the input.
    class: Option<GraphClass>,
}

impl Scallop {
    pub fn new(name: impl Into<String>, gr: SpliceGraph, cfg: ScallopCfg) -> Self {
        assert!(gr.num_vertices() >= 2, "splice graph needs a source and a sink");
        let mut rank = vec![0; gr.num_vertices()];
        for (pos, v) in gr.topological_order().into_iter().enumerate() {
            rank[v] = pos;
        }
        let mut sc = Self {
            name: name.into(),
            cfg,
            gr,
            mev: HashMap::new(),
            rank,
            round: 0,
            paths: Vec::new(),
            class: None,
        };
        sc.init_super_edges();
        sc
    }

    #[inline]
    pub fn graph(&self) -> &SpliceGraph {
        &self.gr
    }

    #[inline]
    pub fn paths(&self) -> &[Path] {
        &self.paths
    }

    #[inline]
    pub fn cfg(&self) -> &ScallopCfg {
        &self.cfg
    }

    /// Diagnostic rounds logged so far.
    #[inline]
    pub fn round(&self) -> usize {
        self.round
    }

    /// Class the last `assemble` ran under.
    #[inline]
    pub fn class(&self) -> Option<GraphClass> {
        self.class
    }

    /// Original vertices represented by a live edge.
    pub fn annotation(&self, e: EdgeId) -> Option<&[usize]> {
        self.mev.get(&e).map(Vec::as_slice)
    }

    /// Snapshot of the full engine state.
    pub fn save(&self) -> Scallop {
        self.clone()
    }

    /// Restore a snapshot taken with `save`.
    pub fn load(&mut self, snapshot: &Scallop) {
        *self = snapshot.clone();
    }

    /// Annotations cover exactly the live edges.
    pub fn check_annotations(&self) -> bool {
        self.mev.len() == self.gr.num_edges() && self.gr.edges().all(|e| self.mev.contains_key(&e))
    }

    pub fn classify(&self) -> GraphClass {
        let n = self.gr.num_vertices();
        if n == 2 {
            return GraphClass::Trivial;
        }
        let p0 = self.gr.compute_num_paths();
        let p1 = self.gr.compute_decomp_paths();
        let class = if i64::try_from(p0).is_ok_and(|p| p == p1) {
            GraphClass::Trivial
        } else {
            GraphClass::Normal
        };
        tracing::info!(
            name = %self.name,
            vertices = n,
            edges = self.gr.num_edges(),
            p0,
            p1,
            class = class.as_str(),
            "classified splice graph"
        );
        class
    }

    /// Run the configured strategy and return the collected paths.
    ///
    /// Trivial graphs skip equations: structural pass, direct edges, then
    /// greedy extraction for whatever is left.
    pub fn assemble(&mut self) -> &[Path] {
        let class = self.classify();
        self.class = Some(class);
        if class == GraphClass::Trivial {
            self.assemble_basic();
            self.collect_existing_st_paths();
            self.greedy_decompose();
            tracing::info!(name = %self.name, paths = self.paths.len(), "trivial solution");
            return &self.paths;
        }
        match self.cfg.algo {
            Strategy::Basic => self.assemble_basic(),
            Strategy::Core => self.assemble_core(),
            Strategy::Full => self.assemble_full(),
            Strategy::Greedy => self.assemble_greedy(),
        }
        &self.paths
    }

    /// Smoothing and super-edge construction only.
    pub fn assemble_basic(&mut self) {
        self.cfg.smoother.smooth(&mut self.gr);
        self.reconstruct_splice_graph();
    }

    pub fn assemble_core(&mut self) {
        self.assemble_basic();
        let rounds = self.iterate();
        self.collect_existing_st_paths();
        tracing::info!(name = %self.name, paths = self.paths.len(), rounds, "core solution");
    }

    pub fn assemble_full(&mut self) {
        self.assemble_basic();
        let rounds = self.iterate();
        self.greedy_decompose();
        tracing::info!(name = %self.name, paths = self.paths.len(), rounds, "full solution");
    }

    pub fn assemble_greedy(&mut self) {
        self.assemble_basic();
        self.greedy_decompose();
        tracing::info!(name = %self.name, paths = self.paths.len(), "greedy solution");
    }

    /// Log graph statistics for the current round and optionally render it.
    fn log_round(&mut self) {
        let active = (0..self.gr.num_vertices())
            .filter(|&v| self.gr.degree(v) >= 1)
            .count();
        tracing::debug!(
            round = self.round,
            edges = self.gr.num_edges(),
            vertices = active,
            paths = self.gr.compute_num_paths(),
            required = self.gr.compute_decomp_paths(),
            "statistics"
        );
        if self.cfg.output_tex_files {
            let file = format!("{}.{}.tex", self.cfg.tex_prefix, self.round);
            if let Err(err) = self.draw_splice_graph(&file) {
                tracing::warn!(%file, %err, "failed to render splice graph");
            }
        }
        self.round += 1;
    }

    /// TikZ rendering with `id:weight` labels.
    pub fn draw_splice_graph(&self, file: &str) -> std::io::Result<()> {
        let vertex_labels: HashMap<usize, String> = (0..self.gr.num_vertices())
            .map(|v| (v, format!("{v}:{:.0}", self.gr.vertex_weight(v))))
            .collect();
        let edge_labels: HashMap<EdgeId, String> = self
            .gr
            .edges()
            .map(|e| (e, format!("{e}:{:.0}", self.gr.weight(e))))
            .collect();
        self.gr.draw(file, &vertex_labels, &edge_labels, 4.5)
    }
}
