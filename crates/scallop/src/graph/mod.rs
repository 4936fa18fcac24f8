//! Splice graph: a weighted directed multigraph over an edge arena.
//!
//! Purpose
//! - Hold the mutable graph the decomposition engine rewrites: edges are added
//!   by splits and merges, retired when consumed, and vertices go isolated as
//!   their edges disappear.
//! - Vertex 0 is the source, vertex N-1 the sink.
//!
//! Edge arena
//! - `EdgeId` indexes an append-only slot vector. A slot is either a live edge
//!   or `Retired`; removing an edge retires its slot and the id is never handed
//!   out again. The arena doubles as the engine's edge-index table, so the
//!   round trip id → edge → id is the identity for every live edge.
//! - Adjacency lists hold live ids only (`check_index`).
//!
//! Layout
//! - `types.rs` (handles and slots), `traverse.rs` (reachability, paths,
//!   counts), `restructure.rs` (partners and series-block exchange),
//!   `draw.rs` (TikZ rendering).

mod draw;
mod restructure;
mod traverse;
mod types;

pub use types::{Edge, EdgeId};
use types::EdgeSlot;

/// Weighted splice graph.
#[derive(Clone, Debug, Default)]
pub struct SpliceGraph {
    slots: Vec<EdgeSlot>,
    in_adj: Vec<Vec<EdgeId>>,
    out_adj: Vec<Vec<EdgeId>>,
    live: usize,
}

impl SpliceGraph {
    /// Graph with `n` vertices and no edges.
    pub fn with_vertices(n: usize) -> Self {
        Self {
            slots: Vec::new(),
            in_adj: vec![Vec::new(); n],
            out_adj: vec![Vec::new(); n],
            live: 0,
        }
    }

    /// Build from `(source, target, weight, stddev)` records.
    pub fn from_edges(n: usize, edges: &[(usize, usize, f64, f64)]) -> Self {
        let mut g = Self::with_vertices(n);
        for &(s, t, w, sd) in edges {
            g.add_weighted_edge(s, t, w, sd);
        }
        g
    }

    pub fn add_vertex(&mut self) -> usize {
        self.in_adj.push(Vec::new());
        self.out_adj.push(Vec::new());
        self.in_adj.len() - 1
    }

    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.in_adj.len()
    }

    /// Number of live edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.live
    }

    /// One past the largest id ever issued.
    #[inline]
    pub fn id_bound(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn source(&self) -> usize {
        0
    }

    #[inline]
    pub fn sink(&self) -> usize {
        self.num_vertices().saturating_sub(1)
    }

    #[inline]
    pub fn in_degree(&self, v: usize) -> usize {
        self.in_adj[v].len()
    }

    #[inline]
    pub fn out_degree(&self, v: usize) -> usize {
        self.out_adj[v].len()
    }

    #[inline]
    pub fn degree(&self, v: usize) -> usize {
        self.in_degree(v) + self.out_degree(v)
    }

    #[inline]
    pub fn in_edges(&self, v: usize) -> &[EdgeId] {
        &self.in_adj[v]
    }

    #[inline]
    pub fn out_edges(&self, v: usize) -> &[EdgeId] {
        &self.out_adj[v]
    }

    /// Live edge ids in ascending order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.live().is_some())
            .map(|(i, _)| EdgeId(i))
    }

    /// Edge record, or `None` for a retired id.
    #[inline]
    pub fn edge(&self, e: EdgeId) -> Option<&Edge> {
        self.slots.get(e.0).and_then(EdgeSlot::live)
    }

    #[inline]
    pub fn is_live(&self, e: EdgeId) -> bool {
        self.edge(e).is_some()
    }

    /// Live edge record; a retired or unknown id is a logic error.
    #[inline]
    fn live_edge(&self, e: EdgeId) -> &Edge {
        match self.edge(e) {
            Some(edge) => edge,
            None => panic!("stale edge id {e}"),
        }
    }

    #[inline]
    fn live_edge_mut(&mut self, e: EdgeId) -> &mut Edge {
        match self.slots.get_mut(e.0).and_then(EdgeSlot::live_mut) {
            Some(edge) => edge,
            None => panic!("stale edge id {e}"),
        }
    }

    /// `(source, target)` of a live edge.
    #[inline]
    pub fn endpoints(&self, e: EdgeId) -> (usize, usize) {
        let edge = self.live_edge(e);
        (edge.source, edge.target)
    }

    #[inline]
    pub fn weight(&self, e: EdgeId) -> f64 {
        self.live_edge(e).weight
    }

    #[inline]
    pub fn set_weight(&mut self, e: EdgeId, w: f64) {
        self.live_edge_mut(e).weight = w;
    }

    #[inline]
    pub fn stddev(&self, e: EdgeId) -> f64 {
        self.live_edge(e).stddev
    }

    #[inline]
    pub fn set_stddev(&mut self, e: EdgeId, sd: f64) {
        self.live_edge_mut(e).stddev = sd;
    }

    /// True if `e` runs straight from the source to the sink.
    #[inline]
    pub fn is_source_sink(&self, e: EdgeId) -> bool {
        let (s, t) = self.endpoints(e);
        s == self.source() && t == self.sink()
    }

    /// Larger of the summed in- and out-weights at `v`.
    pub fn vertex_weight(&self, v: usize) -> f64 {
        let win: f64 = self.in_adj[v].iter().map(|&e| self.weight(e)).sum();
        let wout: f64 = self.out_adj[v].iter().map(|&e| self.weight(e)).sum();
        win.max(wout)
    }

    /// Add an edge with zero weight and stddev.
    pub fn add_edge(&mut self, s: usize, t: usize) -> EdgeId {
        self.add_weighted_edge(s, t, 0.0, 0.0)
    }

    pub fn add_weighted_edge(&mut self, s: usize, t: usize, weight: f64, stddev: f64) -> EdgeId {
        assert!(
            s < self.num_vertices() && t < self.num_vertices(),
            "edge ({s}, {t}) outside vertex range 0..{}",
            self.num_vertices()
        );
        let id = EdgeId(self.slots.len());
        self.slots.push(EdgeSlot::Live(Edge {
            source: s,
            target: t,
            weight,
            stddev,
        }));
        self.out_adj[s].push(id);
        self.in_adj[t].push(id);
        self.live += 1;
        id
    }

    /// Retire a live edge.
    pub fn remove_edge(&mut self, e: EdgeId) {
        let (s, t) = self.endpoints(e);
        self.out_adj[s].retain(|&x| x != e);
        self.in_adj[t].retain(|&x| x != e);
        self.slots[e.0] = EdgeSlot::Retired;
        self.live -= 1;
    }

    /// Retire every edge incident to `v`; returns the retired ids.
    pub fn clear_vertex(&mut self, v: usize) -> Vec<EdgeId> {
        let mut gone: Vec<EdgeId> = self.in_adj[v].clone();
        gone.extend_from_slice(&self.out_adj[v]);
        for &e in &gone {
            self.remove_edge(e);
        }
        gone
    }

    /// Move a live edge to new endpoints, keeping its id and attributes.
    pub(crate) fn relink(&mut self, e: EdgeId, s: usize, t: usize) {
        let (os, ot) = self.endpoints(e);
        if (os, ot) == (s, t) {
            return;
        }
        self.out_adj[os].retain(|&x| x != e);
        self.in_adj[ot].retain(|&x| x != e);
        let edge = self.live_edge_mut(e);
        edge.source = s;
        edge.target = t;
        self.out_adj[s].push(e);
        self.in_adj[t].push(e);
    }

    /// Arena/adjacency consistency: every listed id is live and attached to
    /// the list's vertex, every live edge is listed exactly once per side, and
    /// the live count matches.
    pub fn check_index(&self) -> bool {
        let mut seen_out = vec![0usize; self.slots.len()];
        let mut seen_in = vec![0usize; self.slots.len()];
        for v in 0..self.num_vertices() {
            for &e in &self.out_adj[v] {
                match self.edge(e) {
                    Some(edge) if edge.source == v => seen_out[e.0] += 1,
                    _ => return false,
                }
            }
            for &e in &self.in_adj[v] {
                match self.edge(e) {
                    Some(edge) if edge.target == v => seen_in[e.0] += 1,
                    _ => return false,
                }
            }
        }
        let mut live = 0;
        for (i, slot) in self.slots.iter().enumerate() {
            let expect = usize::from(slot.live().is_some());
            if seen_out[i] != expect || seen_in[i] != expect {
                return false;
            }
            live += expect;
        }
        live == self.live
    }
}

#[cfg(test)]
mod tests;
