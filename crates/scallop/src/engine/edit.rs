//! Graph edits that keep annotations in step: super-edge construction,
//! split, merge, path collection.

use crate::config::SMIN;
use crate::graph::EdgeId;

use super::{Path, Scallop};

impl Scallop {
    /// Seed every edge's annotation with its source vertex.
    pub fn init_super_edges(&mut self) {
        self.mev = self
            .gr
            .edges()
            .map(|e| (e, vec![self.gr.endpoints(e).0]))
            .collect();
    }

    /// Collapse pass-through vertices until none is left.
    pub fn reconstruct_splice_graph(&mut self) {
        loop {
            let mut changed = false;
            for v in 0..self.gr.num_vertices() {
                changed |= self.init_trivial_vertex(v);
            }
            if !changed {
                break;
            }
        }
    }

    /// Replace every (in, out) pair through `x` by one direct edge.
    ///
    /// Applies when `x` has both in- and out-edges but not two of each. The
    /// new edge carries the weight and stddev of the lighter side.
    pub(crate) fn init_trivial_vertex(&mut self, x: usize) -> bool {
        let id = self.gr.in_degree(x);
        let od = self.gr.out_degree(x);
        if id == 0 || od == 0 || (id >= 2 && od >= 2) {
            return false;
        }
        let ins = self.gr.in_edges(x).to_vec();
        let outs = self.gr.out_edges(x).to_vec();
        for &a in &ins {
            for &b in &outs {
                let (s, _) = self.gr.endpoints(a);
                let (_, t) = self.gr.endpoints(b);
                let (w1, w2) = (self.gr.weight(a), self.gr.weight(b));
                let (w, sd) = if w1 < w2 {
                    (w1, self.gr.stddev(a))
                } else {
                    (w2, self.gr.stddev(b))
                };
                let p = self.gr.add_weighted_edge(s, t, w, sd);
                let mut v = self.annotation_of(a).to_vec();
                v.extend_from_slice(self.annotation_of(b));
                self.mev.insert(p, v);
            }
        }
        for e in self.gr.clear_vertex(x) {
            self.mev.remove(&e);
        }
        true
    }

    pub(crate) fn annotation_of(&self, e: EdgeId) -> &[usize] {
        match self.mev.get(&e) {
            Some(v) => v,
            None => panic!("edge {e} has no annotation"),
        }
    }

    fn retire(&mut self, e: EdgeId) -> Vec<usize> {
        self.gr.remove_edge(e);
        match self.mev.remove(&e) {
            Some(v) => v,
            None => panic!("edge {e} has no annotation"),
        }
    }

    /// Cut `e` down to weight `w`; the remainder becomes a parallel edge.
    ///
    /// Returns the remainder's id, or `e` itself when `e` already weighs `w`
    /// (within `SMIN`).
    pub fn split_edge(&mut self, e: EdgeId, w: f64) -> EdgeId {
        let ww = self.gr.weight(e);
        if (ww - w).abs() <= SMIN {
            return e;
        }
        assert!(ww >= w + SMIN, "cannot cut edge {e} of weight {ww} down to {w}");
        let (s, t) = self.gr.endpoints(e);
        let sd = self.gr.stddev(e);
        self.gr.set_weight(e, w);
        let p = self.gr.add_weighted_edge(s, t, ww - w, sd);
        let v = self.annotation_of(e).to_vec();
        self.mev.insert(p, v);
        p
    }

    /// Merge two touching edges of equal weight into one spanning edge.
    ///
    /// Either order works: if `y` ends where `x` starts the arguments are
    /// swapped. Returns `None` if either is retired or they do not touch.
    pub fn merge_adjacent_equal_edges(&mut self, x: EdgeId, y: EdgeId) -> Option<EdgeId> {
        if !self.gr.is_live(x) || !self.gr.is_live(y) {
            return None;
        }
        let (xs, xt) = self.gr.endpoints(x);
        let (ys, yt) = self.gr.endpoints(y);
        if xt != ys {
            return if yt == xs {
                self.merge_adjacent_equal_edges(y, x)
            } else {
                None
            };
        }
        let (wx, wy) = (self.gr.weight(x), self.gr.weight(y));
        assert!(
            (wx - wy).abs() <= SMIN,
            "merging edges {x} and {y} of unequal weight {wx} vs {wy}"
        );
        let p = self.gr.add_weighted_edge(xs, yt, wx, self.gr.stddev(x));
        let mut v = self.retire(x);
        v.extend(self.retire(y));
        self.mev.insert(p, v);
        Some(p)
    }

    /// Cut both edges to the lighter weight, then merge them.
    pub fn merge_adjacent_edges(&mut self, x: EdgeId, y: EdgeId) -> Option<EdgeId> {
        if !self.gr.is_live(x) || !self.gr.is_live(y) {
            return None;
        }
        let w = self.gr.weight(x).min(self.gr.weight(y));
        self.split_edge(x, w);
        self.split_edge(y, w);
        self.merge_adjacent_equal_edges(x, y)
    }

    /// Cut every edge of a chained path to `w` and merge them in order.
    ///
    /// Returns the merged edge and, per input position, the remainder id
    /// (equal to the input id when that edge was used up).
    pub fn split_merge_path(&mut self, path: &[EdgeId], w: f64) -> (EdgeId, Vec<EdgeId>) {
        assert!(!path.is_empty(), "empty path");
        let mut rest = Vec::with_capacity(path.len());
        rest.push(self.split_edge(path[0], w));
        let mut merged = path[0];
        for &e in &path[1..] {
            rest.push(self.split_edge(e, w));
            merged = match self.merge_adjacent_equal_edges(merged, e) {
                Some(p) => p,
                None => panic!("edges {merged} and {e} are not chained"),
            };
        }
        (merged, rest)
    }

    /// Retire a source→sink edge into a finished path.
    pub fn collect_path(&mut self, e: EdgeId) {
        let (s, t) = self.gr.endpoints(e);
        assert!(
            s == self.gr.source() && t == self.gr.sink(),
            "edge {e} ({s}, {t}) does not span source to sink"
        );
        let abundance = self.gr.weight(e);
        let mut vertices = self.retire(e);
        vertices.sort_by_key(|&v| self.rank[v]);
        assert_eq!(vertices.first(), Some(&s), "path of edge {e} does not start at the source");
        assert!(!vertices.contains(&t), "path of edge {e} already contains the sink");
        vertices.push(t);
        tracing::debug!(edge = %e, abundance, ?vertices, "collect path");
        self.paths.push(Path {
            vertices,
            abundance,
        });
    }

    pub fn collect_existing_st_paths(&mut self) {
        let direct: Vec<EdgeId> = self
            .gr
            .edges()
            .filter(|&e| self.gr.is_source_sink(e))
            .collect();
        for e in direct {
            self.collect_path(e);
        }
    }

    /// Repeatedly peel the widest source→sink path until none carries weight.
    pub fn greedy_decompose(&mut self) {
        while let Some((w, path)) = self.gr.compute_maximum_path_w() {
            if w <= 0.0 || path.is_empty() {
                break;
            }
            let (e, _) = self.split_merge_path(&path, w);
            self.collect_path(e);
        }
        if self.gr.num_edges() > 0 {
            tracing::warn!(
                name = %self.name,
                edges = self.gr.num_edges(),
                "edges left after greedy extraction"
            );
        }
    }

    /// Retire edges lighter than 1.
    pub fn remove_empty_edges(&mut self) {
        let light: Vec<EdgeId> = self.gr.edges().filter(|&e| self.gr.weight(e) < 1.0).collect();
        for e in light {
            self.retire(e);
        }
    }
}
