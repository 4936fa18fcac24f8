//! Reachability, path searches, and path counts.
//!
//! All searches walk live adjacency only. Orderings follow `topological_order`
//! rather than vertex indices, since exchanges may relabel the order of
//! series blocks.

use std::collections::{BTreeSet, VecDeque};

use crate::config::SMIN;

use super::{EdgeId, SpliceGraph};

impl SpliceGraph {
    /// Kahn order over all vertices; ties go to the smaller index.
    pub fn topological_order(&self) -> Vec<usize> {
        let n = self.num_vertices();
        let mut indeg: Vec<usize> = (0..n).map(|v| self.in_degree(v)).collect();
        let mut ready: BTreeSet<usize> = (0..n).filter(|&v| indeg[v] == 0).collect();
        let mut order = Vec::with_capacity(n);
        while let Some(v) = ready.pop_first() {
            order.push(v);
            for &e in self.out_edges(v) {
                let (_, t) = self.endpoints(e);
                indeg[t] -= 1;
                if indeg[t] == 0 {
                    ready.insert(t);
                }
            }
        }
        assert_eq!(order.len(), n, "splice graph contains a cycle");
        order
    }

    /// Can `u` reach `v`? A vertex reaches itself.
    pub fn check_vertex_path(&self, u: usize, v: usize) -> bool {
        self.bfs_avoiding(&[u], v, &BTreeSet::new())
    }

    /// Can the head of `e1` reach the tail of `e2`?
    pub fn check_path(&self, e1: EdgeId, e2: EdgeId) -> bool {
        let (_, t1) = self.endpoints(e1);
        let (s2, _) = self.endpoints(e2);
        self.check_vertex_path(t1, s2)
    }

    /// Edges reachable forward from vertex `v`.
    pub fn bfs_edges(&self, v: usize) -> BTreeSet<EdgeId> {
        let mut seen = vec![false; self.num_vertices()];
        let mut out = BTreeSet::new();
        let mut queue = VecDeque::from([v]);
        seen[v] = true;
        while let Some(u) = queue.pop_front() {
            for &e in self.out_edges(u) {
                out.insert(e);
                let (_, t) = self.endpoints(e);
                if !seen[t] {
                    seen[t] = true;
                    queue.push_back(t);
                }
            }
        }
        out
    }

    /// Edges from which vertex `v` is reachable.
    pub fn bfs_reverse_edges(&self, v: usize) -> BTreeSet<EdgeId> {
        let mut seen = vec![false; self.num_vertices()];
        let mut out = BTreeSet::new();
        let mut queue = VecDeque::from([v]);
        seen[v] = true;
        while let Some(u) = queue.pop_front() {
            for &e in self.in_edges(u) {
                out.insert(e);
                let (s, _) = self.endpoints(e);
                if !seen[s] {
                    seen[s] = true;
                    queue.push_back(s);
                }
            }
        }
        out
    }

    /// Is `target` reachable from any of `starts` without using `forbidden` edges?
    pub fn bfs_avoiding(
        &self,
        starts: &[usize],
        target: usize,
        forbidden: &BTreeSet<EdgeId>,
    ) -> bool {
        let mut seen = vec![false; self.num_vertices()];
        let mut queue = VecDeque::new();
        for &s in starts {
            if s == target {
                return true;
            }
            if !seen[s] {
                seen[s] = true;
                queue.push_back(s);
            }
        }
        while let Some(u) = queue.pop_front() {
            for &e in self.out_edges(u) {
                if forbidden.contains(&e) {
                    continue;
                }
                let (_, t) = self.endpoints(e);
                if t == target {
                    return true;
                }
                if !seen[t] {
                    seen[t] = true;
                    queue.push_back(t);
                }
            }
        }
        false
    }

    /// Can any of `starts` be reached from `target` without using `forbidden` edges?
    pub fn bfs_reverse_avoiding(
        &self,
        starts: &[usize],
        target: usize,
        forbidden: &BTreeSet<EdgeId>,
    ) -> bool {
        let mut seen = vec![false; self.num_vertices()];
        let mut queue = VecDeque::new();
        for &s in starts {
            if s == target {
                return true;
            }
            if !seen[s] {
                seen[s] = true;
                queue.push_back(s);
            }
        }
        while let Some(u) = queue.pop_front() {
            for &e in self.in_edges(u) {
                if forbidden.contains(&e) {
                    continue;
                }
                let (s, _) = self.endpoints(e);
                if s == target {
                    return true;
                }
                if !seen[s] {
                    seen[s] = true;
                    queue.push_back(s);
                }
            }
        }
        false
    }

    /// Fewest-edge path `u ⇝ v` using only edges that carry at least `w`.
    ///
    /// Returns the edge sequence (empty when `u == v`) or `None`.
    pub fn compute_shortest_path_w(&self, u: usize, v: usize, w: f64) -> Option<Vec<EdgeId>> {
        if u == v {
            return Some(Vec::new());
        }
        let mut pred: Vec<Option<EdgeId>> = vec![None; self.num_vertices()];
        let mut seen = vec![false; self.num_vertices()];
        let mut queue = VecDeque::from([u]);
        seen[u] = true;
        while let Some(x) = queue.pop_front() {
            for &e in self.out_edges(x) {
                if self.weight(e) < w - SMIN {
                    continue;
                }
                let (_, t) = self.endpoints(e);
                if seen[t] {
                    continue;
                }
                seen[t] = true;
                pred[t] = Some(e);
                if t == v {
                    return Some(self.unwind(&pred, u, v));
                }
                queue.push_back(t);
            }
        }
        None
    }

    /// Widest source→sink path: maximizes the smallest edge weight on the path.
    ///
    /// Returns `(bottleneck, edges)`, or `None` if the sink is unreachable.
    pub fn compute_maximum_path_w(&self) -> Option<(f64, Vec<EdgeId>)> {
        let n = self.num_vertices();
        if n < 2 {
            return None;
        }
        let mut best: Vec<Option<f64>> = vec![None; n];
        let mut pred: Vec<Option<EdgeId>> = vec![None; n];
        best[self.source()] = Some(f64::INFINITY);
        for v in self.topological_order() {
            let Some(bv) = best[v] else {
                continue;
            };
            for &e in self.out_edges(v) {
                let (_, t) = self.endpoints(e);
                let cand = bv.min(self.weight(e));
                if best[t].is_none_or(|bt| cand > bt) {
                    best[t] = Some(cand);
                    pred[t] = Some(e);
                }
            }
        }
        let w = best[self.sink()]?;
        Some((w, self.unwind(&pred, self.source(), self.sink())))
    }

    fn unwind(&self, pred: &[Option<EdgeId>], from: usize, to: usize) -> Vec<EdgeId> {
        let mut path = Vec::new();
        let mut x = to;
        while x != from {
            let Some(e) = pred[x] else {
                break;
            };
            path.push(e);
            x = self.endpoints(e).0;
        }
        path.reverse();
        path
    }

    /// Number of distinct source→sink paths (saturating).
    pub fn compute_num_paths(&self) -> u64 {
        let n = self.num_vertices();
        if n < 2 {
            return 0;
        }
        let mut count = vec![0u64; n];
        count[self.source()] = 1;
        for v in self.topological_order() {
            if count[v] == 0 {
                continue;
            }
            for &e in self.out_edges(v) {
                let (_, t) = self.endpoints(e);
                count[t] = count[t].saturating_add(count[v]);
            }
        }
        count[self.sink()]
    }

    /// Lower bound on the paths a decomposition needs: `E - V' + 2`, where
    /// `V'` counts non-isolated vertices.
    pub fn compute_decomp_paths(&self) -> i64 {
        let active = (0..self.num_vertices())
            .filter(|&v| self.degree(v) >= 1)
            .count();
        self.num_edges() as i64 - active as i64 + 2
    }
}
