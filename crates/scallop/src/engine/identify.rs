//! Equation discovery, from exact vertex balances to subset-sum matches.

use std::collections::{BTreeMap, BTreeSet};

use crate::equation::{Equation, Resolution};
use crate::graph::EdgeId;
use crate::nested::{Exchange, NestedGraph};
use crate::subsetsum::solve_single;

use super::Scallop;

impl Scallop {
    /// Level 0: an in-edge and an out-edge of one branching vertex with the
    /// same integer weight. At most one equation.
    pub fn identify_equations0(&self) -> Vec<Equation> {
        for v in 0..self.gr.num_vertices() {
            if self.gr.degree(v) == 0 || self.gr.in_degree(v) == 1 || self.gr.out_degree(v) == 1 {
                continue;
            }
            let m1 = self.first_by_weight(self.gr.in_edges(v));
            let m2 = self.first_by_weight(self.gr.out_edges(v));
            if let Some((&x, &y)) = m1.iter().find_map(|(w, x)| m2.get(w).map(|y| (x, y))) {
                return vec![settled(x, y)];
            }
        }
        Vec::new()
    }

    fn first_by_weight(&self, edges: &[EdgeId]) -> BTreeMap<usize, EdgeId> {
        let mut m = BTreeMap::new();
        for &e in edges {
            m.entry(self.gr.weight(e) as usize).or_insert(e);
        }
        m
    }

    /// Level 1: two equal-weight edges anywhere. Pairs that can be made
    /// adjacent come first; otherwise a pair that reroutes a bottleneck vertex.
    pub fn identify_equations1(&mut self) -> Vec<Equation> {
        let mut buckets: BTreeMap<usize, Vec<EdgeId>> = BTreeMap::new();
        for e in self.gr.edges() {
            buckets.entry(self.gr.weight(e) as usize).or_default().push(e);
        }
        let pairs: Vec<(EdgeId, EdgeId)> = buckets
            .values()
            .filter(|v| v.len() >= 2)
            .flat_map(|v| {
                (0..v.len()).flat_map(move |i| (i + 1..v.len()).map(move |j| (v[i], v[j])))
            })
            .collect();

        let nt = NestedGraph::new(&self.gr);
        if let Some(&(x, y)) = pairs
            .iter()
            .find(|&&(x, y)| self.check_adjacent_mergeable(x, y, &nt))
        {
            return vec![settled(x, y)];
        }

        for (x, y) in pairs {
            let mut eqn = Equation::new(vec![x], vec![y], 0.0);
            self.resolve_vertex_with_equation(&mut eqn);
            if eqn.f == Resolution::Rerouted {
                return vec![eqn];
            }
        }
        Vec::new()
    }

    /// Live edges with positive integer weight that do not span source→sink,
    /// ascending by `(weight, id)`.
    fn seed_edges(&self) -> Vec<(usize, EdgeId)> {
        let mut p: Vec<(usize, EdgeId)> = self
            .gr
            .edges()
            .filter(|&e| !self.gr.is_source_sink(e))
            .map(|e| (self.gr.weight(e) as usize, e))
            .filter(|&(w, _)| w > 0)
            .collect();
        p.sort_unstable();
        p
    }

    /// Level 2: one edge against a subset of the edges it can reach or be
    /// reached from.
    pub fn identify_equations2(&self) -> Vec<Equation> {
        let mut eqns = Vec::new();
        for (_, e) in self.seed_edges() {
            let Some((err, t)) = self.identify_equation(&[e]) else {
                continue;
            };
            if t.len() <= 1 {
                continue;
            }
            if err as f64 / self.gr.weight(e) > self.cfg.max_equation_error_ratio {
                continue;
            }
            eqns.push(Equation::new(vec![e], t, err as f64));
        }
        self.tag_mergeability(&mut eqns);
        eqns
    }

    /// Level 3: like level 2, seeded with every pair of edges.
    pub fn identify_equations3(&self) -> Vec<Equation> {
        let seeds = self.seed_edges();
        let mut eqns = Vec::new();
        for i in 0..seeds.len() {
            for j in i + 1..seeds.len() {
                let (e1, e2) = (seeds[i].1, seeds[j].1);
                let Some((err, t)) = self.identify_equation(&[e1, e2]) else {
                    continue;
                };
                if t.len() <= 1 {
                    continue;
                }
                let ww = self.gr.weight(e1) + self.gr.weight(e2);
                if err as f64 / ww > self.cfg.max_equation_error_ratio {
                    continue;
                }
                eqns.push(Equation::new(vec![e1, e2], t, err as f64));
            }
        }
        self.tag_mergeability(&mut eqns);
        eqns
    }

    /// Count adjacent and distant pairs between each seed and the matched edges.
    fn tag_mergeability(&self, eqns: &mut [Equation]) {
        if eqns.is_empty() {
            return;
        }
        let nt = NestedGraph::new(&self.gr);
        for eqn in eqns.iter_mut() {
            for &x in &eqn.s {
                for &y in &eqn.t {
                    if self.check_adjacent_mergeable(x, y, &nt) {
                        eqn.a += 1;
                    } else {
                        eqn.d += 1;
                    }
                }
            }
        }
    }

    /// Match the seed edges against a subset of their reachable closure.
    ///
    /// Returns `(|achieved - target|, matched edges)` for the first
    /// nontrivial subset-sum solution, in integer weight units.
    pub fn identify_equation(&self, subs: &[EdgeId]) -> Option<(usize, Vec<EdgeId>)> {
        if subs.is_empty() {
            return None;
        }
        let mut closure = BTreeSet::new();
        let mut w = 0.0;
        for &e in subs {
            let (s, t) = self.gr.endpoints(e);
            w += self.gr.weight(e);
            closure.extend(self.gr.bfs_edges(t));
            closure.extend(self.gr.bfs_reverse_edges(s));
        }
        let sw = w as usize;
        let limit = sw as f64 * (1.0 + self.cfg.max_equation_error_ratio);

        let mut xi: Vec<(usize, EdgeId)> = closure
            .into_iter()
            .filter(|e| !subs.contains(e) && !self.gr.is_source_sink(*e))
            .map(|e| (self.gr.weight(e) as usize, e))
            .filter(|&(ww, _)| ww > 0 && ww as f64 <= limit)
            .collect();
        if xi.is_empty() {
            return None;
        }
        xi.sort_unstable();

        let mut values: Vec<usize> = xi.iter().map(|p| p.0).collect();
        values.push(sw);
        for sol in solve_single(&values, self.cfg.subsetsum()) {
            let subt: Vec<EdgeId> = sol.indices.iter().map(|&k| xi[k].1).collect();
            if !self.verify_equation_nontrivial(subs, &subt) {
                continue;
            }
            return Some((sol.sum.abs_diff(sw), subt));
        }
        None
    }

    /// An equation is nontrivial if, in both directions, one side can be
    /// bypassed: the heads of one side reach the sink without the other
    /// side's edges, or the tails of the other side are reached from the
    /// source without the first side's edges.
    pub fn verify_equation_nontrivial(&self, subs: &[EdgeId], subt: &[EdgeId]) -> bool {
        let fbs: BTreeSet<EdgeId> = subs.iter().copied().collect();
        let fbt: BTreeSet<EdgeId> = subt.iter().copied().collect();
        let tails = |v: &[EdgeId]| -> Vec<usize> { v.iter().map(|&e| self.gr.endpoints(e).0).collect() };
        let heads = |v: &[EdgeId]| -> Vec<usize> { v.iter().map(|&e| self.gr.endpoints(e).1).collect() };
        let (source, sink) = (self.gr.source(), self.gr.sink());

        let b1 = self.gr.bfs_avoiding(&heads(subs), sink, &fbt);
        let b2 = self.gr.bfs_reverse_avoiding(&tails(subt), source, &fbs);
        if !b1 && !b2 {
            return false;
        }
        let b1 = self.gr.bfs_avoiding(&heads(subt), sink, &fbs);
        let b2 = self.gr.bfs_reverse_avoiding(&tails(subs), source, &fbt);
        b1 || b2
    }

    /// Can `x` and `y` be made to touch by exchanges?
    pub fn check_adjacent_mergeable(&self, x: EdgeId, y: EdgeId, nt: &NestedGraph) -> bool {
        let (xs, xt) = self.gr.endpoints(x);
        let (ys, yt) = self.gr.endpoints(y);
        if xt == ys || yt == xs {
            return true;
        }
        nt.link(x, y).or_else(|| nt.link(y, x)).is_some()
    }

    /// Exchange plan that makes `x` and `y` touch, against the live graph.
    pub(crate) fn adjacent_plan(&self, x: EdgeId, y: EdgeId) -> Option<Vec<Exchange>> {
        let (xs, xt) = self.gr.endpoints(x);
        let (ys, yt) = self.gr.endpoints(y);
        if xt == ys || yt == xs {
            return Some(Vec::new());
        }
        let nt = NestedGraph::new(&self.gr);
        nt.link(x, y).or_else(|| nt.link(y, x))
    }
}

/// One-to-one equation that resolves by a single adjacent merge.
fn settled(x: EdgeId, y: EdgeId) -> Equation {
    Equation {
        s: vec![x],
        t: vec![y],
        e: 0.0,
        f: Resolution::Resolved,
        a: 1,
        d: 0,
    }
}
