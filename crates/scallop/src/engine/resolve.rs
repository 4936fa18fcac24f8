//! Equation resolution: adjacent merges, distant connections, rerouting.

use std::collections::BTreeSet;

use crate::config::SMIN;
use crate::equation::{Equation, Resolution};
use crate::graph::EdgeId;

use super::Scallop;

impl Scallop {
    /// Resolve `eqn` by pairing its sides, one merge per round.
    ///
    /// Each round merges one pair, adjacent pairs first, and uses up at least
    /// one edge of the pair, so at most `|s| + |t|` rounds run. Sets
    /// `eqn.f`, `eqn.a` and `eqn.d`. Returns the number of rounds.
    pub fn resolve_equation(&mut self, eqn: &mut Equation) -> usize {
        let mut s = eqn.s.clone();
        let mut t = eqn.t.clone();
        eqn.a = 0;
        eqn.d = 0;
        let mut rounds = 0;
        eqn.f = loop {
            if s.is_empty() && t.is_empty() {
                break Resolution::Resolved;
            }
            let merged = if s.is_empty() || t.is_empty() {
                false
            } else if self.merge_adjacent_pair(&mut s, &mut t) {
                eqn.a += 1;
                true
            } else if self.connect_distant_pair(&mut s, &mut t) {
                eqn.d += 1;
                true
            } else {
                false
            };
            if !merged {
                break if rounds > 0 {
                    Resolution::Partial
                } else {
                    Resolution::Unresolved
                };
            }
            rounds += 1;
        };
        rounds
    }

    /// Merge the first pair that is, or can be made, adjacent.
    fn merge_adjacent_pair(&mut self, s: &mut Vec<EdgeId>, t: &mut Vec<EdgeId>) -> bool {
        for i in 0..s.len() {
            for j in 0..t.len() {
                let (x, y) = (s[i], t[j]);
                let Some(plan) = self.adjacent_plan(x, y) else {
                    continue;
                };
                for op in &plan {
                    op.apply(&mut self.gr);
                }
                let w = self.gr.weight(x).min(self.gr.weight(y));
                let (_, rest) = self.split_merge_path(&[x, y], w);
                tracing::debug!(%x, %y, exchanges = plan.len(), "merge adjacent pair");
                replace_or_remove(s, i, x, rest[0]);
                replace_or_remove(t, j, y, rest[1]);
                return true;
            }
        }
        false
    }

    /// Connect the first pair joined by a path that carries their common
    /// weight and avoids every other edge of the equation.
    fn connect_distant_pair(&mut self, s: &mut Vec<EdgeId>, t: &mut Vec<EdgeId>) -> bool {
        let mut members = BTreeSet::new();
        for &e in s.iter().chain(t.iter()) {
            assert!(members.insert(e), "edge {e} appears twice in one equation");
        }
        for i in 0..s.len() {
            for j in 0..t.len() {
                let (x, y) = (s[i], t[j]);
                let w = self.gr.weight(x).min(self.gr.weight(y));
                let Some(p) = self.check_distant_mergeable(x, y, w) else {
                    continue;
                };
                assert!(p.len() >= 2 && p[0] == x && p[p.len() - 1] == y);
                if p[1..p.len() - 1].iter().any(|e| members.contains(e)) {
                    continue;
                }
                let (_, rest) = self.split_merge_path(&p, w);
                tracing::debug!(%x, %y, len = p.len(), "connect distant pair");
                replace_or_remove(s, i, x, rest[0]);
                replace_or_remove(t, j, y, rest[rest.len() - 1]);
                return true;
            }
        }
        false
    }

    /// Path `x, .., y` (or `y, .., x` reversed so it still starts with `x`)
    /// whose inner edges all carry at least `w`.
    pub fn check_distant_mergeable(&self, x: EdgeId, y: EdgeId, w: f64) -> Option<Vec<EdgeId>> {
        let (xs, xt) = self.gr.endpoints(x);
        let (ys, yt) = self.gr.endpoints(y);
        if self.gr.check_vertex_path(yt, xs) {
            let mut p = self.check_distant_mergeable(y, x, w)?;
            p.reverse();
            return Some(p);
        }
        if !self.gr.check_vertex_path(xt, ys) {
            return None;
        }
        let inner = self.gr.compute_shortest_path_w(xt, ys, w)?;
        let mut p = Vec::with_capacity(inner.len() + 2);
        p.push(x);
        p.extend(inner);
        p.push(y);
        Some(p)
    }

    /// Settle a one-to-one equation by rerouting around a bottleneck.
    ///
    /// With `x` upstream of `y`: if the head of `x` has exactly two in-edges,
    /// the other in-edge is split across the head's out-edges that cannot
    /// reach `y`, bypassing the head. Failing that, the mirror move at the
    /// tail of `y`. Sets `eqn.f = Rerouted` on success.
    pub fn resolve_vertex_with_equation(&mut self, eqn: &mut Equation) {
        if eqn.s.len() != 1 || eqn.t.len() != 1 {
            return;
        }
        let (mut ex, mut ey) = (eqn.s[0], eqn.t[0]);
        if self.gr.check_path(ey, ex) {
            std::mem::swap(&mut ex, &mut ey);
        }
        if !self.gr.check_path(ex, ey) {
            return;
        }
        let (_, xt) = self.gr.endpoints(ex);
        let (ys, _) = self.gr.endpoints(ey);

        if self.gr.in_degree(xt) == 2 {
            let Some(&ex2) = self.gr.in_edges(xt).iter().find(|&&e| e != ex) else {
                return;
            };
            let w2 = self.gr.weight(ex2);
            let reach = self.gr.bfs_reverse_edges(ys);
            let ve: Vec<EdgeId> = self
                .gr
                .out_edges(xt)
                .iter()
                .copied()
                .filter(|e| !reach.contains(e))
                .collect();
            let w1: f64 = ve.iter().map(|&e| self.gr.weight(e)).sum();
            if !ve.is_empty() && w1 > w2 + SMIN {
                return;
            }
            let mut ei = ex2;
            for &e in &ve {
                let rest = self.split_edge(ei, self.gr.weight(e));
                if self.merge_adjacent_equal_edges(ei, e).is_none() {
                    panic!("edges {ei} and {e} do not meet at vertex {xt}");
                }
                if rest == ei {
                    break;
                }
                ei = rest;
            }
            if !ve.is_empty() {
                tracing::debug!(edge = %ex2, vertex = xt, moved = ve.len(), "reroute in-edge");
                eqn.f = Resolution::Rerouted;
                return;
            }
        }

        if self.gr.out_degree(ys) == 2 {
            let Some(&ey2) = self.gr.out_edges(ys).iter().find(|&&e| e != ey) else {
                return;
            };
            let w2 = self.gr.weight(ey2);
            let reach = self.gr.bfs_edges(xt);
            let ve: Vec<EdgeId> = self
                .gr
                .in_edges(ys)
                .iter()
                .copied()
                .filter(|e| !reach.contains(e))
                .collect();
            let w1: f64 = ve.iter().map(|&e| self.gr.weight(e)).sum();
            if !ve.is_empty() && w1 > w2 + SMIN {
                return;
            }
            let mut ei = ey2;
            for &e in &ve {
                let rest = self.split_edge(ei, self.gr.weight(e));
                if self.merge_adjacent_equal_edges(ei, e).is_none() {
                    panic!("edges {e} and {ei} do not meet at vertex {ys}");
                }
                if rest == ei {
                    break;
                }
                ei = rest;
            }
            if !ve.is_empty() {
                tracing::debug!(edge = %ey2, vertex = ys, moved = ve.len(), "reroute out-edge");
                eqn.f = Resolution::Rerouted;
            }
        }
    }

    /// Resolve every internal vertex that is not a proper branch point
    /// (fewer than two in- or out-edges). Returns whether any was touched.
    pub fn decompose_trivial_vertices(&mut self) -> bool {
        let mut touched = false;
        for v in 1..self.gr.num_vertices().saturating_sub(1) {
            let (id, od) = (self.gr.in_degree(v), self.gr.out_degree(v));
            if id == 0 || od == 0 || (id >= 2 && od >= 2) {
                continue;
            }
            let mut eqn = Equation::new(self.gr.in_edges(v).to_vec(), self.gr.out_edges(v).to_vec(), 0.0);
            tracing::debug!("decompose trivial vertex {v}: {}", eqn.render(v));
            self.resolve_equation(&mut eqn);
            touched = true;
        }
        touched
    }
}

/// Drop `old` from position `i`, or put its remainder there.
fn replace_or_remove(v: &mut Vec<EdgeId>, i: usize, old: EdgeId, rest: EdgeId) {
    if rest == old {
        v.remove(i);
    } else {
        v[i] = rest;
    }
}
