//! Series-block partners and exchange.
//!
//! Around a vertex `x`, the in-partner `l` and out-partner `r` bound two
//! single-entry/single-exit regions `A = [l, x]` and `B = [x, r]`: every edge
//! into `x` lies in `A`, every edge out of `x` lies in `B`, and interior
//! vertices of either region touch no edge outside it. `exchange(l, x, r)`
//! swaps the two blocks so the order becomes `l -B-> x -A-> r`. Each path
//! through `x` keeps the same edges, only the order of its two segments flips.

use std::collections::BTreeSet;

use super::{EdgeId, SpliceGraph};

impl SpliceGraph {
    /// Nearest vertex after `x` on which every edge leaving `x` converges,
    /// provided the region in between is closed.
    pub fn compute_out_partner(&self, x: usize) -> Option<usize> {
        let mut open: BTreeSet<EdgeId> = self.out_edges(x).iter().copied().collect();
        if open.is_empty() {
            return None;
        }
        let order = self.topological_order();
        let start = order.iter().position(|&v| v == x)?;
        for &u in &order[start + 1..] {
            let incoming: Vec<EdgeId> = self
                .in_edges(u)
                .iter()
                .copied()
                .filter(|e| open.contains(e))
                .collect();
            if incoming.is_empty() {
                continue;
            }
            if incoming.len() == open.len() {
                return Some(u);
            }
            // interior vertex: entered only from the region, left only into it
            if incoming.len() != self.in_degree(u) || self.out_degree(u) == 0 {
                return None;
            }
            for e in incoming {
                open.remove(&e);
            }
            open.extend(self.out_edges(u).iter().copied());
        }
        None
    }

    /// Nearest vertex before `x` from which every edge entering `x` departs,
    /// provided the region in between is closed.
    pub fn compute_in_partner(&self, x: usize) -> Option<usize> {
        let mut open: BTreeSet<EdgeId> = self.in_edges(x).iter().copied().collect();
        if open.is_empty() {
            return None;
        }
        let order = self.topological_order();
        let stop = order.iter().position(|&v| v == x)?;
        for &u in order[..stop].iter().rev() {
            let outgoing: Vec<EdgeId> = self
                .out_edges(u)
                .iter()
                .copied()
                .filter(|e| open.contains(e))
                .collect();
            if outgoing.is_empty() {
                continue;
            }
            if outgoing.len() == open.len() {
                return Some(u);
            }
            if outgoing.len() != self.out_degree(u) || self.in_degree(u) == 0 {
                return None;
            }
            for e in outgoing {
                open.remove(&e);
            }
            open.extend(self.in_edges(u).iter().copied());
        }
        None
    }

    /// Edges on paths `from ⇝ x`, walking backward from `x` and stopping at `from`.
    fn region_before(&self, from: usize, x: usize) -> Vec<EdgeId> {
        let mut seen = BTreeSet::from([x]);
        let mut stack = vec![x];
        let mut edges = BTreeSet::new();
        while let Some(v) = stack.pop() {
            if v == from {
                continue;
            }
            for &e in self.in_edges(v) {
                edges.insert(e);
                let (s, _) = self.endpoints(e);
                if seen.insert(s) {
                    stack.push(s);
                }
            }
        }
        edges.into_iter().collect()
    }

    /// Edges on paths `x ⇝ to`, walking forward from `x` and stopping at `to`.
    fn region_after(&self, x: usize, to: usize) -> Vec<EdgeId> {
        let mut seen = BTreeSet::from([x]);
        let mut stack = vec![x];
        let mut edges = BTreeSet::new();
        while let Some(v) = stack.pop() {
            if v == to {
                continue;
            }
            for &e in self.out_edges(v) {
                edges.insert(e);
                let (_, t) = self.endpoints(e);
                if seen.insert(t) {
                    stack.push(t);
                }
            }
        }
        edges.into_iter().collect()
    }

    /// Swap the series blocks `[l, x]` and `[x, r]`.
    ///
    /// `l` and `r` must be the in- and out-partner of `x`.
    pub fn exchange(&mut self, l: usize, x: usize, r: usize) {
        assert_eq!(self.compute_in_partner(x), Some(l), "{l} is not the in-partner of {x}");
        assert_eq!(self.compute_out_partner(x), Some(r), "{r} is not the out-partner of {x}");
        let a = self.region_before(l, x);
        let b = self.region_after(x, r);
        for e in a {
            let (s, t) = self.endpoints(e);
            let s2 = if s == l { x } else { s };
            let t2 = if t == x { r } else { t };
            self.relink(e, s2, t2);
        }
        for e in b {
            let (s, t) = self.endpoints(e);
            let s2 = if s == x { l } else { s };
            let t2 = if t == r { x } else { t };
            self.relink(e, s2, t2);
        }
    }
}
