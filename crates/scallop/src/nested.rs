//! Nested graph: can two edges be made adjacent by series-block exchanges?
//!
//! Purpose
//! - Given edges `x` and `y` where the head of `x` reaches the tail of `y`,
//!   plan a sequence of `exchange(l, v, r)` operations after which `x` ends
//!   exactly where `y` starts.
//!
//! Model
//! - Forward pass: while `head(x) != tail(y)`, exchange around `v = head(x)`.
//!   `x` lies in the block before `v`, so afterwards it ends at the
//!   out-partner of `v`, strictly closer to `y`.
//! - Backward pass (if forward fails): exchange around `v = tail(y)`, which
//!   moves the start of `y` back to the in-partner of `v`.
//! - Planning runs on a private snapshot; the live graph is untouched until
//!   the engine applies the plan.

use crate::graph::{EdgeId, SpliceGraph};

/// One planned `exchange(left, mid, right)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Exchange {
    pub left: usize,
    pub mid: usize,
    pub right: usize,
}

impl Exchange {
    pub fn apply(&self, gr: &mut SpliceGraph) {
        gr.exchange(self.left, self.mid, self.right);
    }
}

/// Snapshot of a splice graph used to plan adjacency.
#[derive(Clone, Debug)]
pub struct NestedGraph {
    gr: SpliceGraph,
}

impl NestedGraph {
    pub fn new(gr: &SpliceGraph) -> Self {
        Self { gr: gr.clone() }
    }

    /// Plan exchanges that make `x` end where `y` starts.
    ///
    /// Requires `head(x) ⇝ tail(y)`. Returns an empty plan for edges that
    /// already touch, `None` if no plan exists.
    pub fn link(&self, x: EdgeId, y: EdgeId) -> Option<Vec<Exchange>> {
        if !self.gr.check_path(x, y) {
            return None;
        }
        self.link_forward(x, y).or_else(|| self.link_backward(x, y))
    }

    fn link_forward(&self, x: EdgeId, y: EdgeId) -> Option<Vec<Exchange>> {
        let mut sim = self.gr.clone();
        let mut plan = Vec::new();
        for _ in 0..=sim.num_vertices() {
            let (_, xt) = sim.endpoints(x);
            let (ys, _) = sim.endpoints(y);
            if xt == ys {
                return Some(plan);
            }
            let l = sim.compute_in_partner(xt)?;
            let r = sim.compute_out_partner(xt)?;
            // y must stay downstream of the block that x is about to cross
            if !sim.check_vertex_path(r, ys) {
                return None;
            }
            let op = Exchange {
                left: l,
                mid: xt,
                right: r,
            };
            op.apply(&mut sim);
            plan.push(op);
        }
        None
    }

    fn link_backward(&self, x: EdgeId, y: EdgeId) -> Option<Vec<Exchange>> {
        let mut sim = self.gr.clone();
        let mut plan = Vec::new();
        for _ in 0..=sim.num_vertices() {
            let (_, xt) = sim.endpoints(x);
            let (ys, _) = sim.endpoints(y);
            if xt == ys {
                return Some(plan);
            }
            let l = sim.compute_in_partner(ys)?;
            let r = sim.compute_out_partner(ys)?;
            if !sim.check_vertex_path(xt, l) {
                return None;
            }
            let op = Exchange {
                left: l,
                mid: ys,
                right: r,
            };
            op.apply(&mut sim);
            plan.push(op);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain(bubbles: usize) -> SpliceGraph {
        let mut edges = Vec::new();
        for k in 0..bubbles {
            edges.push((k, k + 1, 3.0, 0.0));
            edges.push((k, k + 1, 7.0, 0.0));
        }
        SpliceGraph::from_edges(bubbles + 1, &edges)
    }

    #[test]
    fn touching_edges_need_no_exchange() {
        let g = chain(2);
        let nt = NestedGraph::new(&g);
        assert_eq!(nt.link(EdgeId(0), EdgeId(2)), Some(vec![]));
    }

    #[test]
    fn forward_plan_crosses_one_block() {
        let g = chain(3);
        let nt = NestedGraph::new(&g);
        // x = first edge of bubble 0, y = first edge of bubble 2
        let plan = nt.link(EdgeId(0), EdgeId(4)).unwrap();
        assert_eq!(
            plan,
            vec![Exchange {
                left: 0,
                mid: 1,
                right: 2
            }]
        );
        let mut live = g.clone();
        for op in &plan {
            op.apply(&mut live);
        }
        assert_eq!(live.endpoints(EdgeId(0)).1, live.endpoints(EdgeId(4)).0);
        assert!(live.check_index());
    }

    #[test]
    fn forward_plan_crosses_several_blocks() {
        let g = chain(5);
        let nt = NestedGraph::new(&g);
        let plan = nt.link(EdgeId(0), EdgeId(8)).unwrap();
        assert_eq!(plan.len(), 3);
        let mut live = g.clone();
        for op in &plan {
            op.apply(&mut live);
        }
        assert_eq!(live.endpoints(EdgeId(0)).1, live.endpoints(EdgeId(8)).0);
    }

    #[test]
    fn unrelated_edges_do_not_link() {
        let g = chain(3);
        let nt = NestedGraph::new(&g);
        assert!(nt.link(EdgeId(4), EdgeId(0)).is_none());
        assert!(nt.link(EdgeId(0), EdgeId(1)).is_none());
    }

    #[test]
    fn open_regions_block_both_directions() {
        let g = SpliceGraph::from_edges(
            6,
            &[
                (0, 1, 1.0, 0.0),
                (0, 2, 1.0, 0.0),
                (1, 2, 1.0, 0.0),
                (1, 5, 1.0, 0.0),
                (2, 3, 1.0, 0.0),
                (2, 3, 1.0, 0.0),
                (3, 4, 1.0, 0.0),
                (3, 4, 1.0, 0.0),
                (4, 5, 1.0, 0.0),
                (0, 3, 1.0, 0.0),
            ],
        );
        let nt = NestedGraph::new(&g);
        // 1 leaks into the sink, so [?, 2] is open; 0 -> 3 leaks into [2, 3]
        assert!(nt.link(EdgeId(2), EdgeId(6)).is_none());
    }
}
