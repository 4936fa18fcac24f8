//! Weight adjustment run before decomposition.
//!
//! Observed coverage rarely conserves flow exactly. A smoother rewrites edge
//! weights in place so every internal vertex passes on what it receives; the
//! engine calls the configured one at the start of the structural pass.

use crate::graph::SpliceGraph;

pub trait Smoother {
    fn smooth(&self, gr: &mut SpliceGraph);
}

/// Leaves weights untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopSmoother;

impl Smoother for NoopSmoother {
    fn smooth(&self, _gr: &mut SpliceGraph) {}
}

/// Rescales each internal vertex's out-edges so outflow equals inflow.
///
/// Vertices are visited in topological order, so an adjusted out-edge is
/// already final when its head is processed. Vertices without inflow or
/// outflow are left alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProportionalSmoother;

impl Smoother for ProportionalSmoother {
    fn smooth(&self, gr: &mut SpliceGraph) {
        let (source, sink) = (gr.source(), gr.sink());
        for v in gr.topological_order() {
            if v == source || v == sink {
                continue;
            }
            let win: f64 = gr.in_edges(v).iter().map(|&e| gr.weight(e)).sum();
            let wout: f64 = gr.out_edges(v).iter().map(|&e| gr.weight(e)).sum();
            if win <= 0.0 || wout <= 0.0 {
                continue;
            }
            let r = win / wout;
            for e in gr.out_edges(v).to_vec() {
                gr.set_weight(e, gr.weight(e) * r);
            }
        }
    }
}

/// Config-level choice of smoother.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SmootherKind {
    Noop,
    #[default]
    Proportional,
}

impl Smoother for SmootherKind {
    fn smooth(&self, gr: &mut SpliceGraph) {
        match self {
            SmootherKind::Noop => NoopSmoother.smooth(gr),
            SmootherKind::Proportional => ProportionalSmoother.smooth(gr),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::EdgeId;

    #[test]
    fn proportional_balances_internal_vertices() {
        let mut g = SpliceGraph::from_edges(
            4,
            &[
                (0, 1, 10.0, 0.0),
                (1, 2, 4.0, 0.0),
                (1, 2, 1.0, 0.0),
                (2, 3, 20.0, 0.0),
            ],
        );
        ProportionalSmoother.smooth(&mut g);
        assert!((g.weight(EdgeId(1)) - 8.0).abs() < 1e-9);
        assert!((g.weight(EdgeId(2)) - 2.0).abs() < 1e-9);
        assert!((g.weight(EdgeId(3)) - 10.0).abs() < 1e-9);
        assert!((g.weight(EdgeId(0)) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn noop_and_dead_ends_keep_weights() {
        let edges = [(0, 1, 3.0, 0.0), (0, 2, 5.0, 0.0), (2, 3, 1.0, 0.0)];
        let mut g = SpliceGraph::from_edges(4, &edges);
        SmootherKind::Noop.smooth(&mut g);
        assert!((g.weight(EdgeId(2)) - 1.0).abs() < 1e-12);
        SmootherKind::Proportional.smooth(&mut g);
        // vertex 1 has no outflow and stays as is
        assert!((g.weight(EdgeId(0)) - 3.0).abs() < 1e-12);
        assert!((g.weight(EdgeId(2)) - 5.0).abs() < 1e-12);
    }
}
