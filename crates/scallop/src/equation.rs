//! Balance equations between two edge sets.
//!
//! An equation hypothesizes that the edges in `s` and the edges in `t` carry
//! the same total flow. Identification fills `s`, `t` and the error `e`;
//! resolution records how far it got in `f` together with the number of
//! adjacent (`a`) and distant (`d`) merges.

use std::cmp::Ordering;

use crate::graph::EdgeId;

/// Equal-error tolerance used by `cmp1`.
const ERROR_EPS: f64 = 1e-5;

/// Resolution status, ordered from least to most settled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Resolution {
    #[default]
    Unresolved,
    /// Some pairs merged, leftovers remain.
    Partial,
    /// Both sides consumed.
    Resolved,
    /// Settled by rerouting around a bottleneck vertex.
    Rerouted,
}

impl Resolution {
    /// Numeric status code (0 unresolved, 1 partial, 2 resolved, 3 rerouted).
    pub fn code(self) -> u8 {
        match self {
            Resolution::Unresolved => 0,
            Resolution::Partial => 1,
            Resolution::Resolved => 2,
            Resolution::Rerouted => 3,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Equation {
    pub s: Vec<EdgeId>,
    pub t: Vec<EdgeId>,
    /// Discrepancy between the two sides.
    pub e: f64,
    pub f: Resolution,
    /// Adjacent-mergeable pairs.
    pub a: usize,
    /// Pairs that need a connecting path.
    pub d: usize,
}

impl Equation {
    pub fn new(s: Vec<EdgeId>, t: Vec<EdgeId>, e: f64) -> Self {
        Self {
            s,
            t,
            e,
            ..Self::default()
        }
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.s.len() + self.t.len()
    }

    /// Ascending by error (within 1e-5), then by total edge count.
    pub fn cmp1(x: &Equation, y: &Equation) -> Ordering {
        if x.e < y.e - ERROR_EPS {
            Ordering::Less
        } else if x.e > y.e + ERROR_EPS {
            Ordering::Greater
        } else {
            x.size().cmp(&y.size())
        }
    }

    /// Most settled first, then fewest distant pairs, then fewest edges.
    pub fn cmp2(x: &Equation, y: &Equation) -> Ordering {
        y.f.cmp(&x.f)
            .then(x.d.cmp(&y.d))
            .then(x.size().cmp(&y.size()))
    }

    /// One-line diagnostic rendering.
    pub fn render(&self, index: usize) -> String {
        fn join(v: &[EdgeId]) -> String {
            v.iter()
                .map(|e| e.0.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        }
        format!(
            "equation {:3}: ({:2}, {:2}) edges, error = {:3.1}, f = {}, adjacent = {:2}, distant = {:2}. S = ({}), T = ({})",
            index,
            self.s.len(),
            self.t.len(),
            self.e,
            self.f.code(),
            self.a,
            self.d,
            join(&self.s),
            join(&self.t)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eqn(ns: usize, nt: usize, e: f64, f: Resolution, d: usize) -> Equation {
        Equation {
            s: (0..ns).map(EdgeId).collect(),
            t: (100..100 + nt).map(EdgeId).collect(),
            e,
            f,
            a: 0,
            d,
        }
    }

    #[test]
    fn cmp2_prefers_settled_then_near() {
        let a = eqn(1, 1, 0.0, Resolution::Rerouted, 0);
        let b = eqn(1, 1, 0.0, Resolution::Resolved, 0);
        let c = eqn(1, 1, 0.0, Resolution::Resolved, 1);
        let mut v = vec![c.clone(), b.clone(), a.clone()];
        v.sort_by(Equation::cmp2);
        assert_eq!(v, vec![a, b, c]);
    }

    #[test]
    fn cmp2_breaks_ties_by_size() {
        let small = eqn(1, 2, 0.0, Resolution::Unresolved, 1);
        let large = eqn(2, 3, 0.0, Resolution::Unresolved, 1);
        assert_eq!(Equation::cmp2(&small, &large), Ordering::Less);
        assert_eq!(Equation::cmp2(&large, &small), Ordering::Greater);
        assert_eq!(Equation::cmp2(&small, &small), Ordering::Equal);
    }

    #[test]
    fn cmp1_treats_close_errors_as_equal() {
        let x = eqn(2, 2, 1.0, Resolution::Unresolved, 0);
        let y = eqn(1, 1, 1.000001, Resolution::Unresolved, 0);
        let z = eqn(1, 1, 0.5, Resolution::Unresolved, 0);
        assert_eq!(Equation::cmp1(&y, &x), Ordering::Less);
        assert_eq!(Equation::cmp1(&z, &x), Ordering::Less);
        assert_eq!(Equation::cmp1(&x, &z), Ordering::Greater);
    }

    #[test]
    fn render_lists_edges() {
        let mut e = Equation::new(vec![EdgeId(3)], vec![EdgeId(5), EdgeId(8)], 2.0);
        e.a = 1;
        e.d = 1;
        assert_eq!(
            e.render(7),
            "equation   7: ( 1,  2) edges, error = 2.0, f = 0, adjacent =  1, distant =  1. S = (3), T = (5, 8)"
        );
        assert!(Equation::default().render(0).ends_with("S = (), T = ()"));
    }
}
