//! Edge handles and arena slots.

use std::fmt;

/// Stable, append-only edge handle. Retired ids are never reused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub usize);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Live edge record.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    /// Abundance carried by the edge.
    pub weight: f64,
    pub stddev: f64,
}

/// Arena slot: a live edge or a tombstone.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum EdgeSlot {
    Live(Edge),
    Retired,
}

impl EdgeSlot {
    #[inline]
    pub(crate) fn live(&self) -> Option<&Edge> {
        match self {
            EdgeSlot::Live(e) => Some(e),
            EdgeSlot::Retired => None,
        }
    }

    #[inline]
    pub(crate) fn live_mut(&mut self) -> Option<&mut Edge> {
        match self {
            EdgeSlot::Live(e) => Some(e),
            EdgeSlot::Retired => None,
        }
    }
}
