//! Weight utilities and the edge record shared by the tree algorithms.

use common::{saturating_add, VertexId, Weight, INFINITE_WEIGHT};
use serde::{Deserialize, Serialize};

/// An undirected weighted edge, stored with `from < to`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TreeEdge {
    pub from: VertexId,
    pub to: VertexId,
    pub weight: Weight,
}

impl TreeEdge {
    /// Creates a normalized edge.
    pub fn new(a: VertexId, b: VertexId, weight: Weight) -> Self {
        if a <= b {
            Self { from: a, to: b, weight }
        } else {
            Self { from: b, to: a, weight }
        }
    }

    /// Endpoint pair, usable as a map key.
    pub fn endpoints(&self) -> (VertexId, VertexId) {
        (self.from, self.to)
    }
}

/// Total weight of a set of edges; infinite if any edge is.
pub fn total_weight<'a, I>(edges: I) -> Weight
where
    I: IntoIterator<Item = &'a TreeEdge>,
{
    edges.into_iter().fold(0.0, |acc, e| saturating_add(acc, e.weight))
}

/// Half of a weight, keeping the infinity sentinel.
#[inline]
pub fn half(w: Weight) -> Weight {
    if w.is_infinite() {
        INFINITE_WEIGHT
    } else {
        w * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edge_normalization() {
        let e = TreeEdge::new(VertexId::new(5), VertexId::new(2), 1.5);
        assert_eq!(e.endpoints(), (VertexId::new(2), VertexId::new(5)));
        assert_eq!(e.weight, 1.5);
    }

    #[test]
    fn test_total_weight_saturates() {
        let edges = [
            TreeEdge::new(VertexId::new(0), VertexId::new(1), 2.0),
            TreeEdge::new(VertexId::new(1), VertexId::new(2), INFINITE_WEIGHT),
        ];
        assert_eq!(total_weight(&edges[..1]), 2.0);
        assert!(total_weight(&edges).is_infinite());
        assert!(half(INFINITE_WEIGHT).is_infinite());
        assert_eq!(half(3.0), 1.5);
    }
}
