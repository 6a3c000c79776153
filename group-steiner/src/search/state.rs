//! Search states and how they were derived.

use common::{VertexId, Weight};
use serde::Serialize;

use crate::core::query::LabelMask;

/// A search state `(v, X)`: a tree rooted at `v` covering the labels in `X`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct StateKey {
    pub vertex: VertexId,
    pub mask: LabelMask,
}

impl StateKey {
    pub fn new(vertex: VertexId, mask: LabelMask) -> Self {
        Self { vertex, mask }
    }

    /// The state rooted at the same vertex covering the labels this one lacks.
    pub fn complement(&self, full: LabelMask) -> Self {
        Self {
            vertex: self.vertex,
            mask: full.difference(self.mask),
        }
    }
}

impl std::fmt::Display for StateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.vertex, self.mask)
    }
}

/// How the best known tree for a state was built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Provenance {
    /// Single vertex carrying the labels of the mask.
    Leaf,
    /// Edge `(from.vertex, vertex)` appended to the tree of `from`.
    Grow { from: StateKey, weight: Weight },
    /// Union of two disjoint-mask trees rooted at the same vertex.
    Merge { left: StateKey, right: StateKey },
}

impl Provenance {
    /// States this one was derived from.
    pub fn parents(&self) -> impl Iterator<Item = StateKey> {
        let (a, b) = match *self {
            Provenance::Leaf => (None, None),
            Provenance::Grow { from, .. } => (Some(from), None),
            Provenance::Merge { left, right } => (Some(left), Some(right)),
        };
        a.into_iter().chain(b)
    }
}
