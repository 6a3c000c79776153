//! Feasible trees built from a partial state, used as upper bounds.
//!
//! The tree recorded for `(v, X)` is joined with a shortest path from `v` to
//! each remaining label, and the union is reduced to a spanning tree with
//! unlabeled leaves stripped.

use common::VertexId;

use crate::search::distance::TerminalDistanceIndex;
use crate::search::outcome::SteinerTree;
use crate::search::state::StateKey;
use crate::search::store::StateStore;

#[derive(Debug, Clone, Copy)]
pub struct MergeMstBuilder<'a> {
    index: &'a TerminalDistanceIndex,
}

impl<'a> MergeMstBuilder<'a> {
    pub fn new(index: &'a TerminalDistanceIndex) -> Self {
        Self { index }
    }

    /// Completes the tree of `key` into one covering every query label.
    ///
    /// `None` if a remaining label is unreachable from `key.vertex`.
    pub fn candidate(&self, store: &StateStore, key: StateKey) -> Option<SteinerTree> {
        let rest = key.complement(self.index.full_mask()).mask;
        let mut edges = store.reconstruct(key)?.edges;
        for bit in rest.iter() {
            edges.extend(self.index.path_to_label(key.vertex, bit)?);
        }
        Some(SteinerTree::from_edges(key.vertex, edges, self.index))
    }

    /// Joins the trees recorded for several states rooted at one vertex.
    pub fn combine(&self, store: &StateStore, anchor: VertexId, keys: &[StateKey]) -> Option<SteinerTree> {
        let mut edges = Vec::new();
        for &key in keys {
            edges.extend(store.reconstruct(key)?.edges);
        }
        Some(SteinerTree::from_edges(anchor, edges, self.index))
    }
}
