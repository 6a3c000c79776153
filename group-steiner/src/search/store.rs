//! Best known cost and provenance for every discovered state.

use common::{VertexId, Weight};
use hashbrown::{HashMap, HashSet};

use crate::algorithms::algo::TreeEdge;
use crate::core::query::LabelMask;
use crate::search::state::{Provenance, StateKey};

#[derive(Debug, Clone, Copy)]
struct StateRecord {
    cost: Weight,
    provenance: Provenance,
    finalized: bool,
}

/// Vertices and edges of the tree recorded for a state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Derivation {
    pub vertices: Vec<VertexId>,
    pub edges: Vec<TreeEdge>,
}

/// Map from state to its best known cost.
///
/// A state's cost only ever decreases, and stops changing once the state is
/// finalized. Finalized masks are also listed per vertex so merge partners
/// can be enumerated in the order they were settled.
#[derive(Debug, Default)]
pub struct StateStore {
    records: HashMap<StateKey, StateRecord>,
    settled: HashMap<VertexId, Vec<LabelMask>>,
    finalized_count: usize,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of discovered states.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of finalized states.
    pub fn finalized_count(&self) -> usize {
        self.finalized_count
    }

    /// Best known cost of `key`, if discovered.
    pub fn cost(&self, key: StateKey) -> Option<Weight> {
        self.records.get(&key).map(|r| r.cost)
    }

    pub fn is_finalized(&self, key: StateKey) -> bool {
        self.records.get(&key).is_some_and(|r| r.finalized)
    }

    /// Cost of `key` if it has been finalized.
    pub fn finalized_cost(&self, key: StateKey) -> Option<Weight> {
        self.records
            .get(&key)
            .filter(|r| r.finalized)
            .map(|r| r.cost)
    }

    /// Records `cost` for `key` if it beats the current value.
    ///
    /// Returns `false` when the state is finalized or already has a cost no
    /// greater than `cost`.
    pub fn offer(&mut self, key: StateKey, cost: Weight, provenance: Provenance) -> bool {
        match self.records.get_mut(&key) {
            Some(record) if record.finalized || record.cost <= cost => false,
            Some(record) => {
                record.cost = cost;
                record.provenance = provenance;
                true
            }
            None => {
                self.records.insert(
                    key,
                    StateRecord {
                        cost,
                        provenance,
                        finalized: false,
                    },
                );
                true
            }
        }
    }

    /// Marks `key` final and returns its cost. `None` if unknown or already final.
    pub fn finalize(&mut self, key: StateKey) -> Option<Weight> {
        let record = self.records.get_mut(&key)?;
        if record.finalized {
            return None;
        }
        record.finalized = true;
        self.finalized_count += 1;
        self.settled.entry(key.vertex).or_default().push(key.mask);
        Some(record.cost)
    }

    /// Masks finalized at `v`, in finalization order.
    pub fn settled_masks(&self, v: VertexId) -> &[LabelMask] {
        self.settled.get(&v).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Walks the provenance graph of `key` and collects the recorded tree.
    pub fn reconstruct(&self, key: StateKey) -> Option<Derivation> {
        let mut derivation = Derivation::default();
        let mut seen_vertices = HashSet::new();
        let mut visited = HashSet::new();
        let mut stack = vec![key];

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            let record = self.records.get(&current)?;
            if seen_vertices.insert(current.vertex) {
                derivation.vertices.push(current.vertex);
            }
            if let Provenance::Grow { from, weight } = record.provenance {
                derivation
                    .edges
                    .push(TreeEdge::new(from.vertex, current.vertex, weight));
            }
            stack.extend(record.provenance.parents());
        }
        Some(derivation)
    }
}
