//! Search results: the tree, its status and run statistics.

use common::{VertexId, Weight, INFINITE_WEIGHT};
use hashbrown::{HashMap, HashSet};
use serde::Serialize;

use crate::algorithms::algo::{total_weight, TreeEdge};
use crate::algorithms::min_spanning_tree::kruskal_mst;
use crate::core::graph::GraphModel;
use crate::core::query::LabelMask;
use crate::search::distance::TerminalDistanceIndex;

/// A connected tree in the data graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SteinerTree {
    vertices: Vec<VertexId>,
    edges: Vec<TreeEdge>,
    weight: Weight,
}

impl SteinerTree {
    /// Tree made of one vertex.
    pub fn single(v: VertexId) -> Self {
        Self {
            vertices: vec![v],
            edges: Vec::new(),
            weight: 0.0,
        }
    }

    /// Spanning tree of a connected edge set containing `anchor`, with
    /// unlabeled leaves stripped.
    pub(crate) fn from_edges(anchor: VertexId, edges: Vec<TreeEdge>, index: &TerminalDistanceIndex) -> Self {
        let edges = kruskal_mst(edges);
        let mut vertices: Vec<VertexId> = edges.iter().flat_map(|e| [e.from, e.to]).collect();
        vertices.push(anchor);
        vertices.sort_unstable();
        vertices.dedup();

        let mut tree = Self {
            weight: total_weight(&edges),
            vertices,
            edges,
        };
        tree.prune_unlabeled_leaves(|v| !index.vertex_mask(v).is_empty());
        tree
    }

    /// Sorted vertex list.
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    pub fn edges(&self) -> &[TreeEdge] {
        &self.edges
    }

    pub fn weight(&self) -> Weight {
        self.weight
    }

    pub fn contains(&self, v: VertexId) -> bool {
        self.vertices.binary_search(&v).is_ok()
    }

    /// Query labels carried by the tree's vertices.
    pub fn covered_mask(&self, index: &TerminalDistanceIndex) -> LabelMask {
        self.vertices
            .iter()
            .fold(LabelMask::EMPTY, |mask, &v| mask.union(index.vertex_mask(v)))
    }

    /// Vertex names, in vertex order.
    pub fn vertex_names<'g, G: GraphModel + ?Sized>(&self, graph: &'g G) -> Vec<&'g str> {
        self.vertices
            .iter()
            .map(|&v| graph.vertex_name(v))
            .collect()
    }

    /// True if the edges form one tree spanning exactly the vertex list.
    pub fn is_connected_tree(&self) -> bool {
        if self.vertices.is_empty() {
            return self.edges.is_empty();
        }
        if self.edges.len() + 1 != self.vertices.len() {
            return false;
        }
        let mut adjacency: HashMap<VertexId, Vec<VertexId>> = HashMap::new();
        for edge in &self.edges {
            if !self.contains(edge.from) || !self.contains(edge.to) {
                return false;
            }
            adjacency.entry(edge.from).or_default().push(edge.to);
            adjacency.entry(edge.to).or_default().push(edge.from);
        }
        let mut seen = HashSet::new();
        let mut stack = vec![self.vertices[0]];
        while let Some(v) = stack.pop() {
            if seen.insert(v) {
                if let Some(next) = adjacency.get(&v) {
                    stack.extend(next.iter().copied());
                }
            }
        }
        seen.len() == self.vertices.len()
    }

    /// Repeatedly removes leaves for which `keep` is false.
    ///
    /// The weight drops accordingly. A lone vertex is never removed.
    pub fn prune_unlabeled_leaves<F>(&mut self, keep: F)
    where
        F: Fn(VertexId) -> bool,
    {
        loop {
            let mut degree: HashMap<VertexId, usize> = HashMap::new();
            for edge in &self.edges {
                *degree.entry(edge.from).or_default() += 1;
                *degree.entry(edge.to).or_default() += 1;
            }
            let leaves: HashSet<VertexId> = degree
                .iter()
                .filter(|&(&v, &d)| d == 1 && !keep(v))
                .map(|(&v, _)| v)
                .collect();
            if leaves.is_empty() {
                break;
            }
            if leaves.len() == self.vertices.len() {
                // two unlabeled endpoints of a single edge: keep one
                let survivor = self.vertices[0];
                self.edges.clear();
                self.vertices = vec![survivor];
                break;
            }
            self.edges
                .retain(|e| !leaves.contains(&e.from) && !leaves.contains(&e.to));
            self.vertices.retain(|v| !leaves.contains(v));
        }
        self.weight = total_weight(&self.edges);
    }
}

/// Why a query cannot be answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InfeasibilityReason {
    /// No vertex carries these labels.
    MissingCarrier { labels: Vec<String> },
    /// Every label has a carrier, but no connected component has them all.
    DisconnectedTerminals,
}

impl std::fmt::Display for InfeasibilityReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InfeasibilityReason::MissingCarrier { labels } => {
                write!(f, "no vertex carries {}", labels.join(", "))
            }
            InfeasibilityReason::DisconnectedTerminals => {
                write!(f, "query labels lie in different components")
            }
        }
    }
}

/// Terminal status of a search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStatus {
    /// The reported tree is optimal.
    Solved,
    /// The frontier ran dry; the incumbent (if any) is optimal.
    Exhausted,
    /// Stopped by the budget or the cancel flag; the incumbent is the best seen so far.
    Cancelled,
    /// No tree covers the query.
    Infeasible(InfeasibilityReason),
}

/// Counters collected during one search.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchStats {
    pub iterations: u64,
    pub pushes: u64,
    pub stale_pops: u64,
    pub grows: u64,
    pub merges: u64,
    pub pruned_by_bound: u64,
    pub expansion_gated: u64,
    pub merge_gated: u64,
    pub best_updates: u64,
    pub states_discovered: usize,
    pub states_finalized: usize,
    pub elapsed_micros: u64,
}

/// Result of one search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    pub status: SearchStatus,
    /// Weight of the reported tree; infinite when there is none.
    pub weight: Weight,
    pub tree: Option<SteinerTree>,
    /// True if no cheaper tree exists.
    pub proven_optimal: bool,
    pub stats: SearchStats,
}

impl SearchOutcome {
    /// Outcome for a query with no labels.
    pub fn empty_query() -> Self {
        Self {
            status: SearchStatus::Solved,
            weight: 0.0,
            tree: Some(SteinerTree::default()),
            proven_optimal: true,
            stats: SearchStats::default(),
        }
    }

    pub fn infeasible(reason: InfeasibilityReason) -> Self {
        Self {
            status: SearchStatus::Infeasible(reason),
            weight: INFINITE_WEIGHT,
            tree: None,
            proven_optimal: true,
            stats: SearchStats::default(),
        }
    }

    /// True if a tree was found.
    pub fn is_feasible(&self) -> bool {
        self.weight.is_finite()
    }

    /// Weight as an option, `None` for the infinite sentinel.
    pub fn finite_weight(&self) -> Option<Weight> {
        self.is_feasible().then_some(self.weight)
    }

    /// JSON rendering; an infinite weight serializes as `null`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
