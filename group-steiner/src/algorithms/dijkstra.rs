//! Dijkstra's shortest path algorithm over a [`GraphModel`].
//!
//! The multi-source form seeds every source at distance zero, which is the
//! same as running from a synthetic hub joined to all sources by zero-weight
//! edges, without ever materializing the hub.
//!
//! # Example
//! ```ignore
//! let carriers: Vec<VertexId> = graph.carriers(label).collect();
//! let forest = multi_source_dijkstra(&graph, carriers);
//! let d = forest.distance(v); // distance from v to the nearest carrier
//! ```

use std::collections::BinaryHeap;

use common::{VertexId, Weight, INFINITE_WEIGHT};
use fixedbitset::FixedBitSet;

use crate::algorithms::algo::TreeEdge;
use crate::core::graph::GraphModel;
use crate::scored::MinScored;

/// Result of a (multi-source) Dijkstra run.
#[derive(Debug, Clone)]
pub struct ShortestPathForest {
    dist: Vec<Weight>,
    /// Next hop towards the nearest source, with the edge weight.
    parent: Vec<Option<(VertexId, Weight)>>,
}

impl ShortestPathForest {
    /// Distance from `v` to the nearest source; infinite if unreachable.
    pub fn distance(&self, v: VertexId) -> Weight {
        self.dist.get(v.index()).copied().unwrap_or(INFINITE_WEIGHT)
    }

    /// Edges of the shortest path from `v` to its nearest source.
    ///
    /// Returns `None` if `v` is unreachable; an empty path if `v` is a source.
    pub fn path_from(&self, v: VertexId) -> Option<Vec<TreeEdge>> {
        if self.distance(v).is_infinite() {
            return None;
        }
        let mut path = Vec::new();
        let mut current = v;
        while let Some((next, weight)) = self.parent[current.index()] {
            path.push(TreeEdge::new(current, next, weight));
            current = next;
        }
        Some(path)
    }
}

/// Dijkstra from every vertex in `sources` at once.
pub fn multi_source_dijkstra<G, I>(graph: &G, sources: I) -> ShortestPathForest
where
    G: GraphModel + ?Sized,
    I: IntoIterator<Item = VertexId>,
{
    run(graph, sources, None)
}

/// Single-source Dijkstra that stops once `goal` is settled.
///
/// Returns the distance to `goal` (infinite if unreachable).
pub fn dijkstra<G>(graph: &G, start: VertexId, goal: VertexId) -> Weight
where
    G: GraphModel + ?Sized,
{
    run(graph, [start], Some(goal)).distance(goal)
}

fn run<G, I>(graph: &G, sources: I, goal: Option<VertexId>) -> ShortestPathForest
where
    G: GraphModel + ?Sized,
    I: IntoIterator<Item = VertexId>,
{
    let n = graph.vertex_count();
    let mut dist = vec![INFINITE_WEIGHT; n];
    let mut parent = vec![None; n];
    let mut settled = FixedBitSet::with_capacity(n);
    let mut visit_next = BinaryHeap::new();

    for source in sources {
        if source.index() < n && dist[source.index()] > 0.0 {
            dist[source.index()] = 0.0;
            visit_next.push(MinScored(0.0, source));
        }
    }

    while let Some(MinScored(node_score, node)) = visit_next.pop() {
        if settled.put(node.index()) {
            continue;
        }
        if goal == Some(node) {
            break;
        }

        for &(target, weight) in graph.neighbors(node) {
            if settled.contains(target.index()) {
                continue;
            }
            let next_score = node_score + weight;
            if next_score < dist[target.index()] {
                dist[target.index()] = next_score;
                parent[target.index()] = Some((node, weight));
                visit_next.push(MinScored(next_score, target));
            }
        }
    }

    ShortestPathForest { dist, parent }
}
