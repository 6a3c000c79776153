//! Kruskal's minimum spanning forest over an explicit edge list.

use common::VertexId;
use hashbrown::HashMap;
use petgraph::unionfind::UnionFind;

use crate::algorithms::algo::TreeEdge;

/// Kruskal's MST on the subgraph formed by `edges`.
///
/// Parallel edges collapse to the lightest one. Ties are broken by endpoint
/// ids so the result is deterministic. If the edges do not form a connected
/// subgraph the result is a spanning forest.
pub fn kruskal_mst<I>(edges: I) -> Vec<TreeEdge>
where
    I: IntoIterator<Item = TreeEdge>,
{
    let mut edges: Vec<TreeEdge> = edges.into_iter().filter(|e| e.from != e.to).collect();
    edges.sort_by(|e1, e2| {
        e1.weight
            .total_cmp(&e2.weight)
            .then_with(|| e1.endpoints().cmp(&e2.endpoints()))
    });

    let mut local: HashMap<VertexId, usize> = HashMap::new();
    for edge in &edges {
        let next = local.len();
        local.entry(edge.from).or_insert(next);
        let next = local.len();
        local.entry(edge.to).or_insert(next);
    }

    let mut components = UnionFind::<usize>::new(local.len());
    let mut mst = Vec::with_capacity(local.len().saturating_sub(1));
    for edge in edges {
        if components.union(local[&edge.from], local[&edge.to]) {
            mst.push(edge);
        }
    }
    mst
}
