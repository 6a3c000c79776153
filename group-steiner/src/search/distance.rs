//! Per-label distance tables (the terminal distance index).
//!
//! For every query label one multi-source Dijkstra runs from all carriers of
//! that label, giving `dist(v, p)` for every vertex and a shortest path back
//! to the nearest carrier. Columns are independent and may be computed on
//! scoped worker threads. The finished index is immutable and `Sync`, so one
//! index can serve repeated or concurrent searches over the same query.

use common::{VertexId, Weight, INFINITE_WEIGHT};

use crate::algorithms::algo::TreeEdge;
use crate::algorithms::dijkstra::{dijkstra, multi_source_dijkstra, ShortestPathForest};
use crate::config::DEFAULT_PARALLEL_LABEL_THRESHOLD;
use crate::core::graph::GraphModel;
use crate::core::query::{LabelMask, Query};
use crate::errors::{SteinerError, SteinerResult};
use crate::search::outcome::InfeasibilityReason;

/// Distance from every vertex to the nearest carrier of every query label.
#[derive(Debug, Clone)]
pub struct TerminalDistanceIndex {
    label_names: Vec<String>,
    columns: Vec<ShortestPathForest>,
    carrier_counts: Vec<usize>,
    /// Row-major `k × k` table of D(p, q): the closest pair of carriers.
    label_distance: Vec<Weight>,
    vertex_masks: Vec<LabelMask>,
    full: LabelMask,
}

impl TerminalDistanceIndex {
    /// Builds the index for `query` over `graph`.
    pub fn build<G>(graph: &G, query: &Query, parallel: bool) -> SteinerResult<Self>
    where
        G: GraphModel + ?Sized,
    {
        let k = query.len();
        let n = graph.vertex_count();

        let vertex_masks: Vec<LabelMask> =
            (0..n).map(|i| query.vertex_mask(graph, VertexId::new(i))).collect();

        let mut sources: Vec<Vec<VertexId>> = vec![Vec::new(); k];
        for (i, mask) in vertex_masks.iter().enumerate() {
            for bit in mask.iter() {
                sources[bit].push(VertexId::new(i));
            }
        }
        let carrier_counts: Vec<usize> = sources.iter().map(Vec::len).collect();

        let columns = if parallel && k >= DEFAULT_PARALLEL_LABEL_THRESHOLD {
            Self::columns_parallel(graph, &sources)?
        } else {
            sources
                .iter()
                .map(|carriers| multi_source_dijkstra(graph, carriers.iter().copied()))
                .collect()
        };

        let mut label_distance = vec![INFINITE_WEIGHT; k * k];
        for p in 0..k {
            for q in 0..k {
                label_distance[p * k + q] = sources[p]
                    .iter()
                    .map(|&a| columns[q].distance(a))
                    .fold(INFINITE_WEIGHT, Weight::min);
            }
        }

        log::debug!(
            "terminal distance index: {} labels over {} vertices (carriers: {:?})",
            k,
            n,
            carrier_counts
        );

        Ok(Self {
            label_names: query.labels().iter().map(|l| l.name.clone()).collect(),
            columns,
            carrier_counts,
            label_distance,
            vertex_masks,
            full: query.full_mask(),
        })
    }

    fn columns_parallel<G>(graph: &G, sources: &[Vec<VertexId>]) -> SteinerResult<Vec<ShortestPathForest>>
    where
        G: GraphModel + ?Sized,
    {
        crossbeam::thread::scope(|scope| {
            let handles: Vec<_> = sources
                .iter()
                .map(|carriers| {
                    scope.spawn(move |_| multi_source_dijkstra(graph, carriers.iter().copied()))
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join())
                .collect::<Result<Vec<_>, _>>()
        })
        .map_err(|_| SteinerError::Concurrency("distance index scope panicked".to_string()))?
        .map_err(|_| SteinerError::Concurrency("distance index worker panicked".to_string()))
    }

    /// Number of query labels.
    pub fn label_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of graph vertices covered by the tables.
    pub fn vertex_count(&self) -> usize {
        self.vertex_masks.len()
    }

    /// Mask of all query labels.
    pub fn full_mask(&self) -> LabelMask {
        self.full
    }

    /// Name of query label `bit`.
    pub fn label_name(&self, bit: usize) -> Option<&str> {
        self.label_names.get(bit).map(String::as_str)
    }

    /// dist(v, p): distance from `v` to the nearest carrier of label `bit`.
    #[inline]
    pub fn dist(&self, v: VertexId, bit: usize) -> Weight {
        self.columns
            .get(bit)
            .map_or(INFINITE_WEIGHT, |column| column.distance(v))
    }

    /// D(p, q): shortest distance between any carrier of `p` and any carrier of `q`.
    #[inline]
    pub fn label_distance(&self, p: usize, q: usize) -> Weight {
        let k = self.columns.len();
        if p >= k || q >= k {
            return INFINITE_WEIGHT;
        }
        self.label_distance[p * k + q]
    }

    /// Query labels carried by `v`.
    #[inline]
    pub fn vertex_mask(&self, v: VertexId) -> LabelMask {
        self.vertex_masks.get(v.index()).copied().unwrap_or(LabelMask::EMPTY)
    }

    /// Number of vertices carrying label `bit`.
    pub fn carrier_count(&self, bit: usize) -> usize {
        self.carrier_counts.get(bit).copied().unwrap_or(0)
    }

    /// Shortest path from `v` to the nearest carrier of label `bit`.
    pub fn path_to_label(&self, v: VertexId, bit: usize) -> Option<Vec<TreeEdge>> {
        self.columns.get(bit)?.path_from(v)
    }

    /// True if every query label is reachable from `v`.
    pub fn reaches_all(&self, v: VertexId) -> bool {
        (0..self.columns.len()).all(|bit| self.dist(v, bit).is_finite())
    }

    /// Bits of the labels no vertex carries.
    pub fn missing_labels(&self) -> Vec<usize> {
        (0..self.carrier_counts.len())
            .filter(|&bit| self.carrier_counts[bit] == 0)
            .collect()
    }

    /// Why no tree can cover the query, if that is the case.
    pub fn infeasibility(&self) -> Option<InfeasibilityReason> {
        let missing = self.missing_labels();
        if !missing.is_empty() {
            return Some(InfeasibilityReason::MissingCarrier {
                labels: missing
                    .into_iter()
                    .map(|bit| self.label_names[bit].clone())
                    .collect(),
            });
        }
        if self.label_count() > 0
            && !(0..self.vertex_count()).any(|i| self.reaches_all(VertexId::new(i)))
        {
            return Some(InfeasibilityReason::DisconnectedTerminals);
        }
        None
    }

    /// Vertex-to-vertex shortest distance, computed on demand.
    pub fn vertex_distance<G>(graph: &G, a: VertexId, b: VertexId) -> Weight
    where
        G: GraphModel + ?Sized,
    {
        dijkstra(graph, a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::graph::LabeledGraph;

    // A(x) -1- B -1- C(y) -5- D(z)     E(w) isolated
    fn sample() -> LabeledGraph {
        let mut builder = LabeledGraph::builder();
        builder.add_vertex("A", ["x"]).unwrap();
        builder.add_vertex("B", Vec::<&str>::new()).unwrap();
        builder.add_vertex("C", ["y"]).unwrap();
        builder.add_vertex("D", ["z"]).unwrap();
        builder.add_vertex("E", ["w"]).unwrap();
        builder.add_edge("A", "B", 1.0).unwrap();
        builder.add_edge("B", "C", 1.0).unwrap();
        builder.add_edge("C", "D", 5.0).unwrap();
        builder.build()
    }

    #[test]
    fn test_distances_and_paths() {
        let graph = sample();
        let query = Query::from_names(&graph, ["x", "y", "z"]).unwrap();
        let index = TerminalDistanceIndex::build(&graph, &query, false).unwrap();
        let b = graph.vertex_id("B").unwrap();

        assert_eq!(index.label_count(), 3);
        assert_eq!(index.dist(b, 0), 1.0);
        assert_eq!(index.dist(b, 1), 1.0);
        assert_eq!(index.dist(b, 2), 6.0);
        assert_eq!(index.label_distance(0, 1), 2.0);
        assert_eq!(index.label_distance(1, 0), 2.0);
        assert_eq!(index.label_distance(0, 2), 7.0);
        assert_eq!(index.label_distance(1, 1), 0.0);
        assert_eq!(index.path_to_label(b, 2).unwrap().len(), 2);
        assert!(index.infeasibility().is_none());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let graph = sample();
        let query = Query::from_names(&graph, ["x", "y", "z", "w"]).unwrap();
        let seq = TerminalDistanceIndex::build(&graph, &query, false).unwrap();
        let par = TerminalDistanceIndex::build(&graph, &query, true).unwrap();
        for v in 0..graph.vertex_count() {
            for bit in 0..4 {
                let v = VertexId::new(v);
                assert_eq!(seq.dist(v, bit).to_bits(), par.dist(v, bit).to_bits());
            }
        }
    }

    #[test]
    fn test_missing_carrier() {
        let graph = sample();
        let query = Query::from_names(&graph, ["x", "nowhere"]).unwrap();
        let index = TerminalDistanceIndex::build(&graph, &query, false).unwrap();
        assert_eq!(index.missing_labels(), vec![1]);
        assert!(index.dist(VertexId::new(0), 1).is_infinite());
        assert_eq!(
            index.infeasibility(),
            Some(InfeasibilityReason::MissingCarrier { labels: vec!["nowhere".to_string()] })
        );
    }

    #[test]
    fn test_disconnected_terminals() {
        let graph = sample();
        let query = Query::from_names(&graph, ["x", "w"]).unwrap();
        let index = TerminalDistanceIndex::build(&graph, &query, false).unwrap();
        assert!(index.label_distance(0, 1).is_infinite());
        assert_eq!(index.infeasibility(), Some(InfeasibilityReason::DisconnectedTerminals));
    }

    #[test]
    fn test_vertex_distance_on_demand() {
        let graph = sample();
        let a = graph.vertex_id("A").unwrap();
        let d = graph.vertex_id("D").unwrap();
        assert_eq!(TerminalDistanceIndex::vertex_distance(&graph, a, d), 7.0);
    }
}
