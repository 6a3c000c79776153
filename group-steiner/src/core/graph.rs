//! In-memory labeled graph for Group Steiner queries.
//!
//! The search engine only sees the [`GraphModel`] trait: adjacency with
//! non-negative weights plus a label set per vertex. [`LabeledGraph`] is the
//! default implementation, assembled once through [`LabeledGraphBuilder`] and
//! read-only afterwards, so it can be shared across concurrent queries.
//!
//! ```rust
//! use group_steiner::graph::LabeledGraph;
//!
//! let mut builder = LabeledGraph::builder();
//! builder.add_vertex("A", ["x"])?;
//! builder.add_vertex("B", Vec::<&str>::new())?;
//! builder.add_edge("A", "B", 1.0)?;
//! let graph = builder.build();
//! assert_eq!(graph.edge_count(), 1);
//! # Ok::<(), group_steiner::errors::SteinerError>(())
//! ```

use common::{is_valid_weight, GraphError, LabelId, VertexId, Weight};
use hashbrown::HashMap;

use crate::errors::SteinerResult;

/// Read-only view of a weighted, labeled, undirected graph.
pub trait GraphModel: Sync {
    /// Number of vertices; ids are dense in `0..vertex_count()`.
    fn vertex_count(&self) -> usize;

    /// Incident edges of `v` as (neighbor, weight ≥ 0).
    fn neighbors(&self, v: VertexId) -> &[(VertexId, Weight)];

    /// Labels carried by `v`.
    fn labels(&self, v: VertexId) -> &[LabelId];

    /// Resolves a label name.
    fn label_id(&self, name: &str) -> Option<LabelId>;

    /// Human-readable vertex name.
    fn vertex_name(&self, v: VertexId) -> &str;
}

/// Adjacency-list graph with interned vertex and label names.
#[derive(Debug, Clone, Default)]
pub struct LabeledGraph {
    vertex_names: Vec<String>,
    vertex_index: HashMap<String, VertexId>,
    adjacency: Vec<Vec<(VertexId, Weight)>>,
    vertex_labels: Vec<Vec<LabelId>>,
    label_names: Vec<String>,
    label_index: HashMap<String, LabelId>,
    edge_count: usize,
}

impl LabeledGraph {
    /// Starts an empty builder.
    pub fn builder() -> LabeledGraphBuilder {
        LabeledGraphBuilder::new()
    }

    /// Number of undirected edges (parallel edges counted separately).
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Number of distinct labels registered.
    pub fn label_count(&self) -> usize {
        self.label_names.len()
    }

    /// Looks a vertex up by name.
    pub fn vertex_id(&self, name: &str) -> Option<VertexId> {
        self.vertex_index.get(name).copied()
    }

    /// Name of a label id.
    pub fn label_name(&self, label: LabelId) -> Option<&str> {
        self.label_names.get(label.index()).map(String::as_str)
    }

    /// All registered label names, in id order.
    pub fn label_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.label_names.iter().map(String::as_str)
    }

    /// Vertices carrying `label`.
    pub fn carriers(&self, label: LabelId) -> impl Iterator<Item = VertexId> + '_ {
        self.vertex_labels
            .iter()
            .enumerate()
            .filter(move |(_, labels)| labels.binary_search(&label).is_ok())
            .map(|(i, _)| VertexId::new(i))
    }

    /// Lightest edge between `a` and `b`, if any.
    pub fn edge_weight(&self, a: VertexId, b: VertexId) -> Option<Weight> {
        self.adjacency
            .get(a.index())?
            .iter()
            .filter(|(n, _)| *n == b)
            .map(|(_, w)| *w)
            .fold(None, |acc: Option<Weight>, w| Some(acc.map_or(w, |a| a.min(w))))
    }

    /// Every undirected edge once, as (smaller id, larger id, weight).
    pub fn edges(&self) -> impl Iterator<Item = (VertexId, VertexId, Weight)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(i, adj)| {
            let from = VertexId::new(i);
            adj.iter()
                .filter(move |(to, _)| from < *to)
                .map(move |(to, w)| (from, *to, *w))
        })
    }

    /// Checks that `v` addresses a vertex of this graph.
    pub fn check_vertex(&self, v: VertexId) -> SteinerResult<()> {
        if v.index() < self.vertex_names.len() {
            Ok(())
        } else {
            Err(GraphError::VertexOutOfRange(v.index()).into())
        }
    }
}

impl GraphModel for LabeledGraph {
    fn vertex_count(&self) -> usize {
        self.vertex_names.len()
    }

    fn neighbors(&self, v: VertexId) -> &[(VertexId, Weight)] {
        &self.adjacency[v.index()]
    }

    fn labels(&self, v: VertexId) -> &[LabelId] {
        &self.vertex_labels[v.index()]
    }

    fn label_id(&self, name: &str) -> Option<LabelId> {
        self.label_index.get(name).copied()
    }

    fn vertex_name(&self, v: VertexId) -> &str {
        &self.vertex_names[v.index()]
    }
}

/// Builder for [`LabeledGraph`]; validates names and weights as they arrive.
#[derive(Debug, Default)]
pub struct LabeledGraphBuilder {
    graph: LabeledGraph,
}

impl LabeledGraphBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a vertex with its labels.
    pub fn add_vertex<I, S>(&mut self, name: &str, labels: I) -> SteinerResult<VertexId>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if self.graph.vertex_index.contains_key(name) {
            return Err(GraphError::DuplicateVertex(name.to_string()).into());
        }
        let id = VertexId::new(self.graph.vertex_names.len());
        self.graph.vertex_names.push(name.to_string());
        self.graph.vertex_index.insert(name.to_string(), id);
        self.graph.adjacency.push(Vec::new());
        self.graph.vertex_labels.push(Vec::new());
        for label in labels {
            self.attach_label(id, label.as_ref());
        }
        Ok(id)
    }

    /// Adds one more label to an existing vertex.
    pub fn add_label(&mut self, vertex: &str, label: &str) -> SteinerResult<()> {
        let id = self.resolve(vertex)?;
        self.attach_label(id, label);
        Ok(())
    }

    /// Adds an undirected edge between two named vertices.
    pub fn add_edge(&mut self, from: &str, to: &str, weight: Weight) -> SteinerResult<()> {
        let a = self.resolve(from)?;
        let b = self.resolve(to)?;
        self.add_edge_by_id(a, b, weight)
    }

    /// Adds an undirected edge between two vertex ids.
    pub fn add_edge_by_id(&mut self, a: VertexId, b: VertexId, weight: Weight) -> SteinerResult<()> {
        self.graph.check_vertex(a)?;
        self.graph.check_vertex(b)?;
        if !is_valid_weight(weight) {
            return Err(GraphError::InvalidWeight {
                from: self.graph.vertex_names[a.index()].clone(),
                to: self.graph.vertex_names[b.index()].clone(),
                weight,
            }
            .into());
        }
        if a == b {
            // a loop never belongs to a minimal tree
            log::trace!("ignoring self-loop on {}", self.graph.vertex_names[a.index()]);
            return Ok(());
        }
        self.graph.adjacency[a.index()].push((b, weight));
        self.graph.adjacency[b.index()].push((a, weight));
        self.graph.edge_count += 1;
        Ok(())
    }

    /// Number of vertices registered so far.
    pub fn vertex_count(&self) -> usize {
        self.graph.vertex_names.len()
    }

    /// Finishes construction.
    pub fn build(self) -> LabeledGraph {
        log::debug!(
            "built labeled graph: {} vertices, {} edges, {} labels",
            self.graph.vertex_names.len(),
            self.graph.edge_count,
            self.graph.label_names.len()
        );
        self.graph
    }

    fn resolve(&self, name: &str) -> SteinerResult<VertexId> {
        self.graph
            .vertex_index
            .get(name)
            .copied()
            .ok_or_else(|| GraphError::UnknownVertex(name.to_string()).into())
    }

    fn attach_label(&mut self, vertex: VertexId, label: &str) {
        let label_id = match self.graph.label_index.get(label) {
            Some(id) => *id,
            None => {
                let id = LabelId::new(self.graph.label_names.len());
                self.graph.label_names.push(label.to_string());
                self.graph.label_index.insert(label.to_string(), id);
                id
            }
        };
        let labels = &mut self.graph.vertex_labels[vertex.index()];
        if let Err(pos) = labels.binary_search(&label_id) {
            labels.insert(pos, label_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::SteinerError;

    fn triangle() -> LabeledGraph {
        let mut builder = LabeledGraph::builder();
        builder.add_vertex("A", ["x"]).unwrap();
        builder.add_vertex("B", Vec::<&str>::new()).unwrap();
        builder.add_vertex("C", ["y", "x"]).unwrap();
        builder.add_edge("A", "B", 1.0).unwrap();
        builder.add_edge("B", "C", 1.0).unwrap();
        builder.add_edge("A", "C", 3.0).unwrap();
        builder.build()
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        let graph = triangle();
        let a = graph.vertex_id("A").unwrap();
        let c = graph.vertex_id("C").unwrap();
        assert_eq!(graph.vertex_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.edge_weight(a, c), Some(3.0));
        assert_eq!(graph.edge_weight(c, a), Some(3.0));
        assert_eq!(graph.neighbors(a).len(), 2);
        assert_eq!(graph.edges().count(), 3);
    }

    #[test]
    fn test_labels_are_interned_and_sorted() {
        let graph = triangle();
        let x = graph.label_id("x").unwrap();
        let y = graph.label_id("y").unwrap();
        let c = graph.vertex_id("C").unwrap();
        assert_eq!(graph.labels(c), &[x, y]);
        assert_eq!(graph.carriers(x).count(), 2);
        assert_eq!(graph.label_name(y), Some("y"));
        assert_eq!(graph.label_id("z"), None);
    }

    #[test]
    fn test_rejects_bad_input() {
        let mut builder = LabeledGraph::builder();
        builder.add_vertex("A", ["x"]).unwrap();
        builder.add_vertex("B", ["y"]).unwrap();

        let err = builder.add_vertex("A", ["z"]).unwrap_err();
        assert!(matches!(err, SteinerError::Graph(GraphError::DuplicateVertex(_))));

        let err = builder.add_edge("A", "Q", 1.0).unwrap_err();
        assert!(matches!(err, SteinerError::Graph(GraphError::UnknownVertex(_))));

        for weight in [-1.0, f64::NAN, f64::INFINITY] {
            let err = builder.add_edge("A", "B", weight).unwrap_err();
            assert!(matches!(err, SteinerError::Graph(GraphError::InvalidWeight { .. })));
        }

        let err = builder.add_edge_by_id(VertexId::new(0), VertexId::new(9), 1.0).unwrap_err();
        assert!(matches!(err, SteinerError::Graph(GraphError::VertexOutOfRange(9))));
    }

    #[test]
    fn test_self_loops_are_dropped() {
        let mut builder = LabeledGraph::builder();
        builder.add_vertex("A", ["x"]).unwrap();
        builder.add_edge("A", "A", 2.0).unwrap();
        builder.add_label("A", "y").unwrap();
        let graph = builder.build();
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.labels(VertexId::new(0)).len(), 2);
    }
}
