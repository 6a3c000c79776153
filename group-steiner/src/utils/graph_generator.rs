//! Graph generation utilities for testing and benchmarking.
//!
//! Generates labeled graphs and queries. Every generator takes the random
//! source explicitly, so a seeded `StdRng` reproduces an instance exactly.

use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::graph::LabeledGraph;
use crate::core::query::Query;
use crate::errors::SteinerResult;

/// Parameters of an Erdős–Rényi labeled graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomGraphSpec {
    /// Number of vertices, named `v0`, `v1`, ...
    pub vertices: usize,
    /// Probability that a given pair of vertices is joined.
    pub edge_probability: f64,
    /// Labels drawn from this pool.
    pub label_pool: Vec<String>,
    /// Each vertex carries between 1 and this many labels.
    pub max_labels_per_vertex: usize,
    /// Edge weights are integers in `1..=max_weight`.
    pub max_weight: u32,
}

impl Default for RandomGraphSpec {
    fn default() -> Self {
        Self {
            vertices: 20,
            edge_probability: 0.3,
            label_pool: (b'a'..=b't').map(|c| (c as char).to_string()).collect(),
            max_labels_per_vertex: 2,
            max_weight: 10,
        }
    }
}

impl RandomGraphSpec {
    pub fn new(vertices: usize, edge_probability: f64) -> Self {
        Self {
            vertices,
            edge_probability,
            ..Self::default()
        }
    }

    /// Same spec with a label pool of `size` single-letter-ish names.
    pub fn with_label_pool(mut self, size: usize) -> Self {
        self.label_pool = (0..size).map(label_name).collect();
        self
    }
}

fn label_name(i: usize) -> String {
    if i < 26 {
        ((b'a' + i as u8) as char).to_string()
    } else {
        format!("l{}", i)
    }
}

/// Graph generator for testing and benchmarking.
pub struct GraphGenerator;

impl GraphGenerator {
    /// Generates a random labeled graph.
    pub fn random_labeled<R: Rng + ?Sized>(spec: &RandomGraphSpec, rng: &mut R) -> SteinerResult<LabeledGraph> {
        let mut builder = LabeledGraph::builder();
        let pool = &spec.label_pool;

        for i in 0..spec.vertices {
            let labels: Vec<&str> = if pool.is_empty() {
                Vec::new()
            } else {
                let count = rng.random_range(1..=spec.max_labels_per_vertex.clamp(1, pool.len()));
                index::sample(rng, pool.len(), count)
                    .iter()
                    .map(|j| pool[j].as_str())
                    .collect()
            };
            builder.add_vertex(&format!("v{}", i), labels)?;
        }

        let max_weight = spec.max_weight.max(1);
        for i in 0..spec.vertices {
            for j in (i + 1)..spec.vertices {
                if rng.random::<f64>() < spec.edge_probability {
                    let weight = rng.random_range(1..=max_weight);
                    builder.add_edge(&format!("v{}", i), &format!("v{}", j), f64::from(weight))?;
                }
            }
        }

        let graph = builder.build();
        log::debug!(
            "generated graph: {} vertices, {} edges, {} labels",
            spec.vertices,
            graph.edge_count(),
            graph.label_count()
        );
        Ok(graph)
    }

    /// Samples up to `k` distinct labels that occur in `graph`.
    pub fn random_query<R: Rng + ?Sized>(graph: &LabeledGraph, k: usize, rng: &mut R) -> SteinerResult<Query> {
        let mut names: Vec<&str> = graph.label_names().collect();
        names.sort_unstable();
        let amount = k.min(names.len());
        let mut picked: Vec<&str> = index::sample(rng, names.len(), amount)
            .iter()
            .map(|i| names[i])
            .collect();
        picked.sort_unstable();
        Query::from_names(graph, picked)
    }

    /// Generates a path `v0 - v1 - ... - v{n-1}` with unit weights.
    ///
    /// `labels[i]` is attached to `v{i}` when present.
    pub fn path_graph(n: usize, labels: &[&[&str]]) -> SteinerResult<LabeledGraph> {
        let mut builder = LabeledGraph::builder();
        for i in 0..n {
            let carried = labels.get(i).copied().unwrap_or(&[]);
            builder.add_vertex(&format!("v{}", i), carried.iter().copied())?;
            if i > 0 {
                builder.add_edge(&format!("v{}", i - 1), &format!("v{}", i), 1.0)?;
            }
        }
        Ok(builder.build())
    }

    /// Generates a star: unlabeled `center` joined to leaves `leaf{i}` carrying label `l{i}`.
    pub fn star_graph(leaves: usize, weight: f64) -> SteinerResult<LabeledGraph> {
        let mut builder = LabeledGraph::builder();
        builder.add_vertex("center", Vec::<&str>::new())?;
        for i in 0..leaves {
            let leaf = format!("leaf{}", i);
            builder.add_vertex(&leaf, [format!("l{}", i)])?;
            builder.add_edge("center", &leaf, weight)?;
        }
        Ok(builder.build())
    }
}
