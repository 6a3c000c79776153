//! Test fixtures for search tests
//!
//! This module provides shared test infrastructure:
//! - Logging setup for test binaries
//! - The hand-built scenario graphs
//! - Seeded random instances
//! - A brute-force oracle over vertex subsets for small graphs

#![allow(dead_code)]

use common::{VertexId, Weight, INFINITE_WEIGHT};
use group_steiner::algorithms::{kruskal_mst, total_weight, TreeEdge};
use group_steiner::config::SearchConfig;
use group_steiner::graph::{GraphModel, LabeledGraph};
use group_steiner::query::{LabelMask, Query};
use group_steiner::search::outcome::SearchOutcome;
use group_steiner::utils::graph_generator::{GraphGenerator, RandomGraphSpec};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Largest graph the brute-force oracle accepts.
pub const BRUTE_FORCE_MAX_VERTICES: usize = 10;

/// Routes `log` output through the test harness.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Every preset plus the threshold-free variant of the default.
pub fn all_configs() -> Vec<(&'static str, SearchConfig)> {
    vec![
        ("basic", SearchConfig::basic()),
        ("pruned", SearchConfig::pruned()),
        ("pruned++", SearchConfig::pruned_plus_plus()),
        ("pruned++ no thresholds", SearchConfig::pruned_plus_plus().without_thresholds()),
        ("pruned++ loose bounds", SearchConfig { tight_lower_bounds: false, ..SearchConfig::pruned_plus_plus() }),
    ]
}

/// A -1- B -1- C with a direct A -3- C; A carries x, C carries y.
pub fn scenario_a() -> LabeledGraph {
    let mut builder = LabeledGraph::builder();
    builder.add_vertex("A", ["x"]).unwrap();
    builder.add_vertex("B", Vec::<&str>::new()).unwrap();
    builder.add_vertex("C", ["y"]).unwrap();
    builder.add_edge("A", "B", 1.0).unwrap();
    builder.add_edge("B", "C", 1.0).unwrap();
    builder.add_edge("A", "C", 3.0).unwrap();
    builder.build()
}

/// One vertex carrying both x and y.
pub fn scenario_b() -> LabeledGraph {
    let mut builder = LabeledGraph::builder();
    builder.add_vertex("v", ["x", "y"]).unwrap();
    builder.build()
}

/// Seeded Erdős–Rényi instance with a query of up to `k` labels.
pub fn random_instance(seed: u64, vertices: usize, edge_probability: f64, pool: usize, k: usize) -> (LabeledGraph, Query) {
    let mut rng = StdRng::seed_from_u64(seed);
    let spec = RandomGraphSpec::new(vertices, edge_probability).with_label_pool(pool);
    let graph = GraphGenerator::random_labeled(&spec, &mut rng).unwrap();
    let query = GraphGenerator::random_query(&graph, k, &mut rng).unwrap();
    (graph, query)
}

fn induced_mst(graph: &LabeledGraph, members: u32) -> Option<Weight> {
    let inside = |v: VertexId| members & (1 << v.index()) != 0;
    let edges: Vec<TreeEdge> = graph
        .edges()
        .filter(|&(a, b, _)| inside(a) && inside(b))
        .map(|(a, b, w)| TreeEdge::new(a, b, w))
        .collect();
    let tree = kruskal_mst(edges);
    (tree.len() + 1 == members.count_ones() as usize).then(|| total_weight(&tree))
}

/// Minimum weight of a tree containing `root` (if given) and covering `mask`.
///
/// Every vertex subset is tried; the MST of a connected induced subgraph is
/// the cheapest tree on exactly those vertices.
pub fn brute_force_rooted(graph: &LabeledGraph, query: &Query, mask: LabelMask, root: Option<VertexId>) -> Weight {
    let n = graph.vertex_count();
    assert!(n <= BRUTE_FORCE_MAX_VERTICES, "brute force limited to {} vertices", BRUTE_FORCE_MAX_VERTICES);
    if mask.is_empty() && root.is_none() {
        return 0.0;
    }

    let masks: Vec<LabelMask> = (0..n).map(|i| query.vertex_mask(graph, VertexId::new(i))).collect();
    let mut best = INFINITE_WEIGHT;
    for members in 1u32..(1 << n) {
        if let Some(r) = root {
            if members & (1 << r.index()) == 0 {
                continue;
            }
        }
        let covered = (0..n)
            .filter(|i| members & (1 << i) != 0)
            .fold(LabelMask::EMPTY, |acc, i| acc.union(masks[i]));
        if !mask.is_subset_of(covered) {
            continue;
        }
        if let Some(weight) = induced_mst(graph, members) {
            best = best.min(weight);
        }
    }
    best
}

/// Optimal Group Steiner tree weight by exhaustive search.
pub fn brute_force(graph: &LabeledGraph, query: &Query) -> Weight {
    brute_force_rooted(graph, query, query.full_mask(), None)
}

/// Checks that the reported tree is a tree of the graph, covers the query
/// and weighs what the outcome says.
pub fn assert_valid_tree(graph: &LabeledGraph, query: &Query, outcome: &SearchOutcome) {
    let tree = outcome.tree.as_ref().expect("feasible outcome carries a tree");
    assert!(tree.is_connected_tree(), "not a tree: {:?}", tree);
    for edge in tree.edges() {
        assert_eq!(graph.edge_weight(edge.from, edge.to), Some(edge.weight), "edge {:?} not in graph", edge);
    }
    let covered = tree
        .vertices()
        .iter()
        .fold(LabelMask::EMPTY, |acc, &v| acc.union(query.vertex_mask(graph, v)));
    assert_eq!(covered, query.full_mask(), "tree misses labels");
    assert_eq!(tree.weight(), outcome.weight);
}
