//! End-to-end searches on hand-built graphs.

mod fixtures;

use common::{GraphError, QueryError};
use fixtures::{all_configs, assert_valid_tree, init_logging, scenario_a, scenario_b};
use group_steiner::prelude::*;
use group_steiner::utils::graph_generator::GraphGenerator;

#[test]
fn test_scenario_a_takes_the_two_hop_path() {
    init_logging();
    let graph = scenario_a();

    for (name, config) in all_configs() {
        let engine = SearchEngine::new(&graph, config);
        let query = engine.query(["x", "y"]).unwrap();
        let outcome = engine.solve(&query).unwrap();

        assert_eq!(outcome.status, SearchStatus::Solved, "{}", name);
        assert_eq!(outcome.weight, 2.0, "{}", name);
        assert!(outcome.proven_optimal);
        assert_valid_tree(&graph, &query, &outcome);
        assert_eq!(outcome.tree.unwrap().vertex_names(&graph), vec!["A", "B", "C"]);
    }
}

#[test]
fn test_scenario_b_single_vertex_carries_everything() {
    init_logging();
    let graph = scenario_b();

    for (name, config) in all_configs() {
        let engine = SearchEngine::new(&graph, config);
        let query = engine.query(["x", "y"]).unwrap();
        let outcome = engine.solve(&query).unwrap();

        assert_eq!(outcome.weight, 0.0, "{}", name);
        let tree = outcome.tree.unwrap();
        assert_eq!(tree.vertex_names(&graph), vec!["v"]);
        assert!(tree.edges().is_empty());
    }
}

#[test]
fn test_star_routes_through_center() {
    init_logging();
    let graph = GraphGenerator::star_graph(5, 2.0).unwrap();

    for (name, config) in all_configs() {
        let engine = SearchEngine::new(&graph, config);
        let query = engine.query(["l0", "l1", "l2", "l3", "l4"]).unwrap();
        let outcome = engine.solve(&query).unwrap();
        assert_eq!(outcome.weight, 10.0, "{}", name);
        assert_valid_tree(&graph, &query, &outcome);
        assert!(outcome.tree.unwrap().contains(graph.vertex_id("center").unwrap()));
    }
}

#[test]
fn test_path_endpoints() {
    init_logging();
    let labels: [&[&str]; 6] = [&["x"], &[], &["z"], &[], &[], &["y"]];
    let graph = GraphGenerator::path_graph(6, &labels).unwrap();
    let engine = SearchEngine::new(&graph, SearchConfig::default());
    let query = engine.query(["x", "y", "z"]).unwrap();
    let outcome = engine.solve(&query).unwrap();
    assert_eq!(outcome.weight, 5.0);
    assert_valid_tree(&graph, &query, &outcome);
}

#[test]
fn test_nearest_carrier_wins() {
    // x is carried twice; the far copy must not be used
    let mut builder = LabeledGraph::builder();
    builder.add_vertex("x_far", ["x"]).unwrap();
    builder.add_vertex("hub", Vec::<&str>::new()).unwrap();
    builder.add_vertex("x_near", ["x"]).unwrap();
    builder.add_vertex("y", ["y"]).unwrap();
    builder.add_edge("x_far", "hub", 9.0).unwrap();
    builder.add_edge("hub", "y", 1.0).unwrap();
    builder.add_edge("x_near", "y", 4.0).unwrap();
    let graph = builder.build();

    let engine = SearchEngine::new(&graph, SearchConfig::default());
    let query = engine.query(["x", "y"]).unwrap();
    let outcome = engine.solve(&query).unwrap();
    assert_eq!(outcome.weight, 4.0);
    assert_eq!(outcome.tree.unwrap().vertex_names(&graph), vec!["x_near", "y"]);
}

#[test]
fn test_missing_label_is_infeasible() {
    init_logging();
    let graph = scenario_a();
    let engine = SearchEngine::new(&graph, SearchConfig::default());
    let query = engine.query(["x", "ghost"]).unwrap();
    let outcome = engine.solve(&query).unwrap();

    assert_eq!(
        outcome.status,
        SearchStatus::Infeasible(InfeasibilityReason::MissingCarrier { labels: vec!["ghost".to_string()] })
    );
    assert!(outcome.weight.is_infinite());
    assert!(outcome.tree.is_none());
}

#[test]
fn test_disconnected_labels_are_infeasible() {
    let mut builder = LabeledGraph::builder();
    builder.add_vertex("a", ["x"]).unwrap();
    builder.add_vertex("b", ["y"]).unwrap();
    builder.add_vertex("c", ["y"]).unwrap();
    builder.add_edge("b", "c", 1.0).unwrap();
    let graph = builder.build();

    for (name, config) in all_configs() {
        let engine = SearchEngine::new(&graph, config);
        let outcome = engine.solve(&engine.query(["x", "y"]).unwrap()).unwrap();
        assert_eq!(
            outcome.status,
            SearchStatus::Infeasible(InfeasibilityReason::DisconnectedTerminals),
            "{}",
            name
        );
        assert_eq!(outcome.finite_weight(), None);
    }
}

#[test]
fn test_empty_query_is_trivially_solved() {
    let graph = scenario_a();
    let engine = SearchEngine::new(&graph, SearchConfig::default());
    let outcome = engine.solve(&engine.query(Vec::<&str>::new()).unwrap()).unwrap();
    assert_eq!(outcome.status, SearchStatus::Solved);
    assert_eq!(outcome.weight, 0.0);
    assert!(outcome.tree.unwrap().vertices().is_empty());
}

#[test]
fn test_duplicate_query_labels_collapse() {
    let graph = scenario_a();
    let engine = SearchEngine::new(&graph, SearchConfig::default());
    let query = engine.query(["x", "y", "x"]).unwrap();
    assert_eq!(query.len(), 2);
    assert_eq!(engine.solve(&query).unwrap().weight, 2.0);
}

#[test]
fn test_too_many_labels_rejected() {
    let graph = scenario_a();
    let names: Vec<String> = (0..33).map(|i| format!("label{}", i)).collect();
    let err = Query::from_names(&graph, &names).unwrap_err();
    assert!(matches!(
        err,
        SteinerError::Query(QueryError::TooManyLabels { requested: 33, max: 32 })
    ));
}

#[test]
fn test_negative_weight_rejected() {
    let mut builder = LabeledGraph::builder();
    builder.add_vertex("a", ["x"]).unwrap();
    builder.add_vertex("b", ["y"]).unwrap();
    let err = builder.add_edge("a", "b", -1.0).unwrap_err();
    assert!(matches!(err, SteinerError::Graph(GraphError::InvalidWeight { .. })));
}

#[test]
fn test_outcome_serializes_to_json() {
    let graph = scenario_a();
    let engine = SearchEngine::new(&graph, SearchConfig::default());
    let outcome = engine.solve(&engine.query(["x", "y"]).unwrap()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&outcome.to_json().unwrap()).unwrap();

    assert_eq!(json["status"], "solved");
    assert_eq!(json["weight"], 2.0);
    assert_eq!(json["proven_optimal"], true);
    assert_eq!(json["tree"]["edges"].as_array().unwrap().len(), 2);
    assert!(json["stats"]["iterations"].as_u64().unwrap() >= 1);
}

#[test]
fn test_pruned_variants_do_less_work_on_star() {
    let graph = GraphGenerator::star_graph(6, 1.0).unwrap();
    let names: Vec<String> = (0..6).map(|i| format!("l{}", i)).collect();

    let basic = SearchEngine::new(&graph, SearchConfig::basic());
    let plus = SearchEngine::new(&graph, SearchConfig::pruned_plus_plus());
    let query = basic.query(&names).unwrap();

    let slow = basic.solve(&query).unwrap();
    let fast = plus.solve(&query).unwrap();
    assert_eq!(slow.weight, fast.weight);
    assert!(fast.stats.states_finalized <= slow.stats.states_finalized);
}
