//! End-to-end pipeline: JSON config → graph → analysis → JSON report,
//! plus second-order graphs of cliques and cross-graph statistics.

use partition_graph::stats;
use partition_graph::{
    AnalysisConfig, CliqueFinder, ConnectionPolicy, Graph, GraphReport, Partition, Payload,
};
use pretty_assertions::assert_eq;
use std::collections::BTreeMap;

// ============================================================================
// Config → report
// ============================================================================

#[test]
fn test_report_from_json_config() {
    let config = AnalysisConfig::from_json_str(r#"{"n": 6, "m": 3, "policy": {"at_most": 1}}"#).unwrap();
    let graph = config.build_graph().unwrap();
    let report = GraphReport::analyze(&graph, &config);

    assert_eq!(report.nodes, 7);
    assert_eq!(report.edges, 9);
    assert_eq!(report.diameter, Some(4));
    assert_eq!(report.clique_count_by_size, BTreeMap::from([(3, 3)]));
    // 9 memberships over the 5 nodes that sit in a triangle
    assert!((report.global_overlapping - 1.8).abs() < 1e-12);
    assert!((report.density - 18.0 / 42.0).abs() < 1e-12);

    let mut out = Vec::new();
    report.write_json(&mut out).unwrap();
    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["cliques"][2]["label"], "C3-3");
    assert_eq!(value["policy"], "<= 1");
}

#[test]
fn test_report_from_literals() {
    let config = AnalysisConfig {
        partitions: vec!["[3, 3, 2, 2]".into(), "[3, 3, 3, 1]".into(), "[2, 2, 2, 2]".into()],
        ..Default::default()
    };
    let graph = config.build_graph().unwrap();
    let report = GraphReport::analyze(&graph, &config);
    assert_eq!(report.cliques.len(), 1);
    assert_eq!(report.global_clustering, 1.0);
    assert_eq!(report.density, 1.0);
}

#[test]
fn test_capped_analysis_is_reproducible() {
    let config = AnalysisConfig::from_json_str(
        r#"{"n": 12, "m": 4, "policy": {"at_most": 2}, "max_allowed_degree": 3, "seed": 5}"#,
    )
    .unwrap();
    let graph = config.build_graph().unwrap();
    let first = GraphReport::analyze(&graph, &config);
    let second = GraphReport::analyze(&graph, &config);
    assert_eq!(first.cliques, second.cliques);

    // every capped clique is still complete in the true graph
    for summary in &first.cliques {
        let ids: Vec<_> = summary
            .members
            .iter()
            .map(|label| graph.find(&label.parse::<Partition>().unwrap().into()).unwrap())
            .collect();
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                assert!(graph.is_connected(a, b));
            }
        }
    }
}

// ============================================================================
// Graph of cliques
// ============================================================================

#[test]
fn test_graph_of_cliques() {
    let config = AnalysisConfig { n: 6, m: 3, ..Default::default() };
    let graph = config.build_graph().unwrap();
    let cliques = CliqueFinder::default().find_max_cliques(&graph);

    // consecutive triangles share two members, the outer pair shares one
    let second_order = Graph::of_cliques("cliques", &cliques, ConnectionPolicy::AtMost(1), false);
    assert_eq!(second_order.len(), 3);
    assert_eq!(second_order.edge_count(), 2);

    let first: Payload = cliques[0].clone().into();
    let last: Payload = cliques[2].clone().into();
    assert_eq!(first.distance_to(&last), 2);

    let strict = Graph::of_cliques("strict", &cliques, ConnectionPolicy::Exactly(2), true);
    assert_eq!(strict.len(), 2);
    assert_eq!(strict.edge_count(), 1);
}

// ============================================================================
// Cross-graph statistics
// ============================================================================

#[test]
fn test_hamming_after_removal() {
    let config = AnalysisConfig { n: 6, m: 3, ..Default::default() };
    let full = config.build_graph().unwrap();
    let mut reduced = full.clone();
    reduced.remove_node(&Partition::unsorted([6, 0, 0]).into());

    // only the pair ([6, 0, 0], [5, 1, 0]) changed, out of 21
    assert!((stats::hamming_distance(&full, &reduced) - 1.0 / 21.0).abs() < 1e-12);
}

#[test]
fn test_payout_between_generated_sets() {
    let mut attack = Graph::new("attack", ConnectionPolicy::AtMost(0));
    let mut defence = Graph::new("defence", ConnectionPolicy::AtMost(0));
    attack.add_node(Partition::unsorted([4, 1, 1]));
    defence.add_node(Partition::unsorted([2, 2, 2]));
    defence.add_node(Partition::unsorted([3, 2, 1]));
    // vs [2, 2, 2]: win, loss, loss; vs [3, 2, 1]: win, loss, draw
    assert_eq!(stats::payout_matrix(&attack, &defence), vec![vec![-1, 0]]);

    let runs = [0.3, 0.5, 0.4];
    let intervals = stats::confidence_intervals(&runs, runs.len());
    assert!(intervals.windows(2).all(|w| w[0].1 < w[1].1));
}
