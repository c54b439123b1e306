//! Plain-data export: hand a graph and its metrics to a reporting sink.
//!
//! Nothing here formats tables or draws pictures; it flattens the arena into
//! serializable records that a notebook, plotting tool or linear-algebra
//! routine can consume.
//!
//! ```text
//! Graph → snapshot() → GraphSnapshot → write_json() → any io::Write
//! Graph + AnalysisConfig → GraphReport::analyze() → serde
//! ```

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;

use crate::algo::{clustering, CliqueFinder, PathAnalyzer, INFINITE_DISTANCE};
use crate::config::AnalysisConfig;
use crate::model::{Clique, Graph};
use crate::stats;
use crate::Result;

/// One vertex of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotNode {
    pub id: u32,
    pub label: String,
    pub degree: usize,
}

/// Node list plus undirected edge list, each edge once with the lower id first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSnapshot {
    pub name: String,
    pub nodes: Vec<SnapshotNode>,
    pub edges: Vec<(u32, u32)>,
}

/// Flatten `graph` into a [`GraphSnapshot`].
pub fn snapshot(graph: &Graph) -> GraphSnapshot {
    let nodes = graph
        .nodes()
        .map(|node| SnapshotNode {
            id: node.id().0,
            label: node.payload().to_string(),
            degree: node.degree(),
        })
        .collect();
    let edges = graph.edges().into_iter().map(|(a, b)| (a.0, b.0)).collect();
    GraphSnapshot { name: graph.name().to_string(), nodes, edges }
}

/// Write the snapshot of `graph` as pretty-printed JSON.
pub fn write_json(graph: &Graph, writer: &mut dyn Write) -> Result<()> {
    let snap = snapshot(graph);
    serde_json::to_writer_pretty(&mut *writer, &snap)?;
    writeln!(writer)?;
    Ok(())
}

/// A clique as its label and member labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CliqueSummary {
    pub label: String,
    pub members: Vec<String>,
}

impl From<&Clique> for CliqueSummary {
    fn from(clique: &Clique) -> Self {
        Self {
            label: clique.label().to_string(),
            members: clique.members().map(|p| p.to_string()).collect(),
        }
    }
}

/// How many cliques contain one node, and that count over all cliques.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CliqueMembership {
    pub id: u32,
    pub label: String,
    pub cliques: usize,
    pub share: f64,
}

/// Exchange-distance histogram between two clique size groups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CliqueDistanceHistogram {
    pub sizes: (usize, usize),
    pub counts: BTreeMap<i64, usize>,
}

/// Every scalar metric and distribution for one graph.
///
/// `diameter` is `None` when the graph is empty or disconnected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphReport {
    pub name: String,
    pub policy: String,
    pub nodes: usize,
    pub edges: usize,
    pub density: f64,
    pub density_connected_only: f64,
    pub average_degree: f64,
    pub degree_variance: f64,
    pub degree_distribution: BTreeMap<usize, f64>,
    pub average_rank: f64,
    pub diameter: Option<u64>,
    pub characteristic_path_length: f64,
    pub average_efficiency: f64,
    pub average_local_clustering: f64,
    pub global_clustering: f64,
    pub clique_count_by_size: BTreeMap<usize, usize>,
    pub clique_size_distribution: BTreeMap<usize, f64>,
    pub global_overlapping: f64,
    pub clique_memberships: Vec<CliqueMembership>,
    pub clique_distances: Vec<CliqueDistanceHistogram>,
    pub cliques: Vec<CliqueSummary>,
}

impl GraphReport {
    /// Run the full analysis. Cliques come from the degree-capped dense
    /// enumeration when `config.max_allowed_degree` is set, seeded from
    /// `config.seed`; otherwise from the set enumeration.
    pub fn analyze(graph: &Graph, config: &AnalysisConfig) -> Self {
        let finder = CliqueFinder::new(config.clique_config());
        let cliques = match config.max_allowed_degree {
            Some(cap) => finder.find_max_cliques_capped(graph, cap, &mut config.rng()),
            None => finder.find_max_cliques(graph),
        };
        let diameter = PathAnalyzer::diameter(graph);

        let report = Self {
            name: graph.name().to_string(),
            policy: graph.policy().to_string(),
            nodes: graph.len(),
            edges: graph.edge_count(),
            density: graph.density(),
            density_connected_only: graph.density_connected_only(),
            average_degree: graph.average_degree(),
            degree_variance: graph.degree_variance(),
            degree_distribution: graph.degree_distribution(),
            average_rank: graph.average_rank(),
            diameter: (diameter != INFINITE_DISTANCE).then_some(diameter),
            characteristic_path_length: PathAnalyzer::characteristic_path_length(graph),
            average_efficiency: PathAnalyzer::average_efficiency(graph),
            average_local_clustering: clustering::average_local_coefficient(graph),
            global_clustering: clustering::global_coefficient(graph),
            clique_count_by_size: stats::clique_count_by_size(&cliques),
            clique_size_distribution: stats::clique_size_distribution(&cliques),
            global_overlapping: stats::global_overlapping(graph, &cliques),
            clique_memberships: stats::clique_memberships(graph, &cliques)
                .into_iter()
                .map(|(id, count, share)| CliqueMembership {
                    id: id.0,
                    label: graph.payload(id).map(|p| p.to_string()).unwrap_or_default(),
                    cliques: count,
                    share,
                })
                .collect(),
            clique_distances: stats::clique_distance_matrix(&cliques)
                .into_iter()
                .map(|(sizes, counts)| CliqueDistanceHistogram { sizes, counts })
                .collect(),
            cliques: cliques.iter().map(CliqueSummary::from).collect(),
        };
        tracing::info!(
            graph = %report.name,
            nodes = report.nodes,
            edges = report.edges,
            cliques = report.cliques.len(),
            "analysis finished"
        );
        report
    }

    pub fn write_json(&self, writer: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *writer, self)?;
        writeln!(writer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConnectionPolicy, Partition};
    use pretty_assertions::assert_eq;

    fn chain() -> Graph {
        let mut g = Graph::new("chain", ConnectionPolicy::AtMost(1));
        g.add_node(Partition::unsorted([4, 1, 1]));
        g.add_node(Partition::unsorted([3, 2, 1]));
        g.add_node(Partition::unsorted([2, 2, 2]));
        g
    }

    #[test]
    fn test_snapshot() {
        let snap = snapshot(&chain());
        assert_eq!(snap.name, "chain");
        assert_eq!(
            snap.nodes,
            vec![
                SnapshotNode { id: 0, label: "[4, 1, 1]".into(), degree: 1 },
                SnapshotNode { id: 1, label: "[3, 2, 1]".into(), degree: 2 },
                SnapshotNode { id: 2, label: "[2, 2, 2]".into(), degree: 1 },
            ]
        );
        assert_eq!(snap.edges, vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn test_write_json() {
        let mut buf = Vec::new();
        write_json(&chain(), &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["edges"], serde_json::json!([[0, 1], [1, 2]]));
        assert_eq!(value["nodes"][1]["label"], "[3, 2, 1]");
    }

    #[test]
    fn test_report_on_chain() {
        let config = AnalysisConfig { min_clique_size: 2, ..Default::default() };
        let report = GraphReport::analyze(&chain(), &config);
        assert_eq!(report.nodes, 3);
        assert_eq!(report.edges, 2);
        assert_eq!(report.diameter, Some(2));
        assert_eq!(report.clique_count_by_size, BTreeMap::from([(2, 2)]));
        assert_eq!(report.cliques[0].label, "C2-1");
        assert_eq!(report.global_clustering, 0.0);

        let mut buf = Vec::new();
        report.write_json(&mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value["diameter"], 2);
        assert_eq!(value["clique_distances"][0]["counts"]["1"], 2);
    }

    #[test]
    fn test_report_clique_memberships_and_distances() {
        let config = AnalysisConfig { min_clique_size: 2, ..Default::default() };
        let report = GraphReport::analyze(&chain(), &config);
        // [3, 2, 1] sits in both edges
        assert_eq!(
            report.clique_memberships[1],
            CliqueMembership { id: 1, label: "[3, 2, 1]".into(), cliques: 2, share: 1.0 }
        );
        assert_eq!(report.clique_memberships[0].share, 0.5);
        assert_eq!(
            report.clique_distances,
            vec![CliqueDistanceHistogram { sizes: (2, 2), counts: BTreeMap::from([(0, 2), (1, 2)]) }]
        );
    }

    #[test]
    fn test_report_on_empty_graph() {
        let empty = Graph::new("empty", ConnectionPolicy::AtMost(1));
        let report = GraphReport::analyze(&empty, &AnalysisConfig::default());
        assert_eq!(report.diameter, None);
        assert!(report.cliques.is_empty());
        assert_eq!(report.density, 0.0);
    }
}
