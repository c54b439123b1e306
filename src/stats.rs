//! Summary statistics over graphs, clique sets and repeated runs.
//!
//! Everything here returns plain data (`BTreeMap`s, scalars) for an external
//! reporting layer to format.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use crate::model::{Clique, Graph, NodeId, Payload};

/// Sample mean and standard deviation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AverageAndStdDev {
    pub average: f64,
    pub std_dev: f64,
}

impl AverageAndStdDev {
    /// Mean of `values` and their sample (n - 1) standard deviation.
    /// Both are 0 for an empty slice; the deviation is 0 for a single value.
    pub fn of(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let n = values.len() as f64;
        let average = values.iter().sum::<f64>() / n;
        let std_dev = if values.len() > 1 {
            (values.iter().map(|v| (v - average).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
        } else {
            0.0
        };
        Self { average, std_dev }
    }
}

impl fmt::Display for AverageAndStdDev {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}({:.4})", self.average, self.std_dev)
    }
}

/// Per-key mean and deviation across several runs' maps.
pub fn merge(runs: &[BTreeMap<usize, f64>]) -> BTreeMap<usize, AverageAndStdDev> {
    let mut by_key: BTreeMap<usize, Vec<f64>> = BTreeMap::new();
    for run in runs {
        for (&key, &value) in run {
            by_key.entry(key).or_default().push(value);
        }
    }
    by_key
        .into_iter()
        .map(|(key, values)| (key, AverageAndStdDev::of(&values)))
        .collect()
}

/// clique size → number of cliques of that size.
pub fn clique_count_by_size(cliques: &[Clique]) -> BTreeMap<usize, usize> {
    let mut counts = BTreeMap::new();
    for clique in cliques {
        *counts.entry(clique.len()).or_insert(0) += 1;
    }
    counts
}

/// clique size → fraction of all cliques with that size.
pub fn clique_size_distribution(cliques: &[Clique]) -> BTreeMap<usize, f64> {
    let total = cliques.len() as f64;
    clique_count_by_size(cliques)
        .into_iter()
        .map(|(size, count)| (size, count as f64 / total))
        .collect()
}

/// Average number of cliques a covered node belongs to: the sum of clique
/// sizes over the number of distinct graph nodes the cliques touch.
pub fn global_overlapping(graph: &Graph, cliques: &[Clique]) -> f64 {
    let covered = graph
        .nodes()
        .filter(|n| cliques.iter().any(|c| c.contains(n.payload())))
        .count();
    if covered == 0 {
        return 0.0;
    }
    let memberships: usize = cliques
        .iter()
        .map(|c| c.members().filter(|p| graph.contains(p)).count())
        .sum();
    memberships as f64 / covered as f64
}

/// Per graph node, in stable order: how many cliques contain it, and that
/// count as a share of all cliques (0 when there are none).
pub fn clique_memberships(graph: &Graph, cliques: &[Clique]) -> Vec<(NodeId, usize, f64)> {
    let total = cliques.len();
    graph
        .nodes()
        .map(|node| {
            let count = cliques.iter().filter(|c| c.contains(node.payload())).count();
            let share = if total == 0 { 0.0 } else { count as f64 / total as f64 };
            (node.id(), count, share)
        })
        .collect()
}

/// Exchange distances between cliques, grouped by size.
///
/// Keyed by `(smaller size, larger size)` over every pair of size groups
/// present, including a group with itself; the value is distance → number of
/// clique pairs at that distance. Pairs are ordered, so a same-size group
/// counts each clique against itself (distance 0) and each unordered pair twice.
pub fn clique_distance_matrix(cliques: &[Clique]) -> BTreeMap<(usize, usize), BTreeMap<i64, usize>> {
    let mut by_size: BTreeMap<usize, Vec<&Clique>> = BTreeMap::new();
    for clique in cliques {
        by_size.entry(clique.len()).or_default().push(clique);
    }

    let groups: Vec<(usize, Vec<&Clique>)> = by_size.into_iter().collect();
    let mut matrix = BTreeMap::new();
    for (i, (size, smaller)) in groups.iter().enumerate() {
        for (next_size, larger) in &groups[i..] {
            let mut histogram: BTreeMap<i64, usize> = BTreeMap::new();
            for a in larger {
                for b in smaller {
                    *histogram.entry(a.graph().exchange_distance(b.graph())).or_insert(0) += 1;
                }
            }
            matrix.insert((*size, *next_size), histogram);
        }
    }
    matrix
}

/// Fraction of unordered payload pairs, over the union of both graphs'
/// payloads, whose connectivity differs between the graphs. A payload missing
/// from a graph counts as unconnected there. 0 for fewer than two payloads.
pub fn hamming_distance(a: &Graph, b: &Graph) -> f64 {
    let mut union: Vec<&Payload> = a.nodes().map(|n| n.payload()).collect();
    for node in b.nodes() {
        if !a.contains(node.payload()) {
            union.push(node.payload());
        }
    }
    let n = union.len();
    if n < 2 {
        return 0.0;
    }

    let ids_a: Vec<_> = union.iter().map(|p| a.find(p)).collect();
    let ids_b: Vec<_> = union.iter().map(|p| b.find(p)).collect();
    let connected = |ids: &[Option<NodeId>], g: &Graph, i: usize, j: usize| match (ids[i], ids[j]) {
        (Some(x), Some(y)) => g.is_connected(x, y),
        _ => false,
    };

    let mut differing = 0usize;
    for i in 0..n {
        for j in (i + 1)..n {
            if connected(&ids_a, a, i, j) != connected(&ids_b, b, i, j) {
                differing += 1;
            }
        }
    }
    differing as f64 / (n * (n - 1) / 2) as f64
}

/// Blotto payout of every partition node of `a` (rows) against every
/// partition node of `b` (columns): 1 win, 0 draw, -1 loss. Non-partition
/// payloads are skipped.
pub fn payout_matrix(a: &Graph, b: &Graph) -> Vec<Vec<i8>> {
    let columns: Vec<_> = b.nodes().filter_map(|n| n.payload().as_partition()).collect();
    a.nodes()
        .filter_map(|n| n.payload().as_partition())
        .map(|row| {
            columns
                .iter()
                .map(|col| match row.duel(col) {
                    Ordering::Greater => 1,
                    Ordering::Equal => 0,
                    Ordering::Less => -1,
                })
                .collect()
        })
        .collect()
}

/// Two-sided z-scores for the confidence levels reported per run series.
pub const CONFIDENCE_LEVELS: [(f64, f64); 7] = [
    (80.0, 1.282),
    (85.0, 1.440),
    (90.0, 1.645),
    (95.0, 1.960),
    (99.0, 2.576),
    (99.5, 2.807),
    (99.9, 3.291),
];

/// Confidence level → half-width of the interval around the mean of
/// `measurements`, assuming `runs` independent runs.
pub fn confidence_intervals(measurements: &[f64], runs: usize) -> Vec<(f64, f64)> {
    let summary = AverageAndStdDev::of(measurements);
    let root = (runs.max(1) as f64).sqrt();
    CONFIDENCE_LEVELS
        .iter()
        .map(|&(level, z)| (level, z * summary.std_dev / root))
        .collect()
}

/// Distinct payloads covered by at least one clique.
pub fn covered_payloads(cliques: &[Clique]) -> HashSet<String> {
    cliques
        .iter()
        .flat_map(|c| c.members().map(|p| p.to_string()))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
