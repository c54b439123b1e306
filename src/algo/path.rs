//! Shortest-path metrics over unit-weight edges.
//!
//! Unreachable targets carry [`INFINITE_DISTANCE`]. The two averaged metrics
//! treat unreachable pairs differently on purpose:
//!
//! - `characteristic_path_length` counts them in the denominator with a
//!   contribution of 0;
//! - `average_efficiency` leaves them out of both numerator and denominator.
//!
//! Both consider only ordered pairs of distinct, non-isolated nodes and
//! return 0 when fewer than two such nodes exist.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::atomic::{AtomicU64, Ordering};

use hashbrown::HashMap;
use rayon::prelude::*;

use crate::model::{Graph, NodeId};

/// Distance to an unreachable node, and the diameter of an empty graph.
pub const INFINITE_DISTANCE: u64 = u64::MAX;

/// Stateless entry point for path metrics.
pub struct PathAnalyzer;

impl PathAnalyzer {
    /// Dijkstra from `source` with every edge weighing 1. Every live node
    /// appears in the result; an unknown source reaches nothing.
    pub fn shortest_distances(graph: &Graph, source: NodeId) -> HashMap<NodeId, u64> {
        let mut distances: HashMap<NodeId, u64> =
            graph.nodes().map(|n| (n.id(), INFINITE_DISTANCE)).collect();
        if !distances.contains_key(&source) {
            return distances;
        }

        let mut heap = BinaryHeap::new();
        distances.insert(source, 0);
        heap.push(Reverse((0u64, source)));

        while let Some(Reverse((dist, current))) = heap.pop() {
            if dist > distances[&current] {
                continue;
            }
            let Some(node) = graph.node(current) else { continue };
            for neighbor in node.neighbors() {
                let candidate = dist + 1;
                if let Some(best) = distances.get_mut(&neighbor) {
                    if candidate < *best {
                        *best = candidate;
                        heap.push(Reverse((candidate, neighbor)));
                    }
                }
            }
        }
        distances
    }

    /// Longest shortest distance from `source`; infinite if anything is unreachable.
    pub fn eccentricity(graph: &Graph, source: NodeId) -> u64 {
        Self::shortest_distances(graph, source)
            .values()
            .copied()
            .max()
            .unwrap_or(0)
    }

    /// Maximum eccentricity over all nodes, one rayon task per source.
    ///
    /// Infinite for an empty or disconnected graph, 0 for a single node.
    pub fn diameter(graph: &Graph) -> u64 {
        if graph.is_empty() {
            return INFINITE_DISTANCE;
        }
        let diameter = AtomicU64::new(0);
        graph.node_ids().into_par_iter().for_each(|source| {
            let eccentricity = Self::eccentricity(graph, source);
            diameter.fetch_max(eccentricity, Ordering::Relaxed);
        });
        let diameter = diameter.into_inner();
        tracing::debug!(graph = graph.name(), nodes = graph.len(), diameter, "diameter computed");
        diameter
    }

    /// Mean shortest distance over ordered pairs of distinct non-isolated
    /// nodes; unreachable pairs add 0 but still count.
    pub fn characteristic_path_length(graph: &Graph) -> f64 {
        let usable = non_isolated(graph);
        if usable.len() <= 1 {
            return 0.0;
        }
        let total: u64 = usable
            .par_iter()
            .map(|&source| {
                let distances = Self::shortest_distances(graph, source);
                usable
                    .iter()
                    .filter(|&&target| target != source)
                    .map(|target| distances[target])
                    .filter(|&d| d != INFINITE_DISTANCE)
                    .sum::<u64>()
            })
            .sum();
        let pairs = usable.len() * (usable.len() - 1);
        total as f64 / pairs as f64
    }

    /// Mean of `1 / distance` over reachable ordered pairs of distinct
    /// non-isolated nodes. Unreachable pairs are skipped entirely.
    pub fn average_efficiency(graph: &Graph) -> f64 {
        let usable = non_isolated(graph);
        if usable.len() <= 1 {
            return 0.0;
        }
        let (sum, count) = usable
            .par_iter()
            .map(|&source| {
                let distances = Self::shortest_distances(graph, source);
                usable
                    .iter()
                    .filter(|&&target| target != source)
                    .map(|target| distances[target])
                    .filter(|&d| d != INFINITE_DISTANCE)
                    .fold((0.0f64, 0usize), |(s, c), d| (s + 1.0 / d as f64, c + 1))
            })
            .reduce(|| (0.0, 0), |a, b| (a.0 + b.0, a.1 + b.1));
        if count == 0 {
            return 0.0;
        }
        sum / count as f64
    }
}

fn non_isolated(graph: &Graph) -> Vec<NodeId> {
    graph.nodes().filter(|n| n.degree() > 0).map(|n| n.id()).collect()
}

// ============================================================================
// Tests
// ============================================================================
