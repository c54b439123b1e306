//! Clustering coefficients.

use std::sync::atomic::{AtomicU64, Ordering};

use rayon::prelude::*;

use crate::model::Graph;

/// Mean local clustering coefficient over all nodes.
///
/// A node's coefficient is the fraction of its neighbour pairs that are
/// themselves connected; nodes with fewer than two neighbours contribute 0.
pub fn average_local_coefficient(graph: &Graph) -> f64 {
    if graph.is_empty() {
        return 0.0;
    }
    let total: f64 = graph
        .node_ids()
        .into_par_iter()
        .map(|id| {
            let neighbors = graph.node(id).map(|n| n.neighbors()).unwrap_or_default();
            let mut possible = 0usize;
            let mut actual = 0usize;
            for (i, &u) in neighbors.iter().enumerate() {
                for &w in &neighbors[i + 1..] {
                    possible += 1;
                    if graph.is_connected(u, w) {
                        actual += 1;
                    }
                }
            }
            if possible == 0 { 0.0 } else { actual as f64 / possible as f64 }
        })
        .sum();
    total / graph.len() as f64
}

/// Global (transitivity) coefficient: `3 * triangles / connected triples`.
///
/// Scans every `(i, j, k)` with `i < j < k` over the adjacency matrix; the
/// outer index is split across rayon tasks, counts land in atomics.
/// Returns 0 when the graph has no connected triple.
pub fn global_coefficient(graph: &Graph) -> f64 {
    let adj = graph.adjacency_matrix();
    let n = adj.len();
    let triangles = AtomicU64::new(0);
    let triples = AtomicU64::new(0);

    (0..n).into_par_iter().for_each(|i| {
        let mut local_triangles = 0u64;
        let mut local_triples = 0u64;
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                let ij = adj[i][j] == 1;
                let ik = adj[i][k] == 1;
                let jk = adj[j][k] == 1;
                if ij && ik && jk {
                    local_triangles += 1;
                }
                // paths of length two centred on i, j and k
                local_triples += u64::from(ij && ik) + u64::from(ij && jk) + u64::from(ik && jk);
            }
        }
        triangles.fetch_add(local_triangles, Ordering::Relaxed);
        triples.fetch_add(local_triples, Ordering::Relaxed);
    });

    let triangles = triangles.into_inner();
    let triples = triples.into_inner();
    tracing::debug!(graph = graph.name(), triangles, triples, "triangle census");
    if triples == 0 {
        return 0.0;
    }
    3.0 * triangles as f64 / triples as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConnectionPolicy, NodeId};

    fn labeled(n: usize, edges: &[(usize, usize)]) -> Graph {
        let mut g = Graph::new("t", ConnectionPolicy::AtMost(0));
        let ids: Vec<NodeId> = (0..n).map(|i| g.insert(format!("n{i}")).0).collect();
        for &(a, b) in edges {
            g.connect(ids[a], ids[b]).unwrap();
        }
        g
    }

    #[test]
    fn test_triangle_is_fully_clustered() {
        let g = labeled(3, &[(0, 1), (1, 2), (0, 2)]);
        assert_eq!(average_local_coefficient(&g), 1.0);
        assert_eq!(global_coefficient(&g), 1.0);
    }

    #[test]
    fn test_star_has_no_clustering() {
        let g = labeled(4, &[(0, 1), (0, 2), (0, 3)]);
        assert_eq!(average_local_coefficient(&g), 0.0);
        assert_eq!(global_coefficient(&g), 0.0);
    }

    #[test]
    fn test_triangle_with_tail() {
        // triangle 0-1-2 plus edge 2-3
        let g = labeled(4, &[(0, 1), (1, 2), (0, 2), (2, 3)]);
        // locals: 1, 1, 1/3, 0
        assert!((average_local_coefficient(&g) - (7.0 / 3.0) / 4.0).abs() < 1e-12);
        // one triangle, triples: 3 inside the triangle + 2 through node 2 and 3
        assert!((global_coefficient(&g) - 3.0 / 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty() {
        let g = Graph::new("e", ConnectionPolicy::AtMost(1));
        assert_eq!(average_local_coefficient(&g), 0.0);
        assert_eq!(global_coefficient(&g), 0.0);
    }
}
