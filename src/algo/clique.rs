//! Maximal clique enumeration (Bron–Kerbosch).
//!
//! Two variants share one recursion:
//!
//! | Variant | Membership test | Use |
//! |---------|-----------------|-----|
//! | set | `Graph::is_connected` (hash set lookup) | small graphs |
//! | dense | precomputed bit matrix over dense indices | hundreds of nodes and up |
//!
//! The dense variant can also thin the graph before enumerating: each true
//! edge is dropped with probability `1 - min(1, cap / degree)`, driven by a
//! caller-supplied `Rng` so runs are reproducible.
//!
//! Branching is exponential in the worst case either way; the matrix only
//! removes lookup overhead.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::{Clique, Graph, NodeId};

/// Enumeration options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliqueConfig {
    /// Cliques smaller than this are discarded.
    pub min_size: usize,
    /// Also report isolated nodes as singletons and degree-1 nodes paired
    /// with their neighbour, regardless of `min_size`.
    pub include_hanging: bool,
}

impl Default for CliqueConfig {
    fn default() -> Self {
        Self { min_size: 3, include_hanging: false }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CliqueFinder {
    config: CliqueConfig,
}

impl CliqueFinder {
    pub fn new(config: CliqueConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> CliqueConfig {
        self.config
    }

    /// Set-based enumeration straight off the graph's adjacency sets.
    pub fn find_max_cliques(&self, graph: &Graph) -> Vec<Clique> {
        let mut raw = Vec::new();
        bron_kerbosch(
            &|a: NodeId, b: NodeId| graph.is_connected(a, b),
            &mut Vec::new(),
            graph.node_ids(),
            Vec::new(),
            &mut raw,
        );
        tracing::debug!(graph = graph.name(), nodes = graph.len(), found = raw.len(), "set clique enumeration");
        self.finish(graph, raw)
    }

    /// Dense-matrix enumeration.
    pub fn find_max_cliques_dense(&self, graph: &Graph) -> Vec<Clique> {
        let matrix = DenseAdjacency::from_graph(graph);
        self.run_dense(graph, &matrix)
    }

    /// Dense-matrix enumeration over a randomly thinned copy of the edges.
    /// For each edge `(a, b)` with `a` earlier in node order, the edge is
    /// kept with probability `min(1, max_allowed_degree / degree(a))`.
    /// The returned cliques carry the graph's true edges among their members.
    pub fn find_max_cliques_capped<R: Rng>(
        &self,
        graph: &Graph,
        max_allowed_degree: usize,
        rng: &mut R,
    ) -> Vec<Clique> {
        let matrix = DenseAdjacency::capped(graph, max_allowed_degree, rng);
        self.run_dense(graph, &matrix)
    }

    fn run_dense(&self, graph: &Graph, matrix: &DenseAdjacency) -> Vec<Clique> {
        let mut raw = Vec::new();
        bron_kerbosch(
            &|a: usize, b: usize| matrix.connected(a, b),
            &mut Vec::new(),
            (0..matrix.ids.len()).collect(),
            Vec::new(),
            &mut raw,
        );
        tracing::debug!(graph = graph.name(), nodes = graph.len(), found = raw.len(), "dense clique enumeration");
        let raw = raw
            .into_iter()
            .map(|members| members.into_iter().map(|i| matrix.ids[i]).collect())
            .collect();
        self.finish(graph, raw)
    }

    /// Filter by size, add hanging cliques if asked, order deterministically
    /// and freeze each member set into a labeled `Clique`.
    fn finish(&self, graph: &Graph, raw: Vec<Vec<NodeId>>) -> Vec<Clique> {
        let mut sets: Vec<Vec<NodeId>> = raw
            .into_iter()
            .filter(|members| members.len() >= self.config.min_size)
            .collect();

        if self.config.include_hanging {
            for node in graph.nodes() {
                match node.neighbors().as_slice() {
                    [] => sets.push(vec![node.id()]),
                    [only] => sets.push(vec![node.id(), *only]),
                    _ => {}
                }
            }
        }

        for members in &mut sets {
            members.sort_unstable();
        }
        sets.sort_unstable_by(|a, b| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));
        sets.dedup();

        let mut cliques = Vec::with_capacity(sets.len());
        let mut ordinal = 0;
        let mut current_size = 0;
        for members in sets {
            if members.len() != current_size {
                current_size = members.len();
                ordinal = 0;
            }
            ordinal += 1;
            cliques.push(Clique::new(ordinal, graph.induced("", &members)));
        }
        cliques
    }
}

/// Bron–Kerbosch without pivoting.
///
/// Stops branching as soon as some already-processed node is adjacent to
/// every remaining candidate: nothing reachable from here can be maximal.
fn bron_kerbosch<T, C>(connected: &C, r: &mut Vec<T>, mut p: Vec<T>, mut x: Vec<T>, out: &mut Vec<Vec<T>>)
where
    T: Copy + PartialEq,
    C: Fn(T, T) -> bool,
{
    if x.iter().any(|&found| p.iter().all(|&c| connected(found, c))) {
        return;
    }

    let snapshot = p.clone();
    for v in snapshot {
        r.push(v);
        p.retain(|&c| c != v);

        let new_p: Vec<T> = p.iter().copied().filter(|&c| connected(v, c)).collect();
        let new_x: Vec<T> = x.iter().copied().filter(|&c| connected(v, c)).collect();

        if new_p.is_empty() && new_x.is_empty() {
            out.push(r.clone());
        } else {
            bron_kerbosch(connected, r, new_p, new_x, out);
        }

        r.pop();
        x.push(v);
    }
}

/// Symmetric bit matrix over dense indices `0..n`, with `ids[i]` the
/// graph node behind index `i`. Row `i` occupies `stride` `u64` words.
struct DenseAdjacency {
    ids: Vec<NodeId>,
    stride: usize,
    words: Vec<u64>,
}

impl DenseAdjacency {
    fn from_graph(graph: &Graph) -> Self {
        Self::build(graph, |_, _| true)
    }

    fn capped<R: Rng>(graph: &Graph, max_allowed_degree: usize, rng: &mut R) -> Self {
        let mut dropped = 0usize;
        let matrix = Self::build(graph, |first, _| {
            let degree = graph.degree(first);
            if degree <= max_allowed_degree {
                return true;
            }
            let keep = rng.gen_range(1..=degree) <= max_allowed_degree;
            if !keep {
                dropped += 1;
            }
            keep
        });
        tracing::debug!(
            graph = graph.name(),
            max_allowed_degree,
            dropped,
            kept = matrix.edge_count(),
            "edges dropped by degree cap"
        );
        matrix
    }

    /// `keep(a, b)` is asked once per true edge, `a` before `b` in node order.
    fn build(graph: &Graph, mut keep: impl FnMut(NodeId, NodeId) -> bool) -> Self {
        let ids = graph.node_ids();
        let n = ids.len();
        let stride = n.div_ceil(64);
        let mut matrix = Self { ids, stride, words: vec![0; n * stride] };
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (matrix.ids[i], matrix.ids[j]);
                if graph.is_connected(a, b) && keep(a, b) {
                    matrix.set(i, j);
                    matrix.set(j, i);
                }
            }
        }
        matrix
    }

    fn set(&mut self, a: usize, b: usize) {
        self.words[a * self.stride + b / 64] |= 1 << (b % 64);
    }

    fn connected(&self, a: usize, b: usize) -> bool {
        self.words[a * self.stride + b / 64] >> (b % 64) & 1 == 1
    }

    fn edge_count(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum::<usize>() / 2
    }
}

// ============================================================================
// Tests
// ============================================================================
