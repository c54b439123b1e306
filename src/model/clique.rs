//! Clique: a frozen, labeled maximal complete subgraph of a parent graph.

use std::fmt;

use super::{Graph, Payload};

/// A maximal clique snapshot, labeled `C<size>-<ordinal>`.
///
/// The inner graph is an independent copy: it shares no adjacency with the
/// graph it was found in and is never updated when that graph changes.
#[derive(Debug, Clone, PartialEq)]
pub struct Clique {
    graph: Graph,
}

impl Clique {
    pub(crate) fn new(size_ordinal: usize, mut graph: Graph) -> Self {
        graph.set_name(Self::label_for(graph.len(), size_ordinal));
        Self { graph }
    }

    /// Label for the `ordinal`-th (1-based) clique of a given size.
    pub fn label_for(size: usize, ordinal: usize) -> String {
        format!("C{size}-{ordinal}")
    }

    pub fn label(&self) -> &str {
        self.graph.name()
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn into_graph(self) -> Graph {
        self.graph
    }

    /// Member payloads in stable order.
    pub fn members(&self) -> impl Iterator<Item = &Payload> + '_ {
        self.graph.nodes().map(|n| n.payload())
    }

    pub fn contains(&self, payload: &Payload) -> bool {
        self.graph.contains(payload)
    }
}

impl fmt::Display for Clique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.graph)
    }
}
