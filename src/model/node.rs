//! Node in a partition graph.

use std::fmt;

use hashbrown::HashSet;
use serde::{Deserialize, Serialize};

use super::{Clique, Graph, Partition, UNDEFINED_DISTANCE};

/// Stable arena index of a node inside its `Graph`. Never reused after removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What a node carries. Distance and equality dispatch on the variant.
///
/// | Pair | Distance |
/// |------|----------|
/// | Partition / Partition | Chebyshev, undefined on length mismatch |
/// | Graph / Graph | clique exchange distance `max(|A \ B|, |B \ A|)` |
/// | anything else | undefined |
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Partition(Partition),
    /// Abstract labeled point with no metric; wire it with `Graph::connect`.
    Label(String),
    /// Nested graph, e.g. a clique in a graph of cliques.
    Graph(Box<Graph>),
}

impl Payload {
    /// Distance to another payload, or [`UNDEFINED_DISTANCE`] when the pair
    /// is incomparable.
    pub fn distance_to(&self, other: &Payload) -> i64 {
        match (self, other) {
            (Payload::Partition(a), Payload::Partition(b)) => a.distance_to(b),
            (Payload::Graph(a), Payload::Graph(b)) => a.exchange_distance(b),
            _ => UNDEFINED_DISTANCE,
        }
    }

    pub fn as_partition(&self) -> Option<&Partition> {
        match self {
            Payload::Partition(p) => Some(p),
            _ => None,
        }
    }

    pub fn as_graph(&self) -> Option<&Graph> {
        match self {
            Payload::Graph(g) => Some(g),
            _ => None,
        }
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Partition(p) => write!(f, "{p}"),
            Payload::Label(l) => write!(f, "{l}"),
            Payload::Graph(g) => write!(f, "{}", g.name()),
        }
    }
}

impl From<Partition> for Payload {
    fn from(p: Partition) -> Self {
        Payload::Partition(p)
    }
}

impl From<&str> for Payload {
    fn from(label: &str) -> Self {
        Payload::Label(label.to_string())
    }
}

impl From<String> for Payload {
    fn from(label: String) -> Self {
        Payload::Label(label)
    }
}

impl From<Graph> for Payload {
    fn from(g: Graph) -> Self {
        Payload::Graph(Box::new(g))
    }
}

impl From<Clique> for Payload {
    fn from(c: Clique) -> Self {
        Payload::Graph(Box::new(c.into_graph()))
    }
}

/// A payload plus its adjacency set.
///
/// Equality is payload equality; adjacency contents do not participate.
/// Adjacency is only ever written by the owning `Graph`, which updates both
/// endpoints together.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) payload: Payload,
    pub(crate) adjacent: HashSet<NodeId>,
}

impl Node {
    pub(crate) fn new(id: NodeId, payload: Payload) -> Self {
        Self { id, payload, adjacent: HashSet::new() }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn degree(&self) -> usize {
        self.adjacent.len()
    }

    pub fn is_connected_to(&self, other: NodeId) -> bool {
        self.adjacent.contains(&other)
    }

    /// Neighbour ids in ascending order.
    pub fn neighbors(&self) -> Vec<NodeId> {
        let mut ids: Vec<NodeId> = self.adjacent.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn distance_to(&self, other: &Node) -> i64 {
        self.payload.distance_to(&other.payload)
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.payload == other.payload
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ConnectionPolicy;

    #[test]
    fn test_payload_distance_dispatch() {
        let a = Payload::from(Partition::new([3, 1]));
        let b = Payload::from(Partition::new([2, 2]));
        assert_eq!(a.distance_to(&b), 1);

        let label = Payload::from("hub");
        assert_eq!(label.distance_to(&label), UNDEFINED_DISTANCE);
        assert_eq!(a.distance_to(&label), UNDEFINED_DISTANCE);

        let g = Payload::from(Graph::new("g", ConnectionPolicy::AtMost(1)));
        assert_eq!(a.distance_to(&g), UNDEFINED_DISTANCE);
    }

    #[test]
    fn test_node_equality_ignores_adjacency() {
        let mut a = Node::new(NodeId(0), Partition::new([2, 1]).into());
        let b = Node::new(NodeId(7), Partition::new([1, 2]).into());
        a.adjacent.insert(NodeId(3));
        assert_eq!(a, b);
        assert_eq!(a.degree(), 1);
        assert_eq!(b.degree(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Payload::from(Partition::new([1, 2])).to_string(), "[2, 1]");
        assert_eq!(Payload::from("x").to_string(), "x");
        assert_eq!(NodeId(4).to_string(), "4");
    }
}
