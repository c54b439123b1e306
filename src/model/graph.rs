//! Graph: a de-duplicated node arena wired by a connection policy.
//!
//! Nodes are stored in slots addressed by [`NodeId`]. Inserting a node
//! evaluates its distance to every existing node and connects each pair the
//! policy admits; removing a node scrubs it from every remaining adjacency set.
//!
//! ## Invariants
//!
//! - Adjacency is symmetric: `a ∈ adj(b)` iff `b ∈ adj(a)`.
//! - No adjacency set names a removed or unknown node, and there are no self loops.
//! - No two live nodes carry equal payloads.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::{Clique, Node, NodeId, Payload};
use crate::{Error, Result};

// ============================================================================
// ConnectionPolicy
// ============================================================================

/// Which distances produce an edge.
///
/// Negative (undefined) distances never connect, whatever the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionPolicy {
    /// `distance <= d`
    AtMost(u64),
    /// `distance == d`
    Exactly(u64),
    /// `min <= distance <= max`
    Between { min: u64, max: u64 },
}

impl ConnectionPolicy {
    pub fn admits(&self, distance: i64) -> bool {
        let Ok(d) = u64::try_from(distance) else {
            return false;
        };
        match *self {
            ConnectionPolicy::AtMost(max) => d <= max,
            ConnectionPolicy::Exactly(exact) => d == exact,
            ConnectionPolicy::Between { min, max } => (min..=max).contains(&d),
        }
    }
}

impl fmt::Display for ConnectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionPolicy::AtMost(d) => write!(f, "<= {d}"),
            ConnectionPolicy::Exactly(d) => write!(f, "== {d}"),
            ConnectionPolicy::Between { min, max } => write!(f, "in [{min}, {max}]"),
        }
    }
}

// ============================================================================
// Graph
// ============================================================================

#[derive(Debug, Clone)]
pub struct Graph {
    name: String,
    policy: ConnectionPolicy,
    slots: Vec<Option<Node>>,
    len: usize,
}

impl Graph {
    pub fn new(name: impl Into<String>, policy: ConnectionPolicy) -> Self {
        Self {
            name: name.into(),
            policy,
            slots: Vec::new(),
            len: 0,
        }
    }

    /// Second-order graph whose nodes are the given cliques.
    ///
    /// Cliques are compared with the exchange distance (see
    /// [`exchange_distance`](Self::exchange_distance)). With `only_connected`,
    /// cliques left without any neighbour are dropped.
    pub fn of_cliques(
        name: impl Into<String>,
        cliques: &[Clique],
        policy: ConnectionPolicy,
        only_connected: bool,
    ) -> Self {
        let mut graph = Self::new(name, policy);
        for clique in cliques {
            graph.add_node(clique.clone());
        }
        if only_connected {
            graph.remove_isolated();
        }
        graph
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn policy(&self) -> ConnectionPolicy {
        self.policy
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Insert a payload, wiring it to every existing node the policy admits.
    /// Returns `false` (and changes nothing) if an equal payload is present.
    pub fn add_node(&mut self, payload: impl Into<Payload>) -> bool {
        self.insert(payload).1
    }

    /// Like [`add_node`](Self::add_node) but also returns the node's id,
    /// which is the existing id when the payload was already present.
    pub fn insert(&mut self, payload: impl Into<Payload>) -> (NodeId, bool) {
        let payload = payload.into();
        if let Some(existing) = self.find(&payload) {
            return (existing, false);
        }

        let id = NodeId(self.slots.len() as u32);
        let neighbors: Vec<NodeId> = self
            .nodes()
            .filter(|node| self.policy.admits(node.payload.distance_to(&payload)))
            .map(|node| node.id)
            .collect();

        self.slots.push(Some(Node::new(id, payload)));
        self.len += 1;
        for other in &neighbors {
            self.link(id, *other);
        }

        tracing::trace!(graph = %self.name, node = %id, degree = neighbors.len(), "node added");
        (id, true)
    }

    /// Remove the node carrying an equal payload. Returns whether one was removed.
    pub fn remove_node(&mut self, payload: &Payload) -> bool {
        match self.find(payload) {
            Some(id) => self.remove(id).is_some(),
            None => false,
        }
    }

    /// Remove a node by id and scrub it from every neighbour's adjacency.
    pub fn remove(&mut self, id: NodeId) -> Option<Payload> {
        let node = self.slots.get_mut(id.index())?.take()?;
        for other in &node.adjacent {
            if let Some(Some(neighbor)) = self.slots.get_mut(other.index()) {
                neighbor.adjacent.remove(&id);
            }
        }
        self.len -= 1;
        tracing::trace!(graph = %self.name, node = %id, "node removed");
        Some(node.payload)
    }

    /// Remove `old` (if present) then insert `new`, re-evaluating every edge.
    /// Returns whether `new` was added.
    pub fn replace_node(&mut self, old: &Payload, new: impl Into<Payload>) -> bool {
        self.remove_node(old);
        self.add_node(new)
    }

    /// Explicitly wire two nodes, bypassing the policy. Used for payloads
    /// without a metric. Returns `false` if they were already connected.
    pub fn connect(&mut self, a: NodeId, b: NodeId) -> Result<bool> {
        if a == b {
            return Err(Error::InvalidArgument(format!("cannot connect node {a} to itself")));
        }
        for id in [a, b] {
            if self.node(id).is_none() {
                return Err(Error::NotFound(format!("Node {id} in graph {}", self.name)));
            }
        }
        if self.is_connected(a, b) {
            return Ok(false);
        }
        self.link(a, b);
        Ok(true)
    }

    /// Drop every degree-0 node. Returns how many were removed.
    pub fn remove_isolated(&mut self) -> usize {
        let isolated: Vec<NodeId> = self
            .nodes()
            .filter(|n| n.degree() == 0)
            .map(|n| n.id)
            .collect();
        for id in &isolated {
            self.remove(*id);
        }
        isolated.len()
    }

    /// The single place adjacency is written: both endpoints together.
    fn link(&mut self, a: NodeId, b: NodeId) {
        if let Some(Some(node)) = self.slots.get_mut(a.index()) {
            node.adjacent.insert(b);
        }
        if let Some(Some(node)) = self.slots.get_mut(b.index()) {
            node.adjacent.insert(a);
        }
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    pub fn find(&self, payload: &Payload) -> Option<NodeId> {
        self.nodes().find(|n| &n.payload == payload).map(|n| n.id)
    }

    pub fn contains(&self, payload: &Payload) -> bool {
        self.find(payload).is_some()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub fn payload(&self, id: NodeId) -> Option<&Payload> {
        self.node(id).map(|n| &n.payload)
    }

    /// Live nodes in stable (insertion) order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Live node ids in stable order; the row/column order of
    /// [`adjacency_matrix`](Self::adjacency_matrix).
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes().map(|n| n.id).collect()
    }

    pub fn is_connected(&self, a: NodeId, b: NodeId) -> bool {
        self.node(a).is_some_and(|n| n.is_connected_to(b))
    }

    /// Degree of a node, 0 if unknown.
    pub fn degree(&self, id: NodeId) -> usize {
        self.node(id).map_or(0, Node::degree)
    }

    /// Every undirected edge once, as `(low, high)` in ascending order.
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        let mut edges: Vec<(NodeId, NodeId)> = self
            .nodes()
            .flat_map(|n| n.adjacent.iter().filter(move |&&o| o > n.id).map(move |&o| (n.id, o)))
            .collect();
        edges.sort_unstable();
        edges
    }

    // ========================================================================
    // Degree statistics
    // ========================================================================

    /// Degree sequence in stable node order.
    pub fn degrees(&self) -> Vec<usize> {
        self.nodes().map(Node::degree).collect()
    }

    pub fn sum_of_degrees(&self) -> usize {
        self.nodes().map(Node::degree).sum()
    }

    pub fn edge_count(&self) -> usize {
        self.sum_of_degrees() / 2
    }

    pub fn average_degree(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        self.sum_of_degrees() as f64 / self.len as f64
    }

    /// Sample variance of the degree sequence; 0 when size <= 1.
    pub fn degree_variance(&self) -> f64 {
        if self.len <= 1 {
            return 0.0;
        }
        let avg = self.average_degree();
        let s2: f64 = self.nodes().map(|n| (n.degree() as f64 - avg).powi(2)).sum();
        s2 / (self.len - 1) as f64
    }

    /// degree → number of nodes with that degree.
    pub fn degree_count(&self) -> BTreeMap<usize, usize> {
        let mut counts = BTreeMap::new();
        for node in self.nodes() {
            *counts.entry(node.degree()).or_insert(0) += 1;
        }
        counts
    }

    /// degree → fraction of nodes with that degree.
    pub fn degree_distribution(&self) -> BTreeMap<usize, f64> {
        let size = self.len as f64;
        self.degree_count()
            .into_iter()
            .map(|(degree, count)| (degree, count as f64 / size))
            .collect()
    }

    /// `sum_of_degrees / (size * (size - 1))`, 0 when size <= 1.
    pub fn density(&self) -> f64 {
        density(self.sum_of_degrees(), self.len)
    }

    /// Density restricted to nodes with at least one neighbour.
    pub fn density_connected_only(&self) -> f64 {
        let connected = self.nodes().filter(|n| n.degree() > 0).count();
        density(self.sum_of_degrees(), connected)
    }

    /// Mean Durfee rank over partition payloads; 0 if there are none.
    pub fn average_rank(&self) -> f64 {
        let ranks: Vec<usize> = self
            .nodes()
            .filter_map(|n| n.payload.as_partition())
            .map(|p| p.rank())
            .collect();
        if ranks.is_empty() {
            return 0.0;
        }
        ranks.iter().sum::<usize>() as f64 / ranks.len() as f64
    }

    // ========================================================================
    // Matrices (linear-algebra boundary)
    // ========================================================================

    /// Dense 0/1 adjacency matrix over [`node_ids`](Self::node_ids) order.
    pub fn adjacency_matrix(&self) -> Vec<Vec<u8>> {
        let ids = self.node_ids();
        ids.iter()
            .map(|&a| ids.iter().map(|&b| u8::from(self.is_connected(a, b))).collect())
            .collect()
    }

    /// Diagonal of the degree matrix, aligned with
    /// [`adjacency_matrix`](Self::adjacency_matrix).
    pub fn degree_matrix(&self) -> Vec<usize> {
        self.degrees()
    }

    // ========================================================================
    // Derived graphs
    // ========================================================================

    /// Frozen copy of the subgraph induced by `members`. The copy owns its own
    /// adjacency and keeps this graph's policy. Unknown ids are skipped.
    pub fn induced(&self, name: impl Into<String>, members: &[NodeId]) -> Graph {
        let mut sub = Graph::new(name, self.policy);
        let mut mapping = Vec::with_capacity(members.len());
        for &id in members {
            let Some(node) = self.node(id) else { continue };
            let new_id = NodeId(sub.slots.len() as u32);
            sub.slots.push(Some(Node::new(new_id, node.payload.clone())));
            sub.len += 1;
            mapping.push((id, new_id));
        }
        for (i, &(old_a, new_a)) in mapping.iter().enumerate() {
            for &(old_b, new_b) in &mapping[i + 1..] {
                if self.is_connected(old_a, old_b) {
                    sub.link(new_a, new_b);
                }
            }
        }
        sub
    }

    /// `max(|A \ B|, |B \ A|)` over member payloads: how many members must be
    /// exchanged to turn one graph's node set into the other's.
    pub fn exchange_distance(&self, other: &Graph) -> i64 {
        let missing_from_other = self.nodes().filter(|n| !other.contains(&n.payload)).count();
        let missing_from_self = other.nodes().filter(|n| !self.contains(&n.payload)).count();
        missing_from_other.max(missing_from_self) as i64
    }

    /// Checks the structural invariants listed in the module docs.
    pub fn is_consistent(&self) -> bool {
        let live = self.nodes().count();
        if live != self.len {
            return false;
        }
        self.nodes().all(|n| {
            n.adjacent.iter().all(|&o| {
                o != n.id && self.node(o).is_some_and(|other| other.is_connected_to(n.id))
            })
        })
    }
}

fn density(sum_of_degrees: usize, size: usize) -> f64 {
    if size <= 1 {
        return 0.0;
    }
    sum_of_degrees as f64 / (size * (size - 1)) as f64
}

/// Equal when both graphs hold the same payload set; names, policies and
/// ids do not participate.
impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.nodes().all(|n| other.contains(&n.payload))
    }
}

impl fmt::Display for Graph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.name)?;
        for (i, node) in self.nodes().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{node}")?;
        }
        write!(f, "]")
    }
}

// ============================================================================
// Tests
// ============================================================================
