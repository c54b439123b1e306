//! # Partition Graph Model
//!
//! Pure data: partitions, node payloads, the graph arena and clique snapshots.
//! No threads, no randomness, no I/O live here.

pub mod partition;
pub mod node;
pub mod graph;
pub mod clique;

pub use partition::{Partition, UNDEFINED_DISTANCE};
pub use node::{Node, NodeId, Payload};
pub use graph::{Graph, ConnectionPolicy};
pub use clique::Clique;
