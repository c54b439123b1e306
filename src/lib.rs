//! # partition-graph: Distance Graphs over Integer Partitions
//!
//! Builds graphs whose vertices are integer partitions (or abstract labeled
//! points) joined by a distance rule, and measures them: maximal cliques,
//! diameter, characteristic path length, efficiency, density, clustering.
//!
//! ## Design Principles
//!
//! 1. **Arena-first**: nodes live in a `Graph` arena addressed by `NodeId`;
//!    adjacency is a set of ids, never a live reference.
//! 2. **One payload enum**: `Payload` dispatches distance and equality for
//!    partitions, labels, and nested graphs in one place.
//! 3. **Symmetric wiring only**: there is no one-sided connect.
//! 4. **Explicit policy, explicit randomness**: the edge rule is a
//!    `ConnectionPolicy` value and every randomized mode takes an `Rng`.
//!
//! ## Quick Start
//!
//! ```rust
//! use partition_graph::{CliqueFinder, ConnectionPolicy, Graph, PartitionGenerator, PathAnalyzer};
//!
//! let partitions = PartitionGenerator::build(6, 3, None);
//! let mut graph = Graph::new("n=6 m=3", ConnectionPolicy::AtMost(1));
//! for p in partitions {
//!     graph.add_node(p);
//! }
//!
//! // 7 partitions, 9 edges; triangles around [4, 2, 0] and [3, 2, 1]
//! let cliques = CliqueFinder::default().find_max_cliques(&graph);
//! assert_eq!(cliques.len(), 3);
//! // [6, 0, 0] to [2, 2, 2]
//! assert_eq!(PathAnalyzer::diameter(&graph), 4);
//! ```
//!
//! ## Data Flow
//!
//! ```text
//! PartitionGenerator → Partition → Payload → Graph::add_node (edges per policy)
//!     → CliqueFinder / PathAnalyzer / clustering / stats → export (plain data)
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod generator;
pub mod algo;
pub mod stats;
pub mod config;
pub mod export;

// ============================================================================
// Re-exports: Model
// ============================================================================

pub use model::{
    Partition, UNDEFINED_DISTANCE,
    Node, NodeId, Payload,
    Graph, ConnectionPolicy,
    Clique,
};

// ============================================================================
// Re-exports: Generation and analysis
// ============================================================================

pub use generator::{PartitionGenerator, PartitionFilter, BlottoFilter};
pub use algo::{CliqueFinder, CliqueConfig, PathAnalyzer, INFINITE_DISTANCE};
pub use config::AnalysisConfig;
pub use export::{GraphSnapshot, GraphReport};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Parse error in {input:?}: {message}")]
    Parse { input: String, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
