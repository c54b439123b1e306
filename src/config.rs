//! Typed analysis parameters.
//!
//! ```json
//! {
//!   "n": 12,
//!   "m": 4,
//!   "policy": { "between": { "min": 1, "max": 2 } },
//!   "min_clique_size": 3,
//!   "max_allowed_degree": 40,
//!   "seed": 7
//! }
//! ```
//!
//! Every field has a default, so `{}` is a valid config. When `partitions`
//! holds literals they replace the generated vertex set.

use std::io::Read;

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::algo::CliqueConfig;
use crate::generator::PartitionGenerator;
use crate::model::{ConnectionPolicy, Graph, Partition};
use crate::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Integer being partitioned.
    pub n: u32,
    /// Number of summands per partition.
    pub m: usize,
    pub policy: ConnectionPolicy,
    pub min_clique_size: usize,
    /// Thin high-degree nodes before clique enumeration.
    pub max_allowed_degree: Option<usize>,
    pub include_hanging_cliques: bool,
    /// Seed for every randomized step; entropy when absent.
    pub seed: Option<u64>,
    /// Partition literals such as `"[5, 3, 1]"`.
    pub partitions: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            n: 10,
            m: 3,
            policy: ConnectionPolicy::AtMost(1),
            min_clique_size: 3,
            max_allowed_degree: None,
            include_hanging_cliques: false,
            seed: None,
            partitions: Vec::new(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_str(input: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let config: Self = serde_json::from_reader(reader)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject parameter combinations no analysis can use.
    pub fn validate(&self) -> Result<()> {
        if let ConnectionPolicy::Between { min, max } = self.policy {
            if min > max {
                return Err(Error::InvalidArgument(format!(
                    "policy bounds out of order: min {min} > max {max}"
                )));
            }
        }
        if self.max_allowed_degree == Some(0) {
            return Err(Error::InvalidArgument("max_allowed_degree must be positive".into()));
        }
        Ok(())
    }

    /// Parse `partitions`, sorting each literal descending.
    pub fn parsed_partitions(&self) -> Result<Vec<Partition>> {
        self.partitions.iter().map(|literal| literal.parse()).collect()
    }

    pub fn clique_config(&self) -> CliqueConfig {
        CliqueConfig {
            min_size: self.min_clique_size,
            include_hanging: self.include_hanging_cliques,
        }
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// The vertex set: parsed literals if any, otherwise every partition of
    /// `n` into `m` summands.
    pub fn vertices(&self) -> Result<Vec<Partition>> {
        if self.partitions.is_empty() {
            Ok(PartitionGenerator::build(self.n, self.m, None))
        } else {
            self.parsed_partitions()
        }
    }

    /// Build the distance graph this config describes.
    pub fn build_graph(&self) -> Result<Graph> {
        let vertices = self.vertices()?;
        let mut graph = Graph::new(format!("n={} m={} {}", self.n, self.m, self.policy), self.policy);
        for partition in vertices {
            graph.add_node(partition);
        }
        tracing::info!(
            graph = graph.name(),
            nodes = graph.len(),
            edges = graph.edge_count(),
            "graph built from config"
        );
        Ok(graph)
    }
}
