//! # Graph Algorithms
//!
//! Read-only analyses over a finished `Graph`. Build and analysis are
//! separate phases: nothing here mutates the graph, and every parallel
//! section joins before returning.

pub mod clique;
pub mod path;
pub mod clustering;

pub use clique::{CliqueFinder, CliqueConfig};
pub use path::{PathAnalyzer, INFINITE_DISTANCE};
