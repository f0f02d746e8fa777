//! Graph module for build order resolution.
//!
//! This module provides the [`DependencyGraph`] struct for accumulating
//! "depends-on" relationships and [`resolve`] for turning them into a
//! build order.
//!
//! # Example
//!
//! ```rust
//! use pkganalyzer::graph::{build_graph, resolve};
//!
//! let graph = build_graph([("B", "A"), ("C", "A"), ("D", "B"), ("D", "C")], []);
//!
//! assert_eq!(resolve(&graph).unwrap(), vec!["A", "B", "C", "D"]);
//! ```

mod dependency_graph;
mod resolver;

pub use dependency_graph::{build_graph, build_graph_in_order, CycleInfo, DependencyGraph};
pub use resolver::{resolve, ResolveError};
