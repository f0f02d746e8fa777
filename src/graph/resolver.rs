//! Build order resolution.
//!
//! Kahn's algorithm over the dependency graph: a node becomes ready once
//! every node it depends on has been emitted. Ready nodes are served FIFO,
//! seeded in node-index order, and nodes unlocked by the same pop are
//! queued in node-index order. The output therefore only depends on the
//! graph's insertion sequence.

use petgraph::graph::NodeIndex;
use petgraph::Direction;
use std::collections::VecDeque;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use tracing::{debug, warn};

use super::DependencyGraph;

/// Errors that can occur while resolving a build order.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError<N: Debug + Display> {
    /// The graph could not be drained. `unresolved` lists every node that
    /// still had prerequisites, in first-insertion order.
    #[error("Circular dependency detected: {}", join_nodes(unresolved))]
    CycleDetected { unresolved: Vec<N> },
}

fn join_nodes<N: Display>(nodes: &[N]) -> String {
    nodes
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Computes a build order in which every node follows all of its
/// dependencies.
///
/// The graph is only read; it can be inspected or resolved again
/// afterwards.
///
/// # Errors
///
/// Returns [`ResolveError::CycleDetected`] when the graph contains a cycle,
/// including a node that depends on itself. No partial order is returned.
///
/// # Example
///
/// ```rust
/// use pkganalyzer::graph::{resolve, DependencyGraph};
///
/// let mut graph = DependencyGraph::new();
/// graph.add_edge("A", "B");
/// graph.add_edge("B", "C");
///
/// assert_eq!(resolve(&graph).unwrap(), vec!["C", "B", "A"]);
/// ```
pub fn resolve<N>(graph: &DependencyGraph<N>) -> Result<Vec<N>, ResolveError<N>>
where
    N: Eq + Hash + Clone + Debug + Display,
{
    let inner = graph.inner();
    let node_count = inner.node_count();

    // remaining[i] counts the unresolved prerequisites of node i; dependents[i]
    // lists the nodes waiting on node i, ascending.
    let mut remaining: Vec<usize> = Vec::with_capacity(node_count);
    let mut dependents: Vec<Vec<NodeIndex>> = Vec::with_capacity(node_count);
    for idx in inner.node_indices() {
        remaining.push(inner.neighbors_directed(idx, Direction::Outgoing).count());

        let mut waiting: Vec<NodeIndex> = inner.neighbors_directed(idx, Direction::Incoming).collect();
        waiting.sort_unstable();
        dependents.push(waiting);
    }

    let mut ready: VecDeque<NodeIndex> = inner
        .node_indices()
        .filter(|idx| remaining[idx.index()] == 0)
        .collect();
    let mut order = Vec::with_capacity(node_count);

    debug!(
        nodes = node_count,
        edges = inner.edge_count(),
        roots = ready.len(),
        "resolving build order"
    );

    while let Some(idx) = ready.pop_front() {
        order.push(inner[idx].clone());

        for &dependent in &dependents[idx.index()] {
            let count = &mut remaining[dependent.index()];
            *count -= 1;
            if *count == 0 {
                ready.push_back(dependent);
            }
        }
    }

    if order.len() != node_count {
        let unresolved: Vec<N> = inner
            .node_indices()
            .filter(|idx| remaining[idx.index()] > 0)
            .map(|idx| inner[idx].clone())
            .collect();
        warn!(
            unresolved = unresolved.len(),
            "build order could not be resolved"
        );
        return Err(ResolveError::CycleDetected { unresolved });
    }

    Ok(order)
}
