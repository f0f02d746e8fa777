//! Dependency graph implementation using petgraph.
//!
//! Nodes live in an append-only arena and receive their index on first
//! insertion, so the index order is the first-seen order of identifiers.
//! Edges point from the dependent node to its dependency.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

/// A directed graph of "depends-on" relationships between identifiers.
///
/// The graph uses petgraph's `DiGraph` internally, with one node per
/// distinct identifier and one edge per distinct (dependent, dependency)
/// pair. Identifiers are looked up through a hash map, so the sort's hot
/// loop only ever touches node indices.
///
/// # Example
///
/// ```rust
/// use pkganalyzer::graph::DependencyGraph;
///
/// let mut graph = DependencyGraph::new();
///
/// // app depends on core and web, web depends on core
/// graph.add_edge("app", "core");
/// graph.add_edge("app", "web");
/// graph.add_edge("web", "core");
///
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct DependencyGraph<N> {
    /// The underlying directed graph
    graph: DiGraph<N, ()>,
    /// Maps identifiers to their node indices for O(1) lookup
    node_indices: HashMap<N, NodeIndex>,
}

impl<N> Default for DependencyGraph<N>
where
    N: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<N> DependencyGraph<N>
where
    N: Eq + Hash + Clone,
{
    /// Creates a new empty dependency graph.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pkganalyzer::graph::DependencyGraph;
    ///
    /// let graph: DependencyGraph<String> = DependencyGraph::new();
    /// assert_eq!(graph.node_count(), 0);
    /// ```
    pub fn new() -> Self {
        Self {
            graph: DiGraph::new(),
            node_indices: HashMap::new(),
        }
    }

    /// Creates a new graph with pre-allocated capacity.
    ///
    /// # Arguments
    ///
    /// * `nodes` - Expected number of nodes
    /// * `edges` - Expected number of edges
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, edges),
            node_indices: HashMap::with_capacity(nodes),
        }
    }

    /// Adds a node to the graph.
    ///
    /// If the identifier is already known, returns its existing index
    /// without modification. New nodes start with no dependencies.
    ///
    /// # Returns
    ///
    /// The `NodeIndex` of the added or existing node.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pkganalyzer::graph::DependencyGraph;
    ///
    /// let mut graph = DependencyGraph::new();
    /// let first = graph.add_node("core");
    /// let second = graph.add_node("core");
    ///
    /// assert_eq!(first, second);
    /// assert_eq!(graph.node_count(), 1);
    /// ```
    pub fn add_node(&mut self, id: N) -> NodeIndex {
        if let Some(&idx) = self.node_indices.get(&id) {
            return idx;
        }

        let idx = self.graph.add_node(id.clone());
        self.node_indices.insert(id, idx);
        idx
    }

    /// Records that `dependent` requires `dependency` to build first.
    ///
    /// Both endpoints are created on first reference, dependent first.
    /// Adding the same pair twice keeps a single edge. A self-edge is
    /// accepted here and later reported as a cycle by the resolver.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pkganalyzer::graph::DependencyGraph;
    ///
    /// let mut graph = DependencyGraph::new();
    /// graph.add_edge("web", "core");
    /// graph.add_edge("web", "core");
    ///
    /// assert_eq!(graph.node_count(), 2);
    /// assert_eq!(graph.edge_count(), 1);
    /// ```
    pub fn add_edge(&mut self, dependent: N, dependency: N) {
        let from = self.add_node(dependent);
        let to = self.add_node(dependency);

        self.graph.update_edge(from, to, ());
    }

    /// Returns the index assigned to `id`, if it is in the graph.
    pub fn index_of(&self, id: &N) -> Option<NodeIndex> {
        self.node_indices.get(id).copied()
    }

    /// Returns the identifier stored at `idx`.
    pub fn node(&self, idx: NodeIndex) -> Option<&N> {
        self.graph.node_weight(idx)
    }

    /// Checks if a node exists in the graph.
    pub fn contains(&self, id: &N) -> bool {
        self.node_indices.contains_key(id)
    }

    /// Iterates over all identifiers in first-insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.graph.node_weights()
    }

    /// Gets the direct dependencies of a node (outgoing edges).
    ///
    /// Results are ordered by node index. Unknown identifiers yield an
    /// empty list.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pkganalyzer::graph::DependencyGraph;
    ///
    /// let mut graph = DependencyGraph::new();
    /// graph.add_node("core");
    /// graph.add_node("data");
    /// graph.add_edge("app", "data");
    /// graph.add_edge("app", "core");
    ///
    /// assert_eq!(graph.dependencies_of(&"app"), vec![&"core", &"data"]);
    /// ```
    pub fn dependencies_of(&self, id: &N) -> Vec<&N> {
        self.neighbors_of(id, Direction::Outgoing)
    }

    /// Gets the direct dependents of a node (incoming edges), ordered by
    /// node index.
    pub fn dependents_of(&self, id: &N) -> Vec<&N> {
        self.neighbors_of(id, Direction::Incoming)
    }

    fn neighbors_of(&self, id: &N, direction: Direction) -> Vec<&N> {
        let Some(&idx) = self.node_indices.get(id) else {
            return Vec::new();
        };

        let mut neighbors: Vec<NodeIndex> = self.graph.neighbors_directed(idx, direction).collect();
        neighbors.sort_unstable();
        neighbors
            .into_iter()
            .filter_map(|n| self.graph.node_weight(n))
            .collect()
    }

    /// Detects and returns all cycles in the graph.
    ///
    /// Uses Tarjan's algorithm to find strongly connected components. A
    /// component is a cycle if it has more than one node, or a single node
    /// with a self-loop. Nodes inside a cycle and the cycles themselves are
    /// ordered by first insertion, so the output is stable.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pkganalyzer::graph::DependencyGraph;
    ///
    /// let mut graph = DependencyGraph::new();
    /// graph.add_edge("a", "b");
    /// graph.add_edge("b", "c");
    /// graph.add_edge("c", "a");
    /// graph.add_edge("d", "a"); // d depends on the cycle but is not part of it
    ///
    /// let cycles = graph.detect_cycles();
    /// assert_eq!(cycles.len(), 1);
    /// assert_eq!(cycles[0].nodes, vec!["a", "b", "c"]);
    /// ```
    pub fn detect_cycles(&self) -> Vec<CycleInfo<N>> {
        let mut components: Vec<Vec<NodeIndex>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0]))
            .map(|mut scc| {
                scc.sort_unstable();
                scc
            })
            .collect();
        components.sort_unstable_by_key(|scc| scc[0]);

        components
            .into_iter()
            .map(|scc| CycleInfo {
                nodes: scc
                    .into_iter()
                    .filter_map(|idx| self.graph.node_weight(idx).cloned())
                    .collect(),
            })
            .collect()
    }

    /// Checks if the graph contains at least one cycle, self-loops included.
    pub fn has_cycles(&self) -> bool {
        petgraph::algo::is_cyclic_directed(&self.graph)
    }

    /// Returns the number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the number of distinct edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Checks if the graph is empty.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub(crate) fn inner(&self) -> &DiGraph<N, ()> {
        &self.graph
    }
}

/// Builds a graph from `(dependent, dependency)` pairs plus identifiers
/// that have no dependencies at all.
///
/// Nodes are numbered in the order they are first seen while scanning the
/// pairs (dependent before dependency within a pair), then the isolated
/// identifiers.
///
/// # Example
///
/// ```rust
/// use pkganalyzer::graph::build_graph;
///
/// let graph = build_graph([("web", "core")], ["docs"]);
/// let order: Vec<_> = graph.nodes().copied().collect();
///
/// assert_eq!(order, vec!["web", "core", "docs"]);
/// ```
pub fn build_graph<N, E, I>(edges: E, isolated: I) -> DependencyGraph<N>
where
    N: Eq + Hash + Clone,
    E: IntoIterator<Item = (N, N)>,
    I: IntoIterator<Item = N>,
{
    let mut graph = DependencyGraph::new();

    for (dependent, dependency) in edges {
        graph.add_edge(dependent, dependency);
    }
    for id in isolated {
        graph.add_node(id);
    }

    graph
}

/// Builds a graph from `(node, dependencies)` entries, preserving the
/// entry order.
///
/// Each entry's node is inserted before its dependencies. An entry with no
/// dependencies becomes an isolated node, so every entry is present in the
/// result even when nothing refers to it.
pub fn build_graph_in_order<N, E, D>(entries: E) -> DependencyGraph<N>
where
    N: Eq + Hash + Clone,
    E: IntoIterator<Item = (N, D)>,
    D: IntoIterator<Item = N>,
{
    let mut graph = DependencyGraph::new();

    for (node, dependencies) in entries {
        let node_idx = graph.add_node(node);
        for dependency in dependencies {
            let dep_idx = graph.add_node(dependency);
            graph.graph.update_edge(node_idx, dep_idx, ());
        }
    }

    graph
}

/// Information about a detected circular dependency cycle.
///
/// Contains the identifiers that form one strongly connected component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleInfo<N = String> {
    /// The identifiers in the cycle, in first-insertion order
    pub nodes: Vec<N>,
}

impl<N: fmt::Display> CycleInfo<N> {
    /// Returns a formatted string representation of the cycle.
    ///
    /// For example: "a -> b -> c -> a"
    pub fn cycle_path(&self) -> String {
        let Some(first) = self.nodes.first() else {
            return String::new();
        };

        let mut path = self
            .nodes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" -> ");
        path.push_str(" -> ");
        path.push_str(&first.to_string());
        path
    }
}

impl<N> CycleInfo<N> {
    /// Returns the number of nodes in the cycle.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the cycle is empty (should not happen in practice).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
