//! Class dependency graph backed by petgraph.
//!
//! # Graph Representation
//!
//! Edges are directed from **dependent to dependency**: `A -> B` means class
//! `A` references class `B`. Each edge is stored exactly once, so the two
//! relationship views of a node are mirror images by construction:
//!
//! - `dependencies(A)` reads outgoing edges of `A`
//! - `dependents(B)` reads incoming edges of `B`
//!
//! Edges can only be written through [`DependencyGraph::add_dependency`].
//!
//! # Determinism
//!
//! petgraph iterates neighbors in reverse insertion order. Every read helper
//! here sorts by class name instead, so results never depend on the order in
//! which edges were registered.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use tracing::trace;

use crate::error::{GraphError, Result};
use crate::node::ClassNode;

/// Outcome of registering a dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeInsert {
    /// The edge was new and has been inserted.
    Added,
    /// The edge already existed; nothing changed.
    AlreadyPresent,
    /// One of the endpoints is not a registered class; nothing changed.
    Dropped,
}

/// Directed graph of class dependencies.
#[derive(Debug, Default, Clone)]
pub struct DependencyGraph {
    /// Node weights are the classes, edges carry no data.
    graph: DiGraph<ClassNode, ()>,

    /// Mapping from class name to graph `NodeIndex`.
    ///
    /// The sole source of node identity: every node in `graph` has exactly
    /// one entry here.
    node_map: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class node.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::DuplicateNode`] if a class with the same name is
    /// already registered. The existing node is left untouched.
    pub fn add_node(&mut self, node: ClassNode) -> Result<()> {
        if let Some(&existing) = self.node_map.get(node.name()) {
            return Err(GraphError::DuplicateNode {
                name: node.name().to_string(),
                existing: self.graph[existing].locator().to_path_buf(),
                rejected: node.locator().to_path_buf(),
            });
        }

        let name = node.name().to_string();
        let index = self.graph.add_node(node);
        self.node_map.insert(name, index);
        Ok(())
    }

    /// Register that `from` depends on `to`.
    ///
    /// References to unregistered classes are dropped and registering the
    /// same edge twice is a no-op. A class may depend on itself.
    pub fn add_dependency(&mut self, from: &str, to: &str) -> EdgeInsert {
        let (Some(&from_index), Some(&to_index)) = (self.node_map.get(from), self.node_map.get(to))
        else {
            trace!(from, to, "Dropping reference to unregistered class");
            return EdgeInsert::Dropped;
        };

        if self.graph.contains_edge(from_index, to_index) {
            return EdgeInsert::AlreadyPresent;
        }

        self.graph.add_edge(from_index, to_index, ());
        EdgeInsert::Added
    }

    /// Look up a class by name.
    #[must_use]
    pub fn get_node(&self, name: &str) -> Option<&ClassNode> {
        self.node_map.get(name).map(|&index| &self.graph[index])
    }

    /// `true` if a class with this name is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.node_map.contains_key(name)
    }

    /// Names of the classes `name` depends on, sorted.
    ///
    /// Empty if `name` is not registered.
    #[must_use]
    pub fn dependencies(&self, name: &str) -> Vec<&str> {
        self.neighbor_names(name, Direction::Outgoing)
    }

    /// Names of the classes that depend on `name`, sorted.
    ///
    /// Empty if `name` is not registered.
    #[must_use]
    pub fn dependents(&self, name: &str) -> Vec<&str> {
        self.neighbor_names(name, Direction::Incoming)
    }

    /// All class names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.node_map.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Iterate over all nodes in registration order.
    pub fn nodes(&self) -> impl Iterator<Item = &ClassNode> {
        self.graph.node_weights()
    }

    /// All edges as `(dependent, dependency)` name pairs, sorted.
    #[must_use]
    pub fn edges(&self) -> Vec<(&str, &str)> {
        let mut edges: Vec<(&str, &str)> = self
            .graph
            .edge_references()
            .map(|edge| {
                (
                    self.graph[edge.source()].name(),
                    self.graph[edge.target()].name(),
                )
            })
            .collect();
        edges.sort_unstable();
        edges
    }

    /// Number of registered classes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of distinct dependency edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// `true` if no class is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.node_map.is_empty()
    }

    pub(crate) fn index_of(&self, name: &str) -> Option<NodeIndex> {
        self.node_map.get(name).copied()
    }

    pub(crate) fn name_of(&self, index: NodeIndex) -> &str {
        self.graph[index].name()
    }

    /// Neighbor indices in the given direction, sorted by class name.
    pub(crate) fn sorted_neighbors(&self, index: NodeIndex, direction: Direction) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> =
            self.graph.neighbors_directed(index, direction).collect();
        neighbors.sort_unstable_by(|a, b| self.name_of(*a).cmp(self.name_of(*b)));
        neighbors.dedup();
        neighbors
    }

    fn neighbor_names(&self, name: &str, direction: Direction) -> Vec<&str> {
        self.index_of(name)
            .map(|index| {
                self.sorted_neighbors(index, direction)
                    .into_iter()
                    .map(|neighbor| self.name_of(neighbor))
                    .collect()
            })
            .unwrap_or_default()
    }
}
