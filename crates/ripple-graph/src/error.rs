//! Error types for graph construction.
//!
//! Only node registration can fail. References to classes outside the graph
//! are not errors; [`crate::DependencyGraph::add_dependency`] reports them as
//! [`crate::EdgeInsert::Dropped`] and the caller decides whether to count them.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for graph operations.
pub type Result<T> = std::result::Result<T, GraphError>;

/// Error raised while building a dependency graph.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GraphError {
    /// A class with this name is already registered.
    ///
    /// Nodes are keyed by simple class name, so two classes with the same name
    /// in different packages collide. The first registration is kept.
    #[error(
        "duplicate class `{name}`: {} already registered, rejected {}",
        existing.display(),
        rejected.display()
    )]
    DuplicateNode {
        /// The colliding class name
        name: String,
        /// Source locator of the node that stays registered
        existing: PathBuf,
        /// Source locator of the node that was rejected
        rejected: PathBuf,
    },
}
