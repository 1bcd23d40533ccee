//! Node classification and the default cycle-exclusion policy.
//!
//! Cycles that only run through data carriers (entities mapping both sides of
//! a relation, DTOs nesting each other) are noise rather than structural
//! defects, so the default exclusion set for cycle detection is every data
//! carrier in the graph. Classification never influences impact propagation
//! or test selection.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::graph::DependencyGraph;
use crate::node::ClassSignals;

/// Class-name suffixes that mark request/response/transfer objects.
pub const DTO_SUFFIXES: &[&str] = &["Request", "Response", "Dto"];

/// Classification of a class node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct NodeFlags {
    /// Persistence entity
    pub is_data_entity: bool,
    /// Request/response/transfer object
    pub is_data_transfer_object: bool,
    /// Configuration class
    pub is_config: bool,
}

impl NodeFlags {
    /// `true` if the node is an entity or a transfer object.
    #[must_use]
    pub fn is_data_carrier(self) -> bool {
        self.is_data_entity || self.is_data_transfer_object
    }
}

/// Classify a class from its simple name and extractor signals.
#[must_use]
pub fn classify(name: &str, signals: ClassSignals) -> NodeFlags {
    NodeFlags {
        is_data_entity: signals.persistence_entity,
        is_data_transfer_object: DTO_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)),
        is_config: signals.configuration,
    }
}

/// Names of all data carriers in the graph.
///
/// Used as the exclusion set for cycle detection and for the reporting-only
/// graph projection.
#[must_use]
pub fn default_exclusions(graph: &DependencyGraph) -> HashSet<String> {
    graph
        .nodes()
        .filter(|node| node.is_data_carrier())
        .map(|node| node.name().to_string())
        .collect()
}
