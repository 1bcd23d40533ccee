//! Serializable view of the graph for the advisory call and reports.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::graph::DependencyGraph;

/// Relationships of one class in a [`GraphProjection`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectedClass {
    /// Classes this class references, sorted
    pub depends_on: Vec<String>,
    /// Classes referencing this class, sorted
    pub depended_on_by: Vec<String>,
}

/// `{className: {dependsOn, dependedOnBy}}`, sorted by class name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraphProjection {
    classes: BTreeMap<String, ProjectedClass>,
}

impl GraphProjection {
    /// Project `graph`, leaving out `exclude` both as entries and as
    /// neighbors.
    #[must_use]
    pub fn from_graph(graph: &DependencyGraph, exclude: &HashSet<String>) -> Self {
        let keep = |name: &&str| !exclude.contains(*name);
        let owned = |names: Vec<&str>| -> Vec<String> {
            names.into_iter().filter(keep).map(str::to_string).collect()
        };

        let classes = graph
            .names()
            .into_iter()
            .filter(keep)
            .map(|name| {
                (
                    name.to_string(),
                    ProjectedClass {
                        depends_on: owned(graph.dependencies(name)),
                        depended_on_by: owned(graph.dependents(name)),
                    },
                )
            })
            .collect();

        Self { classes }
    }

    /// Relationships of `name`, if projected.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ProjectedClass> {
        self.classes.get(name)
    }

    /// Number of projected classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// `true` if no class was projected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error only if serialization fails, which a map of strings
    /// does not do in practice.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
