//! Change-impact propagation with provenance.
//!
//! Breadth-first search over the `dependents` relation, seeded with the
//! changed set. Every class records the class it was discovered from, fixed
//! on first discovery, so the parent pointers form a BFS forest rooted at the
//! changed classes. Seeds are enqueued in name order and dependents are
//! expanded in name order, which makes tie-breaking reproducible.
//!
//! A changed name without a node (deleted or renamed class) stays in the
//! impact set but has nothing to expand.

use std::collections::{BTreeSet, HashMap, VecDeque};

use petgraph::Direction;
use serde::Serialize;
use tracing::debug;

use crate::graph::DependencyGraph;

/// How a class entered the impact set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "parent")]
pub enum Discovery {
    /// The class was in the changed set.
    Changed,
    /// The class depends on this already-impacted class.
    Via(String),
}

/// Impacted classes with their discovery parents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Impact {
    /// Impacted class names in discovery order.
    order: Vec<String>,
    /// Discovery parent per impacted class.
    parents: HashMap<String, Discovery>,
}

impl Impact {
    /// `true` if `name` is impacted.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.parents.contains_key(name)
    }

    /// Number of impacted classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// `true` if nothing is impacted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Impacted class names in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// How `name` was discovered, if it is impacted.
    #[must_use]
    pub fn discovery(&self, name: &str) -> Option<&Discovery> {
        self.parents.get(name)
    }

    /// Reconstruct the chain from a changed class to `name`.
    ///
    /// The first element is a changed class and the last is `name`. Returns
    /// `None` if `name` is not impacted.
    #[must_use]
    pub fn path_to(&self, name: &str) -> Option<Vec<String>> {
        let mut current = self.parents.get_key_value(name)?;
        let mut path = vec![current.0.clone()];

        // Parent pointers form a forest; the bound only guards malformed input.
        for _ in 0..self.order.len() {
            match current.1 {
                Discovery::Changed => {
                    path.reverse();
                    return Some(path);
                }
                Discovery::Via(parent) => {
                    current = self.parents.get_key_value(parent.as_str())?;
                    path.push(current.0.clone());
                }
            }
        }

        None
    }

    fn record(&mut self, name: &str, discovery: Discovery) -> bool {
        if self.parents.contains_key(name) {
            return false;
        }
        self.parents.insert(name.to_string(), discovery);
        self.order.push(name.to_string());
        true
    }
}

/// Propagate impact from `changed` along reverse dependency edges.
#[must_use]
pub fn propagate<I, S>(graph: &DependencyGraph, changed: I) -> Impact
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let seeds: BTreeSet<String> = changed
        .into_iter()
        .map(|name| name.as_ref().to_string())
        .collect();

    let mut impact = Impact::default();
    let mut queue: VecDeque<String> = VecDeque::with_capacity(seeds.len());
    for seed in seeds {
        impact.record(&seed, Discovery::Changed);
        queue.push_back(seed);
    }

    let mut unresolved = 0usize;
    while let Some(current) = queue.pop_front() {
        let Some(index) = graph.index_of(&current) else {
            unresolved += 1;
            continue;
        };

        for dependent in graph.sorted_neighbors(index, Direction::Incoming) {
            let dependent_name = graph.name_of(dependent);
            if impact.record(dependent_name, Discovery::Via(current.clone())) {
                queue.push_back(dependent_name.to_string());
            }
        }
    }

    debug!(
        impacted = impact.len(),
        unresolved_changes = unresolved,
        "Impact propagation completed"
    );
    impact
}
