//! Test selection from an impact set.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::impact::Impact;

/// Selected tests, each justified by the impact path that selected it.
///
/// Entries keep the order in which impacted classes were discovered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TestSelection {
    tests: IndexMap<String, Vec<String>>,
}

impl TestSelection {
    /// Selected test ids in selection order.
    pub fn test_ids(&self) -> impl Iterator<Item = &str> {
        self.tests.keys().map(String::as_str)
    }

    /// The impact path that selected `test_id`.
    #[must_use]
    pub fn path_for(&self, test_id: &str) -> Option<&[String]> {
        self.tests.get(test_id).map(Vec::as_slice)
    }

    /// `(test id, path)` pairs in selection order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.tests
            .iter()
            .map(|(test, path)| (test.as_str(), path.as_slice()))
    }

    /// Number of selected tests.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tests.len()
    }

    /// `true` if no test was selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tests.is_empty()
    }

    /// Consume the selection and return the ordered map.
    #[must_use]
    pub fn into_inner(self) -> IndexMap<String, Vec<String>> {
        self.tests
    }
}

/// Select the tests mapped to impacted classes.
///
/// `test_map` maps a class name to the test id covering it. When several
/// impacted classes map to the same test, the path of the class discovered
/// first is kept.
#[must_use]
pub fn select_tests(impact: &Impact, test_map: &HashMap<String, String>) -> TestSelection {
    let mut tests: IndexMap<String, Vec<String>> = IndexMap::new();

    for class in impact.iter() {
        let Some(test_id) = test_map.get(class) else {
            continue;
        };
        if tests.contains_key(test_id) {
            continue;
        }
        if let Some(path) = impact.path_to(class) {
            tests.insert(test_id.clone(), path);
        }
    }

    debug!(
        impacted = impact.len(),
        selected = tests.len(),
        "Test selection completed"
    );
    TestSelection { tests }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::DependencyGraph;
    use crate::impact::propagate;
    use crate::node::{ClassNode, ClassSignals};

    fn layered_graph() -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        for name in ["Controller", "Service", "Repository"] {
            graph
                .add_node(ClassNode::new(name, format!("{name}.java"), "", ClassSignals::default()))
                .unwrap();
        }
        graph.add_dependency("Service", "Repository");
        graph.add_dependency("Controller", "Service");
        graph
    }

    fn test_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(class, test)| ((*class).to_string(), (*test).to_string()))
            .collect()
    }

    #[test]
    fn selects_tests_with_justification_paths() {
        let graph = layered_graph();
        let impact = propagate(&graph, ["Repository"]);
        let map = test_map(&[("Service", "ServiceTest"), ("Controller", "ControllerTest")]);

        let selection = select_tests(&impact, &map);

        assert_eq!(
            selection.test_ids().collect::<Vec<_>>(),
            vec!["ServiceTest", "ControllerTest"]
        );
        assert_eq!(
            selection.path_for("ServiceTest"),
            Some(&["Repository".to_string(), "Service".to_string()][..])
        );
        assert_eq!(
            selection.path_for("ControllerTest"),
            Some(
                &[
                    "Repository".to_string(),
                    "Service".to_string(),
                    "Controller".to_string()
                ][..]
            )
        );
    }

    #[test]
    fn shared_test_keeps_first_discovered_path() {
        let graph = layered_graph();
        let impact = propagate(&graph, ["Repository"]);
        let map = test_map(&[("Service", "LayerTest"), ("Controller", "LayerTest")]);

        let selection = select_tests(&impact, &map);

        assert_eq!(selection.len(), 1);
        assert_eq!(
            selection.path_for("LayerTest"),
            Some(&["Repository".to_string(), "Service".to_string()][..])
        );
    }

    #[test]
    fn empty_impact_selects_nothing() {
        let graph = layered_graph();
        let impact = propagate(&graph, Vec::<String>::new());

        let selection = select_tests(&impact, &test_map(&[("Service", "ServiceTest")]));

        assert!(selection.is_empty());
    }

    #[test]
    fn unknown_changed_class_selects_only_its_direct_test() {
        let graph = layered_graph();
        let impact = propagate(&graph, ["Removed"]);
        let map = test_map(&[("Removed", "RemovedTest"), ("Service", "ServiceTest")]);

        let selection = select_tests(&impact, &map);

        assert_eq!(selection.test_ids().collect::<Vec<_>>(), vec!["RemovedTest"]);
        assert_eq!(
            selection.path_for("RemovedTest"),
            Some(&["Removed".to_string()][..])
        );
    }
}
