//! One analysis pass over an immutable graph.

use std::collections::{BTreeSet, HashMap, HashSet};

use serde::Serialize;

use crate::cycles::{detect_cycles, Cycle, CycleReport};
use crate::graph::DependencyGraph;
use crate::impact::{propagate, Impact};
use crate::selection::{select_tests, TestSelection};

/// Deterministic output of [`analyze`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Analysis {
    /// Cycles found outside the exclusion set
    pub cycles: CycleReport,
    /// Impact of the changed set
    pub impact: Impact,
    /// Tests selected from the impact
    pub selection: TestSelection,
}

/// Final result handed to reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Test id → class path that justified selecting it
    pub impacted_tests_with_paths: TestSelection,
    /// Dependency cycles, first and last names equal
    pub cycles: Vec<Cycle>,
    /// Free-text architecture notes, or a fixed fallback
    pub advisory_text: String,
}

impl AnalysisResult {
    /// Assemble the result from an analysis and the advisory text.
    #[must_use]
    pub fn new(analysis: &Analysis, advisory_text: impl Into<String>) -> Self {
        Self {
            impacted_tests_with_paths: analysis.selection.clone(),
            cycles: analysis.cycles.cycles.clone(),
            advisory_text: advisory_text.into(),
        }
    }
}

/// Run cycle detection, impact propagation and test selection.
///
/// `cycle_exclusions` only affects cycle detection; impact and selection see
/// the whole graph.
#[must_use]
pub fn analyze(
    graph: &DependencyGraph,
    changed: &BTreeSet<String>,
    test_map: &HashMap<String, String>,
    cycle_exclusions: &HashSet<String>,
) -> Analysis {
    let cycles = detect_cycles(graph, cycle_exclusions);
    let impact = propagate(graph, changed);
    let selection = select_tests(&impact, test_map);

    Analysis {
        cycles,
        impact,
        selection,
    }
}
