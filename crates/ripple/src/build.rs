//! Dependency graph construction from source files.
//!
//! ## Phases
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                      build_graph                       │
//! ├────────────────────────────────────────────────────────┤
//! │  Phase 1 (Parallel):    rayon par_iter file extraction │
//! │  Phase 2 (Sequential):  node registration, path order  │
//! │  Phase 3 (Sequential):  edge registration              │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! Every node is registered before any edge, so whether a reference resolves
//! never depends on file order.

use std::path::PathBuf;

use rayon::prelude::*;
use ripple_graph::{ClassNode, DependencyGraph, EdgeInsert, GraphError};
use tracing::{debug, info, warn};

use crate::error::ExtractError;
use crate::extract::{self, JavaUnit};

/// Problems and counters collected while building the graph.
#[derive(Debug, Default, Clone)]
pub struct BuildDiagnostics {
    /// Files that were scanned
    pub files_scanned: usize,
    /// Units registered as nodes
    pub units_registered: usize,
    /// Files skipped because extraction failed
    pub parse_failures: Vec<ExtractError>,
    /// Units rejected because their name was already registered
    pub duplicates: Vec<GraphError>,
    /// References that became edges
    pub references_added: usize,
    /// References to classes outside the graph
    pub references_dropped: usize,
}

/// A built graph plus what happened while building it.
#[derive(Debug, Default, Clone)]
pub struct GraphBuild {
    /// The dependency graph, read-only from here on
    pub graph: DependencyGraph,
    /// Build diagnostics
    pub diagnostics: BuildDiagnostics,
}

/// Extract every file and build the dependency graph.
///
/// `files` should be sorted: on a name collision the earlier file wins.
#[must_use]
pub fn build_graph(files: &[PathBuf], base_package: &str) -> GraphBuild {
    let mut diagnostics = BuildDiagnostics {
        files_scanned: files.len(),
        ..BuildDiagnostics::default()
    };

    // Phase 1: extraction, order preserved
    let extracted: Vec<Result<Option<JavaUnit>, ExtractError>> = files
        .par_iter()
        .map(|path| extract::parse_file(path))
        .collect();

    let mut units = Vec::with_capacity(extracted.len());
    for result in extracted {
        match result {
            Ok(Some(unit)) => units.push(unit),
            Ok(None) => {}
            Err(e) => {
                warn!(error = %e, "Skipping source file");
                diagnostics.parse_failures.push(e);
            }
        }
    }

    // Phase 2: nodes
    let mut graph = DependencyGraph::new();
    let pending = register_units(&mut graph, units, base_package, &mut diagnostics);
    diagnostics.units_registered = graph.node_count();

    // Phase 3: edges
    for (name, references) in &pending {
        for reference in references {
            match graph.add_dependency(name, reference) {
                EdgeInsert::Added => diagnostics.references_added += 1,
                EdgeInsert::AlreadyPresent => {}
                EdgeInsert::Dropped => diagnostics.references_dropped += 1,
            }
        }
    }

    info!(
        files = diagnostics.files_scanned,
        classes = diagnostics.units_registered,
        edges = graph.edge_count(),
        parse_failures = diagnostics.parse_failures.len(),
        duplicates = diagnostics.duplicates.len(),
        dropped_references = diagnostics.references_dropped,
        "Built dependency graph"
    );

    GraphBuild { graph, diagnostics }
}

/// Register one node per unit, rejecting name collisions.
///
/// Returns the accepted names with their references. Rejected units
/// contribute neither a node nor edges.
fn register_units(
    graph: &mut DependencyGraph,
    units: Vec<JavaUnit>,
    base_package: &str,
    diagnostics: &mut BuildDiagnostics,
) -> Vec<(String, Vec<String>)> {
    let mut pending = Vec::with_capacity(units.len());

    for unit in units {
        let references: Vec<String> = unit.referenced_symbols(base_package).into_iter().collect();
        let signals = unit.signals();
        let JavaUnit {
            path,
            package,
            type_name,
            ..
        } = unit;

        let node = ClassNode::new(type_name.clone(), path, package.unwrap_or_default(), signals);
        match graph.add_node(node) {
            Ok(()) => {
                debug!(class = %type_name, references = references.len(), "Registered class");
                pending.push((type_name, references));
            }
            Err(e) => {
                warn!(error = %e, "Rejecting duplicate class");
                diagnostics.duplicates.push(e);
            }
        }
    }

    pending
}
