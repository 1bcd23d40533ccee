//! # Ripple graph engine
//!
//! The algorithmic core of ripple: a class-level dependency graph, elementary
//! cycle detection, change-impact propagation with provenance, and test
//! selection from the resulting impact set.
//!
//! Nothing in this crate performs I/O. Collaborators hand it class nodes,
//! referenced class names, a changed set and a class→test map; it hands back
//! an [`Analysis`].
//!
//! ## Quick Start
//!
//! ```
//! use std::collections::{BTreeSet, HashMap, HashSet};
//! use ripple_graph::{analyze, ClassNode, ClassSignals, DependencyGraph};
//!
//! let mut graph = DependencyGraph::new();
//! for name in ["Controller", "Service", "Repository"] {
//!     graph.add_node(ClassNode::new(name, format!("{name}.java"), "com.example", ClassSignals::default()))?;
//! }
//! graph.add_dependency("Controller", "Service");
//! graph.add_dependency("Service", "Repository");
//!
//! let changed = BTreeSet::from(["Repository".to_string()]);
//! let tests = HashMap::from([("Controller".to_string(), "ControllerTest".to_string())]);
//! let analysis = analyze(&graph, &changed, &tests, &HashSet::new());
//!
//! assert_eq!(
//!     analysis.selection.path_for("ControllerTest"),
//!     Some(&["Repository".to_string(), "Service".to_string(), "Controller".to_string()][..])
//! );
//! # Ok::<(), ripple_graph::GraphError>(())
//! ```

#![forbid(unsafe_code)]

mod analysis;
mod classifier;
mod cycles;
mod error;
mod graph;
mod impact;
mod node;
mod projection;
mod selection;

pub use analysis::{analyze, Analysis, AnalysisResult};
pub use classifier::{classify, default_exclusions, NodeFlags, DTO_SUFFIXES};
pub use cycles::{detect_cycles, Cycle, CycleReport, PrunedEdge};
pub use error::{GraphError, Result};
pub use graph::{DependencyGraph, EdgeInsert};
pub use impact::{propagate, Discovery, Impact};
pub use node::{ClassNode, ClassSignals};
pub use projection::{GraphProjection, ProjectedClass};
pub use selection::{select_tests, TestSelection};
