//! Ripple - change-impact test selection for Java projects.
//!
//! Ripple scans a Java project, builds a class-level dependency graph with
//! tree-sitter, and selects the tests affected by the classes that changed
//! between two revisions. The graph algorithms live in [`ripple_graph`];
//! this crate supplies the collaborators around them: scanning, extraction,
//! change sets, the optional advisory call, reporting and the CLI.

#![forbid(unsafe_code)]

pub mod advisory;
pub mod app;
pub mod build;
pub mod changes;
pub mod config;
pub mod error;
pub mod extract;
pub mod scanner;
pub mod test_map;

// Public CLI modules (needed by binary)
pub mod cli;
pub mod output;

pub mod report;

pub use error::{Error, Result};
