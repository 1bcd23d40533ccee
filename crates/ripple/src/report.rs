//! JSON run report.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use ripple_graph::{Analysis, Cycle, GraphProjection, TestSelection};
use serde::Serialize;
use tokio::fs;
use tracing::{error, info};

use crate::build::BuildDiagnostics;
use crate::error::Result;

/// Report file name inside the report directory
pub const REPORT_FILE_NAME: &str = "ripple-report.json";

/// An impacted class and the path that reached it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImpactedClass {
    /// Class name
    pub name: String,
    /// Changed class first, this class last
    pub path: Vec<String>,
}

/// Build problems worth surfacing in the report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportDiagnostics {
    /// Files skipped because extraction failed
    pub parse_failures: Vec<String>,
    /// Rejected duplicate classes
    pub duplicate_classes: Vec<String>,
    /// References to classes outside the graph
    pub dropped_references: usize,
}

impl From<&BuildDiagnostics> for ReportDiagnostics {
    fn from(diagnostics: &BuildDiagnostics) -> Self {
        Self {
            parse_failures: diagnostics
                .parse_failures
                .iter()
                .map(ToString::to_string)
                .collect(),
            duplicate_classes: diagnostics
                .duplicates
                .iter()
                .map(ToString::to_string)
                .collect(),
            dropped_references: diagnostics.references_dropped,
        }
    }
}

/// Everything a run produced, as written to disk.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// When the report was generated
    pub generated_at: DateTime<Utc>,
    /// Changed class names
    pub changed: Vec<String>,
    /// Impacted classes in discovery order
    pub impacted: Vec<ImpactedClass>,
    /// Selected test id → justifying path
    pub selected_tests: TestSelection,
    /// Dependency cycles outside data carriers
    pub cycles: Vec<Cycle>,
    /// Edges skipped during cycle detection
    pub pruned_edge_count: usize,
    /// Dependency projection without data carriers
    pub graph: GraphProjection,
    /// Advisory text or the fallback
    pub advisory: String,
    /// Build problems
    pub diagnostics: ReportDiagnostics,
}

impl Report {
    /// Assemble a report from the analysis of one run.
    #[must_use]
    pub fn new(
        changed: impl IntoIterator<Item = String>,
        analysis: &Analysis,
        graph: GraphProjection,
        advisory: impl Into<String>,
        diagnostics: ReportDiagnostics,
    ) -> Self {
        let impacted = analysis
            .impact
            .iter()
            .map(|name| ImpactedClass {
                name: name.to_string(),
                path: analysis.impact.path_to(name).unwrap_or_default(),
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            changed: changed.into_iter().collect(),
            impacted,
            selected_tests: analysis.selection.clone(),
            cycles: analysis.cycles.cycles.clone(),
            pruned_edge_count: analysis.cycles.pruned_edges.len(),
            graph,
            advisory: advisory.into(),
            diagnostics,
        }
    }

    /// Write the report into `dir`, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub async fn write(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir).await?;
        let path = dir.join(REPORT_FILE_NAME);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).await?;
        Ok(path)
    }

    /// Write the report, logging instead of failing.
    pub async fn write_logged(&self, dir: &Path) -> Option<PathBuf> {
        match self.write(dir).await {
            Ok(path) => {
                info!(path = %path.display(), "Wrote report");
                Some(path)
            }
            Err(e) => {
                error!(directory = %dir.display(), error = %e, "Failed to write report");
                None
            }
        }
    }
}
