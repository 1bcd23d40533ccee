//! Application context for one analysis run.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use ripple::advisory::DisabledAdvisor;
//! use ripple::app::{App, RunOptions};
//! use ripple::changes::StaticChangeSet;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let app = App::from_directory(Path::new("."), None).await?;
//!     let outcome = app
//!         .run(
//!             &StaticChangeSet::new(["OrderRepository"]),
//!             Arc::new(DisabledAdvisor::default()),
//!             &RunOptions::default(),
//!         )
//!         .await?;
//!     for test in outcome.selected_tests() {
//!         println!("{test}");
//!     }
//!     Ok(())
//! }
//! ```

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ripple_graph::{analyze, default_exclusions, Analysis, AnalysisResult, GraphProjection};
use tracing::{debug, info, warn};

use crate::advisory::{advise, Advisor, FALLBACK_ADVISORY};
use crate::build::{build_graph, BuildDiagnostics};
use crate::changes::ChangeSetProvider;
use crate::config::RippleConfig;
use crate::error::{Error, ExtractError, Result};
use crate::report::{Report, ReportDiagnostics};
use crate::scanner::discover_java_files;
use crate::test_map::{discover_tests, TestDiscovery};

/// Per-run switches.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Base revision for the diff
    pub base: String,
    /// Head revision for the diff
    pub head: String,
    /// Write the JSON report
    pub write_report: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            base: "HEAD~1".to_string(),
            head: "HEAD".to_string(),
            write_report: true,
        }
    }
}

/// What a run produced.
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    /// Changed class names
    pub changed: BTreeSet<String>,
    /// Cycles, impact and selection
    pub analysis: Analysis,
    /// Result handed to reporting
    pub result: AnalysisResult,
    /// Graph build diagnostics
    pub build: BuildDiagnostics,
    /// Test files that could not be read
    pub test_failures: Vec<ExtractError>,
    /// Where the report was written, if it was
    pub report_path: Option<PathBuf>,
}

impl RunOutcome {
    /// Selected test ids in selection order.
    pub fn selected_tests(&self) -> impl Iterator<Item = &str> {
        self.analysis.selection.test_ids()
    }
}

/// Application context: a project root and its configuration.
#[derive(Debug, Clone)]
pub struct App {
    project_root: PathBuf,
    config: RippleConfig,
}

impl App {
    /// Create an App for `project_root`.
    ///
    /// With `config_path`, that file must exist and parse. Without it,
    /// `ripple.yaml` in the root is used if present and valid, and the
    /// defaults otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if the project root is not a readable directory or
    /// the explicit configuration is invalid.
    pub async fn from_directory(project_root: &Path, config_path: Option<&Path>) -> Result<Self> {
        let metadata = tokio::fs::metadata(project_root).await?;
        if !metadata.is_dir() {
            return Err(Error::Config(format!(
                "project root is not a directory: {}",
                project_root.display()
            )));
        }
        // Fails early on unreadable roots
        tokio::fs::read_dir(project_root).await?;

        let config = match config_path {
            Some(path) => RippleConfig::load(path).await.map_err(|e| {
                Error::Config(format!("{}: {e}", path.display()))
            })?,
            None => RippleConfig::load_or_default(project_root).await,
        };

        Ok(Self::with_config(project_root, config))
    }

    /// Create an App with an explicit configuration.
    #[must_use]
    pub fn with_config(project_root: impl Into<PathBuf>, config: RippleConfig) -> Self {
        Self {
            project_root: project_root.into(),
            config,
        }
    }

    /// Project root directory.
    #[must_use]
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &RippleConfig {
        &self.config
    }

    /// Run one analysis.
    ///
    /// With no changed classes the run stops early: nothing is scanned, no
    /// advisory is requested and no report is written.
    ///
    /// The advisory runs as a detached task next to the analysis and is
    /// awaited only when the result is assembled. If that task panics the
    /// fallback text is used.
    ///
    /// # Errors
    ///
    /// Returns an error only if the scan or analysis task panics.
    pub async fn run(
        &self,
        changes: &dyn ChangeSetProvider,
        advisor: Arc<dyn Advisor>,
        options: &RunOptions,
    ) -> Result<RunOutcome> {
        let changed = changes.changed_units(&options.base, &options.head).await;
        if changed.is_empty() {
            info!("No changed Java classes, nothing to select");
            return Ok(RunOutcome::default());
        }
        info!(changed = changed.len(), "Analyzing change impact");

        let source_dir = self.config.source_path(&self.project_root);
        let test_dir = self.config.test_path(&self.project_root);
        let base_package = self.config.base_package.clone();

        let (build, discovery) = tokio::task::spawn_blocking(move || {
            let sources = discover_java_files(&source_dir);
            let build = build_graph(&sources.files, &base_package);
            let tests = discover_java_files(&test_dir);
            (build, discover_tests(&tests.files))
        })
        .await?;
        let TestDiscovery {
            tests,
            failures: test_failures,
        } = discovery;
        let graph = Arc::new(build.graph);

        let timeout = self.config.advisory.timeout();
        let full_projection = GraphProjection::from_graph(&graph, &HashSet::new());
        let advisory =
            tokio::spawn(async move { advise(advisor.as_ref(), &full_projection, timeout).await });

        let analysis_graph = Arc::clone(&graph);
        let analysis_changed = changed.clone();
        let (analysis, report_projection) = tokio::task::spawn_blocking(move || {
            let exclusions = default_exclusions(&analysis_graph);
            debug!(excluded = exclusions.len(), "Excluding data carriers from cycle detection");
            let analysis = analyze(
                &analysis_graph,
                &analysis_changed,
                &tests,
                &exclusions,
            );
            let projection = GraphProjection::from_graph(&analysis_graph, &exclusions);
            (analysis, projection)
        })
        .await?;

        let advisory_text = match advisory.await {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Advisory task failed, using fallback text");
                FALLBACK_ADVISORY.to_string()
            }
        };
        let result = AnalysisResult::new(&analysis, advisory_text.clone());

        info!(
            impacted = analysis.impact.len(),
            tests = analysis.selection.len(),
            cycles = analysis.cycles.cycles.len(),
            "Analysis finished"
        );

        let report_path = if options.write_report {
            let report = Report::new(
                changed.iter().cloned(),
                &analysis,
                report_projection,
                advisory_text,
                ReportDiagnostics::from(&build.diagnostics),
            );
            report
                .write_logged(&self.config.report_path(&self.project_root))
                .await
        } else {
            None
        };

        Ok(RunOutcome {
            changed,
            analysis,
            result,
            build: build.diagnostics,
            test_failures,
            report_path,
        })
    }
}
