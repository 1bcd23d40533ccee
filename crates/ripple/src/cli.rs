//! CLI argument parsing and execution.
//!
//! # Example
//!
//! ```bash
//! # Tests affected by the last commit
//! ripple path/to/project
//!
//! # Tests affected by a branch
//! ripple path/to/project --base origin/main --head HEAD
//!
//! # Tests affected by an explicit set of classes, without network access
//! ripple path/to/project --changed OrderRepository,Customer --no-advisory
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};

use crate::advisory::{Advisor, ChatCompletionsAdvisor, DisabledAdvisor};
use crate::app::{App, RunOptions, RunOutcome};
use crate::changes::{ChangeSetProvider, GitChangeSet, StaticChangeSet};

/// Ripple - change-impact test selection for Java projects
///
/// Prints the ids of the tests affected by a change, one per line, on stdout.
/// Diagnostics and the architecture summary go to stderr.
#[derive(Parser, Debug)]
#[command(name = "ripple")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Root of the project to analyze
    pub project_root: PathBuf,

    /// Base revision of the diff
    #[arg(long, default_value = "HEAD~1")]
    pub base: String,

    /// Head revision of the diff
    #[arg(long, default_value = "HEAD")]
    pub head: String,

    /// Changed class names, bypassing git (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub changed: Option<Vec<String>>,

    /// Configuration file (defaults to ripple.yaml in the project root)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Skip the architecture advisory call
    #[arg(long)]
    pub no_advisory: bool,

    /// Do not write the JSON report
    #[arg(long)]
    pub no_report: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Parse CLI arguments from command line
    #[must_use]
    pub fn parse_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Parse CLI arguments from an iterator (for testing)
    ///
    /// # Errors
    ///
    /// Returns the clap error for invalid arguments.
    pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(iter)
    }

    /// Log filter used when `RUST_LOG` is not set.
    #[must_use]
    pub fn default_log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "ripple=info,ripple_graph=warn",
            1 => "ripple=debug,ripple_graph=debug",
            _ => "ripple=trace,ripple_graph=trace",
        }
    }

    /// Run options derived from the arguments.
    #[must_use]
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            base: self.base.clone(),
            head: self.head.clone(),
            write_report: !self.no_report,
        }
    }

    /// Change-set provider for these arguments.
    #[must_use]
    pub fn change_set(&self) -> Box<dyn ChangeSetProvider> {
        match &self.changed {
            Some(names) => Box::new(StaticChangeSet::new(names.iter().cloned())),
            None => Box::new(GitChangeSet::new(&self.project_root)),
        }
    }

    /// Execute the analysis
    ///
    /// # Errors
    ///
    /// Returns an error if the project root is unreadable or the explicit
    /// configuration is invalid.
    pub async fn execute(&self) -> Result<RunOutcome> {
        let app = App::from_directory(&self.project_root, self.config.as_deref())
            .await
            .with_context(|| format!("cannot analyze {}", self.project_root.display()))?;

        let advisor: Arc<dyn Advisor> = if self.no_advisory {
            Arc::new(DisabledAdvisor::new("disabled by --no-advisory"))
        } else {
            match ChatCompletionsAdvisor::from_config(&app.config().advisory) {
                Ok(advisor) => Arc::new(advisor),
                Err(e) => Arc::new(DisabledAdvisor::new(e.to_string())),
            }
        };

        let changes = self.change_set();
        let outcome = app
            .run(changes.as_ref(), advisor, &self.run_options())
            .await?;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_compare_last_commit() {
        let cli = Cli::try_parse_from(["ripple", "project"]).unwrap();

        assert_eq!(cli.project_root, PathBuf::from("project"));
        assert_eq!(cli.base, "HEAD~1");
        assert_eq!(cli.head, "HEAD");
        assert!(cli.changed.is_none());
        assert!(cli.run_options().write_report);
        assert_eq!(cli.default_log_filter(), "ripple=info,ripple_graph=warn");
    }

    #[test]
    fn changed_list_is_comma_separated() {
        let cli = Cli::try_parse_from(["ripple", ".", "--changed", "Order,Customer", "--no-report"])
            .unwrap();

        assert_eq!(
            cli.changed,
            Some(vec!["Order".to_string(), "Customer".to_string()])
        );
        assert!(!cli.run_options().write_report);
    }

    #[test]
    fn verbosity_counts() {
        let cli = Cli::try_parse_from(["ripple", ".", "-vv"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.default_log_filter(), "ripple=trace,ripple_graph=trace");
    }

    #[test]
    fn project_root_is_required() {
        assert!(Cli::try_parse_from(["ripple"]).is_err());
    }

    #[tokio::test]
    async fn explicit_changes_bypass_git() {
        let cli = Cli::try_parse_from(["ripple", ".", "--changed", "Order"]).unwrap();

        let changed = cli.change_set().changed_units("x", "y").await;

        assert_eq!(changed.into_iter().collect::<Vec<_>>(), vec!["Order"]);
    }
}
