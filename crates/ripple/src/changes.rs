//! Change-set providers.
//!
//! A change set is the set of simple class names whose source changed
//! between two revisions. Providers never fail: anything that prevents
//! computing the diff is logged and reported as an empty set.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Source of changed class names.
#[async_trait]
pub trait ChangeSetProvider: Send + Sync {
    /// Class names changed between `base` and `head`.
    async fn changed_units(&self, base: &str, head: &str) -> BTreeSet<String>;
}

/// Change set from `git diff --name-only` in the project root.
#[derive(Debug, Clone)]
pub struct GitChangeSet {
    repo_root: PathBuf,
}

impl GitChangeSet {
    /// Create a provider for the repository at `repo_root`.
    #[must_use]
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }

    /// Repository the diff runs in.
    #[must_use]
    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }
}

#[async_trait]
impl ChangeSetProvider for GitChangeSet {
    async fn changed_units(&self, base: &str, head: &str) -> BTreeSet<String> {
        debug!(base, head, repo = %self.repo_root.display(), "Running git diff");

        let output = match Command::new("git")
            .args(["diff", "--name-only", base, head])
            .current_dir(&self.repo_root)
            .output()
            .await
        {
            Ok(output) => output,
            Err(e) => {
                warn!(error = %e, "Could not run git, treating change set as empty");
                return BTreeSet::new();
            }
        };

        if !output.status.success() {
            warn!(
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "git diff failed, treating change set as empty"
            );
            return BTreeSet::new();
        }

        let Ok(stdout) = String::from_utf8(output.stdout) else {
            warn!("git diff output is not UTF-8, treating change set as empty");
            return BTreeSet::new();
        };

        let changed = java_stems(&stdout);
        info!(base, head, changed = changed.len(), "Computed change set");
        changed
    }
}

/// Explicit change set, independent of any revisions.
#[derive(Debug, Clone, Default)]
pub struct StaticChangeSet {
    units: BTreeSet<String>,
}

impl StaticChangeSet {
    /// Create a provider returning exactly these names.
    #[must_use]
    pub fn new<I, S>(units: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            units: units
                .into_iter()
                .map(Into::into)
                .map(|s: String| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}

#[async_trait]
impl ChangeSetProvider for StaticChangeSet {
    async fn changed_units(&self, _base: &str, _head: &str) -> BTreeSet<String> {
        self.units.clone()
    }
}

/// File stems of the `.java` paths in `git diff --name-only` output.
#[must_use]
pub fn java_stems(diff_output: &str) -> BTreeSet<String> {
    diff_output
        .lines()
        .map(str::trim)
        .filter(|line| line.ends_with(".java"))
        .filter_map(|line| Path::new(line).file_stem().and_then(|s| s.to_str()))
        .map(ToString::to_string)
        .collect()
}
