//! Source file discovery.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Directories that never contain project sources.
const EXCLUDED_DIRS: &[&str] = &["target", "build", "out", "node_modules"];

/// Result of scanning one source root.
#[derive(Debug, Default, Clone)]
pub struct ScanOutcome {
    /// `.java` files, sorted
    pub files: Vec<PathBuf>,
    /// Directories that could not be read, with the reason
    pub directories_skipped: Vec<(PathBuf, String)>,
}

/// Collect every `.java` file under `dir`.
///
/// Hidden entries and build output directories are skipped. A missing root
/// yields an empty outcome with a warning.
#[must_use]
pub fn discover_java_files(dir: &Path) -> ScanOutcome {
    let mut outcome = ScanOutcome::default();

    if !dir.is_dir() {
        warn!(directory = %dir.display(), "Source directory not found, nothing to scan");
        return outcome;
    }

    walk_dir(dir, &mut outcome);
    outcome.files.sort();

    debug!(
        directory = %dir.display(),
        files = outcome.files.len(),
        skipped = outcome.directories_skipped.len(),
        "Scanned source directory"
    );
    outcome
}

/// Depth-first walk over package directories.
///
/// Subdirectories are queued on an explicit stack, so deep package trees
/// never grow the call stack. Order does not matter here; the caller sorts.
fn walk_dir(root: &Path, outcome: &mut ScanOutcome) {
    let mut pending = vec![root.to_path_buf()];

    while let Some(package_dir) = pending.pop() {
        let listing = match std::fs::read_dir(&package_dir) {
            Ok(listing) => listing,
            Err(e) => {
                warn!(
                    package_dir = %package_dir.display(),
                    error = %e,
                    "Unreadable package directory, its sources are ignored"
                );
                outcome
                    .directories_skipped
                    .push((package_dir, e.to_string()));
                continue;
            }
        };

        for path in listing.filter_map(|entry| entry.ok().map(|e| e.path())) {
            if !should_visit(&path) {
                continue;
            }
            if path.is_dir() {
                pending.push(path);
            } else if is_java_file(&path) && path.is_file() {
                outcome.files.push(path);
            }
        }
    }
}

/// Hidden entries and build output never hold sources.
fn should_visit(path: &Path) -> bool {
    match path.file_name().and_then(|n| n.to_str()) {
        Some(name) => !name.starts_with('.') && !is_excluded_dir(name),
        None => true,
    }
}

fn is_excluded_dir(name: &str) -> bool {
    EXCLUDED_DIRS.contains(&name)
}

/// Whether the path names a Java source file.
#[must_use]
pub fn is_java_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("java")
}
