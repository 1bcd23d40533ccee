//! Output formatting for the CLI.
//!
//! Selected test ids are the only thing written to stdout, one per line, so
//! that the output can be piped straight into a test runner. Everything
//! meant for humans goes to stderr.

use std::io::{self, Write};

use colored::Colorize;
use tracing::warn;

use crate::app::RunOutcome;

/// Write the summary to `diagnostics` and the test ids to `out`.
///
/// A failed summary write is logged and does not stop the test ids from
/// being written.
///
/// # Errors
///
/// Returns an error only if writing the test ids fails.
pub fn write_run<O: Write, D: Write>(
    out: &mut O,
    diagnostics: &mut D,
    outcome: &RunOutcome,
) -> io::Result<()> {
    if let Err(e) = write_summary(diagnostics, outcome) {
        warn!(error = %e, "Could not write run summary");
    }
    write_tests(out, outcome)?;
    out.flush()
}

/// Write selected test ids, one per line.
pub fn write_tests<W: Write>(w: &mut W, outcome: &RunOutcome) -> io::Result<()> {
    for test in outcome.selected_tests() {
        writeln!(w, "{test}")?;
    }
    Ok(())
}

/// Write the human-facing run summary.
pub fn write_summary<W: Write>(w: &mut W, outcome: &RunOutcome) -> io::Result<()> {
    if outcome.changed.is_empty() {
        writeln!(w, "{}", "No changed Java classes; no tests selected.".dimmed())?;
        return Ok(());
    }

    writeln!(w, "{}", "Architecture analysis".bold())?;

    let cycles = &outcome.analysis.cycles.cycles;
    if cycles.is_empty() {
        writeln!(w, "  {} no dependency cycles", "✓".green())?;
    } else {
        for cycle in cycles {
            writeln!(w, "  {} cycle: {}", "⚠".yellow(), cycle.to_string().yellow())?;
        }
    }

    writeln!(
        w,
        "  {} changed, {} impacted, {} tests selected",
        outcome.changed.len().to_string().cyan(),
        outcome.analysis.impact.len().to_string().cyan(),
        outcome.analysis.selection.len().to_string().cyan(),
    )?;

    let build = &outcome.build;
    let skipped = build.parse_failures.len() + outcome.test_failures.len();
    if skipped > 0 {
        writeln!(w, "  {} {skipped} files skipped (parse errors)", "✗".red())?;
    }
    if !build.duplicates.is_empty() {
        writeln!(
            w,
            "  {} {} duplicate class names rejected",
            "✗".red(),
            build.duplicates.len()
        )?;
    }

    if let Some(path) = &outcome.report_path {
        writeln!(w, "  report: {}", path.display().to_string().dimmed())?;
    }

    Ok(())
}
