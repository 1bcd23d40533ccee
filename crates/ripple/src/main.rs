//! Ripple CLI binary.

use std::io;
use std::process::ExitCode;

use colored::Colorize;
use ripple::cli::Cli;
use ripple::output::write_run;
use tracing_subscriber::EnvFilter;

/// Main entry point for the ripple CLI.
///
/// A single current-thread runtime drives the run; CPU-bound work is moved
/// to the blocking pool by the app itself.
#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse_args();

    // RUST_LOG wins over -v
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(cli.default_log_filter())),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    tracing::debug!("Starting ripple");

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let outcome = cli.execute().await?;

    write_run(&mut io::stdout().lock(), &mut io::stderr().lock(), &outcome)?;

    tracing::debug!("Ripple completed successfully");
    Ok(())
}
