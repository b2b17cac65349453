//! Command implementation for the column aggregator CLI
//!
//! Ties flag validation, file discovery and the worker pool together, and
//! sets up logging for the binary.

use crate::cli::args::Args;
use crate::constants::LOG_TARGET;
use crate::error::{AggregateError, Result};
use crate::models::AggregateOutcome;
use crate::processor::ColumnProcessor;
use crate::processor::discovery::discover_files;

use std::io::Write;
use tokio::task;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Run one aggregation as described by `args` and write the value to `out`.
///
/// Flags are validated before any path is walked. Nothing is written to
/// `out` unless every discovered file was processed.
pub async fn run<W: Write>(
    args: Args,
    cancellation_token: CancellationToken,
    out: &mut W,
) -> Result<AggregateOutcome> {
    let config = args.to_config()?;

    let paths = args.paths.clone();
    let files = task::spawn_blocking(move || discover_files(&paths)).await??;
    info!(
        "Discovered {} files from {} paths",
        files.len(),
        args.paths.len()
    );

    if files.is_empty() {
        return Err(AggregateError::NoInputFiles);
    }

    ColumnProcessor::new(config)
        .with_cancellation(cancellation_token)
        .run(files, out)
        .await
}

/// Set up structured logging on stderr based on CLI arguments
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={}", LOG_TARGET, log_level)));

    // try_init: a subscriber may already be installed (tests)
    let initialized = if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    if initialized.is_ok() {
        debug!("Logging initialized at level: {}", log_level);
    }
}
