//! Command-line argument definitions for the column aggregator
//!
//! Defines the CLI interface using the clap derive API. Flag values are
//! kept raw here and validated by [`Args::to_config`], so that a bad column
//! or operation is reported through the library error type.

use crate::config::AggregatorConfig;
use crate::constants::{DEFAULT_COLUMN, DEFAULT_OPERATION};
use crate::Result;
use clap::Parser;
use std::path::PathBuf;

/// Sum or average one column across many CSV files
///
/// Directories are walked recursively and every file found is processed.
/// Files are parsed concurrently by a bounded pool of workers; the first
/// unreadable file or non-numeric value stops the run.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "column_aggregator",
    version,
    about = "Sum or average a column across CSV files",
    long_about = "Computes the sum or average of one column over every row of every input file. \
                  Input paths may be files or directories; directories are walked recursively. \
                  Files are processed concurrently and the first error aborts the run."
)]
pub struct Args {
    /// Files or directories to process
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Operation to execute
    #[arg(
        long = "op",
        value_name = "OPERATION",
        default_value = DEFAULT_OPERATION,
        help = "Operation to execute: sum or avg"
    )]
    pub operation: String,

    /// CSV column on which to execute the operation (1-based)
    #[arg(
        long = "col",
        value_name = "COLUMN",
        default_value_t = DEFAULT_COLUMN,
        allow_negative_numbers = true,
        help = "CSV column on which to execute the operation (1-based)"
    )]
    pub column: i64,

    /// Number of files processed concurrently
    ///
    /// Defaults to the number of logical CPUs.
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        help = "Number of files processed concurrently (default: CPU count)"
    )]
    pub workers: Option<usize>,

    /// Treat the first row of every file as a header and skip it
    #[arg(long = "skip-header", help = "Skip the first row of every file")]
    pub skip_header: bool,

    /// Show a progress bar on stderr
    #[arg(long = "progress", help = "Show a progress bar on stderr")]
    pub progress: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only log errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        conflicts_with = "verbose",
        help = "Only log errors"
    )]
    pub quiet: bool,
}

impl Args {
    /// Validate flags and build the run configuration.
    ///
    /// Touches no files, so bad flags fail before discovery starts.
    pub fn to_config(&self) -> Result<AggregatorConfig> {
        Ok(
            AggregatorConfig::from_flags(&self.operation, self.column, self.workers)?
                .with_skip_header(self.skip_header)
                .with_progress(self.progress && !self.quiet),
        )
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}
