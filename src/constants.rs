//! Application constants for the column aggregator
//!
//! Default flag values and pipeline sizing used across the CLI and the
//! worker pool.

// =============================================================================
// Command-Line Defaults
// =============================================================================

/// Operation used when `--op` is not given
pub const DEFAULT_OPERATION: &str = "sum";

/// Column used when `--col` is not given (1-based)
pub const DEFAULT_COLUMN: i64 = 1;

/// Field delimiter for input rows
pub const FIELD_DELIMITER: u8 = b',';

// =============================================================================
// Worker Pool Sizing
// =============================================================================

/// Upper bound on the worker pool, whatever the CPU count or `--workers` says
pub const MAX_WORKERS: usize = 256;

/// Capacity of the worker-to-merge channel, in file batches
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Default worker count: one per logical CPU
pub fn default_workers() -> usize {
    num_cpus::get().clamp(1, MAX_WORKERS)
}

// =============================================================================
// Logging
// =============================================================================

/// Target used in the default `EnvFilter` directive
pub const LOG_TARGET: &str = "column_aggregator";
