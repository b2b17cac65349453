//! Run configuration and validation.
//!
//! Built from command-line flags only; there is no configuration file.
//! Validation happens here so that a bad column, operation or worker count
//! is reported before any path is walked or opened.

use crate::constants::{MAX_WORKERS, default_workers};
use crate::error::{AggregateError, Result};
use crate::models::{ColumnIndex, OperationKind};
use tracing::debug;

/// Settings for one aggregation run
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatorConfig {
    /// Column to extract from every row
    pub column: ColumnIndex,

    /// Reduction applied to the consolidated series
    pub operation: OperationKind,

    /// Maximum number of files processed at once
    pub workers: usize,

    /// Drop the first row of every file before extraction
    pub skip_header: bool,

    /// Draw a progress bar on stderr while files are processed
    pub show_progress: bool,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            column: ColumnIndex::default(),
            operation: OperationKind::default(),
            workers: default_workers(),
            skip_header: false,
            show_progress: false,
        }
    }
}

impl AggregatorConfig {
    /// Validate raw flag values and build a configuration.
    ///
    /// The column is checked first, then the operation, then the worker
    /// count.
    pub fn from_flags(operation: &str, column: i64, workers: Option<usize>) -> Result<Self> {
        let column = ColumnIndex::new(column)?;
        let operation: OperationKind = operation.parse()?;

        let config = Self {
            column,
            operation,
            workers: workers.unwrap_or_else(default_workers),
            ..Self::default()
        };
        config.validate()?;

        debug!(
            "Configuration: op={}, col={}, workers={}",
            config.operation, config.column, config.workers
        );
        Ok(config)
    }

    /// Check invariants that the type system does not cover
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 || self.workers > MAX_WORKERS {
            return Err(AggregateError::InvalidWorkers {
                workers: self.workers,
                max: MAX_WORKERS,
            });
        }
        Ok(())
    }

    pub fn with_column(mut self, column: ColumnIndex) -> Self {
        self.column = column;
        self
    }

    pub fn with_operation(mut self, operation: OperationKind) -> Self {
        self.operation = operation;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_skip_header(mut self, skip_header: bool) -> Self {
        self.skip_header = skip_header;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Pool size for `file_count` files: never more workers than files
    pub fn pool_size(&self, file_count: usize) -> usize {
        self.workers.min(file_count).max(1)
    }
}
