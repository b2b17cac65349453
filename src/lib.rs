//! Column Aggregator Library
//!
//! Computes the sum or average of one column across many comma-delimited
//! files. Input paths are expanded by a recursive directory walk, files are
//! parsed concurrently by a bounded worker pool, and the samples are merged
//! at a single point before being reduced.
//!
//! The run is all-or-nothing: the first file that cannot be opened, read or
//! parsed stops the pool and becomes the result of the run.
//!
//! ```no_run
//! use column_aggregator::{AggregatorConfig, ColumnIndex, OperationKind};
//! use column_aggregator::processor::{ColumnProcessor, discovery::discover_files};
//! use std::path::PathBuf;
//!
//! # async fn example() -> column_aggregator::Result<()> {
//! let files = discover_files(&[PathBuf::from("data")])?;
//! let config = AggregatorConfig::default()
//!     .with_column(ColumnIndex::new(2)?)
//!     .with_operation(OperationKind::Average);
//!
//! let outcome = ColumnProcessor::new(config).aggregate(files).await?;
//! println!("{}", outcome.value);
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod config;
pub mod constants;
pub mod error;
pub mod extractor;
pub mod models;
pub mod processor;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use config::AggregatorConfig;
pub use error::{AggregateError, Result};
pub use extractor::ColumnExtractor;
pub use models::{AggregateOutcome, ColumnIndex, ConsolidatedSeries, OperationKind, RunStats};
