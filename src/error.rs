//! Error handling for column aggregation runs.
//!
//! Every variant is terminal for a run: validation failures are raised
//! before any file is touched, I/O and parse failures stop the worker pool
//! and are reported with the offending file and row.

use std::num::ParseFloatError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AggregateError {
    #[error("No input files")]
    NoInputFiles,

    #[error("Invalid column number: {column} (columns are numbered from 1)")]
    InvalidColumn { column: i64 },

    #[error("Invalid operation: '{operation}' (expected 'sum' or 'avg')")]
    InvalidOperation { operation: String },

    #[error("Invalid worker count: {workers} (must be between 1 and {max})")]
    InvalidWorkers { workers: usize, max: usize },

    #[error("Cannot open file {path}: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// I/O failure on a handle that opened successfully. Close errors are
    /// lost when the handle is dropped and never reach this variant.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Data is not numeric in file {path}, row {row}, column {column}: '{value}' ({source})")]
    NotNumber {
        path: PathBuf,
        row: u64,
        column: usize,
        value: String,
        #[source]
        source: ParseFloatError,
    },

    #[error("Column {column} missing in file {path}, row {row}: record has {width} fields")]
    MissingColumn {
        path: PathBuf,
        row: u64,
        column: usize,
        width: usize,
    },

    #[error("Malformed CSV in file {path}: {source}")]
    MalformedCsv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Directory traversal failed: {0}")]
    Traversal(#[from] walkdir::Error),

    #[error("Cannot average an empty series")]
    EmptySeries,

    #[error("Worker task failed: {0}")]
    WorkerFailed(#[from] tokio::task::JoinError),

    #[error("Processing interrupted: {reason}")]
    Interrupted { reason: String },

    #[error("Failed to write result: {0}")]
    Output(#[from] std::io::Error),
}

impl AggregateError {
    /// Create a file open error for `path`
    pub fn file_open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileOpen {
            path: path.into(),
            source,
        }
    }

    /// Classify a `csv` reader error: I/O failures on an open handle become
    /// `FileRead`, everything else is a structural problem with the data.
    pub fn from_csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        let path = path.into();
        if source.is_io_error() {
            Self::FileRead {
                path,
                source: std::io::Error::from(source),
            }
        } else {
            Self::MalformedCsv { path, source }
        }
    }

    /// Create an interrupted error
    pub fn interrupted(reason: impl Into<String>) -> Self {
        Self::Interrupted {
            reason: reason.into(),
        }
    }

    /// True for errors raised while validating flags, before any I/O
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidColumn { .. } | Self::InvalidOperation { .. } | Self::InvalidWorkers { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, AggregateError>;
