//! Column extraction from comma-delimited files.
//!
//! Reads every record of a stream, picks one 1-based column and parses it
//! as `f64`. The first failure aborts the whole file: a partially read file
//! would silently skew the aggregate.

use crate::constants::FIELD_DELIMITER;
use crate::error::{AggregateError, Result};
use crate::models::ColumnIndex;

use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, trace};

/// Extracts one numeric column from CSV input
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnExtractor {
    column: ColumnIndex,
    skip_header: bool,
}

impl ColumnExtractor {
    /// Create an extractor for `column`; every row is treated as data
    pub fn new(column: ColumnIndex) -> Self {
        Self {
            column,
            skip_header: false,
        }
    }

    /// Drop the first row of each input before extraction
    pub fn with_skip_header(mut self, skip_header: bool) -> Self {
        self.skip_header = skip_header;
        self
    }

    pub fn column(&self) -> ColumnIndex {
        self.column
    }

    /// Open `path`, extract the column and release the handle.
    ///
    /// The handle is dropped on every return path. Errors reported by the
    /// operating system when the file is closed are not observed.
    pub fn extract_file(&self, path: &Path) -> Result<Vec<f64>> {
        let file = File::open(path).map_err(|e| AggregateError::file_open(path, e))?;
        let samples = self.extract(file, path)?;

        debug!("Extracted {} samples from {}", samples.len(), path.display());
        Ok(samples)
    }

    /// Extract the column from any reader; `source` is used in errors only
    pub fn extract<R: Read>(&self, reader: R, source: &Path) -> Result<Vec<f64>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(self.skip_header)
            .delimiter(FIELD_DELIMITER)
            .from_reader(reader);

        let mut samples = Vec::new();
        let mut record = StringRecord::new();

        while csv_reader
            .read_record(&mut record)
            .map_err(|e| AggregateError::from_csv(source, e))?
        {
            let row = record.position().map(|p| p.line()).unwrap_or_default();
            samples.push(self.parse_field(&record, row, source)?);
        }

        trace!(
            "Read {} rows of column {} from {}",
            samples.len(),
            self.column,
            source.display()
        );
        Ok(samples)
    }

    fn parse_field(&self, record: &StringRecord, row: u64, source: &Path) -> Result<f64> {
        let field = record
            .get(self.column.offset())
            .ok_or_else(|| AggregateError::MissingColumn {
                path: source.to_path_buf(),
                row,
                column: self.column.get(),
                width: record.len(),
            })?;

        field
            .parse::<f64>()
            .map_err(|e| AggregateError::NotNumber {
                path: source.to_path_buf(),
                row,
                column: self.column.get(),
                value: field.to_string(),
                source: e,
            })
    }
}
