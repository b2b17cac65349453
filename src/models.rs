//! Data models for column aggregation.
//!
//! Contains the validated flag types (operation and column), the merged
//! sample series, and the statistics reported for a run.

use crate::aggregate;
use crate::error::{AggregateError, Result};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Aggregate operation selected with `--op`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationKind {
    #[default]
    Sum,
    Average,
}

impl OperationKind {
    /// Reduce `samples` with this operation
    pub fn apply(&self, samples: &[f64]) -> Result<f64> {
        match self {
            OperationKind::Sum => Ok(aggregate::sum(samples)),
            OperationKind::Average => aggregate::average(samples),
        }
    }

    /// Flag spelling of the operation
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Sum => "sum",
            OperationKind::Average => "avg",
        }
    }
}

impl FromStr for OperationKind {
    type Err = AggregateError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sum" => Ok(OperationKind::Sum),
            "avg" => Ok(OperationKind::Average),
            other => Err(AggregateError::InvalidOperation {
                operation: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 1-based column position, guaranteed to be at least 1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColumnIndex(usize);

impl ColumnIndex {
    /// Validate a raw column number as given on the command line
    pub fn new(column: i64) -> Result<Self> {
        if column < 1 {
            return Err(AggregateError::InvalidColumn { column });
        }
        usize::try_from(column)
            .map(ColumnIndex)
            .map_err(|_| AggregateError::InvalidColumn { column })
    }

    /// The 1-based position
    pub fn get(&self) -> usize {
        self.0
    }

    /// Zero-based offset into a record
    pub fn offset(&self) -> usize {
        self.0 - 1
    }
}

impl Default for ColumnIndex {
    fn default() -> Self {
        ColumnIndex(1)
    }
}

impl fmt::Display for ColumnIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// All samples merged from every processed file.
///
/// Only the merge point of the worker pool holds one of these, so appends
/// never race.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConsolidatedSeries {
    samples: Vec<f64>,
}

impl ConsolidatedSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Concatenate per-file batches in the order given
    pub fn from_batches(batches: impl IntoIterator<Item = Vec<f64>>) -> Self {
        let mut series = Self::new();
        for batch in batches {
            series.extend(batch);
        }
        series
    }

    /// Append one file's batch
    pub fn extend(&mut self, batch: Vec<f64>) {
        if self.samples.is_empty() {
            self.samples = batch;
        } else {
            self.samples.extend(batch);
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.samples
    }

    /// Consume the series and reduce it
    pub fn reduce(self, operation: OperationKind) -> Result<f64> {
        operation.apply(&self.samples)
    }
}

/// Statistics for a single aggregation run
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Files whose samples were merged
    pub files_processed: usize,
    /// Samples in the consolidated series
    pub samples_collected: usize,
    /// Size of the worker pool actually spawned
    pub workers: usize,
    /// Wall time from first dispatch to the all-done signal
    pub processing_time: Duration,
}

impl RunStats {
    /// Calculate files processed per second
    pub fn files_per_second(&self) -> f64 {
        if self.processing_time.as_secs_f64() > 0.0 {
            self.files_processed as f64 / self.processing_time.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Final value of a run together with its statistics
#[derive(Debug, Clone)]
pub struct AggregateOutcome {
    pub value: f64,
    pub operation: OperationKind,
    pub stats: RunStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_parsing() {
        assert_eq!("sum".parse::<OperationKind>().unwrap(), OperationKind::Sum);
        assert_eq!(
            "avg".parse::<OperationKind>().unwrap(),
            OperationKind::Average
        );

        for invalid in ["", "SUM", "average", "max", " sum"] {
            match invalid.parse::<OperationKind>() {
                Err(AggregateError::InvalidOperation { operation }) => {
                    assert_eq!(operation, invalid)
                }
                other => panic!("Expected InvalidOperation for {invalid:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_operation_display_round_trips_flag() {
        assert_eq!(OperationKind::Sum.to_string(), "sum");
        assert_eq!(OperationKind::Average.to_string(), "avg");
    }

    #[test]
    fn test_column_index_validation() {
        let column = ColumnIndex::new(3).unwrap();
        assert_eq!(column.get(), 3);
        assert_eq!(column.offset(), 2);

        for invalid in [0, -1, i64::MIN] {
            match ColumnIndex::new(invalid) {
                Err(AggregateError::InvalidColumn { column }) => assert_eq!(column, invalid),
                other => panic!("Expected InvalidColumn for {invalid}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_consolidated_series_accumulates_batches() {
        let mut series = ConsolidatedSeries::new();
        assert!(series.is_empty());

        series.extend(vec![1.0, 2.0]);
        series.extend(Vec::new());
        series.extend(vec![3.0]);

        assert_eq!(series.len(), 3);
        assert_eq!(series.as_slice(), &[1.0, 2.0, 3.0]);
        assert_eq!(series.reduce(OperationKind::Sum).unwrap(), 6.0);
    }

    #[test]
    fn test_series_from_batches_keeps_batch_order() {
        let series = ConsolidatedSeries::from_batches(vec![vec![3.0], Vec::new(), vec![1.0, 2.0]]);
        assert_eq!(series.as_slice(), &[3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_files_per_second_zero_time() {
        let stats = RunStats {
            files_processed: 10,
            ..Default::default()
        };
        assert_eq!(stats.files_per_second(), 0.0);
    }
}
