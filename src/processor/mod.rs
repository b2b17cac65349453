//! Concurrent aggregation engine.
//!
//! Fans files out to a bounded pool of workers and fans their batches back
//! into a single merge point, which owns the consolidated series. The first
//! error stops the pool and is returned as the result of the run.

pub mod discovery;
pub mod worker;

#[cfg(test)]
pub mod tests;

use self::worker::{WorkerEvent, work_queue, worker_task};

use crate::config::AggregatorConfig;
use crate::constants::EVENT_CHANNEL_CAPACITY;
use crate::error::{AggregateError, Result};
use crate::extractor::ColumnExtractor;
use crate::models::{AggregateOutcome, ConsolidatedSeries, RunStats};

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Aggregates one column across many files with a bounded worker pool
#[derive(Debug, Clone)]
pub struct ColumnProcessor {
    config: AggregatorConfig,
    cancellation_token: CancellationToken,
}

impl ColumnProcessor {
    /// Create a processor for `config`
    pub fn new(config: AggregatorConfig) -> Self {
        Self {
            config,
            cancellation_token: CancellationToken::new(),
        }
    }

    /// Stop the run when `token` is cancelled (e.g. on Ctrl-C)
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = token;
        self
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Process `files` and reduce the merged samples with the configured
    /// operation. Nothing is reduced if any file fails.
    pub async fn aggregate(&self, files: Vec<PathBuf>) -> Result<AggregateOutcome> {
        let (series, stats) = self.collect_series(files).await?;
        let value = series.reduce(self.config.operation)?;

        info!(
            "{} of {} samples from {} files: {}",
            self.config.operation, stats.samples_collected, stats.files_processed, value
        );

        Ok(AggregateOutcome {
            value,
            operation: self.config.operation,
            stats,
        })
    }

    /// Extract the configured column from every file and merge the samples.
    ///
    /// The merge loop distinguishes three events: a batch arrived, an error
    /// arrived, and every worker finished (all senders dropped). On the first
    /// error the remaining workers are cancelled and the error is returned.
    ///
    /// Batches are slotted by input position and concatenated only after the
    /// last worker finished, so the series is in input order whatever the
    /// pool size.
    pub async fn collect_series(
        &self,
        files: Vec<PathBuf>,
    ) -> Result<(ConsolidatedSeries, RunStats)> {
        self.config.validate()?;
        if files.is_empty() {
            return Err(AggregateError::NoInputFiles);
        }

        let start_time = Instant::now();
        let file_count = files.len();
        let pool_size = self.config.pool_size(file_count);

        info!(
            "Processing {} files with {} workers (column {}, {})",
            file_count, pool_size, self.config.column, self.config.operation
        );

        let extractor =
            ColumnExtractor::new(self.config.column).with_skip_header(self.config.skip_header);
        let queue = work_queue(files);
        let shutdown = self.cancellation_token.child_token();
        let (sender, mut receiver) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let mut workers = JoinSet::new();
        for worker_id in 0..pool_size {
            workers.spawn(worker_task(
                worker_id,
                queue.clone(),
                extractor,
                sender.clone(),
                shutdown.clone(),
            ));
        }
        // Only workers hold senders now, so the channel closes when the last
        // one exits.
        drop(sender);

        let progress = self.progress_bar(file_count);
        let mut batches: Vec<Vec<f64>> = vec![Vec::new(); file_count];
        let mut files_processed = 0;

        loop {
            tokio::select! {
                biased;
                _ = self.cancellation_token.cancelled() => {
                    warn!("Run cancelled with {} of {} files merged", files_processed, file_count);
                    shutdown.cancel();
                    workers.abort_all();
                    progress.abandon();
                    return Err(AggregateError::interrupted(
                        "cancelled before all files were processed",
                    ));
                }
                event = receiver.recv() => match event {
                    Some(WorkerEvent::Batch { index, path, samples }) => {
                        debug!("Merging {} samples from {}", samples.len(), path.display());
                        batches[index] = samples;
                        files_processed += 1;
                        progress.inc(1);
                    }
                    Some(WorkerEvent::Failed(error)) => {
                        warn!("Stopping workers after error: {}", error);
                        shutdown.cancel();
                        workers.abort_all();
                        progress.abandon();
                        return Err(error);
                    }
                    None => break,
                },
            }
        }

        // All senders are gone; a worker that panicked shows up here
        while let Some(joined) = workers.join_next().await {
            let delivered = joined?;
            debug!("Worker delivered {} files", delivered);
        }
        progress.finish_and_clear();

        let series = ConsolidatedSeries::from_batches(batches);
        let stats = RunStats {
            files_processed,
            samples_collected: series.len(),
            workers: pool_size,
            processing_time: start_time.elapsed(),
        };

        info!(
            "Merged {} samples from {} files in {:.2}s ({:.1} files/sec)",
            stats.samples_collected,
            stats.files_processed,
            stats.processing_time.as_secs_f64(),
            stats.files_per_second()
        );

        Ok((series, stats))
    }

    /// Aggregate `files` and write the value to `out`, followed by a newline.
    ///
    /// The value is written only when every file was processed successfully.
    pub async fn run<W: Write>(
        &self,
        files: Vec<PathBuf>,
        out: &mut W,
    ) -> Result<AggregateOutcome> {
        let outcome = self.aggregate(files).await?;
        writeln!(out, "{}", outcome.value)?;
        out.flush()?;
        Ok(outcome)
    }

    fn progress_bar(&self, file_count: usize) -> ProgressBar {
        if !self.config.show_progress {
            return ProgressBar::hidden();
        }

        let progress =
            ProgressBar::with_draw_target(Some(file_count as u64), ProgressDrawTarget::stderr());
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
        {
            progress.set_style(style.progress_chars("#>-"));
        }
        progress
    }
}

/// Aggregate `files` with `config` and write the value to `out`
pub async fn run<W: Write>(
    files: Vec<PathBuf>,
    config: AggregatorConfig,
    out: &mut W,
) -> Result<AggregateOutcome> {
    ColumnProcessor::new(config).run(files, out).await
}
