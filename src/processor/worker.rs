//! Worker tasks for the file-processing pool
//!
//! Each worker pulls paths from a shared queue, extracts the configured
//! column on the blocking thread pool and reports one event per file to the
//! merge point. Workers never touch the consolidated series.

use crate::error::{AggregateError, Result};
use crate::extractor::ColumnExtractor;

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, mpsc};
use tokio::task;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Shared queue of files waiting for a worker, tagged with their position
/// in the input list
pub type WorkQueue = Arc<Mutex<VecDeque<(usize, PathBuf)>>>;

/// Build a queue holding `files` in dispatch order
pub fn work_queue(files: Vec<PathBuf>) -> WorkQueue {
    Arc::new(Mutex::new(files.into_iter().enumerate().collect()))
}

/// What a worker reports to the merge point for a single file
#[derive(Debug)]
pub enum WorkerEvent {
    /// All samples of one file; `index` is the file's position in the input
    Batch {
        index: usize,
        path: PathBuf,
        samples: Vec<f64>,
    },
    /// Processing a file failed; the worker stops after sending this
    Failed(AggregateError),
}

/// Process files from `queue` until it is empty, the run is cancelled, an
/// error occurs, or the merge point stops listening.
///
/// Returns the number of files whose batches were delivered.
pub async fn worker_task(
    worker_id: usize,
    queue: WorkQueue,
    extractor: ColumnExtractor,
    sender: mpsc::Sender<WorkerEvent>,
    cancellation_token: CancellationToken,
) -> usize {
    let mut files_processed = 0;

    debug!("Worker {} started", worker_id);

    loop {
        if cancellation_token.is_cancelled() {
            debug!("Worker {} cancelled", worker_id);
            break;
        }

        let (index, path) = {
            let mut queue = queue.lock().await;
            match queue.pop_front() {
                Some(entry) => entry,
                None => {
                    debug!("Worker {} finished - no more files", worker_id);
                    break;
                }
            }
        };

        debug!("Worker {} processing file: {}", worker_id, path.display());

        let event = match process_file(extractor, path.clone()).await {
            Ok(samples) => WorkerEvent::Batch {
                index,
                path,
                samples,
            },
            Err(e) => WorkerEvent::Failed(e),
        };
        let failed = matches!(event, WorkerEvent::Failed(_));

        if sender.send(event).await.is_err() {
            debug!("Worker {} channel closed, stopping", worker_id);
            break;
        }
        if failed {
            break;
        }
        files_processed += 1;
    }

    debug!("Worker {} completed {} files", worker_id, files_processed);
    files_processed
}

/// Run the extractor for one file off the async executor
async fn process_file(extractor: ColumnExtractor, path: PathBuf) -> Result<Vec<f64>> {
    task::spawn_blocking(move || extractor.extract_file(&path)).await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ColumnIndex;
    use std::fs;
    use tempfile::TempDir;

    fn write_files(temp_dir: &TempDir, contents: &[(&str, &str)]) -> Vec<PathBuf> {
        contents
            .iter()
            .map(|(name, body)| {
                let path = temp_dir.path().join(name);
                fs::write(&path, body).unwrap();
                path
            })
            .collect()
    }

    #[tokio::test]
    async fn test_worker_drains_queue() {
        let temp_dir = TempDir::new().unwrap();
        let files = write_files(&temp_dir, &[("a.csv", "1\n2\n"), ("b.csv", "3\n")]);

        let (tx, mut rx) = mpsc::channel(8);
        let processed = worker_task(
            0,
            work_queue(files),
            ColumnExtractor::new(ColumnIndex::default()),
            tx,
            CancellationToken::new(),
        )
        .await;

        assert_eq!(processed, 2);

        let mut batches = Vec::new();
        while let Some(event) = rx.recv().await {
            match event {
                WorkerEvent::Batch { index, samples, .. } => batches.push((index, samples)),
                WorkerEvent::Failed(e) => panic!("Unexpected failure: {e}"),
            }
        }
        assert_eq!(batches, vec![(0, vec![1.0, 2.0]), (1, vec![3.0])]);
    }

    #[tokio::test]
    async fn test_worker_stops_after_first_error() {
        let temp_dir = TempDir::new().unwrap();
        let files = write_files(
            &temp_dir,
            &[("bad.csv", "oops\n"), ("good.csv", "1\n")],
        );

        let queue = work_queue(files);
        let (tx, mut rx) = mpsc::channel(8);
        let processed = worker_task(
            0,
            queue.clone(),
            ColumnExtractor::new(ColumnIndex::default()),
            tx,
            CancellationToken::new(),
        )
        .await;

        assert_eq!(processed, 0);
        assert!(matches!(
            rx.recv().await,
            Some(WorkerEvent::Failed(AggregateError::NotNumber { .. }))
        ));
        assert!(rx.recv().await.is_none());

        // The remaining file was never taken from the queue
        assert_eq!(queue.lock().await.len(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_worker_takes_no_files() {
        let temp_dir = TempDir::new().unwrap();
        let files = write_files(&temp_dir, &[("a.csv", "1\n")]);

        let token = CancellationToken::new();
        token.cancel();

        let (tx, mut rx) = mpsc::channel(8);
        let processed = worker_task(
            0,
            work_queue(files),
            ColumnExtractor::new(ColumnIndex::default()),
            tx,
            token,
        )
        .await;

        assert_eq!(processed, 0);
        assert!(rx.recv().await.is_none());
    }
}
