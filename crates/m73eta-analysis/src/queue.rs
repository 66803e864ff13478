//! Background analysis queue.
//!
//! Uploaded files are analysed one at a time on a dedicated worker task.
//! High-priority requests are served before queued low-priority ones, and
//! the running analysis can be aborted without discarding its work.

use crate::{AbortSignal, BaseAnalyzer, FilePreAnalyzer};
use m73eta_types::{AnalysisError, AnalysisOutcome, PrintMode};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

/// Unique identifier for a queued analysis.
pub type AnalysisJobId = Uuid;

/// Errors returned by [`AnalysisQueue`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// The worker has stopped and no longer accepts requests.
    #[error("Analysis queue is closed")]
    Closed,
}

/// An analysis that has left the queue.
#[derive(Debug)]
pub struct FinishedAnalysis {
    /// Identifier returned by [`AnalysisQueue::enqueue`].
    pub id: AnalysisJobId,
    /// The analysed file.
    pub path: PathBuf,
    /// Mode the file was analysed in.
    pub mode: PrintMode,
    /// What the analysis produced.
    pub outcome: AnalysisOutcome,
}

#[derive(Debug)]
struct Request {
    id: AnalysisJobId,
    path: PathBuf,
    high_priority: bool,
    mode: PrintMode,
}

type Current = Arc<Mutex<Option<(AnalysisJobId, AbortSignal)>>>;

/// Serial analysis queue backed by a tokio worker task.
#[derive(Debug)]
pub struct AnalysisQueue {
    high_tx: mpsc::UnboundedSender<Request>,
    low_tx: mpsc::UnboundedSender<Request>,
    current: Current,
    worker: JoinHandle<()>,
}

impl AnalysisQueue {
    /// Starts the worker on the current tokio runtime.
    ///
    /// Finished analyses are delivered on the returned receiver in the
    /// order they complete. Scans run on the blocking thread pool.
    #[must_use]
    pub fn spawn<B>(
        analyzer: Arc<FilePreAnalyzer<B>>,
    ) -> (Self, mpsc::UnboundedReceiver<FinishedAnalysis>)
    where
        B: BaseAnalyzer + Send + Sync + 'static,
    {
        let (high_tx, high_rx) = mpsc::unbounded_channel();
        let (low_tx, low_rx) = mpsc::unbounded_channel();
        let (finished_tx, finished_rx) = mpsc::unbounded_channel();
        let current: Current = Arc::new(Mutex::new(None));

        let worker = tokio::spawn(run_worker(
            analyzer,
            high_rx,
            low_rx,
            finished_tx,
            Arc::clone(&current),
        ));

        (
            Self {
                high_tx,
                low_tx,
                current,
                worker,
            },
            finished_rx,
        )
    }

    /// Queues a file for analysis.
    ///
    /// # Errors
    ///
    /// Returns [`QueueError::Closed`] if the worker has stopped.
    pub fn enqueue(
        &self,
        path: impl Into<PathBuf>,
        high_priority: bool,
        mode: PrintMode,
    ) -> Result<AnalysisJobId, QueueError> {
        let request = Request {
            id: Uuid::new_v4(),
            path: path.into(),
            high_priority,
            mode,
        };
        let id = request.id;

        let tx = if high_priority {
            &self.high_tx
        } else {
            &self.low_tx
        };
        tx.send(request).map_err(|_| QueueError::Closed)?;

        Ok(id)
    }

    /// Returns the id of the analysis currently running, if any.
    #[must_use]
    pub fn current(&self) -> Option<AnalysisJobId> {
        self.current
            .lock()
            .ok()
            .and_then(|current| current.as_ref().map(|(id, _)| *id))
    }

    /// Aborts the running analysis.
    ///
    /// The analysis stops at its next line boundary and is delivered as a
    /// partial result. Returns the id of the aborted analysis, if any.
    pub fn abort_current(&self) -> Option<AnalysisJobId> {
        let current = self.current.lock().ok()?;
        let (id, signal) = current.as_ref()?;
        signal.abort();
        info!(%id, "Aborting analysis");
        Some(*id)
    }

    /// Stops accepting requests and waits for queued ones to finish.
    pub async fn shutdown(self) {
        let Self {
            high_tx,
            low_tx,
            worker,
            ..
        } = self;
        drop(high_tx);
        drop(low_tx);

        if let Err(e) = worker.await {
            debug!("Analysis worker ended abnormally: {e}");
        }
    }
}

async fn run_worker<B>(
    analyzer: Arc<FilePreAnalyzer<B>>,
    mut high_rx: mpsc::UnboundedReceiver<Request>,
    mut low_rx: mpsc::UnboundedReceiver<Request>,
    finished_tx: mpsc::UnboundedSender<FinishedAnalysis>,
    current: Current,
) where
    B: BaseAnalyzer + Send + Sync + 'static,
{
    loop {
        let request = tokio::select! {
            biased;
            Some(request) = high_rx.recv() => request,
            Some(request) = low_rx.recv() => request,
            else => break,
        };

        let signal = AbortSignal::new();
        if let Ok(mut current) = current.lock() {
            *current = Some((request.id, signal.clone()));
        }
        debug!(id = %request.id, path = %request.path.display(), "Starting analysis");

        let task_analyzer = Arc::clone(&analyzer);
        let path = request.path.clone();
        let (high_priority, mode) = (request.high_priority, request.mode);
        let outcome = tokio::task::spawn_blocking(move || {
            task_analyzer.analyze(&path, high_priority, mode, &signal)
        })
        .await
        .unwrap_or_else(|e| {
            AnalysisOutcome::Failed(AnalysisError::Base {
                path: request.path.clone(),
                reason: format!("analysis task failed: {e}"),
            })
        });

        if let Ok(mut current) = current.lock() {
            *current = None;
        }

        let finished = FinishedAnalysis {
            id: request.id,
            path: request.path,
            mode: request.mode,
            outcome,
        };
        if finished_tx.send(finished).is_err() {
            debug!("Nobody is listening for finished analyses");
        }
    }
}
