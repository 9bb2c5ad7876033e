use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::error::{OutboxError, ProgressError};

type Write = Pin<Box<dyn Future<Output = Result<(), ProgressError>> + Send>>;

enum Job {
    Write { label: &'static str, write: Write },
    Flush(oneshot::Sender<usize>),
}

/// Fire-and-forget queue for progress writes.
///
/// `submit` returns immediately; the learner never waits on persistence. Writes
/// run one at a time on a single worker, in submission order, so a later
/// write never races an earlier one for the same record. A failed write is
/// logged and dropped, with no retry. Dropping the outbox aborts writes still
/// queued or in flight.
pub struct ProgressOutbox {
    jobs: mpsc::UnboundedSender<Job>,
    pending: Arc<AtomicUsize>,
    worker: JoinHandle<()>,
}

impl ProgressOutbox {
    #[must_use]
    pub fn new(handle: Handle) -> Self {
        let (jobs, queue) = mpsc::unbounded_channel();
        let pending = Arc::new(AtomicUsize::new(0));
        let worker = handle.spawn(drain(queue, Arc::clone(&pending)));
        Self {
            jobs,
            pending,
            worker,
        }
    }

    /// Outbox bound to the runtime the caller is running on.
    ///
    /// # Errors
    ///
    /// Returns `OutboxError::NoRuntime` outside a tokio runtime.
    pub fn current() -> Result<Self, OutboxError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|_| OutboxError::NoRuntime)
    }

    /// Queue `write` behind every write submitted before it. `label` names the write in logs.
    pub fn submit<F>(&self, label: &'static str, write: F)
    where
        F: Future<Output = Result<(), ProgressError>> + Send + 'static,
    {
        self.pending.fetch_add(1, Ordering::SeqCst);
        let job = Job::Write {
            label,
            write: Box::pin(write),
        };
        if self.jobs.send(job).is_err() {
            self.pending.fetch_sub(1, Ordering::SeqCst);
            tracing::warn!(write = label, "progress outbox stopped; write dropped");
        }
    }

    /// Writes queued or running.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Wait for every write submitted so far. Returns how many ran since the previous flush.
    ///
    /// # Errors
    ///
    /// Returns `OutboxError::Stopped` if the worker is gone.
    pub async fn flush(&self) -> Result<usize, OutboxError> {
        let (done, finished) = oneshot::channel();
        self.jobs
            .send(Job::Flush(done))
            .map_err(|_| OutboxError::Stopped)?;
        finished.await.map_err(|_| OutboxError::Stopped)
    }
}

impl Drop for ProgressOutbox {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

async fn drain(mut queue: mpsc::UnboundedReceiver<Job>, pending: Arc<AtomicUsize>) {
    let mut finished = 0;
    while let Some(job) = queue.recv().await {
        match job {
            Job::Write { label, write } => {
                match write.await {
                    Ok(()) => tracing::debug!(write = label, "progress write stored"),
                    Err(err) => {
                        tracing::warn!(write = label, error = %err, "progress write failed; dropped");
                    }
                }
                finished += 1;
                pending.fetch_sub(1, Ordering::SeqCst);
            }
            Job::Flush(done) => {
                let _ = done.send(std::mem::take(&mut finished));
            }
        }
    }
}
