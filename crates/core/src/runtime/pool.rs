use crate::error::{CodescoutError, Result};
use rayon::{ThreadPool, ThreadPoolBuilder};

/// Shared worker pool backing scans, searches, and async tree lookups.
///
/// Submission returns immediately; the job runs on an arbitrary worker
/// thread. There is no cancellation: a caller that no longer wants a result
/// discards it when its callback fires.
pub struct WorkerPool {
    inner: ThreadPool,
}

impl WorkerPool {
    /// Pool sized to `max(2, available cores)`.
    pub fn new() -> Result<Self> {
        Self::with_workers(default_worker_count())
    }

    pub fn with_workers(count: usize) -> Result<Self> {
        let inner = ThreadPoolBuilder::new()
            .num_threads(count.max(1))
            .thread_name(|i| format!("codescout-worker-{i}"))
            .build()
            .map_err(|e| CodescoutError::Internal(format!("worker pool: {e}")))?;
        Ok(Self { inner })
    }

    /// Submit a unit of work. Never blocks the calling thread.
    pub fn run(&self, job: impl FnOnce() + Send + 'static) {
        self.inner.spawn(job);
    }

    pub fn workers(&self) -> usize {
        self.inner.current_num_threads()
    }
}

fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(2)
        .max(2)
}
