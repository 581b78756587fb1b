//! Bounded admission for compilation jobs.
//!
//! Compilers run their work on the host's worker thread pool; the queue
//! admits at most `threadpool − 1` renders at a time so one thread stays
//! free for filesystem tasks.

use std::future::Future;
use std::sync::{Arc, OnceLock};

use tokio::sync::Semaphore;
use tracing::debug;

/// Environment variable controlling the assumed thread-pool size.
pub const THREADPOOL_ENV: &str = "SASSIFRAGE_THREADPOOL_SIZE";

/// Thread-pool size assumed when the environment does not say otherwise.
const DEFAULT_THREADPOOL_SIZE: usize = 4;

static SHARED: OnceLock<Arc<RenderQueue>> = OnceLock::new();

/// A FIFO queue that caps how many renders run at once.
///
/// Explicitly constructed and injectable: tests build isolated queues with
/// custom limits, hosts that want the one-queue-per-process behavior use
/// [`RenderQueue::shared`].
pub struct RenderQueue {
    limit: usize,
    slots: Arc<Semaphore>,
}

impl RenderQueue {
    /// A queue admitting at most `limit` concurrent jobs (floored at 1).
    pub fn new(limit: usize) -> Self {
        let limit = limit.max(1);
        Self {
            limit,
            slots: Arc::new(Semaphore::new(limit)),
        }
    }

    /// A queue sized from the environment: `max(1, threadpool − 1)`.
    pub fn from_env() -> Self {
        Self::new(concurrency_limit(
            std::env::var(THREADPOOL_ENV).ok().as_deref(),
        ))
    }

    /// The process-wide queue, sized from the environment exactly once.
    pub fn shared() -> Arc<RenderQueue> {
        SHARED
            .get_or_init(|| Arc::new(RenderQueue::from_env()))
            .clone()
    }

    /// Number of concurrency slots.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Run `job` once a slot is free.
    ///
    /// Admission is FIFO among waiters, queue depth is unbounded, and the
    /// slot is released the moment the job completes, success or failure
    /// alike. The job is not polled before admission.
    pub async fn submit<T>(&self, job: impl Future<Output = T>) -> T {
        // The semaphore lives as long as the queue and is never closed.
        let _slot = self
            .slots
            .clone()
            .acquire_owned()
            .await
            .expect("render queue semaphore closed");
        debug!(available = self.slots.available_permits(), "render job admitted");
        job.await
    }
}

/// Concurrency limit for a given thread-pool setting: pool size minus one,
/// floored at 1 so the queue always admits work.
fn concurrency_limit(threadpool: Option<&str>) -> usize {
    let size = threadpool
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .unwrap_or(DEFAULT_THREADPOOL_SIZE);
    size.saturating_sub(1).max(1)
}
