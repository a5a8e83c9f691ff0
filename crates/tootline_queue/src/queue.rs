//! The FIFO request scheduler.

use crate::{QueueConfig, RateLimits};
use derive_getters::Getters;
use futures::future::BoxFuture;
use serde_json::Value as JsonValue;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tokio::sync::{Mutex, Notify, oneshot};
use tokio::task::JoinHandle;
use tootline_error::{QueueError, QueueErrorKind, TootlineError};
use tracing::{debug, warn};

/// Outcome of one unit of queued work.
pub type TaskResult = Result<JsonValue, TootlineError>;

/// A unit of work submitted to the queue: typically one network call.
pub type TaskFuture = BoxFuture<'static, TaskResult>;

struct QueuedTask {
    work: TaskFuture,
    settle: oneshot::Sender<TaskResult>,
    enqueued_at: Instant,
}

struct Inner {
    config: QueueConfig,
    tasks: Mutex<VecDeque<QueuedTask>>,
    notify: Arc<Notify>,
    limits: RateLimits,
    in_flight: AtomicBool,
}

/// Read-only introspection of the queue, no side effects.
#[derive(Debug, Clone, Getters)]
pub struct QueueStatus {
    /// Number of tasks waiting for dispatch.
    queue_length: usize,
    /// Remaining rate-limit budget.
    rate_limit_remaining: u32,
    /// Rate-limit reset instant as epoch seconds.
    rate_limit_reset: u64,
    /// Whether a task is currently executing.
    processing: bool,
    /// Requests made in the current rate-limit window.
    requests_made: u32,
}

/// FIFO scheduler that serializes all outbound calls to one server.
///
/// A single consumer task pops work in submission order, so exactly one
/// request is in flight at a time and rate-limit accounting stays exact.
/// Before each task the worker consults the shared [`RateLimits`]; with the
/// budget exhausted and the reset in the future it suspends until reset, then
/// restores the default budget and resumes. A fixed inter-request delay keeps
/// the client from bursting the upstream server.
///
/// Admission is bounded: once `max_depth` tasks are pending, further
/// [`RequestQueue::add`] calls fail immediately with a queue-overflow error.
/// A background sweep rejects tasks that have waited longer than the expiry
/// window, so abandoned callers cannot grow the queue without bound.
///
/// # Example
///
/// ```rust,ignore
/// let queue = Arc::new(RequestQueue::new(QueueConfig::default()));
/// let body = queue.add(Box::pin(async { Ok(json!({"id": "1"})) })).await?;
/// queue.shutdown().await;
/// ```
pub struct RequestQueue {
    inner: Arc<Inner>,
    worker: JoinHandle<()>,
    sweeper: JoinHandle<()>,
}

impl RequestQueue {
    /// Create a queue and spawn its worker and expiry-sweep tasks.
    ///
    /// Must be called within a tokio runtime.
    pub fn new(config: QueueConfig) -> Self {
        let limits = RateLimits::new(*config.default_budget());
        let notify = limits.waker();
        let inner = Arc::new(Inner {
            config,
            tasks: Mutex::new(VecDeque::new()),
            notify,
            limits,
            in_flight: AtomicBool::new(false),
        });
        let worker = tokio::spawn(run_worker(Arc::clone(&inner)));
        let sweeper = tokio::spawn(run_sweeper(Arc::clone(&inner)));
        Self {
            inner,
            worker,
            sweeper,
        }
    }

    /// Enqueue `work` and wait for its result.
    ///
    /// Fails immediately with [`QueueErrorKind::Overflow`] when the queue
    /// already holds its maximum of pending tasks; callers must handle the
    /// rejection, it is never queued. If the queue is shut down before the
    /// task runs, the call fails with [`QueueErrorKind::Shutdown`].
    pub async fn add(&self, work: TaskFuture) -> TaskResult {
        let (settle, settled) = oneshot::channel();
        {
            let mut tasks = self.inner.tasks.lock().await;
            if tasks.len() >= *self.inner.config.max_depth() {
                warn!(
                    depth = tasks.len(),
                    "rejecting request: queue at capacity"
                );
                return Err(QueueError::new(QueueErrorKind::Overflow).into());
            }
            tasks.push_back(QueuedTask {
                work,
                settle,
                enqueued_at: Instant::now(),
            });
        }
        self.inner.notify.notify_one();

        match settled.await {
            Ok(result) => result,
            Err(_) => Err(QueueError::new(QueueErrorKind::Shutdown).into()),
        }
    }

    /// Update the shared rate-limit budget from upstream headers.
    ///
    /// A positive remainder wakes the worker if it was idle or waiting. The
    /// window size stays at its last known value; use
    /// [`RateLimits::update`] directly to report a new per-window limit.
    pub async fn update_rate_limits(&self, remaining: u32, reset_epoch: u64) {
        self.inner.limits.update(remaining, reset_epoch, None).await;
    }

    /// Handle to the shared rate-limit state.
    pub fn limits(&self) -> RateLimits {
        self.inner.limits.clone()
    }

    /// Snapshot of queue depth, budget, and processing state.
    pub async fn status(&self) -> QueueStatus {
        let queue_length = self.inner.tasks.lock().await.len();
        let limits = self.inner.limits.snapshot().await;
        QueueStatus {
            queue_length,
            rate_limit_remaining: *limits.remaining(),
            rate_limit_reset: *limits.reset_epoch(),
            processing: self.inner.in_flight.load(Ordering::SeqCst),
            requests_made: *limits.requests_made(),
        }
    }

    /// Stop the worker and sweep tasks and discard pending work.
    ///
    /// Pending tasks are dropped without settling cleanly: their callers
    /// observe a [`QueueErrorKind::Shutdown`] error, and a task already
    /// dispatched to the network is cancelled mid-flight.
    pub async fn shutdown(&self) {
        self.worker.abort();
        self.sweeper.abort();
        let dropped = {
            let mut tasks = self.inner.tasks.lock().await;
            let dropped = tasks.len();
            tasks.clear();
            dropped
        };
        self.inner.in_flight.store(false, Ordering::SeqCst);
        debug!(dropped, "request queue shut down");
    }
}

impl Drop for RequestQueue {
    fn drop(&mut self) {
        self.worker.abort();
        self.sweeper.abort();
    }
}

impl std::fmt::Debug for RequestQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestQueue")
            .field("config", self.inner.config())
            .finish_non_exhaustive()
    }
}

// Single consumer: only this loop pops tasks, which is what guarantees both
// FIFO order and the one-in-flight invariant.
async fn run_worker(inner: Arc<Inner>) {
    loop {
        let task = { inner.tasks.lock().await.pop_front() };
        let Some(task) = task else {
            inner.notify.notified().await;
            continue;
        };

        // Tasks can expire between sweeps; re-check at dispatch.
        if task.enqueued_at.elapsed() > inner.config.task_expiry() {
            let _ = task
                .settle
                .send(Err(QueueError::new(QueueErrorKind::Timeout).into()));
            continue;
        }

        // Suspend while the budget is exhausted and the reset lies ahead. A
        // header update with a positive remainder wakes the loop early.
        while let Some(wait) = inner.limits.wait_duration().await {
            debug!(wait_ms = wait.as_millis() as u64, "waiting for rate limit reset");
            tokio::select! {
                _ = tokio::time::sleep(wait) => inner.limits.restore().await,
                _ = inner.notify.notified() => {}
            }
        }

        inner.in_flight.store(true, Ordering::SeqCst);
        let result = task.work.await;
        inner.in_flight.store(false, Ordering::SeqCst);
        let _ = task.settle.send(result);

        tokio::time::sleep(inner.config.inter_request_delay()).await;
    }
}

// Liveness safeguard against abandoned callers, not a cancellation API.
async fn run_sweeper(inner: Arc<Inner>) {
    let mut interval = tokio::time::interval(inner.config.sweep_interval());
    interval.tick().await; // the first tick fires immediately
    loop {
        interval.tick().await;

        let expired = {
            let mut tasks = inner.tasks.lock().await;
            let mut kept = VecDeque::with_capacity(tasks.len());
            let mut expired = Vec::new();
            while let Some(task) = tasks.pop_front() {
                if task.enqueued_at.elapsed() > inner.config.task_expiry() {
                    expired.push(task);
                } else {
                    kept.push_back(task);
                }
            }
            *tasks = kept;
            expired
        };

        if !expired.is_empty() {
            warn!(count = expired.len(), "rejecting requests queued too long");
        }
        for task in expired {
            let _ = task
                .settle
                .send(Err(QueueError::new(QueueErrorKind::Timeout).into()));
        }
    }
}

impl Inner {
    fn config(&self) -> &QueueConfig {
        &self.config
    }
}
