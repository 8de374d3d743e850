use super::queue::JobQueue;
use super::task::Task;
use crate::diagnostic::DiagnosticSink;
use crate::error::{PromiseError, SyncError};
use crate::promise::{Deferred, Promise};
use crate::scheduler::{Job, Scheduler, SchedulerHandle};

use std::cell::Cell;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// State shared by the loop and all of its handles.
pub(crate) struct Shared {
    queue: JobQueue,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl Scheduler for Shared {
    fn queue(&self, job: Job) {
        self.queue.push(job);
    }

    fn diagnostics(&self) -> &dyn DiagnosticSink {
        self.diagnostics.as_ref()
    }
}

/// A cooperative, single-threaded scheduler.
///
/// `EventLoop` is the [`Scheduler`] shipped with this crate. It owns a FIFO
/// job queue that any thread may feed through a [`LoopHandle`], and it runs
/// those jobs one at a time on whichever thread calls
/// [`run_until_idle`](Self::run_until_idle), [`block_on`](Self::block_on) or
/// [`run`](Self::run).
///
/// On top of plain jobs the loop drives `Send` futures: each
/// [`spawn`](Self::spawn)ed future becomes a task whose output settles a
/// [`Promise`].
///
/// The loop can be moved between threads but not shared by reference, so
/// jobs never run on two threads at once.
pub struct EventLoop {
    shared: Arc<Shared>,

    /// Upper bound for `block_on` and `run`.
    deadline: Duration,

    /// Longest single park while idle.
    park_interval: Duration,

    _not_sync: PhantomData<Cell<()>>,
}

impl EventLoop {
    /// Creates an event loop with the default configuration.
    ///
    /// Use [`EventLoopBuilder`](crate::EventLoopBuilder) to customize it.
    pub fn new() -> Self {
        super::EventLoopBuilder::new().build()
    }

    pub(crate) fn with_config(
        deadline: Duration,
        park_interval: Duration,
        diagnostics: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self {
            shared: Arc::new(Shared {
                queue: JobQueue::new(),
                diagnostics,
            }),
            deadline,
            park_interval,
            _not_sync: PhantomData,
        }
    }

    /// Returns a cloneable, thread-safe handle to this loop.
    pub fn handle(&self) -> LoopHandle {
        LoopHandle {
            shared: self.shared.clone(),
        }
    }

    /// Returns this loop as a type-erased scheduler.
    pub fn scheduler(&self) -> SchedulerHandle {
        self.shared.clone()
    }

    /// Creates a pending promise delivering through this loop.
    pub fn deferred<T: Clone + Send + 'static>(&self) -> Deferred<T> {
        Deferred::new(self.scheduler())
    }

    /// Spawns a future onto the loop. See [`LoopHandle::spawn`].
    pub fn spawn<F, T>(&self, future: F) -> Promise<T>
    where
        F: Future<Output = Result<T, PromiseError>> + Send + 'static,
        T: Clone + Send + 'static,
    {
        Task::spawn(future, self.scheduler())
    }

    /// Number of jobs waiting to run.
    pub fn pending_jobs(&self) -> usize {
        self.shared.queue.len()
    }

    /// Runs jobs until the queue is empty, including jobs queued while
    /// running. Returns how many jobs ran.
    pub fn run_until_idle(&self) -> usize {
        let mut ran = 0;

        while let Some(job) = self.shared.queue.pop() {
            job();
            ran += 1;
        }

        tracing::trace!(jobs = ran, "event loop idle");
        ran
    }

    /// Runs the loop until `promise` settles and returns its outcome.
    ///
    /// While the queue is empty the thread parks, waking up as soon as
    /// another thread queues work.
    ///
    /// # Errors
    ///
    /// - [`SyncError::Rejected`] if the promise failed,
    /// - [`SyncError::DeadlineElapsed`] if it did not settle within the
    ///   configured deadline.
    pub fn block_on<T>(&self, promise: &Promise<T>) -> Result<T, SyncError>
    where
        T: Clone + Send + 'static,
    {
        let deadline = Instant::now().checked_add(self.deadline);

        loop {
            if let Some(outcome) = promise.outcome() {
                return outcome.map_err(SyncError::from);
            }

            if let Some(job) = self.shared.queue.pop() {
                job();
                continue;
            }

            let now = Instant::now();

            if deadline.is_some_and(|deadline| now >= deadline) {
                tracing::warn!(deadline = ?self.deadline, "promise did not settle in time");
                return Err(SyncError::DeadlineElapsed(self.deadline));
            }

            // Either bound may be unrepresentable as an `Instant`.
            let wake_at = match (now.checked_add(self.park_interval), deadline) {
                (Some(wake_at), Some(deadline)) => Some(wake_at.min(deadline)),
                (wake_at, deadline) => wake_at.or(deadline),
            };

            self.shared.queue.park(wake_at);
        }
    }

    /// Spawns `future` and runs the loop until it completes.
    ///
    /// If the deadline elapses first, the task's promise is cancelled so the
    /// future is dropped the next time the loop runs.
    ///
    /// # Errors
    ///
    /// Same as [`block_on`](Self::block_on).
    pub fn run<F, T>(&self, future: F) -> Result<T, SyncError>
    where
        F: Future<Output = Result<T, PromiseError>> + Send + 'static,
        T: Clone + Send + 'static,
    {
        let promise = self.spawn(future);
        let result = self.block_on(&promise);

        if matches!(result, Err(SyncError::DeadlineElapsed(_))) {
            promise.cancel();
        }

        result
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

/// A thread-safe handle to an [`EventLoop`].
///
/// Handles queue work and create promises; they never run anything
/// themselves.
#[derive(Clone)]
pub struct LoopHandle {
    shared: Arc<Shared>,
}

impl LoopHandle {
    /// Returns the loop as a type-erased scheduler.
    pub fn scheduler(&self) -> SchedulerHandle {
        self.shared.clone()
    }

    /// Creates a pending promise delivering through the loop.
    pub fn deferred<T: Clone + Send + 'static>(&self) -> Deferred<T> {
        Deferred::new(self.scheduler())
    }

    /// Queues a job on the loop.
    pub fn queue<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.shared.queue.push(Box::new(job));
    }

    /// Spawns a future onto the loop and returns a promise for its output.
    ///
    /// The future is first polled when the loop next runs. Cancelling the
    /// returned promise stops the task at its next poll boundary: the future
    /// is dropped without being polled again.
    pub fn spawn<F, T>(&self, future: F) -> Promise<T>
    where
        F: Future<Output = Result<T, PromiseError>> + Send + 'static,
        T: Clone + Send + 'static,
    {
        Task::spawn(future, self.scheduler())
    }
}

impl std::fmt::Debug for LoopHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoopHandle")
            .field("pending_jobs", &self.shared.queue.len())
            .finish()
    }
}
