use super::state::{CANCELLED, COMPLETED, IDLE, NOTIFIED, QUEUED, RUNNING};
use crate::error::PromiseError;
use crate::promise::{Deferred, Promise};
use crate::scheduler::SchedulerHandle;

use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::task::{Context, Poll, Waker};

type TaskFuture<T> = Pin<Box<dyn Future<Output = Result<T, PromiseError>> + Send + 'static>>;

/// A spawned future together with the promise its output settles.
pub(crate) struct Task<T> {
    /// The future, or `None` once it completed or was cancelled.
    future: Mutex<Option<TaskFuture<T>>>,

    /// Current lifecycle state (IDLE, QUEUED, ...).
    state: AtomicUsize,

    /// Settled with the future's output.
    deferred: Deferred<T>,
}

impl<T: Clone + Send + 'static> Task<T> {
    /// Creates a task for `future`, queues its first run and returns the
    /// promise for its output.
    ///
    /// Cancelling the promise wakes the task so that its next run drops the
    /// future instead of polling it.
    pub(crate) fn spawn<F>(future: F, scheduler: SchedulerHandle) -> Promise<T>
    where
        F: Future<Output = Result<T, PromiseError>> + Send + 'static,
    {
        let deferred = Deferred::new(scheduler);
        let promise = deferred.promise().clone();

        let task = Arc::new(Task {
            future: Mutex::new(Some(Box::pin(future))),
            state: AtomicUsize::new(QUEUED),
            deferred,
        });

        let weak = Arc::downgrade(&task);
        promise.cancel_signal().add(move || {
            if let Some(task) = weak.upgrade() {
                task.notify();
            }
        });

        tracing::trace!("task spawned");
        task.schedule();

        promise
    }

    /// Pushes a run job for this task onto its loop.
    fn schedule(self: Arc<Self>) {
        let scheduler = self.deferred.promise().scheduler().clone();
        scheduler.queue(Box::new(move || self.run()));
    }

    /// Polls the future once.
    ///
    /// - cancelled promise: drops the future and stops,
    /// - `Poll::Pending`: goes back to IDLE, or re-queues if woken meanwhile,
    /// - `Poll::Ready`: drops the future and settles the promise.
    pub(crate) fn run(self: Arc<Self>) {
        let current = self.state.load(Ordering::Acquire);

        if current != QUEUED && current != NOTIFIED {
            return;
        }

        // RUNNING gives this call exclusive use of the future.
        if self
            .state
            .compare_exchange(current, RUNNING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }

        if self.deferred.promise().cancel_signal().is_fired() {
            self.future.lock().take();
            self.state.store(CANCELLED, Ordering::Release);
            tracing::trace!("task dropped after cancellation");
            return;
        }

        let waker = Waker::from(self.clone());
        let mut cx = Context::from_waker(&waker);

        let poll = {
            let mut slot = self.future.lock();

            let Some(future) = slot.as_mut() else {
                self.state.store(COMPLETED, Ordering::Release);
                return;
            };

            future.as_mut().poll(&mut cx)
        };

        match poll {
            Poll::Pending => {
                if self
                    .state
                    .compare_exchange(RUNNING, IDLE, Ordering::AcqRel, Ordering::Acquire)
                    .is_err()
                {
                    // Woken while running.
                    self.state.store(QUEUED, Ordering::Release);
                    self.schedule();
                }
            }
            Poll::Ready(outcome) => {
                self.future.lock().take();
                self.state.store(COMPLETED, Ordering::Release);

                tracing::trace!(ok = outcome.is_ok(), "task completed");
                self.deferred.settle(outcome);
            }
        }
    }

    /// Requests another run.
    ///
    /// IDLE tasks are queued; RUNNING tasks are marked NOTIFIED and re-queued
    /// when their poll returns. Anything else already has a run pending or is
    /// finished.
    pub(crate) fn notify(self: Arc<Self>) {
        loop {
            let state = self.state.load(Ordering::Acquire);

            match state {
                IDLE => {
                    if self
                        .state
                        .compare_exchange(IDLE, QUEUED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        self.schedule();
                        return;
                    }
                }
                RUNNING => {
                    if self
                        .state
                        .compare_exchange(RUNNING, NOTIFIED, Ordering::AcqRel, Ordering::Acquire)
                        .is_ok()
                    {
                        return;
                    }
                }
                _ => return,
            }
        }
    }
}
