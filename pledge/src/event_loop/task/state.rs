//! Lifecycle states of a spawned task, stored in an `AtomicUsize`.

/// Waiting for a wake-up; not in the loop's queue.
pub(crate) const IDLE: usize = 0;

/// A run job for the task sits in the loop's queue.
pub(crate) const QUEUED: usize = 1;

/// The future is being polled.
pub(crate) const RUNNING: usize = 2;

/// The future returned `Poll::Ready` and has been dropped.
pub(crate) const COMPLETED: usize = 3;

/// Woken while running; re-queued once the current poll returns.
pub(crate) const NOTIFIED: usize = 4;

/// The task's promise was cancelled and the future dropped unfinished.
pub(crate) const CANCELLED: usize = 5;
