use super::{Promise, SuspensionBridge};
use crate::cancel::CancelScope;
use crate::error::PromiseError;
use crate::scheduler::SchedulerHandle;

/// The write side of a [`Promise`].
///
/// A `Deferred` may be cloned and moved to any call site that needs to
/// complete the promise. Completion is first-writer-wins: after the first
/// [`resolve`](Self::resolve), [`reject`](Self::reject) or cancellation,
/// every further attempt is ignored. In particular, resolving after the
/// consumer cancelled is harmless.
///
/// # Examples
///
/// ```rust,ignore
/// let deferred = Deferred::<String>::new(event_loop.scheduler());
/// let promise = deferred.promise().clone();
///
/// std::thread::spawn(move || deferred.resolve("done".into()));
///
/// assert_eq!(event_loop.block_on(&promise)?, "done");
/// ```
pub struct Deferred<T> {
    promise: Promise<T>,
}

impl<T: Clone + Send + 'static> Deferred<T> {
    /// Creates a pending promise bound to `scheduler` and returns its
    /// producer handle.
    pub fn new(scheduler: SchedulerHandle) -> Self {
        Self {
            promise: Promise::pending(scheduler),
        }
    }

    /// The promise this handle completes.
    pub fn promise(&self) -> &Promise<T> {
        &self.promise
    }

    /// Resolves the promise with `value`, unless it already settled.
    pub fn resolve(&self, value: T) {
        if self.promise.cell.complete(Ok(value)) {
            tracing::trace!("promise resolved");
        }
    }

    /// Rejects the promise with `error`, unless it already settled.
    pub fn reject(&self, error: PromiseError) {
        if self.promise.cell.complete(Err(error)) {
            tracing::trace!("promise rejected");
        }
    }

    /// Completes the promise from a `Result`.
    pub fn settle(&self, outcome: Result<T, PromiseError>) {
        match outcome {
            Ok(value) => self.resolve(value),
            Err(error) => self.reject(error),
        }
    }

    /// Cancels the promise. See [`Promise::cancel`].
    pub fn cancel(&self) {
        self.promise.cancel();
    }

    /// Returns `true` once cancellation of the promise was requested.
    ///
    /// Producers doing long-running work should check this, or register
    /// with [`on_cancel`](Self::on_cancel), to stop early.
    pub fn is_cancelled(&self) -> bool {
        self.promise.cancel_signal().is_fired()
    }

    /// Runs `listener` when cancellation is requested, or right away if it
    /// already was.
    ///
    /// Listeners run while the promise is still pending, so a producer may
    /// still resolve or reject it from here.
    pub fn on_cancel<F>(&self, listener: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.promise.cancel_signal().add(listener);
    }

    /// Creates a suspension bridge tied to `scope`.
    ///
    /// The bridge and the promise cancel each other: cancelling the promise
    /// cancels the bridge, and cancelling the bridge (directly or through
    /// `scope`) cancels the promise. Each side is cancelled at most once.
    pub fn bridge(&self, scope: &CancelScope) -> SuspensionBridge<T> {
        SuspensionBridge::new(self.clone(), scope)
    }
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            promise: self.promise.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> std::fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deferred")
            .field("promise", &self.promise)
            .finish()
    }
}
