use super::cell::ResultCell;
use super::wait::Wait;
use crate::cancel::CancelSignal;
use crate::error::PromiseError;
use crate::scheduler::SchedulerHandle;

use std::future::IntoFuture;
use std::sync::Arc;

/// The read side of a single-assignment asynchronous result.
///
/// A `Promise` starts pending and settles exactly once, either with a value
/// or with a [`PromiseError`]. Only the first completion has an effect; any
/// later resolve, reject or cancel is silently ignored.
///
/// Observers attach either with callbacks ([`on_success`](Self::on_success),
/// [`on_success_and_failure`](Self::on_success_and_failure)) or by awaiting
/// the promise. Callbacks are never run on the stack that completes the
/// promise: once settled, each pending callback is handed to the promise's
/// [`Scheduler`](crate::Scheduler) in registration order.
///
/// Cloning a promise yields another handle to the same result.
///
/// # Examples
///
/// ```rust,ignore
/// let deferred = event_loop.deferred::<u32>();
/// let promise = deferred.promise();
///
/// promise.on_success(|value| println!("got {value}"));
/// deferred.resolve(5);
///
/// // Nothing has printed yet; the loop delivers the value.
/// event_loop.run_until_idle();
/// ```
pub struct Promise<T> {
    pub(crate) cell: Arc<ResultCell<T>>,
}

impl<T: Clone + Send + 'static> Promise<T> {
    pub(crate) fn pending(scheduler: SchedulerHandle) -> Self {
        Self {
            cell: Arc::new(ResultCell::new(scheduler)),
        }
    }

    /// Creates a promise that is already resolved with `value`.
    pub fn resolved(scheduler: SchedulerHandle, value: T) -> Self {
        let promise = Self::pending(scheduler);
        promise.cell.complete(Ok(value));
        promise
    }

    /// Creates a promise that is already rejected with `error`.
    ///
    /// Since nothing can be attached yet, a non-cancellation error is
    /// reported to the scheduler's diagnostic sink.
    pub fn rejected(scheduler: SchedulerHandle, error: PromiseError) -> Self {
        let promise = Self::pending(scheduler);
        promise.cell.complete(Err(error));
        promise
    }

    /// Registers a success handler.
    ///
    /// If the promise already resolved, the handler is scheduled right away.
    /// If it fails, the handler is never called.
    pub fn on_success<F>(&self, handler: F)
    where
        F: FnOnce(T) + Send + 'static,
    {
        self.cell.on_success(Box::new(handler));
    }

    /// Registers a pair of handlers; exactly one of them will be scheduled
    /// once the promise settles.
    pub fn on_success_and_failure<S, E>(&self, on_success: S, on_failure: E)
    where
        S: FnOnce(T) + Send + 'static,
        E: FnOnce(PromiseError) + Send + 'static,
    {
        self.cell
            .on_success_and_failure(Box::new(on_success), Box::new(on_failure));
    }

    /// Requests cancellation.
    ///
    /// If the promise is still pending, its [`CancelSignal`] fires first and
    /// the promise is then rejected with [`PromiseError::Cancelled`]. A
    /// listener that completes the promise from inside the signal wins over
    /// the cancellation. Cancelling a settled promise does nothing. Running
    /// producer code is not interrupted; it has to observe the signal itself.
    pub fn cancel(&self) {
        self.cell.cancel();
    }

    /// Returns `true` once the promise has settled.
    pub fn is_completed(&self) -> bool {
        self.cell.is_completed()
    }

    /// Returns `true` if the promise settled as cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.cell.is_cancelled()
    }

    /// A snapshot of the outcome, or `None` while pending.
    pub fn outcome(&self) -> Option<Result<T, PromiseError>> {
        self.cell.outcome()
    }

    /// The signal fired when this promise is cancelled.
    pub fn cancel_signal(&self) -> &CancelSignal {
        self.cell.cancel_signal()
    }

    /// The scheduler this promise delivers through.
    pub fn scheduler(&self) -> &SchedulerHandle {
        self.cell.scheduler()
    }

    /// Returns a future resolving to this promise's outcome.
    ///
    /// Equivalent to `promise.clone().await`.
    pub fn wait(&self) -> Wait<T> {
        Wait::new(self.clone())
    }
}

impl<T> Clone for Promise<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> IntoFuture for Promise<T> {
    type Output = Result<T, PromiseError>;
    type IntoFuture = Wait<T>;

    fn into_future(self) -> Self::IntoFuture {
        Wait::new(self)
    }
}

impl<T: Clone + Send + 'static> std::fmt::Debug for Promise<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.cell.outcome() {
            None => "pending",
            Some(Ok(_)) => "resolved",
            Some(Err(PromiseError::Cancelled)) => "cancelled",
            Some(Err(_)) => "rejected",
        };

        f.debug_struct("Promise").field("state", &state).finish()
    }
}
