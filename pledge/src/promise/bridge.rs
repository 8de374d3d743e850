use super::{Deferred, Promise, Wait};
use crate::cancel::{CancelScope, CancelSignal};
use crate::error::PromiseError;

use std::future::IntoFuture;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// A cancellable suspension point over a [`Deferred`].
///
/// The bridge carries the one-shot callback pair a callback-style or
/// suspending producer needs ([`resume`](Self::resume) and
/// [`resume_with_error`](Self::resume_with_error)), and a caller can suspend
/// on it with [`wait`](Self::wait) or `.await`.
///
/// Cancellation is symmetric and travels exactly one hop each way:
/// - cancelling the promise cancels the bridge,
/// - cancelling the bridge, or the [`CancelScope`] it was created in,
///   cancels the promise.
///
/// Both directions go through one-shot signals, so the round trip
/// terminates after each side has fired once.
///
/// Created with [`Deferred::bridge`].
pub struct SuspensionBridge<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    deferred: Deferred<T>,

    /// Fired when the bridge is cancelled.
    cancel: CancelSignal,

    /// Set by the first resume.
    resumed: AtomicBool,
}

impl<T: Clone + Send + 'static> SuspensionBridge<T> {
    pub(crate) fn new(deferred: Deferred<T>, scope: &CancelScope) -> Self {
        let inner = Arc::new(Inner {
            deferred,
            cancel: CancelSignal::new(),
            resumed: AtomicBool::new(false),
        });

        // Bridge -> promise.
        let promise = inner.deferred.promise().clone();
        inner.cancel.add(move || promise.cancel());

        // Promise -> bridge. Weak, so a settled promise does not keep the
        // bridge alive.
        let weak = Arc::downgrade(&inner);
        inner.deferred.on_cancel(move || {
            if let Some(inner) = weak.upgrade() {
                inner.cancel.fire();
            }
        });

        // Enclosing scope -> bridge. The scope holds the bridge only while
        // the promise is pending.
        let scoped = inner.clone();
        let key = scope.signal().register(move || {
            scoped.cancel.fire();
        });

        if let Some(key) = key {
            let signal = Arc::downgrade(scope.signal());
            inner.deferred.promise().cell.on_settle(move || {
                if let Some(signal) = signal.upgrade() {
                    signal.remove(key);
                }
            });
        }

        Self { inner }
    }

    /// Resumes the suspension with a value, resolving the promise.
    ///
    /// Only the first resume of either kind has an effect.
    pub fn resume(&self, value: T) {
        if !self.inner.resumed.swap(true, Ordering::AcqRel) {
            self.inner.deferred.resolve(value);
        }
    }

    /// Resumes the suspension with a failure, rejecting the promise.
    pub fn resume_with_error(&self, error: PromiseError) {
        if !self.inner.resumed.swap(true, Ordering::AcqRel) {
            self.inner.deferred.reject(error);
        }
    }

    /// Cancels the bridge and, through it, the promise.
    pub fn cancel(&self) {
        if self.inner.cancel.fire() {
            tracing::debug!("suspension bridge cancelled");
        }
    }

    /// Returns `true` once the bridge has been cancelled from either side.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancel.is_fired()
    }

    /// Runs `listener` when the bridge is cancelled, or right away if it
    /// already was.
    pub fn on_cancel<F>(&self, listener: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.inner.cancel.add(listener);
    }

    /// The promise behind the bridge.
    pub fn promise(&self) -> &Promise<T> {
        self.inner.deferred.promise()
    }

    /// Suspends until the promise settles.
    pub fn wait(&self) -> Wait<T> {
        self.promise().wait()
    }
}

impl<T> Clone for SuspensionBridge<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone + Send + 'static> IntoFuture for SuspensionBridge<T> {
    type Output = Result<T, PromiseError>;
    type IntoFuture = Wait<T>;

    fn into_future(self) -> Self::IntoFuture {
        self.wait()
    }
}
