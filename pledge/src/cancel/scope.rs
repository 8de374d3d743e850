use super::CancelSignal;

use std::sync::Arc;

/// An enclosing cancellation scope.
///
/// Suspension bridges created with [`Deferred::bridge`](crate::Deferred::bridge)
/// are tied to a scope: cancelling the scope cancels every live bridge in it,
/// and through each bridge the promise behind it. A bridge detaches from its
/// scope as soon as its promise settles.
///
/// Cloning a scope yields another handle to the same scope.
#[derive(Debug, Clone)]
pub struct CancelScope {
    signal: Arc<CancelSignal>,
}

impl CancelScope {
    /// Creates a scope that has not been cancelled.
    pub fn new() -> Self {
        Self {
            signal: Arc::new(CancelSignal::new()),
        }
    }

    /// Cancels the scope. Only the first call has an effect.
    pub fn cancel(&self) {
        if self.signal.fire() {
            tracing::debug!("cancel scope cancelled");
        }
    }

    /// Returns `true` once the scope has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.signal.is_fired()
    }

    /// Number of listeners still attached to the scope.
    ///
    /// A bridge stays attached only while its promise is pending.
    pub fn listener_count(&self) -> usize {
        self.signal.listener_count()
    }

    pub(crate) fn signal(&self) -> &Arc<CancelSignal> {
        &self.signal
    }

    /// Runs `listener` when the scope is cancelled, or right away if it
    /// already was.
    pub fn on_cancel<F>(&self, listener: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.signal.add(listener);
    }
}

impl Default for CancelScope {
    fn default() -> Self {
        Self::new()
    }
}
