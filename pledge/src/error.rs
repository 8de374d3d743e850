//! Error types surfaced by promises and by the event loop.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

/// The failure a promise settles with.
///
/// A single failure may be delivered to many handlers, so the producer's
/// cause is kept behind an `Arc` and the whole error is cheap to clone.
#[derive(Debug, Clone, Error)]
pub enum PromiseError {
    /// The promise, or a bridge wired to it, was cancelled.
    ///
    /// Cancellation never triggers the unhandled-rejection diagnostic.
    #[error("promise was cancelled")]
    Cancelled,

    /// A failure reported by the producer. The cause is opaque to the core.
    #[error("{0}")]
    Other(Arc<dyn Error + Send + Sync + 'static>),
}

impl PromiseError {
    /// Wraps a producer error.
    pub fn other<E>(error: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        Self::Other(Arc::new(error))
    }

    /// Builds a producer error from a plain message.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::other(Message(message.into()))
    }

    /// Returns `true` for [`PromiseError::Cancelled`].
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    /// The producer's original cause, if this is not a cancellation.
    pub fn cause(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        match self {
            Self::Cancelled => None,
            Self::Other(cause) => Some(cause.as_ref()),
        }
    }

    /// Attempts to view the original cause as a concrete error type.
    pub fn downcast_ref<E: Error + 'static>(&self) -> Option<&E> {
        self.cause()?.downcast_ref::<E>()
    }
}

/// Cause used by [`PromiseError::msg`].
#[derive(Debug, Error)]
#[error("{0}")]
struct Message(String);

/// Errors returned by the blocking entry points of the event loop.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The loop ran out of time before the promise settled.
    #[error("promise did not settle within {0:?}")]
    DeadlineElapsed(Duration),

    /// The promise settled with a failure.
    #[error(transparent)]
    Rejected(#[from] PromiseError),
}

impl SyncError {
    /// Returns `true` if the promise settled as cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Rejected(PromiseError::Cancelled))
    }
}
