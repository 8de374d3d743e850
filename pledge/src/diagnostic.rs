//! Reporting of promises that fail with nobody listening.
//!
//! A rejection is "unobserved" when, at the moment the promise fails, no
//! failure handler has been attached yet and the failure is not a
//! cancellation. The report is best-effort: a handler attached right after
//! still receives the error.
//!
//! The destination of these reports is pluggable through [`DiagnosticSink`],
//! so embedding systems can redirect them and tests can assert on them.

use crate::error::PromiseError;

use parking_lot::Mutex;

/// Destination for unobserved-rejection reports.
pub trait DiagnosticSink: Send + Sync {
    /// Called once per promise whose first completion is an unobserved failure.
    fn unhandled_rejection(&self, error: &PromiseError);
}

/// Default sink: reports through `tracing` at error level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn unhandled_rejection(&self, error: &PromiseError) {
        tracing::error!(
            error = %error,
            cause = ?error.cause(),
            "promise rejected with no failure handler attached"
        );
    }
}

/// Sink that stores every report in memory.
///
/// # Examples
///
/// ```rust,ignore
/// let sink = Arc::new(CollectingSink::default());
/// let event_loop = EventLoopBuilder::new().diagnostics(sink.clone()).build();
/// // ...
/// assert_eq!(sink.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct CollectingSink {
    reports: Mutex<Vec<PromiseError>>,
}

impl CollectingSink {
    /// Number of reports received so far.
    pub fn len(&self) -> usize {
        self.reports.lock().len()
    }

    /// Returns `true` if nothing has been reported.
    pub fn is_empty(&self) -> bool {
        self.reports.lock().is_empty()
    }

    /// Removes and returns all reports, oldest first.
    pub fn take(&self) -> Vec<PromiseError> {
        std::mem::take(&mut *self.reports.lock())
    }
}

impl DiagnosticSink for CollectingSink {
    fn unhandled_rejection(&self, error: &PromiseError) {
        self.reports.lock().push(error.clone());
    }
}
