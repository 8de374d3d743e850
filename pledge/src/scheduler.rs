//! The seam between promises and whatever runs their callbacks.
//!
//! Promises never invoke observer callbacks on the stack that completed
//! them. Instead every callback is wrapped into a [`Job`] and handed to a
//! [`Scheduler`], which runs it later. [`EventLoop`](crate::EventLoop) is the
//! scheduler shipped with this crate, but any type implementing the trait can
//! host promises.

use crate::diagnostic::{DiagnosticSink, TracingSink};

use std::sync::Arc;

/// A unit of deferred work.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Shared, type-erased scheduler reference held by every promise.
pub type SchedulerHandle = Arc<dyn Scheduler>;

/// Accepts work to be run later.
///
/// Implementations must run jobs in submission order relative to each
/// other, and must never run a job before `queue` has returned.
pub trait Scheduler: Send + Sync {
    /// Enqueues `job` for later execution.
    fn queue(&self, job: Job);

    /// Sink receiving unobserved-rejection reports for promises bound to
    /// this scheduler.
    fn diagnostics(&self) -> &dyn DiagnosticSink {
        &TracingSink
    }
}
