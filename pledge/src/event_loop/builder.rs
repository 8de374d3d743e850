use super::EventLoop;
use crate::diagnostic::{DiagnosticSink, TracingSink};

use std::sync::Arc;
use std::time::Duration;

/// Builder for configuring and creating an [`EventLoop`].
///
/// # Examples
///
/// ```rust,ignore
/// let event_loop = EventLoopBuilder::new()
///     .deadline(Duration::from_secs(5))
///     .diagnostics(Arc::new(CollectingSink::default()))
///     .build();
/// ```
pub struct EventLoopBuilder {
    /// How long `block_on` and `run` wait for a promise to settle.
    deadline: Duration,

    /// Longest single wait while the queue is empty.
    park_interval: Duration,

    /// Destination of unobserved-rejection reports.
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl EventLoopBuilder {
    /// Creates a builder with the default configuration: a 30 second
    /// deadline, a 1 millisecond park interval and a [`TracingSink`].
    pub fn new() -> Self {
        Self {
            deadline: Duration::from_secs(30),
            park_interval: Duration::from_millis(1),
            diagnostics: Arc::new(TracingSink),
        }
    }

    /// Sets how long the blocking entry points wait before giving up.
    ///
    /// # Panics
    ///
    /// Panics if `deadline` is zero.
    pub fn deadline(mut self, deadline: Duration) -> Self {
        assert!(!deadline.is_zero(), "deadline must be > 0");

        self.deadline = deadline;
        self
    }

    /// Sets the longest time the loop sleeps in one go while idle.
    ///
    /// # Panics
    ///
    /// Panics if `interval` is zero.
    pub fn park_interval(mut self, interval: Duration) -> Self {
        assert!(!interval.is_zero(), "park_interval must be > 0");

        self.park_interval = interval;
        self
    }

    /// Sets the sink receiving unobserved-rejection reports.
    pub fn diagnostics(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = sink;
        self
    }

    /// Builds the event loop.
    pub fn build(self) -> EventLoop {
        EventLoop::with_config(self.deadline, self.park_interval, self.diagnostics)
    }
}

impl Default for EventLoopBuilder {
    fn default() -> Self {
        Self::new()
    }
}
