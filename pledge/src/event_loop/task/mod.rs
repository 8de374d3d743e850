//! Futures driven by the event loop.
//!
//! A task couples a boxed future with the [`Deferred`](crate::Deferred) its
//! output settles. The loop runs a task by popping its run job; wakers and
//! cancellation push that job back.

mod core;
mod state;
mod waker;

pub(crate) use self::core::Task;
