//! The cooperative event loop.
//!
//! This module provides the [`Scheduler`](crate::Scheduler) implementation
//! shipped with the crate:
//! - [`EventLoop`] owns a FIFO job queue and runs it on the calling thread,
//! - [`LoopHandle`] lets any thread queue work, create promises and spawn
//!   futures,
//! - [`EventLoopBuilder`] configures deadlines, idle parking and the
//!   diagnostic sink,
//! - [`yield_now`] lets a task step aside for already queued jobs.
//!
//! Spawned futures are driven as tasks, and each task's output settles a
//! [`Promise`](crate::Promise).

mod builder;
mod core;
mod queue;
mod task;
mod yield_now;

pub use builder::EventLoopBuilder;
pub use self::core::{EventLoop, LoopHandle};
pub use yield_now::yield_now;
