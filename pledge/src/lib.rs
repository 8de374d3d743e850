//! # Pledge
//!
//! **Pledge** is a small promise library for the **Nebula** ecosystem: a
//! single-assignment asynchronous result cell, the producer handle that
//! completes it, and the bridges that connect it to `.await` and to
//! cancellation.
//!
//! Its guarantees are narrow and strict:
//!
//! - A **promise settles exactly once**. The first resolve, reject or cancel
//!   wins, and every later attempt is ignored.
//! - **Callbacks are never run inline**. Once a promise settles, each
//!   registered handler is handed to a [`Scheduler`] in registration order
//!   and runs later, never on the stack that completed the promise.
//! - **Cancellation flows both ways**. Cancelling a promise cancels the
//!   suspension bridges built on it, and cancelling a bridge (or its
//!   enclosing [`CancelScope`]) cancels the promise.
//! - **Unobserved failures are reported**. A promise that fails with no
//!   failure handler attached is reported once to a pluggable
//!   [`DiagnosticSink`] (by default, through `tracing`).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pledge::{EventLoop, PromiseError};
//!
//! let event_loop = EventLoop::new();
//! let deferred = event_loop.deferred::<u32>();
//! let promise = deferred.promise().clone();
//!
//! let consumer = event_loop.spawn(async move {
//!     let value = promise.await?;
//!     Ok::<_, PromiseError>(value * 2)
//! });
//!
//! deferred.resolve(21);
//! assert_eq!(event_loop.block_on(&consumer).unwrap(), 42);
//! ```
//!
//! ## Modules
//!
//! - [`promise`] — promises, deferreds, suspension bridges
//! - [`cancel`] — cancel signals and scopes
//! - [`event_loop`] — the cooperative scheduler and its task layer
//! - [`diagnostic`] — unobserved-rejection sinks
//!
//! ## Testing
//!
//! `#[pledge::test]` runs an `async` test body on a fresh event loop. A test
//! taking a single [`LoopHandle`] argument receives a handle to that loop:
//!
//! ```rust,ignore
//! #[pledge::test]
//! async fn resolves(handle: pledge::LoopHandle) {
//!     let deferred = handle.deferred::<u8>();
//!     deferred.resolve(1);
//!     assert_eq!(deferred.promise().wait().await.unwrap(), 1);
//! }
//! ```
//!
//! The attribute rejects a function without a body instead of dropping it:
//!
//! ```compile_fail
//! #[pledge::test]
//! async fn missing_body();
//! ```

pub mod cancel;
pub mod diagnostic;
pub mod event_loop;
pub mod promise;

mod error;
mod scheduler;

pub use cancel::{CancelScope, CancelSignal};
pub use diagnostic::{CollectingSink, DiagnosticSink, TracingSink};
pub use error::{PromiseError, SyncError};
pub use event_loop::{EventLoop, EventLoopBuilder, LoopHandle, yield_now};
pub use promise::{Deferred, Promise, SuspensionBridge, Wait};
pub use scheduler::{Job, Scheduler, SchedulerHandle};

pub use pledge_macros::test;
