//! Cooperative cancellation.
//!
//! Cancellation never unwinds running code. It marks the promise as failed
//! with [`PromiseError::Cancelled`](crate::PromiseError::Cancelled) and
//! notifies whoever registered interest:
//! - [`CancelSignal`] is the per-promise (and per-bridge) notification,
//! - [`CancelScope`] is an enclosing scope bridges can be tied to.

mod scope;
mod signal;

pub use scope::CancelScope;
pub use signal::CancelSignal;
