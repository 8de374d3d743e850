//! Promises and their producer handles.
//!
//! This module contains the single-assignment result cell and everything
//! attached to it:
//! - [`Promise`], the read side, observed through callbacks or `.await`,
//! - [`Deferred`], the write side used by producers,
//! - [`SuspensionBridge`], a cancellable suspension point over a deferred,
//! - [`Wait`], the future produced by awaiting a promise.

mod bridge;
mod cell;
mod core;
mod deferred;
mod wait;

pub use bridge::SuspensionBridge;
pub use self::core::Promise;
pub use deferred::Deferred;
pub use wait::Wait;
