use super::Promise;
use crate::error::PromiseError;

use parking_lot::Mutex;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker};

/// Future returned by [`Promise::wait`] and by awaiting a promise.
///
/// On first poll it attaches itself to the promise as both a success and a
/// failure handler. The outcome therefore arrives through the scheduler like
/// any other handler invocation, and the awaiting task is woken from there.
///
/// A failure comes back as `Err`, so `?` re-raises it at the await point with
/// the original cause intact.
///
/// Dropping a `Wait` does not cancel the promise.
pub struct Wait<T> {
    promise: Promise<T>,

    /// Created and registered on first poll.
    slot: Option<Arc<Mutex<Slot<T>>>>,
}

struct Slot<T> {
    outcome: Option<Result<T, PromiseError>>,
    waker: Option<Waker>,
}

impl<T> Slot<T> {
    fn fill(&mut self, outcome: Result<T, PromiseError>) -> Option<Waker> {
        self.outcome = Some(outcome);
        self.waker.take()
    }
}

impl<T: Clone + Send + 'static> Wait<T> {
    pub(crate) fn new(promise: Promise<T>) -> Self {
        Self {
            promise,
            slot: None,
        }
    }

    fn register(promise: &Promise<T>) -> Arc<Mutex<Slot<T>>> {
        let slot = Arc::new(Mutex::new(Slot {
            outcome: None,
            waker: None,
        }));

        let on_success = slot.clone();
        let on_failure = slot.clone();

        promise.on_success_and_failure(
            move |value| {
                let waker = on_success.lock().fill(Ok(value));
                if let Some(waker) = waker {
                    waker.wake();
                }
            },
            move |error| {
                let waker = on_failure.lock().fill(Err(error));
                if let Some(waker) = waker {
                    waker.wake();
                }
            },
        );

        slot
    }
}

impl<T: Clone + Send + 'static> Future for Wait<T> {
    type Output = Result<T, PromiseError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        let slot = match &this.slot {
            Some(slot) => slot.clone(),
            None => {
                let slot = Self::register(&this.promise);
                this.slot = Some(slot.clone());
                slot
            }
        };

        let mut slot = slot.lock();

        if let Some(outcome) = slot.outcome.take() {
            return Poll::Ready(outcome);
        }

        slot.waker = Some(cx.waker().clone());
        Poll::Pending
    }
}
