use crate::cancel::CancelSignal;
use crate::error::PromiseError;
use crate::scheduler::SchedulerHandle;

use parking_lot::{Mutex, ReentrantMutex};
use std::collections::VecDeque;
use std::mem;

pub(crate) type SuccessHandler<T> = Box<dyn FnOnce(T) + Send + 'static>;
pub(crate) type FailureHandler = Box<dyn FnOnce(PromiseError) + Send + 'static>;
type SettleHook = Box<dyn FnOnce() + Send + 'static>;

/// Single-assignment state shared by a promise, its producer and its bridges.
///
/// All state transitions happen under `state`. Scheduling handlers and
/// reporting diagnostics happen after that lock is released, so neither the
/// scheduler nor the sink can re-enter a locked cell.
pub(crate) struct ResultCell<T> {
    state: Mutex<CellState<T>>,

    /// Held from draining a handler queue until every drained handler is
    /// queued, so concurrent flushes reach the scheduler in registration
    /// order. Reentrant for schedulers that run jobs inline.
    flushing: ReentrantMutex<()>,

    /// Fired when the cell is cancelled.
    cancel: CancelSignal,

    /// Where handler invocations are queued.
    scheduler: SchedulerHandle,
}

struct CellState<T> {
    /// `None` while pending; set exactly once.
    outcome: Option<Result<T, PromiseError>>,

    on_success: VecDeque<SuccessHandler<T>>,
    on_failure: VecDeque<FailureHandler>,

    /// Internal hooks run once, right after the transition out of pending.
    on_settle: Vec<SettleHook>,
}

/// Handlers drained by a flush, paired with the outcome they receive.
enum Drained<T> {
    Success(T, VecDeque<SuccessHandler<T>>),
    Failure(PromiseError, VecDeque<FailureHandler>),
}

impl<T: Clone + Send + 'static> ResultCell<T> {
    pub(crate) fn new(scheduler: SchedulerHandle) -> Self {
        Self {
            state: Mutex::new(CellState {
                outcome: None,
                on_success: VecDeque::new(),
                on_failure: VecDeque::new(),
                on_settle: Vec::new(),
            }),
            flushing: ReentrantMutex::new(()),
            cancel: CancelSignal::new(),
            scheduler,
        }
    }

    pub(crate) fn cancel_signal(&self) -> &CancelSignal {
        &self.cancel
    }

    pub(crate) fn scheduler(&self) -> &SchedulerHandle {
        &self.scheduler
    }

    /// Completes the cell and flushes. Returns `false` if it was already
    /// complete, in which case nothing changes.
    pub(crate) fn complete(&self, outcome: Result<T, PromiseError>) -> bool {
        if !self.settle(outcome) {
            return false;
        }

        self.flush();
        true
    }

    /// Fires the cancel signal, then completes the cell with
    /// [`PromiseError::Cancelled`] unless a listener completed it first.
    /// No-op on a completed cell.
    ///
    /// Returns `true` if the cell ends up cancelled.
    pub(crate) fn cancel(&self) -> bool {
        if self.is_completed() {
            return false;
        }

        if self.cancel.fire() {
            tracing::debug!("promise cancellation requested");
        }

        self.complete(Err(PromiseError::Cancelled));
        self.is_cancelled()
    }

    /// Runs `hook` once the cell settles, or right away if it already has.
    /// Hooks run on the completing stack, after the state lock is released.
    pub(crate) fn on_settle<F>(&self, hook: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = self.state.lock();

        if state.outcome.is_none() {
            state.on_settle.push(Box::new(hook));
            return;
        }

        drop(state);
        hook();
    }

    pub(crate) fn on_success(&self, handler: SuccessHandler<T>) {
        self.state.lock().on_success.push_back(handler);
        self.flush();
    }

    pub(crate) fn on_success_and_failure(
        &self,
        on_success: SuccessHandler<T>,
        on_failure: FailureHandler,
    ) {
        {
            let mut state = self.state.lock();
            state.on_success.push_back(on_success);
            state.on_failure.push_back(on_failure);
        }

        self.flush();
    }

    pub(crate) fn is_completed(&self) -> bool {
        self.state.lock().outcome.is_some()
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        matches!(
            self.state.lock().outcome,
            Some(Err(PromiseError::Cancelled))
        )
    }

    pub(crate) fn outcome(&self) -> Option<Result<T, PromiseError>> {
        self.state.lock().outcome.clone()
    }

    /// Performs the one-time transition out of the pending state.
    ///
    /// The unobserved-rejection check looks at the failure queue at this
    /// exact instant; the report itself is emitted after unlocking.
    fn settle(&self, outcome: Result<T, PromiseError>) -> bool {
        let (unobserved, hooks) = {
            let mut state = self.state.lock();

            if state.outcome.is_some() {
                return false;
            }

            let unobserved = match &outcome {
                Err(error) if !error.is_cancelled() && state.on_failure.is_empty() => {
                    Some(error.clone())
                }
                _ => None,
            };

            state.outcome = Some(outcome);
            (unobserved, mem::take(&mut state.on_settle))
        };

        if let Some(error) = unobserved {
            self.scheduler.diagnostics().unhandled_rejection(&error);
        }

        for hook in hooks {
            hook();
        }

        true
    }

    /// Drains the queue matching the outcome and hands every handler to the
    /// scheduler, in insertion order. Handlers of the other queue can never
    /// run and are dropped.
    fn flush(&self) {
        let _flushing = self.flushing.lock();

        let drained = {
            let mut guard = self.state.lock();
            let state = &mut *guard;

            match &state.outcome {
                None => return,
                Some(Ok(value)) => {
                    state.on_failure.clear();
                    Drained::Success(value.clone(), mem::take(&mut state.on_success))
                }
                Some(Err(error)) => {
                    state.on_success.clear();
                    Drained::Failure(error.clone(), mem::take(&mut state.on_failure))
                }
            }
        };

        match drained {
            Drained::Success(value, handlers) => {
                for handler in handlers {
                    let value = value.clone();
                    self.scheduler.queue(Box::new(move || handler(value)));
                }
            }
            Drained::Failure(error, handlers) => {
                for handler in handlers {
                    let error = error.clone();
                    self.scheduler.queue(Box::new(move || handler(error)));
                }
            }
        }
    }
}
