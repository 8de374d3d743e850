use crate::scheduler::Job;

use parking_lot::{Condvar, Mutex};
use std::collections::VecDeque;
use std::time::Instant;

/// FIFO job queue feeding the event loop.
///
/// Any thread may push. Only the thread driving the loop pops, and it parks
/// on the condition variable while the queue is empty.
pub(crate) struct JobQueue {
    /// Jobs waiting to run, oldest first.
    jobs: Mutex<VecDeque<Job>>,

    /// Signalled on every push so a parked loop wakes up.
    condvar: Condvar,
}

impl JobQueue {
    pub(crate) fn new() -> Self {
        Self {
            jobs: Mutex::new(VecDeque::new()),
            condvar: Condvar::new(),
        }
    }

    /// Appends a job and wakes the loop if it is parked.
    pub(crate) fn push(&self, job: Job) {
        self.jobs.lock().push_back(job);
        self.condvar.notify_one();
    }

    /// Takes the oldest job, if any.
    pub(crate) fn pop(&self) -> Option<Job> {
        self.jobs.lock().pop_front()
    }

    pub(crate) fn len(&self) -> usize {
        self.jobs.lock().len()
    }

    /// Parks the calling thread until a job is pushed or `until` passes.
    /// With no `until`, only a push wakes it.
    ///
    /// Returns immediately if the queue is not empty.
    pub(crate) fn park(&self, until: Option<Instant>) {
        let mut jobs = self.jobs.lock();

        if !jobs.is_empty() {
            return;
        }

        match until {
            Some(until) => {
                let _ = self.condvar.wait_until(&mut jobs, until);
            }
            None => self.condvar.wait(&mut jobs),
        }
    }
}
