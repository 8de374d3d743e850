use super::Task;

use std::sync::Arc;
use std::task::Wake;

/// Waking a task re-queues it on the loop its promise delivers through.
impl<T: Clone + Send + 'static> Wake for Task<T> {
    fn wake(self: Arc<Self>) {
        self.notify();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        self.clone().notify();
    }
}
