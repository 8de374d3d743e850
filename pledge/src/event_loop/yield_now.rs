use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Future behind [`yield_now`]: pending on the first poll, ready on the next.
struct YieldNow {
    yielded: bool,
}

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.yielded {
            return Poll::Ready(());
        }

        self.yielded = true;

        // Re-queues the task behind every job already waiting on the loop.
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

/// Gives every job already queued on the loop a chance to run before the
/// current task continues.
///
/// Since promise handlers are delivered as loop jobs, a task can use this to
/// let callbacks scheduled by an earlier completion run first.
///
/// # Examples
///
/// ```rust,ignore
/// deferred.resolve(1);
/// yield_now().await;
/// // handlers registered before the resolve have run by now
/// ```
pub async fn yield_now() {
    YieldNow { yielded: false }.await
}
