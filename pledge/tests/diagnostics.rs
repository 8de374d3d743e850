use pledge::{CollectingSink, EventLoop, EventLoopBuilder, Promise, PromiseError};
use std::sync::{Arc, Mutex};

fn event_loop_with_sink() -> (EventLoop, Arc<CollectingSink>) {
    let sink = Arc::new(CollectingSink::default());
    let event_loop = EventLoopBuilder::new().diagnostics(sink.clone()).build();

    (event_loop, sink)
}

#[test]
fn test_unobserved_rejection_reported_once() {
    let (event_loop, sink) = event_loop_with_sink();
    let deferred = event_loop.deferred::<u32>();

    deferred.reject(PromiseError::msg("x"));
    deferred.reject(PromiseError::msg("y"));

    let reports = sink.take();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].to_string(), "x");

    // A handler attached afterwards still receives the error.
    let received = Arc::new(Mutex::new(None));
    let r = received.clone();
    deferred
        .promise()
        .on_success_and_failure(|_| {}, move |e| *r.lock().unwrap() = Some(e));

    event_loop.run_until_idle();

    let received = received.lock().unwrap();
    let error = received.as_ref().expect("failure handler should have run");
    assert!(!error.is_cancelled());
    assert_eq!(error.to_string(), "x");
    assert!(sink.is_empty());
}

#[test]
fn test_cancellation_not_reported() {
    let (event_loop, sink) = event_loop_with_sink();
    let deferred = event_loop.deferred::<u32>();

    deferred.cancel();

    assert!(deferred.promise().is_cancelled());
    assert!(sink.is_empty());
}

#[test]
fn test_rejection_with_handler_not_reported() {
    let (event_loop, sink) = event_loop_with_sink();
    let deferred = event_loop.deferred::<u32>();

    deferred.promise().on_success_and_failure(|_| {}, |_| {});
    deferred.reject(PromiseError::msg("handled"));

    assert!(sink.is_empty());
    event_loop.run_until_idle();
}

#[test]
fn test_success_only_handler_does_not_count_as_observer() {
    let (event_loop, sink) = event_loop_with_sink();
    let deferred = event_loop.deferred::<u32>();

    deferred.promise().on_success(|_| {});
    deferred.reject(PromiseError::msg("unseen"));

    assert_eq!(sink.len(), 1);
}

#[test]
fn test_rejected_constructor_reported() {
    let (event_loop, sink) = event_loop_with_sink();

    let _promise = Promise::<u8>::rejected(event_loop.scheduler(), PromiseError::msg("early"));
    let _cancelled = Promise::<u8>::rejected(event_loop.scheduler(), PromiseError::Cancelled);

    assert_eq!(sink.len(), 1);
}

#[test]
fn test_failed_task_without_observer_reported() {
    let (event_loop, sink) = event_loop_with_sink();

    let task = event_loop.spawn(async { Err::<u8, _>(PromiseError::msg("task failed")) });
    let result = event_loop.block_on(&task);

    assert!(result.is_err());
    assert_eq!(sink.len(), 1);
}
