use pledge::{CancelScope, CollectingSink, EventLoop, EventLoopBuilder, PromiseError};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

fn counter() -> (Arc<AtomicUsize>, impl FnOnce() + Send + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let c = count.clone();

    (count, move || {
        c.fetch_add(1, Ordering::SeqCst);
    })
}

#[test]
fn test_resume_resolves_promise() {
    let event_loop = EventLoop::new();
    let deferred = event_loop.deferred::<&'static str>();
    let bridge = deferred.bridge(&CancelScope::new());
    let producer = bridge.clone();

    let consumer = event_loop.spawn(async move { bridge.await });
    event_loop.run_until_idle();

    producer.resume("ready");
    producer.resume("again");
    producer.resume_with_error(PromiseError::msg("late"));

    assert_eq!(event_loop.block_on(&consumer).unwrap(), "ready");
    assert!(!producer.is_cancelled());
}

#[test]
fn test_resume_with_error_rejects_promise() {
    let event_loop = EventLoop::new();
    let deferred = event_loop.deferred::<u32>();
    let bridge = deferred.bridge(&CancelScope::new());

    bridge.resume_with_error(PromiseError::msg("io failed"));

    let error = event_loop.block_on(bridge.promise()).unwrap_err();
    assert_eq!(error.to_string(), "io failed");
}

#[test]
fn test_resume_from_another_thread() {
    let event_loop = EventLoop::new();
    let deferred = event_loop.deferred::<u64>();
    let bridge = deferred.bridge(&CancelScope::new());
    let producer = bridge.clone();

    let consumer = event_loop.spawn(async move {
        let value = bridge.wait().await?;
        Ok::<_, PromiseError>(value * 2)
    });

    let worker = thread::spawn(move || {
        thread::sleep(Duration::from_millis(10));
        producer.resume(21);
    });

    assert_eq!(event_loop.block_on(&consumer).unwrap(), 42);
    worker.join().unwrap();
}

#[test]
fn test_bridge_cancel_cancels_promise_once() {
    let event_loop = EventLoop::new();
    let deferred = event_loop.deferred::<u8>();
    let bridge = deferred.bridge(&CancelScope::new());

    let (promise_cancels, on_promise) = counter();
    let (bridge_cancels, on_bridge) = counter();
    deferred.on_cancel(on_promise);
    bridge.on_cancel(on_bridge);

    bridge.cancel();
    bridge.cancel();
    deferred.cancel();

    assert!(deferred.is_cancelled());
    assert!(bridge.is_cancelled());
    assert_eq!(promise_cancels.load(Ordering::SeqCst), 1);
    assert_eq!(bridge_cancels.load(Ordering::SeqCst), 1);
}

#[test]
fn test_promise_cancel_cancels_bridge_once() {
    let event_loop = EventLoop::new();
    let deferred = event_loop.deferred::<u8>();
    let bridge = deferred.bridge(&CancelScope::new());

    let (promise_cancels, on_promise) = counter();
    let (bridge_cancels, on_bridge) = counter();
    deferred.on_cancel(on_promise);
    bridge.on_cancel(on_bridge);

    deferred.promise().cancel();
    bridge.cancel();

    assert!(bridge.is_cancelled());
    assert_eq!(promise_cancels.load(Ordering::SeqCst), 1);
    assert_eq!(bridge_cancels.load(Ordering::SeqCst), 1);
}

#[test]
fn test_scope_cancel_reaches_every_awaiter() {
    let sink = Arc::new(CollectingSink::default());
    let event_loop = EventLoopBuilder::new().diagnostics(sink.clone()).build();
    let deferred = event_loop.deferred::<u32>();
    let scope = CancelScope::new();

    let bridge = deferred.bridge(&scope);
    let suspended = event_loop.spawn(async move { bridge.await });

    let other = deferred.promise().clone();
    let observer = event_loop.spawn(async move { other.await });

    event_loop.run_until_idle();
    assert!(!deferred.promise().is_completed());

    scope.cancel();

    assert!(deferred.promise().is_cancelled());
    assert!(event_loop.block_on(&suspended).unwrap_err().is_cancelled());
    assert!(event_loop.block_on(&observer).unwrap_err().is_cancelled());
    assert!(sink.is_empty());
}

#[test]
fn test_bridge_on_cancelled_promise_starts_cancelled() {
    let event_loop = EventLoop::new();
    let deferred = event_loop.deferred::<u8>();

    deferred.cancel();
    let bridge = deferred.bridge(&CancelScope::new());

    assert!(bridge.is_cancelled());
}

#[test]
fn test_bridge_in_cancelled_scope_cancels_promise() {
    let event_loop = EventLoop::new();
    let deferred = event_loop.deferred::<u8>();
    let scope = CancelScope::new();

    scope.cancel();
    let bridge = deferred.bridge(&scope);

    assert!(bridge.is_cancelled());
    assert!(deferred.is_cancelled());
}

#[test]
fn test_resolved_promise_ignores_bridge_cancel() {
    let event_loop = EventLoop::new();
    let deferred = event_loop.deferred::<u8>();
    let bridge = deferred.bridge(&CancelScope::new());

    bridge.resume(9);
    bridge.cancel();

    assert!(bridge.is_cancelled());
    assert!(!deferred.is_cancelled());
    assert_eq!(event_loop.block_on(deferred.promise()).unwrap(), 9);
}

#[test]
fn test_settled_bridges_detach_from_scope() {
    let event_loop = EventLoop::new();
    let scope = CancelScope::new();

    let bridges: Vec<_> = (0..100)
        .map(|_| event_loop.deferred::<u32>().bridge(&scope))
        .collect();
    assert_eq!(scope.listener_count(), 100);

    for (i, bridge) in bridges.iter().enumerate() {
        bridge.resume(i as u32);
    }
    assert_eq!(scope.listener_count(), 0);

    scope.cancel();

    assert!(bridges.iter().all(|bridge| !bridge.is_cancelled()));
    assert_eq!(event_loop.block_on(bridges[7].promise()).unwrap(), 7);
}

#[test]
fn test_cancelled_bridge_detaches_from_scope() {
    let event_loop = EventLoop::new();
    let scope = CancelScope::new();

    let cancelled = event_loop.deferred::<u8>().bridge(&scope);
    let pending = event_loop.deferred::<u8>().bridge(&scope);

    cancelled.cancel();
    assert_eq!(scope.listener_count(), 1);

    scope.cancel();
    assert!(pending.is_cancelled());
    assert!(pending.promise().is_cancelled());
}
