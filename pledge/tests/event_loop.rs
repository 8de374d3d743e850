use pledge::{EventLoop, EventLoopBuilder, PromiseError, SyncError, yield_now};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[test]
fn test_spawn_resolves_with_output() {
    let event_loop = EventLoop::new();

    let task = event_loop.spawn(async { Ok::<_, PromiseError>(7) });

    assert!(!task.is_completed(), "tasks only run when the loop runs");
    assert_eq!(event_loop.block_on(&task).unwrap(), 7);
}

#[test]
fn test_run_returns_future_output() {
    let event_loop = EventLoop::new();

    let result = event_loop.run(async { Ok::<_, PromiseError>("hello") });

    assert_eq!(result.unwrap(), "hello");
}

#[test]
fn test_spawn_failure_rejects_promise() {
    let event_loop = EventLoop::new();

    let task = event_loop.spawn(async { Err::<u8, _>(PromiseError::msg("boom")) });

    match event_loop.block_on(&task) {
        Err(SyncError::Rejected(error)) => assert_eq!(error.to_string(), "boom"),
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn test_block_on_deadline_elapses() {
    let event_loop = EventLoopBuilder::new()
        .deadline(Duration::from_millis(20))
        .build();
    let deferred = event_loop.deferred::<u8>();

    let result = event_loop.block_on(deferred.promise());

    assert!(matches!(result, Err(SyncError::DeadlineElapsed(_))));
    assert!(!deferred.promise().is_completed());
}

#[test]
fn test_run_deadline_cancels_task() {
    let event_loop = EventLoopBuilder::new()
        .deadline(Duration::from_millis(20))
        .build();
    let never = event_loop.deferred::<u8>();
    let promise = never.promise().clone();

    let result = event_loop.run(async move { promise.await });

    assert!(matches!(result, Err(SyncError::DeadlineElapsed(_))));
    assert!(!never.promise().is_completed());
}

#[test]
fn test_huge_park_interval_still_honours_deadline() {
    let event_loop = EventLoopBuilder::new()
        .park_interval(Duration::MAX)
        .deadline(Duration::from_millis(20))
        .build();
    let deferred = event_loop.deferred::<u8>();

    let result = event_loop.block_on(deferred.promise());

    assert!(matches!(result, Err(SyncError::DeadlineElapsed(_))));
}

#[test]
fn test_block_on_wakes_for_work_from_other_threads() {
    let event_loop = EventLoop::new();
    let deferred = event_loop.deferred::<String>();
    let producer = deferred.clone();

    let promise = deferred.promise().clone();
    let consumer = event_loop.spawn(async move { promise.await });

    let worker = thread::spawn(move || {
        thread::sleep(Duration::from_millis(20));
        producer.resolve("done".to_string());
    });

    assert_eq!(event_loop.block_on(&consumer).unwrap(), "done");
    worker.join().unwrap();
}

#[test]
fn test_handle_queues_jobs_in_order() {
    let event_loop = EventLoop::new();
    let handle = event_loop.handle();
    let order = Arc::new(Mutex::new(Vec::new()));

    for i in 0..5 {
        let order = order.clone();
        handle.queue(move || order.lock().unwrap().push(i));
    }

    assert_eq!(event_loop.pending_jobs(), 5);
    assert_eq!(event_loop.run_until_idle(), 5);
    assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_yield_now_lets_handlers_run() {
    let event_loop = EventLoop::new();
    let deferred = event_loop.deferred::<u32>();
    let seen = Arc::new(Mutex::new(None));

    let s = seen.clone();
    deferred
        .promise()
        .on_success(move |v| *s.lock().unwrap() = Some(v));

    let producer = deferred.clone();
    let observed = seen.clone();
    let task = event_loop.spawn(async move {
        producer.resolve(3);
        let before = *observed.lock().unwrap();

        yield_now().await;

        let after = *observed.lock().unwrap();
        Ok::<_, PromiseError>((before, after))
    });

    assert_eq!(event_loop.block_on(&task).unwrap(), (None, Some(3)));
}

#[test]
fn test_cancelled_task_is_not_polled_again() {
    let event_loop = EventLoop::new();
    let gate = event_loop.deferred::<()>();
    let polls = Arc::new(AtomicUsize::new(0));

    let gate_promise = gate.promise().clone();
    let p = polls.clone();
    let task = event_loop.spawn(async move {
        p.fetch_add(1, Ordering::SeqCst);
        gate_promise.await?;
        p.fetch_add(1, Ordering::SeqCst);
        Ok::<_, PromiseError>(())
    });

    event_loop.run_until_idle();
    assert_eq!(polls.load(Ordering::SeqCst), 1);

    task.cancel();
    event_loop.run_until_idle();

    gate.resolve(());
    event_loop.run_until_idle();

    assert_eq!(polls.load(Ordering::SeqCst), 1);
    assert!(task.is_cancelled());
}

#[test]
fn test_task_can_spawn_through_handle() {
    let event_loop = EventLoop::new();
    let handle = event_loop.handle();

    let outer = event_loop.spawn(async move {
        let inner = handle.spawn(async { Ok::<_, PromiseError>(20) });
        let value = inner.await?;
        Ok::<_, PromiseError>(value + 1)
    });

    assert_eq!(event_loop.block_on(&outer).unwrap(), 21);
}

#[test]
fn test_many_tasks_complete() {
    let event_loop = EventLoop::new();
    let counter = Arc::new(AtomicUsize::new(0));

    let tasks: Vec<_> = (0..100)
        .map(|i| {
            let counter = counter.clone();
            event_loop.spawn(async move {
                yield_now().await;
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, PromiseError>(i)
            })
        })
        .collect();

    for (i, task) in tasks.iter().enumerate() {
        assert_eq!(event_loop.block_on(task).unwrap(), i);
    }

    assert_eq!(counter.load(Ordering::SeqCst), 100);
}

#[test]
#[should_panic(expected = "deadline must be > 0")]
fn test_zero_deadline_rejected() {
    let _ = EventLoopBuilder::new().deadline(Duration::ZERO);
}
