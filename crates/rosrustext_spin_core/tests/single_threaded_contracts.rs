use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use rosrustext_spin_core::spin::{ShutdownFlag, SpinOnce, Spinner, TurnEvent, TurnPhase};
use rosrustext_spin_core::SpinConfig;

fn spinner() -> Spinner {
    Spinner::with_config(SpinConfig::default().with_poll_interval(Duration::from_millis(10)))
        .expect("valid config")
}

fn wait_for(what: &str, cond: impl Fn() -> bool) {
    let start = Instant::now();
    while !cond() {
        assert!(start.elapsed() < Duration::from_secs(5), "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn concurrent_callbacks_never_overlap_under_one_loop() {
    const CALLERS: usize = 8;
    const CALLS: usize = 25;

    let spinner = spinner();
    let flag = ShutdownFlag::new();
    let driver = spinner.spawn(flag.clone()).unwrap();

    let in_flight = Arc::new(AtomicUsize::new(0));
    let max_in_flight = Arc::new(AtomicUsize::new(0));
    let total = Arc::new(AtomicUsize::new(0));

    let callback = {
        let in_flight = Arc::clone(&in_flight);
        let max_in_flight = Arc::clone(&max_in_flight);
        let total = Arc::clone(&total);
        spinner.single_threaded(move |_msg: usize| {
            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            max_in_flight.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_micros(200));
            total.fetch_add(1, Ordering::SeqCst);
            in_flight.fetch_sub(1, Ordering::SeqCst);
        })
    };

    let barrier = Arc::new(Barrier::new(CALLERS));
    let callers: Vec<_> = (0..CALLERS)
        .map(|caller| {
            let callback = callback.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..CALLS {
                    callback.call(caller * CALLS + i);
                }
            })
        })
        .collect();

    for caller in callers {
        caller.join().unwrap();
    }
    flag.trigger();
    driver.join().unwrap();

    assert_eq!(total.load(Ordering::SeqCst), CALLERS * CALLS);
    assert_eq!(max_in_flight.load(Ordering::SeqCst), 1);
}

#[test]
fn turns_are_granted_in_push_order() {
    let spinner = spinner();
    let mut events = spinner.subscribe_turn_events();
    let order = Arc::new(Mutex::new(Vec::new()));

    let callback = {
        let order = Arc::clone(&order);
        spinner.single_threaded(move |id: &'static str| order.lock().unwrap().push(id))
    };

    // Queue T1, T2, T3 with no driver running so the push order is fixed.
    let mut callers = Vec::new();
    for (n, id) in ["T1", "T2", "T3"].into_iter().enumerate() {
        let callback = callback.clone();
        callers.push(thread::spawn(move || callback.call(id)));
        wait_for("turn to be queued", || spinner.pending() == n + 1);
    }

    let flag = ShutdownFlag::new();
    let driver = spinner.spawn(flag.clone()).unwrap();
    for caller in callers {
        caller.join().unwrap();
    }
    flag.trigger();
    driver.join().unwrap();

    assert_eq!(*order.lock().unwrap(), vec!["T1", "T2", "T3"]);

    let mut seen = Vec::new();
    while let Ok(ev) = events.try_recv() {
        seen.push(ev);
    }
    let queued = |seq| TurnEvent {
        seq,
        phase: TurnPhase::Queued,
    };
    assert_eq!(
        seen,
        vec![
            queued(0),
            queued(1),
            queued(2),
            TurnEvent::granted(0),
            TurnEvent::completed(0),
            TurnEvent::granted(1),
            TurnEvent::completed(1),
            TurnEvent::granted(2),
            TurnEvent::completed(2),
        ]
    );
}

#[test]
fn wrapping_twice_behaves_like_wrapping_once() {
    let spinner = spinner();
    let flag = ShutdownFlag::new();
    let driver = spinner.spawn(flag.clone()).unwrap();

    let calls = Arc::new(AtomicUsize::new(0));
    let once = {
        let calls = Arc::clone(&calls);
        spinner.single_threaded(move |m: u32| {
            calls.fetch_add(1, Ordering::SeqCst);
            m + 1
        })
    };
    let twice = spinner.single_threaded(once.clone().into_fn());

    assert_eq!(once.call(1), 2);
    assert_eq!(twice.call(1), 2);

    let thrice = spinner.single_threaded(twice.into_fn());
    assert_eq!(thrice.call(1), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 3);

    flag.trigger();
    driver.join().unwrap();
}

#[test]
fn failing_callbacks_release_their_turn() {
    let spinner = spinner();
    let flag = ShutdownFlag::new();
    let driver = spinner.spawn(flag.clone()).unwrap();

    let fails = spinner.single_threaded(|_: ()| -> Result<(), String> { Err("boom".into()) });
    assert_eq!(fails.call(()), Err("boom".to_string()));

    let panics = spinner.single_threaded(|_: ()| -> u8 { panic!("callback panicked") });
    let caught = panic::catch_unwind(AssertUnwindSafe(|| panics.call(())));
    assert!(caught.is_err());

    // Later turns are still granted.
    let after = spinner.single_threaded(|m: u8| m);
    assert_eq!(after.call(9), 9);
    assert_eq!(spinner.pending(), 0);

    flag.trigger();
    driver.join().unwrap();
}

#[test]
fn shutdown_leaves_ungranted_turns_queued() {
    let spinner = spinner();
    let caller = {
        let spinner = spinner.clone();
        thread::spawn(move || spinner.run(|| "late"))
    };
    wait_for("turn to be queued", || spinner.pending() == 1);

    let flag = ShutdownFlag::new();
    flag.trigger();
    spinner.spin(&flag);

    assert_eq!(spinner.pending(), 1);
    assert!(!caller.is_finished());
    assert_eq!(spinner.active_loops(), 0);

    // A later loop still serves the abandoned turn.
    assert_eq!(
        spinner.spin_once(Duration::from_secs(5)),
        SpinOnce::Granted { seq: 0 }
    );
    assert_eq!(caller.join().unwrap(), "late");
}
