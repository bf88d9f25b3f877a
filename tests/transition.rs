#![cfg(not(feature = "loom"))]

use std::sync::{Arc, Barrier};

use handoff::publication::{direct, fenced};
use handoff::{ScopedThread, SlotState};

const WATCHERS: usize = 4;

/// Sample the slot until it is full, then a while longer; any `Full -> Empty` step fails.
fn watch<F>(barrier: Arc<Barrier>, state: F) -> usize
where
    F: Fn() -> SlotState,
{
    barrier.wait();

    let mut last = state();
    let mut transitions = 0;
    let mut samples_after_full = 0;
    while samples_after_full < 10_000 {
        let now = state();
        assert!(
            !(last == SlotState::Full && now == SlotState::Empty),
            "slot reverted to empty"
        );
        if last != now {
            transitions += 1;
        }
        if now == SlotState::Full {
            samples_after_full += 1;
        }
        last = now;
        std::hint::spin_loop();
    }
    transitions
}

#[test]
fn direct_slot_transitions_once_under_concurrent_watchers() {
    let (publisher, consumer) = direct::channel::<String, i32>();
    let barrier = Arc::new(Barrier::new(WATCHERS + 1));

    let watchers: Vec<_> = (0..WATCHERS)
        .map(|_| {
            let watcher = consumer.watcher();
            let barrier = barrier.clone();
            ScopedThread::spawn(move || watch(barrier, || watcher.state()))
        })
        .collect();

    barrier.wait();
    publisher.publish_value("Sample text".to_string(), 2014);

    let published = consumer.consume_spin();
    assert_eq!(published.payload(), "Sample text");

    for watcher in watchers {
        // Zero if the watcher's first sample already saw the publication.
        assert!(watcher.join().unwrap() <= 1);
    }
}

#[test]
fn fenced_slot_stays_full_after_consume() {
    let (publisher, mut consumer) = fenced::channel::<String, i32>();
    let watcher = consumer.watcher();
    let barrier = Arc::new(Barrier::new(2));

    let observer = {
        let barrier = barrier.clone();
        let watcher = watcher.clone();
        ScopedThread::spawn(move || watch(barrier, || watcher.state()))
    };

    barrier.wait();
    publisher.publish_value("Sample text".to_string(), 2014);
    while consumer.try_consume().is_err() {
        std::hint::spin_loop();
    }

    assert!(consumer.is_consumed());
    assert_eq!(watcher.state(), SlotState::Full);
    assert!(observer.join().unwrap() <= 1);
}
