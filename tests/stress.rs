#![cfg(not(feature = "loom"))]

use handoff::harness::{self, Scenario};
use handoff::publication::{direct, fenced};
use handoff::{ScopedThread, StrategyKind, WaitStrategy};

#[test]
fn reference_scenario_direct() {
    let report = harness::run(StrategyKind::Direct, &Scenario::default()).unwrap();
    assert_eq!(report.strategy, StrategyKind::Direct);
    assert_eq!(report.runs, 10_000);
}

#[test]
fn reference_scenario_fenced() {
    let report = harness::run(StrategyKind::Fenced, &Scenario::default()).unwrap();
    assert_eq!(report.strategy, StrategyKind::Fenced);
    assert_eq!(report.runs, 10_000);
}

#[test]
fn reference_scenario_with_backoff() {
    let scenario = Scenario {
        wait: WaitStrategy::Backoff,
        runs: 1_000,
        seed: Some(42),
        ..Scenario::default()
    };
    for strategy in StrategyKind::ALL {
        harness::run(strategy, &scenario).unwrap();
    }
}

#[test]
fn strategies_are_observationally_equivalent() {
    let inputs: Vec<(String, i64)> = vec![
        ("Sample text".to_string(), 2014),
        (String::new(), 0),
        ("x".repeat(4096), -1),
        ("ünïcødé".to_string(), i64::MAX),
    ];

    for (payload, auxiliary) in inputs {
        let (direct_tx, direct_rx) = direct::channel::<String, i64>();
        let (fenced_tx, fenced_rx) = fenced::channel::<String, i64>();

        let direct_payload = payload.clone();
        let fenced_payload = payload.clone();
        let _producers = (
            ScopedThread::spawn(move || direct_tx.publish_value(direct_payload, auxiliary)),
            ScopedThread::spawn(move || fenced_tx.publish_value(fenced_payload, auxiliary)),
        );

        let from_direct = direct_rx.consume_spin().into_parts();
        let from_fenced = fenced_rx.consume_spin().into_parts();

        assert_eq!(from_direct, from_fenced);
        assert_eq!(*from_direct.0, payload);
        assert_eq!(from_direct.1, auxiliary);
    }
}
