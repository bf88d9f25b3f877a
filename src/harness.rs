//! Repeated producer/consumer runs that check the publication contract.
//!
//! Each run spawns a producer and a consumer on their own [`ScopedThread`]s. Both sides wait
//! a random number of spin hints before acting so the publish lands at a different point of
//! the consumer's poll loop every time. The consumer's poll loop is bounded by the
//! scenario's timeout; the channel itself never times out.

use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, info, trace, warn};

use crate::config::HandoffConfig;
use crate::publication::common::{self, TryConsumeError};
use crate::scoped::ScopedThread;
use crate::strategy::{Direct, Fenced, Strategy, StrategyKind};
use crate::wait::WaitStrategy;

/// Parameters shared by every run of a scenario
#[derive(Debug, Clone)]
pub struct Scenario {
    pub wait: WaitStrategy,
    pub runs: usize,
    pub max_spin: u32,
    pub payload: String,
    pub auxiliary: i64,
    pub timeout: Duration,
    pub seed: Option<u64>,
}

impl Scenario {
    pub fn from_config(config: &HandoffConfig) -> Self {
        Self {
            wait: config.wait,
            runs: config.runs,
            max_spin: config.max_spin,
            payload: config.payload.clone(),
            auxiliary: config.auxiliary,
            timeout: config.timeout(),
            seed: config.seed,
        }
    }

    fn expected(&self) -> Observation {
        Observation {
            payload: self.payload.clone(),
            auxiliary: self.auxiliary,
        }
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Self::from_config(&HandoffConfig::default())
    }
}

/// What the consumer saw after observing the slot as full
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    pub payload: String,
    pub auxiliary: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("run {run}: consumer observed {observed:?}, expected {expected:?}")]
    Mismatch {
        run: usize,
        expected: Observation,
        observed: Observation,
    },

    #[error("run {run}: slot still empty after {timeout:?}")]
    Timeout { run: usize, timeout: Duration },

    #[error("run {run}: producer thread panicked")]
    ProducerPanicked { run: usize },

    #[error("run {run}: consumer thread panicked")]
    ConsumerPanicked { run: usize },
}

/// Summary of a scenario where every run observed the published values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub strategy: StrategyKind,
    pub wait: WaitStrategy,
    pub runs: usize,
    pub elapsed: Duration,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} wait): {} runs consistent in {:?}",
            self.strategy, self.wait, self.runs, self.elapsed
        )
    }
}

/// Run `scenario` with the strategy selected at runtime
pub fn run(strategy: StrategyKind, scenario: &Scenario) -> Result<Report, HarnessError> {
    match strategy {
        StrategyKind::Direct => run_with::<Direct>(scenario),
        StrategyKind::Fenced => run_with::<Fenced>(scenario),
    }
}

/// Run every run of `scenario` with strategy `S`, stopping at the first failure
pub fn run_with<S: Strategy>(scenario: &Scenario) -> Result<Report, HarnessError> {
    let mut rng = match scenario.seed {
        Some(seed) => fastrand::Rng::with_seed(seed),
        None => fastrand::Rng::new(),
    };
    let expected = scenario.expected();
    let started = Instant::now();

    info!(
        strategy = %S::KIND,
        wait = %scenario.wait,
        runs = scenario.runs,
        max_spin = scenario.max_spin,
        "starting scenario"
    );

    for run in 0..scenario.runs {
        let producer_spin = rng.u32(0..=scenario.max_spin);
        let consumer_spin = rng.u32(0..=scenario.max_spin);

        let observed = run_once::<S>(run, scenario, producer_spin, consumer_spin).inspect_err(|err| {
            warn!(strategy = %S::KIND, %err, "run failed");
        })?;

        if observed != expected {
            let err = HarnessError::Mismatch {
                run,
                expected,
                observed,
            };
            warn!(strategy = %S::KIND, %err, "happens-before violated");
            return Err(err);
        }

        trace!(run, producer_spin, consumer_spin, "run consistent");
        if (run + 1) % 1_000 == 0 {
            debug!(strategy = %S::KIND, completed = run + 1, "progress");
        }
    }

    let report = Report {
        strategy: S::KIND,
        wait: scenario.wait,
        runs: scenario.runs,
        elapsed: started.elapsed(),
    };
    info!(%report, "scenario finished");
    Ok(report)
}

/// One producer/consumer pair over a fresh slot
///
/// `producer_spin` and `consumer_spin` are the number of spin hints each side issues before
/// publishing or starting to poll.
pub fn run_once<S: Strategy>(
    run: usize,
    scenario: &Scenario,
    producer_spin: u32,
    consumer_spin: u32,
) -> Result<Observation, HarnessError> {
    let (publisher, mut consumer) = common::channel::<S, String, i64>();

    let payload = scenario.payload.clone();
    let auxiliary = scenario.auxiliary;
    let producer_thread = ScopedThread::spawn(move || {
        delay(producer_spin);
        publisher.publish_value(payload, auxiliary);
    });

    let wait = scenario.wait;
    let timeout = scenario.timeout;
    let consumer_thread = ScopedThread::spawn(move || {
        delay(consumer_spin);
        let pauser = wait.pauser();
        let deadline = Instant::now() + timeout;
        loop {
            match consumer.try_consume() {
                Ok(published) => {
                    let (payload, auxiliary) = published.into_parts();
                    return Some(Observation {
                        payload: *payload,
                        auxiliary,
                    });
                }
                Err(TryConsumeError::Empty) if Instant::now() < deadline => pauser.pause(),
                Err(_) => return None,
            }
        }
    });

    producer_thread
        .join()
        .map_err(|_| HarnessError::ProducerPanicked { run })?;
    consumer_thread
        .join()
        .map_err(|_| HarnessError::ConsumerPanicked { run })?
        .ok_or(HarnessError::Timeout { run, timeout })
}

fn delay(spins: u32) {
    for _ in 0..spins {
        std::hint::spin_loop();
    }
}
