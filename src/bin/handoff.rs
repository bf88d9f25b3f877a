use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use handoff::harness::{self, Scenario};
use handoff::{HandoffConfig, StrategyKind, WaitStrategy};

#[derive(Parser, Debug)]
#[command(version, about = "Stress the release/acquire publication protocol", long_about = None)]
struct Args {
    /// TOML config file; built-in defaults are used when absent
    #[arg(short, long)]
    config: Option<String>,

    /// Strategy to run: direct, fenced, or both
    #[arg(short, long)]
    strategy: Option<StrategyArg>,

    /// Pause between polls: spin or backoff
    #[arg(short, long)]
    wait: Option<WaitStrategy>,

    /// Producer/consumer pairs per strategy
    #[arg(short, long)]
    runs: Option<usize>,

    /// Seed for the random scheduling delays
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Debug, Clone, Copy)]
enum StrategyArg {
    One(StrategyKind),
    Both,
}

impl std::str::FromStr for StrategyArg {
    type Err = handoff::strategy::ParseStrategyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("both") {
            return Ok(StrategyArg::Both);
        }
        s.parse().map(StrategyArg::One)
    }
}

fn load_config(args: &Args) -> anyhow::Result<HandoffConfig> {
    let mut config = match &args.config {
        Some(path) => HandoffConfig::load(path.as_str())
            .with_context(|| format!("loading config from {path}"))?,
        None => HandoffConfig::default(),
    };

    match args.strategy {
        Some(StrategyArg::One(kind)) => config.strategies = vec![kind],
        Some(StrategyArg::Both) => config.strategies = StrategyKind::ALL.to_vec(),
        None => {}
    }
    if let Some(wait) = args.wait {
        config.wait = wait;
    }
    if let Some(runs) = args.runs {
        config.runs = runs;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!(
        payload = %config.payload,
        auxiliary = config.auxiliary,
        strategies = ?config.strategies,
        "publishing"
    );

    let scenario = Scenario::from_config(&config);
    for &strategy in &config.strategies {
        match harness::run(strategy, &scenario) {
            Ok(report) => println!("{report}"),
            Err(err) => {
                error!(%strategy, %err, "scenario failed");
                return Err(err.into());
            }
        }
    }

    Ok(())
}
