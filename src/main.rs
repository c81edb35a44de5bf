use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use banditry::experiment::{DEFAULT_NUM_ARMS, DEFAULT_NUM_SIMS, DEFAULT_TIME_STEPS};
use banditry::policies::Strategy;
use banditry::{Experiment, Report};
use clap::{Parser, ValueEnum};
use log::info;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    #[value(alias = "eps", alias = "egreedy", alias = "epsilon")]
    EpsilonGreedy,
    #[value(alias = "upper-confidence-bound")]
    Ucb,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::EpsilonGreedy => Strategy::EpsilonGreedy,
            StrategyArg::Ucb => Strategy::Ucb,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Monte Carlo comparison of epsilon-greedy and UCB on the k-armed bandit",
    long_about = None
)]
struct Args {
    /// Number of arms
    #[arg(long, default_value_t = DEFAULT_NUM_ARMS)]
    arms: usize,

    /// Pulls per simulation
    #[arg(long, default_value_t = DEFAULT_TIME_STEPS)]
    steps: usize,

    /// Simulations per configuration value
    #[arg(long, default_value_t = DEFAULT_NUM_SIMS)]
    sims: usize,

    /// Seed for the arm means and every simulation
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Strategy to sweep; repeat to run several (default: all)
    #[arg(long, value_enum)]
    strategy: Vec<StrategyArg>,

    /// Comma-separated sweep values (epsilon or C); defaults depend on the strategy
    #[arg(long, value_delimiter = ',')]
    values: Option<Vec<f64>>,

    /// Run simulations on the current thread only
    #[arg(long)]
    sequential: bool,

    /// Write the full time series as JSON to this file
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let strategies: Vec<Strategy> = if args.strategy.is_empty() {
        vec![Strategy::EpsilonGreedy, Strategy::Ucb]
    } else {
        args.strategy.iter().copied().map(Strategy::from).collect()
    };

    let experiment = Experiment::builder()
        .num_arms(args.arms)
        .time_steps(args.steps)
        .num_sims(args.sims)
        .seed(args.seed)
        .parallel(!args.sequential)
        .build()
        .context("invalid experiment configuration")?;

    info!(
        "true means: {:?} (optimal arm {})",
        experiment.rewards().true_means(),
        experiment.rewards().optimal_arm()
    );

    let plan: Vec<(Strategy, Vec<f64>)> = strategies
        .into_iter()
        .map(|strategy| {
            let values = args
                .values
                .clone()
                .unwrap_or_else(|| strategy.default_sweep());
            (strategy, values)
        })
        .collect();
    let sweeps = experiment
        .sweep_all(&plan)
        .with_context(|| format!("sweep plan {plan:?} failed"))?;
    for sweep in &sweeps {
        println!("{sweep}");
    }

    if let Some(path) = args.output {
        let json = Report::new(&experiment, &sweeps).to_json()?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        info!("wrote {}", path.display());
    }

    Ok(())
}
