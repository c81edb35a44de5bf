//! Monte Carlo experiments over a configuration sweep.
//!
//! An [`Experiment`] fixes the arm means once, then for every configuration
//! value runs `num_sims` independent simulations and averages their
//! snapshots per time step. The averaging is a streaming reduction: each
//! chunk of simulations sums its records into `ndarray` accumulators and the
//! chunk sums are combined in a fixed order, so parallel and sequential runs
//! produce identical numbers.

use std::ops::Range;
use std::time::Instant;

use indexmap::IndexMap;
use log::{debug, info};
use ndarray::{Array1, Array2, ArrayView1};
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use rand_xoshiro::{SplitMix64, Xoshiro256PlusPlus};
use rayon::prelude::*;

use crate::error::{BanditError, Result};
use crate::policies::Strategy;
use crate::policy::{Policy, index_of_max};
use crate::reward::RewardModel;
use crate::simulation::{Simulation, TimeStep};

pub const DEFAULT_NUM_ARMS: usize = 10;
pub const DEFAULT_TIME_STEPS: usize = 1000;
pub const DEFAULT_NUM_SIMS: usize = 2000;

/// Simulations summed per reduction chunk
const CHUNK_SIZE: usize = 64;

/// Time-indexed averages for one configuration value
#[derive(Clone, Debug, PartialEq)]
pub struct AggregatedResult {
    config_value: f64,
    num_sims: usize,
    /// Shape `(time_steps, num_arms)`
    mean_values: Array2<f64>,
    /// Length `time_steps`
    optimal_fraction: Array1<f64>,
}

impl AggregatedResult {
    pub fn config_value(&self) -> f64 {
        self.config_value
    }

    pub fn num_sims(&self) -> usize {
        self.num_sims
    }

    pub fn time_steps(&self) -> usize {
        self.mean_values.nrows()
    }

    pub fn num_arms(&self) -> usize {
        self.mean_values.ncols()
    }

    /// Mean estimate of every arm (columns) at every time step (rows)
    pub fn mean_values(&self) -> &Array2<f64> {
        &self.mean_values
    }

    /// Mean estimate of `arm` over time
    ///
    /// # Panics
    /// Panics if `arm` is out of range.
    pub fn value_series(&self, arm: usize) -> ArrayView1<'_, f64> {
        self.mean_values.column(arm)
    }

    /// Mean fraction of pulls that went to the optimal arm, per time step
    pub fn optimal_fraction(&self) -> &Array1<f64> {
        &self.optimal_fraction
    }

    /// Mean estimates after the last time step
    pub fn final_values(&self) -> ArrayView1<'_, f64> {
        self.mean_values.row(self.time_steps() - 1)
    }

    pub fn final_optimal_fraction(&self) -> f64 {
        self.optimal_fraction[self.time_steps() - 1]
    }

    /// Mean absolute gap between the final estimates and `true_means`
    pub fn final_mean_abs_error(&self, true_means: &[f64]) -> f64 {
        let finals = self.final_values();
        let total: f64 = finals
            .iter()
            .zip(true_means)
            .map(|(estimate, truth)| (estimate - truth).abs())
            .sum();
        total / finals.len() as f64
    }
}

/// All aggregated results of one strategy's sweep, in sweep order
#[derive(Clone, Debug)]
pub struct SweepResult {
    strategy: Strategy,
    true_means: Vec<f64>,
    optimal_arm: usize,
    results: IndexMap<OrderedFloat<f64>, AggregatedResult>,
}

impl SweepResult {
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn true_means(&self) -> &[f64] {
        &self.true_means
    }

    pub fn optimal_arm(&self) -> usize {
        self.optimal_arm
    }

    /// Result for one configuration value
    pub fn get(&self, config_value: f64) -> Option<&AggregatedResult> {
        self.results.get(&OrderedFloat(config_value))
    }

    pub fn results(&self) -> &IndexMap<OrderedFloat<f64>, AggregatedResult> {
        &self.results
    }

    pub fn iter(&self) -> impl Iterator<Item = &AggregatedResult> {
        self.results.values()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Configuration value with the highest final optimal-action fraction
    pub fn best_config(&self) -> Option<f64> {
        let finals: Vec<f64> = self.iter().map(|r| r.final_optimal_fraction()).collect();
        index_of_max(&finals).map(|idx| self.results[idx].config_value())
    }
}

/// Per-time-step sums over a batch of simulations
struct Accumulator {
    value_sums: Array2<f64>,
    optimal_sums: Array1<f64>,
}

impl Accumulator {
    fn new(time_steps: usize, num_arms: usize) -> Self {
        Self {
            value_sums: Array2::zeros((time_steps, num_arms)),
            optimal_sums: Array1::zeros(time_steps),
        }
    }

    fn add_run<I>(&mut self, steps: I) -> Result<()>
    where
        I: Iterator<Item = Result<TimeStep>>,
    {
        for step in steps {
            let step = step?;
            let mut row = self.value_sums.row_mut(step.t);
            row += &ArrayView1::from(step.values.as_slice());
            self.optimal_sums[step.t] += step.optimal_fraction;
        }
        Ok(())
    }

    fn merge(&mut self, other: &Accumulator) {
        self.value_sums += &other.value_sums;
        self.optimal_sums += &other.optimal_sums;
    }

    fn into_result(self, config_value: f64, num_sims: usize) -> AggregatedResult {
        let n = num_sims as f64;
        AggregatedResult {
            config_value,
            num_sims,
            mean_values: self.value_sums / n,
            optimal_fraction: self.optimal_sums / n,
        }
    }
}

/// Builder for creating experiments with a fluent API
#[derive(Clone, Debug)]
pub struct ExperimentBuilder {
    num_arms: usize,
    time_steps: usize,
    num_sims: usize,
    seed: u64,
    parallel: bool,
    true_means: Option<Vec<f64>>,
}

impl Default for ExperimentBuilder {
    fn default() -> Self {
        Self {
            num_arms: DEFAULT_NUM_ARMS,
            time_steps: DEFAULT_TIME_STEPS,
            num_sims: DEFAULT_NUM_SIMS,
            seed: 0,
            parallel: true,
            true_means: None,
        }
    }
}

impl ExperimentBuilder {
    /// Number of arms whose means are drawn from N(0, 1)
    pub fn num_arms(mut self, num_arms: usize) -> Self {
        self.num_arms = num_arms;
        self
    }

    /// Pulls per simulation
    pub fn time_steps(mut self, time_steps: usize) -> Self {
        self.time_steps = time_steps;
        self
    }

    /// Simulations per configuration value
    pub fn num_sims(mut self, num_sims: usize) -> Self {
        self.num_sims = num_sims;
        self
    }

    /// Seed for the arm means and every simulation stream
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Spread simulations over the rayon thread pool
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Use fixed arm means instead of drawing them; overrides `num_arms`
    pub fn true_means<I>(mut self, means: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        self.true_means = Some(means.into_iter().collect());
        self
    }

    /// Validate the configuration and draw the arm means
    pub fn build(self) -> Result<Experiment> {
        if self.time_steps == 0 {
            return Err(BanditError::invalid("time_steps must be positive"));
        }
        if self.num_sims == 0 {
            return Err(BanditError::invalid("num_sims must be positive"));
        }

        let rewards = match self.true_means {
            Some(means) => RewardModel::new(means)?,
            None => {
                if self.num_arms == 0 {
                    return Err(BanditError::NoArmsAvailable);
                }
                let mut rng = StdRng::seed_from_u64(self.seed);
                RewardModel::generate(self.num_arms, &mut rng)?
            }
        };

        debug!(
            "experiment: {} arms, optimal arm {} (q* = {:.4})",
            rewards.num_arms(),
            rewards.optimal_arm(),
            rewards.true_means()[rewards.optimal_arm()]
        );

        Ok(Experiment {
            rewards,
            time_steps: self.time_steps,
            num_sims: self.num_sims,
            seed: self.seed,
            parallel: self.parallel,
        })
    }
}

/// A fixed bandit problem plus the Monte Carlo parameters to study it with
#[derive(Clone, Debug)]
pub struct Experiment {
    rewards: RewardModel,
    time_steps: usize,
    num_sims: usize,
    seed: u64,
    parallel: bool,
}

impl Experiment {
    /// Create a new builder for constructing an experiment
    pub fn builder() -> ExperimentBuilder {
        ExperimentBuilder::default()
    }

    pub fn rewards(&self) -> &RewardModel {
        &self.rewards
    }

    pub fn num_arms(&self) -> usize {
        self.rewards.num_arms()
    }

    pub fn time_steps(&self) -> usize {
        self.time_steps
    }

    pub fn num_sims(&self) -> usize {
        self.num_sims
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Run a strategy over every value of a configuration sweep
    pub fn sweep(&self, strategy: Strategy, values: &[f64]) -> Result<SweepResult> {
        let started = Instant::now();
        let results = self.aggregate(values, |value| strategy.policy(value))?;
        info!(
            "{strategy} sweep over {} values x {} sims x {} steps finished in {:.2?}",
            values.len(),
            self.num_sims,
            self.time_steps,
            started.elapsed()
        );
        Ok(SweepResult {
            strategy,
            true_means: self.rewards.true_means().to_vec(),
            optimal_arm: self.rewards.optimal_arm(),
            results,
        })
    }

    /// Run several sweeps, checking every one of them before any runs
    pub fn sweep_all(&self, plan: &[(Strategy, Vec<f64>)]) -> Result<Vec<SweepResult>> {
        for (strategy, values) in plan {
            Self::validate_sweep(*strategy, values)?;
        }
        plan.iter()
            .map(|(strategy, values)| self.sweep(*strategy, values))
            .collect()
    }

    /// Check a sweep without running it: non-empty, no duplicates, and
    /// every value valid for `strategy`
    pub fn validate_sweep(strategy: Strategy, values: &[f64]) -> Result<()> {
        build_policies(values, |value| strategy.policy(value)).map(|_| ())
    }

    /// Aggregate `num_sims` runs for every configuration value
    ///
    /// Every policy is built, and every value checked, before the first
    /// simulation starts.
    pub fn aggregate<P, F>(
        &self,
        values: &[f64],
        make_policy: F,
    ) -> Result<IndexMap<OrderedFloat<f64>, AggregatedResult>>
    where
        P: Policy,
        F: Fn(f64) -> Result<P>,
    {
        let policies = build_policies(values, make_policy)?;

        let mut results = IndexMap::with_capacity(policies.len());
        for (config_index, (value, policy)) in policies.iter().enumerate() {
            debug!("running {} ({} sims)", policy.label(), self.num_sims);
            let result = self.run_config(policy, config_index, value.0)?;
            results.insert(*value, result);
        }
        Ok(results)
    }

    /// Aggregate `num_sims` runs of a single policy
    ///
    /// `config_index` selects the family of random streams, so distinct
    /// configurations of one sweep see independent draws.
    pub fn run_config<P>(
        &self,
        policy: &P,
        config_index: usize,
        config_value: f64,
    ) -> Result<AggregatedResult>
    where
        P: Policy + ?Sized,
    {
        let chunks: Vec<Range<usize>> = (0..self.num_sims)
            .step_by(CHUNK_SIZE)
            .map(|start| start..(start + CHUNK_SIZE).min(self.num_sims))
            .collect();

        let partials: Vec<Accumulator> = if self.parallel {
            chunks
                .into_par_iter()
                .map(|sims| self.run_chunk(policy, config_index, sims))
                .collect::<Result<_>>()?
        } else {
            chunks
                .into_iter()
                .map(|sims| self.run_chunk(policy, config_index, sims))
                .collect::<Result<_>>()?
        };

        let mut total = Accumulator::new(self.time_steps, self.num_arms());
        for partial in &partials {
            total.merge(partial);
        }
        Ok(total.into_result(config_value, self.num_sims))
    }

    /// Independent random stream of one simulation
    pub fn simulation_rng(&self, config_index: usize, sim: usize) -> Xoshiro256PlusPlus {
        let config_key = SplitMix64::seed_from_u64(self.seed ^ config_index as u64).next_u64();
        let sim_key = SplitMix64::seed_from_u64(config_key ^ sim as u64).next_u64();
        Xoshiro256PlusPlus::seed_from_u64(sim_key)
    }

    fn run_chunk<P>(&self, policy: &P, config_index: usize, sims: Range<usize>) -> Result<Accumulator>
    where
        P: Policy + ?Sized,
    {
        debug!("config {config_index}: sims {sims:?}");
        let mut acc = Accumulator::new(self.time_steps, self.num_arms());
        for sim in sims {
            let rng = self.simulation_rng(config_index, sim);
            acc.add_run(Simulation::new(policy, &self.rewards, self.time_steps, rng))?;
        }
        Ok(acc)
    }
}

/// One policy per distinct configuration value, in sweep order
fn build_policies<P, F>(values: &[f64], make_policy: F) -> Result<IndexMap<OrderedFloat<f64>, P>>
where
    F: Fn(f64) -> Result<P>,
{
    if values.is_empty() {
        return Err(BanditError::EmptySweep);
    }

    let mut policies = IndexMap::with_capacity(values.len());
    for &value in values {
        let policy = make_policy(value)?;
        if policies.insert(OrderedFloat(value), policy).is_some() {
            return Err(BanditError::invalid(format!(
                "configuration value {value} appears more than once"
            )));
        }
    }
    Ok(policies)
}
