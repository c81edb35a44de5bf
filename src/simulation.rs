//! A single run of the bandit problem.
//!
//! [`Simulation`] is a lazy iterator: every call to `next` selects an arm,
//! samples its reward, folds the reward into the estimates and yields a
//! [`TimeStep`] snapshot. The run owns its estimates and random stream, so
//! runs never share mutable state.

use std::iter::FusedIterator;

use rand::RngCore;

use crate::error::Result;
use crate::estimator::ValueEstimator;
use crate::policy::Policy;
use crate::reward::RewardModel;

/// Snapshot recorded after the pull at time step `t`
#[derive(Clone, Debug, PartialEq)]
pub struct TimeStep {
    /// Zero-based time step
    pub t: usize,
    /// Arm pulled at this step
    pub arm: usize,
    /// Reward observed for the pull
    pub reward: f64,
    /// Copy of every arm's estimate after the update
    pub values: Vec<f64>,
    /// Share of the `t + 1` pulls so far that went to the optimal arm
    pub optimal_fraction: f64,
}

/// One run of `time_steps` pulls
pub struct Simulation<'a, P: ?Sized, R> {
    policy: &'a P,
    rewards: &'a RewardModel,
    estimator: ValueEstimator,
    rng: R,
    t: usize,
    time_steps: usize,
}

impl<'a, P, R> Simulation<'a, P, R>
where
    P: Policy + ?Sized,
    R: RngCore,
{
    /// Starts a fresh run with all estimates and counts at zero
    pub fn new(policy: &'a P, rewards: &'a RewardModel, time_steps: usize, rng: R) -> Self {
        Self {
            policy,
            rewards,
            estimator: ValueEstimator::new(rewards.num_arms()),
            rng,
            t: 0,
            time_steps,
        }
    }

    /// Current estimates and counts of this run
    pub fn estimator(&self) -> &ValueEstimator {
        &self.estimator
    }

    fn step(&mut self) -> Result<TimeStep> {
        let t = self.t;
        let arm = self.policy.select_arm(
            self.estimator.values(),
            self.estimator.counts(),
            t,
            &mut self.rng,
        )?;
        let reward = self.rewards.sample(arm, &mut self.rng);
        self.estimator.update(arm, reward);

        let optimal_pulls = self.estimator.counts()[self.rewards.optimal_arm()];
        Ok(TimeStep {
            t,
            arm,
            reward,
            values: self.estimator.values().to_vec(),
            optimal_fraction: optimal_pulls as f64 / (t + 1) as f64,
        })
    }
}

impl<P, R> Iterator for Simulation<'_, P, R>
where
    P: Policy + ?Sized,
    R: RngCore,
{
    type Item = Result<TimeStep>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.t >= self.time_steps {
            return None;
        }
        let step = self.step();
        match step {
            Ok(_) => self.t += 1,
            // Abort the run: nothing after a failed step is meaningful
            Err(_) => self.t = self.time_steps,
        }
        Some(step)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.time_steps - self.t;
        (0, Some(remaining))
    }
}

impl<P, R> FusedIterator for Simulation<'_, P, R>
where
    P: Policy + ?Sized,
    R: RngCore,
{
}

/// Runs a whole simulation and collects every record
pub fn run<P, R>(
    policy: &P,
    rewards: &RewardModel,
    time_steps: usize,
    rng: R,
) -> Result<Vec<TimeStep>>
where
    P: Policy + ?Sized,
    R: RngCore,
{
    Simulation::new(policy, rewards, time_steps, rng).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BanditError;
    use crate::policies::{EpsilonGreedy, Ucb};
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn model() -> RewardModel {
        RewardModel::new(vec![0.1, -0.4, 0.9, 0.3]).unwrap()
    }

    #[test]
    fn test_run_length_and_pull_counts() {
        let rewards = model();
        let policy = EpsilonGreedy::new(0.1).unwrap();
        let mut sim = Simulation::new(&policy, &rewards, 250, Xoshiro256PlusPlus::seed_from_u64(5));

        let mut steps = 0;
        while let Some(step) = sim.next() {
            let step = step.unwrap();
            assert_eq!(step.t, steps);
            steps += 1;
            assert_eq!(sim.estimator().total_pulls(), steps as u64);
            assert!((0.0..=1.0).contains(&step.optimal_fraction));
        }
        assert_eq!(steps, 250);
        assert!(sim.next().is_none());
    }

    #[test]
    fn test_snapshots_are_copies() {
        let rewards = model();
        let policy = Ucb::new(1.0).unwrap();
        let records = run(&policy, &rewards, 8, Xoshiro256PlusPlus::seed_from_u64(9)).unwrap();

        // Warm-up pulls arms 0..4 in order, so arm 3 is still unestimated at t = 2
        assert_eq!(records[2].values[3], 0.0);
        assert_ne!(records[3].values[3], 0.0);
        assert_eq!(records[3].values[3], records[3].reward);
    }

    #[test]
    fn test_optimal_fraction_matches_pulls() {
        let rewards = model();
        let policy = EpsilonGreedy::new(0.5).unwrap();
        let records = run(&policy, &rewards, 100, Xoshiro256PlusPlus::seed_from_u64(1)).unwrap();

        let mut optimal = 0;
        for record in &records {
            if record.arm == rewards.optimal_arm() {
                optimal += 1;
            }
            let expected = optimal as f64 / (record.t + 1) as f64;
            assert_eq!(record.optimal_fraction, expected);
        }
    }

    struct FailsAt(usize);

    impl Policy for FailsAt {
        fn select_arm(
            &self,
            _values: &[f64],
            _counts: &[u64],
            t: usize,
            _rng: &mut dyn rand::RngCore,
        ) -> Result<usize> {
            if t == self.0 {
                Err(BanditError::NumericalError {
                    message: "boom".into(),
                })
            } else {
                Ok(0)
            }
        }

        fn label(&self) -> String {
            "fails".into()
        }
    }

    #[test]
    fn test_error_aborts_run() {
        let rewards = model();
        let policy = FailsAt(3);
        let mut sim = Simulation::new(&policy, &rewards, 10, Xoshiro256PlusPlus::seed_from_u64(0));

        for _ in 0..3 {
            assert!(sim.next().unwrap().is_ok());
        }
        assert!(sim.next().unwrap().is_err());
        assert!(sim.next().is_none());

        assert!(run(&policy, &rewards, 10, Xoshiro256PlusPlus::seed_from_u64(0)).is_err());
    }
}
