//! Stationary Gaussian reward model.
//!
//! Every arm has a hidden true mean `q*(a)`; pulling it yields
//! `q*(a) + N(0, 1)`.

use rand::Rng;
use rand_distr::{Distribution, StandardNormal};

use crate::error::{BanditError, Result};
use crate::policy::index_of_max;

/// Per-arm true means plus unit-variance Gaussian noise
#[derive(Clone, Debug, PartialEq)]
pub struct RewardModel {
    true_means: Vec<f64>,
    optimal_arm: usize,
}

impl RewardModel {
    /// Creates a reward model from explicit true means
    pub fn new(true_means: Vec<f64>) -> Result<Self> {
        if true_means.is_empty() {
            return Err(BanditError::NoArmsAvailable);
        }
        if let Some((arm, mean)) = true_means.iter().enumerate().find(|(_, m)| !m.is_finite()) {
            return Err(BanditError::invalid(format!(
                "true mean of arm {arm} must be finite, got {mean}"
            )));
        }
        let optimal_arm = index_of_max(&true_means).ok_or(BanditError::NoArmsAvailable)?;
        Ok(Self {
            true_means,
            optimal_arm,
        })
    }

    /// Draws `num_arms` true means from a standard normal distribution
    pub fn generate<R: Rng + ?Sized>(num_arms: usize, rng: &mut R) -> Result<Self> {
        let true_means: Vec<f64> = (0..num_arms)
            .map(|_| StandardNormal.sample(&mut *rng))
            .collect();
        Self::new(true_means)
    }

    /// Samples a reward for `arm`
    ///
    /// # Panics
    /// Panics if `arm >= self.num_arms()`.
    pub fn sample<R: Rng + ?Sized>(&self, arm: usize, rng: &mut R) -> f64 {
        let noise: f64 = StandardNormal.sample(rng);
        self.true_means[arm] + noise
    }

    pub fn true_means(&self) -> &[f64] {
        &self.true_means
    }

    /// Arm with the highest true mean (lowest index on ties)
    pub fn optimal_arm(&self) -> usize {
        self.optimal_arm
    }

    pub fn num_arms(&self) -> usize {
        self.true_means.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_optimal_arm() {
        let model = RewardModel::new(vec![0.2, 1.5, -0.3, 1.5]).unwrap();
        assert_eq!(model.optimal_arm(), 1);
        assert_eq!(model.num_arms(), 4);
    }

    #[test]
    fn test_rejects_bad_means() {
        assert_eq!(RewardModel::new(vec![]), Err(BanditError::NoArmsAvailable));
        assert!(RewardModel::new(vec![0.0, f64::NAN]).is_err());
        assert!(RewardModel::new(vec![f64::INFINITY]).is_err());
    }

    #[test]
    fn test_sample_mean_converges() {
        let model = RewardModel::new(vec![-1.0, 2.0]).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(3);

        let n = 20_000;
        let samples: Vec<f64> = (0..n).map(|_| model.sample(1, &mut rng)).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let variance = samples.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n as f64;

        assert_abs_diff_eq!(mean, 2.0, epsilon = 0.05);
        assert_abs_diff_eq!(variance, 1.0, epsilon = 0.05);
    }

    #[test]
    fn test_generate_is_seeded() {
        let mut rng1 = rand::rngs::StdRng::seed_from_u64(11);
        let mut rng2 = rand::rngs::StdRng::seed_from_u64(11);
        let a = RewardModel::generate(10, &mut rng1).unwrap();
        let b = RewardModel::generate(10, &mut rng2).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.num_arms(), 10);
    }

    #[test]
    #[should_panic]
    fn test_sample_out_of_range_panics() {
        let model = RewardModel::new(vec![0.0]).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        model.sample(1, &mut rng);
    }
}
