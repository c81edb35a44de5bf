use rand::Rng;

use crate::error::{BanditError, Result};
use crate::policy::{Policy, index_of_max};

/// Epsilon-greedy policy - explores with probability epsilon, exploits otherwise
///
/// Exploration picks an arm uniformly at random, which may be the greedy arm.
/// Exploitation picks the arm with the highest current estimate, ties going
/// to the lowest index.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EpsilonGreedy {
    epsilon: f64,
}

impl EpsilonGreedy {
    /// Creates a new EpsilonGreedy policy with the given epsilon
    ///
    /// Returns `InvalidParameter` unless `0 <= epsilon <= 1`.
    pub fn new(epsilon: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(BanditError::invalid(format!(
                "epsilon must be between 0 and 1, got {epsilon}"
            )));
        }
        Ok(Self { epsilon })
    }

    /// Gets the epsilon value
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }
}

impl Policy for EpsilonGreedy {
    fn select_arm(
        &self,
        values: &[f64],
        _counts: &[u64],
        _t: usize,
        rng: &mut dyn rand::RngCore,
    ) -> Result<usize> {
        if values.is_empty() {
            return Err(BanditError::NoArmsAvailable);
        }

        // Explore with probability epsilon
        let r: f64 = rng.random_range(0.0..1.0);
        if r < self.epsilon {
            Ok(rng.random_range(0..values.len()))
        } else {
            index_of_max(values).ok_or_else(|| BanditError::NumericalError {
                message: "every value estimate is NaN".to_string(),
            })
        }
    }

    fn label(&self) -> String {
        format!("eps = {}", self.epsilon)
    }
}
