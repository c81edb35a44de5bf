use crate::error::{BanditError, Result};
use crate::policy::{Policy, index_of_max};

/// Upper Confidence Bound policy
///
/// Scores every arm as `Q(a) + c * sqrt(ln(t) / N(a))` and picks the highest
/// score, ties going to the lowest index. Arms that were never pulled score
/// `+inf`, so each arm is pulled once before any exploitation starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ucb {
    /// Exploration weight; larger values favour under-sampled arms
    c: f64,
}

impl Ucb {
    /// Creates a new UCB policy with the given exploration weight
    ///
    /// Returns `InvalidParameter` if `c` is negative or not finite. `c = 0`
    /// is allowed and degenerates to greedy selection after the warm-up.
    pub fn new(c: f64) -> Result<Self> {
        if !c.is_finite() || c < 0.0 {
            return Err(BanditError::invalid(format!(
                "UCB exploration weight must be finite and non-negative, got {c}"
            )));
        }
        Ok(Self { c })
    }

    /// Gets the exploration weight
    pub fn c(&self) -> f64 {
        self.c
    }

    /// UCB score of a single arm at time step `t`
    ///
    /// Unpulled arms score `+inf`. Scoring a pulled arm at `t == 0` is a
    /// `NumericalError` since `ln(0)` is undefined.
    pub fn score(&self, value: f64, count: u64, t: usize) -> Result<f64> {
        if count == 0 {
            return Ok(f64::INFINITY);
        }
        if t == 0 {
            return Err(BanditError::NumericalError {
                message: format!(
                    "UCB bonus needs ln(t) but t = 0 with an arm already pulled {count} time(s)"
                ),
            });
        }
        let exploration = self.c * ((t as f64).ln() / count as f64).sqrt();
        Ok(value + exploration)
    }

    /// Scores for every arm at time step `t`
    pub fn scores(&self, values: &[f64], counts: &[u64], t: usize) -> Result<Vec<f64>> {
        values
            .iter()
            .zip(counts)
            .map(|(&value, &count)| self.score(value, count, t))
            .collect()
    }
}

impl Policy for Ucb {
    fn select_arm(
        &self,
        values: &[f64],
        counts: &[u64],
        t: usize,
        _rng: &mut dyn rand::RngCore,
    ) -> Result<usize> {
        if values.is_empty() {
            return Err(BanditError::NoArmsAvailable);
        }
        if values.len() != counts.len() {
            return Err(BanditError::invalid(format!(
                "{} value estimates but {} pull counts",
                values.len(),
                counts.len()
            )));
        }

        let scores = self.scores(values, counts, t)?;
        index_of_max(&scores).ok_or_else(|| BanditError::NumericalError {
            message: "every UCB score is NaN".to_string(),
        })
    }

    fn label(&self) -> String {
        format!("C = {}", self.c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::SeedableRng;

    #[test]
    fn test_ucb_explores_unpulled_arms_first() {
        let policy = Ucb::new(2.0).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);

        // Arm 0 looks great, but arm 1 has never been pulled
        let choice = policy
            .select_arm(&[5.0, 0.0, 0.0], &[1, 0, 0], 1, &mut rng)
            .unwrap();
        assert_eq!(choice, 1);
    }

    #[test]
    fn test_ucb_first_step_picks_arm_zero() {
        let policy = Ucb::new(0.5).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let choice = policy.select_arm(&[0.0; 4], &[0; 4], 0, &mut rng).unwrap();
        assert_eq!(choice, 0);
    }

    #[test]
    fn test_ucb_score_formula() {
        let policy = Ucb::new(2.0).unwrap();
        let score = policy.score(0.4, 4, 10).unwrap();
        assert_abs_diff_eq!(score, 0.4 + 2.0 * (10f64.ln() / 4.0).sqrt(), epsilon = 1e-12);

        // ln(1) = 0, so the bonus vanishes at t = 1
        assert_abs_diff_eq!(policy.score(0.7, 1, 1).unwrap(), 0.7);
        assert_eq!(policy.score(-3.0, 0, 0).unwrap(), f64::INFINITY);
    }

    #[test]
    fn test_ucb_rejects_pulled_arm_at_time_zero() {
        let policy = Ucb::new(1.0).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        let result = policy.select_arm(&[0.3, 0.0], &[1, 0], 0, &mut rng);
        assert!(matches!(result, Err(BanditError::NumericalError { .. })));
    }

    #[test]
    fn test_ucb_balances_exploration_exploitation() {
        let policy = Ucb::new(2.0).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);

        // Arm 1 has the best estimate, arm 2 is far less explored
        let values = [0.5, 0.85, 0.7];
        let counts = [30, 30, 1];
        let choice = policy.select_arm(&values, &counts, 61, &mut rng).unwrap();
        assert_eq!(choice, 2);

        // With no exploration weight the estimate alone decides
        let greedy = Ucb::new(0.0).unwrap();
        let choice = greedy.select_arm(&values, &counts, 61, &mut rng).unwrap();
        assert_eq!(choice, 1);
    }

    #[test]
    fn test_ucb_deterministic_selection() {
        let policy = Ucb::new(1.0).unwrap();
        let values = [0.15, 0.55, 0.85];
        let counts = [2, 2, 2];

        let mut rng1 = rand::rngs::StdRng::seed_from_u64(1);
        let mut rng2 = rand::rngs::StdRng::seed_from_u64(999);

        let choice1 = policy.select_arm(&values, &counts, 6, &mut rng1).unwrap();
        let choice2 = policy.select_arm(&values, &counts, 6, &mut rng2).unwrap();
        assert_eq!(choice1, choice2);
    }

    #[test]
    fn test_ucb_rejects_invalid_weight() {
        assert!(Ucb::new(-1.0).is_err());
        assert!(Ucb::new(f64::INFINITY).is_err());
        assert!(Ucb::new(f64::NAN).is_err());
        assert_eq!(Ucb::new(5.0).unwrap().c(), 5.0);
    }

    #[test]
    fn test_ucb_length_mismatch() {
        let policy = Ucb::new(1.0).unwrap();
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        assert!(policy.select_arm(&[0.0, 0.0], &[1], 3, &mut rng).is_err());
    }
}
