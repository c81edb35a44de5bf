//! Incremental per-arm value estimates.

/// Running sample mean and pull count for every arm
///
/// Each update is O(1) and no reward history is kept:
/// `Q(a) <- (Q(a) * N(a) + r) / (N(a) + 1)`, then `N(a) += 1`.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueEstimator {
    values: Vec<f64>,
    counts: Vec<u64>,
}

impl ValueEstimator {
    /// All estimates and counts start at zero
    pub fn new(num_arms: usize) -> Self {
        Self {
            values: vec![0.0; num_arms],
            counts: vec![0; num_arms],
        }
    }

    /// Folds one observed reward for `arm` into its estimate
    ///
    /// # Panics
    /// Panics if `arm` is out of range.
    pub fn update(&mut self, arm: usize, reward: f64) {
        let count = self.counts[arm] as f64;
        self.values[arm] = (self.values[arm] * count + reward) / (count + 1.0);
        self.counts[arm] += 1;
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Total number of updates across all arms
    pub fn total_pulls(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn num_arms(&self) -> usize {
        self.values.len()
    }
}
