//! Policy trait definition for action selection

use crate::error::Result;

/// Unified trait for action-selection policies
///
/// A policy only chooses; it never owns the value estimates. The caller passes
/// the current estimates and pull counts of one simulation run, so a single
/// policy value can be shared read-only by any number of concurrent runs.
///
/// Note: This trait uses `dyn rand::RngCore` instead of a generic parameter
/// to maintain object-safety, allowing `Box<dyn Policy>` to be used.
pub trait Policy: Send + Sync {
    /// Select an arm index in `[0, values.len())`
    ///
    /// # Arguments
    /// - `values`: Current estimated mean reward per arm
    /// - `counts`: Number of pulls per arm so far (same length as `values`)
    /// - `t`: Zero-based time step of the current run
    /// - `rng`: Random number generator for stochastic policies
    fn select_arm(
        &self,
        values: &[f64],
        counts: &[u64],
        t: usize,
        rng: &mut dyn rand::RngCore,
    ) -> Result<usize>;

    /// Short human-readable label, e.g. `eps = 0.1`
    fn label(&self) -> String;
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn select_arm(
        &self,
        values: &[f64],
        counts: &[u64],
        t: usize,
        rng: &mut dyn rand::RngCore,
    ) -> Result<usize> {
        (**self).select_arm(values, counts, t, rng)
    }

    fn label(&self) -> String {
        (**self).label()
    }
}

/// Index of the largest value, ties broken by the lowest index.
///
/// NaN entries never win. Returns `None` for an empty slice or a slice
/// containing only NaN.
pub fn index_of_max(values: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (idx, &value) in values.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_of_max_prefers_lowest_index() {
        assert_eq!(index_of_max(&[0.0, 0.0, 0.0]), Some(0));
        assert_eq!(index_of_max(&[0.1, 0.5, 0.5, 0.2]), Some(1));
        assert_eq!(
            index_of_max(&[1.0, f64::INFINITY, f64::INFINITY]),
            Some(1)
        );
    }

    #[test]
    fn test_index_of_max_edge_cases() {
        assert_eq!(index_of_max(&[]), None);
        assert_eq!(index_of_max(&[f64::NAN]), None);
        assert_eq!(index_of_max(&[f64::NAN, -3.0, f64::NAN]), Some(1));
        assert_eq!(index_of_max(&[f64::NEG_INFINITY, -1e300]), Some(1));
    }
}
