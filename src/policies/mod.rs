mod epsilon_greedy;
mod ucb;

use std::fmt;

pub use epsilon_greedy::EpsilonGreedy;
pub use ucb::Ucb;

pub use crate::policy::Policy;
use crate::error::Result;

/// The family of policies a configuration sweep runs over
///
/// A sweep value is interpreted as epsilon for [`Strategy::EpsilonGreedy`]
/// and as the exploration weight `C` for [`Strategy::Ucb`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    EpsilonGreedy,
    Ucb,
}

impl Strategy {
    /// Builds the policy for one sweep value
    pub fn policy(self, value: f64) -> Result<Box<dyn Policy>> {
        Ok(match self {
            Strategy::EpsilonGreedy => Box::new(EpsilonGreedy::new(value)?),
            Strategy::Ucb => Box::new(Ucb::new(value)?),
        })
    }

    /// Name of the swept parameter
    pub fn parameter_name(self) -> &'static str {
        match self {
            Strategy::EpsilonGreedy => "eps",
            Strategy::Ucb => "C",
        }
    }

    /// Sweep used when none is given explicitly
    pub fn default_sweep(self) -> Vec<f64> {
        match self {
            Strategy::EpsilonGreedy => vec![0.01, 0.1],
            Strategy::Ucb => vec![0.5, 1.0, 2.0, 5.0],
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::EpsilonGreedy => write!(f, "epsilon-greedy"),
            Strategy::Ucb => write!(f, "ucb"),
        }
    }
}
