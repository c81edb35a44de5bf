//! Banditry: Monte Carlo experiments on the stationary k-armed bandit.
//!
//! Each arm has a hidden true mean drawn once from N(0, 1); pulling it yields
//! that mean plus N(0, 1) noise. Policies choose arms from running sample-mean
//! estimates, and an [`Experiment`] averages many independent runs per
//! configuration value to show how fast the estimates converge and how often
//! the optimal arm is chosen.
//!
//! # Quick Start
//!
//! ```
//! use banditry::prelude::*;
//!
//! let experiment = Experiment::builder()
//!     .num_arms(5)
//!     .time_steps(100)
//!     .num_sims(50)
//!     .seed(42)
//!     .build()
//!     .unwrap();
//!
//! let sweep = experiment.sweep(Strategy::Ucb, &[0.5, 2.0]).unwrap();
//! let result = sweep.get(2.0).unwrap();
//! assert_eq!(result.optimal_fraction().len(), 100);
//! println!("{sweep}");
//! ```

mod error;
pub mod estimator;
pub mod experiment;
pub mod policies;
mod policy;
pub mod report;
pub mod reward;
pub mod simulation;

// Re-export main types
pub use error::{BanditError, Result};
pub use estimator::ValueEstimator;
pub use experiment::{AggregatedResult, Experiment, ExperimentBuilder, SweepResult};
pub use policy::{Policy, index_of_max};
pub use report::Report;
pub use reward::RewardModel;
pub use simulation::{Simulation, TimeStep};

/// Prelude module for convenient imports.
///
/// # Examples
///
/// ```
/// use banditry::prelude::*;
/// ```
pub mod prelude {
    pub use crate::policies::{EpsilonGreedy, Policy, Strategy, Ucb};
    pub use crate::{
        AggregatedResult, BanditError, Experiment, Report, Result, RewardModel, Simulation,
        SweepResult, TimeStep, ValueEstimator,
    };
}
