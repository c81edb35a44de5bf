//! Read-only views of sweep results for plotting and printing.

use std::fmt;

use serde::Serialize;

use crate::experiment::{Experiment, SweepResult};

/// Everything a plotting tool needs, ready for `serde_json`
#[derive(Clone, Debug, Serialize)]
pub struct Report {
    pub num_arms: usize,
    pub time_steps: usize,
    pub num_sims: usize,
    pub seed: u64,
    pub true_means: Vec<f64>,
    pub optimal_arm: usize,
    pub sweeps: Vec<SweepReport>,
}

#[derive(Clone, Debug, Serialize)]
pub struct SweepReport {
    pub strategy: String,
    pub parameter: String,
    pub configs: Vec<ConfigReport>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ConfigReport {
    pub value: f64,
    /// One series per arm, each of length `time_steps`
    pub mean_values: Vec<Vec<f64>>,
    pub optimal_fraction: Vec<f64>,
}

impl Report {
    pub fn new(experiment: &Experiment, sweeps: &[SweepResult]) -> Self {
        Self {
            num_arms: experiment.num_arms(),
            time_steps: experiment.time_steps(),
            num_sims: experiment.num_sims(),
            seed: experiment.seed(),
            true_means: experiment.rewards().true_means().to_vec(),
            optimal_arm: experiment.rewards().optimal_arm(),
            sweeps: sweeps.iter().map(SweepReport::from).collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl From<&SweepResult> for SweepReport {
    fn from(sweep: &SweepResult) -> Self {
        let configs = sweep
            .iter()
            .map(|result| ConfigReport {
                value: result.config_value(),
                mean_values: (0..result.num_arms())
                    .map(|arm| result.value_series(arm).to_vec())
                    .collect(),
                optimal_fraction: result.optimal_fraction().to_vec(),
            })
            .collect();
        Self {
            strategy: sweep.strategy().to_string(),
            parameter: sweep.strategy().parameter_name().to_string(),
            configs,
        }
    }
}

impl fmt::Display for SweepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parameter = self.strategy().parameter_name();
        writeln!(f, "{} (optimal arm {})", self.strategy(), self.optimal_arm())?;
        writeln!(
            f,
            "  {:>8}  {:>10}  {:>12}  {:>10}",
            parameter, "optimal %", "Q_T(a*)", "mean |err|"
        )?;
        for result in self.iter() {
            writeln!(
                f,
                "  {:>8}  {:>9.1}%  {:>12.4}  {:>10.4}",
                result.config_value(),
                result.final_optimal_fraction() * 100.0,
                result.final_values()[self.optimal_arm()],
                result.final_mean_abs_error(self.true_means()),
            )?;
        }
        if let Some(best) = self.best_config() {
            writeln!(f, "  best {parameter} = {best}")?;
        }
        Ok(())
    }
}
