//! Error types for the banditry library.

use thiserror::Error;

/// Result type alias for simulation operations.
pub type Result<T> = std::result::Result<T, BanditError>;

/// Errors that can occur while configuring or running an experiment.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BanditError {
    /// The experiment has no arms to pull.
    #[error("no arms available")]
    NoArmsAvailable,

    /// Invalid parameter value.
    #[error("invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// The configuration sweep contains no values.
    #[error("configuration sweep is empty")]
    EmptySweep,

    /// Numerical computation error.
    #[error("numerical error: {message}")]
    NumericalError { message: String },
}

impl BanditError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        BanditError::InvalidParameter {
            message: message.into(),
        }
    }

    /// Returns true for errors raised while validating a configuration,
    /// before any simulation ran.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, BanditError::NumericalError { .. })
    }
}
