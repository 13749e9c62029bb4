//! Error types for simulation operations.

use thiserror::Error;

/// Errors encountered during transient simulation.
#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Convergence failed: {what}")]
    ConvergenceFailed { what: String },

    #[error("Model error: {0}")]
    Model(#[from] cv_model::ModelError),

    #[error("Numeric error: {0}")]
    Numeric(#[from] cv_core::CvError),
}

pub type SimResult<T> = Result<T, SimError>;
