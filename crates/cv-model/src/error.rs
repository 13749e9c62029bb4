//! Error types for model construction and evaluation.

use thiserror::Error;

/// Errors raised while building or evaluating the physiological model.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Invalid parameter: {what}")]
    InvalidParameter { what: &'static str },

    #[error("Numeric error: {0}")]
    Numeric(#[from] cv_core::CvError),
}

pub type ModelResult<T> = Result<T, ModelError>;
