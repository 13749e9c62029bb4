use thiserror::Error;

/// Errors raised by the analysis routines.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Missing required signal: {name}")]
    MissingSignal { name: String },

    #[error("Linear solve failed: {what}")]
    Singular { what: &'static str },
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
