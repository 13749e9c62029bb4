use thiserror::Error;

pub type CvResult<T> = Result<T, CvError>;

#[derive(Error, Debug)]
pub enum CvError {
    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Shape mismatch: {what} (expected {expected}, got {got})")]
    ShapeMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("Invariant violated: {what}")]
    Invariant { what: &'static str },
}
