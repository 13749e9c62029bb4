//! cv-core: stable foundation for cardio0d.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CvError, CvResult};
pub use numeric::*;
