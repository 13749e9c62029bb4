//! cv-model: physiology and parameters for the 0D systemic circulation.
//!
//! Provides:
//! - Immutable parameter and configuration records
//! - Healthy baseline preset and pathology transforms
//! - Periodic ventricular activation profile
//! - Time-varying ventricular compliance and elastance
//! - Smoothed diode-like valve flows
//! - Three-state nonlinear right-hand side

pub mod activation;
pub mod compliance;
pub mod error;
pub mod params;
pub mod pathology;
pub mod rhs;
pub mod valves;

// Re-exports for public API
pub use activation::{ActivationProfile, TCC_REF};
pub use compliance::ComplianceModel;
pub use error::{ModelError, ModelResult};
pub use params::{MetaMap, ParameterSet, SimulationConfig, healthy_params};
pub use pathology::{
    arterial_stiffening_combo, combined_stiffness_and_afterload, increased_afterload,
    reduced_arterial_compliance,
};
pub use rhs::{State3, SystemicModel};
pub use valves::{SmoothValve, smooth_heaviside};
