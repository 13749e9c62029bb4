//! cv-analysis: linear analysis and cycle metrics for the 0D circulation.
//!
//! Provides:
//! - Linearized arterial Windkessel sub-model (state space, transfer
//!   function, poles/zeros, natural frequency and damping)
//! - Observability checks (rank report, continuous-time Gramian)
//! - Structural identifiability roundtrip for the arterial constants
//! - Last-cycle physiological metrics for simulation signal maps

pub mod error;
pub mod identifiability;
pub mod linearization;
pub mod metrics;
pub mod observability;

// Re-exports for public API
pub use error::{AnalysisError, AnalysisResult};
pub use identifiability::{
    IdentifiabilityRoundtrip, is_structurally_identifiable, reconstruct_parameters,
    roundtrip_identifiability,
};
pub use linearization::{
    ArterialLti, TfCoeffs, arterial_expected_zero, arterial_frequency_params,
    arterial_lti_matrices, arterial_lti_matrices_with_resistance, arterial_poles_zeros,
    arterial_tf_coeffs, legacy_arterial_resistance,
};
pub use metrics::{
    MetricMap, arterial_pressure_metrics, compute_all_metrics, flow_metrics, last_cycle_start,
    stroke_volume, valve_timing_metrics, ventricular_pressure_metrics,
};
pub use observability::{
    ObservabilityReport, is_observable, observability_checks, observability_gramian,
    observability_gramian_eigs, observability_matrix,
};
