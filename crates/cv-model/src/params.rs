//! Immutable parameter and configuration records.
//!
//! Units are consistent across the project:
//! - Pressures: mmHg
//! - Volumes: mL
//! - Flows: mL/s
//! - Time: s
//! - Resistances: mmHg*s/mL
//! - Compliance: mL/mmHg
//! - Inertance: mmHg*s^2/mL

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use cv_core::{ensure_finite, ensure_positive};

use crate::error::ModelResult;

/// Free-form metadata attached to a parameter set (transform provenance etc.).
pub type MetaMap = BTreeMap<String, serde_json::Value>;

/// Physiological constants for the 0D systemic circulation model.
///
/// Constructed once per scenario and never mutated in place; pathology
/// transforms derive a new instance from a base one.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParameterSet {
    /// Cardiac cycle duration [s]
    pub tcc: f64,

    /// Maximal ventricular compliance [mL/mmHg]
    pub cmax: f64,
    /// Minimal ventricular compliance [mL/mmHg]
    pub cmin: f64,

    /// Left atrial pressure [mmHg]
    pub p_la: f64,
    /// Right atrial (venous) pressure [mmHg]
    pub p_ra: f64,

    /// Mitral valve resistance [mmHg*s/mL]
    pub r_mv: f64,
    /// Aortic valve resistance [mmHg*s/mL]
    pub r_av: f64,

    /// Arterial (Windkessel) compliance [mL/mmHg]
    pub c_art: f64,
    /// Arterial inertance [mmHg*s^2/mL]
    pub i_art: f64,
    /// Arterial resistance [mmHg*s/mL]
    pub r_art: f64,
    /// Capillary resistance [mmHg*s/mL]
    pub r_cap: f64,

    /// Residual ventricular volume [mL], used for Vlv reconstruction
    pub v_r: f64,

    /// Slope of the tanh valve smoothing
    pub k_valve: f64,

    /// Descriptive label for plots and logs
    pub label: String,
    /// Transform provenance and other free-form metadata
    pub meta: MetaMap,
}

impl ParameterSet {
    /// Total peripheral resistance used by the nonlinear pipeline.
    ///
    /// Always computed, never stored redundantly.
    pub fn rtot(&self) -> f64 {
        self.r_art + self.r_cap
    }

    /// Check the positivity invariants on every quantity used as a divisor.
    ///
    /// Called at model construction; never silently clamps.
    pub fn validate(&self) -> ModelResult<()> {
        let positive: [(f64, &'static str); 10] = [
            (self.tcc, "Tcc must be > 0"),
            (self.cmax, "Cmax must be > 0"),
            (self.cmin, "Cmin must be > 0"),
            (self.r_mv, "RMV must be > 0"),
            (self.r_av, "RAV must be > 0"),
            (self.c_art, "Cart must be > 0"),
            (self.i_art, "Iart must be > 0"),
            (self.r_art, "Rart must be > 0"),
            (self.r_cap, "Rcap must be > 0"),
            (self.k_valve, "k_valve must be > 0"),
        ];
        for (v, what) in positive {
            ensure_positive(v, what)?;
        }
        // atrial pressures and residual volume may legitimately be zero
        for (v, what) in [(self.p_la, "pLA"), (self.p_ra, "pRA"), (self.v_r, "Vr")] {
            ensure_finite(v, what)?;
        }
        Ok(())
    }
}

/// Baseline (healthy) parameter set (~75 bpm).
///
/// A pure constructor: callers that want a shared default build it here
/// rather than reading process-wide state.
pub fn healthy_params(label: &str) -> ParameterSet {
    ParameterSet {
        tcc: 0.8,
        cmax: 15.0,
        cmin: 0.4,
        p_la: 8.0,
        p_ra: 3.0,
        r_mv: 1e-2,
        r_av: 0.1,
        c_art: 2.0,
        i_art: 1e-4,
        r_art: 0.1,
        r_cap: 1.0,
        v_r: 5.0,
        k_valve: 50.0,
        label: label.to_string(),
        meta: MetaMap::new(),
    }
}

/// Numerical controls for a simulation run, independent of physiology.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Number of cardiac cycles to simulate
    pub n_cycles: usize,
    /// Temporal resolution per cycle
    pub points_per_cycle: usize,
    /// Solver selection ("RK45" adaptive, "RK4" fixed-step)
    pub method: String,
    /// Relative tolerance for adaptive stepping
    pub rtol: f64,
    /// Absolute tolerance for adaptive stepping
    pub atol: f64,
    /// Record a cycle-to-cycle convergence diagnostic in the result notes
    pub enable_steady_state_check: bool,
    /// Tolerance on cycle-to-cycle difference of p1 [mmHg]
    pub steady_state_tol: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            n_cycles: 10,
            points_per_cycle: 800,
            method: "RK45".to_string(),
            rtol: 1e-6,
            atol: 1e-8,
            enable_steady_state_check: false,
            steady_state_tol: 1e-3,
        }
    }
}
