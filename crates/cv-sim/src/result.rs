//! Simulation result container.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};
use crate::signals::SignalMap;
use cv_model::{ParameterSet, SimulationConfig, State3};

/// Container for simulation outputs.
///
/// Created once per run by the pipeline and treated as read-only afterward;
/// the only sanctioned update is the pure [`SimulationResult::with_metrics`]
/// transformation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Time vector [s]
    pub t: Vec<f64>,
    /// State trajectory, rows [pLV, Q2, p1]
    pub x: Vec<State3>,
    /// Parameters used for this run
    pub params: ParameterSet,
    /// Numerical configuration used for this run
    pub config: SimulationConfig,
    /// Reconstructed derived signals, aligned with `t`
    pub signals: SignalMap,
    /// Scalar summary metrics (populated by an analysis collaborator)
    pub metrics: BTreeMap<String, f64>,
    /// Run diagnostics (steady-state check etc.)
    pub notes: BTreeMap<String, serde_json::Value>,
}

impl SimulationResult {
    /// Fixed state ordering shared project-wide.
    pub fn state_names() -> [&'static str; 3] {
        ["pLV", "Q2", "p1"]
    }

    /// Extract one state column by name.
    pub fn state(&self, name: &str) -> SimResult<Vec<f64>> {
        let idx = Self::state_names()
            .iter()
            .position(|&n| n == name)
            .ok_or(SimError::InvalidArg {
                what: "unknown state name (expected pLV, Q2, or p1)",
            })?;
        Ok(self.x.iter().map(|row| row[idx]).collect())
    }

    /// Final state of the trajectory, for warm-starting a follow-up run.
    pub fn final_state(&self) -> Option<State3> {
        self.x.last().copied()
    }

    /// Pure transformation: the same result with metrics attached.
    pub fn with_metrics(self, metrics: BTreeMap<String, f64>) -> Self {
        Self { metrics, ..self }
    }
}
