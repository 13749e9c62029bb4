//! Simulation pipeline: time grid, initial conditions, run orchestration.

use std::collections::BTreeMap;

use serde_json::json;
use tracing::info;

use crate::error::{SimError, SimResult};
use crate::result::SimulationResult;
use crate::signals::reconstruct_signals;
use crate::sim::{SolverOptions, integrate_on_grid};
use cv_model::{ParameterSet, SimulationConfig, State3, SystemicModel};

/// Build a uniform time grid spanning `n_cycles` cycles of duration `tcc`.
///
/// The grid has `n_cycles * points_per_cycle + 1` points, endpoint inclusive,
/// and is shared across the project to keep sampling consistent.
pub fn time_grid(tcc: f64, n_cycles: usize, points_per_cycle: usize) -> SimResult<Vec<f64>> {
    if !tcc.is_finite() || tcc <= 0.0 {
        return Err(SimError::InvalidArg {
            what: "Tcc must be > 0",
        });
    }
    if n_cycles == 0 {
        return Err(SimError::InvalidArg {
            what: "n_cycles must be >= 1",
        });
    }
    if points_per_cycle == 0 {
        return Err(SimError::InvalidArg {
            what: "points_per_cycle must be >= 1",
        });
    }
    let t_end = n_cycles as f64 * tcc;
    let n_points = n_cycles * points_per_cycle + 1;
    Ok((0..n_points)
        .map(|i| t_end * i as f64 / (n_points - 1) as f64)
        .collect())
}

/// Default near-physiological initial state `[pLV, Q2, p1]`.
///
/// pLV starts near atrial pressure (diastolic filling point), p1 near a
/// typical diastolic aortic pressure, Q2 at rest. First-cycle transient
/// mismatch is expected; multi-cycle runs settle into a periodic regime.
pub fn default_initial_state(params: &ParameterSet) -> State3 {
    [params.p_la, 0.0, 80.0]
}

/// Build a state vector from user-provided initial values, keeping the
/// project-wide ordering in one place.
pub fn initial_state_from_guess(p_lv0: f64, q2_0: f64, p1_0: f64) -> State3 {
    [p_lv0, q2_0, p1_0]
}

/// Run a forward nonlinear simulation over multiple cardiac cycles.
///
/// Builds the time grid, integrates the ODE system, reconstructs derived
/// signals, and returns the result bundle with empty metrics (metrics belong
/// to the analysis collaborator).
pub fn run_simulation(
    params: &ParameterSet,
    config: &SimulationConfig,
    x0: Option<State3>,
) -> SimResult<SimulationResult> {
    info!(
        label = %params.label,
        n_cycles = config.n_cycles,
        method = %config.method,
        "running systemic circulation simulation"
    );

    let model = SystemicModel::new(params.clone())?;
    let x0 = x0.unwrap_or_else(|| default_initial_state(params));
    let grid = time_grid(params.tcc, config.n_cycles, config.points_per_cycle)?;
    let opts = SolverOptions::from_config(config)?;

    let x = integrate_on_grid(&model, &x0, &grid, &opts)?;
    let signals = reconstruct_signals(&grid, &x, params)?;

    let mut notes = BTreeMap::new();
    if config.enable_steady_state_check {
        if let Some(dev) = cycle_deviation(&signals["p1"], config.points_per_cycle) {
            notes.insert("steady_state_deviation".to_string(), json!(dev));
            notes.insert(
                "steady_state_reached".to_string(),
                json!(dev <= config.steady_state_tol),
            );
        }
    }

    Ok(SimulationResult {
        t: grid,
        x,
        params: params.clone(),
        config: config.clone(),
        signals,
        metrics: BTreeMap::new(),
        notes,
    })
}

/// Run healthy and pathological simulations with the same config.
///
/// Unless an explicit `x0` is given, the pathological run is warm-started
/// from the healthy run's final state, which shortens its transient.
/// Results come back in `(healthy, pathological)` order.
pub fn run_scenario_pair(
    healthy: &ParameterSet,
    pathological: &ParameterSet,
    config: &SimulationConfig,
    x0: Option<State3>,
) -> SimResult<(SimulationResult, SimulationResult)> {
    let res_h = run_simulation(healthy, config, x0)?;
    let x0_path = match x0 {
        Some(explicit) => Some(explicit),
        None => res_h.final_state(),
    };
    let res_p = run_simulation(pathological, config, x0_path)?;
    Ok((res_h, res_p))
}

/// Maximum cycle-to-cycle deviation over the last two full cycles of a
/// uniformly sampled signal. None when fewer than two cycles were recorded.
fn cycle_deviation(signal: &[f64], points_per_cycle: usize) -> Option<f64> {
    let n = signal.len();
    if points_per_cycle == 0 || n < 2 * points_per_cycle + 1 {
        return None;
    }
    let last_start = n - 1 - points_per_cycle;
    let prev_start = n - 1 - 2 * points_per_cycle;
    let mut max_dev: f64 = 0.0;
    for i in 0..points_per_cycle {
        let dev = (signal[last_start + i] - signal[prev_start + i]).abs();
        max_dev = max_dev.max(dev);
    }
    Some(max_dev)
}
