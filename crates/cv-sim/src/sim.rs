//! Grid-sampled integration driver.
//!
//! The caller supplies a strictly increasing time grid; the solver advances
//! with its own (possibly adaptive) internal steps but lands exactly on every
//! grid point, so the returned trajectory aligns index-for-index with the
//! request.

use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::integrator::{DormandPrince45, Integrator, RK4};
use crate::model::TransientModel;
use cv_model::SimulationConfig;

/// Solver selection, parsed from `SimulationConfig::method`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SolverMethod {
    /// Adaptive Dormand-Prince 4(5) (default).
    #[default]
    Rk45,
    /// Fixed-step classical RK4, one step per grid interval.
    Rk4,
}

impl SolverMethod {
    pub fn parse(name: &str) -> SimResult<Self> {
        match name {
            "RK45" | "rk45" | "DP45" | "dp45" => Ok(Self::Rk45),
            "RK4" | "rk4" => Ok(Self::Rk4),
            _ => Err(SimError::InvalidArg {
                what: "unknown solver method (expected \"RK45\" or \"RK4\")",
            }),
        }
    }
}

/// Numerical options for one integration pass.
#[derive(Clone, Debug)]
pub struct SolverOptions {
    pub method: SolverMethod,
    /// Relative tolerance for adaptive stepping
    pub rtol: f64,
    /// Absolute tolerance for adaptive stepping
    pub atol: f64,
    /// Smallest step the adaptive controller may take
    pub h_min: f64,
    /// Safety limit on internal steps (accepted + rejected)
    pub max_steps: usize,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            method: SolverMethod::Rk45,
            rtol: 1e-6,
            atol: 1e-8,
            h_min: 1e-12,
            max_steps: 2_000_000,
        }
    }
}

impl SolverOptions {
    /// Build options from a simulation config, validating tolerances.
    pub fn from_config(config: &SimulationConfig) -> SimResult<Self> {
        if !config.rtol.is_finite() || config.rtol <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "rtol must be finite and > 0",
            });
        }
        if !config.atol.is_finite() || config.atol <= 0.0 {
            return Err(SimError::InvalidArg {
                what: "atol must be finite and > 0",
            });
        }
        Ok(Self {
            method: SolverMethod::parse(&config.method)?,
            rtol: config.rtol,
            atol: config.atol,
            ..Self::default()
        })
    }
}

fn validate_grid(grid: &[f64]) -> SimResult<()> {
    if grid.len() < 2 {
        return Err(SimError::InvalidArg {
            what: "time grid must contain at least 2 points",
        });
    }
    if grid.windows(2).any(|w| !(w[1] > w[0])) {
        return Err(SimError::InvalidArg {
            what: "time grid must be strictly increasing",
        });
    }
    Ok(())
}

/// Integrate a transient model over a time grid.
///
/// Returns one state per grid point, the first being `x0` itself. Fails
/// (non-retryable) on a malformed grid or when the adaptive controller
/// cannot meet the tolerances within the step budget; the error carries the
/// solver diagnostic.
pub fn integrate_on_grid<M: TransientModel>(
    model: &M,
    x0: &M::State,
    grid: &[f64],
    opts: &SolverOptions,
) -> SimResult<Vec<M::State>> {
    validate_grid(grid)?;

    match opts.method {
        SolverMethod::Rk4 => integrate_fixed(model, x0, grid),
        SolverMethod::Rk45 => integrate_adaptive(model, x0, grid, opts),
    }
}

fn integrate_fixed<M: TransientModel>(
    model: &M,
    x0: &M::State,
    grid: &[f64],
) -> SimResult<Vec<M::State>> {
    let mut states = Vec::with_capacity(grid.len());
    states.push(x0.clone());
    let mut y = x0.clone();
    for w in grid.windows(2) {
        y = RK4.step(model, w[0], &y, w[1] - w[0])?;
        states.push(y.clone());
    }
    Ok(states)
}

fn integrate_adaptive<M: TransientModel>(
    model: &M,
    x0: &M::State,
    grid: &[f64],
    opts: &SolverOptions,
) -> SimResult<Vec<M::State>> {
    let stepper = DormandPrince45;

    let mut states = Vec::with_capacity(grid.len());
    states.push(x0.clone());

    let mut t = grid[0];
    let mut y = x0.clone();
    let mut h = grid[1] - grid[0];

    let mut accepted = 0usize;
    let mut rejected = 0usize;
    let mut steps = 0usize;

    for &t_target in &grid[1..] {
        while t < t_target {
            steps += 1;
            if steps > opts.max_steps {
                return Err(SimError::ConvergenceFailed {
                    what: format!(
                        "exceeded max_steps={} at t={t:.6e} before reaching t={t_target:.6e}",
                        opts.max_steps
                    ),
                });
            }

            // Land exactly on the grid point when it is within reach.
            let hits_target = t_target - t <= h;
            let h_try = if hits_target { t_target - t } else { h };

            let (y_new, err) = stepper.step_with_error(model, t, &y, h_try, opts.rtol, opts.atol)?;

            if !err.is_finite() {
                return Err(SimError::ConvergenceFailed {
                    what: format!(
                        "non-finite error estimate at t={t:.6e} (step size {h_try:.3e}); \
                         the right-hand side produced NaN or Inf"
                    ),
                });
            }

            if err <= 1.0 {
                accepted += 1;
                t = if hits_target { t_target } else { t + h_try };
                y = y_new;
            } else {
                rejected += 1;
                if h_try <= opts.h_min {
                    return Err(SimError::ConvergenceFailed {
                        what: format!(
                            "step size underflow at t={t:.6e}: scaled error {err:.3e} \
                             at minimum step {:.3e}",
                            opts.h_min
                        ),
                    });
                }
            }

            h = propose_step(h, h_try, err, hits_target, opts.h_min);
        }
        states.push(y.clone());
    }

    debug!(accepted, rejected, "adaptive integration complete");
    Ok(states)
}

/// Step-size controller for the embedded 4(5) pair (error exponent -1/5).
///
/// A step clipped to land on a grid point says nothing about the free step
/// size, so an accepted clipped step keeps the previous proposal `h` instead
/// of rebuilding it from the truncated `h_try`; everything else scales
/// `h_try` by the usual safety-factored error power, clamped to [0.2, 5.0].
fn propose_step(h: f64, h_try: f64, err: f64, clipped: bool, h_min: f64) -> f64 {
    if clipped && err <= 1.0 {
        return h.max(h_min);
    }
    let factor = if err == 0.0 {
        5.0
    } else {
        (0.9 * err.powf(-0.2)).clamp(0.2, 5.0)
    };
    (h_try * factor).max(h_min)
}
