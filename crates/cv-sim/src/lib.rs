//! cv-sim: transient simulation of the 0D systemic circulation.
//!
//! Provides:
//! - TransientModel trait for pluggable dynamic systems
//! - Fixed-step RK4 and adaptive Dormand-Prince 4(5) integrators
//! - Grid-sampled integration driver with configurable tolerances
//! - Signal reconstruction (compliance, valve flows, ventricular volume)
//! - Simulation pipeline and result container with warm-start support

pub mod error;
pub mod integrator;
pub mod model;
pub mod pipeline;
pub mod result;
pub mod signals;
pub mod sim;
pub mod systemic;

// Re-exports for public API
pub use error::{SimError, SimResult};
pub use integrator::{DormandPrince45, Integrator, RK4};
pub use model::TransientModel;
pub use pipeline::{
    default_initial_state, initial_state_from_guess, run_scenario_pair, run_simulation, time_grid,
};
pub use result::SimulationResult;
pub use signals::{SIGNAL_KEYS, SignalMap, reconstruct_signals};
pub use sim::{SolverMethod, SolverOptions, integrate_on_grid};
