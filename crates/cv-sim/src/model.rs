//! TransientModel trait for pluggable dynamic systems.

use crate::error::SimResult;

/// Trait for transient (dynamic) system models.
///
/// A TransientModel must implement:
/// - State type (Clone, for snapshots)
/// - RHS (right-hand side) computation: x_dot = f(t, x), pure in (t, x)
/// - Scalar field arithmetic for integration: add states, scale by scalar
/// - A scaled error norm for embedded-pair step-size control
pub trait TransientModel {
    /// State type (must be Clone).
    type State: Clone;

    /// Compute state derivative dxdt = f(t, x).
    fn rhs(&self, t: f64, x: &Self::State) -> SimResult<Self::State>;

    /// Add two states element-wise: result = a + b.
    fn add(&self, a: &Self::State, b: &Self::State) -> Self::State;

    /// Scale a state by a scalar: result = scale * a.
    fn scale(&self, a: &Self::State, scale: f64) -> Self::State;

    /// Scaled RMS norm of an error estimate.
    ///
    /// Each component i is weighted by `atol + rtol * max(|y0_i|, |y1_i|)`;
    /// a norm <= 1 means the step satisfies the tolerances.
    fn error_norm(
        &self,
        err: &Self::State,
        y0: &Self::State,
        y1: &Self::State,
        rtol: f64,
        atol: f64,
    ) -> f64;
}
