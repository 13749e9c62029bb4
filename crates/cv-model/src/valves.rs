//! Smoothed diode-like valve flows.
//!
//! A hard on/off valve would put a discontinuity inside the ODE right-hand
//! side; adaptive steppers want a differentiable gate. The tanh Heaviside
//! approximation H(x) = (1 + tanh(k*x))/2 keeps the flow smooth, with the
//! slope k trading smoothing accuracy against stiffness.

use crate::error::{ModelError, ModelResult};
use crate::params::ParameterSet;

/// Smooth step in (0, 1); approaches a hard step as k grows.
pub fn smooth_heaviside(x: f64, k: f64) -> ModelResult<f64> {
    if !k.is_finite() || k <= 0.0 {
        return Err(ModelError::InvalidParameter {
            what: "k must be > 0",
        });
    }
    Ok(0.5 * (1.0 + (k * x).tanh()))
}

/// One-way valve with linear resistance and smooth gating.
#[derive(Clone, Copy, Debug)]
pub struct SmoothValve {
    /// Valve resistance [mmHg*s/mL]
    resistance: f64,
    /// Heaviside smoothing slope
    slope: f64,
}

impl SmoothValve {
    pub fn new(resistance: f64, slope: f64) -> ModelResult<Self> {
        if !resistance.is_finite() || resistance <= 0.0 {
            return Err(ModelError::InvalidParameter {
                what: "valve resistance must be > 0",
            });
        }
        if !slope.is_finite() || slope <= 0.0 {
            return Err(ModelError::InvalidParameter {
                what: "k must be > 0",
            });
        }
        Ok(Self { resistance, slope })
    }

    /// Mitral valve from a parameter set: P0 = (pLA - pLV)/RMV * H(pLA - pLV).
    pub fn mitral(params: &ParameterSet) -> ModelResult<Self> {
        if !params.r_mv.is_finite() || params.r_mv <= 0.0 {
            return Err(ModelError::InvalidParameter {
                what: "RMV must be > 0",
            });
        }
        Self::new(params.r_mv, params.k_valve)
    }

    /// Aortic valve from a parameter set: P1 = (pLV - p1)/RAV * H(pLV - p1).
    pub fn aortic(params: &ParameterSet) -> ModelResult<Self> {
        if !params.r_av.is_finite() || params.r_av <= 0.0 {
            return Err(ModelError::InvalidParameter {
                what: "RAV must be > 0",
            });
        }
        Self::new(params.r_av, params.k_valve)
    }

    pub fn resistance(&self) -> f64 {
        self.resistance
    }

    /// Gated flow [mL/s] from the upstream to the downstream pressure.
    ///
    /// Near-zero (not exactly zero) for reverse gradients; the residual
    /// leak shrinks as the slope grows.
    pub fn flow(&self, p_upstream: f64, p_downstream: f64) -> f64 {
        let dp = p_upstream - p_downstream;
        let gate = 0.5 * (1.0 + (self.slope * dp).tanh());
        (dp / self.resistance) * gate
    }
}
