//! Periodic ventricular activation profile.
//!
//! The activation e(tau) drives the time-varying compliance: a raised-cosine
//! rise over the contraction phase, a raised-cosine fall over relaxation, and
//! zero during rest. The derivative is closed-form; it is
//! continuous in value but not in slope at the phase boundaries, an accepted
//! modeling simplification.

use std::f64::consts::PI;

use crate::error::{ModelError, ModelResult};

/// Reference cycle duration [s] (6/7 s, ~70 bpm) for phase-duration scaling.
pub const TCC_REF: f64 = 6.0 / 7.0;

/// Activation timing for one cardiac cycle.
///
/// Phase membership is half-open on purpose: contraction owns `[0, Tvc]`,
/// relaxation `(Tvc, Tvc+Tvr]`, rest `(Tvc+Tvr, Tcc]`. No double counting at
/// the boundaries.
#[derive(Clone, Copy, Debug)]
pub struct ActivationProfile {
    /// Cardiac cycle duration [s]
    pub tcc: f64,
    /// Ventricular contraction duration [s]
    pub tvc: f64,
    /// Ventricular relaxation duration [s]
    pub tvr: f64,
}

impl ActivationProfile {
    /// Build a profile with the default reference cycle duration.
    pub fn new(tcc: f64) -> ModelResult<Self> {
        Self::with_reference(tcc, TCC_REF)
    }

    /// Build a profile with an explicit reference cycle duration.
    ///
    /// Tvc = 0.3 * Tcc/Tcc_ref and Tvr = 0.15 * Tcc/Tcc_ref.
    pub fn with_reference(tcc: f64, tcc_ref: f64) -> ModelResult<Self> {
        if !tcc.is_finite() || tcc <= 0.0 {
            return Err(ModelError::InvalidParameter {
                what: "Tcc must be > 0",
            });
        }
        if !tcc_ref.is_finite() || tcc_ref <= 0.0 {
            return Err(ModelError::InvalidParameter {
                what: "Tcc_ref must be > 0",
            });
        }
        let scale = tcc / tcc_ref;
        let tvc = 0.3 * scale;
        let tvr = 0.15 * scale;
        if tvc <= 0.0 || tvr <= 0.0 {
            return Err(ModelError::InvalidParameter {
                what: "Tvc and Tvr must be > 0",
            });
        }
        Ok(Self { tcc, tvc, tvr })
    }

    /// Map absolute time to cycle time tau in [0, Tcc).
    pub fn phase(&self, t: f64) -> f64 {
        t.rem_euclid(self.tcc)
    }

    /// Normalized activation e(tau) in [0, 1].
    pub fn value(&self, tau: f64) -> f64 {
        if (0.0..=self.tvc).contains(&tau) {
            0.5 * (1.0 - (PI * tau / self.tvc).cos())
        } else if tau > self.tvc && tau <= self.tvc + self.tvr {
            0.5 * (1.0 + (PI * (tau - self.tvc) / self.tvr).cos())
        } else {
            0.0
        }
    }

    /// Closed-form derivative de/dt(tau).
    pub fn derivative(&self, tau: f64) -> f64 {
        if (0.0..=self.tvc).contains(&tau) {
            (PI / (2.0 * self.tvc)) * (PI * tau / self.tvc).sin()
        } else if tau > self.tvc && tau <= self.tvc + self.tvr {
            -(PI / (2.0 * self.tvr)) * (PI * (tau - self.tvc) / self.tvr).sin()
        } else {
            0.0
        }
    }

    /// Activation at absolute time t (phase-folded).
    pub fn value_at(&self, t: f64) -> f64 {
        self.value(self.phase(t))
    }

    /// Derivative at absolute time t (phase-folded).
    pub fn derivative_at(&self, t: f64) -> f64 {
        self.derivative(self.phase(t))
    }

    /// Batch evaluation over a time vector.
    pub fn values(&self, ts: &[f64]) -> Vec<f64> {
        ts.iter().map(|&t| self.value_at(t)).collect()
    }

    /// Batch derivative evaluation over a time vector.
    pub fn derivatives(&self, ts: &[f64]) -> Vec<f64> {
        ts.iter().map(|&t| self.derivative_at(t)).collect()
    }
}
