//! Time-varying ventricular compliance and elastance.
//!
//! C_LV(t) = 1 / (A*e(t) + B) with A = 1/Cmin - 1/Cmax and B = 1/Cmax
//! so C_LV stays inside [Cmin, Cmax] for e in [0, 1]. The
//! derivative is analytic rather than finite-differenced; the solver needs
//! a smooth dC/dt.

use cv_core::CvError;

use crate::activation::ActivationProfile;
use crate::error::{ModelError, ModelResult};
use crate::params::ParameterSet;

/// Compliance envelope bound to an activation profile.
#[derive(Clone, Copy, Debug)]
pub struct ComplianceModel {
    activation: ActivationProfile,
    /// A = 1/Cmin - 1/Cmax
    a: f64,
    /// B = 1/Cmax
    b: f64,
}

impl ComplianceModel {
    pub fn new(params: &ParameterSet) -> ModelResult<Self> {
        if !params.cmin.is_finite() || params.cmin <= 0.0 {
            return Err(ModelError::InvalidParameter {
                what: "Cmin must be > 0",
            });
        }
        if !params.cmax.is_finite() || params.cmax <= 0.0 {
            return Err(ModelError::InvalidParameter {
                what: "Cmax must be > 0",
            });
        }
        // an inverted envelope would flip the sign of A and push C_LV
        // outside [Cmin, Cmax]
        if params.cmin > params.cmax {
            return Err(CvError::Invariant {
                what: "Cmin must not exceed Cmax",
            }
            .into());
        }
        let activation = ActivationProfile::new(params.tcc)?;
        Ok(Self {
            activation,
            a: 1.0 / params.cmin - 1.0 / params.cmax,
            b: 1.0 / params.cmax,
        })
    }

    pub fn activation(&self) -> &ActivationProfile {
        &self.activation
    }

    /// Ventricular compliance C_LV(t) [mL/mmHg].
    pub fn clv(&self, t: f64) -> f64 {
        1.0 / (self.a * self.activation.value_at(t) + self.b)
    }

    /// Analytic derivative dC_LV/dt [mL/(mmHg*s)].
    ///
    /// dC/dt = -A * (de/dt) / (A*e + B)^2
    pub fn dclv_dt(&self, t: f64) -> f64 {
        let e = self.activation.value_at(t);
        let de = self.activation.derivative_at(t);
        let denom = self.a * e + self.b;
        -(self.a * de) / (denom * denom)
    }

    /// Ventricular elastance E_LV(t) = 1/C_LV(t) [mmHg/mL].
    pub fn elv(&self, t: f64) -> f64 {
        1.0 / self.clv(t)
    }

    /// Batch compliance over a time vector.
    pub fn clv_batch(&self, ts: &[f64]) -> Vec<f64> {
        ts.iter().map(|&t| self.clv(t)).collect()
    }

    /// Batch derivative over a time vector.
    pub fn dclv_dt_batch(&self, ts: &[f64]) -> Vec<f64> {
        ts.iter().map(|&t| self.dclv_dt(t)).collect()
    }

    /// Batch elastance over a time vector.
    pub fn elv_batch(&self, ts: &[f64]) -> Vec<f64> {
        ts.iter().map(|&t| self.elv(t)).collect()
    }
}
