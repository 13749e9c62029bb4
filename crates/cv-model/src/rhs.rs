//! Nonlinear systemic circulation model.

use cv_core::CvError;

use crate::compliance::ComplianceModel;
use crate::error::ModelResult;
use crate::params::ParameterSet;
use crate::valves::SmoothValve;

/// State vector with fixed, project-wide ordering: [pLV, Q2, p1].
///
/// - pLV : left ventricular pressure [mmHg]
/// - Q2  : peripheral arterial flow [mL/s]
/// - p1  : aortic/arterial pressure [mmHg]
pub type State3 = [f64; 3];

/// Three-state nonlinear model of the systemic circulation.
///
/// Model equations:
///   C_LV * dpLV/dt = -pLV * dC_LV/dt + P0 - P1
///   I_art * dQ2/dt = p1 - pRA - R_tot * Q2
///   C_art * dp1/dt = P1 - Q2
///
/// with R_tot = Rcap + Rart and smooth-gated valve flows P0, P1.
#[derive(Clone, Debug)]
pub struct SystemicModel {
    params: ParameterSet,
    compliance: ComplianceModel,
    mitral: SmoothValve,
    aortic: SmoothValve,
}

impl SystemicModel {
    /// Validate the parameter set and precompute the sub-models.
    pub fn new(params: ParameterSet) -> ModelResult<Self> {
        params.validate()?;
        let compliance = ComplianceModel::new(&params)?;
        let mitral = SmoothValve::mitral(&params)?;
        let aortic = SmoothValve::aortic(&params)?;
        Ok(Self {
            params,
            compliance,
            mitral,
            aortic,
        })
    }

    pub fn params(&self) -> &ParameterSet {
        &self.params
    }

    pub fn compliance(&self) -> &ComplianceModel {
        &self.compliance
    }

    pub fn mitral(&self) -> &SmoothValve {
        &self.mitral
    }

    pub fn aortic(&self) -> &SmoothValve {
        &self.aortic
    }

    /// State derivative dx/dt at (t, x). Pure; no internal state.
    pub fn rhs(&self, t: f64, x: &State3) -> ModelResult<State3> {
        let [p_lv, q2, p1] = *x;

        let c_lv = self.compliance.clv(t);
        let dc_lv = self.compliance.dclv_dt(t);

        // Valve flows (smooth gating)
        let p0_flow = self.mitral.flow(self.params.p_la, p_lv);
        let p1_flow = self.aortic.flow(p_lv, p1);

        // ventricular pressure balance
        let dp_lv = (-p_lv * dc_lv + p0_flow - p1_flow) / c_lv;

        // peripheral flow through the inertance
        let rtot = self.params.rtot();
        let dq2 = (p1 - self.params.p_ra - rtot * q2) / self.params.i_art;

        // arterial pressure from net Windkessel inflow
        let dp1 = (p1_flow - q2) / self.params.c_art;

        Ok([dp_lv, dq2, dp1])
    }

    /// Slice entry point for callers holding dynamically sized states.
    ///
    /// Fails fast if the state does not have exactly 3 components.
    pub fn rhs_slice(&self, t: f64, x: &[f64]) -> ModelResult<State3> {
        let got = x.len();
        let x: &State3 = x.try_into().map_err(|_| CvError::ShapeMismatch {
            what: "state vector [pLV, Q2, p1]",
            expected: 3,
            got,
        })?;
        self.rhs(t, x)
    }
}
