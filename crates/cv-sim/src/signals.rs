//! Derived-signal reconstruction from a solved trajectory.
//!
//! Signals are recomputed pointwise from the states (never re-integrated),
//! using the same compliance and valve models as the right-hand side.

use std::collections::BTreeMap;

use cv_core::CvError;

use crate::error::SimResult;
use cv_model::{ComplianceModel, ParameterSet, SmoothValve, State3};

/// The full named-signal set; this exact key set is the contract consumed by
/// metrics and plotting collaborators.
pub const SIGNAL_KEYS: [&str; 9] = [
    "pLV", "Q2", "p1", "Clv", "dClv_dt", "Elv", "P0", "P1", "Vlv",
];

/// Mapping from signal name to an array aligned index-for-index with `t`.
pub type SignalMap = BTreeMap<String, Vec<f64>>;

/// Reconstruct derived signals from simulation states.
///
/// - Clv, dClv_dt, Elv: compliance model evaluated over `t`
/// - P0, P1: valve flows from the trajectory's own pLV/p1
/// - Vlv: ventricular volume, Vr + Clv(t)*pLV(t)
///
/// The state rows are `[pLV, Q2, p1]`; the N-by-3 shape is carried by the
/// `State3` row type, and `t`/`x` length mismatch is rejected before any
/// computation.
pub fn reconstruct_signals(
    t: &[f64],
    x: &[State3],
    params: &ParameterSet,
) -> SimResult<SignalMap> {
    if t.len() != x.len() {
        return Err(CvError::ShapeMismatch {
            what: "state rows per time sample",
            expected: t.len(),
            got: x.len(),
        }
        .into());
    }

    let compliance = ComplianceModel::new(params)?;
    let mitral = SmoothValve::mitral(params)?;
    let aortic = SmoothValve::aortic(params)?;

    let p_lv: Vec<f64> = x.iter().map(|s| s[0]).collect();
    let q2: Vec<f64> = x.iter().map(|s| s[1]).collect();
    let p1: Vec<f64> = x.iter().map(|s| s[2]).collect();

    let clv = compliance.clv_batch(t);
    let dclv = compliance.dclv_dt_batch(t);
    let elv = compliance.elv_batch(t);

    let p0_flow: Vec<f64> = p_lv.iter().map(|&p| mitral.flow(params.p_la, p)).collect();
    let p1_flow: Vec<f64> = p_lv
        .iter()
        .zip(&p1)
        .map(|(&plv, &pa)| aortic.flow(plv, pa))
        .collect();

    let vlv: Vec<f64> = clv
        .iter()
        .zip(&p_lv)
        .map(|(&c, &p)| params.v_r + c * p)
        .collect();

    let mut signals = SignalMap::new();
    signals.insert("pLV".into(), p_lv);
    signals.insert("Q2".into(), q2);
    signals.insert("p1".into(), p1);
    signals.insert("Clv".into(), clv);
    signals.insert("dClv_dt".into(), dclv);
    signals.insert("Elv".into(), elv);
    signals.insert("P0".into(), p0_flow);
    signals.insert("P1".into(), p1_flow);
    signals.insert("Vlv".into(), vlv);
    Ok(signals)
}
