//! Pathology transforms: pure derivations of new parameter sets.
//!
//! Each transform copies a base `ParameterSet`, overrides specific fields,
//! and records which transform and factors were applied in the metadata map.
//! The base set is never mutated.

use serde_json::json;

use crate::error::{ModelError, ModelResult};
use crate::params::ParameterSet;

fn ensure_factor(v: f64, what: &'static str) -> ModelResult<()> {
    if !v.is_finite() || v <= 0.0 {
        return Err(ModelError::InvalidParameter { what });
    }
    Ok(())
}

/// Reduce arterial compliance (pure arterial stiffening when used alone).
///
/// Typical factors: 0.5 mild, 0.3 moderate, 0.2 severe. An inertance factor
/// slightly above 1 sharpens the pressure upstroke; keep it modest to avoid
/// solver oscillations. Rtot is unchanged, so this targets pulsatility (PP)
/// rather than mean pressure.
pub fn reduced_arterial_compliance(
    base: &ParameterSet,
    factor: f64,
    inertance_factor: f64,
    label: &str,
) -> ModelResult<ParameterSet> {
    ensure_factor(factor, "factor must be > 0")?;
    ensure_factor(inertance_factor, "inertance_factor must be > 0")?;

    let mut out = base.clone();
    out.c_art = base.c_art * factor;
    out.i_art = base.i_art * inertance_factor;
    out.label = label.to_string();
    out.meta
        .insert("pathology".into(), json!("reduced_arterial_compliance"));
    out.meta.insert("factor".into(), json!(factor));
    out.meta
        .insert("inertance_factor".into(), json!(inertance_factor));
    Ok(out)
}

/// Increase peripheral resistance (afterload).
///
/// Scales Rart, and Rcap as well when `scale_capillary` is set, so the
/// derived Rtot = Rart + Rcap rises accordingly.
pub fn increased_afterload(
    base: &ParameterSet,
    factor: f64,
    scale_capillary: bool,
    label: &str,
) -> ModelResult<ParameterSet> {
    ensure_factor(factor, "factor must be > 0")?;

    let mut out = base.clone();
    out.r_art = base.r_art * factor;
    if scale_capillary {
        out.r_cap = base.r_cap * factor;
    }
    out.label = label.to_string();
    out.meta
        .insert("pathology".into(), json!("increased_afterload"));
    out.meta.insert("factor".into(), json!(factor));
    out.meta
        .insert("scale_capillary".into(), json!(scale_capillary));
    Ok(out)
}

/// Combine Cart reduction and Rtot increase (not pure stiffness).
pub fn combined_stiffness_and_afterload(
    base: &ParameterSet,
    compliance_factor: f64,
    resistance_factor: f64,
    scale_capillary: bool,
    label: &str,
) -> ModelResult<ParameterSet> {
    let tmp = reduced_arterial_compliance(base, compliance_factor, 1.0, label)?;
    increased_afterload(&tmp, resistance_factor, scale_capillary, label)
}

/// Stiffening + afterload + inertance accent in one transform.
pub fn arterial_stiffening_combo(
    base: &ParameterSet,
    compliance_factor: f64,
    resistance_factor: f64,
    inertance_factor: f64,
    scale_capillary: bool,
    label: &str,
) -> ModelResult<ParameterSet> {
    ensure_factor(compliance_factor, "compliance_factor must be > 0")?;
    ensure_factor(resistance_factor, "resistance_factor must be > 0")?;
    ensure_factor(inertance_factor, "inertance_factor must be > 0")?;

    let mut out = base.clone();
    out.c_art = base.c_art * compliance_factor;
    out.r_art = base.r_art * resistance_factor;
    out.i_art = base.i_art * inertance_factor;
    if scale_capillary {
        out.r_cap = base.r_cap * resistance_factor;
    }
    out.label = label.to_string();
    out.meta
        .insert("pathology".into(), json!("stiffening_combo"));
    out.meta
        .insert("compliance_factor".into(), json!(compliance_factor));
    out.meta
        .insert("resistance_factor".into(), json!(resistance_factor));
    out.meta
        .insert("inertance_factor".into(), json!(inertance_factor));
    out.meta
        .insert("scale_capillary".into(), json!(scale_capillary));
    Ok(out)
}
