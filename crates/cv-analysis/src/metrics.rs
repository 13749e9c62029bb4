//! Physiological summary metrics computed on the last cardiac cycle.
//!
//! All entry points take plain slices so they compose with the simulation
//! signal map without a hard dependency on the simulation crate; the
//! consolidated [`compute_all_metrics`] returns a flat map suitable for a
//! result container's metrics field.

use std::collections::BTreeMap;

use crate::error::{AnalysisError, AnalysisResult};

/// Scalar metrics keyed by name.
pub type MetricMap = BTreeMap<String, f64>;

/// Index of the first sample belonging to the last cycle, i.e. the first
/// `t[i] >= t_end - tcc`.
pub fn last_cycle_start(t: &[f64], tcc: f64) -> AnalysisResult<usize> {
    if t.len() < 2 {
        return Err(AnalysisError::InvalidArg {
            what: "t must have at least 2 samples",
        });
    }
    if tcc <= 0.0 {
        return Err(AnalysisError::InvalidArg { what: "Tcc must be > 0" });
    }
    let start = t[t.len() - 1] - tcc;
    Ok(t.iter().position(|&ti| ti >= start).unwrap_or(0))
}

/// Time average via trapezoidal integration.
fn trapz_mean(y: &[f64], t: &[f64]) -> AnalysisResult<f64> {
    if y.len() != t.len() {
        return Err(AnalysisError::InvalidArg {
            what: "y and t must have the same length",
        });
    }
    if t.len() < 2 {
        return Err(AnalysisError::InvalidArg {
            what: "t must have at least 2 samples",
        });
    }
    let duration = t[t.len() - 1] - t[0];
    if duration <= 0.0 {
        return Err(AnalysisError::InvalidArg {
            what: "time segment must have positive duration",
        });
    }
    let mut area = 0.0;
    for i in 1..t.len() {
        area += 0.5 * (y[i] + y[i - 1]) * (t[i] - t[i - 1]);
    }
    Ok(area / duration)
}

fn slice_max(y: &[f64]) -> f64 {
    y.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

fn slice_min(y: &[f64]) -> f64 {
    y.iter().copied().fold(f64::INFINITY, f64::min)
}

/// Arterial pressure metrics on the provided segment:
/// SBP (max), DBP (min), PP (SBP-DBP), MAP (time average).
pub fn arterial_pressure_metrics(p1: &[f64], t: &[f64]) -> AnalysisResult<MetricMap> {
    if p1.len() != t.len() {
        return Err(AnalysisError::InvalidArg {
            what: "p1 and t must have the same length",
        });
    }
    let sbp = slice_max(p1);
    let dbp = slice_min(p1);
    let mut out = MetricMap::new();
    out.insert("SBP".into(), sbp);
    out.insert("DBP".into(), dbp);
    out.insert("PP".into(), sbp - dbp);
    out.insert("MAP".into(), trapz_mean(p1, t)?);
    Ok(out)
}

/// Ventricular pressure extrema and time average.
pub fn ventricular_pressure_metrics(p_lv: &[f64], t: &[f64]) -> AnalysisResult<MetricMap> {
    if p_lv.len() != t.len() {
        return Err(AnalysisError::InvalidArg {
            what: "pLV and t must have the same length",
        });
    }
    let mut out = MetricMap::new();
    out.insert("pLV_max".into(), slice_max(p_lv));
    out.insert("pLV_min".into(), slice_min(p_lv));
    out.insert("pLV_mean".into(), trapz_mean(p_lv, t)?);
    Ok(out)
}

/// Stroke volume and volume extrema, `SV = Vmax - Vmin`.
pub fn stroke_volume(vlv: &[f64], t: &[f64]) -> AnalysisResult<MetricMap> {
    if vlv.len() != t.len() {
        return Err(AnalysisError::InvalidArg {
            what: "Vlv and t must have the same length",
        });
    }
    if vlv.is_empty() {
        return Err(AnalysisError::InvalidArg {
            what: "Vlv must be non-empty",
        });
    }
    let vmax = slice_max(vlv);
    let vmin = slice_min(vlv);
    let mut out = MetricMap::new();
    out.insert("SV".into(), vmax - vmin);
    out.insert("Vmax".into(), vmax);
    out.insert("Vmin".into(), vmin);
    Ok(out)
}

/// Peripheral flow statistics on Q2.
pub fn flow_metrics(q2: &[f64], t: &[f64]) -> AnalysisResult<MetricMap> {
    if q2.len() != t.len() {
        return Err(AnalysisError::InvalidArg {
            what: "Q2 and t must have the same length",
        });
    }
    let qmax = slice_max(q2);
    let qmin = slice_min(q2);
    let mut out = MetricMap::new();
    out.insert("Q2_mean".into(), trapz_mean(q2, t)?);
    out.insert("Q2_max".into(), qmax);
    out.insert("Q2_min".into(), qmin);
    out.insert("Q2_amp".into(), 0.5 * (qmax - qmin));
    Ok(out)
}

/// Valve timing metrics from a flow waveform.
///
/// The valve counts as open where `flow > rel_threshold * max(flow)`; an
/// interval contributes to the open duration only when both endpoints are
/// open. Works well with the smoothed valve flows, which never reach an
/// exact zero.
pub fn valve_timing_metrics(
    flow: &[f64],
    t: &[f64],
    rel_threshold: f64,
) -> AnalysisResult<MetricMap> {
    if flow.len() != t.len() {
        return Err(AnalysisError::InvalidArg {
            what: "flow and t must have the same length",
        });
    }
    if flow.len() < 2 {
        return Err(AnalysisError::InvalidArg {
            what: "flow must have at least 2 samples",
        });
    }
    if rel_threshold <= 0.0 {
        return Err(AnalysisError::InvalidArg {
            what: "rel_threshold must be > 0",
        });
    }

    let peak = slice_max(flow);
    let mut out = MetricMap::new();
    if peak <= 0.0 {
        // valve effectively never opens
        out.insert("peak".into(), peak);
        out.insert("t_peak".into(), t[0]);
        out.insert("open_duration".into(), 0.0);
        out.insert("open_fraction".into(), 0.0);
        return Ok(out);
    }

    let thr = rel_threshold * peak;
    let mut open_duration = 0.0;
    for i in 1..t.len() {
        if flow[i - 1] > thr && flow[i] > thr {
            open_duration += t[i] - t[i - 1];
        }
    }
    let cycle_duration = t[t.len() - 1] - t[0];
    let open_fraction = if cycle_duration > 0.0 {
        open_duration / cycle_duration
    } else {
        0.0
    };

    let idx_peak = flow
        .iter()
        .enumerate()
        .max_by(|(_, x), (_, y)| x.total_cmp(y))
        .map(|(i, _)| i)
        .unwrap_or(0);

    out.insert("peak".into(), peak);
    out.insert("t_peak".into(), t[idx_peak]);
    out.insert("open_duration".into(), open_duration);
    out.insert("open_fraction".into(), open_fraction);
    Ok(out)
}

/// Consolidated metric set over the last cardiac cycle.
///
/// Requires the signals `p1, pLV, Vlv, Q2, P0, P1`. Arterial pressure
/// metrics come back prefixed `p1_`, valve timing prefixed `MV_` (mitral,
/// from P0) and `AV_` (aortic, from P1); the rest keep their plain names.
pub fn compute_all_metrics(
    signals: &BTreeMap<String, Vec<f64>>,
    t: &[f64],
    tcc: f64,
    valve_threshold: f64,
) -> AnalysisResult<MetricMap> {
    let get = |name: &str| -> AnalysisResult<&Vec<f64>> {
        signals.get(name).ok_or_else(|| AnalysisError::MissingSignal {
            name: name.to_string(),
        })
    };
    let p1 = get("p1")?;
    let p_lv = get("pLV")?;
    let vlv = get("Vlv")?;
    let q2 = get("Q2")?;
    let p0_flow = get("P0")?;
    let p1_flow = get("P1")?;

    let start = last_cycle_start(t, tcc)?;
    let t_seg = &t[start..];

    let seg = |s: &Vec<f64>| -> AnalysisResult<Vec<f64>> {
        if s.len() != t.len() {
            return Err(AnalysisError::InvalidArg {
                what: "signal not aligned with t",
            });
        }
        Ok(s[start..].to_vec())
    };

    let mut out = MetricMap::new();
    for (k, v) in arterial_pressure_metrics(&seg(p1)?, t_seg)? {
        out.insert(format!("p1_{k}"), v);
    }
    out.extend(ventricular_pressure_metrics(&seg(p_lv)?, t_seg)?);
    out.extend(stroke_volume(&seg(vlv)?, t_seg)?);
    out.extend(flow_metrics(&seg(q2)?, t_seg)?);
    for (k, v) in valve_timing_metrics(&seg(p0_flow)?, t_seg, valve_threshold)? {
        out.insert(format!("MV_{k}"), v);
    }
    for (k, v) in valve_timing_metrics(&seg(p1_flow)?, t_seg, valve_threshold)? {
        out.insert(format!("AV_{k}"), v);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(n: usize, dt: f64) -> Vec<f64> {
        (0..n).map(|i| i as f64 * dt).collect()
    }

    #[test]
    fn last_cycle_start_selects_tail() {
        let t = grid(11, 0.1); // 0.0 ..= 1.0
        // Tcc = 0.5 -> samples from t = 0.5
        assert_eq!(last_cycle_start(&t, 0.5).unwrap(), 5);
        assert!(last_cycle_start(&t, 0.0).is_err());
        assert!(last_cycle_start(&[0.0], 0.5).is_err());
    }

    #[test]
    fn trapz_mean_of_linear_ramp() {
        let t = grid(5, 0.25);
        let y: Vec<f64> = t.iter().map(|&ti| 2.0 * ti).collect();
        let m = trapz_mean(&y, &t).unwrap();
        assert!((m - 1.0).abs() < 1e-12);
        assert!(trapz_mean(&y, &t[..4]).is_err());
    }

    #[test]
    fn arterial_pressure_metrics_on_known_waveform() {
        let t = grid(5, 0.1);
        let p1 = vec![80.0, 120.0, 100.0, 90.0, 80.0];
        let m = arterial_pressure_metrics(&p1, &t).unwrap();
        assert_eq!(m["SBP"], 120.0);
        assert_eq!(m["DBP"], 80.0);
        assert_eq!(m["PP"], 40.0);
        assert!(m["MAP"] > m["DBP"] && m["MAP"] < m["SBP"]);
    }

    #[test]
    fn stroke_volume_is_peak_to_peak() {
        let t = grid(4, 0.1);
        let vlv = vec![120.0, 60.0, 50.0, 115.0];
        let m = stroke_volume(&vlv, &t).unwrap();
        assert_eq!(m["SV"], 70.0);
        assert_eq!(m["Vmax"], 120.0);
        assert_eq!(m["Vmin"], 50.0);
    }

    #[test]
    fn flow_metrics_report_amplitude() {
        let t = grid(5, 0.1);
        let q2 = vec![0.0, 2.0, 4.0, 2.0, 0.0];
        let m = flow_metrics(&q2, &t).unwrap();
        assert_eq!(m["Q2_max"], 4.0);
        assert_eq!(m["Q2_min"], 0.0);
        assert_eq!(m["Q2_amp"], 2.0);
    }

    #[test]
    fn valve_timing_on_triangular_pulse() {
        // open from t=0.1 to t=0.3, peak at t=0.2
        let t = grid(6, 0.1);
        let flow = vec![0.0, 10.0, 100.0, 10.0, 0.0, 0.0];
        let m = valve_timing_metrics(&flow, &t, 0.05).unwrap();
        assert_eq!(m["peak"], 100.0);
        assert!((m["t_peak"] - 0.2).abs() < 1e-12);
        // both-endpoints-open intervals: [0.1,0.2] and [0.2,0.3]
        assert!((m["open_duration"] - 0.2).abs() < 1e-12);
        assert!((m["open_fraction"] - 0.4).abs() < 1e-12);
    }

    #[test]
    fn closed_valve_reports_zero_open_time() {
        let t = grid(4, 0.1);
        let flow = vec![-1.0, -0.5, -2.0, -0.1];
        let m = valve_timing_metrics(&flow, &t, 0.01).unwrap();
        assert_eq!(m["open_duration"], 0.0);
        assert_eq!(m["open_fraction"], 0.0);
        assert_eq!(m["t_peak"], 0.0);
    }

    #[test]
    fn compute_all_metrics_requires_the_contract_signals() {
        let t = grid(5, 0.1);
        let mut signals = BTreeMap::new();
        signals.insert("p1".to_string(), vec![80.0; 5]);
        let err = compute_all_metrics(&signals, &t, 0.2, 0.01).unwrap_err();
        assert!(matches!(err, AnalysisError::MissingSignal { .. }));
    }

    #[test]
    fn compute_all_metrics_produces_prefixed_keys() {
        let t = grid(9, 0.1); // two cycles of Tcc = 0.4
        let mk = |vals: [f64; 9]| vals.to_vec();
        let mut signals = BTreeMap::new();
        signals.insert(
            "p1".to_string(),
            mk([80.0, 110.0, 120.0, 100.0, 80.0, 110.0, 120.0, 100.0, 80.0]),
        );
        signals.insert(
            "pLV".to_string(),
            mk([8.0, 90.0, 125.0, 40.0, 8.0, 90.0, 125.0, 40.0, 8.0]),
        );
        signals.insert(
            "Vlv".to_string(),
            mk([120.0, 90.0, 55.0, 100.0, 120.0, 90.0, 55.0, 100.0, 120.0]),
        );
        signals.insert(
            "Q2".to_string(),
            mk([60.0, 80.0, 120.0, 90.0, 60.0, 80.0, 120.0, 90.0, 60.0]),
        );
        signals.insert(
            "P0".to_string(),
            mk([100.0, 0.0, 0.0, 50.0, 100.0, 0.0, 0.0, 50.0, 100.0]),
        );
        signals.insert(
            "P1".to_string(),
            mk([0.0, 200.0, 300.0, 0.0, 0.0, 200.0, 300.0, 0.0, 0.0]),
        );

        let m = compute_all_metrics(&signals, &t, 0.4, 0.01).unwrap();
        for key in [
            "p1_SBP",
            "p1_DBP",
            "p1_PP",
            "p1_MAP",
            "pLV_max",
            "pLV_min",
            "pLV_mean",
            "SV",
            "Vmax",
            "Vmin",
            "Q2_mean",
            "MV_peak",
            "MV_open_fraction",
            "AV_peak",
            "AV_t_peak",
        ] {
            assert!(m.contains_key(key), "missing {key}");
        }
        assert_eq!(m["p1_SBP"], 120.0);
        assert_eq!(m["SV"], 65.0);
        assert_eq!(m["AV_peak"], 300.0);
    }
}
