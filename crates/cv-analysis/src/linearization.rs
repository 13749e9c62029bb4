//! Linearized arterial Windkessel sub-model in deviation variables.
//!
//! States x = [Δp1, ΔQ2], input u = ΔQin, output y = Δp1:
//!
//! ```text
//! xdot = A x + B u        H(s) = (b1 s + b0) / (s^2 + a1 s + a0)
//! y    = C x + D u
//! ```
//!
//! The arterial resistance R feeding these matrices comes in two flavors
//! that are deliberately kept apart: the nonlinear pipeline's total
//! resistance Rtot = Rcap + Rart, and a legacy shortcut 2*Rart that assumed
//! Rcap = Rart. [`legacy_arterial_resistance`] warns when the two diverge.

use nalgebra::{Complex, Matrix2, RowVector2, Vector2};
use tracing::warn;

use crate::error::{AnalysisError, AnalysisResult};
use cv_core::{Tolerances, nearly_equal};
use cv_model::ParameterSet;

/// Transfer-function polynomial coefficients for
/// `H(s) = (b1*s + b0) / (s^2 + a1*s + a0)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TfCoeffs {
    pub a0: f64,
    pub a1: f64,
    pub b0: f64,
    pub b1: f64,
}

impl TfCoeffs {
    /// Coefficients from raw arterial constants:
    ///
    /// `b1 = 1/C`, `b0 = R/(C*I)`, `a1 = R/I`, `a0 = 1/(C*I)`.
    pub fn from_cir(c_art: f64, i_art: f64, r_h: f64) -> AnalysisResult<Self> {
        if c_art <= 0.0 || i_art <= 0.0 || r_h <= 0.0 {
            return Err(AnalysisError::InvalidArg {
                what: "transfer function requires strictly positive Cart, Iart, and R",
            });
        }
        Ok(Self {
            a0: 1.0 / (c_art * i_art),
            a1: r_h / i_art,
            b0: r_h / (c_art * i_art),
            b1: 1.0 / c_art,
        })
    }
}

/// Linearized arterial sub-model bundle: state-space matrices plus
/// transfer-function coefficients, all built from the same resistance.
#[derive(Clone, Debug)]
pub struct ArterialLti {
    pub a: Matrix2<f64>,
    pub b: Vector2<f64>,
    pub c: RowVector2<f64>,
    pub d: f64,
    pub coeffs: TfCoeffs,
}

impl ArterialLti {
    /// Build from a parameter set, using the nonlinear total resistance
    /// `Rtot = Rcap + Rart`.
    pub fn from_params(params: &ParameterSet) -> AnalysisResult<Self> {
        Self::with_resistance(params, params.rtot())
    }

    /// Build with an explicit arterial resistance, e.g. the legacy
    /// [`legacy_arterial_resistance`] value.
    pub fn with_resistance(params: &ParameterSet, r_h: f64) -> AnalysisResult<Self> {
        let (a, b, c, d) = arterial_lti_matrices_with_resistance(params, r_h)?;
        let coeffs = TfCoeffs::from_cir(params.c_art, params.i_art, r_h)?;
        Ok(Self { a, b, c, d, coeffs })
    }
}

/// Arterial resistance under the historical `Rcap = Rart` convention,
/// i.e. `2*Rart`.
///
/// The nonlinear pipeline always uses `Rtot = Rcap + Rart`; the two code
/// paths are kept distinct on purpose, and a warning is logged whenever
/// they disagree for the given parameters.
pub fn legacy_arterial_resistance(params: &ParameterSet) -> f64 {
    let r_h = 2.0 * params.r_art;
    let rtot = params.rtot();
    if !nearly_equal(r_h, rtot, Tolerances::default()) {
        warn!(
            label = %params.label,
            legacy = r_h,
            rtot,
            "legacy arterial resistance 2*Rart differs from Rtot = Rcap + Rart"
        );
    }
    r_h
}

/// State-space matrices (A, B, C, D) using `Rtot = Rcap + Rart`.
pub fn arterial_lti_matrices(
    params: &ParameterSet,
) -> AnalysisResult<(Matrix2<f64>, Vector2<f64>, RowVector2<f64>, f64)> {
    arterial_lti_matrices_with_resistance(params, params.rtot())
}

/// State-space matrices (A, B, C, D) with an explicit resistance.
pub fn arterial_lti_matrices_with_resistance(
    params: &ParameterSet,
    r_h: f64,
) -> AnalysisResult<(Matrix2<f64>, Vector2<f64>, RowVector2<f64>, f64)> {
    let c_art = params.c_art;
    let i_art = params.i_art;
    if c_art <= 0.0 || i_art <= 0.0 || r_h <= 0.0 {
        return Err(AnalysisError::InvalidArg {
            what: "arterial LTI requires strictly positive Cart, Iart, and R",
        });
    }

    let a = Matrix2::new(0.0, -1.0 / c_art, 1.0 / i_art, -r_h / i_art);
    let b = Vector2::new(1.0 / c_art, 0.0);
    let c = RowVector2::new(1.0, 0.0);
    Ok((a, b, c, 0.0))
}

/// Transfer-function coefficients using `Rtot = Rcap + Rart`.
pub fn arterial_tf_coeffs(params: &ParameterSet) -> AnalysisResult<TfCoeffs> {
    TfCoeffs::from_cir(params.c_art, params.i_art, params.rtot())
}

/// Natural frequency and damping ratio from the denominator
/// `s^2 + a1*s + a0`: `wn = sqrt(a0)`, `zeta = a1/(2*wn)`.
pub fn arterial_frequency_params(coeffs: &TfCoeffs) -> AnalysisResult<(f64, f64)> {
    if coeffs.a0 <= 0.0 {
        return Err(AnalysisError::InvalidArg {
            what: "a0 must be > 0 to compute the natural frequency",
        });
    }
    let wn = coeffs.a0.sqrt();
    let zeta = coeffs.a1 / (2.0 * wn);
    Ok((wn, zeta))
}

/// Zero of the first-order numerator, `s0 = -b0/b1`.
pub fn arterial_expected_zero(coeffs: &TfCoeffs) -> AnalysisResult<f64> {
    if coeffs.b1 == 0.0 {
        return Err(AnalysisError::InvalidArg {
            what: "b1 must be non-zero to compute the zero",
        });
    }
    Ok(-coeffs.b0 / coeffs.b1)
}

/// Poles and zeros from the polynomial coefficients.
///
/// The denominator is quadratic so there are always two poles, real or a
/// conjugate pair. The numerator is first order: one zero when `b1 != 0`,
/// none otherwise.
pub fn arterial_poles_zeros(
    coeffs: &TfCoeffs,
) -> (Vec<Complex<f64>>, Vec<Complex<f64>>) {
    let disc = coeffs.a1 * coeffs.a1 - 4.0 * coeffs.a0;
    let poles = if disc >= 0.0 {
        let sq = disc.sqrt();
        vec![
            Complex::new((-coeffs.a1 + sq) / 2.0, 0.0),
            Complex::new((-coeffs.a1 - sq) / 2.0, 0.0),
        ]
    } else {
        let im = (-disc).sqrt() / 2.0;
        vec![
            Complex::new(-coeffs.a1 / 2.0, im),
            Complex::new(-coeffs.a1 / 2.0, -im),
        ]
    };

    let zeros = if coeffs.b1 != 0.0 {
        vec![Complex::new(-coeffs.b0 / coeffs.b1, 0.0)]
    } else {
        Vec::new()
    };

    (poles, zeros)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cv_model::healthy_params;

    #[test]
    fn healthy_tf_coeffs_match_closed_forms() {
        let params = healthy_params("healthy");
        let coeffs = arterial_tf_coeffs(&params).unwrap();
        // Cart=2, Iart=1e-4, Rtot=1.1
        assert!((coeffs.b1 - 0.5).abs() < 1e-12);
        assert!((coeffs.a0 - 5000.0).abs() < 1e-9);
        assert!((coeffs.a1 - 11000.0).abs() < 1e-9);
        assert!((coeffs.b0 - 5500.0).abs() < 1e-9);
    }

    #[test]
    fn matrices_follow_windkessel_structure() {
        let params = healthy_params("healthy");
        let (a, b, c, d) = arterial_lti_matrices(&params).unwrap();
        assert_eq!(a[(0, 0)], 0.0);
        assert!((a[(0, 1)] + 1.0 / params.c_art).abs() < 1e-12);
        assert!((a[(1, 0)] - 1.0 / params.i_art).abs() < 1e-9);
        assert!((a[(1, 1)] + params.rtot() / params.i_art).abs() < 1e-6);
        assert!((b[0] - 1.0 / params.c_art).abs() < 1e-12);
        assert_eq!(b[1], 0.0);
        assert_eq!(c, RowVector2::new(1.0, 0.0));
        assert_eq!(d, 0.0);
    }

    #[test]
    fn legacy_resistance_stays_at_twice_rart() {
        let params = healthy_params("healthy");
        // Rcap != Rart for the baseline, so the two conventions diverge
        let r_h = legacy_arterial_resistance(&params);
        assert!((r_h - 0.2).abs() < 1e-12);
        assert!((params.rtot() - 1.1).abs() < 1e-12);
    }

    #[test]
    fn frequency_params_and_zero() {
        let coeffs = TfCoeffs::from_cir(2.0, 1e-4, 1.1).unwrap();
        let (wn, zeta) = arterial_frequency_params(&coeffs).unwrap();
        assert!((wn - 5000.0_f64.sqrt()).abs() < 1e-9);
        assert!((zeta - coeffs.a1 / (2.0 * wn)).abs() < 1e-12);
        assert!(zeta > 1.0, "healthy arterial branch is overdamped");
        let z = arterial_expected_zero(&coeffs).unwrap();
        assert!((z + 11000.0).abs() < 1e-6);
    }

    #[test]
    fn poles_satisfy_vieta() {
        let coeffs = TfCoeffs::from_cir(2.0, 1e-4, 1.1).unwrap();
        let (poles, zeros) = arterial_poles_zeros(&coeffs);
        assert_eq!(poles.len(), 2);
        let sum = poles[0] + poles[1];
        let product = poles[0] * poles[1];
        assert!((sum.re + coeffs.a1).abs() < 1e-6 && sum.im.abs() < 1e-12);
        assert!((product.re - coeffs.a0).abs() < 1e-4 && product.im.abs() < 1e-12);
        assert_eq!(zeros.len(), 1);
        assert!((zeros[0].re - arterial_expected_zero(&coeffs).unwrap()).abs() < 1e-9);
    }

    #[test]
    fn underdamped_parameters_give_conjugate_poles() {
        // small resistance pushes the branch underdamped
        let coeffs = TfCoeffs::from_cir(2.0, 1e-4, 1e-3).unwrap();
        let (poles, _) = arterial_poles_zeros(&coeffs);
        assert!(poles[0].im > 0.0);
        assert!((poles[0].im + poles[1].im).abs() < 1e-12);
        assert!(poles.iter().all(|p| p.re < 0.0));
    }

    #[test]
    fn rejects_nonpositive_constants() {
        assert!(TfCoeffs::from_cir(0.0, 1e-4, 1.1).is_err());
        assert!(TfCoeffs::from_cir(2.0, -1e-4, 1.1).is_err());
        assert!(TfCoeffs::from_cir(2.0, 1e-4, 0.0).is_err());
        let mut params = healthy_params("broken");
        params.c_art = -1.0;
        assert!(arterial_lti_matrices(&params).is_err());
    }

    #[test]
    fn bundle_carries_consistent_resistance() {
        let params = healthy_params("healthy");
        let lti = ArterialLti::from_params(&params).unwrap();
        // a1 = R/I must match the A-matrix damping entry
        assert!((lti.coeffs.a1 + lti.a[(1, 1)]).abs() < 1e-6);

        let legacy = ArterialLti::with_resistance(&params, legacy_arterial_resistance(&params))
            .unwrap();
        assert!(legacy.coeffs.a1 < lti.coeffs.a1);
    }
}
