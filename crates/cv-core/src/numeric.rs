use crate::CvError;

/// Floating point type used throughout the system
pub type Real = f64;

/// One tolerance for everything
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, CvError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(CvError::NonFinite { what, value: v })
    }
}

/// Require a strictly positive quantity (resistances, compliances, durations).
///
/// Most model parameters end up as divisors, so zero is as fatal as negative.
pub fn ensure_positive(v: Real, what: &'static str) -> Result<Real, CvError> {
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(CvError::InvalidArg { what })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearly_equal_basic() {
        let tol = Tolerances {
            abs: 1e-12,
            rel: 1e-9,
        };
        assert!(nearly_equal(1.0, 1.0 + 1e-12, tol));
        assert!(nearly_equal(0.0, 1e-13, tol));
        assert!(!nearly_equal(1.0, 1.0 + 1e-6, tol));
    }

    #[test]
    fn ensure_finite_detects_nan() {
        let err = ensure_finite(Real::NAN, "test").unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Non-finite"));
    }

    #[test]
    fn ensure_positive_rejects_zero_and_negative() {
        assert!(ensure_positive(0.8, "Tcc").is_ok());
        assert!(ensure_positive(0.0, "Tcc").is_err());
        assert!(ensure_positive(-1.0, "Tcc").is_err());
        assert!(ensure_positive(Real::INFINITY, "Tcc").is_err());
    }
}
