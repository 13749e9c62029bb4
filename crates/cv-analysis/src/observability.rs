//! Observability checks for an LTI pair (A, C).
//!
//! The observability matrix is stacked blocks `O = [C; C A; ...; C A^{n-1}]`;
//! rank and conditioning come from its singular values. The continuous-time
//! observability Gramian solves the Lyapunov equation
//! `A^T W + W A + C^T C = 0`, which has a unique positive semidefinite
//! solution when A is Hurwitz.

use nalgebra::{DMatrix, DVector};

use crate::error::{AnalysisError, AnalysisResult};

/// Summary of the observability matrix checks.
#[derive(Clone, Debug)]
pub struct ObservabilityReport {
    pub o: DMatrix<f64>,
    pub rank: usize,
    /// Determinant, only when O is square (single-output systems)
    pub det: Option<f64>,
    /// Ratio of largest to smallest singular value
    pub cond: f64,
}

/// Build `O = [C; C A; ...; C A^{n-1}]` for A (n x n) and C (p x n).
pub fn observability_matrix(
    a: &DMatrix<f64>,
    c: &DMatrix<f64>,
) -> AnalysisResult<DMatrix<f64>> {
    let n = a.nrows();
    if a.ncols() != n {
        return Err(AnalysisError::InvalidArg { what: "A must be square" });
    }
    if c.ncols() != n {
        return Err(AnalysisError::InvalidArg {
            what: "C must have as many columns as A",
        });
    }
    let p = c.nrows();

    let mut o = DMatrix::<f64>::zeros(p * n, n);
    let mut cak = c.clone();
    for k in 0..n {
        o.rows_mut(k * p, p).copy_from(&cak);
        cak = &cak * a;
    }
    Ok(o)
}

/// Rank, determinant (when square), and condition number of O.
///
/// `tol` overrides the default rank threshold of
/// `max_singular_value * eps * max(nrows, ncols)`.
pub fn observability_checks(
    a: &DMatrix<f64>,
    c: &DMatrix<f64>,
    tol: Option<f64>,
) -> AnalysisResult<ObservabilityReport> {
    let o = observability_matrix(a, c)?;
    let (rank, cond) = rank_and_cond(&o, tol);
    let det = if o.nrows() == o.ncols() {
        Some(o.determinant())
    } else {
        None
    };
    Ok(ObservabilityReport { o, rank, det, cond })
}

/// Solve `A^T W + W A = -C^T C` for the observability Gramian.
///
/// Uses the Kronecker vectorization of the Lyapunov equation; fine for the
/// small state dimensions this project deals in.
pub fn observability_gramian(
    a: &DMatrix<f64>,
    c: &DMatrix<f64>,
) -> AnalysisResult<DMatrix<f64>> {
    let n = a.nrows();
    if a.ncols() != n {
        return Err(AnalysisError::InvalidArg { what: "A must be square" });
    }
    if c.ncols() != n {
        return Err(AnalysisError::InvalidArg {
            what: "C must have as many columns as A",
        });
    }

    let q = c.transpose() * c;
    let eye = DMatrix::<f64>::identity(n, n);
    let at = a.transpose();

    // vec(A^T W + W A) = (I (x) A^T + A^T (x) I) vec(W)
    let k = eye.kronecker(&at) + at.kronecker(&eye);
    let rhs = DVector::from_iterator(n * n, q.iter().map(|v| -v));

    let w_vec = k.lu().solve(&rhs).ok_or(AnalysisError::Singular {
        what: "Lyapunov system is singular (A is not Hurwitz?)",
    })?;
    Ok(DMatrix::from_column_slice(n, n, w_vec.as_slice()))
}

/// Gramian together with its eigenvalues sorted descending.
pub fn observability_gramian_eigs(
    a: &DMatrix<f64>,
    c: &DMatrix<f64>,
) -> AnalysisResult<(DMatrix<f64>, Vec<f64>)> {
    let w = observability_gramian(a, c)?;
    // symmetrize before the eigendecomposition to scrub solve roundoff
    let sym = (&w + w.transpose()) * 0.5;
    let mut eigs: Vec<f64> = sym.symmetric_eigen().eigenvalues.iter().copied().collect();
    eigs.sort_by(|x, y| y.total_cmp(x));
    Ok((w, eigs))
}

/// True iff `rank(O) == n`.
pub fn is_observable(
    a: &DMatrix<f64>,
    c: &DMatrix<f64>,
    tol: Option<f64>,
) -> AnalysisResult<bool> {
    let o = observability_matrix(a, c)?;
    let (rank, _) = rank_and_cond(&o, tol);
    Ok(rank == a.nrows())
}

fn rank_and_cond(o: &DMatrix<f64>, tol: Option<f64>) -> (usize, f64) {
    let svd = o.clone().svd(false, false);
    let sv = &svd.singular_values;
    let sv_max = sv.iter().copied().fold(0.0_f64, f64::max);
    let sv_min = sv.iter().copied().fold(f64::INFINITY, f64::min);

    let threshold = tol.unwrap_or_else(|| {
        sv_max * f64::EPSILON * o.nrows().max(o.ncols()) as f64
    });
    let rank = sv.iter().filter(|&&s| s > threshold).count();
    let cond = if sv_min > 0.0 {
        sv_max / sv_min
    } else {
        f64::INFINITY
    };
    (rank, cond)
}
