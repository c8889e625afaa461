//! Full eigendecomposition of dense real non-symmetric matrices.
//!
//! Eigenvalues come from nalgebra's real Schur decomposition. Eigenvectors
//! are recovered as null vectors of `A - λI`: the right singular vectors
//! belonging to the smallest singular values. Eigenvalues that agree to
//! within [`CLUSTER_TOL`] are treated as one multiple eigenvalue and share an
//! orthonormal basis of the corresponding null space, so repeated
//! eigenvalues of diagonalizable matrices get independent eigenvectors.

use nalgebra::{DMatrix, DVector, linalg::Schur};
use num_complex::Complex64;

use crate::error::EigenError;
use crate::order::compare;
use crate::pairs::{EigenPairs, normalize_phase};

/// Relative distance below which two eigenvalues form one cluster.
pub const CLUSTER_TOL: f64 = 1e-8;

/// Relative imaginary part below which an eigenvalue is solved in real arithmetic.
const REAL_TOL: f64 = 1e-12;

/// Iteration budget per matrix row for the Schur and SVD kernels.
const SWEEPS_PER_ROW: usize = 1000;

fn budget(n: usize) -> usize {
    SWEEPS_PER_ROW * n.max(1)
}

/// Computes all eigenvalues of a square matrix in canonical order.
///
/// # Errors
///
/// Returns [`EigenError::NoConvergence`] if the Schur iteration fails.
pub fn eigenvalues(a: &DMatrix<f64>) -> Result<Vec<Complex64>, EigenError> {
    let n = a.nrows();
    if n == 0 {
        return Ok(Vec::new());
    }
    let schur = Schur::try_new(a.clone(), f64::EPSILON, budget(n)).ok_or(
        EigenError::NoConvergence {
            method: "schur",
            iterations: budget(n),
        },
    )?;
    let mut values: Vec<Complex64> = schur.complex_eigenvalues().iter().copied().collect();
    values.sort_by(|x, y| compare(*x, *y));
    Ok(values)
}

/// Computes unit-norm eigenvectors of `a` for the given eigenvalues.
///
/// Column `i` of the result belongs to `values[i]`. Pass `a.transpose()` to
/// obtain left eigenvectors.
///
/// # Errors
///
/// Returns [`EigenError::NoConvergence`] if an SVD fails, or
/// [`EigenError::InvalidRequest`] if a cluster is larger than the matrix.
pub fn eigenvectors_for(
    a: &DMatrix<f64>,
    values: &[Complex64],
) -> Result<DMatrix<Complex64>, EigenError> {
    let n = a.nrows();
    let mut out = DMatrix::<Complex64>::zeros(n, values.len());
    let mut assigned = vec![false; values.len()];

    for i in 0..values.len() {
        if assigned[i] {
            continue;
        }
        let radius = CLUSTER_TOL * values[i].norm().max(1.0);
        let cluster: Vec<usize> = (i..values.len())
            .filter(|&j| !assigned[j] && (values[j] - values[i]).norm() <= radius)
            .collect();
        if cluster.len() > n {
            return Err(EigenError::InvalidRequest {
                reason: format!(
                    "{} coincident eigenvalues requested for a {n}x{n} matrix",
                    cluster.len()
                ),
            });
        }
        let shift = cluster.iter().map(|&j| values[j]).sum::<Complex64>() / cluster.len() as f64;
        let basis = null_basis(a, shift, cluster.len())?;
        for (c, &j) in cluster.iter().enumerate() {
            out.set_column(j, &basis.column(c));
            assigned[j] = true;
        }
    }
    Ok(out)
}

/// Full right eigendecomposition in canonical order.
pub fn eig(a: &DMatrix<f64>) -> Result<EigenPairs, EigenError> {
    let values = eigenvalues(a)?;
    let vectors = eigenvectors_for(a, &values)?;
    Ok(EigenPairs::new(values, vectors))
}

/// Full left eigendecomposition in canonical order.
///
/// Column `i` satisfies `vᵀ A = λ_i vᵀ`.
pub fn left_eig(a: &DMatrix<f64>) -> Result<EigenPairs, EigenError> {
    let values = eigenvalues(a)?;
    let vectors = eigenvectors_for(&a.transpose(), &values)?;
    Ok(EigenPairs::new(values, vectors))
}

/// Orthonormal basis (`m` columns) of the approximate null space of `a - shift·I`.
fn null_basis(a: &DMatrix<f64>, shift: Complex64, m: usize) -> Result<DMatrix<Complex64>, EigenError> {
    let n = a.nrows();
    let svd_failed = EigenError::NoConvergence {
        method: "svd",
        iterations: budget(n),
    };

    let (singular_values, rows): (DVector<f64>, Vec<DVector<Complex64>>) =
        if shift.im.abs() <= REAL_TOL * shift.norm().max(1.0) {
            let mut shifted = a.clone();
            for d in 0..n {
                shifted[(d, d)] -= shift.re;
            }
            let svd = shifted
                .try_svd(false, true, f64::EPSILON, budget(n))
                .ok_or(svd_failed.clone())?;
            let v_t = svd.v_t.ok_or(svd_failed)?;
            let rows = (0..v_t.nrows())
                .map(|r| DVector::from_iterator(n, v_t.row(r).iter().map(|&x| Complex64::new(x, 0.0))))
                .collect();
            (svd.singular_values, rows)
        } else {
            let mut shifted = a.map(|x| Complex64::new(x, 0.0));
            for d in 0..n {
                shifted[(d, d)] -= shift;
            }
            let svd = shifted
                .try_svd(false, true, f64::EPSILON, budget(n))
                .ok_or(svd_failed.clone())?;
            let v_t = svd.v_t.ok_or(svd_failed)?;
            // Rows of Vᴴ are conjugated right singular vectors.
            let rows = (0..v_t.nrows())
                .map(|r| DVector::from_iterator(n, v_t.row(r).iter().map(|z| z.conj())))
                .collect();
            (svd.singular_values, rows)
        };

    let mut order: Vec<usize> = (0..singular_values.len()).collect();
    order.sort_by(|&x, &y| singular_values[x].total_cmp(&singular_values[y]));

    let mut basis = DMatrix::<Complex64>::zeros(n, m);
    for (c, &r) in order.iter().take(m).enumerate() {
        let mut v = rows[r].clone();
        normalize_phase(&mut v);
        basis.set_column(c, &v);
    }
    Ok(basis)
}
