//! Spectral decomposition of dense matrices.

use nalgebra::{DMatrix, DVector, linalg::SymmetricEigen};
use num_complex::Complex64;
use tracing::debug;

use msmkit_eigen::{EigenPairs, compare, dense};

use crate::config::{Norm, Side};
use crate::error::AnalysisError;
use crate::normalize;
use crate::spectrum::{EigenvectorSet, RdlDecomposition, Spectrum};

/// Iteration budget per row for the symmetric eigensolver.
const SYMMETRIC_SWEEPS_PER_ROW: usize = 1000;

/// Stationary distribution as the normalized left null vector of `T - I`.
pub fn stationary_distribution(t: &DMatrix<f64>) -> Result<DVector<f64>, AnalysisError> {
    let values = dense::eigenvalues(t)?;
    normalize::require_simple_unit_eigenvalue(&values)?;
    let one = [Complex64::new(1.0, 0.0)];
    let null = dense::eigenvectors_for(&t.transpose(), &one)?;
    normalize::to_probability(&null.column(0).into_owned())
}

/// All eigenvalues, or the first `k`.
pub fn eigenvalues(t: &DMatrix<f64>, k: Option<usize>) -> Result<Spectrum, AnalysisError> {
    let mut values = dense::eigenvalues(t)?;
    if let Some(k) = k {
        values.truncate(k);
    }
    Ok(Spectrum::new(values, t.nrows()))
}

/// Unit-norm eigenvectors for all eigenvalues, or the first `k`.
pub fn eigenvectors(
    t: &DMatrix<f64>,
    k: Option<usize>,
    side: Side,
) -> Result<EigenvectorSet, AnalysisError> {
    let mut values = dense::eigenvalues(t)?;
    if let Some(k) = k {
        values.truncate(k);
    }
    let vectors = match side {
        Side::Right => dense::eigenvectors_for(t, &values)?,
        Side::Left => dense::eigenvectors_for(&t.transpose(), &values)?,
    };
    Ok(EigenvectorSet::new(values, vectors, side, t.nrows()))
}

/// Standard RDL decomposition: `L = R⁻ᵀ`, first left vector summing to one.
pub fn rdl_standard(t: &DMatrix<f64>, k: Option<usize>) -> Result<RdlDecomposition, AnalysisError> {
    let n = t.nrows();
    let (values, mut right) = dense::eig(t)?.into_parts();
    let mut left = right
        .clone()
        .try_inverse()
        .ok_or_else(|| AnalysisError::Convergence {
            reason: "eigenvector matrix is singular; the matrix is not diagonalizable".to_string(),
        })?
        .transpose();
    normalize::standard(&mut left, &mut right)?;

    let k = k.unwrap_or(n);
    let pairs_right = EigenPairs::new(values.clone(), right).truncate(k);
    let pairs_left = EigenPairs::new(values, left).truncate(k);
    let (values, right) = pairs_right.into_parts();
    let (_, left) = pairs_left.into_parts();
    Ok(RdlDecomposition::new(values, left, right, Norm::Standard, n))
}

/// Reversible RDL decomposition through the symmetrized matrix
/// `S = D^{1/2} T D^{-1/2}`, `D = diag(mu)`.
///
/// The caller has checked detailed balance with respect to `mu`.
pub fn rdl_reversible(
    t: &DMatrix<f64>,
    k: Option<usize>,
    mu: &DVector<f64>,
) -> Result<RdlDecomposition, AnalysisError> {
    let n = t.nrows();
    if mu.iter().any(|&m| m <= 0.0) {
        return Err(AnalysisError::Precondition {
            reason: "reversible normalization needs a strictly positive stationary distribution"
                .to_string(),
        });
    }
    let sqrt_mu = mu.map(f64::sqrt);
    let s = DMatrix::from_fn(n, n, |i, j| {
        let forward = sqrt_mu[i] * t[(i, j)] / sqrt_mu[j];
        let backward = sqrt_mu[j] * t[(j, i)] / sqrt_mu[i];
        0.5 * (forward + backward)
    });
    let budget = SYMMETRIC_SWEEPS_PER_ROW * n.max(1);
    let eigen = SymmetricEigen::try_new(s, f64::EPSILON, budget).ok_or(
        AnalysisError::Convergence {
            reason: format!("symmetric eigensolver did not converge within {budget} iterations"),
        },
    )?;

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        compare(
            Complex64::new(eigen.eigenvalues[a], 0.0),
            Complex64::new(eigen.eigenvalues[b], 0.0),
        )
    });
    let k = k.unwrap_or(n).min(n);
    order.truncate(k);

    let mut right = DMatrix::<Complex64>::zeros(n, k);
    let mut left = DMatrix::<Complex64>::zeros(n, k);
    for (c, &idx) in order.iter().enumerate() {
        let u = eigen.eigenvectors.column(idx);
        let r = DVector::from_fn(n, |i, _| u[i] / sqrt_mu[i]);
        let pivot = r
            .iter()
            .copied()
            .max_by(|a, b| a.abs().total_cmp(&b.abs()))
            .unwrap_or(1.0);
        let sign = if pivot < 0.0 { -1.0 } else { 1.0 };
        for i in 0..n {
            right[(i, c)] = Complex64::new(sign * r[i], 0.0);
            left[(i, c)] = Complex64::new(sign * u[i] * sqrt_mu[i], 0.0);
        }
    }
    let values = order
        .iter()
        .map(|&idx| Complex64::new(eigen.eigenvalues[idx], 0.0))
        .collect();
    debug!(n, k, "reversible decomposition via symmetrization");
    Ok(RdlDecomposition::new(values, left, right, Norm::Reversible, n))
}

/// Uniformized chain `P = I + K / c` of a generator and its rate `c`.
pub fn uniformize(k: &DMatrix<f64>) -> (DMatrix<f64>, f64) {
    let max_exit = k.diagonal().iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let c = if max_exit > 0.0 { 2.0 * max_exit } else { 1.0 };
    let n = k.nrows();
    let p = DMatrix::<f64>::identity(n, n) + k / c;
    (p, c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn three_state() -> DMatrix<f64> {
        DMatrix::from_row_slice(3, 3, &[0.5, 0.5, 0.0, 0.3, 0.4, 0.3, 0.0, 0.3, 0.7])
    }

    #[test]
    fn stationary_of_three_state_chain() {
        let mu = stationary_distribution(&three_state()).unwrap();
        assert_abs_diff_eq!(mu[0], 3.0 / 13.0, epsilon = 1e-12);
        assert_abs_diff_eq!(mu[1], 5.0 / 13.0, epsilon = 1e-12);
        assert_abs_diff_eq!(mu[2], 5.0 / 13.0, epsilon = 1e-12);
    }

    #[test]
    fn stationary_rejects_reducible_chain() {
        let t = DMatrix::<f64>::identity(2, 2);
        assert!(matches!(
            stationary_distribution(&t),
            Err(AnalysisError::Convergence { .. })
        ));
    }

    #[test]
    fn eigenvalues_truncated() {
        let spectrum = eigenvalues(&three_state(), Some(2)).unwrap();
        assert_eq!(spectrum.len(), 2);
        assert_abs_diff_eq!(spectrum.values()[0].re, 1.0, epsilon = 1e-12);
        assert!(!spectrum.coverage().is_complete());
    }

    #[test]
    fn standard_rdl_is_biorthonormal() {
        let rdl = rdl_standard(&three_state(), None).unwrap();
        let gram = rdl.left().transpose() * rdl.right();
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_abs_diff_eq!(gram[(i, j)].re, expected, epsilon = 1e-10);
                assert_abs_diff_eq!(gram[(i, j)].im, 0.0, epsilon = 1e-10);
            }
        }
        let first: f64 = rdl.left().column(0).iter().map(|z| z.re).sum();
        assert_abs_diff_eq!(first, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn reversible_rdl_first_left_is_mu() {
        let t = three_state();
        let mu = stationary_distribution(&t).unwrap();
        let rdl = rdl_reversible(&t, Some(2), &mu).unwrap();
        for i in 0..3 {
            assert_abs_diff_eq!(rdl.left()[(i, 0)].re, mu[i], epsilon = 1e-10);
            assert_abs_diff_eq!(rdl.right()[(i, 0)].re, 1.0, epsilon = 1e-10);
        }
        assert_eq!(rdl.values().len(), 2);
    }

    #[test]
    fn uniformization_of_generator() {
        let k = DMatrix::from_row_slice(2, 2, &[-1.0, 1.0, 2.0, -2.0]);
        let (p, c) = uniformize(&k);
        assert_abs_diff_eq!(c, 4.0);
        assert_abs_diff_eq!(p[(0, 0)], 0.75);
        assert_abs_diff_eq!(p[(1, 1)], 0.5);
        let (_, c0) = uniformize(&DMatrix::zeros(2, 2));
        assert_abs_diff_eq!(c0, 1.0);
    }
}
