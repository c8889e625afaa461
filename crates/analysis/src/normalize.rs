//! Normalization conventions shared by the dense and sparse backends.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;

use msmkit_eigen::dense::CLUSTER_TOL;

use crate::config::UNIT_EIGENVALUE_TOL;
use crate::error::AnalysisError;

/// Overlaps smaller than this cannot be normalized.
const OVERLAP_TOL: f64 = 1e-300;

/// Checks that exactly one of `values` lies within [`UNIT_EIGENVALUE_TOL`] of 1.
pub(crate) fn require_simple_unit_eigenvalue(values: &[Complex64]) -> Result<(), AnalysisError> {
    let one = Complex64::new(1.0, 0.0);
    let count = values
        .iter()
        .filter(|z| (**z - one).norm() <= UNIT_EIGENVALUE_TOL)
        .count();
    match count {
        1 => Ok(()),
        0 => Err(AnalysisError::Convergence {
            reason: "no eigenvalue equal to 1; not a transition matrix".to_string(),
        }),
        c => Err(AnalysisError::Convergence {
            reason: format!(
                "eigenvalue 1 has multiplicity {c}; the stationary distribution is not unique"
            ),
        }),
    }
}

/// Absolute values of `v` normalized to sum one.
pub(crate) fn to_probability(v: &DVector<Complex64>) -> Result<DVector<f64>, AnalysisError> {
    let abs = v.map(|z| z.norm());
    let total = abs.sum();
    if total <= 0.0 || !total.is_finite() {
        return Err(AnalysisError::Convergence {
            reason: "stationary eigenvector vanished".to_string(),
        });
    }
    Ok(abs / total)
}

/// Plain (non-conjugating) dot product.
fn bilinear(a: nalgebra::DVectorView<'_, Complex64>, b: nalgebra::DVectorView<'_, Complex64>) -> Complex64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Applies the standard normalization in place.
///
/// The first left eigenvector is scaled to sum one; every other left
/// eigenvector is scaled so that `L[:,i]ᵀ R[:,i] = 1`, and the first right
/// eigenvector absorbs the remaining factor of pair 0.
pub(crate) fn standard(
    left: &mut DMatrix<Complex64>,
    right: &mut DMatrix<Complex64>,
) -> Result<(), AnalysisError> {
    if left.ncols() == 0 {
        return Ok(());
    }
    let total: Complex64 = left.column(0).iter().sum();
    if total.norm() <= OVERLAP_TOL {
        return Err(AnalysisError::Convergence {
            reason: "first left eigenvector sums to zero".to_string(),
        });
    }
    left.column_mut(0).iter_mut().for_each(|z| *z /= total);

    for i in 0..left.ncols() {
        let overlap = bilinear(left.column(i), right.column(i));
        if overlap.norm() <= OVERLAP_TOL {
            return Err(AnalysisError::Convergence {
                reason: format!("left and right eigenvectors {i} are orthogonal"),
            });
        }
        if i == 0 {
            right.column_mut(0).iter_mut().for_each(|z| *z /= overlap);
        } else {
            left.column_mut(i).iter_mut().for_each(|z| *z /= overlap);
        }
    }
    Ok(())
}

/// Indices of `values` grouped by eigenvalue, two values sharing a group
/// when they agree within [`CLUSTER_TOL`] relative to their modulus.
fn clusters(values: &[Complex64]) -> Vec<Vec<usize>> {
    let mut assigned = vec![false; values.len()];
    let mut groups = Vec::new();
    for i in 0..values.len() {
        if assigned[i] {
            continue;
        }
        let radius = CLUSTER_TOL * values[i].norm().max(1.0);
        let group: Vec<usize> = (i..values.len())
            .filter(|&j| !assigned[j] && (values[j] - values[i]).norm() <= radius)
            .collect();
        for &j in &group {
            assigned[j] = true;
        }
        groups.push(group);
    }
    groups
}

/// Makes `L_cᵀ R_c = I` within every group of equal eigenvalues by
/// replacing `L_c` with `L_c (R_cᵀ L_c)⁻¹`.
///
/// Left and right eigenvectors of distinct eigenvalues are already
/// biorthogonal; inside a repeated eigenvalue the two bases are unrelated.
pub(crate) fn biorthogonalize(
    values: &[Complex64],
    left: &mut DMatrix<Complex64>,
    right: &DMatrix<Complex64>,
) -> Result<(), AnalysisError> {
    for group in clusters(values).into_iter().filter(|g| g.len() > 1) {
        let r = right.select_columns(group.iter());
        let l = left.select_columns(group.iter());
        let overlap = r.transpose() * &l;
        let inverse = overlap.try_inverse().ok_or_else(|| AnalysisError::Convergence {
            reason: format!(
                "left and right eigenspaces of {} are orthogonal",
                values[group[0]]
            ),
        })?;
        let fixed = l * inverse;
        for (c, &j) in group.iter().enumerate() {
            left.set_column(j, &fixed.column(c));
        }
    }
    Ok(())
}

/// Orthonormalizes the columns of `right` inside every group of equal
/// eigenvalues under the bilinear form `<x, y> = Σ mu_i x_i y_i`.
fn orthonormalize_weighted(
    values: &[Complex64],
    mu: &DVector<f64>,
    right: &mut DMatrix<Complex64>,
) -> Result<(), AnalysisError> {
    let weighted = |x: &DVector<Complex64>, y: &DVector<Complex64>| -> Complex64 {
        x.iter().zip(y.iter()).zip(mu.iter()).map(|((a, b), &m)| a * b * m).sum()
    };
    for group in clusters(values).into_iter().filter(|g| g.len() > 1) {
        let mut done: Vec<DVector<Complex64>> = Vec::with_capacity(group.len());
        for &j in &group {
            let mut v = right.column(j).into_owned();
            for q in &done {
                let c = weighted(q, &v);
                v -= q * c;
            }
            let norm = weighted(&v, &v);
            if norm.norm() <= OVERLAP_TOL {
                return Err(AnalysisError::Convergence {
                    reason: format!("eigenvectors of {} are linearly dependent", values[j]),
                });
            }
            v /= norm.sqrt();
            right.set_column(j, &v);
            done.push(v);
        }
    }
    Ok(())
}

/// Builds `L = diag(mu) R` and scales both so that `L[:,i]ᵀ R[:,i] = 1`.
///
/// Eigenvectors sharing an eigenvalue are first made mu-orthonormal, so
/// that `Lᵀ R = I` holds across the whole set.
pub(crate) fn reversible(
    values: &[Complex64],
    mu: &DVector<f64>,
    right: &mut DMatrix<Complex64>,
) -> Result<DMatrix<Complex64>, AnalysisError> {
    orthonormalize_weighted(values, mu, right)?;
    let mut left = right.clone();
    for (mut row, &m) in left.row_iter_mut().zip(mu.iter()) {
        row.iter_mut().for_each(|z| *z *= m);
    }
    for i in 0..right.ncols() {
        let overlap = bilinear(left.column(i), right.column(i));
        if overlap.norm() <= OVERLAP_TOL {
            return Err(AnalysisError::Convergence {
                reason: format!("eigenvector {i} has zero weight under mu"),
            });
        }
        let scale = overlap.sqrt();
        left.column_mut(i).iter_mut().for_each(|z| *z /= scale);
        right.column_mut(i).iter_mut().for_each(|z| *z /= scale);
    }
    Ok(left)
}

/// Reorders the columns of `left` so that column `i` belongs to the left
/// eigenvalue nearest to `right_values[i]`.
pub(crate) fn pair_left_with_right(
    right_values: &[Complex64],
    left_values: &[Complex64],
    left: &DMatrix<Complex64>,
) -> DMatrix<Complex64> {
    let mut used = vec![false; left_values.len()];
    let mut order = Vec::with_capacity(right_values.len());
    for w in right_values {
        let best = (0..left_values.len())
            .filter(|&j| !used[j])
            .min_by(|&a, &b| (left_values[a] - w).norm().total_cmp(&(left_values[b] - w).norm()));
        if let Some(j) = best {
            used[j] = true;
            order.push(j);
        }
    }
    left.select_columns(order.iter())
}
