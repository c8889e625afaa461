//! Spectral decomposition of CSR matrices by Arnoldi iteration.
//!
//! Only the eigenpairs of largest modulus are computed. Left eigenpairs come
//! from a second run on the transpose.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use sprs::{CsMat, TriMat};
use tracing::debug;

use msmkit_eigen::{ArnoldiConfig, EigenPairs, largest_magnitude};
use msmkit_matrix::transpose_csr;

use crate::config::{DEFAULT_SPARSE_K, Norm, Side};
use crate::error::AnalysisError;
use crate::normalize;
use crate::sparse::assessment;
use crate::spectrum::{EigenvectorSet, RdlDecomposition, Spectrum};

/// Number of eigenpairs computed when the caller does not ask for `k`.
fn default_k(n: usize, k: Option<usize>) -> usize {
    k.unwrap_or(DEFAULT_SPARSE_K).min(n)
}

fn leading_pairs(t: &CsMat<f64>, nev: usize) -> Result<EigenPairs, AnalysisError> {
    if nev == 0 {
        return Ok(EigenPairs::new(Vec::new(), DMatrix::zeros(t.rows(), 0)));
    }
    let pairs = largest_magnitude(t, &ArnoldiConfig::new(nev))?;
    debug!(n = t.rows(), nev, nnz = t.nnz(), "arnoldi finished");
    Ok(pairs)
}

/// Stationary distribution from the leading eigenvector of `Tᵀ`.
///
/// A Krylov space holds one direction per eigenspace, so a repeated
/// eigenvalue 1 is detected on the transition graph instead: the
/// distribution is unique iff there is exactly one closed class.
pub fn stationary_distribution(t: &CsMat<f64>) -> Result<DVector<f64>, AnalysisError> {
    let n = t.rows();
    let closed = assessment::transition_graph(t, 0.0).closed_class_count();
    if closed != 1 {
        return Err(AnalysisError::Convergence {
            reason: format!(
                "eigenvalue 1 has multiplicity {closed} ({closed} closed classes); \
                 the stationary distribution is not unique"
            ),
        });
    }
    let pairs = leading_pairs(&transpose_csr(t), n.min(2))?;
    normalize::require_simple_unit_eigenvalue(pairs.values())?;
    normalize::to_probability(&pairs.vectors().column(0).into_owned())
}

/// The `k` (default [`DEFAULT_SPARSE_K`]) eigenvalues of largest modulus.
pub fn eigenvalues(t: &CsMat<f64>, k: Option<usize>) -> Result<Spectrum, AnalysisError> {
    let n = t.rows();
    let (values, _) = leading_pairs(t, default_k(n, k))?.into_parts();
    Ok(Spectrum::new(values, n))
}

/// Unit-norm eigenvectors of the `k` eigenvalues of largest modulus.
pub fn eigenvectors(
    t: &CsMat<f64>,
    k: Option<usize>,
    side: Side,
) -> Result<EigenvectorSet, AnalysisError> {
    let n = t.rows();
    let nev = default_k(n, k);
    let pairs = match side {
        Side::Right => leading_pairs(t, nev)?,
        Side::Left => leading_pairs(&transpose_csr(t), nev)?,
    };
    let (values, vectors) = pairs.into_parts();
    Ok(EigenvectorSet::new(values, vectors, side, n))
}

/// Standard RDL decomposition from separate right and left runs, paired by
/// nearest eigenvalue and biorthogonalized within repeated eigenvalues.
pub fn rdl_standard(t: &CsMat<f64>, k: Option<usize>) -> Result<RdlDecomposition, AnalysisError> {
    let n = t.rows();
    let nev = default_k(n, k);
    let (values, mut right) = leading_pairs(t, nev)?.into_parts();
    let (left_values, left) = leading_pairs(&transpose_csr(t), nev)?.into_parts();
    let mut left = normalize::pair_left_with_right(&values, &left_values, &left);
    normalize::biorthogonalize(&values, &mut left, &right)?;
    normalize::standard(&mut left, &mut right)?;
    Ok(RdlDecomposition::new(values, left, right, Norm::Standard, n))
}

/// Reversible RDL decomposition: `L = diag(mu) R`, scaled to `Lᵀ R = I`.
///
/// The caller has checked detailed balance with respect to `mu`.
pub fn rdl_reversible(
    t: &CsMat<f64>,
    k: Option<usize>,
    mu: &DVector<f64>,
) -> Result<RdlDecomposition, AnalysisError> {
    let n = t.rows();
    let (values, mut right) = leading_pairs(t, default_k(n, k))?.into_parts();
    let left = normalize::reversible(&values, mu, &mut right)?;
    Ok(RdlDecomposition::new(values, left, right, Norm::Reversible, n))
}

/// Uniformized chain `P = I + K / c` of a generator and its rate `c`.
pub fn uniformize(k: &CsMat<f64>) -> (CsMat<f64>, f64) {
    let n = k.rows();
    let max_exit = k
        .outer_iterator()
        .enumerate()
        .filter_map(|(i, row)| row.get(i).copied())
        .fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let c = if max_exit > 0.0 { 2.0 * max_exit } else { 1.0 };

    let mut tri = TriMat::with_capacity((n, n), k.nnz() + n);
    for i in 0..n {
        tri.add_triplet(i, i, 1.0);
    }
    for (i, row) in k.outer_iterator().enumerate() {
        for (j, &v) in row.iter() {
            tri.add_triplet(i, j, v / c);
        }
    }
    (tri.to_csr(), c)
}
