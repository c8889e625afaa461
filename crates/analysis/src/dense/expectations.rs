//! Expected transition counts for dense matrices.

use nalgebra::{DMatrix, DVector};

/// `EC = Σ_{k<N} diag(p0ᵀ Tᵏ) T`, propagated with vector-matrix products.
pub fn expected_counts(p0: &DVector<f64>, t: &DMatrix<f64>, n_steps: usize) -> DMatrix<f64> {
    let n = t.nrows();
    if n_steps == 0 {
        return DMatrix::zeros(n, n);
    }
    let mut weights = DVector::<f64>::zeros(n);
    let mut p = p0.clone();
    for step in 0..n_steps {
        weights += &p;
        if step + 1 < n_steps {
            p = t.tr_mul(&p);
        }
    }
    scale_rows(t, &weights)
}

/// `EC = N diag(mu) T`.
pub fn expected_counts_stationary(
    t: &DMatrix<f64>,
    n_steps: usize,
    mu: &DVector<f64>,
) -> DMatrix<f64> {
    scale_rows(t, &(mu * n_steps as f64))
}

fn scale_rows(t: &DMatrix<f64>, weights: &DVector<f64>) -> DMatrix<f64> {
    let mut out = t.clone();
    for (mut row, &w) in out.row_iter_mut().zip(weights.iter()) {
        row *= w;
    }
    out
}
