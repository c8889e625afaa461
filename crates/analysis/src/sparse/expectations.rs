//! Expected transition counts for CSR matrices.

use nalgebra::DVector;
use sprs::{CsMat, TriMat};

/// `EC = Σ_{k<N} diag(p0ᵀ Tᵏ) T`; the result keeps the sparsity pattern of `T`.
pub fn expected_counts(p0: &DVector<f64>, t: &CsMat<f64>, n_steps: usize) -> CsMat<f64> {
    let n = t.rows();
    if n_steps == 0 {
        return CsMat::zero((n, n));
    }
    let mut weights = DVector::<f64>::zeros(n);
    let mut p = p0.clone();
    for step in 0..n_steps {
        weights += &p;
        if step + 1 < n_steps {
            p = propagate(&p, t);
        }
    }
    scale_rows(t, &weights)
}

/// `EC = N diag(mu) T`.
pub fn expected_counts_stationary(t: &CsMat<f64>, n_steps: usize, mu: &DVector<f64>) -> CsMat<f64> {
    if n_steps == 0 {
        return CsMat::zero((t.rows(), t.cols()));
    }
    scale_rows(t, &(mu * n_steps as f64))
}

/// One step `pᵀ T` of the distribution.
fn propagate(p: &DVector<f64>, t: &CsMat<f64>) -> DVector<f64> {
    let mut next = DVector::zeros(p.len());
    for (i, row) in t.outer_iterator().enumerate() {
        let pi = p[i];
        if pi == 0.0 {
            continue;
        }
        for (j, &v) in row.iter() {
            next[j] += pi * v;
        }
    }
    next
}

fn scale_rows(t: &CsMat<f64>, weights: &DVector<f64>) -> CsMat<f64> {
    let mut tri = TriMat::with_capacity((t.rows(), t.cols()), t.nnz());
    for (i, row) in t.outer_iterator().enumerate() {
        for (j, &v) in row.iter() {
            tri.add_triplet(i, j, weights[i] * v);
        }
    }
    tri.to_csr()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn two_state() -> CsMat<f64> {
        let mut tri = TriMat::new((2, 2));
        tri.add_triplet(0, 0, 0.9);
        tri.add_triplet(0, 1, 0.1);
        tri.add_triplet(1, 0, 0.2);
        tri.add_triplet(1, 1, 0.8);
        tri.to_csr()
    }

    fn entry(m: &CsMat<f64>, i: usize, j: usize) -> f64 {
        m.get(i, j).copied().unwrap_or(0.0)
    }

    #[test]
    fn zero_steps_is_empty() {
        let p0 = DVector::from_vec(vec![0.5, 0.5]);
        let ec = expected_counts(&p0, &two_state(), 0);
        assert_eq!(ec.nnz(), 0);
        assert_eq!(ec.shape(), (2, 2));
    }

    #[test]
    fn two_steps_from_state_zero() {
        let p0 = DVector::from_vec(vec![1.0, 0.0]);
        let ec = expected_counts(&p0, &two_state(), 2);
        assert_abs_diff_eq!(entry(&ec, 0, 0), 1.71, epsilon = 1e-12);
        assert_abs_diff_eq!(entry(&ec, 0, 1), 0.19, epsilon = 1e-12);
        assert_abs_diff_eq!(entry(&ec, 1, 0), 0.02, epsilon = 1e-12);
        assert_abs_diff_eq!(entry(&ec, 1, 1), 0.08, epsilon = 1e-12);
    }

    #[test]
    fn propagation_step() {
        let p = propagate(&DVector::from_vec(vec![1.0, 0.0]), &two_state());
        assert_abs_diff_eq!(p[0], 0.9, epsilon = 1e-15);
        assert_abs_diff_eq!(p[1], 0.1, epsilon = 1e-15);
    }
}
