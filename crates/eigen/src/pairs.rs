//! Eigenvalue/eigenvector pairs returned by the solvers.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;

use crate::order::magnitude_order;

/// Eigenvalues with their eigenvectors stored as matrix columns.
///
/// Column `i` of [`vectors`](Self::vectors) belongs to `values()[i]`.
#[derive(Debug, Clone)]
pub struct EigenPairs {
    values: Vec<Complex64>,
    vectors: DMatrix<Complex64>,
}

impl EigenPairs {
    /// Pairs `values` with the columns of `vectors`.
    ///
    /// # Panics
    ///
    /// Panics if the number of columns differs from the number of values.
    pub fn new(values: Vec<Complex64>, vectors: DMatrix<Complex64>) -> Self {
        assert_eq!(
            values.len(),
            vectors.ncols(),
            "one eigenvector column per eigenvalue"
        );
        Self { values, vectors }
    }

    /// Eigenvalues.
    pub fn values(&self) -> &[Complex64] {
        &self.values
    }

    /// Eigenvectors as columns.
    pub fn vectors(&self) -> &DMatrix<Complex64> {
        &self.vectors
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no pairs.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Keeps only the first `k` pairs.
    pub fn truncate(self, k: usize) -> Self {
        let k = k.min(self.values.len());
        let mut values = self.values;
        values.truncate(k);
        let vectors = self.vectors.columns(0, k).into_owned();
        Self { values, vectors }
    }

    /// Reorders the pairs into canonical (decreasing modulus) order.
    pub fn sorted(self) -> Self {
        let order = magnitude_order(&self.values);
        let values = order.iter().map(|&i| self.values[i]).collect();
        let vectors = self.vectors.select_columns(order.iter());
        Self { values, vectors }
    }

    /// Splits into values and vectors.
    pub fn into_parts(self) -> (Vec<Complex64>, DMatrix<Complex64>) {
        (self.values, self.vectors)
    }
}

/// Scales `v` to unit 2-norm and rotates its phase so that the entry of
/// largest modulus is real and positive.
///
/// A zero vector is left unchanged.
pub fn normalize_phase(v: &mut DVector<Complex64>) {
    let norm = v.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt();
    if norm == 0.0 {
        return;
    }
    let pivot = v
        .iter()
        .copied()
        .max_by(|a, b| a.norm().total_cmp(&b.norm()))
        .unwrap_or(Complex64::new(1.0, 0.0));
    let rotation = pivot.conj() / (pivot.norm() * norm);
    for z in v.iter_mut() {
        *z *= rotation;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn normalize_phase_real_negative() {
        let mut v = DVector::from_vec(vec![c(-3.0, 0.0), c(-4.0, 0.0)]);
        normalize_phase(&mut v);
        assert!((v[0] - c(0.6, 0.0)).norm() < 1e-15);
        assert!((v[1] - c(0.8, 0.0)).norm() < 1e-15);
    }

    #[test]
    fn normalize_phase_complex() {
        let mut v = DVector::from_vec(vec![c(0.0, 2.0), c(1.0, 0.0)]);
        normalize_phase(&mut v);
        let norm: f64 = v.iter().map(|z| z.norm_sqr()).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-15);
        assert!(v[0].im.abs() < 1e-15 && v[0].re > 0.0);
    }

    #[test]
    fn normalize_phase_zero_vector() {
        let mut v = DVector::from_vec(vec![c(0.0, 0.0); 3]);
        normalize_phase(&mut v);
        assert!(v.iter().all(|z| *z == c(0.0, 0.0)));
    }

    #[test]
    fn sorted_reorders_columns() {
        let values = vec![c(0.5, 0.0), c(1.0, 0.0)];
        let vectors = DMatrix::from_row_slice(2, 2, &[c(1.0, 0.0), c(2.0, 0.0), c(3.0, 0.0), c(4.0, 0.0)]);
        let pairs = EigenPairs::new(values, vectors).sorted();
        assert_eq!(pairs.values()[0], c(1.0, 0.0));
        assert_eq!(pairs.vectors()[(0, 0)], c(2.0, 0.0));
        assert_eq!(pairs.vectors()[(1, 1)], c(3.0, 0.0));
    }

    #[test]
    fn truncate_keeps_leading_pairs() {
        let values = vec![c(1.0, 0.0), c(0.5, 0.0), c(0.1, 0.0)];
        let vectors = DMatrix::from_element(3, 3, c(1.0, 0.0));
        let pairs = EigenPairs::new(values, vectors).truncate(2);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs.vectors().ncols(), 2);
    }
}
