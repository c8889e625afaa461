//! Matrix-free linear operators consumed by the Arnoldi iteration.

use nalgebra::DMatrix;
use sprs::CsMat;

/// A square linear map `y = A x` on `f64` vectors.
pub trait LinearOperator {
    /// Dimension of the (square) operator.
    fn dim(&self) -> usize;

    /// Writes `A x` into `y`. Both slices have length [`dim`](Self::dim).
    fn apply(&self, x: &[f64], y: &mut [f64]);
}

impl LinearOperator for DMatrix<f64> {
    fn dim(&self) -> usize {
        self.nrows()
    }

    fn apply(&self, x: &[f64], y: &mut [f64]) {
        y.fill(0.0);
        for (j, &xj) in x.iter().enumerate() {
            if xj == 0.0 {
                continue;
            }
            for (yi, &a) in y.iter_mut().zip(self.column(j).iter()) {
                *yi += a * xj;
            }
        }
    }
}

impl LinearOperator for CsMat<f64> {
    fn dim(&self) -> usize {
        self.rows()
    }

    fn apply(&self, x: &[f64], y: &mut [f64]) {
        y.fill(0.0);
        if self.is_csr() {
            for (i, row) in self.outer_iterator().enumerate() {
                y[i] = row.iter().map(|(j, &a)| a * x[j]).sum();
            }
        } else {
            for (j, col) in self.outer_iterator().enumerate() {
                for (i, &a) in col.iter() {
                    y[i] += a * x[j];
                }
            }
        }
    }
}
