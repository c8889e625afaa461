//! The square matrix type shared by every analysis backend.

use nalgebra::DMatrix;
use sprs::{CsMat, TriMat};

use crate::error::MatrixError;
use crate::storage::StorageKind;

/// The storage a [`Matrix`] is held in.
///
/// Sparse matrices are always in CSR order so that backends can walk rows
/// with `outer_iterator`.
#[derive(Debug, Clone)]
pub enum Storage {
    /// Full column-major array.
    Dense(DMatrix<f64>),
    /// Compressed sparse rows.
    Sparse(CsMat<f64>),
}

/// A square, finite, immutable `f64` matrix in dense or sparse storage.
///
/// # Example
///
/// ```
/// use msmkit_matrix::{Matrix, StorageKind};
///
/// let t = Matrix::from_rows(&[vec![0.9, 0.1], vec![0.2, 0.8]]).unwrap();
/// assert_eq!(t.dim(), 2);
/// assert_eq!(t.to_sparse().kind(), StorageKind::Sparse);
/// ```
#[derive(Debug, Clone)]
pub struct Matrix {
    storage: Storage,
}

impl Matrix {
    /// Wraps a dense matrix.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::NotSquare`] or [`MatrixError::NonFinite`].
    pub fn dense(m: DMatrix<f64>) -> Result<Self, MatrixError> {
        if m.nrows() != m.ncols() {
            return Err(MatrixError::NotSquare {
                rows: m.nrows(),
                cols: m.ncols(),
            });
        }
        for j in 0..m.ncols() {
            for i in 0..m.nrows() {
                let value = m[(i, j)];
                if !value.is_finite() {
                    return Err(MatrixError::NonFinite {
                        row: i,
                        col: j,
                        value,
                    });
                }
            }
        }
        Ok(Self {
            storage: Storage::Dense(m),
        })
    }

    /// Wraps a sparse matrix, converting CSC input to CSR.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError::NotSquare`] or [`MatrixError::NonFinite`].
    pub fn sparse(m: CsMat<f64>) -> Result<Self, MatrixError> {
        if m.rows() != m.cols() {
            return Err(MatrixError::NotSquare {
                rows: m.rows(),
                cols: m.cols(),
            });
        }
        let m = if m.is_csr() { m } else { m.to_csr() };
        for (i, row) in m.outer_iterator().enumerate() {
            for (j, &value) in row.iter() {
                if !value.is_finite() {
                    return Err(MatrixError::NonFinite {
                        row: i,
                        col: j,
                        value,
                    });
                }
            }
        }
        Ok(Self {
            storage: Storage::Sparse(m),
        })
    }

    /// Builds a dense matrix from a list of equally long rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, MatrixError> {
        let n = rows.len();
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n {
                return Err(MatrixError::RaggedRows {
                    row: i,
                    expected: n,
                    got: row.len(),
                });
            }
        }
        Self::dense(DMatrix::from_fn(n, n, |i, j| rows[i][j]))
    }

    /// Builds a sparse n x n matrix from `(row, col, value)` triplets.
    ///
    /// Duplicate positions are summed.
    pub fn from_triplets(n: usize, entries: &[(usize, usize, f64)]) -> Result<Self, MatrixError> {
        let mut tri = TriMat::with_capacity((n, n), entries.len());
        for &(row, col, value) in entries {
            if row >= n || col >= n {
                return Err(MatrixError::IndexOutOfBounds { row, col, n });
            }
            tri.add_triplet(row, col, value);
        }
        Self::sparse(tri.to_csr())
    }

    /// Builds a matrix of the requested storage from a list of rows.
    pub fn from_rows_as(kind: StorageKind, rows: &[Vec<f64>]) -> Result<Self, MatrixError> {
        let dense = Self::from_rows(rows)?;
        Ok(match kind {
            StorageKind::Dense => dense,
            StorageKind::Sparse => dense.to_sparse(),
        })
    }

    /// Number of states (rows and columns).
    pub fn dim(&self) -> usize {
        match &self.storage {
            Storage::Dense(m) => m.nrows(),
            Storage::Sparse(m) => m.rows(),
        }
    }

    /// The storage representation.
    pub fn kind(&self) -> StorageKind {
        match &self.storage {
            Storage::Dense(_) => StorageKind::Dense,
            Storage::Sparse(_) => StorageKind::Sparse,
        }
    }

    /// Borrows the underlying storage.
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Consumes the matrix, returning its storage.
    pub fn into_storage(self) -> Storage {
        self.storage
    }

    /// Number of explicitly stored entries (nonzero entries for dense storage).
    pub fn nnz(&self) -> usize {
        match &self.storage {
            Storage::Dense(m) => m.iter().filter(|&&v| v != 0.0).count(),
            Storage::Sparse(m) => m.nnz(),
        }
    }

    /// Returns entry `(i, j)`, or 0.0 for an implicit sparse zero.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is out of range.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        let n = self.dim();
        assert!(i < n && j < n, "index ({i}, {j}) out of range for {n}x{n}");
        match &self.storage {
            Storage::Dense(m) => m[(i, j)],
            Storage::Sparse(m) => m.get(i, j).copied().unwrap_or(0.0),
        }
    }

    /// Returns a dense copy of the entries.
    pub fn to_dense_matrix(&self) -> DMatrix<f64> {
        match &self.storage {
            Storage::Dense(m) => m.clone(),
            Storage::Sparse(m) => {
                let mut out = DMatrix::zeros(m.rows(), m.cols());
                for (i, row) in m.outer_iterator().enumerate() {
                    for (j, &value) in row.iter() {
                        out[(i, j)] += value;
                    }
                }
                out
            }
        }
    }

    /// Returns the same matrix in dense storage.
    pub fn to_dense(&self) -> Matrix {
        Self {
            storage: Storage::Dense(self.to_dense_matrix()),
        }
    }

    /// Returns the same matrix in sparse storage; exact zeros are dropped.
    pub fn to_sparse(&self) -> Matrix {
        match &self.storage {
            Storage::Sparse(_) => self.clone(),
            Storage::Dense(m) => {
                let n = m.nrows();
                let mut tri = TriMat::new((n, n));
                for j in 0..n {
                    for i in 0..n {
                        let value = m[(i, j)];
                        if value != 0.0 {
                            tri.add_triplet(i, j, value);
                        }
                    }
                }
                Self {
                    storage: Storage::Sparse(tri.to_csr()),
                }
            }
        }
    }

    /// Returns the transpose in the same storage.
    pub fn transpose(&self) -> Matrix {
        let storage = match &self.storage {
            Storage::Dense(m) => Storage::Dense(m.transpose()),
            Storage::Sparse(m) => Storage::Sparse(transpose_csr(m)),
        };
        Self { storage }
    }
}

/// Transposes a CSR matrix into a new CSR matrix.
pub fn transpose_csr(m: &CsMat<f64>) -> CsMat<f64> {
    let mut tri = TriMat::with_capacity((m.cols(), m.rows()), m.nnz());
    for (i, row) in m.outer_iterator().enumerate() {
        for (j, &value) in row.iter() {
            tri.add_triplet(j, i, value);
        }
    }
    tri.to_csr()
}
