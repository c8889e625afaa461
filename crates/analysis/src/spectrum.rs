//! Result types of the spectral operations.

use nalgebra::DMatrix;
use num_complex::Complex64;

use crate::config::{Norm, Side};

/// How much of the spectrum a result covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coverage {
    /// Every eigenvalue of the matrix is present.
    Complete,
    /// Only the leading `computed` of `dimension` eigenvalues are present.
    Partial {
        /// Number of eigenpairs returned.
        computed: usize,
        /// Matrix dimension.
        dimension: usize,
    },
}

impl Coverage {
    /// Coverage of `computed` leading eigenpairs of an `dimension`-state matrix.
    pub fn of(computed: usize, dimension: usize) -> Self {
        if computed >= dimension {
            Self::Complete
        } else {
            Self::Partial {
                computed,
                dimension,
            }
        }
    }

    /// Returns `true` for [`Coverage::Complete`].
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// Eigenvalues in decreasing order of modulus.
#[derive(Debug, Clone)]
pub struct Spectrum {
    values: Vec<Complex64>,
    coverage: Coverage,
}

impl Spectrum {
    pub(crate) fn new(values: Vec<Complex64>, dimension: usize) -> Self {
        let coverage = Coverage::of(values.len(), dimension);
        Self { values, coverage }
    }

    /// The eigenvalues.
    pub fn values(&self) -> &[Complex64] {
        &self.values
    }

    /// Real parts of the eigenvalues.
    pub fn real_parts(&self) -> Vec<f64> {
        self.values.iter().map(|z| z.re).collect()
    }

    /// Number of eigenvalues.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no eigenvalues.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fraction of the spectrum covered.
    pub fn coverage(&self) -> Coverage {
        self.coverage
    }

    /// Consumes the spectrum, returning its values.
    pub fn into_values(self) -> Vec<Complex64> {
        self.values
    }

    pub(crate) fn map_values(mut self, f: impl Fn(Complex64) -> Complex64) -> Self {
        self.values.iter_mut().for_each(|z| *z = f(*z));
        self
    }
}

/// Eigenvectors (as columns) together with their eigenvalues.
#[derive(Debug, Clone)]
pub struct EigenvectorSet {
    values: Vec<Complex64>,
    vectors: DMatrix<Complex64>,
    side: Side,
    coverage: Coverage,
}

impl EigenvectorSet {
    pub(crate) fn new(
        values: Vec<Complex64>,
        vectors: DMatrix<Complex64>,
        side: Side,
        dimension: usize,
    ) -> Self {
        let coverage = Coverage::of(values.len(), dimension);
        Self {
            values,
            vectors,
            side,
            coverage,
        }
    }

    /// The eigenvalues; entry `i` belongs to column `i`.
    pub fn values(&self) -> &[Complex64] {
        &self.values
    }

    /// Unit-norm eigenvectors as columns.
    pub fn vectors(&self) -> &DMatrix<Complex64> {
        &self.vectors
    }

    /// Whether these are left or right eigenvectors.
    pub fn side(&self) -> Side {
        self.side
    }

    /// Fraction of the spectrum covered.
    pub fn coverage(&self) -> Coverage {
        self.coverage
    }

    pub(crate) fn map_values(mut self, f: impl Fn(Complex64) -> Complex64) -> Self {
        self.values.iter_mut().for_each(|z| *z = f(*z));
        self
    }
}

/// Eigenvalues with normalized left and right eigenvectors.
///
/// Column `i` of [`left`](Self::left) and [`right`](Self::right) belongs to
/// `values()[i]`, and `left()ᵀ · right()` is the identity (plain transpose).
#[derive(Debug, Clone)]
pub struct RdlDecomposition {
    values: Vec<Complex64>,
    left: DMatrix<Complex64>,
    right: DMatrix<Complex64>,
    norm: Norm,
    coverage: Coverage,
}

impl RdlDecomposition {
    pub(crate) fn new(
        values: Vec<Complex64>,
        left: DMatrix<Complex64>,
        right: DMatrix<Complex64>,
        norm: Norm,
        dimension: usize,
    ) -> Self {
        let coverage = Coverage::of(values.len(), dimension);
        Self {
            values,
            left,
            right,
            norm,
            coverage,
        }
    }

    /// The eigenvalues `w`.
    pub fn values(&self) -> &[Complex64] {
        &self.values
    }

    /// Left eigenvectors `L` as columns.
    pub fn left(&self) -> &DMatrix<Complex64> {
        &self.left
    }

    /// Right eigenvectors `R` as columns.
    pub fn right(&self) -> &DMatrix<Complex64> {
        &self.right
    }

    /// The diagonal matrix `D = diag(w)`.
    pub fn diagonal(&self) -> DMatrix<Complex64> {
        DMatrix::from_diagonal(&nalgebra::DVector::from_column_slice(&self.values))
    }

    /// Normalization that was applied.
    pub fn norm(&self) -> Norm {
        self.norm
    }

    /// Fraction of the spectrum covered.
    pub fn coverage(&self) -> Coverage {
        self.coverage
    }

    /// Splits into `(R, D, L)`.
    pub fn into_parts(self) -> (DMatrix<Complex64>, DMatrix<Complex64>, DMatrix<Complex64>) {
        let d = self.diagonal();
        (self.right, d, self.left)
    }

    pub(crate) fn map_values(mut self, f: impl Fn(Complex64) -> Complex64) -> Self {
        self.values.iter_mut().for_each(|z| *z = f(*z));
        self
    }
}
