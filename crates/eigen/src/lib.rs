//! Eigensolvers for real non-symmetric matrices.
//!
//! Two kernels cover the two matrix storages used across msmkit:
//!
//! - [`dense`]: the full spectrum of a `DMatrix<f64>` via the real Schur form,
//!   with eigenvectors recovered from SVD null spaces.
//! - [`arnoldi`]: the few eigenpairs of largest modulus of any
//!   [`LinearOperator`], typically a `sprs::CsMat<f64>`.
//!
//! Both return [`EigenPairs`] in the canonical order defined by [`order`]:
//! decreasing modulus, then decreasing real part, then decreasing imaginary
//! part.
//!
//! ```rust
//! use msmkit_eigen::dense;
//! use nalgebra::DMatrix;
//!
//! let t = DMatrix::from_row_slice(2, 2, &[0.9, 0.1, 0.2, 0.8]);
//! let values = dense::eigenvalues(&t).unwrap();
//! assert!((values[0].re - 1.0).abs() < 1e-12);
//! assert!((values[1].re - 0.7).abs() < 1e-12);
//! ```

pub mod arnoldi;
pub mod dense;
pub mod error;
pub mod operator;
pub mod order;
pub mod pairs;

pub use arnoldi::{ArnoldiConfig, largest_magnitude};
pub use error::EigenError;
pub use operator::LinearOperator;
pub use order::{compare, magnitude_order};
pub use pairs::{EigenPairs, normalize_phase};
