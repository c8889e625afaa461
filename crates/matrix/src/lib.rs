//! Square matrix storage for Markov chain analysis.
//!
//! A [`Matrix`] holds a transition or rate matrix in exactly one of two
//! representations:
//!
//! | Storage | Type | Access pattern |
//! |---------|------|----------------|
//! | [`Storage::Dense`] | `nalgebra::DMatrix<f64>` | random access, full factorizations |
//! | [`Storage::Sparse`] | `sprs::CsMat<f64>` (CSR) | row iteration, matrix-vector products |
//!
//! Construction validates squareness and finiteness once, so analysis code
//! never has to re-check shapes.
//!
//! ```rust
//! use msmkit_matrix::{Matrix, Storage};
//!
//! let t = Matrix::from_triplets(2, &[(0, 0, 0.9), (0, 1, 0.1), (1, 0, 0.2), (1, 1, 0.8)])
//!     .unwrap();
//! assert!(matches!(t.storage(), Storage::Sparse(_)));
//! ```

pub mod error;
pub mod matrix;
pub mod storage;

pub use error::MatrixError;
pub use matrix::{Matrix, Storage, transpose_csr};
pub use storage::StorageKind;
