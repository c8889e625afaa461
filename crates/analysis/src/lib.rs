//! Assessment, spectral decomposition and expected counts for Markov chains.
//!
//! Every operation accepts an [`msmkit_matrix::Matrix`] in dense or sparse
//! storage and dispatches to the matching backend:
//!
//! | Concern | Operations |
//! |---------|------------|
//! | Assessment | [`is_transition_matrix`], [`is_rate_matrix`], [`is_ergodic`], [`is_reversible`] |
//! | Spectrum | [`stationary_distribution`], [`eigenvalues`], [`eigenvectors`], [`rdl_decomposition`], [`timescales`] |
//! | Expectations | [`expected_counts`], [`expected_counts_stationary`] |
//!
//! Dense matrices get the full spectrum. Sparse matrices get the eigenpairs
//! of largest modulus from an Arnoldi iteration; results report how much of
//! the spectrum they cover through [`Coverage`].
//!
//! # Quick start
//!
//! ```rust
//! use msmkit_analysis::{DEFAULT_TOL, is_transition_matrix, stationary_distribution};
//! use msmkit_matrix::Matrix;
//!
//! let t = Matrix::from_rows(&[vec![0.9, 0.1], vec![0.2, 0.8]]).unwrap();
//! assert!(is_transition_matrix(&t, DEFAULT_TOL).unwrap());
//!
//! let mu = stationary_distribution(&t).unwrap();
//! assert!((mu[0] - 2.0 / 3.0).abs() < 1e-12);
//! ```

pub mod api;
pub mod config;
pub mod dense;
pub mod error;
mod graph;
mod normalize;
pub mod sparse;
pub mod spectrum;

pub use api::{
    eigenvalues, eigenvectors, expected_counts, expected_counts_stationary, is_ergodic,
    is_rate_matrix, is_reversible, is_transition_matrix, rdl_decomposition,
    stationary_distribution, storage_kind, timescales,
};
pub use config::{
    DEFAULT_SPARSE_K, DEFAULT_TOL, DecompositionConfig, GENERATOR_DETECTION_TOL, Norm,
    PRECONDITION_TOL, REVERSIBLE_NORM_TOL, ReversibilityConfig, Side, UNIT_EIGENVALUE_TOL,
};
pub use error::AnalysisError;
pub use spectrum::{Coverage, EigenvectorSet, RdlDecomposition, Spectrum};
