//! Tolerances and configuration for Markov chain analysis.

use std::fmt;
use std::str::FromStr;

use nalgebra::DVector;

use crate::error::AnalysisError;

/// Default tolerance of the assessment predicates.
pub const DEFAULT_TOL: f64 = 1e-15;

/// Tolerance for the transition-matrix check guarding operations that
/// require a stochastic input.
pub const PRECONDITION_TOL: f64 = 1e-12;

/// Distance from 1 within which an eigenvalue counts as the unit eigenvalue.
pub const UNIT_EIGENVALUE_TOL: f64 = 1e-10;

/// Detailed-balance tolerance required by [`Norm::Reversible`].
pub const REVERSIBLE_NORM_TOL: f64 = 1e-10;

/// Tolerance used to recognise a rate matrix (generator).
pub const GENERATOR_DETECTION_TOL: f64 = 1e-10;

/// Number of eigenpairs the sparse backend computes when none is requested.
pub const DEFAULT_SPARSE_K: usize = 6;

/// Normalization applied by `rdl_decomposition`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Norm {
    /// `Lᵀ R = I` with the first left eigenvector summing to one.
    #[default]
    Standard,
    /// `L = diag(mu) R` with `Lᵀ R = I`; requires detailed balance.
    Reversible,
}

impl Norm {
    /// Lowercase name used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Reversible => "reversible",
        }
    }
}

impl fmt::Display for Norm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Norm {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "reversible" => Ok(Self::Reversible),
            other => Err(AnalysisError::InvalidParameter {
                name: "norm",
                reason: format!("expected \"standard\" or \"reversible\", got {other:?}"),
            }),
        }
    }
}

/// Which eigenvectors to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    /// `T r = λ r`.
    #[default]
    Right,
    /// `lᵀ T = λ lᵀ`.
    Left,
}

/// Configuration for `rdl_decomposition`.
///
/// # Example
///
/// ```
/// use msmkit_analysis::{DecompositionConfig, Norm};
///
/// let config = DecompositionConfig::new().with_k(3).with_norm(Norm::Reversible);
/// assert_eq!(config.k(), Some(3));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DecompositionConfig {
    k: Option<usize>,
    norm: Norm,
}

impl DecompositionConfig {
    /// Creates a configuration for the full (or default-size) decomposition
    /// with [`Norm::Standard`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits the decomposition to the first `k` eigentriples.
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = Some(k);
        self
    }

    /// Sets the normalization.
    pub fn with_norm(mut self, norm: Norm) -> Self {
        self.norm = norm;
        self
    }

    /// Requested number of eigentriples.
    pub fn k(&self) -> Option<usize> {
        self.k
    }

    /// Requested normalization.
    pub fn norm(&self) -> Norm {
        self.norm
    }
}

/// Configuration for `is_reversible`.
///
/// Without an explicit `mu` the stationary distribution is computed, which
/// requires a transition matrix.
#[derive(Debug, Clone)]
pub struct ReversibilityConfig {
    mu: Option<DVector<f64>>,
    tol: f64,
}

impl ReversibilityConfig {
    /// Creates a configuration with `tol = DEFAULT_TOL` and no `mu`.
    pub fn new() -> Self {
        Self {
            mu: None,
            tol: DEFAULT_TOL,
        }
    }

    /// Uses `mu` as the reference distribution.
    pub fn with_mu(mut self, mu: DVector<f64>) -> Self {
        self.mu = Some(mu);
        self
    }

    /// Sets the detailed-balance tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// The reference distribution, if supplied.
    pub fn mu(&self) -> Option<&DVector<f64>> {
        self.mu.as_ref()
    }

    /// Detailed-balance tolerance.
    pub fn tol(&self) -> f64 {
        self.tol
    }

    /// Validates this configuration against a matrix of dimension `n`.
    pub fn validate(&self, n: usize) -> Result<(), AnalysisError> {
        validate_tol(self.tol)?;
        if let Some(mu) = &self.mu {
            validate_len("mu", n, mu.len())?;
        }
        Ok(())
    }
}

impl Default for ReversibilityConfig {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn validate_tol(tol: f64) -> Result<(), AnalysisError> {
    if !tol.is_finite() || tol < 0.0 {
        return Err(AnalysisError::InvalidParameter {
            name: "tol",
            reason: format!("must be finite and non-negative, got {tol}"),
        });
    }
    Ok(())
}

pub(crate) fn validate_k(k: Option<usize>, n: usize) -> Result<(), AnalysisError> {
    match k {
        Some(0) => Err(AnalysisError::InvalidParameter {
            name: "k",
            reason: "must be at least 1".to_string(),
        }),
        Some(k) if k > n => Err(AnalysisError::InvalidParameter {
            name: "k",
            reason: format!("{k} exceeds the matrix dimension {n}"),
        }),
        _ => Ok(()),
    }
}

pub(crate) fn validate_len(
    what: &'static str,
    expected: usize,
    got: usize,
) -> Result<(), AnalysisError> {
    if expected != got {
        return Err(AnalysisError::DimensionMismatch {
            what,
            expected,
            got,
        });
    }
    Ok(())
}
