//! Public entry points. Each operation validates its arguments, then routes
//! to the dense or sparse backend by storage.
//!
//! Spectral operations on a rate matrix run on its uniformized chain
//! `P = I + K / c` and map eigenvalues back with `λ = c (μ - 1)`; the
//! eigenvectors of `P` and `K` coincide.

use std::borrow::Cow;

use nalgebra::DVector;
use num_complex::Complex64;
use tracing::{debug, warn};

use msmkit_matrix::{Matrix, Storage, StorageKind};

use crate::config::{
    DecompositionConfig, GENERATOR_DETECTION_TOL, Norm, PRECONDITION_TOL, REVERSIBLE_NORM_TOL,
    ReversibilityConfig, Side, UNIT_EIGENVALUE_TOL, validate_k, validate_len, validate_tol,
};
use crate::error::AnalysisError;
use crate::spectrum::{EigenvectorSet, RdlDecomposition, Spectrum};
use crate::{dense, sparse};

/// Parses a storage name (`dense` or `sparse`).
///
/// # Errors
///
/// Returns [`AnalysisError::UnsupportedMatrixType`] for any other name.
pub fn storage_kind(name: &str) -> Result<StorageKind, AnalysisError> {
    Ok(name.parse::<StorageKind>()?)
}

/// Returns `true` if `t` is row-stochastic within `tol`.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidParameter`] for a negative or non-finite `tol`.
pub fn is_transition_matrix(t: &Matrix, tol: f64) -> Result<bool, AnalysisError> {
    validate_tol(tol)?;
    Ok(match t.storage() {
        Storage::Dense(m) => dense::assessment::is_transition_matrix(m, tol),
        Storage::Sparse(m) => sparse::assessment::is_transition_matrix(m, tol),
    })
}

/// Returns `true` if `k` is a valid rate matrix (generator) within `tol`.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidParameter`] for a negative or non-finite `tol`.
pub fn is_rate_matrix(k: &Matrix, tol: f64) -> Result<bool, AnalysisError> {
    validate_tol(tol)?;
    Ok(match k.storage() {
        Storage::Dense(m) => dense::assessment::is_rate_matrix(m, tol),
        Storage::Sparse(m) => sparse::assessment::is_rate_matrix(m, tol),
    })
}

/// Returns `true` if the transition graph of `t` (edges where `|T_ij| > tol`)
/// is strongly connected and aperiodic.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidParameter`] for a negative or non-finite `tol`.
pub fn is_ergodic(t: &Matrix, tol: f64) -> Result<bool, AnalysisError> {
    validate_tol(tol)?;
    Ok(match t.storage() {
        Storage::Dense(m) => dense::assessment::is_ergodic(m, tol),
        Storage::Sparse(m) => sparse::assessment::is_ergodic(m, tol),
    })
}

/// Returns `true` if `t` satisfies detailed balance.
///
/// Without a configured `mu` the stationary distribution is computed first.
///
/// # Errors
///
/// - [`AnalysisError::DimensionMismatch`] if the configured `mu` has the wrong length.
/// - [`AnalysisError::Precondition`] if `mu` must be derived and `t` is not a
///   transition matrix.
#[tracing::instrument(skip_all, fields(n = t.dim(), storage = %t.kind()))]
pub fn is_reversible(t: &Matrix, config: &ReversibilityConfig) -> Result<bool, AnalysisError> {
    config.validate(t.dim())?;
    let mu = match config.mu() {
        Some(mu) => Cow::Borrowed(mu),
        None => {
            require_transition_matrix(t)?;
            Cow::Owned(stationary_distribution(t)?)
        }
    };
    Ok(reversible_under(t, &mu, config.tol()))
}

/// Stationary distribution `mu` with `mu T = mu` and `sum(mu) = 1`.
///
/// # Errors
///
/// Returns [`AnalysisError::Convergence`] if eigenvalue 1 is missing or not
/// simple, and [`AnalysisError::Precondition`] for an empty matrix.
#[tracing::instrument(skip_all, fields(n = t.dim(), storage = %t.kind()))]
pub fn stationary_distribution(t: &Matrix) -> Result<DVector<f64>, AnalysisError> {
    require_nonempty(t)?;
    let (chain, _) = as_chain(t)?;
    match chain.storage() {
        Storage::Dense(m) => dense::decomposition::stationary_distribution(m),
        Storage::Sparse(m) => sparse::decomposition::stationary_distribution(m),
    }
}

/// Eigenvalues in decreasing order of modulus.
///
/// Dense input yields all `n` values (or the first `k`). Sparse input yields
/// the `k` values of largest modulus, six by default.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidParameter`] for `k = 0` or `k > n`, and
/// [`AnalysisError::Convergence`] if the eigensolver fails.
#[tracing::instrument(skip_all, fields(n = t.dim(), storage = %t.kind(), k = ?k))]
pub fn eigenvalues(t: &Matrix, k: Option<usize>) -> Result<Spectrum, AnalysisError> {
    validate_k(k, t.dim())?;
    let (chain, rate) = as_chain(t)?;
    let spectrum = match chain.storage() {
        Storage::Dense(m) => dense::decomposition::eigenvalues(m, k)?,
        Storage::Sparse(m) => sparse::decomposition::eigenvalues(m, k)?,
    };
    Ok(match rate {
        Some(c) => spectrum.map_values(|mu| generator_value(mu, c)),
        None => spectrum,
    })
}

/// Unit-norm eigenvectors, ordered like [`eigenvalues`].
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidParameter`] for `k = 0` or `k > n`, and
/// [`AnalysisError::Convergence`] if the eigensolver fails.
#[tracing::instrument(skip_all, fields(n = t.dim(), storage = %t.kind(), k = ?k, side = ?side))]
pub fn eigenvectors(t: &Matrix, k: Option<usize>, side: Side) -> Result<EigenvectorSet, AnalysisError> {
    validate_k(k, t.dim())?;
    let (chain, rate) = as_chain(t)?;
    let set = match chain.storage() {
        Storage::Dense(m) => dense::decomposition::eigenvectors(m, k, side)?,
        Storage::Sparse(m) => sparse::decomposition::eigenvectors(m, k, side)?,
    };
    Ok(match rate {
        Some(c) => set.map_values(|mu| generator_value(mu, c)),
        None => set,
    })
}

/// Eigenvalues with normalized left and right eigenvectors.
///
/// # Errors
///
/// - [`AnalysisError::InvalidParameter`] for `k = 0` or `k > n`.
/// - [`AnalysisError::Precondition`] if [`Norm::Reversible`] is requested for
///   a matrix that violates detailed balance.
/// - [`AnalysisError::Convergence`] if the eigensolver fails or the
///   eigenvectors cannot be normalized.
#[tracing::instrument(skip_all, fields(n = t.dim(), storage = %t.kind(), k = ?config.k(), norm = %config.norm()))]
pub fn rdl_decomposition(
    t: &Matrix,
    config: &DecompositionConfig,
) -> Result<RdlDecomposition, AnalysisError> {
    let k = config.k();
    validate_k(k, t.dim())?;
    let (chain, rate) = as_chain(t)?;
    let rdl = match config.norm() {
        Norm::Standard => match chain.storage() {
            Storage::Dense(m) => dense::decomposition::rdl_standard(m, k)?,
            Storage::Sparse(m) => sparse::decomposition::rdl_standard(m, k)?,
        },
        Norm::Reversible => {
            let mu = stationary_distribution(&chain)?;
            if !reversible_under(&chain, &mu, REVERSIBLE_NORM_TOL) {
                return Err(AnalysisError::Precondition {
                    reason: format!(
                        "reversible normalization requires detailed balance within {REVERSIBLE_NORM_TOL:e}"
                    ),
                });
            }
            match chain.storage() {
                Storage::Dense(m) => dense::decomposition::rdl_reversible(m, k, &mu)?,
                Storage::Sparse(m) => sparse::decomposition::rdl_reversible(m, k, &mu)?,
            }
        }
    };
    Ok(match rate {
        Some(c) => rdl.map_values(|mu| generator_value(mu, c)),
        None => rdl,
    })
}

/// Implied timescales of the leading eigenvalues.
///
/// For a transition matrix at lag `tau`, `t_i = -tau / ln|λ_i|`; eigenvalues
/// of modulus one give `+∞` and zero eigenvalues give 0. For a rate matrix
/// `t_i = -1 / Re λ_i`, with `+∞` for the stationary eigenvalue.
///
/// # Errors
///
/// Returns [`AnalysisError::InvalidParameter`] unless `tau` is finite and
/// positive, plus every error of [`eigenvalues`].
#[tracing::instrument(skip_all, fields(n = t.dim(), storage = %t.kind(), tau = tau, k = ?k))]
pub fn timescales(t: &Matrix, tau: f64, k: Option<usize>) -> Result<Vec<f64>, AnalysisError> {
    if !tau.is_finite() || tau <= 0.0 {
        return Err(AnalysisError::InvalidParameter {
            name: "tau",
            reason: format!("must be finite and positive, got {tau}"),
        });
    }
    let spectrum = eigenvalues(t, k)?;
    if spectrum.values().iter().any(|z| z.im.abs() > UNIT_EIGENVALUE_TOL) {
        warn!("complex eigenvalues present; timescales use their modulus");
    }
    let generator = is_generator(t);
    let scales = spectrum
        .values()
        .iter()
        .map(|&z| {
            if generator {
                rate_timescale(z)
            } else {
                lag_timescale(z, tau)
            }
        })
        .collect();
    Ok(scales)
}

/// Expected transition counts over `n_steps` steps starting from `p0`.
///
/// The result has the storage of `t`. `n_steps = 0` gives the zero matrix.
///
/// # Errors
///
/// Returns [`AnalysisError::DimensionMismatch`] if `p0` has the wrong length.
#[tracing::instrument(skip_all, fields(n = t.dim(), storage = %t.kind(), n_steps = n_steps))]
pub fn expected_counts(
    p0: &DVector<f64>,
    t: &Matrix,
    n_steps: usize,
) -> Result<Matrix, AnalysisError> {
    validate_len("p0", t.dim(), p0.len())?;
    let counts = match t.storage() {
        Storage::Dense(m) => Matrix::dense(dense::expectations::expected_counts(p0, m, n_steps))?,
        Storage::Sparse(m) => Matrix::sparse(sparse::expectations::expected_counts(p0, m, n_steps))?,
    };
    Ok(counts)
}

/// Expected transition counts `N diag(mu) T` of the stationary chain.
///
/// # Errors
///
/// - [`AnalysisError::Precondition`] if `t` is not a transition matrix.
/// - [`AnalysisError::DimensionMismatch`] if `mu` has the wrong length.
#[tracing::instrument(skip_all, fields(n = t.dim(), storage = %t.kind(), n_steps = n_steps))]
pub fn expected_counts_stationary(
    t: &Matrix,
    n_steps: usize,
    mu: Option<&DVector<f64>>,
) -> Result<Matrix, AnalysisError> {
    require_transition_matrix(t)?;
    let mu = match mu {
        Some(mu) => {
            validate_len("mu", t.dim(), mu.len())?;
            Cow::Borrowed(mu)
        }
        None => Cow::Owned(stationary_distribution(t)?),
    };
    let counts = match t.storage() {
        Storage::Dense(m) => {
            Matrix::dense(dense::expectations::expected_counts_stationary(m, n_steps, &mu))?
        }
        Storage::Sparse(m) => {
            Matrix::sparse(sparse::expectations::expected_counts_stationary(m, n_steps, &mu))?
        }
    };
    Ok(counts)
}

fn reversible_under(t: &Matrix, mu: &DVector<f64>, tol: f64) -> bool {
    match t.storage() {
        Storage::Dense(m) => dense::assessment::is_reversible(m, mu, tol),
        Storage::Sparse(m) => sparse::assessment::is_reversible(m, mu, tol),
    }
}

fn require_nonempty(t: &Matrix) -> Result<(), AnalysisError> {
    if t.dim() == 0 {
        return Err(AnalysisError::Precondition {
            reason: "matrix is empty".to_string(),
        });
    }
    Ok(())
}

fn require_transition_matrix(t: &Matrix) -> Result<(), AnalysisError> {
    require_nonempty(t)?;
    if !is_transition_matrix(t, PRECONDITION_TOL)? {
        return Err(AnalysisError::Precondition {
            reason: format!("not a transition matrix within {PRECONDITION_TOL:e}"),
        });
    }
    Ok(())
}

fn is_generator(t: &Matrix) -> bool {
    t.dim() > 0 && is_rate_matrix(t, GENERATOR_DETECTION_TOL).unwrap_or(false)
}

/// The matrix itself, or the uniformized chain of a generator with its rate.
fn as_chain(t: &Matrix) -> Result<(Cow<'_, Matrix>, Option<f64>), AnalysisError> {
    if !is_generator(t) {
        return Ok((Cow::Borrowed(t), None));
    }
    let (chain, c) = match t.storage() {
        Storage::Dense(k) => {
            let (p, c) = dense::decomposition::uniformize(k);
            (Matrix::dense(p)?, c)
        }
        Storage::Sparse(k) => {
            let (p, c) = sparse::decomposition::uniformize(k);
            (Matrix::sparse(p)?, c)
        }
    };
    debug!(rate = c, "rate matrix uniformized");
    Ok((Cow::Owned(chain), Some(c)))
}

fn generator_value(mu: Complex64, c: f64) -> Complex64 {
    (mu - 1.0) * c
}

fn lag_timescale(z: Complex64, tau: f64) -> f64 {
    let modulus = z.norm();
    if modulus == 0.0 {
        0.0
    } else if modulus >= 1.0 - UNIT_EIGENVALUE_TOL {
        f64::INFINITY
    } else {
        -tau / modulus.ln()
    }
}

fn rate_timescale(z: Complex64) -> f64 {
    if z.re.abs() <= UNIT_EIGENVALUE_TOL {
        f64::INFINITY
    } else {
        -1.0 / z.re
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lag_timescale_edges() {
        assert_eq!(lag_timescale(Complex64::new(0.0, 0.0), 1.0), 0.0);
        assert!(lag_timescale(Complex64::new(1.0, 0.0), 1.0).is_infinite());
        assert!(lag_timescale(Complex64::new(-1.0, 0.0), 1.0).is_infinite());
        let t = lag_timescale(Complex64::new(0.5, 0.0), 2.0);
        assert!((t - 2.0 / 2.0_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn rate_timescale_edges() {
        assert!(rate_timescale(Complex64::new(0.0, 0.0)).is_infinite());
        assert!((rate_timescale(Complex64::new(-3.0, 0.0)) - 1.0 / 3.0).abs() < 1e-15);
    }

    #[test]
    fn generator_value_maps_unit_to_zero() {
        assert_eq!(generator_value(Complex64::new(1.0, 0.0), 4.0), Complex64::new(0.0, 0.0));
        assert_eq!(generator_value(Complex64::new(0.25, 0.0), 4.0), Complex64::new(-3.0, 0.0));
    }

    #[test]
    fn storage_kind_parsing() {
        assert_eq!(storage_kind("dense").unwrap(), StorageKind::Dense);
        assert!(matches!(
            storage_kind("coo"),
            Err(AnalysisError::UnsupportedMatrixType { .. })
        ));
    }

    #[test]
    fn transition_matrix_is_not_a_generator() {
        let t = Matrix::from_rows(&[vec![0.9, 0.1], vec![0.2, 0.8]]).unwrap();
        assert!(!is_generator(&t));
        let k = Matrix::from_rows(&[vec![-1.0, 1.0], vec![2.0, -2.0]]).unwrap();
        assert!(is_generator(&k));
    }
}
