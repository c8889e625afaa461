//! Explicitly restarted Arnoldi iteration for the eigenvalues of largest
//! modulus.
//!
//! Each cycle builds an `ncv`-step Arnoldi factorization
//! `A V = V H + β v e_mᵀ`, solves the small Hessenberg problem densely and
//! accepts the leading `nev` Ritz pairs once every residual
//! `β |e_mᵀ y|` is below `tol · max(|θ|, ε^(2/3))`. Otherwise the start
//! vector is filtered with the polynomial whose roots are the unwanted Ritz
//! values (exact shifts) and the next cycle begins. When `ncv` equals the
//! dimension the factorization spans the whole space and the Ritz pairs are
//! exact.
//!
//! The start vector is drawn from a seeded [`StdRng`], so results are
//! reproducible.

use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::dense;
use crate::error::EigenError;
use crate::operator::LinearOperator;
use crate::pairs::{EigenPairs, normalize_phase};

/// Relative size below which a new Krylov direction counts as a breakdown.
const BREAKDOWN_TOL: f64 = 1e-12;

/// Configuration for [`largest_magnitude`].
///
/// # Example
///
/// ```
/// use msmkit_eigen::ArnoldiConfig;
///
/// let config = ArnoldiConfig::new(4).with_ncv(30).with_tol(1e-10);
/// assert_eq!(config.subspace_dim(100), 30);
/// ```
#[derive(Debug, Clone)]
pub struct ArnoldiConfig {
    nev: usize,
    ncv: Option<usize>,
    tol: f64,
    max_restarts: usize,
    seed: u64,
}

impl ArnoldiConfig {
    /// Requests `nev` eigenpairs.
    ///
    /// Defaults: `ncv = max(2·nev + 1, 20)`, `tol = 1e-12`,
    /// `max_restarts = 500`, fixed seed.
    pub fn new(nev: usize) -> Self {
        Self {
            nev,
            ncv: None,
            tol: 1e-12,
            max_restarts: 500,
            seed: 0x6d73_6d6b_6974,
        }
    }

    /// Sets the Krylov subspace dimension.
    pub fn with_ncv(mut self, ncv: usize) -> Self {
        self.ncv = Some(ncv);
        self
    }

    /// Sets the relative residual tolerance.
    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = tol;
        self
    }

    /// Sets the maximum number of restarts.
    pub fn with_max_restarts(mut self, max_restarts: usize) -> Self {
        self.max_restarts = max_restarts;
        self
    }

    /// Sets the seed of the start-vector generator.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Number of requested eigenpairs.
    pub fn nev(&self) -> usize {
        self.nev
    }

    /// Krylov subspace dimension used for an operator of dimension `n`.
    pub fn subspace_dim(&self, n: usize) -> usize {
        self.ncv
            .unwrap_or((2 * self.nev + 1).max(20))
            .max(self.nev)
            .min(n)
    }

    /// Validates this configuration against an operator dimension.
    pub fn validate(&self, n: usize) -> Result<(), EigenError> {
        if self.nev == 0 {
            return Err(EigenError::InvalidRequest {
                reason: "nev must be at least 1".to_string(),
            });
        }
        if self.nev > n {
            return Err(EigenError::InvalidRequest {
                reason: format!("nev = {} exceeds the operator dimension {n}", self.nev),
            });
        }
        if !self.tol.is_finite() || self.tol <= 0.0 {
            return Err(EigenError::InvalidRequest {
                reason: format!("tol must be finite and positive, got {}", self.tol),
            });
        }
        Ok(())
    }
}

/// An `m`-step Arnoldi factorization.
struct Factorization {
    /// Orthonormal basis, `n x (m + 1)`; the last column is zero when `β = 0`.
    basis: DMatrix<f64>,
    /// Upper Hessenberg matrix, `(m + 1) x m`.
    hessenberg: DMatrix<f64>,
}

impl Factorization {
    fn beta(&self) -> f64 {
        let m = self.hessenberg.ncols();
        self.hessenberg[(m, m - 1)]
    }
}

/// Computes the `nev` eigenpairs of largest modulus.
///
/// Eigenvectors are unit-norm with the phase convention of
/// [`normalize_phase`].
///
/// # Errors
///
/// Returns [`EigenError::InvalidRequest`] for a malformed configuration and
/// [`EigenError::NoConvergence`] when the restart budget is exhausted.
pub fn largest_magnitude<Op>(op: &Op, config: &ArnoldiConfig) -> Result<EigenPairs, EigenError>
where
    Op: LinearOperator + ?Sized,
{
    let n = op.dim();
    config.validate(n)?;
    let nev = config.nev;
    let m = config.subspace_dim(n);
    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut start = random_unit(n, &mut rng);

    for restart in 0..=config.max_restarts {
        let fact = factorize(op, &start, m, &mut rng);
        let h = fact.hessenberg.rows(0, m).into_owned();
        let ritz = dense::eig(&h)?;
        let beta = fact.beta().abs();

        let exact = m == n;
        let converged = exact
            || (0..nev).all(|i| {
                let theta = ritz.values()[i];
                let residual = beta * ritz.vectors()[(m - 1, i)].norm();
                residual <= config.tol * theta.norm().max(f64::EPSILON.powf(2.0 / 3.0))
            });

        if converged {
            let basis = fact.basis.columns(0, m).map(|x| Complex64::new(x, 0.0));
            let wanted = ritz.vectors().columns(0, nev).into_owned();
            let mut vectors = &basis * &wanted;
            for j in 0..nev {
                let mut v = vectors.column(j).into_owned();
                normalize_phase(&mut v);
                vectors.set_column(j, &v);
            }
            debug!(restarts = restart, nev, ncv = m, n, "arnoldi converged");
            let values = ritz.values()[..nev].to_vec();
            return Ok(EigenPairs::new(values, vectors));
        }

        trace!(restart, beta, "arnoldi restart");
        let first = fact.basis.column(0).into_owned();
        start = match filter(op, first, &ritz.values()[nev..]) {
            Some(v) => v,
            None => random_unit(n, &mut rng),
        };
    }

    Err(EigenError::NoConvergence {
        method: "arnoldi",
        iterations: config.max_restarts,
    })
}

/// Runs `m` Arnoldi steps from the unit vector `start`.
///
/// Uses classical Gram-Schmidt with one reorthogonalization pass. On
/// breakdown (an invariant subspace) the recurrence continues from a fresh
/// random direction with a zero subdiagonal entry.
fn factorize<Op>(op: &Op, start: &DVector<f64>, m: usize, rng: &mut StdRng) -> Factorization
where
    Op: LinearOperator + ?Sized,
{
    let n = op.dim();
    let mut basis = DMatrix::<f64>::zeros(n, m + 1);
    let mut hessenberg = DMatrix::<f64>::zeros(m + 1, m);
    basis.set_column(0, start);
    let mut x = vec![0.0; n];
    let mut y = vec![0.0; n];

    for j in 0..m {
        x.copy_from_slice(basis.column(j).as_slice());
        op.apply(&x, &mut y);
        let mut w = DVector::from_column_slice(&y);
        let scale = w.norm();

        for _ in 0..2 {
            for i in 0..=j {
                let c = basis.column(i).dot(&w);
                hessenberg[(i, j)] += c;
                w.axpy(-c, &basis.column(i), 1.0);
            }
        }

        let beta = w.norm();
        if beta <= BREAKDOWN_TOL * scale.max(1.0) {
            hessenberg[(j + 1, j)] = 0.0;
            if j + 1 < m {
                let fresh = fresh_direction(&basis, j + 1, rng);
                basis.set_column(j + 1, &fresh);
            }
        } else {
            hessenberg[(j + 1, j)] = beta;
            basis.set_column(j + 1, &(w / beta));
        }
    }

    Factorization { basis, hessenberg }
}

/// Applies `Π (A - θ I)` over the unwanted Ritz values `shifts` to `v`.
///
/// Conjugate pairs are applied as the real quadratic
/// `A² - 2 Re θ A + |θ|² I`; the member with negative imaginary part is
/// skipped. Returns `None` if the filtered vector vanishes.
fn filter<Op>(op: &Op, mut v: DVector<f64>, shifts: &[Complex64]) -> Option<DVector<f64>>
where
    Op: LinearOperator + ?Sized,
{
    let n = v.len();
    let mut av = vec![0.0; n];
    let mut aav = vec![0.0; n];
    for theta in shifts {
        let scale = theta.norm().max(1.0);
        if theta.im.abs() <= 1e-12 * scale {
            op.apply(v.as_slice(), &mut av);
            for (x, &y) in v.iter_mut().zip(av.iter()) {
                *x = y - theta.re * *x;
            }
        } else if theta.im > 0.0 {
            op.apply(v.as_slice(), &mut av);
            op.apply(&av, &mut aav);
            let (two_re, norm_sqr) = (2.0 * theta.re, theta.norm_sqr());
            for ((x, &y), &z) in v.iter_mut().zip(av.iter()).zip(aav.iter()) {
                *x = z - two_re * y + norm_sqr * *x;
            }
        } else {
            continue;
        }
        let norm = v.norm();
        if norm <= f64::EPSILON || !norm.is_finite() {
            return None;
        }
        v /= norm;
    }
    Some(v)
}

/// A random unit vector orthogonal to the first `k` basis columns.
fn fresh_direction(basis: &DMatrix<f64>, k: usize, rng: &mut StdRng) -> DVector<f64> {
    let n = basis.nrows();
    loop {
        let mut v = random_unit(n, rng);
        for _ in 0..2 {
            for i in 0..k {
                let c = basis.column(i).dot(&v);
                v.axpy(-c, &basis.column(i), 1.0);
            }
        }
        let norm = v.norm();
        if norm > BREAKDOWN_TOL {
            return v / norm;
        }
    }
}

fn random_unit(n: usize, rng: &mut StdRng) -> DVector<f64> {
    let v = DVector::<f64>::from_fn(n, |_, _| rng.random_range(-1.0..1.0));
    let norm = v.norm();
    if norm > 0.0 { v / norm } else { v }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn birth_death(n: usize) -> DMatrix<f64> {
        let mut a = DMatrix::zeros(n, n);
        for i in 0..n {
            let up = if i + 1 < n { 0.2 + 0.3 * (i as f64 / n as f64) } else { 0.0 };
            let down = if i > 0 { 0.25 } else { 0.0 };
            if i + 1 < n {
                a[(i, i + 1)] = up;
            }
            if i > 0 {
                a[(i, i - 1)] = down;
            }
            a[(i, i)] = 1.0 - up - down;
        }
        a
    }

    #[test]
    fn config_defaults() {
        let config = ArnoldiConfig::new(3);
        assert_eq!(config.nev(), 3);
        assert_eq!(config.subspace_dim(100), 20);
        assert_eq!(config.subspace_dim(5), 5);
        assert_eq!(ArnoldiConfig::new(15).subspace_dim(100), 31);
    }

    #[test]
    fn config_validation() {
        assert!(ArnoldiConfig::new(0).validate(5).is_err());
        assert!(ArnoldiConfig::new(6).validate(5).is_err());
        assert!(ArnoldiConfig::new(2).with_tol(0.0).validate(5).is_err());
        assert!(ArnoldiConfig::new(2).with_tol(f64::NAN).validate(5).is_err());
        assert!(ArnoldiConfig::new(5).validate(5).is_ok());
    }

    #[test]
    fn exact_on_small_operator() {
        let a = DMatrix::from_row_slice(3, 3, &[0.5, 0.5, 0.0, 0.3, 0.4, 0.3, 0.0, 0.3, 0.7]);
        let pairs = largest_magnitude(&a, &ArnoldiConfig::new(3)).unwrap();
        let expected = dense::eigenvalues(&a).unwrap();
        for (got, want) in pairs.values().iter().zip(expected.iter()) {
            assert!((got - want).norm() < 1e-12, "{got} vs {want}");
        }
    }

    #[test]
    fn diagonal_operator_breakdown_recovers_all_values() {
        let a = DMatrix::from_diagonal(&DVector::from_vec(vec![3.0, -2.0, 1.0, 0.5]));
        let pairs = largest_magnitude(&a, &ArnoldiConfig::new(4)).unwrap();
        let got: Vec<f64> = pairs.values().iter().map(|z| z.re).collect();
        let expected = [3.0, -2.0, 1.0, 0.5];
        for (g, e) in got.iter().zip(expected.iter()) {
            assert!((g - e).abs() < 1e-10, "{got:?}");
        }
    }

    #[test]
    fn restarted_run_matches_dense() {
        let a = birth_death(25);
        let config = ArnoldiConfig::new(3).with_ncv(15);
        let pairs = largest_magnitude(&a, &config).unwrap();
        let expected = dense::eigenvalues(&a).unwrap();
        for i in 0..3 {
            assert!(
                (pairs.values()[i] - expected[i]).norm() < 1e-8,
                "eigenvalue {i}: {} vs {}",
                pairs.values()[i],
                expected[i]
            );
            let v = pairs.vectors().column(i).into_owned();
            let ac = a.map(|x| Complex64::new(x, 0.0));
            let residual = (&ac * &v - &v * pairs.values()[i]).norm();
            assert!(residual < 1e-8, "residual {i}: {residual}");
        }
    }

    #[test]
    fn deterministic_for_fixed_seed() {
        let a = birth_death(30);
        let config = ArnoldiConfig::new(2);
        let first = largest_magnitude(&a, &config).unwrap();
        let second = largest_magnitude(&a, &config).unwrap();
        assert_eq!(first.values(), second.values());
    }
}
