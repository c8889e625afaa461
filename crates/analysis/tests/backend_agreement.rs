//! Dense and sparse storage of the same matrix must give the same answers.

use approx::assert_abs_diff_eq;
use msmkit_analysis::{
    AnalysisError, Coverage, DEFAULT_TOL, DecompositionConfig, Norm, ReversibilityConfig,
    eigenvalues, expected_counts, is_ergodic, is_reversible, is_transition_matrix,
    rdl_decomposition, stationary_distribution,
};
use msmkit_matrix::Matrix;
use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;

/// Reversible birth-death chain with distinct rates per state.
fn birth_death(n: usize) -> Vec<(usize, usize, f64)> {
    let mut entries = Vec::new();
    for i in 0..n {
        let up = if i + 1 < n { 0.15 + 0.3 * ((i * 5 % n) as f64 / n as f64) } else { 0.0 };
        let down = if i > 0 { 0.25 } else { 0.0 };
        if i + 1 < n {
            entries.push((i, i + 1, up));
        }
        if i > 0 {
            entries.push((i, i - 1, down));
        }
        entries.push((i, i, 1.0 - up - down));
    }
    entries
}

/// `T = 0.5 I + 0.5 1 piᵀ`: eigenvalue 1 once and 0.5 with multiplicity `n - 1`.
/// Reversible with respect to `pi`.
fn lazy_resampling(pi: &[f64]) -> Vec<(usize, usize, f64)> {
    let n = pi.len();
    let mut entries = Vec::with_capacity(n * n);
    for i in 0..n {
        for (j, &p) in pi.iter().enumerate() {
            let diagonal = if i == j { 0.5 } else { 0.0 };
            entries.push((i, j, diagonal + 0.5 * p));
        }
    }
    entries
}

fn ramp(n: usize) -> Vec<f64> {
    let total = (n * (n + 1) / 2) as f64;
    (1..=n).map(|i| i as f64 / total).collect()
}

fn max_identity_error(l: &DMatrix<Complex64>, r: &DMatrix<Complex64>) -> f64 {
    let k = r.ncols();
    (l.transpose() * r - DMatrix::<Complex64>::identity(k, k))
        .iter()
        .fold(0.0, |acc, z| acc.max(z.norm()))
}

fn pair(n: usize, entries: &[(usize, usize, f64)]) -> (Matrix, Matrix) {
    let sparse = Matrix::from_triplets(n, entries).unwrap();
    let dense = sparse.to_dense();
    (dense, sparse)
}

#[test]
fn literal_three_state_matrix() {
    let rows = vec![
        vec![0.5, 0.5, 0.0],
        vec![0.3, 0.4, 0.3],
        vec![0.0, 0.3, 0.7],
    ];
    let dense = Matrix::from_rows(&rows).unwrap();
    let sparse = dense.to_sparse();

    assert_eq!(
        is_transition_matrix(&dense, DEFAULT_TOL).unwrap(),
        is_transition_matrix(&sparse, DEFAULT_TOL).unwrap()
    );
    let config = ReversibilityConfig::new().with_tol(1e-12);
    assert!(is_reversible(&dense, &config).unwrap());
    assert!(is_reversible(&sparse, &config).unwrap());

    let mu_dense = stationary_distribution(&dense).unwrap();
    let mu_sparse = stationary_distribution(&sparse).unwrap();
    let expected = [3.0 / 13.0, 5.0 / 13.0, 5.0 / 13.0];
    for i in 0..3 {
        assert_abs_diff_eq!(mu_dense[i], expected[i], epsilon = 1e-12);
        assert_abs_diff_eq!(mu_sparse[i], mu_dense[i], epsilon = 1e-10);
    }
}

#[test]
fn large_chain_leading_spectrum() {
    let n = 40;
    let (dense, sparse) = pair(n, &birth_death(n));
    assert!(is_ergodic(&dense, DEFAULT_TOL).unwrap());
    assert!(is_ergodic(&sparse, DEFAULT_TOL).unwrap());

    let full = eigenvalues(&dense, None).unwrap();
    assert_eq!(full.len(), n);
    assert_eq!(full.coverage(), Coverage::Complete);

    let partial = eigenvalues(&sparse, None).unwrap();
    assert_eq!(
        partial.coverage(),
        Coverage::Partial {
            computed: 6,
            dimension: n
        }
    );
    for i in 0..6 {
        assert!(
            (partial.values()[i] - full.values()[i]).norm() < 1e-8,
            "eigenvalue {i}: {} vs {}",
            partial.values()[i],
            full.values()[i]
        );
    }
}

#[test]
fn large_chain_stationary_distribution() {
    let n = 40;
    let (dense, sparse) = pair(n, &birth_death(n));
    let mu_dense = stationary_distribution(&dense).unwrap();
    let mu_sparse = stationary_distribution(&sparse).unwrap();
    assert_abs_diff_eq!(mu_sparse.sum(), 1.0, epsilon = 1e-12);
    for i in 0..n {
        assert_abs_diff_eq!(mu_sparse[i], mu_dense[i], epsilon = 1e-8);
    }
}

#[test]
fn partial_rdl_satisfies_eigen_equations() {
    let n = 30;
    let entries = birth_death(n);
    let (dense, sparse) = pair(n, &entries);
    let t = dense.to_dense_matrix().map(|x| Complex64::new(x, 0.0));

    let rdl = rdl_decomposition(&sparse, &DecompositionConfig::new().with_k(3)).unwrap();
    let (r, d, l) = rdl.into_parts();
    assert!((&t * &r - &r * &d).norm() < 1e-7);
    assert!((l.transpose() * &t - &d * l.transpose()).norm() < 1e-7);
    let gram = l.transpose() * &r;
    assert!((gram - DMatrix::<Complex64>::identity(3, 3)).norm() < 1e-7);
}

#[test]
fn expected_counts_agree() {
    let n = 12;
    let (dense, sparse) = pair(n, &birth_death(n));
    let mut p0 = DVector::zeros(n);
    p0[0] = 1.0;
    let a = expected_counts(&p0, &dense, 50).unwrap().to_dense_matrix();
    let b = expected_counts(&p0, &sparse, 50).unwrap().to_dense_matrix();
    for (x, y) in a.iter().zip(b.iter()) {
        assert_abs_diff_eq!(*x, *y, epsilon = 1e-12);
    }
}

#[test]
fn disjoint_blocks_have_no_unique_stationary_distribution() {
    let block = 20;
    let mut entries = birth_death(block);
    entries.extend(
        birth_death(block)
            .into_iter()
            .map(|(i, j, v)| (i + block, j + block, v)),
    );
    let (dense, sparse) = pair(2 * block, &entries);
    assert!(is_transition_matrix(&sparse, 1e-12).unwrap());
    assert!(!is_ergodic(&sparse, DEFAULT_TOL).unwrap());

    for t in [&dense, &sparse] {
        let result = stationary_distribution(t);
        assert!(
            matches!(result, Err(AnalysisError::Convergence { .. })),
            "{}: {result:?}",
            t.kind()
        );
    }
}

#[test]
fn repeated_eigenvalue_standard_rdl_is_biorthonormal() {
    let pi = [0.2, 0.3, 0.5];
    let (dense, sparse) = pair(3, &lazy_resampling(&pi));
    for t in [&dense, &sparse] {
        let rdl = rdl_decomposition(t, &DecompositionConfig::new()).unwrap();
        assert_abs_diff_eq!(rdl.values()[0].re, 1.0, epsilon = 1e-10);
        assert_abs_diff_eq!(rdl.values()[1].re, 0.5, epsilon = 1e-10);
        assert_abs_diff_eq!(rdl.values()[2].re, 0.5, epsilon = 1e-10);
        let error = max_identity_error(rdl.left(), rdl.right());
        assert!(error < 1e-10, "{}: max|LᵀR - I| = {error:e}", t.kind());
        for i in 0..3 {
            assert_abs_diff_eq!(rdl.left()[(i, 0)].re, pi[i], epsilon = 1e-10);
        }
    }
}

#[test]
fn repeated_eigenvalue_reversible_rdl_is_biorthonormal() {
    let pi = [0.2, 0.3, 0.5];
    let (dense, sparse) = pair(3, &lazy_resampling(&pi));
    let config = DecompositionConfig::new().with_norm(Norm::Reversible);
    for t in [&dense, &sparse] {
        let rdl = rdl_decomposition(t, &config).unwrap();
        let error = max_identity_error(rdl.left(), rdl.right());
        assert!(error < 1e-10, "{}: max|LᵀR - I| = {error:e}", t.kind());
    }
}

#[test]
fn repeated_eigenvalue_beyond_krylov_dimension() {
    let n = 30;
    let pi = ramp(n);
    let (dense, sparse) = pair(n, &lazy_resampling(&pi));
    let t = dense.to_dense_matrix().map(|x| Complex64::new(x, 0.0));

    let mu = stationary_distribution(&sparse).unwrap();
    for i in 0..n {
        assert_abs_diff_eq!(mu[i], pi[i], epsilon = 1e-10);
    }

    let k = 4;
    let full = eigenvalues(&dense, Some(k)).unwrap();
    let rdl = rdl_decomposition(&sparse, &DecompositionConfig::new().with_k(k)).unwrap();
    for i in 0..k {
        assert!((rdl.values()[i] - full.values()[i]).norm() < 1e-10);
    }
    let error = max_identity_error(rdl.left(), rdl.right());
    assert!(error < 1e-8, "max|LᵀR - I| = {error:e}");

    let (r, d, l) = rdl.into_parts();
    assert!((&t * &r - &r * &d).norm() < 1e-8 * r.norm());
    assert!((l.transpose() * &t - &d * l.transpose()).norm() < 1e-8 * l.norm());
}
