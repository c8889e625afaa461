use msmkit_eigen::{ArnoldiConfig, dense, largest_magnitude};
use nalgebra::DMatrix;
use num_complex::Complex64;
use sprs::{CsMat, TriMat};

/// Nonuniform birth-death chain with a simple spectrum.
fn chain(n: usize) -> TriMat<f64> {
    let mut tri = TriMat::new((n, n));
    for i in 0..n {
        let up = if i + 1 < n { 0.1 + 0.4 * ((i * 7 % n) as f64 / n as f64) } else { 0.0 };
        let down = if i > 0 { 0.3 } else { 0.0 };
        if i + 1 < n {
            tri.add_triplet(i, i + 1, up);
        }
        if i > 0 {
            tri.add_triplet(i, i - 1, down);
        }
        tri.add_triplet(i, i, 1.0 - up - down);
    }
    tri
}

fn to_dense(tri: &TriMat<f64>) -> DMatrix<f64> {
    let (rows, cols) = tri.shape();
    let mut a = DMatrix::zeros(rows, cols);
    for (&v, (i, j)) in tri.triplet_iter() {
        a[(i, j)] += v;
    }
    a
}

#[test]
fn sparse_leading_values_match_dense_spectrum() {
    let tri = chain(30);
    let sparse: CsMat<f64> = tri.to_csr();
    let full = dense::eigenvalues(&to_dense(&tri)).unwrap();

    let pairs = largest_magnitude(&sparse, &ArnoldiConfig::new(4)).unwrap();
    assert_eq!(pairs.len(), 4);
    for i in 0..4 {
        let diff = (pairs.values()[i] - full[i]).norm();
        assert!(diff < 1e-8, "eigenvalue {i}: {} vs {}", pairs.values()[i], full[i]);
    }
}

#[test]
fn sparse_vectors_satisfy_eigen_equation() {
    let tri = chain(30);
    let sparse: CsMat<f64> = tri.to_csr();
    let a = to_dense(&tri).map(|x| Complex64::new(x, 0.0));

    let pairs = largest_magnitude(&sparse, &ArnoldiConfig::new(2)).unwrap();
    for i in 0..2 {
        let v = pairs.vectors().column(i).into_owned();
        let residual = (&a * &v - &v * pairs.values()[i]).norm();
        assert!(residual < 1e-8, "residual {i}: {residual}");
        assert!((v.norm() - 1.0).abs() < 1e-12);
    }
}

#[test]
fn unit_eigenvalue_comes_first() {
    let sparse: CsMat<f64> = chain(20).to_csr();
    let pairs = largest_magnitude(&sparse, &ArnoldiConfig::new(1)).unwrap();
    assert!((pairs.values()[0] - Complex64::new(1.0, 0.0)).norm() < 1e-10);
}
