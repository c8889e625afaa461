//! Canonical eigenvalue ordering.
//!
//! Eigenvalues are sorted by decreasing modulus. Moduli are compared on a
//! grid of [`MAGNITUDE_RESOLUTION`] so that round-off cannot separate values
//! of equal modulus (1 and -1, conjugate pairs); ties are broken by
//! decreasing real part, then decreasing imaginary part. Rounding first
//! keeps the comparator a total order.

use std::cmp::Ordering;

use num_complex::Complex64;

/// Moduli closer than this compare as equal.
pub const MAGNITUDE_RESOLUTION: f64 = 1e-10;

fn key(z: Complex64) -> (f64, f64, f64) {
    let magnitude = (z.norm() / MAGNITUDE_RESOLUTION).round();
    (magnitude, z.re, z.im)
}

/// Compares two eigenvalues; `Less` means `a` comes first.
pub fn compare(a: Complex64, b: Complex64) -> Ordering {
    let (ma, ra, ia) = key(a);
    let (mb, rb, ib) = key(b);
    mb.total_cmp(&ma)
        .then_with(|| rb.total_cmp(&ra))
        .then_with(|| ib.total_cmp(&ia))
}

/// Returns the permutation that sorts `values` into canonical order.
pub fn magnitude_order(values: &[Complex64]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..values.len()).collect();
    idx.sort_by(|&a, &b| compare(values[a], values[b]));
    idx
}
