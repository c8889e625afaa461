//! Property checks on dense matrices.

use nalgebra::{DMatrix, DVector};

use crate::graph::TransitionGraph;

/// Rows sum to one within `tol` and no entry is below `-tol`.
pub fn is_transition_matrix(t: &DMatrix<f64>, tol: f64) -> bool {
    t.row_iter().all(|row| {
        row.iter().all(|&v| v >= -tol) && (row.sum() - 1.0).abs() <= tol
    })
}

/// Off-diagonal entries are at least `-tol` and rows sum to zero within `tol`.
pub fn is_rate_matrix(k: &DMatrix<f64>, tol: f64) -> bool {
    k.row_iter().enumerate().all(|(i, row)| {
        let off_diagonal_ok = row
            .iter()
            .enumerate()
            .all(|(j, &v)| i == j || v >= -tol);
        off_diagonal_ok && row.sum().abs() <= tol
    })
}

/// Strongly connected and aperiodic transition graph.
pub fn is_ergodic(t: &DMatrix<f64>, tol: f64) -> bool {
    let n = t.nrows();
    let edges = (0..n)
        .flat_map(|i| (0..n).map(move |j| (i, j)))
        .filter(|&(i, j)| t[(i, j)].abs() > tol);
    TransitionGraph::from_edges(n, edges).is_ergodic()
}

/// Detailed balance `mu_i T_ij = mu_j T_ji` for every pair within `tol`.
///
/// `mu` must have length `n`.
pub fn is_reversible(t: &DMatrix<f64>, mu: &DVector<f64>, tol: f64) -> bool {
    let n = t.nrows();
    (0..n).all(|i| {
        (i + 1..n).all(|j| (mu[i] * t[(i, j)] - mu[j] * t[(j, i)]).abs() <= tol)
    })
}
