//! Property checks on CSR matrices. Implicit zeros count as non-negative.

use nalgebra::DVector;
use sprs::CsMat;

use crate::graph::TransitionGraph;

/// Rows sum to one within `tol` and no stored entry is below `-tol`.
pub fn is_transition_matrix(t: &CsMat<f64>, tol: f64) -> bool {
    t.outer_iterator().all(|row| {
        let mut sum = 0.0;
        for (_, &v) in row.iter() {
            if v < -tol {
                return false;
            }
            sum += v;
        }
        (sum - 1.0).abs() <= tol
    })
}

/// Off-diagonal entries are at least `-tol` and rows sum to zero within `tol`.
pub fn is_rate_matrix(k: &CsMat<f64>, tol: f64) -> bool {
    k.outer_iterator().enumerate().all(|(i, row)| {
        let mut sum = 0.0;
        for (j, &v) in row.iter() {
            if i != j && v < -tol {
                return false;
            }
            sum += v;
        }
        sum.abs() <= tol
    })
}

/// Strongly connected and aperiodic transition graph.
pub fn is_ergodic(t: &CsMat<f64>, tol: f64) -> bool {
    transition_graph(t, tol).is_ergodic()
}

/// Graph with an edge `i -> j` for every stored entry with `|T[i,j]| > tol`.
pub(crate) fn transition_graph(t: &CsMat<f64>, tol: f64) -> TransitionGraph {
    let edges = t.outer_iterator().enumerate().flat_map(|(i, row)| {
        row.iter()
            .filter(|&(_, &v)| v.abs() > tol)
            .map(move |(j, _)| (i, j))
            .collect::<Vec<_>>()
    });
    TransitionGraph::from_edges(t.rows(), edges)
}

/// Detailed balance over the stored entries; the mirror entry of each
/// stored `(i, j)` is looked up, implicit zeros included.
pub fn is_reversible(t: &CsMat<f64>, mu: &DVector<f64>, tol: f64) -> bool {
    t.outer_iterator().enumerate().all(|(i, row)| {
        row.iter().all(|(j, &v)| {
            let back = t.get(j, i).copied().unwrap_or(0.0);
            (mu[i] * v - mu[j] * back).abs() <= tol
        })
    })
}
