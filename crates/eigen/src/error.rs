//! Error types for the msmkit-eigen crate.

/// Error type for all fallible eigensolver calls.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EigenError {
    /// Returned when an iterative kernel exhausts its iteration budget.
    #[error("{method} did not converge within {iterations} iterations")]
    NoConvergence {
        /// Name of the kernel (`schur`, `svd`, `arnoldi`).
        method: &'static str,
        /// Iteration budget that was exhausted.
        iterations: usize,
    },

    /// Returned when the requested decomposition is malformed.
    #[error("invalid eigensolver request: {reason}")]
    InvalidRequest {
        /// Description of the problem.
        reason: String,
    },
}
