//! Error types for the msmkit-analysis crate.

use msmkit_eigen::EigenError;
use msmkit_matrix::MatrixError;

/// Error type for all fallible operations in the msmkit-analysis crate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    /// Returned when a matrix storage name is not recognized.
    #[error("unsupported matrix type: {kind:?}")]
    UnsupportedMatrixType {
        /// The rejected storage name.
        kind: String,
    },

    /// Returned when the input does not satisfy a mathematical precondition.
    #[error("precondition violated: {reason}")]
    Precondition {
        /// Description of the violated precondition.
        reason: String,
    },

    /// Returned when an eigensolver fails or the spectrum is degenerate.
    #[error("convergence failure: {reason}")]
    Convergence {
        /// Description of the failure.
        reason: String,
    },

    /// Returned when a vector argument has the wrong length.
    #[error("dimension mismatch for {what}: expected {expected}, got {got}")]
    DimensionMismatch {
        /// Name of the offending argument.
        what: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// Returned when a scalar parameter is out of range.
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Description of the problem.
        reason: String,
    },

    /// Returned when a matrix cannot be constructed.
    #[error("invalid matrix: {0}")]
    Matrix(MatrixError),
}

impl From<MatrixError> for AnalysisError {
    fn from(e: MatrixError) -> Self {
        match e {
            MatrixError::UnsupportedStorage { kind } => Self::UnsupportedMatrixType { kind },
            other => Self::Matrix(other),
        }
    }
}

impl From<EigenError> for AnalysisError {
    fn from(e: EigenError) -> Self {
        match e {
            EigenError::NoConvergence { .. } => Self::Convergence {
                reason: e.to_string(),
            },
            EigenError::InvalidRequest { reason } => Self::InvalidParameter { name: "k", reason },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_unsupported_matrix_type() {
        let e = AnalysisError::UnsupportedMatrixType {
            kind: "coo".to_string(),
        };
        assert_eq!(e.to_string(), "unsupported matrix type: \"coo\"");
    }

    #[test]
    fn error_precondition() {
        let e = AnalysisError::Precondition {
            reason: "not a transition matrix".to_string(),
        };
        assert_eq!(e.to_string(), "precondition violated: not a transition matrix");
    }

    #[test]
    fn error_dimension_mismatch() {
        let e = AnalysisError::DimensionMismatch {
            what: "p0",
            expected: 3,
            got: 2,
        };
        assert_eq!(e.to_string(), "dimension mismatch for p0: expected 3, got 2");
    }

    #[test]
    fn error_invalid_parameter() {
        let e = AnalysisError::InvalidParameter {
            name: "tau",
            reason: "must be positive".to_string(),
        };
        assert_eq!(e.to_string(), "invalid parameter tau: must be positive");
    }

    #[test]
    fn unsupported_storage_maps_to_matrix_type() {
        let e: AnalysisError = MatrixError::UnsupportedStorage {
            kind: "coo".to_string(),
        }
        .into();
        assert!(matches!(e, AnalysisError::UnsupportedMatrixType { kind } if kind == "coo"));
    }

    #[test]
    fn no_convergence_maps_to_convergence() {
        let e: AnalysisError = EigenError::NoConvergence {
            method: "arnoldi",
            iterations: 10,
        }
        .into();
        assert_eq!(
            e.to_string(),
            "convergence failure: arnoldi did not converge within 10 iterations"
        );
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error + Send + Sync + 'static>() {}
        assert_impl::<AnalysisError>();
    }
}
