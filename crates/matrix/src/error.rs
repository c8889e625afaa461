//! Error types for the msmkit-matrix crate.

/// Error type for all fallible matrix constructions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatrixError {
    /// Returned when the input is not square.
    #[error("matrix must be square, got {rows}x{cols}")]
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// Returned when an entry is NaN or infinite.
    #[error("entry ({row}, {col}) is not finite: {value}")]
    NonFinite {
        /// Row index of the offending entry.
        row: usize,
        /// Column index of the offending entry.
        col: usize,
        /// The offending value.
        value: f64,
    },

    /// Returned when a row of a row-list has the wrong length.
    #[error("row {row} has {got} entries, expected {expected}")]
    RaggedRows {
        /// Zero-based row index.
        row: usize,
        /// Expected row length.
        expected: usize,
        /// Actual row length.
        got: usize,
    },

    /// Returned when a triplet addresses a position outside the matrix.
    #[error("entry ({row}, {col}) is out of bounds for a {n}x{n} matrix")]
    IndexOutOfBounds {
        /// Row index of the triplet.
        row: usize,
        /// Column index of the triplet.
        col: usize,
        /// Matrix dimension.
        n: usize,
    },

    /// Returned when a storage name is neither `dense` nor `sparse`.
    #[error("unsupported matrix storage: {kind:?} (expected \"dense\" or \"sparse\")")]
    UnsupportedStorage {
        /// The unrecognized storage name.
        kind: String,
    },
}
