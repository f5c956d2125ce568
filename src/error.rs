//! Error types for simdcorr operations.
//!
//! The raw entry points ([`crate::correlate()`] and friends) panic on malformed
//! buffers. The checked ones ([`crate::try_correlate`], [`crate::Correlation`])
//! report the same problems through [`CorrError`] instead.

use std::fmt;

/// Errors that can occur while setting up a correlation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrError {
    /// The matrix shape itself is unusable.
    DimensionError {
        /// Number of rows (`ny`) that was supplied.
        rows: usize,
        /// Number of columns (`nx`) that was supplied.
        cols: usize,
        /// Human-readable error message.
        message: String,
    },
    /// A buffer does not hold the number of elements its shape requires.
    BufferError {
        /// Number of elements required by the shape.
        expected: usize,
        /// Number of elements actually provided.
        actual: usize,
        /// Human-readable error message.
        message: String,
    },
}

impl fmt::Display for CorrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrError::DimensionError {
                rows,
                cols,
                message,
            } => write!(
                f,
                "Invalid matrix dimensions: {} (rows: {}, cols: {})",
                message, rows, cols
            ),
            CorrError::BufferError {
                expected,
                actual,
                message,
            } => write!(
                f,
                "Buffer size mismatch: {} (expected {} elements, got {})",
                message, expected, actual
            ),
        }
    }
}

impl std::error::Error for CorrError {}

impl From<ndarray::ShapeError> for CorrError {
    fn from(err: ndarray::ShapeError) -> Self {
        CorrError::DimensionError {
            rows: 0,
            cols: 0,
            message: err.to_string(),
        }
    }
}

/// Result type alias for simdcorr operations.
pub type Result<T> = std::result::Result<T, CorrError>;

/// Creates a dimension error.
pub fn dimension_error(rows: usize, cols: usize, message: impl Into<String>) -> CorrError {
    CorrError::DimensionError {
        rows,
        cols,
        message: message.into(),
    }
}

/// Creates a buffer error.
pub fn buffer_error(expected: usize, actual: usize, message: impl Into<String>) -> CorrError {
    CorrError::BufferError {
        expected,
        actual,
        message: message.into(),
    }
}
