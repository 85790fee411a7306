//! Error types for Q15 kernel operations

use thiserror::Error;

use crate::Backend;

/// Result type for Q15 kernel operations
pub type Result<T> = std::result::Result<T, Q15Error>;

/// Errors that can occur during Q15 kernel operations
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Q15Error {
    /// Backend not supported on this platform
    #[error("Backend not supported on this platform: {0:?}")]
    UnsupportedBackend(Backend),

    /// Size mismatch between operands
    #[error("Size mismatch: expected {expected}, got {actual}")]
    SizeMismatch {
        /// Expected size
        expected: usize,
        /// Actual size
        actual: usize,
    },

    /// Element count is negative or exceeds the supplied buffers
    #[error("Invalid length: n = {n}, buffers hold {available} elements")]
    InvalidLength {
        /// Requested element count
        n: i64,
        /// Shortest buffer length available to the call
        available: usize,
    },

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Sample buffer could not be allocated
    #[error("Allocation failed: could not reserve {elements} samples")]
    AllocationFailed {
        /// Requested element count
        elements: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_backend_error() {
        let err = Q15Error::UnsupportedBackend(Backend::AVX512);
        assert_eq!(
            err.to_string(),
            "Backend not supported on this platform: AVX512"
        );
    }

    #[test]
    fn test_size_mismatch_error() {
        let err = Q15Error::SizeMismatch {
            expected: 10,
            actual: 5,
        };
        assert_eq!(err.to_string(), "Size mismatch: expected 10, got 5");
    }

    #[test]
    fn test_invalid_length_error() {
        let err = Q15Error::InvalidLength {
            n: -1,
            available: 4096,
        };
        assert_eq!(
            err.to_string(),
            "Invalid length: n = -1, buffers hold 4096 elements"
        );
    }

    #[test]
    fn test_invalid_input_error() {
        let err = Q15Error::InvalidInput("alpha out of range".to_string());
        assert_eq!(err.to_string(), "Invalid input: alpha out of range");
    }

    #[test]
    fn test_allocation_failed_error() {
        let err = Q15Error::AllocationFailed { elements: 4096 };
        assert_eq!(
            err.to_string(),
            "Allocation failed: could not reserve 4096 samples"
        );
    }

    #[test]
    fn test_error_equality() {
        let err1 = Q15Error::SizeMismatch {
            expected: 10,
            actual: 5,
        };
        let err2 = Q15Error::SizeMismatch {
            expected: 10,
            actual: 5,
        };
        assert_eq!(err1, err2);
    }
}
