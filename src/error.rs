//! Error types for the ksketch library.
//!
//! All fallible operations return [`KSketchError`] through the crate-wide
//! [`Result`] alias. Errors are programming or configuration mistakes surfaced
//! immediately; nothing here is transient or retryable.
//!
//! # Examples
//!
//! ```
//! use ksketch::error::{KSketchError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(KSketchError::configuration("projection_bits must be > 0"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for ksketch operations.
#[derive(Error, Debug)]
pub enum KSketchError {
    /// A vector's dimension differs from the index dimension.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A fold id outside `[0, num_folds)`.
    #[error("Fold index {fold} out of range for {num_folds} folds")]
    FoldIndex { fold: usize, num_folds: usize },

    /// Fewer weights than points in a fold.
    #[error("Weight count mismatch for fold {fold}: expected at least {expected}, got {actual}")]
    WeightCountMismatch {
        fold: usize,
        expected: usize,
        actual: usize,
    },

    /// Invalid construction parameters or center sets.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// I/O errors while loading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for operations that may fail with KSketchError.
pub type Result<T> = std::result::Result<T, KSketchError>;

impl KSketchError {
    /// Create a new configuration error.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        KSketchError::Configuration(msg.into())
    }

    /// Create a new dimension mismatch error.
    pub fn dimension_mismatch(expected: usize, actual: usize) -> Self {
        KSketchError::DimensionMismatch { expected, actual }
    }

    /// Create a new fold index error.
    pub fn fold_index(fold: usize, num_folds: usize) -> Self {
        KSketchError::FoldIndex { fold, num_folds }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_construction() {
        let error = KSketchError::configuration("no folds");
        assert_eq!(error.to_string(), "Invalid configuration: no folds");

        let error = KSketchError::dimension_mismatch(3, 2);
        assert_eq!(error.to_string(), "Dimension mismatch: expected 3, got 2");

        let error = KSketchError::fold_index(4, 2);
        assert_eq!(error.to_string(), "Fold index 4 out of range for 2 folds");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error = KSketchError::from(io_error);

        match error {
            KSketchError::Io(_) => {} // Expected
            _ => panic!("Expected IO error variant"),
        }
    }
}
