//! Errors raised by matrix operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinalgError {
    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    #[error("Matrix must be square, got {nrows}x{ncols}")]
    NotSquare { nrows: usize, ncols: usize },

    #[error("Invalid permutation: index {index} repeated or out of range for length {len}")]
    InvalidPermutation { index: usize, len: usize },

    #[error("Cannot stack an empty list of matrices")]
    Empty,
}
