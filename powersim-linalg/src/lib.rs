//! powersim-linalg: Linear algebra wrappers for powersim
//!
//! Provides the dense matrix type shared by the simulators and the
//! power engine, and the pairwise distance transforms used by the
//! multiway permutation path.

pub mod dense;
pub mod distance;
pub mod error;

pub use dense::DenseMatrix;
pub use distance::{pairwise_distances, Metric};
pub use error::LinalgError;
