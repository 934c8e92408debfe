//! Errors raised by the simulators.

use powersim_linalg::LinalgError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Unknown simulator: {0}")]
    UnknownSimulator(String),

    #[error("Invalid simulation case {case}: expected 1..={max}")]
    InvalidCase { case: u8, max: u8 },

    #[error("Invalid simulation parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    #[error(transparent)]
    Distribution(#[from] statrs::StatsError),

    #[error(transparent)]
    Linalg(#[from] LinalgError),
}

pub type Result<T> = std::result::Result<T, SimError>;

/// Reject `n == 0` and `p == 0` before allocating.
pub(crate) fn check_shape(n: usize, p: usize) -> Result<()> {
    if n == 0 {
        return Err(SimError::InvalidParameter {
            name: "n",
            reason: "sample size must be positive".into(),
        });
    }
    if p == 0 {
        return Err(SimError::InvalidParameter {
            name: "p",
            reason: "dimension must be positive".into(),
        });
    }
    Ok(())
}

pub(crate) fn check_weight(weight: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&weight) {
        return Err(SimError::InvalidParameter {
            name: "weight",
            reason: format!("must lie in [0, 1], got {}", weight),
        });
    }
    Ok(())
}
