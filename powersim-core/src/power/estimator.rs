//! Empirical power from alternate and null distributions.
//!
//! The null distribution is sorted ascending and the rejection cutoff is
//! its element at index `ceil(reps * (1 - alpha))`. Power is computed
//! from the number of alternate statistics at or above the cutoff.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::PowerEstimate;
use crate::error::{PowerError, Result};

/// How the exceedance count is turned into a power value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerAggregation {
    /// `(1 + count) / (1 + reps)`; never zero.
    Smoothed,
    /// `count / reps`, reported as `1 / reps` when no alternate rejects.
    FlooredRaw,
}

impl PowerAggregation {
    pub fn apply(self, count: usize, reps: usize) -> f64 {
        match self {
            PowerAggregation::Smoothed => (1 + count) as f64 / (1 + reps) as f64,
            PowerAggregation::FlooredRaw => {
                if count == 0 {
                    1.0 / reps as f64
                } else {
                    count as f64 / reps as f64
                }
            }
        }
    }
}

impl std::str::FromStr for PowerAggregation {
    type Err = PowerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "smoothed" => Ok(PowerAggregation::Smoothed),
            "floored_raw" | "floored" | "raw" => Ok(PowerAggregation::FlooredRaw),
            other => Err(PowerError::InvalidParameter {
                name: "aggregation",
                reason: format!("unknown aggregation {:?}", other),
            }),
        }
    }
}

/// Zero-based index of the cutoff in the sorted null distribution.
///
/// May equal `reps` when `reps` is very small; `estimate_power` clamps it.
pub fn cutoff_index(reps: usize, alpha: f64) -> usize {
    (reps as f64 * (1.0 - alpha)).ceil() as usize
}

pub(crate) fn check_alpha(alpha: f64) -> Result<()> {
    if !(alpha > 0.0 && alpha < 1.0) {
        return Err(PowerError::InvalidParameter {
            name: "alpha",
            reason: format!("must lie in (0, 1), got {}", alpha),
        });
    }
    Ok(())
}

/// Reduce the two distributions to a power estimate at level `alpha`.
pub fn estimate_power(
    alt_dist: Vec<f64>,
    null_dist: Vec<f64>,
    alpha: f64,
    aggregation: PowerAggregation,
) -> Result<PowerEstimate> {
    check_alpha(alpha)?;
    if alt_dist.len() != null_dist.len() {
        return Err(PowerError::LengthMismatch {
            alternate: alt_dist.len(),
            null: null_dist.len(),
        });
    }
    let reps = null_dist.len();
    if reps == 0 {
        return Err(PowerError::InvalidParameter {
            name: "reps",
            reason: "need at least one repetition".into(),
        });
    }

    let mut sorted = null_dist.clone();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let index = cutoff_index(reps, alpha).min(reps - 1);
    let cutoff = sorted[index];
    if sorted[0] == sorted[reps - 1] {
        warn!(
            "Null distribution is constant ({}); the power estimate is not informative",
            cutoff
        );
    }

    let count = alt_dist.iter().filter(|&&s| s >= cutoff).count();
    let power = aggregation.apply(count, reps);
    debug!(
        "Cutoff {:.6} at index {} of {}; {} alternates reject; power {:.4}",
        cutoff, index, reps, count, power
    );

    Ok(PowerEstimate {
        power,
        cutoff,
        cutoff_index: index,
        count,
        alpha,
        reps,
        aggregation,
        alt_dist,
        null_dist,
    })
}
