//! Two-sample power curves over sample size, dimension or rotation angle.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{power_2samp, PowerConfig, TwoSampleParams};
use crate::error::{PowerError, Result};
use crate::stats::TestBuilder;

/// Parameter swept along a curve, with the values to visit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "parameter", content = "values")]
pub enum Sweep {
    SampleSize(Vec<usize>),
    Dimension(Vec<usize>),
    Angle(Vec<f64>),
}

impl Sweep {
    pub fn name(&self) -> &'static str {
        match self {
            Sweep::SampleSize(_) => "n",
            Sweep::Dimension(_) => "p",
            Sweep::Angle(_) => "angle",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Sweep::SampleSize(v) | Sweep::Dimension(v) => v.len(),
            Sweep::Angle(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parameters and swept value of point `i`.
    fn point(&self, base: &TwoSampleParams, i: usize) -> (TwoSampleParams, f64) {
        let mut params = base.clone();
        let value = match self {
            Sweep::SampleSize(v) => {
                params.n = v[i];
                v[i] as f64
            }
            Sweep::Dimension(v) => {
                params.p = v[i];
                v[i] as f64
            }
            Sweep::Angle(v) => {
                params.angle = v[i];
                v[i]
            }
        };
        (params, value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub value: f64,
    pub power: f64,
}

/// Two-sample power at every value of `sweep`, other parameters taken
/// from `params`. Every point is run with the same `config`, seed
/// included.
pub fn power_2samp_curve(
    test: &dyn TestBuilder,
    params: &TwoSampleParams,
    sweep: &Sweep,
    config: &PowerConfig,
) -> Result<Vec<CurvePoint>> {
    if sweep.is_empty() {
        return Err(PowerError::InvalidParameter {
            name: "sweep",
            reason: format!("no values given for {}", sweep.name()),
        });
    }
    info!("Power curve over {} ({} points)", sweep.name(), sweep.len());

    (0..sweep.len())
        .map(|i| {
            let (point_params, value) = sweep.point(params, i);
            let power = power_2samp(test, &point_params, config)?;
            info!("{} = {}: power {:.4}", sweep.name(), value, power);
            Ok(CurvePoint { value, power })
        })
        .collect()
}
