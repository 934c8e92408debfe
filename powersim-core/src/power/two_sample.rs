//! Two-sample power under a rotated independence simulator.

use powersim_sims::{IndepSim, NoisySim};

use super::{simulate_power, PowerAggregation, PowerConfig, PowerEstimate};
use crate::error::Result;
use crate::permutation::Topology;
use crate::sampler::TwoSampleGenerator;
use crate::stats::TestBuilder;

#[derive(Debug, Clone)]
pub struct TwoSampleParams {
    pub sim: IndepSim,
    /// Observations per sample.
    pub n: usize,
    /// Dimension of `x`.
    pub p: usize,
    pub noise: bool,
    /// Rotation of the second sample, in degrees.
    pub angle: f64,
}

impl Default for TwoSampleParams {
    fn default() -> Self {
        Self {
            sim: IndepSim::Noisy(NoisySim::Linear),
            n: 100,
            p: 1,
            noise: true,
            angle: powersim_sims::rotation::DEFAULT_ANGLE,
        }
    }
}

impl TwoSampleParams {
    pub(crate) fn generator(&self) -> TwoSampleGenerator {
        TwoSampleGenerator {
            sim: self.sim,
            n: self.n,
            p: self.p,
            noise: self.noise,
            angle: self.angle,
        }
    }
}

/// Empirical power of `test` for two rotated samples.
pub fn power_2samp(
    test: &dyn TestBuilder,
    params: &TwoSampleParams,
    config: &PowerConfig,
) -> Result<f64> {
    Ok(power_2samp_estimate(test, params, config)?.power)
}

/// As `power_2samp`, returning the full estimate. Defaults to
/// `PowerAggregation::Smoothed`.
pub fn power_2samp_estimate(
    test: &dyn TestBuilder,
    params: &TwoSampleParams,
    config: &PowerConfig,
) -> Result<PowerEstimate> {
    simulate_power(
        &params.generator(),
        test,
        &config.test_options,
        Topology::Standard,
        config,
        PowerAggregation::Smoothed,
    )
}
