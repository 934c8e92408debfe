//! Three-sample power over Gaussian effect size and mixture weight.

use powersim_sims::Gaussian3Samp;

use super::{simulate_power, PowerAggregation, PowerConfig, PowerEstimate};
use crate::error::Result;
use crate::permutation::Topology;
use crate::stats::TestBuilder;

#[derive(Debug, Clone)]
pub struct ThreeSampleParams {
    pub n: usize,
    pub epsilon: f64,
    pub weight: f64,
    /// Effect pattern, 1 through 5.
    pub case: u8,
    pub d: usize,
    /// Standard deviation of every coordinate.
    pub sd: f64,
}

impl Default for ThreeSampleParams {
    fn default() -> Self {
        let sim = Gaussian3Samp::default();
        Self {
            n: sim.n,
            epsilon: sim.epsilon,
            weight: sim.weight,
            case: sim.case,
            d: sim.d,
            sd: sim.sd,
        }
    }
}

impl ThreeSampleParams {
    pub(crate) fn generator(&self) -> Gaussian3Samp {
        Gaussian3Samp {
            n: self.n,
            epsilon: self.epsilon,
            weight: self.weight,
            case: self.case,
            d: self.d,
            sd: self.sd,
        }
    }
}

pub fn power_3samp_epsweight(
    test: &dyn TestBuilder,
    params: &ThreeSampleParams,
    config: &PowerConfig,
) -> Result<f64> {
    Ok(power_3samp_epsweight_estimate(test, params, config)?.power)
}

/// Defaults to `PowerAggregation::FlooredRaw`.
pub fn power_3samp_epsweight_estimate(
    test: &dyn TestBuilder,
    params: &ThreeSampleParams,
    config: &PowerConfig,
) -> Result<PowerEstimate> {
    simulate_power(
        &params.generator(),
        test,
        &config.test_options,
        Topology::Standard,
        config,
        PowerAggregation::FlooredRaw,
    )
}
