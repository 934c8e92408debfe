//! Four-sample two-way power over Gaussian effect sizes and mixture weight.
//!
//! In multiway mode the test is built on precomputed distances and the
//! null permutes the label distance matrix; otherwise the four groups go
//! through the ordinary k-sample transform.

use powersim_sims::Gaussian4Samp2Way;

use super::{simulate_power, PowerAggregation, PowerConfig, PowerEstimate};
use crate::error::Result;
use crate::permutation::{PermutationStructure, Topology};
use crate::stats::{TestBuilder, TestOptions};

#[derive(Debug, Clone)]
pub struct FourSampleParams {
    /// Observations per group.
    pub n: usize,
    pub epsilon1: f64,
    pub epsilon2: f64,
    /// Groups whose mean shift is applied; `None` applies all.
    pub effect_mask: Option<[bool; 4]>,
    pub weight: f64,
    /// Effect pattern, 1 through 3.
    pub case: u8,
    pub d: usize,
    pub multiway: bool,
    pub structure: PermutationStructure,
    pub sim_options: FourSampleOptions,
}

/// Extra simulator settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FourSampleOptions {
    pub sd: f64,
}

impl Default for FourSampleOptions {
    fn default() -> Self {
        Self { sd: 1.0 }
    }
}

impl Default for FourSampleParams {
    fn default() -> Self {
        let sim = Gaussian4Samp2Way::default();
        Self {
            n: sim.n,
            epsilon1: sim.epsilon1,
            epsilon2: sim.epsilon2,
            effect_mask: sim.effect_mask,
            weight: sim.weight,
            case: sim.case,
            d: sim.d,
            multiway: false,
            structure: PermutationStructure::Global,
            sim_options: FourSampleOptions { sd: sim.sd },
        }
    }
}

impl FourSampleParams {
    pub(crate) fn generator(&self) -> Gaussian4Samp2Way {
        Gaussian4Samp2Way {
            n: self.n,
            epsilon1: self.epsilon1,
            epsilon2: self.epsilon2,
            effect_mask: self.effect_mask,
            weight: self.weight,
            case: self.case,
            d: self.d,
            sd: self.sim_options.sd,
        }
    }
}

pub fn power_4samp_2way_epsweight(
    test: &dyn TestBuilder,
    params: &FourSampleParams,
    config: &PowerConfig,
) -> Result<f64> {
    Ok(power_4samp_2way_epsweight_estimate(test, params, config)?.power)
}

/// Defaults to `PowerAggregation::FlooredRaw`.
pub fn power_4samp_2way_epsweight_estimate(
    test: &dyn TestBuilder,
    params: &FourSampleParams,
    config: &PowerConfig,
) -> Result<PowerEstimate> {
    params.structure.ensure_supported()?;

    let (topology, options) = if params.multiway {
        (
            Topology::four_way(),
            TestOptions {
                compute_distance: false,
            },
        )
    } else {
        (Topology::Standard, config.test_options)
    };

    simulate_power(
        &params.generator(),
        test,
        &options,
        topology,
        config,
        PowerAggregation::FlooredRaw,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PowerError;
    use crate::stats::TestKind;

    fn config() -> PowerConfig {
        PowerConfig {
            reps: 30,
            seed: Some(4),
            ..Default::default()
        }
    }

    #[test]
    fn test_standard_and_multiway() {
        let params = FourSampleParams {
            n: 10,
            epsilon1: 1.0,
            epsilon2: 1.0,
            ..Default::default()
        };
        let standard = power_4samp_2way_epsweight_estimate(&TestKind::Dcorr, &params, &config())
            .unwrap();
        let multiway = power_4samp_2way_epsweight_estimate(
            &TestKind::Dcorr,
            &FourSampleParams {
                multiway: true,
                ..params
            },
            &config(),
        )
        .unwrap();
        for est in [&standard, &multiway] {
            assert_eq!(est.aggregation, PowerAggregation::FlooredRaw);
            assert!(est.power >= 1.0 / 30.0 && est.power <= 1.0);
        }
        assert_ne!(standard.alt_dist, multiway.alt_dist);
    }

    #[test]
    fn test_multiway_needs_distance_capable_test() {
        let params = FourSampleParams {
            n: 10,
            multiway: true,
            ..Default::default()
        };
        let err = power_4samp_2way_epsweight(&TestKind::MeanDifference, &params, &config())
            .unwrap_err();
        assert!(matches!(err, PowerError::InvalidParameter { .. }));
    }

    #[test]
    fn test_multilevel_rejected_before_running() {
        let params = FourSampleParams {
            structure: PermutationStructure::Multilevel,
            ..Default::default()
        };
        let err = power_4samp_2way_epsweight(&TestKind::Dcorr, &params, &config()).unwrap_err();
        assert!(matches!(err, PowerError::UnsupportedStructure(_)));
    }
}
