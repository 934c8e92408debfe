//! Power estimation entry points.
//!
//! Each entry point builds a sample generator and a test from its
//! parameters, runs the permutation executor for `reps` repetitions and
//! reduces the resulting distributions with `estimate_power`.

pub mod curve;
pub mod estimator;
pub mod four_sample;
pub mod independence;
pub mod three_sample;
pub mod two_sample;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{PowerError, Result};
use crate::permutation::{run_permutations, PermutationTask, Topology, WorkerPool, Workers};
use crate::rng::RandomStreams;
use crate::sampler::SampleGenerator;
use crate::stats::{TestBuilder, TestOptions};

pub use curve::{power_2samp_curve, CurvePoint, Sweep};
pub use estimator::{cutoff_index, estimate_power, PowerAggregation};
pub use four_sample::{
    power_4samp_2way_epsweight, power_4samp_2way_epsweight_estimate, FourSampleOptions,
    FourSampleParams,
};
pub use independence::{
    power_indep, power_indep_dim, power_indep_estimate, power_indep_sample, IndependenceParams,
};
pub use three_sample::{power_3samp_epsweight, power_3samp_epsweight_estimate, ThreeSampleParams};
pub use two_sample::{power_2samp, power_2samp_estimate, TwoSampleParams};

/// Settings shared by every power estimate.
#[derive(Debug, Clone)]
pub struct PowerConfig {
    /// Significance level, in (0, 1).
    pub alpha: f64,
    /// Number of repetitions; also the length of both distributions.
    pub reps: usize,
    pub workers: Workers,
    /// Base seed. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Overrides the entry point's default aggregation.
    pub aggregation: Option<PowerAggregation>,
    /// Options the test is built with.
    pub test_options: TestOptions,
}

impl Default for PowerConfig {
    fn default() -> Self {
        Self {
            alpha: 0.05,
            reps: 1000,
            workers: Workers::default(),
            seed: None,
            aggregation: None,
            test_options: TestOptions::default(),
        }
    }
}

/// Result of one power estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerEstimate {
    pub power: f64,
    /// Rejection threshold taken from the sorted null distribution.
    pub cutoff: f64,
    pub cutoff_index: usize,
    /// Alternate statistics at or above the cutoff.
    pub count: usize,
    pub alpha: f64,
    pub reps: usize,
    pub aggregation: PowerAggregation,
    /// Observed statistics, in repetition order.
    pub alt_dist: Vec<f64>,
    /// Permuted statistics, in repetition order.
    pub null_dist: Vec<f64>,
}

/// Power of the test built by `builder` on samples from `generator`.
///
/// The entry points below are thin wrappers that build the generator and
/// topology from their parameters; this is the hook for custom simulators.
pub fn simulate_power(
    generator: &dyn SampleGenerator,
    builder: &dyn TestBuilder,
    test_options: &TestOptions,
    topology: Topology,
    config: &PowerConfig,
    default_aggregation: PowerAggregation,
) -> Result<PowerEstimate> {
    estimator::check_alpha(config.alpha)?;
    if config.reps == 0 {
        return Err(PowerError::InvalidParameter {
            name: "reps",
            reason: "need at least one repetition".into(),
        });
    }

    let test = builder.build(test_options)?;
    let aggregation = config.aggregation.unwrap_or(default_aggregation);
    let pool = WorkerPool::new(config.workers)?;
    info!(
        "Estimating power of {} with reps={}, alpha={}, workers={}",
        test.name(),
        config.reps,
        config.alpha,
        pool.threads()
    );

    let task = PermutationTask {
        generator,
        test: test.as_ref(),
        topology,
        streams: RandomStreams::derive(config.seed, config.reps),
    };
    let dists = run_permutations(&task, &pool)?;
    let estimate = estimate_power(dists.alternate, dists.null, config.alpha, aggregation)?;

    info!(
        "Empirical power of {}: {:.4} ({} of {} alternates reject)",
        test.name(),
        estimate.power,
        estimate.count,
        estimate.reps
    );
    Ok(estimate)
}
