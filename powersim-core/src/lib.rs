//! powersim-core: Permutation-based power estimation
//!
//! Implements the power engine: independent per-repetition random
//! streams, sample generation, the k-sample transform, test statistics,
//! the permutation executor with its pluggable parallel map, and the
//! empirical power estimator behind the independence and the two-,
//! three- and four-sample entry points.

pub mod error;
pub mod ksample;
pub mod permutation;
pub mod power;
pub mod rng;
pub mod sampler;
pub mod stats;

pub use error::{ErrorKind, PowerError, Result, Stage};
pub use ksample::{k_sample_transform, LabelEncoding};
pub use permutation::{PermutationStructure, Topology, Workers};
pub use power::{
    estimate_power, power_2samp, power_2samp_curve, power_2samp_estimate,
    power_3samp_epsweight, power_3samp_epsweight_estimate, power_4samp_2way_epsweight,
    power_4samp_2way_epsweight_estimate, power_indep, power_indep_dim, power_indep_estimate,
    power_indep_sample, simulate_power, CurvePoint, FourSampleOptions, FourSampleParams,
    IndependenceParams, PowerAggregation, PowerConfig, PowerEstimate, Sweep, ThreeSampleParams,
    TwoSampleParams,
};
pub use sampler::{IndependenceGenerator, SampleGenerator, TwoSampleGenerator};
pub use stats::{IndependenceTest, TestBuilder, TestKind, TestOptions};
