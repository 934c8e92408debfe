//! Independence power: the test sees `(x, y)` exactly as the simulator
//! draws it, and the null permutes the rows of `y`.

use powersim_sims::{IndepSim, NoisySim};
use tracing::info;

use super::{simulate_power, CurvePoint, PowerAggregation, PowerConfig, PowerEstimate};
use crate::error::{PowerError, Result};
use crate::permutation::Topology;
use crate::sampler::IndependenceGenerator;
use crate::stats::TestBuilder;

#[derive(Debug, Clone)]
pub struct IndependenceParams {
    pub sim: IndepSim,
    /// Sample size.
    pub n: usize,
    /// Dimension of `x`.
    pub p: usize,
    pub noise: bool,
}

impl Default for IndependenceParams {
    fn default() -> Self {
        Self {
            sim: IndepSim::Noisy(NoisySim::Linear),
            n: 100,
            p: 1,
            noise: true,
        }
    }
}

impl IndependenceParams {
    fn generator(&self) -> IndependenceGenerator {
        IndependenceGenerator {
            sim: self.sim,
            n: self.n,
            p: self.p,
            noise: self.noise,
        }
    }
}

/// Empirical power of `test` on one independence simulator.
pub fn power_indep(
    test: &dyn TestBuilder,
    params: &IndependenceParams,
    config: &PowerConfig,
) -> Result<f64> {
    Ok(power_indep_estimate(test, params, config)?.power)
}

/// As `power_indep`, returning the full estimate. Defaults to
/// `PowerAggregation::Smoothed`.
pub fn power_indep_estimate(
    test: &dyn TestBuilder,
    params: &IndependenceParams,
    config: &PowerConfig,
) -> Result<PowerEstimate> {
    simulate_power(
        &params.generator(),
        test,
        &config.test_options,
        Topology::Independence,
        config,
        PowerAggregation::Smoothed,
    )
}

/// Independence power at each sample size in `sizes`.
pub fn power_indep_sample(
    test: &dyn TestBuilder,
    params: &IndependenceParams,
    sizes: &[usize],
    config: &PowerConfig,
) -> Result<Vec<CurvePoint>> {
    sweep(test, params, "n", sizes, config, |p, n| p.n = n)
}

/// Independence power at each dimension in `dims`.
pub fn power_indep_dim(
    test: &dyn TestBuilder,
    params: &IndependenceParams,
    dims: &[usize],
    config: &PowerConfig,
) -> Result<Vec<CurvePoint>> {
    sweep(test, params, "p", dims, config, |p, d| p.p = d)
}

fn sweep(
    test: &dyn TestBuilder,
    params: &IndependenceParams,
    name: &'static str,
    values: &[usize],
    config: &PowerConfig,
    set: impl Fn(&mut IndependenceParams, usize),
) -> Result<Vec<CurvePoint>> {
    if values.is_empty() {
        return Err(PowerError::InvalidParameter {
            name: "sweep",
            reason: format!("no values given for {}", name),
        });
    }
    info!(
        "Independence power of {} over {} ({} points)",
        params.sim,
        name,
        values.len()
    );

    values
        .iter()
        .map(|&value| {
            let mut point = params.clone();
            set(&mut point, value);
            let power = power_indep(test, &point, config)?;
            info!("{} = {}: power {:.4}", name, value, power);
            Ok(CurvePoint {
                value: value as f64,
                power,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::TestKind;
    use powersim_sims::NoiselessSim;

    fn config(reps: usize, seed: u64) -> PowerConfig {
        PowerConfig {
            reps,
            seed: Some(seed),
            ..Default::default()
        }
    }

    #[test]
    fn test_power_rises_with_sample_size() {
        let curve = power_indep_sample(
            &TestKind::Dcorr,
            &IndependenceParams::default(),
            &[5, 20, 80],
            &config(200, 31),
        )
        .unwrap();
        let powers: Vec<f64> = curve.iter().map(|pt| pt.power).collect();
        assert_eq!(curve[2].value, 80.0);
        assert!(powers.windows(2).all(|w| w[1] >= w[0]), "{:?}", powers);
        assert!(powers[2] > 0.9, "{:?}", powers);
    }

    #[test]
    fn test_independent_sim_holds_size() {
        let params = IndependenceParams {
            sim: IndepSim::Noiseless(NoiselessSim::MultimodalIndependence),
            n: 30,
            ..Default::default()
        };
        let est = power_indep_estimate(&TestKind::Dcorr, &params, &config(200, 32)).unwrap();
        assert_eq!(est.aggregation, PowerAggregation::Smoothed);
        assert!(est.power < 0.15, "power {} under independence", est.power);
    }

    #[test]
    fn test_dimension_sweep_points() {
        let params = IndependenceParams {
            n: 20,
            ..Default::default()
        };
        let curve =
            power_indep_dim(&TestKind::Dcorr, &params, &[1, 3], &config(20, 33)).unwrap();
        assert_eq!(curve.len(), 2);
        assert_eq!(curve[1].value, 3.0);
        assert!(curve.iter().all(|pt| pt.power > 0.0 && pt.power <= 1.0));
    }

    #[test]
    fn test_empty_sweep_rejected() {
        let err = power_indep_sample(
            &TestKind::Dcorr,
            &IndependenceParams::default(),
            &[],
            &config(10, 34),
        )
        .unwrap_err();
        assert!(matches!(err, PowerError::InvalidParameter { name: "sweep", .. }));
    }
}
