//! Sample generation for a single repetition.
//!
//! A `SampleGenerator` produces one fresh realization of grouped samples
//! from the repetition's own random stream. Generators hold parameters
//! only; nothing is cached between repetitions.

use powersim_linalg::DenseMatrix;
use powersim_sims::{rot_ksamp, Gaussian3Samp, Gaussian4Samp2Way, IndepSim};

use crate::error::Result;
use crate::rng::StreamRng;

/// Produces one realization of grouped samples per call.
pub trait SampleGenerator: Send + Sync {
    fn generate(&self, rng: &mut StreamRng) -> Result<Vec<DenseMatrix>>;
}

impl<F> SampleGenerator for F
where
    F: Fn(&mut StreamRng) -> Result<Vec<DenseMatrix>> + Send + Sync,
{
    fn generate(&self, rng: &mut StreamRng) -> Result<Vec<DenseMatrix>> {
        self(rng)
    }
}

/// Two groups from a rotated independence simulator.
#[derive(Debug, Clone)]
pub struct TwoSampleGenerator {
    pub sim: IndepSim,
    pub n: usize,
    pub p: usize,
    pub noise: bool,
    /// Rotation of the second group, in degrees.
    pub angle: f64,
}

impl SampleGenerator for TwoSampleGenerator {
    fn generate(&self, rng: &mut StreamRng) -> Result<Vec<DenseMatrix>> {
        Ok(rot_ksamp(
            self.sim, self.n, self.p, 2, self.noise, self.angle, rng,
        )?)
    }
}

/// A single `[x, y]` draw from an independence simulator, unrotated.
#[derive(Debug, Clone)]
pub struct IndependenceGenerator {
    pub sim: IndepSim,
    pub n: usize,
    pub p: usize,
    pub noise: bool,
}

impl SampleGenerator for IndependenceGenerator {
    fn generate(&self, rng: &mut StreamRng) -> Result<Vec<DenseMatrix>> {
        let (x, y) = self.sim.simulate(self.n, self.p, self.noise, rng)?;
        Ok(vec![x, y])
    }
}

impl SampleGenerator for Gaussian3Samp {
    fn generate(&self, rng: &mut StreamRng) -> Result<Vec<DenseMatrix>> {
        Ok(self.simulate(rng)?)
    }
}

impl SampleGenerator for Gaussian4Samp2Way {
    fn generate(&self, rng: &mut StreamRng) -> Result<Vec<DenseMatrix>> {
        Ok(self.simulate(rng)?)
    }
}
