//! Independence simulators.
//!
//! Each simulator draws `n` paired observations `(x_i, y_i)` with
//! `x_i` in R^p. Most families relate `y` to the projection `x . w`,
//! with `w_k = 1 / (k + 1)`, and accept a `noise` flag that adds scaled
//! Gaussian noise to `y`. Two families (multiplicative noise and
//! multimodal independence) define their noise structure themselves and
//! never take the flag; they are a separate variant so the flag cannot
//! be passed to them.

use std::fmt;
use std::str::FromStr;

use powersim_linalg::DenseMatrix;
use rand::distributions::Distribution;
use rand::Rng;
use statrs::distribution::Normal;

use crate::error::{check_shape, Result, SimError};

/// Simulators whose output depends on a `noise` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoisySim {
    Linear,
    Exponential,
    Cubic,
    JointNormal,
    Step,
    Quadratic,
    WShaped,
}

/// Simulators that never take a `noise` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoiselessSim {
    MultiplicativeNoise,
    MultimodalIndependence,
}

/// An independence simulator, tagged by whether it takes a noise flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndepSim {
    Noisy(NoisySim),
    Noiseless(NoiselessSim),
}

impl NoisySim {
    pub const ALL: [NoisySim; 7] = [
        NoisySim::Linear,
        NoisySim::Exponential,
        NoisySim::Cubic,
        NoisySim::JointNormal,
        NoisySim::Step,
        NoisySim::Quadratic,
        NoisySim::WShaped,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NoisySim::Linear => "linear",
            NoisySim::Exponential => "exponential",
            NoisySim::Cubic => "cubic",
            NoisySim::JointNormal => "joint_normal",
            NoisySim::Step => "step",
            NoisySim::Quadratic => "quadratic",
            NoisySim::WShaped => "w_shaped",
        }
    }

    /// Scale applied to the standard normal noise term.
    fn noise_scale(self) -> f64 {
        match self {
            NoisySim::Linear | NoisySim::Step => 1.0,
            NoisySim::Exponential => 10.0,
            NoisySim::Cubic => 80.0,
            NoisySim::JointNormal | NoisySim::Quadratic | NoisySim::WShaped => 0.5,
        }
    }

    /// Draw `n` observations with `x` of dimension `p`.
    pub fn simulate<R: Rng + ?Sized>(
        self,
        n: usize,
        p: usize,
        noise: bool,
        rng: &mut R,
    ) -> Result<(DenseMatrix, DenseMatrix)> {
        check_shape(n, p)?;
        let normal = Normal::new(0.0, 1.0)?;
        let w = coefficients(p);
        let kappa = if noise { self.noise_scale() } else { 0.0 };

        if self == NoisySim::JointNormal {
            // Per-coordinate correlation rho = 1 / (2p) between x_k and y_k
            let rho = 1.0 / (2.0 * p as f64);
            let x = DenseMatrix::from_fn(n, p, |_, _| normal.sample(rng));
            let y = DenseMatrix::from_fn(n, p, |i, k| {
                rho * x.get(i, k)
                    + (1.0 - rho * rho).sqrt() * normal.sample(rng)
                    + kappa * normal.sample(rng)
            });
            return Ok((x, y));
        }

        let (lo, hi) = match self {
            NoisySim::Exponential => (0.0, 3.0),
            _ => (-1.0, 1.0),
        };
        let x = DenseMatrix::from_fn(n, p, |_, _| rng.gen_range(lo..hi));
        let mut y = DenseMatrix::zeros(n, 1);

        for i in 0..n {
            let t = DenseMatrix::dot(&x.row(i), &w);
            let signal = match self {
                NoisySim::Linear => t,
                NoisySim::Exponential => t.exp(),
                NoisySim::Cubic => {
                    let c = t - 1.0 / 3.0;
                    128.0 * c.powi(3) + 48.0 * c.powi(2) - 12.0 * c
                }
                NoisySim::Step => {
                    if t > 0.0 {
                        1.0
                    } else {
                        0.0
                    }
                }
                NoisySim::Quadratic => t * t,
                NoisySim::WShaped => {
                    let u: Vec<f64> = (0..p).map(|_| rng.gen_range(-1.0..1.0)).collect();
                    4.0 * ((t * t - 0.5).powi(2) + DenseMatrix::dot(&u, &w) / 500.0)
                }
                NoisySim::JointNormal => unreachable!("handled above"),
            };
            y.set(i, 0, signal + kappa * normal.sample(rng));
        }

        Ok((x, y))
    }
}

impl NoiselessSim {
    pub const ALL: [NoiselessSim; 2] = [
        NoiselessSim::MultiplicativeNoise,
        NoiselessSim::MultimodalIndependence,
    ];

    pub fn name(self) -> &'static str {
        match self {
            NoiselessSim::MultiplicativeNoise => "multiplicative_noise",
            NoiselessSim::MultimodalIndependence => "multimodal_independence",
        }
    }

    /// Draw `n` observations; both `x` and `y` have dimension `p`.
    pub fn simulate<R: Rng + ?Sized>(
        self,
        n: usize,
        p: usize,
        rng: &mut R,
    ) -> Result<(DenseMatrix, DenseMatrix)> {
        check_shape(n, p)?;
        let normal = Normal::new(0.0, 1.0)?;

        match self {
            NoiselessSim::MultiplicativeNoise => {
                let x = DenseMatrix::from_fn(n, p, |_, _| normal.sample(rng));
                let y = DenseMatrix::from_fn(n, p, |i, k| x.get(i, k) * normal.sample(rng));
                Ok((x, y))
            }
            NoiselessSim::MultimodalIndependence => {
                let bimodal = |rng: &mut R| {
                    let z = normal.sample(rng);
                    let b = if rng.gen_bool(0.5) { 1.0 } else { 0.0 };
                    z / 3.0 + 2.0 * b - 1.0
                };
                let x = DenseMatrix::from_fn(n, p, |_, _| bimodal(&mut *rng));
                let y = DenseMatrix::from_fn(n, p, |_, _| bimodal(&mut *rng));
                Ok((x, y))
            }
        }
    }
}

impl IndepSim {
    /// Every known simulator.
    pub fn all() -> impl Iterator<Item = IndepSim> {
        NoisySim::ALL
            .into_iter()
            .map(IndepSim::Noisy)
            .chain(NoiselessSim::ALL.into_iter().map(IndepSim::Noiseless))
    }

    pub fn name(self) -> &'static str {
        match self {
            IndepSim::Noisy(s) => s.name(),
            IndepSim::Noiseless(s) => s.name(),
        }
    }

    /// Whether the simulator consumes the `noise` flag.
    pub fn takes_noise(self) -> bool {
        matches!(self, IndepSim::Noisy(_))
    }

    /// Draw one `(x, y)` realization, forwarding `noise` only to the
    /// simulators that take it.
    pub fn simulate<R: Rng + ?Sized>(
        self,
        n: usize,
        p: usize,
        noise: bool,
        rng: &mut R,
    ) -> Result<(DenseMatrix, DenseMatrix)> {
        match self {
            IndepSim::Noisy(sim) => sim.simulate(n, p, noise, rng),
            IndepSim::Noiseless(sim) => sim.simulate(n, p, rng),
        }
    }
}

impl fmt::Display for IndepSim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IndepSim {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase().replace('-', "_");
        IndepSim::all()
            .find(|sim| sim.name() == key)
            .ok_or_else(|| SimError::UnknownSimulator(s.to_string()))
    }
}

/// Projection weights `w_k = 1 / (k + 1)`.
fn coefficients(p: usize) -> Vec<f64> {
    (0..p).map(|k| 1.0 / (k + 1) as f64).collect()
}
