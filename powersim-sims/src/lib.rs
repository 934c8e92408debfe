//! powersim-sims: Data simulators for power estimation
//!
//! Independence simulators produce paired `(x, y)` draws; the k-sample
//! simulators build grouped samples from them (rotation) or from
//! Gaussian location families with one- and two-way effects.

pub mod error;
pub mod gaussian;
pub mod indep;
pub mod rotation;

pub use error::SimError;
pub use gaussian::{Gaussian3Samp, Gaussian4Samp2Way, FOUR_SAMPLE_WAYS};
pub use indep::{IndepSim, NoiselessSim, NoisySim};
pub use rotation::rot_ksamp;
