//! Gaussian location-family k-sample simulators.
//!
//! Three-sample: groups differ along the first two coordinates according
//! to `case`, optionally through mixtures controlled by `weight`.
//!
//! Four-sample two-way: groups form a 2x2 factorial design ordered as
//! `FOUR_SAMPLE_WAYS`. Factor levels `(a, b)` shift the group mean by
//! `epsilon1` along the first coordinate and `epsilon2` along the second,
//! with the pattern of effects selected by `case`:
//!   1. main effects:      mu = (eps1 * a,     eps2 * b)
//!   2. main + interaction: mu = (eps1 * a,     eps2 * a * b)
//!   3. interaction only:   mu = (eps1 * a * b, eps2 * a * b)
//! `effect_mask` switches the shift off per group, and `weight` is the
//! probability that an observation of a shifted group is drawn from the
//! unshifted distribution instead.

use powersim_linalg::DenseMatrix;
use rand::distributions::Distribution;
use rand::Rng;
use statrs::distribution::Normal;

use crate::error::{check_shape, check_weight, Result, SimError};

/// Factor levels of the four groups, in group order.
pub const FOUR_SAMPLE_WAYS: [[u8; 2]; 4] = [[0, 0], [0, 1], [1, 1], [1, 0]];

/// Three Gaussian groups in R^d.
///
/// Cases:
///   1. all groups centred at the origin
///   2. the third group shifted to `(0, epsilon)`
///   3. groups at the vertices of an equilateral triangle of radius `epsilon`
///   4. as 2, but the third group draws from the mirrored centre
///      `(0, -epsilon)` with probability `weight`
///   5. as 3, with every group drawing from its mirrored vertex with
///      probability `weight`
#[derive(Debug, Clone)]
pub struct Gaussian3Samp {
    pub n: usize,
    pub epsilon: f64,
    pub weight: f64,
    pub case: u8,
    pub d: usize,
    pub sd: f64,
}

impl Default for Gaussian3Samp {
    fn default() -> Self {
        Self {
            n: 100,
            epsilon: 1.0,
            weight: 0.0,
            case: 1,
            d: 2,
            sd: 1.0,
        }
    }
}

impl Gaussian3Samp {
    pub const MAX_CASE: u8 = 5;

    /// Group centres and the probability of drawing from the mirrored
    /// centre instead.
    fn centres(&self) -> [([f64; 2], f64); 3] {
        let e = self.epsilon;
        let h = e * 3.0_f64.sqrt() / 2.0;
        let triangle = [[0.0, e], [h, -e / 2.0], [-h, -e / 2.0]];
        match self.case {
            1 => [([0.0, 0.0], 0.0); 3],
            2 => [([0.0, 0.0], 0.0), ([0.0, 0.0], 0.0), ([0.0, e], 0.0)],
            3 => triangle.map(|c| (c, 0.0)),
            4 => [
                ([0.0, 0.0], 0.0),
                ([0.0, 0.0], 0.0),
                ([0.0, e], self.weight),
            ],
            _ => triangle.map(|c| (c, self.weight)),
        }
    }

    pub fn simulate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<DenseMatrix>> {
        check_shape(self.n, self.d)?;
        check_case(self.case, Self::MAX_CASE)?;
        check_weight(self.weight)?;
        check_location_dim(self.d)?;
        let normal = Normal::new(0.0, self.sd)?;

        let groups = self
            .centres()
            .iter()
            .map(|&(centre, mirror_prob)| {
                let mut x = DenseMatrix::from_fn(self.n, self.d, |_, _| normal.sample(rng));
                for i in 0..self.n {
                    let sign = if mirror_prob > 0.0 && rng.gen_bool(mirror_prob) {
                        -1.0
                    } else {
                        1.0
                    };
                    for (k, &c) in centre.iter().enumerate() {
                        x.set(i, k, x.get(i, k) + sign * c);
                    }
                }
                x
            })
            .collect();
        Ok(groups)
    }
}

/// Four Gaussian groups in R^d arranged as a two-way design.
#[derive(Debug, Clone)]
pub struct Gaussian4Samp2Way {
    pub n: usize,
    pub epsilon1: f64,
    pub epsilon2: f64,
    /// Groups whose mean shift is applied; `None` applies all.
    pub effect_mask: Option<[bool; 4]>,
    pub weight: f64,
    pub case: u8,
    pub d: usize,
    pub sd: f64,
}

impl Default for Gaussian4Samp2Way {
    fn default() -> Self {
        Self {
            n: 100,
            epsilon1: 0.5,
            epsilon2: 0.5,
            effect_mask: None,
            weight: 0.0,
            case: 1,
            d: 2,
            sd: 1.0,
        }
    }
}

impl Gaussian4Samp2Way {
    pub const MAX_CASE: u8 = 3;

    /// Mean shift of group `g` on the first two coordinates.
    pub fn group_mean(&self, g: usize) -> [f64; 2] {
        if let Some(mask) = self.effect_mask {
            if !mask[g] {
                return [0.0, 0.0];
            }
        }
        let [a, b] = FOUR_SAMPLE_WAYS[g].map(f64::from);
        match self.case {
            1 => [self.epsilon1 * a, self.epsilon2 * b],
            2 => [self.epsilon1 * a, self.epsilon2 * a * b],
            _ => [self.epsilon1 * a * b, self.epsilon2 * a * b],
        }
    }

    pub fn simulate<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<DenseMatrix>> {
        check_shape(self.n, self.d)?;
        check_case(self.case, Self::MAX_CASE)?;
        check_weight(self.weight)?;
        check_location_dim(self.d)?;
        let normal = Normal::new(0.0, self.sd)?;

        let groups = (0..FOUR_SAMPLE_WAYS.len())
            .map(|g| {
                let mean = self.group_mean(g);
                let shifted = mean != [0.0, 0.0];
                let mut x = DenseMatrix::from_fn(self.n, self.d, |_, _| normal.sample(rng));
                for i in 0..self.n {
                    let contaminated = shifted && self.weight > 0.0 && rng.gen_bool(self.weight);
                    if shifted && !contaminated {
                        for (k, &m) in mean.iter().enumerate() {
                            x.set(i, k, x.get(i, k) + m);
                        }
                    }
                }
                x
            })
            .collect();
        Ok(groups)
    }
}

fn check_case(case: u8, max: u8) -> Result<()> {
    if case == 0 || case > max {
        return Err(SimError::InvalidCase { case, max });
    }
    Ok(())
}

fn check_location_dim(d: usize) -> Result<()> {
    if d < 2 {
        return Err(SimError::InvalidParameter {
            name: "d",
            reason: format!("effects live on two coordinates, need d >= 2, got {}", d),
        });
    }
    Ok(())
}
