//! Rotated k-sample simulation.
//!
//! Turns an independence simulator into a k-sample problem: every group
//! is an independent draw of the joint observation `u = [x | y]`, and
//! group `g` is rotated by `g * angle` degrees in the plane spanned by
//! the first and last coordinates. With `angle = 0` all groups share a
//! distribution; larger angles move them apart.
//!
//! Observations keep the simulator's own scale: columns are not rescaled
//! to a common range before rotating. The rotation is a single plane
//! rotation for every `p`, not one spread across all dimensions, so
//! power curves over `p` are not comparable with tools that rotate in
//! every coordinate.

use powersim_linalg::DenseMatrix;
use rand::Rng;

use crate::error::{Result, SimError};
use crate::indep::IndepSim;

/// Default rotation between consecutive groups, in degrees.
pub const DEFAULT_ANGLE: f64 = 90.0;

/// Draw `k` groups of `n` joint observations from `sim`.
pub fn rot_ksamp<R: Rng + ?Sized>(
    sim: IndepSim,
    n: usize,
    p: usize,
    k: usize,
    noise: bool,
    angle: f64,
    rng: &mut R,
) -> Result<Vec<DenseMatrix>> {
    if k < 2 {
        return Err(SimError::InvalidParameter {
            name: "k",
            reason: format!("need at least two groups, got {}", k),
        });
    }
    if !angle.is_finite() {
        return Err(SimError::InvalidParameter {
            name: "angle",
            reason: format!("must be finite, got {}", angle),
        });
    }

    let mut groups = Vec::with_capacity(k);
    for g in 0..k {
        let (x, y) = sim.simulate(n, p, noise, rng)?;
        let u = DenseMatrix::hstack(&[x, y])?;
        if g == 0 {
            groups.push(u);
        } else {
            let rot = givens(u.ncols(), (g as f64 * angle).to_radians());
            groups.push(u.mat_mul(&rot.transpose()));
        }
    }
    Ok(groups)
}

/// Rotation by `theta` in the (0, d-1) coordinate plane.
fn givens(d: usize, theta: f64) -> DenseMatrix {
    let mut rot = DenseMatrix::identity(d);
    let (s, c) = theta.sin_cos();
    let last = d - 1;
    rot.set(0, 0, c);
    rot.set(0, last, -s);
    rot.set(last, 0, s);
    rot.set(last, last, c);
    rot
}
