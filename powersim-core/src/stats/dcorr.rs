//! Distance correlation.
//!
//! For distance matrices A, B (n x n), with double-centred versions
//!   a_ij = A_ij - mean_i(A) - mean_j(A) + mean(A)
//! the (biased) distance covariance is
//!   dcov(A, B) = (1/n^2) * sum_ij a_ij * b_ij
//! and
//!   dcorr = dcov(A, B) / sqrt(dcov(A, A) * dcov(B, B)).
//! A zero denominator gives a statistic of 0.

use powersim_linalg::{pairwise_distances, DenseMatrix, Metric};

use super::IndependenceTest;
use crate::error::{PowerError, Result};

/// Distance correlation test.
#[derive(Debug, Clone, Copy)]
pub struct Dcorr {
    compute_distance: bool,
}

impl Dcorr {
    /// With `compute_distance = false` the inputs are taken to be
    /// precomputed distance matrices.
    pub fn new(compute_distance: bool) -> Self {
        Self { compute_distance }
    }
}

impl Default for Dcorr {
    fn default() -> Self {
        Self::new(true)
    }
}

impl IndependenceTest for Dcorr {
    fn name(&self) -> &str {
        "dcorr"
    }

    fn statistic(&self, x: &DenseMatrix, y: &DenseMatrix) -> Result<f64> {
        if x.nrows() != y.nrows() {
            return Err(PowerError::Statistic {
                test: self.name().to_string(),
                reason: format!("x has {} rows but y has {}", x.nrows(), y.nrows()),
            });
        }

        let (dx, dy) = if self.compute_distance {
            (
                pairwise_distances(x, Metric::Euclidean),
                pairwise_distances(y, Metric::Euclidean),
            )
        } else {
            for m in [x, y] {
                if m.nrows() != m.ncols() {
                    return Err(PowerError::Statistic {
                        test: self.name().to_string(),
                        reason: format!(
                            "precomputed distance matrix must be square, got {}x{}",
                            m.nrows(),
                            m.ncols()
                        ),
                    });
                }
            }
            (x.clone(), y.clone())
        };

        let a = double_centre(&dx);
        let b = double_centre(&dy);
        let cov_xy = dcov(&a, &b);
        let var_x = dcov(&a, &a);
        let var_y = dcov(&b, &b);

        let denom = (var_x * var_y).sqrt();
        if denom <= 0.0 {
            return Ok(0.0);
        }
        Ok(cov_xy / denom)
    }
}

fn double_centre(d: &DenseMatrix) -> DenseMatrix {
    let n = d.nrows();
    let row_means: Vec<f64> = (0..n)
        .map(|i| d.row(i).iter().sum::<f64>() / n as f64)
        .collect();
    let col_means: Vec<f64> = (0..n)
        .map(|j| d.col(j).iter().sum::<f64>() / n as f64)
        .collect();
    let grand = row_means.iter().sum::<f64>() / n as f64;
    DenseMatrix::from_fn(n, n, |i, j| d.get(i, j) - row_means[i] - col_means[j] + grand)
}

fn dcov(a: &DenseMatrix, b: &DenseMatrix) -> f64 {
    let n = a.nrows();
    let mut s = 0.0;
    for i in 0..n {
        for j in 0..n {
            s += a.get(i, j) * b.get(i, j);
        }
    }
    s / (n * n) as f64
}
