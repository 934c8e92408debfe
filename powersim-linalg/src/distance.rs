//! Pairwise distance matrices.
//!
//! D[i,j] = metric(row_i, row_j) over the rows of an n x p matrix.
//! Rows of the output are computed in parallel on the caller's rayon
//! pool, so the thread count is whatever that pool allows; each entry is
//! computed by the same sequence of floating point operations regardless
//! of scheduling, so results are bit-identical across thread counts.

use rayon::prelude::*;

use crate::dense::DenseMatrix;

/// Distance metric between two observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// sqrt(sum_k (a_k - b_k)^2)
    Euclidean,
    /// sum_k (a_k - b_k)^2
    SqEuclidean,
}

impl Metric {
    /// Distance between two equal-length rows.
    pub fn distance(self, a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len());
        let sq: f64 = a.iter().zip(b.iter()).map(|(x, y)| (x - y) * (x - y)).sum();
        match self {
            Metric::Euclidean => sq.sqrt(),
            Metric::SqEuclidean => sq,
        }
    }
}

/// Compute the n x n matrix of pairwise distances between the rows of `x`.
///
/// The result is symmetric with an exactly zero diagonal.
pub fn pairwise_distances(x: &DenseMatrix, metric: Metric) -> DenseMatrix {
    let n = x.nrows();
    let rows: Vec<Vec<f64>> = (0..n).map(|i| x.row(i)).collect();

    // Upper triangle, one row per task
    let upper: Vec<Vec<f64>> = (0..n)
        .into_par_iter()
        .map(|i| {
            ((i + 1)..n)
                .map(|j| metric.distance(&rows[i], &rows[j]))
                .collect()
        })
        .collect();

    let mut dist = DenseMatrix::zeros(n, n);
    for (i, row) in upper.iter().enumerate() {
        for (offset, &d) in row.iter().enumerate() {
            let j = i + 1 + offset;
            dist.set(i, j, d);
            dist.set(j, i, d);
        }
    }
    dist
}
