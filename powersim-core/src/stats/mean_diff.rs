//! Group mean difference.
//!
//! Reads group membership from the label array (any encoding: each
//! distinct label row is one group) and returns the largest Euclidean
//! distance between two group mean vectors. For two univariate groups
//! this is `|mean(a) - mean(b)|`.

use powersim_linalg::DenseMatrix;

use super::IndependenceTest;
use crate::error::{PowerError, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct MeanDifference;

impl IndependenceTest for MeanDifference {
    fn name(&self) -> &str {
        "mean_difference"
    }

    fn statistic(&self, x: &DenseMatrix, labels: &DenseMatrix) -> Result<f64> {
        if x.nrows() != labels.nrows() {
            return Err(PowerError::Statistic {
                test: self.name().to_string(),
                reason: format!(
                    "{} observations but {} labels",
                    x.nrows(),
                    labels.nrows()
                ),
            });
        }

        let p = x.ncols();
        // (label row, sum of observations, count); few groups, linear scan
        let mut groups: Vec<(Vec<f64>, Vec<f64>, usize)> = Vec::new();
        for i in 0..x.nrows() {
            let label = labels.row(i);
            let idx = match groups.iter().position(|(l, _, _)| *l == label) {
                Some(idx) => idx,
                None => {
                    groups.push((label, vec![0.0; p], 0));
                    groups.len() - 1
                }
            };
            let (_, sum, count) = &mut groups[idx];
            for (s, v) in sum.iter_mut().zip(x.row(i)) {
                *s += v;
            }
            *count += 1;
        }

        if groups.len() < 2 {
            return Err(PowerError::Statistic {
                test: self.name().to_string(),
                reason: "labels contain a single group".into(),
            });
        }

        let means: Vec<Vec<f64>> = groups
            .iter()
            .map(|(_, sum, count)| sum.iter().map(|s| s / *count as f64).collect())
            .collect();

        let mut best = 0.0_f64;
        for a in 0..means.len() {
            for b in (a + 1)..means.len() {
                let d: f64 = means[a]
                    .iter()
                    .zip(&means[b])
                    .map(|(x, y)| (x - y) * (x - y))
                    .sum::<f64>()
                    .sqrt();
                best = best.max(d);
            }
        }
        Ok(best)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_groups_univariate() {
        let x = DenseMatrix::from_col(&[1.0, 3.0, 10.0, 12.0]);
        let v = DenseMatrix::from_row_major(4, 2, &[1.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0]);
        let stat = MeanDifference.statistic(&x, &v).unwrap();
        assert!((stat - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_invariant_to_label_order() {
        let x = DenseMatrix::from_col(&[1.0, 3.0, 10.0, 12.0]);
        let v = DenseMatrix::from_col(&[0.0, 0.0, 1.0, 1.0]);
        let w = DenseMatrix::from_col(&[1.0, 1.0, 0.0, 0.0]);
        let t = MeanDifference;
        assert_eq!(t.statistic(&x, &v).unwrap(), t.statistic(&x, &w).unwrap());
    }

    #[test]
    fn test_largest_pairwise_gap() {
        let x = DenseMatrix::from_col(&[0.0, 1.0, 5.0]);
        let v = DenseMatrix::from_col(&[0.0, 1.0, 2.0]);
        assert!((MeanDifference.statistic(&x, &v).unwrap() - 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_group_is_error() {
        let x = DenseMatrix::from_col(&[1.0, 2.0]);
        let v = DenseMatrix::full(2, 1, 0.0);
        assert!(MeanDifference.statistic(&x, &v).is_err());
    }
}
