//! k-sample transform.
//!
//! Rewrites k groups of observations as a single two-input problem: `u`
//! stacks the groups row-wise and `v` encodes group membership per row.
//! An independence test on `(u, v)` is then a k-sample test.

use powersim_linalg::DenseMatrix;

use crate::error::{PowerError, Result};

/// How group membership is written into the label array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LabelEncoding {
    /// One column per group, 1 in the group's column.
    #[default]
    OneHot,
    /// A single column holding the group index, as tree-based tests
    /// expect.
    Ordinal,
}

/// Stack `groups` into `(u, v)`.
///
/// When `ways` is given, group `g`'s rows are labelled with the factor
/// levels `ways[g]` instead of `encoding`, so a multi-way design keeps
/// its factorial structure.
pub fn k_sample_transform(
    groups: &[DenseMatrix],
    encoding: LabelEncoding,
    ways: Option<&[[u8; 2]]>,
) -> Result<(DenseMatrix, DenseMatrix)> {
    if groups.len() < 2 {
        return Err(PowerError::InvalidParameter {
            name: "groups",
            reason: format!("need at least two groups, got {}", groups.len()),
        });
    }
    let ncols = groups[0].ncols();
    if let Some((group, bad)) = groups.iter().enumerate().find(|(_, g)| g.ncols() != ncols) {
        return Err(PowerError::ShapeMismatch {
            group,
            expected: ncols,
            got: bad.ncols(),
        });
    }
    if let Some(ways) = ways {
        if ways.len() != groups.len() {
            return Err(PowerError::InvalidParameter {
                name: "ways",
                reason: format!(
                    "{} factor labels for {} groups",
                    ways.len(),
                    groups.len()
                ),
            });
        }
    }

    let u = DenseMatrix::vstack(groups)?;
    if u.variance() == 0.0 {
        return Err(PowerError::DegenerateInput);
    }

    let k = groups.len();
    let label_rows: Vec<Vec<f64>> = (0..k)
        .map(|g| match (ways, encoding) {
            (Some(ways), _) => ways[g].iter().map(|&l| f64::from(l)).collect(),
            (None, LabelEncoding::OneHot) => {
                (0..k).map(|c| if c == g { 1.0 } else { 0.0 }).collect()
            }
            (None, LabelEncoding::Ordinal) => vec![g as f64],
        })
        .collect();

    let mut v = DenseMatrix::zeros(u.nrows(), label_rows[0].len());
    let mut row = 0;
    for (g, group) in groups.iter().enumerate() {
        for _ in 0..group.nrows() {
            v.set_row(row, &label_rows[g]);
            row += 1;
        }
    }

    Ok((u, v))
}
