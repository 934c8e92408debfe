#![allow(clippy::needless_range_loop)]
//! Dense matrix operations backed by faer.
//!
//! Wraps faer's `Mat<f64>` with the operations the power engine needs:
//! row access, stacking of sample groups, row selection for label
//! permutations, and symmetric row/column permutation of distance
//! matrices. Rows are observations, columns are features.

use faer::Mat;

use crate::error::LinalgError;

/// A dense matrix wrapper around faer's `Mat<f64>`.
#[derive(Debug, Clone)]
pub struct DenseMatrix {
    inner: Mat<f64>,
}

impl DenseMatrix {
    /// Create a new dense matrix filled with zeros.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            inner: Mat::zeros(nrows, ncols),
        }
    }

    /// Create a new dense matrix filled with a constant value.
    pub fn full(nrows: usize, ncols: usize, value: f64) -> Self {
        Self {
            inner: Mat::from_fn(nrows, ncols, |_, _| value),
        }
    }

    /// Create a matrix whose entries are given by `f(row, col)`.
    pub fn from_fn(nrows: usize, ncols: usize, f: impl FnMut(usize, usize) -> f64) -> Self {
        Self {
            inner: Mat::from_fn(nrows, ncols, f),
        }
    }

    /// Create a dense matrix from a flat slice in row-major order.
    pub fn from_row_major(nrows: usize, ncols: usize, data: &[f64]) -> Self {
        assert_eq!(data.len(), nrows * ncols);
        let inner = Mat::from_fn(nrows, ncols, |i, j| data[i * ncols + j]);
        Self { inner }
    }

    /// Create a column vector from a slice.
    pub fn from_col(data: &[f64]) -> Self {
        Self::from_fn(data.len(), 1, |i, _| data[i])
    }

    /// Create an identity matrix of size n x n.
    pub fn identity(n: usize) -> Self {
        Self::from_fn(n, n, |i, j| if i == j { 1.0 } else { 0.0 })
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.inner.nrows()
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.inner.ncols()
    }

    /// Get element at (row, col).
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.inner.read(row, col)
    }

    /// Set element at (row, col).
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.inner.write(row, col, value);
    }

    /// Extract row as a Vec<f64>.
    pub fn row(&self, i: usize) -> Vec<f64> {
        (0..self.ncols()).map(|j| self.inner.read(i, j)).collect()
    }

    /// Extract column as a Vec<f64>.
    pub fn col(&self, j: usize) -> Vec<f64> {
        (0..self.nrows()).map(|i| self.inner.read(i, j)).collect()
    }

    /// Set an entire row from a slice.
    pub fn set_row(&mut self, i: usize, data: &[f64]) {
        assert_eq!(data.len(), self.ncols());
        for j in 0..self.ncols() {
            self.inner.write(i, j, data[j]);
        }
    }

    /// Stack matrices on top of each other. All inputs must share a
    /// column count.
    pub fn vstack(blocks: &[DenseMatrix]) -> Result<DenseMatrix, LinalgError> {
        let first = blocks.first().ok_or(LinalgError::Empty)?;
        let ncols = first.ncols();
        if let Some(bad) = blocks.iter().find(|b| b.ncols() != ncols) {
            return Err(LinalgError::DimensionMismatch {
                expected: ncols,
                got: bad.ncols(),
            });
        }

        let nrows: usize = blocks.iter().map(DenseMatrix::nrows).sum();
        let mut out = DenseMatrix::zeros(nrows, ncols);
        let mut offset = 0;
        for block in blocks {
            for i in 0..block.nrows() {
                for j in 0..ncols {
                    out.set(offset + i, j, block.get(i, j));
                }
            }
            offset += block.nrows();
        }
        Ok(out)
    }

    /// Concatenate matrices side by side. All inputs must share a row
    /// count.
    pub fn hstack(blocks: &[DenseMatrix]) -> Result<DenseMatrix, LinalgError> {
        let first = blocks.first().ok_or(LinalgError::Empty)?;
        let nrows = first.nrows();
        if let Some(bad) = blocks.iter().find(|b| b.nrows() != nrows) {
            return Err(LinalgError::DimensionMismatch {
                expected: nrows,
                got: bad.nrows(),
            });
        }

        let ncols: usize = blocks.iter().map(DenseMatrix::ncols).sum();
        let mut out = DenseMatrix::zeros(nrows, ncols);
        let mut offset = 0;
        for block in blocks {
            for j in 0..block.ncols() {
                for i in 0..nrows {
                    out.set(i, offset + j, block.get(i, j));
                }
            }
            offset += block.ncols();
        }
        Ok(out)
    }

    /// Reorder rows: row `k` of the result is row `order[k]` of `self`.
    pub fn select_rows(&self, order: &[usize]) -> Result<DenseMatrix, LinalgError> {
        check_permutation(order, self.nrows())?;
        Ok(Self::from_fn(order.len(), self.ncols(), |i, j| {
            self.inner.read(order[i], j)
        }))
    }

    /// Apply the same permutation to rows and columns of a square matrix,
    /// i.e. `M[order][:, order]`.
    ///
    /// A symmetric matrix with zero diagonal stays symmetric with zero
    /// diagonal, so permuted distance matrices remain valid.
    pub fn permute_symmetric(&self, order: &[usize]) -> Result<DenseMatrix, LinalgError> {
        if self.nrows() != self.ncols() {
            return Err(LinalgError::NotSquare {
                nrows: self.nrows(),
                ncols: self.ncols(),
            });
        }
        check_permutation(order, self.nrows())?;
        Ok(Self::from_fn(order.len(), order.len(), |i, j| {
            self.inner.read(order[i], order[j])
        }))
    }

    /// Matrix-matrix product: self * other.
    pub fn mat_mul(&self, other: &DenseMatrix) -> DenseMatrix {
        assert_eq!(self.ncols(), other.nrows());
        let result = &self.inner * &other.inner;
        DenseMatrix { inner: result }
    }

    /// Transpose.
    pub fn transpose(&self) -> DenseMatrix {
        let inner = self.inner.transpose().to_owned();
        DenseMatrix { inner }
    }

    /// Diagonal of a square matrix.
    pub fn diag(&self) -> Vec<f64> {
        let n = self.nrows().min(self.ncols());
        (0..n).map(|i| self.inner.read(i, i)).collect()
    }

    /// Whether the matrix is square and symmetric within `tol`.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        let n = self.nrows();
        if n != self.ncols() {
            return false;
        }
        for i in 0..n {
            for j in (i + 1)..n {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Mean over all entries.
    pub fn mean(&self) -> f64 {
        let len = self.nrows() * self.ncols();
        if len == 0 {
            return 0.0;
        }
        self.sum() / len as f64
    }

    /// Population variance over all entries.
    pub fn variance(&self) -> f64 {
        let len = self.nrows() * self.ncols();
        if len == 0 {
            return 0.0;
        }
        let mean = self.mean();
        let mut ss = 0.0;
        for j in 0..self.ncols() {
            for i in 0..self.nrows() {
                let d = self.inner.read(i, j) - mean;
                ss += d * d;
            }
        }
        ss / len as f64
    }

    /// Sum over all entries.
    pub fn sum(&self) -> f64 {
        let mut s = 0.0;
        for j in 0..self.ncols() {
            for i in 0..self.nrows() {
                s += self.inner.read(i, j);
            }
        }
        s
    }

    /// Whether every entry is finite.
    pub fn is_finite(&self) -> bool {
        (0..self.ncols()).all(|j| (0..self.nrows()).all(|i| self.inner.read(i, j).is_finite()))
    }

    /// Dot product of two slices.
    pub fn dot(a: &[f64], b: &[f64]) -> f64 {
        assert_eq!(a.len(), b.len());
        a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
    }
}

fn check_permutation(order: &[usize], n: usize) -> Result<(), LinalgError> {
    if order.len() != n {
        return Err(LinalgError::DimensionMismatch {
            expected: n,
            got: order.len(),
        });
    }
    let mut seen = vec![false; n];
    for &idx in order {
        if idx >= n || seen[idx] {
            return Err(LinalgError::InvalidPermutation { index: idx, len: n });
        }
        seen[idx] = true;
    }
    Ok(())
}
