//! Sparse matrix representation and solver interface.
//!
//! Provides a CSR (Compressed Sparse Row) matrix assembled from triplets
//! and a trait for sparse symmetric positive-definite solvers.

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Compressed Sparse Row (CSR) matrix.
///
/// Stores a sparse matrix in row-major order. Each row holds strictly
/// increasing column indices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsrMatrix {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// Row pointer array (length = rows + 1).
    /// `row_ptr[i]..row_ptr[i+1]` are the indices into `col_idx` and `values`
    /// for non-zeros in row `i`.
    pub row_ptr: Vec<usize>,
    /// Column indices of non-zero entries.
    pub col_idx: Vec<usize>,
    /// Non-zero values.
    pub values: Vec<f64>,
}

impl CsrMatrix {
    /// Creates an empty CSR matrix with the given dimensions.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            row_ptr: vec![0; rows + 1],
            col_idx: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Returns the number of stored entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Creates a CSR matrix from triplets (row, col, value).
    ///
    /// Duplicate entries are summed into a single stored entry.
    pub fn from_triplets(rows: usize, cols: usize, triplets: &[(usize, usize, f64)]) -> Self {
        // Count entries per row
        let mut row_counts = vec![0usize; rows];
        for &(r, _, _) in triplets {
            row_counts[r] += 1;
        }

        let mut row_ptr = vec![0usize; rows + 1];
        for i in 0..rows {
            row_ptr[i + 1] = row_ptr[i] + row_counts[i];
        }

        // Scatter into per-row buckets
        let mut entries = vec![(0usize, 0.0f64); row_ptr[rows]];
        let mut cursor = row_ptr[..rows].to_vec();
        for &(r, c, v) in triplets {
            entries[cursor[r]] = (c, v);
            cursor[r] += 1;
        }

        // Sort each row by column and merge duplicates
        let mut merged_ptr = Vec::with_capacity(rows + 1);
        let mut col_idx = Vec::with_capacity(entries.len());
        let mut values = Vec::with_capacity(entries.len());
        merged_ptr.push(0);
        for i in 0..rows {
            let row = &mut entries[row_ptr[i]..row_ptr[i + 1]];
            row.sort_unstable_by_key(|&(c, _)| c);
            let row_start = col_idx.len();
            for &(c, v) in row.iter() {
                if col_idx.len() > row_start && col_idx.last() == Some(&c) {
                    if let Some(last) = values.last_mut() {
                        *last += v;
                    }
                } else {
                    col_idx.push(c);
                    values.push(v);
                }
            }
            merged_ptr.push(col_idx.len());
        }

        Self {
            rows,
            cols,
            row_ptr: merged_ptr,
            col_idx,
            values,
        }
    }

    /// Returns the stored value at `(row, col)`, or zero.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        let range = self.row_ptr[row]..self.row_ptr[row + 1];
        match self.col_idx[range.clone()].binary_search(&col) {
            Ok(offset) => self.values[range.start + offset],
            Err(_) => 0.0,
        }
    }

    /// Returns the diagonal entries.
    pub fn diagonal(&self) -> Vec<f64> {
        (0..self.rows.min(self.cols)).map(|i| self.get(i, i)).collect()
    }

    /// Checks `|A[i][j] - A[j][i]| <= tol * max(1, |A[i][j]|)` for all stored entries.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        if self.rows != self.cols {
            return false;
        }
        for row in 0..self.rows {
            for idx in self.row_ptr[row]..self.row_ptr[row + 1] {
                let col = self.col_idx[idx];
                let a = self.values[idx];
                let b = self.get(col, row);
                if (a - b).abs() > tol * a.abs().max(1.0) {
                    return false;
                }
            }
        }
        true
    }
}

/// Trait for sparse symmetric positive-definite solvers.
///
/// The right-hand side carries all three coordinate axes at once; one
/// factorization serves the X, Y and Z solves.
pub trait SparseSolver {
    /// Factorize the matrix. Call once (or after the matrix changes).
    fn factorize(&mut self, matrix: &CsrMatrix) -> Result<(), String>;

    /// Solve `A x = b` for each axis using the pre-computed factorization.
    /// Returns x in the provided output buffer.
    fn solve(&self, rhs: &[DVec3], solution: &mut [DVec3]) -> Result<(), String>;

    /// Returns true if the solver holds a valid factorization.
    fn is_factorized(&self) -> bool;

    /// Drops the cached factorization.
    fn reset(&mut self);
}
