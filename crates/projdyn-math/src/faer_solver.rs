//! Sparse Cholesky solver backed by `faer`.
//!
//! Implements the [`SparseSolver`] trait using faer's supernodal LLᵀ
//! factorization.
//!
//! ## Workflow
//! 1. `factorize(matrix)`: converts CSR→CSC, computes symbolic + numeric LLᵀ
//! 2. `solve(rhs, solution)`: forward/backward substitution (cached factorization)
//! 3. Repeat `solve()` with different RHS without re-factorizing

use faer::Side;
use faer::linalg::solvers::Solve;
use faer::sparse::SparseColMat;
use faer::sparse::Triplet;
use faer::sparse::linalg::solvers::{Llt, SymbolicLlt};
use glam::DVec3;

use crate::sparse::{CsrMatrix, SparseSolver};

/// Sparse Cholesky (LLᵀ) solver using `faer`.
///
/// Stores the factorization for reuse across multiple solves. The
/// Projective Dynamics system matrix only changes with masses, constraint
/// weights and the timestep, so one factorization serves many frames.
pub struct FaerSolver {
    /// Cached LLᵀ factorization.
    factorization: Option<Llt<usize, f64>>,
    /// Matrix dimension (N×N).
    dimension: usize,
}

impl FaerSolver {
    /// Creates a new solver (unfactorized).
    pub fn new() -> Self {
        Self {
            factorization: None,
            dimension: 0,
        }
    }

    /// Returns the dimension of the factorized matrix (0 if none).
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Convert our CSR matrix to faer's CSC matrix.
    fn csr_to_csc(matrix: &CsrMatrix) -> Result<SparseColMat<usize, f64>, String> {
        let mut triplets: Vec<Triplet<usize, usize, f64>> = Vec::with_capacity(matrix.nnz());
        for row in 0..matrix.rows {
            for idx in matrix.row_ptr[row]..matrix.row_ptr[row + 1] {
                let col = matrix.col_idx[idx];
                let val = matrix.values[idx];
                triplets.push(Triplet { row, col, val });
            }
        }

        SparseColMat::try_new_from_triplets(matrix.rows, matrix.cols, &triplets)
            .map_err(|e| format!("Failed to construct faer CSC matrix: {e:?}"))
    }
}

impl Default for FaerSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SparseSolver for FaerSolver {
    fn factorize(&mut self, matrix: &CsrMatrix) -> Result<(), String> {
        // A failed attempt must not leave a stale factorization behind.
        self.reset();

        if matrix.rows != matrix.cols {
            return Err(format!(
                "Matrix must be square, got {}×{}",
                matrix.rows, matrix.cols
            ));
        }
        if matrix.rows == 0 {
            return Err("Cannot factorize empty matrix".into());
        }
        if matrix.values.iter().any(|v| !v.is_finite()) {
            return Err("Matrix contains non-finite entries".into());
        }

        let csc = Self::csr_to_csc(matrix)?;

        // Step 1: Symbolic analysis (ordering, fill-in prediction)
        let symbolic = SymbolicLlt::try_new(csc.symbolic().as_ref(), Side::Upper)
            .map_err(|e| format!("Symbolic analysis failed: {e:?}"))?;

        // Step 2: Numeric factorization (using the symbolic structure)
        let llt = Llt::try_new_with_symbolic(symbolic, csc.as_ref(), Side::Upper)
            .map_err(|e| format!("Cholesky factorization failed: {e:?}"))?;

        self.dimension = matrix.rows;
        self.factorization = Some(llt);
        Ok(())
    }

    fn solve(&self, rhs: &[DVec3], solution: &mut [DVec3]) -> Result<(), String> {
        let llt = self
            .factorization
            .as_ref()
            .ok_or_else(|| "Solver not factorized. Call factorize() first.".to_string())?;

        if rhs.len() != self.dimension {
            return Err(format!(
                "RHS length ({}) != matrix dimension ({})",
                rhs.len(),
                self.dimension
            ));
        }
        if solution.len() != self.dimension {
            return Err(format!(
                "Solution length ({}) != matrix dimension ({})",
                solution.len(),
                self.dimension
            ));
        }

        // One column per coordinate axis
        let rhs_mat: faer::Mat<f64> = faer::Mat::from_fn(self.dimension, 3, |i, axis| rhs[i][axis]);

        // Solve using cached factorization: L L^T x = b
        let sol = llt.solve(&rhs_mat);

        for (i, out) in solution.iter_mut().enumerate() {
            *out = DVec3::new(sol[(i, 0)], sol[(i, 1)], sol[(i, 2)]);
        }

        if solution.iter().any(|p| !p.is_finite()) {
            return Err("Solution contains non-finite values".into());
        }

        Ok(())
    }

    fn is_factorized(&self) -> bool {
        self.factorization.is_some()
    }

    fn reset(&mut self) {
        self.factorization = None;
        self.dimension = 0;
    }
}
