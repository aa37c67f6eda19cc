//! # projdyn-math
//!
//! Linear algebra primitives for the projdyn engine.
//!
//! Provides:
//! - Re-exports of `glam` double-precision types (`DVec3`, `DMat3`)
//! - Proper-rotation SVD, polar decomposition and singular-value projections
//! - Sparse matrix representation (CSR) and a `faer`-backed Cholesky solver

pub mod decomposition;
pub mod faer_solver;
pub mod sparse;

// Re-export glam types as the canonical math types for projdyn.
pub use glam::{DMat3, DQuat, DVec3};
