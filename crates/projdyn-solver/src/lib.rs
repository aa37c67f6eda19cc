//! # projdyn-solver
//!
//! Prefactored local/global Projective Dynamics time integration.
//!
//! ## Key Types
//!
//! - [`ProjectiveDynamicsSolver`]: binds to a mesh, caches the Cholesky
//!   factorization and runs the local/global loop
//! - [`StepParams`]: timestep, iterations, gravity and damping
//! - [`ExternalForces`] / [`PickRequest`]: per-vertex force field
//! - [`Simulation`]: frame driver with pinning, dragging and constraint sets

pub mod assembly;
pub mod config;
pub mod forces;
pub mod simulation;
pub mod solver;

pub use config::StepParams;
pub use forces::{ExternalForces, PickRequest};
pub use simulation::{ConstraintSpec, Simulation};
pub use solver::{ProjectiveDynamicsSolver, SolverState, StepOutcome, StepResult};
