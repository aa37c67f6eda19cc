//! # projdyn-constraint
//!
//! Projective Dynamics constraints and their local projections.
//!
//! ## Design
//!
//! [`Constraint`] is a closed set of variants sharing one contract:
//!
//! - `vertices()`: the vertex rows the constraint reads
//! - `project(positions)`: the nearest point on the constraint manifold
//! - `stiffness_triplets()`: the constant `wᵢ AᵢᵀAᵢ` system-matrix term
//! - `accumulate_rhs()`: the per-iteration `wᵢ Aᵢᵀ Bᵢ pᵢ` right-hand side
//!
//! Volumetric variants share [`RestTetrahedron`], which stores the rest
//! edge-matrix inverse and the gradient operator of one tetrahedron.

pub mod constraint;
pub mod corotated;
pub mod deformation_gradient;
pub mod edge_length;
pub mod positional;
pub mod shape_targeting;
pub mod strain_limit;
pub mod tetrahedron;

pub use constraint::{Constraint, ConstraintKind, Projection, Target};
pub use corotated::CorotatedConstraint;
pub use deformation_gradient::DeformationGradientConstraint;
pub use edge_length::EdgeLengthConstraint;
pub use positional::PositionalConstraint;
pub use shape_targeting::ShapeTargetingConstraint;
pub use strain_limit::StrainLimitConstraint;
pub use tetrahedron::RestTetrahedron;
