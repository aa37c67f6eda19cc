//! # projdyn-mesh
//!
//! Deformable mesh model for Projective Dynamics.
//!
//! ## Key Types
//!
//! - [`DeformableMesh`]: rest and current geometry, per-vertex mass,
//!   velocity and fixed flags, and the ordered constraint arena.
//!   Factory methods (`constrain_*`) populate constraints from the rest state.
//! - [`topology`]: unique edges and tetrahedral boundary surfaces.
//! - Fixture generators (cloth grid, tetrahedral bar, single tetrahedron).

pub mod constrain;
pub mod generators;
pub mod mesh;
pub mod topology;

pub use mesh::DeformableMesh;
