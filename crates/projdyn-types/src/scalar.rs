//! Scalar type alias for the simulation.
//!
//! The engine runs in double precision: fixed vertices are encoded with a
//! sentinel mass of `1e10`, and the system matrix mixes that with stiffness
//! weights around `1e6` and inertia terms around `1e3`. Single precision
//! cannot hold those magnitudes side by side.

/// The floating-point type used throughout the simulation.
pub type Scalar = f64;
