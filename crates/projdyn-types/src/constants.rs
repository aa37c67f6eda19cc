//! Physical constants and simulation defaults.

use crate::Scalar;

/// Gravitational acceleration (m/s²).
pub const GRAVITY: Scalar = 9.8;

/// Default simulation timestep (seconds). 1/60th of a second.
pub const DEFAULT_DT: Scalar = 1.0 / 60.0;

/// Default number of local/global iterations per timestep.
pub const DEFAULT_PD_ITERATIONS: u32 = 10;

/// Mass assigned to fixed vertices. Large enough that the global solve
/// keeps them in place without a dedicated equation.
pub const FIXED_VERTEX_MASS: Scalar = 1.0e10;

/// Default per-particle mass restored when a vertex is unpinned by the driver.
pub const DEFAULT_MASS_PER_PARTICLE: Scalar = 10.0;

/// Default weight for edge-length and deformation-gradient family constraints.
pub const DEFAULT_CONSTRAINT_WEIGHT: Scalar = 1.0e6;

/// Default weight for positional (soft pin) constraints.
pub const DEFAULT_POSITIONAL_WEIGHT: Scalar = 1.0e9;

/// Default lower singular-value bound for strain limiting.
pub const DEFAULT_STRAIN_MIN: Scalar = 0.99;

/// Default upper singular-value bound for strain limiting.
pub const DEFAULT_STRAIN_MAX: Scalar = 1.01;

/// Default magnitude of the interactive dragging force.
pub const DEFAULT_DRAG_FORCE: Scalar = 4000.0;

/// Edges shorter than this at rest are rejected as degenerate.
pub const DEGENERATE_LENGTH_THRESHOLD: Scalar = 1.0e-12;

/// Tetrahedra whose rest edge-matrix determinant is below this fraction of
/// the cube of their longest edge are rejected as degenerate.
pub const DEGENERATE_VOLUME_RATIO: Scalar = 1.0e-10;

/// Singular values below this are treated as collapsed.
pub const SINGULAR_VALUE_EPSILON: Scalar = 1.0e-8;
