//! Error types for the projdyn engine.
//!
//! All crates return `PdResult<T>` from fallible operations.

use thiserror::Error;

use crate::Scalar;

/// Unified error type for the projdyn engine.
#[derive(Debug, Error)]
pub enum PdError {
    /// Mesh data is malformed or inconsistent.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// A vertex index does not refer to a vertex of the mesh.
    #[error("Vertex {index} is out of range (vertex count: {count})")]
    VertexOutOfRange { index: usize, count: usize },

    /// A tetrahedron has (near) zero rest volume.
    #[error("Element {element} is degenerate (rest volume {volume:.3e})")]
    DegenerateElement { element: usize, volume: Scalar },

    /// An edge has (near) zero rest length.
    #[error("Edge ({a}, {b}) is degenerate (rest length {length:.3e})")]
    DegenerateEdge { a: usize, b: usize, length: Scalar },

    /// Constraint weight is negative or not finite.
    #[error("Invalid constraint weight: {0}")]
    InvalidWeight(Scalar),

    /// Strain limit bounds are not ordered or not positive.
    #[error("Invalid strain bounds: [{min}, {max}]")]
    InvalidStrainBounds { min: Scalar, max: Scalar },

    /// A vertex mass is not strictly positive and finite.
    #[error("Invalid mass {mass} for vertex {index}")]
    InvalidMass { index: usize, mass: Scalar },

    /// The constraint type cannot be built on this mesh.
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The system matrix could not be factorized (not positive definite).
    #[error("Factorization failed: {0}")]
    FactorizationFailed(String),

    /// Back-substitution against the cached factorization failed.
    #[error("Solve failed: {0}")]
    SolveFailed(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization failure.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Convenience alias for `Result<T, PdError>`.
pub type PdResult<T> = Result<T, PdError>;
