//! # projdyn-types
//!
//! Shared types, identifiers, error types, and physical constants
//! for the projdyn Projective Dynamics engine.
//!
//! This crate has zero domain logic. It defines the vocabulary
//! that all other projdyn crates share.

pub mod constants;
pub mod error;
pub mod ids;
pub mod scalar;

pub use error::{PdError, PdResult};
pub use ids::ModelId;
pub use scalar::Scalar;
