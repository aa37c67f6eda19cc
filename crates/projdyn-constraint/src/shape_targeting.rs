//! Shape-targeting constraint.
//!
//! Drives a tetrahedron toward a stored target transform `T` up to a
//! rotation: the target is `R·T` where `R` is the polar rotation of `F·Tᵀ`.
//! With `T = I` this reduces to the as-rigid-as-possible constraint.

use projdyn_math::decomposition::polar_rotation;
use projdyn_math::{DMat3, DVec3};
use projdyn_types::{PdError, PdResult};

use crate::constraint::{validate_weight, Projection, Target};
use crate::tetrahedron::RestTetrahedron;

/// Pulls a tetrahedron toward a captured shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeTargetingConstraint {
    pub tet: RestTetrahedron,
    pub weight: f64,
    /// Target transform relative to the rest shape.
    pub target_transform: DMat3,
}

impl ShapeTargetingConstraint {
    pub fn new(element: usize, indices: [usize; 4], rest: &[DVec3], weight: f64) -> PdResult<Self> {
        let weight = validate_weight(weight)?;
        Ok(Self {
            tet: RestTetrahedron::new(element, indices, rest)?,
            weight,
            target_transform: DMat3::IDENTITY,
        })
    }

    #[inline]
    pub fn effective_weight(&self) -> f64 {
        self.weight * self.tet.rest_volume
    }

    /// Captures the current deformation as the new target shape.
    pub fn set_target_shape(&mut self, positions: &[DVec3]) {
        self.target_transform = self.tet.deformation_gradient(positions);
    }

    /// Sets the target transform directly.
    pub fn set_target_transform(&mut self, transform: DMat3) -> PdResult<()> {
        if !transform.is_finite() {
            return Err(PdError::InvalidConfig(
                "shape target transform must be finite".into(),
            ));
        }
        self.target_transform = transform;
        Ok(())
    }

    pub fn project(&self, positions: &[DVec3]) -> Projection {
        let f = self.tet.deformation_gradient(positions);
        let rotation = polar_rotation(&(f * self.target_transform.transpose()));
        let target = rotation * self.target_transform;
        Projection {
            target: Target::Gradient(target),
            energy: self.tet.energy(self.effective_weight(), &f, &target),
        }
    }
}
