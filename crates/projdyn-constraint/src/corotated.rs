//! Corotated deformation-gradient constraint.
//!
//! Instead of snapping to a pure rotation, the target keeps the direction
//! of stretch and only restores volume: `T = U · (Σ / ∛det Σ) · Vᵀ`, which
//! has unit determinant. Shear is allowed, volume change is penalized.
//! A collapsed element falls back to the polar rotation.

use projdyn_math::decomposition::volume_preserving_fit;
use projdyn_math::DVec3;
use projdyn_types::PdResult;

use crate::constraint::{validate_weight, Projection, Target};
use crate::tetrahedron::RestTetrahedron;

/// Volume-preserving variant of the deformation-gradient constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorotatedConstraint {
    pub tet: RestTetrahedron,
    pub weight: f64,
}

impl CorotatedConstraint {
    pub fn new(element: usize, indices: [usize; 4], rest: &[DVec3], weight: f64) -> PdResult<Self> {
        let weight = validate_weight(weight)?;
        Ok(Self {
            tet: RestTetrahedron::new(element, indices, rest)?,
            weight,
        })
    }

    #[inline]
    pub fn effective_weight(&self) -> f64 {
        self.weight * self.tet.rest_volume
    }

    pub fn project(&self, positions: &[DVec3]) -> Projection {
        let f = self.tet.deformation_gradient(positions);
        let target = volume_preserving_fit(&f);
        Projection {
            target: Target::Gradient(target),
            energy: self.tet.energy(self.effective_weight(), &f, &target),
        }
    }
}
