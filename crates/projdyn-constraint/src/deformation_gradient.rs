//! Deformation-gradient constraint (as-rigid-as-possible).
//!
//! Projects `F` onto the nearest rotation, `R` of the polar decomposition
//! `F = R·S`. Energy: `E = w/2 · ‖F − R‖²_F`.

use projdyn_math::decomposition::polar_rotation;
use projdyn_math::DVec3;
use projdyn_types::PdResult;

use crate::constraint::{validate_weight, Projection, Target};
use crate::tetrahedron::RestTetrahedron;

/// Keeps a tetrahedron rigid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeformationGradientConstraint {
    pub tet: RestTetrahedron,
    pub weight: f64,
}

impl DeformationGradientConstraint {
    pub fn new(element: usize, indices: [usize; 4], rest: &[DVec3], weight: f64) -> PdResult<Self> {
        let weight = validate_weight(weight)?;
        Ok(Self {
            tet: RestTetrahedron::new(element, indices, rest)?,
            weight,
        })
    }

    /// Weight scaled by the rest volume.
    #[inline]
    pub fn effective_weight(&self) -> f64 {
        self.weight * self.tet.rest_volume
    }

    pub fn project(&self, positions: &[DVec3]) -> Projection {
        let f = self.tet.deformation_gradient(positions);
        let target = polar_rotation(&f);
        Projection {
            target: Target::Gradient(target),
            energy: self.tet.energy(self.effective_weight(), &f, &target),
        }
    }
}
