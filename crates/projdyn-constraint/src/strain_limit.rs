//! Strain-limiting constraint.
//!
//! Clamps the principal stretches of `F` into `[min, max]`:
//! `T = U · clamp(Σ) · Vᵀ`. Inside the band the energy is zero.

use projdyn_math::decomposition::clamp_singular_values;
use projdyn_math::DVec3;
use projdyn_types::{PdError, PdResult};

use crate::constraint::{validate_weight, Projection, Target};
use crate::tetrahedron::RestTetrahedron;

/// Keeps principal stretches within a band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrainLimitConstraint {
    pub tet: RestTetrahedron,
    pub weight: f64,
    pub min: f64,
    pub max: f64,
}

impl StrainLimitConstraint {
    /// Fails with [`PdError::InvalidStrainBounds`] unless `0 < min ≤ max`.
    pub fn new(
        element: usize,
        indices: [usize; 4],
        rest: &[DVec3],
        weight: f64,
        min: f64,
        max: f64,
    ) -> PdResult<Self> {
        let weight = validate_weight(weight)?;
        if !(min > 0.0 && min <= max && max.is_finite()) {
            return Err(PdError::InvalidStrainBounds { min, max });
        }
        Ok(Self {
            tet: RestTetrahedron::new(element, indices, rest)?,
            weight,
            min,
            max,
        })
    }

    #[inline]
    pub fn effective_weight(&self) -> f64 {
        self.weight * self.tet.rest_volume
    }

    pub fn project(&self, positions: &[DVec3]) -> Projection {
        let f = self.tet.deformation_gradient(positions);
        let target = clamp_singular_values(&f, self.min, self.max);
        Projection {
            target: Target::Gradient(target),
            energy: self.tet.energy(self.effective_weight(), &f, &target),
        }
    }
}
