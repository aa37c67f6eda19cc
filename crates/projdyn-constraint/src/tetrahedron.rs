//! Rest-state data shared by the deformation-gradient family.
//!
//! For a tetrahedron with vertices `x0..x3` the deformation gradient is
//!
//! ```text
//! F = Ds · Dm⁻¹,   Ds = [x1-x0, x2-x0, x3-x0]
//!   = Σₖ xₖ gₖᵀ
//! ```
//!
//! where `g1..g3` are the rows of `Dm⁻¹` and `g0 = -(g1 + g2 + g3)`.
//! The `gₖ` form the constant operator `Aᵢ` of the Projective Dynamics
//! energy `w/2 ‖F − T‖²`, so the system-matrix block is `w gₐ·g_b` and the
//! right-hand side for vertex `k` is `w T gₖ`.

use projdyn_math::decomposition::{deformation_gradient, edge_matrix};
use projdyn_math::{DMat3, DVec3};
use projdyn_types::constants::{DEGENERATE_LENGTH_THRESHOLD, DEGENERATE_VOLUME_RATIO};
use projdyn_types::{PdError, PdResult};

use crate::constraint::check_vertex;

/// Precomputed rest-state data for a single tetrahedron.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RestTetrahedron {
    /// Tetrahedron vertex indices (into the global vertex buffer).
    pub indices: [usize; 4],
    /// Inverse of the rest-state edge matrix `Dm`.
    pub dm_inv: DMat3,
    /// Unsigned rest volume.
    pub rest_volume: f64,
    /// Gradient operator rows `g0..g3`.
    pub gradients: [DVec3; 4],
}

impl RestTetrahedron {
    /// Precomputes rest data from rest positions.
    ///
    /// `element` is only used to label the error of a degenerate tetrahedron.
    pub fn new(element: usize, indices: [usize; 4], rest: &[DVec3]) -> PdResult<Self> {
        for &i in &indices {
            check_vertex(i, rest.len())?;
        }

        let p = indices.map(|i| rest[i]);
        let dm = edge_matrix(p[0], p[1], p[2], p[3]);
        let det = dm.determinant();
        let volume = det.abs() / 6.0;

        let mut longest: f64 = 0.0;
        for a in 0..4 {
            for b in (a + 1)..4 {
                longest = longest.max(p[a].distance(p[b]));
            }
        }

        let degenerate = !det.is_finite()
            || longest < DEGENERATE_LENGTH_THRESHOLD
            || det.abs() <= DEGENERATE_VOLUME_RATIO * longest.powi(3);
        if degenerate {
            return Err(PdError::DegenerateElement { element, volume });
        }

        let dm_inv = dm.inverse();
        let g1 = dm_inv.row(0);
        let g2 = dm_inv.row(1);
        let g3 = dm_inv.row(2);

        Ok(Self {
            indices,
            dm_inv,
            rest_volume: volume,
            gradients: [-(g1 + g2 + g3), g1, g2, g3],
        })
    }

    /// Deformation gradient of the current configuration.
    pub fn deformation_gradient(&self, positions: &[DVec3]) -> DMat3 {
        let [i0, i1, i2, i3] = self.indices;
        let ds = edge_matrix(positions[i0], positions[i1], positions[i2], positions[i3]);
        deformation_gradient(&ds, &self.dm_inv)
    }

    /// Appends `w gₐ·g_b` for every vertex pair.
    pub fn stiffness_triplets(&self, weight: f64, out: &mut Vec<(usize, usize, f64)>) {
        for a in 0..4 {
            for b in 0..4 {
                let value = weight * self.gradients[a].dot(self.gradients[b]);
                out.push((self.indices[a], self.indices[b], value));
            }
        }
    }

    /// Adds `w T gₖ` to the right-hand side of each vertex.
    pub fn accumulate_rhs(&self, weight: f64, target: &DMat3, rhs: &mut [DVec3]) {
        for (k, &i) in self.indices.iter().enumerate() {
            rhs[i] += weight * (*target * self.gradients[k]);
        }
    }

    /// `w/2 ‖F − T‖²_F`
    pub fn energy(&self, weight: f64, f: &DMat3, target: &DMat3) -> f64 {
        let diff = *f - *target;
        let norm_sq = diff.x_axis.length_squared()
            + diff.y_axis.length_squared()
            + diff.z_axis.length_squared();
        0.5 * weight * norm_sq
    }
}
