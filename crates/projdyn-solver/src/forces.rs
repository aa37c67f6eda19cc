//! External force field fed to the solver.
//!
//! The gravity field is the same force `g` on every vertex, fixed ones
//! included, so the predicted displacement over one step is `dt²·g/m`.
//! Pinned vertices stay put through their sentinel mass alone. A pick
//! request from the interaction layer is superposed on top.

use projdyn_math::DVec3;
use projdyn_mesh::DeformableMesh;
use projdyn_types::{PdError, PdResult};
use serde::{Deserialize, Serialize};

use crate::config::StepParams;

/// A force applied to one vertex for one frame (mouse drag).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PickRequest {
    pub vertex: usize,
    pub force: DVec3,
}

/// Per-vertex external forces. An empty field means no forces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExternalForces {
    forces: Vec<DVec3>,
}

impl ExternalForces {
    /// No external forces.
    pub fn none() -> Self {
        Self::default()
    }

    /// Zero forces for `n` vertices.
    pub fn zeros(n: usize) -> Self {
        Self {
            forces: vec![DVec3::ZERO; n],
        }
    }

    /// Wraps an explicit per-vertex force vector.
    pub fn from_vec(forces: Vec<DVec3>) -> Self {
        Self { forces }
    }

    /// Gravity (if enabled in `params`) plus an optional pick force.
    pub fn assemble(
        mesh: &DeformableMesh,
        params: &StepParams,
        pick: Option<&PickRequest>,
    ) -> PdResult<Self> {
        let mut forces = Self::zeros(mesh.vertex_count());
        forces.add_gravity(mesh, params.gravity_vector())?;
        if let Some(pick) = pick {
            forces.apply_pick(pick)?;
        }
        Ok(forces)
    }

    /// Adds the uniform gravity force to every vertex of `mesh`.
    ///
    /// The field must already hold one entry per vertex.
    pub fn add_gravity(&mut self, mesh: &DeformableMesh, gravity: DVec3) -> PdResult<()> {
        if self.forces.len() != mesh.vertex_count() {
            return Err(PdError::InvalidConfig(format!(
                "Force count ({}) != vertex count ({})",
                self.forces.len(),
                mesh.vertex_count()
            )));
        }
        for f in &mut self.forces {
            *f += gravity;
        }
        Ok(())
    }

    /// Superposes a pick force.
    pub fn apply_pick(&mut self, pick: &PickRequest) -> PdResult<()> {
        let count = self.forces.len();
        let slot = self
            .forces
            .get_mut(pick.vertex)
            .ok_or(PdError::VertexOutOfRange {
                index: pick.vertex,
                count,
            })?;
        *slot += pick.force;
        Ok(())
    }

    #[inline]
    pub fn as_slice(&self) -> &[DVec3] {
        &self.forces
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.forces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.forces.is_empty()
    }

    /// Force on vertex `i`, zero if the field is empty.
    #[inline]
    pub fn get(&self, i: usize) -> DVec3 {
        self.forces.get(i).copied().unwrap_or(DVec3::ZERO)
    }
}
