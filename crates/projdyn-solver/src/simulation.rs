//! Frame driver owning a mesh, its solver and the step parameters.
//!
//! Mirrors what an interactive front end does every frame: assemble
//! gravity plus any pending drag force, step, and clear the drag. Pin
//! toggling and constraint rebuilding keep the solver's dirty flag in sync.

use projdyn_math::DVec3;
use projdyn_mesh::DeformableMesh;
use projdyn_types::constants::{
    DEFAULT_CONSTRAINT_WEIGHT, DEFAULT_DRAG_FORCE, DEFAULT_MASS_PER_PARTICLE,
    DEFAULT_POSITIONAL_WEIGHT, DEFAULT_STRAIN_MAX, DEFAULT_STRAIN_MIN,
};
use projdyn_types::PdResult;
use serde::{Deserialize, Serialize};

use crate::config::StepParams;
use crate::forces::{ExternalForces, PickRequest};
use crate::solver::{ProjectiveDynamicsSolver, StepOutcome};

/// Serializable description of one constraint factory call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConstraintSpec {
    EdgeLength {
        #[serde(default = "default_weight")]
        weight: f64,
    },
    DeformationGradient {
        #[serde(default = "default_weight")]
        weight: f64,
    },
    CorotatedDeformationGradient {
        #[serde(default = "default_weight")]
        weight: f64,
    },
    ShapeTargeting {
        #[serde(default = "default_weight")]
        weight: f64,
    },
    StrainLimit {
        #[serde(default = "default_strain_min")]
        min: f64,
        #[serde(default = "default_strain_max")]
        max: f64,
        #[serde(default = "default_weight")]
        weight: f64,
    },
    Positional {
        vertex: usize,
        #[serde(default = "default_positional_weight")]
        weight: f64,
    },
}

fn default_weight() -> f64 {
    DEFAULT_CONSTRAINT_WEIGHT
}

fn default_positional_weight() -> f64 {
    DEFAULT_POSITIONAL_WEIGHT
}

fn default_strain_min() -> f64 {
    DEFAULT_STRAIN_MIN
}

fn default_strain_max() -> f64 {
    DEFAULT_STRAIN_MAX
}

impl ConstraintSpec {
    /// Runs the matching mesh factory. Returns the number of constraints added.
    pub fn apply(&self, mesh: &mut DeformableMesh) -> PdResult<usize> {
        match *self {
            Self::EdgeLength { weight } => mesh.constrain_edge_lengths(weight),
            Self::DeformationGradient { weight } => mesh.constrain_deformation_gradient(weight),
            Self::CorotatedDeformationGradient { weight } => {
                mesh.constrain_corotated_deformation_gradient(weight)
            }
            Self::ShapeTargeting { weight } => mesh.constrain_shape_targeting(weight),
            Self::StrainLimit { min, max, weight } => mesh.constrain_strain(min, max, weight),
            Self::Positional { vertex, weight } => mesh.add_positional_constraint(vertex, weight),
        }
    }
}

/// A mesh, its solver and the parameters used every frame.
pub struct Simulation {
    mesh: DeformableMesh,
    solver: ProjectiveDynamicsSolver,
    params: StepParams,
    mass_per_particle: f64,
    drag_force: f64,
    pending_pick: Option<PickRequest>,
    frames: u64,
}

impl Simulation {
    /// Takes ownership of `mesh` and binds a fresh solver to it.
    pub fn new(mesh: DeformableMesh, params: StepParams) -> Self {
        let mut solver = ProjectiveDynamicsSolver::new();
        solver.set_model(&mesh);
        Self {
            mesh,
            solver,
            params,
            mass_per_particle: DEFAULT_MASS_PER_PARTICLE,
            drag_force: DEFAULT_DRAG_FORCE,
            pending_pick: None,
            frames: 0,
        }
    }

    /// Mass given to a vertex when it is unpinned.
    pub fn with_mass_per_particle(mut self, mass: f64) -> Self {
        self.mass_per_particle = mass;
        self
    }

    /// Magnitude of the force applied by [`Simulation::drag`].
    pub fn with_drag_force(mut self, force: f64) -> Self {
        self.drag_force = force;
        self
    }

    #[inline]
    pub fn mesh(&self) -> &DeformableMesh {
        &self.mesh
    }

    /// Mutable mesh access. Matrix-affecting edits are picked up through
    /// the mesh generation on the next frame.
    #[inline]
    pub fn mesh_mut(&mut self) -> &mut DeformableMesh {
        &mut self.mesh
    }

    #[inline]
    pub fn solver(&self) -> &ProjectiveDynamicsSolver {
        &self.solver
    }

    #[inline]
    pub fn params(&self) -> &StepParams {
        &self.params
    }

    #[inline]
    pub fn params_mut(&mut self) -> &mut StepParams {
        &mut self.params
    }

    /// Frames stepped so far.
    #[inline]
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Whether a frame would actually step.
    pub fn is_model_ready(&self) -> bool {
        self.solver.is_ready_for(&self.mesh)
    }

    /// Replaces all constraints with the given set.
    ///
    /// Velocities are zeroed and the solver is marked dirty first. If a
    /// factory fails, the constraints added before it are kept and the
    /// error is returned.
    pub fn apply_constraints(&mut self, specs: &[ConstraintSpec]) -> PdResult<usize> {
        self.mesh.immobilize();
        self.mesh.clear_constraints();
        self.solver.set_dirty();

        let mut total = 0;
        for spec in specs {
            total += spec.apply(&mut self.mesh)?;
        }
        tracing::info!(
            constraints = total,
            vertices = self.mesh.vertex_count(),
            "applied constraint set"
        );
        Ok(total)
    }

    /// Pins or unpins `vertex`. Returns the new fixed state.
    pub fn toggle_pin(&mut self, vertex: usize) -> PdResult<bool> {
        let fixed = self.mesh.toggle_fixed(vertex, self.mass_per_particle)?;
        self.solver.set_dirty();
        Ok(fixed)
    }

    /// Queues a one-frame drag force on `vertex` along `direction`.
    ///
    /// The direction is normalized; a zero direction queues no force.
    pub fn drag(&mut self, vertex: usize, direction: DVec3) -> PdResult<()> {
        self.mesh.check_vertex(vertex)?;
        let force = direction.normalize_or_zero() * self.drag_force;
        self.pending_pick = (force != DVec3::ZERO).then_some(PickRequest { vertex, force });
        Ok(())
    }

    /// The queued drag request, if any.
    pub fn pending_pick(&self) -> Option<&PickRequest> {
        self.pending_pick.as_ref()
    }

    /// Captures the current shape as the target of shape-targeting constraints.
    pub fn set_target_shape(&mut self) -> usize {
        self.mesh.set_target_shape()
    }

    /// Moves the mesh back to rest and drops any pending drag.
    pub fn reset(&mut self) {
        self.mesh.reset_to_rest();
        self.pending_pick = None;
    }

    /// Steps one frame with gravity and the pending drag force.
    pub fn frame(&mut self) -> PdResult<StepOutcome> {
        if !self.is_model_ready() {
            return Ok(StepOutcome::NotReady);
        }
        let pick = self.pending_pick.take();
        let forces = ExternalForces::assemble(&self.mesh, &self.params, pick.as_ref())?;
        let outcome = self.solver.step(&mut self.mesh, &self.params, &forces)?;
        if outcome.is_stepped() {
            self.frames += 1;
        }
        Ok(outcome)
    }
}
