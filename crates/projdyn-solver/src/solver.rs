//! Projective Dynamics solver.
//!
//! Implements the local/global iteration loop:
//! 1. **Predict**: `s = p + dt·v + dt²·M⁻¹·f_ext`
//! 2. **Local step**: project every constraint onto its manifold
//! 3. **Global step**: solve the prefactored SPD system `A p' = rhs`
//! 4. **Repeat** steps 2–3 for the configured number of iterations
//! 5. **Finalize**: `v = (p' − p)/dt`, then `p = p'`
//!
//! Fixed vertices carry the sentinel mass and are solved like any other
//! vertex; their huge `m/dt²` diagonal keeps them at the prediction.
//!
//! # Lifecycle
//!
//! ```text
//! Uninitialized ──set_model──▶ Dirty ──step (factorize)──▶ Clean
//!                               ▲                            │
//!                               └──set_dirty / generation ───┘
//!                                  or timestep change
//! ```

use std::time::Instant;

use projdyn_constraint::Projection;
use projdyn_math::faer_solver::FaerSolver;
use projdyn_math::sparse::SparseSolver;
use projdyn_math::DVec3;
use projdyn_mesh::DeformableMesh;
use projdyn_types::{ModelId, PdError, PdResult};

use crate::assembly::{assemble_rhs, assemble_system_matrix, predict, project_constraints};
use crate::config::StepParams;
use crate::forces::ExternalForces;

/// Factorization state of the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverState {
    /// No mesh bound.
    Uninitialized,
    /// Bound, but the cached factorization is missing or stale.
    Dirty,
    /// The cached factorization matches the bound mesh.
    Clean,
}

/// Statistics of one completed step.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Local/global iterations performed.
    pub iterations: u32,
    /// RMS position change of the last global solve.
    pub final_residual: f64,
    /// Total constraint energy seen by the last local step.
    pub constraint_energy: f64,
    /// Whether this step had to refactorize the system matrix.
    pub refactorized: bool,
    /// Wall-clock time for this step (seconds).
    pub wall_time: f64,
}

/// Outcome of [`ProjectiveDynamicsSolver::step`].
#[derive(Debug, Clone)]
pub enum StepOutcome {
    /// No usable model is bound; nothing was touched.
    NotReady,
    Stepped(StepResult),
}

impl StepOutcome {
    pub fn is_stepped(&self) -> bool {
        matches!(self, Self::Stepped(_))
    }

    pub fn result(&self) -> Option<&StepResult> {
        match self {
            Self::Stepped(r) => Some(r),
            Self::NotReady => None,
        }
    }
}

/// What the cached factorization was built from.
#[derive(Debug, Clone, Copy, PartialEq)]
struct FactorKey {
    generation: u64,
    vertex_count: usize,
    dt: f64,
}

/// Prefactored local/global Projective Dynamics solver.
///
/// Uses `faer` for the sparse Cholesky factorization, which is reused
/// across steps until the solver is marked dirty or the bound mesh's
/// generation or the timestep changes.
pub struct ProjectiveDynamicsSolver {
    state: SolverState,
    model: Option<ModelId>,
    key: Option<FactorKey>,
    solver: FaerSolver,
    factorizations: u64,

    // Scratch buffers, reused across steps.
    predicted: Vec<DVec3>,
    current: Vec<DVec3>,
    solution: Vec<DVec3>,
    rhs: Vec<DVec3>,
    projections: Vec<Projection>,
}

impl ProjectiveDynamicsSolver {
    /// Creates an unbound solver.
    pub fn new() -> Self {
        Self {
            state: SolverState::Uninitialized,
            model: None,
            key: None,
            solver: FaerSolver::new(),
            factorizations: 0,
            predicted: Vec::new(),
            current: Vec::new(),
            solution: Vec::new(),
            rhs: Vec::new(),
            projections: Vec::new(),
        }
    }

    /// Binds the solver to `mesh`. The next step factorizes.
    pub fn set_model(&mut self, mesh: &DeformableMesh) {
        self.model = Some(mesh.id());
        self.key = None;
        self.solver.reset();
        self.state = SolverState::Dirty;
        tracing::debug!(
            model = mesh.id().get(),
            vertices = mesh.vertex_count(),
            constraints = mesh.constraints().len(),
            "solver bound to model"
        );
    }

    /// Forces a refactorization on the next step.
    pub fn set_dirty(&mut self) {
        if self.state != SolverState::Uninitialized {
            self.state = SolverState::Dirty;
        }
    }

    #[inline]
    pub fn state(&self) -> SolverState {
        self.state
    }

    #[inline]
    pub fn is_clean(&self) -> bool {
        self.state == SolverState::Clean
    }

    /// Number of successful factorizations since construction.
    #[inline]
    pub fn factorization_count(&self) -> u64 {
        self.factorizations
    }

    /// Id of the bound mesh.
    #[inline]
    pub fn model(&self) -> Option<ModelId> {
        self.model
    }

    /// True if `mesh` is the bound, non-empty model.
    pub fn is_ready_for(&self, mesh: &DeformableMesh) -> bool {
        self.model == Some(mesh.id()) && !mesh.is_empty()
    }

    /// Advances `mesh` by one timestep.
    ///
    /// Returns [`StepOutcome::NotReady`] without touching any state when no
    /// model is bound, `mesh` is not the bound model, or it is empty.
    pub fn step(
        &mut self,
        mesh: &mut DeformableMesh,
        params: &StepParams,
        forces: &ExternalForces,
    ) -> PdResult<StepOutcome> {
        if !self.is_ready_for(mesh) {
            tracing::debug!(state = ?self.state, "step skipped, model not ready");
            return Ok(StepOutcome::NotReady);
        }
        params.validate()?;

        let n = mesh.vertex_count();
        if !forces.is_empty() && forces.len() != n {
            return Err(PdError::InvalidConfig(format!(
                "external force count ({}) != vertex count ({})",
                forces.len(),
                n
            )));
        }

        let start = Instant::now();
        let refactorized = self.ensure_factorized(mesh, params.dt)?;
        let dt = params.dt;

        predict(
            mesh.positions(),
            mesh.velocities(),
            mesh.masses(),
            forces.as_slice(),
            dt,
            &mut self.predicted,
        );
        self.current.clear();
        self.current.extend_from_slice(&self.predicted);
        self.solution.resize(n, DVec3::ZERO);

        let constraints = mesh.constraints();
        let mut final_residual = 0.0;
        let mut constraint_energy = 0.0;

        for _ in 0..params.iterations {
            constraint_energy =
                project_constraints(constraints, &self.current, &mut self.projections);
            assemble_rhs(
                mesh.masses(),
                dt,
                &self.predicted,
                constraints,
                &self.projections,
                &mut self.rhs,
            );

            self.solver
                .solve(&self.rhs, &mut self.solution)
                .map_err(PdError::SolveFailed)?;

            let diff_sq: f64 = self
                .solution
                .iter()
                .zip(&self.current)
                .map(|(a, b)| a.distance_squared(*b))
                .sum();
            final_residual = (diff_sq / n as f64).sqrt();

            std::mem::swap(&mut self.current, &mut self.solution);
        }

        let keep = 1.0 - params.damping;
        let (positions, velocities) = mesh.state_mut();
        for ((p, v), &next) in positions.iter_mut().zip(velocities.iter_mut()).zip(&self.current) {
            *v = keep * (next - *p) / dt;
            *p = next;
        }

        let result = StepResult {
            iterations: params.iterations,
            final_residual,
            constraint_energy,
            refactorized,
            wall_time: start.elapsed().as_secs_f64(),
        };
        tracing::trace!(
            iterations = result.iterations,
            residual = result.final_residual,
            energy = result.constraint_energy,
            refactorized,
            "step complete"
        );
        Ok(StepOutcome::Stepped(result))
    }

    /// Refactorizes if dirty or stale. Returns whether it did.
    fn ensure_factorized(&mut self, mesh: &DeformableMesh, dt: f64) -> PdResult<bool> {
        let key = FactorKey {
            generation: mesh.generation(),
            vertex_count: mesh.vertex_count(),
            dt,
        };
        if self.state == SolverState::Clean && self.key == Some(key) {
            return Ok(false);
        }

        let start = Instant::now();
        let matrix = assemble_system_matrix(mesh.masses(), dt, mesh.constraints());
        if let Err(e) = self.solver.factorize(&matrix) {
            self.key = None;
            self.state = SolverState::Dirty;
            tracing::warn!(error = %e, "system matrix factorization failed");
            return Err(PdError::FactorizationFailed(e));
        }

        self.key = Some(key);
        self.state = SolverState::Clean;
        self.factorizations += 1;
        tracing::debug!(
            n = matrix.rows,
            nnz = matrix.nnz(),
            constraints = mesh.constraints().len(),
            generation = key.generation,
            dt,
            elapsed_ms = start.elapsed().as_secs_f64() * 1e3,
            "factorized system matrix"
        );
        Ok(true)
    }
}

impl Default for ProjectiveDynamicsSolver {
    fn default() -> Self {
        Self::new()
    }
}
