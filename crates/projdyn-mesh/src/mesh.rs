//! Deformable mesh: geometry, per-vertex state and the constraint arena.
//!
//! Per-vertex data is stored as parallel arrays indexed by vertex row:
//! rest positions, current positions, velocities, masses and fixed flags.
//! Every mutation that changes the global system matrix (constraint list,
//! masses, fixed flags) bumps [`DeformableMesh::generation`], which the
//! solver compares against the generation it last factorized.

use projdyn_constraint::{Constraint, ConstraintKind};
use projdyn_math::DVec3;
use projdyn_types::constants::FIXED_VERTEX_MASS;
use projdyn_types::{ModelId, PdError, PdResult};

/// A deformable body simulated with Projective Dynamics.
///
/// Cloning yields an independent body with a fresh [`ModelId`]; a solver
/// bound to the source does not accept the clone until it is rebound.
#[derive(Debug)]
pub struct DeformableMesh {
    id: ModelId,
    rest_positions: Vec<DVec3>,
    positions: Vec<DVec3>,
    velocities: Vec<DVec3>,
    masses: Vec<f64>,
    fixed: Vec<bool>,
    faces: Vec<[usize; 3]>,
    elements: Vec<[usize; 4]>,
    pub(crate) constraints: Vec<Constraint>,
    generation: u64,
}

impl Clone for DeformableMesh {
    fn clone(&self) -> Self {
        Self {
            id: ModelId::fresh(),
            rest_positions: self.rest_positions.clone(),
            positions: self.positions.clone(),
            velocities: self.velocities.clone(),
            masses: self.masses.clone(),
            fixed: self.fixed.clone(),
            faces: self.faces.clone(),
            elements: self.elements.clone(),
            constraints: self.constraints.clone(),
            generation: self.generation,
        }
    }
}

impl DeformableMesh {
    /// Creates a mesh with explicit per-vertex masses.
    ///
    /// The given positions become both the rest and the current state.
    /// Velocities start at zero and no vertex is fixed.
    pub fn new(
        positions: Vec<DVec3>,
        faces: Vec<[usize; 3]>,
        elements: Vec<[usize; 4]>,
        masses: Vec<f64>,
    ) -> PdResult<Self> {
        let n = positions.len();
        if masses.len() != n {
            return Err(PdError::InvalidMesh(format!(
                "Mass count ({}) != vertex count ({})",
                masses.len(),
                n
            )));
        }
        if let Some(i) = positions.iter().position(|p| !p.is_finite()) {
            return Err(PdError::InvalidMesh(format!(
                "Vertex {i} has a non-finite position"
            )));
        }
        for (index, &mass) in masses.iter().enumerate() {
            validate_mass(index, mass)?;
        }

        for (f, face) in faces.iter().enumerate() {
            check_indices("Face", f, face, n)?;
        }
        for (e, element) in elements.iter().enumerate() {
            check_indices("Element", e, element, n)?;
        }

        Ok(Self::from_parts(positions, faces, elements, masses))
    }

    /// Creates a mesh where every vertex has mass 1.
    pub fn with_unit_mass(
        positions: Vec<DVec3>,
        faces: Vec<[usize; 3]>,
        elements: Vec<[usize; 4]>,
    ) -> PdResult<Self> {
        Self::with_uniform_mass(positions, faces, elements, 1.0)
    }

    /// Creates a mesh where every vertex has the same mass.
    pub fn with_uniform_mass(
        positions: Vec<DVec3>,
        faces: Vec<[usize; 3]>,
        elements: Vec<[usize; 4]>,
        mass: f64,
    ) -> PdResult<Self> {
        let masses = vec![mass; positions.len()];
        Self::new(positions, faces, elements, masses)
    }

    /// Builds a mesh from already validated parts.
    pub(crate) fn from_parts(
        positions: Vec<DVec3>,
        faces: Vec<[usize; 3]>,
        elements: Vec<[usize; 4]>,
        masses: Vec<f64>,
    ) -> Self {
        let n = positions.len();
        Self {
            id: ModelId::fresh(),
            rest_positions: positions.clone(),
            positions,
            velocities: vec![DVec3::ZERO; n],
            masses,
            fixed: vec![false; n],
            faces,
            elements,
            constraints: Vec::new(),
            generation: 0,
        }
    }

    // --- Accessors ---

    #[inline]
    pub fn id(&self) -> ModelId {
        self.id
    }

    /// Revision counter of everything the system matrix depends on.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn rest_positions(&self) -> &[DVec3] {
        &self.rest_positions
    }

    #[inline]
    pub fn positions(&self) -> &[DVec3] {
        &self.positions
    }

    /// Current positions. Writing them does not invalidate the solver.
    #[inline]
    pub fn positions_mut(&mut self) -> &mut [DVec3] {
        &mut self.positions
    }

    #[inline]
    pub fn velocities(&self) -> &[DVec3] {
        &self.velocities
    }

    #[inline]
    pub fn velocities_mut(&mut self) -> &mut [DVec3] {
        &mut self.velocities
    }

    /// Positions and velocities together, for integrators that write both.
    pub fn state_mut(&mut self) -> (&mut [DVec3], &mut [DVec3]) {
        (&mut self.positions, &mut self.velocities)
    }

    #[inline]
    pub fn masses(&self) -> &[f64] {
        &self.masses
    }

    #[inline]
    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    /// Tetrahedra, empty for surface meshes.
    #[inline]
    pub fn elements(&self) -> &[[usize; 4]] {
        &self.elements
    }

    #[inline]
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Number of constraints of the given kind.
    pub fn constraint_count(&self, kind: ConstraintKind) -> usize {
        self.constraints.iter().filter(|c| c.kind() == kind).count()
    }

    #[inline]
    pub fn is_fixed(&self, index: usize) -> bool {
        self.fixed.get(index).copied().unwrap_or(false)
    }

    /// Indices of all fixed vertices, ascending.
    pub fn fixed_vertices(&self) -> Vec<usize> {
        self.fixed
            .iter()
            .enumerate()
            .filter_map(|(i, &f)| f.then_some(i))
            .collect()
    }

    /// Axis-aligned bounds of the rest shape, `None` for an empty mesh.
    pub fn rest_bounds(&self) -> Option<(DVec3, DVec3)> {
        let first = *self.rest_positions.first()?;
        Some(
            self.rest_positions
                .iter()
                .fold((first, first), |(lo, hi), &p| (lo.min(p), hi.max(p))),
        )
    }

    /// Diagonal length of the rest bounds.
    pub fn scale(&self) -> f64 {
        self.rest_bounds()
            .map(|(lo, hi)| lo.distance(hi))
            .unwrap_or(0.0)
    }

    // --- Pinning ---

    /// Pins vertex `index` by giving it the sentinel mass.
    ///
    /// Its velocity is zeroed so the pin holds the current position.
    pub fn fix(&mut self, index: usize) -> PdResult<()> {
        self.check_vertex(index)?;
        self.masses[index] = FIXED_VERTEX_MASS;
        self.fixed[index] = true;
        self.velocities[index] = DVec3::ZERO;
        self.bump();
        tracing::trace!(vertex = index, "fixed vertex");
        Ok(())
    }

    /// Releases vertex `index` with the given finite positive mass.
    pub fn unfix(&mut self, index: usize, mass: f64) -> PdResult<()> {
        self.check_vertex(index)?;
        validate_mass(index, mass)?;
        self.masses[index] = mass;
        self.fixed[index] = false;
        self.bump();
        tracing::trace!(vertex = index, mass, "unfixed vertex");
        Ok(())
    }

    /// Flips the fixed state of `index`; returns the new state.
    pub fn toggle_fixed(&mut self, index: usize, mass_when_unfixed: f64) -> PdResult<bool> {
        if self.is_fixed(index) {
            self.unfix(index, mass_when_unfixed)?;
            Ok(false)
        } else {
            self.fix(index)?;
            Ok(true)
        }
    }

    // --- State ---

    /// Zeroes all velocities.
    pub fn immobilize(&mut self) {
        self.velocities.fill(DVec3::ZERO);
    }

    /// Moves every vertex back to its rest position and zeroes velocities.
    pub fn reset_to_rest(&mut self) {
        self.positions.copy_from_slice(&self.rest_positions);
        self.immobilize();
    }

    /// Removes every constraint.
    pub fn clear_constraints(&mut self) {
        self.constraints.clear();
        self.bump();
    }

    /// Captures the current configuration as the target of every
    /// shape-targeting constraint. Returns how many were updated.
    pub fn set_target_shape(&mut self) -> usize {
        let positions = &self.positions;
        let mut updated = 0;
        for constraint in &mut self.constraints {
            if let Constraint::ShapeTargeting(c) = constraint {
                c.set_target_shape(positions);
                updated += 1;
            }
        }
        tracing::debug!(updated, "captured target shape");
        updated
    }

    /// Errors with `VertexOutOfRange` unless `index` is a vertex of this mesh.
    pub fn check_vertex(&self, index: usize) -> PdResult<()> {
        if index < self.vertex_count() {
            Ok(())
        } else {
            Err(PdError::VertexOutOfRange {
                index,
                count: self.vertex_count(),
            })
        }
    }

    pub(crate) fn bump(&mut self) {
        self.generation += 1;
    }
}

fn validate_mass(index: usize, mass: f64) -> PdResult<()> {
    if mass.is_finite() && mass > 0.0 {
        Ok(())
    } else {
        Err(PdError::InvalidMass { index, mass })
    }
}

fn check_indices<const N: usize>(
    what: &str,
    position: usize,
    indices: &[usize; N],
    count: usize,
) -> PdResult<()> {
    for &index in indices {
        if index >= count {
            return Err(PdError::VertexOutOfRange { index, count });
        }
    }
    for a in 0..N {
        for b in (a + 1)..N {
            if indices[a] == indices[b] {
                return Err(PdError::InvalidMesh(format!(
                    "{what} {position} has repeated vertex indices: {indices:?}"
                )));
            }
        }
    }
    Ok(())
}
