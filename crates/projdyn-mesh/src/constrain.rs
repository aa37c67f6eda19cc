//! Constraint factories.
//!
//! Each factory builds its constraints from the rest state into a scratch
//! list first and only appends on success, so a failing call leaves the
//! mesh untouched. Factories return the number of constraints appended.

use projdyn_constraint::{
    Constraint, ConstraintKind, CorotatedConstraint, DeformationGradientConstraint,
    EdgeLengthConstraint, PositionalConstraint, ShapeTargetingConstraint, StrainLimitConstraint,
};
use projdyn_math::DVec3;
use projdyn_types::{PdError, PdResult};

use crate::mesh::DeformableMesh;
use crate::topology::unique_edges;

impl DeformableMesh {
    /// One edge-length constraint per unique edge of faces and tetrahedra.
    pub fn constrain_edge_lengths(&mut self, weight: f64) -> PdResult<usize> {
        let rest = self.rest_positions();
        let built = unique_edges(self.faces(), self.elements())
            .into_iter()
            .map(|[a, b]| EdgeLengthConstraint::new(a, b, rest, weight).map(Constraint::EdgeLength))
            .collect::<PdResult<Vec<_>>>()?;
        Ok(self.append(ConstraintKind::EdgeLength, built))
    }

    /// One deformation-gradient constraint per tetrahedron.
    pub fn constrain_deformation_gradient(&mut self, weight: f64) -> PdResult<usize> {
        self.constrain_elements(ConstraintKind::DeformationGradient, |e, tet, rest| {
            DeformationGradientConstraint::new(e, tet, rest, weight)
                .map(Constraint::DeformationGradient)
        })
    }

    /// One corotated deformation-gradient constraint per tetrahedron.
    pub fn constrain_corotated_deformation_gradient(&mut self, weight: f64) -> PdResult<usize> {
        self.constrain_elements(ConstraintKind::CorotatedDeformationGradient, |e, tet, rest| {
            CorotatedConstraint::new(e, tet, rest, weight)
                .map(Constraint::CorotatedDeformationGradient)
        })
    }

    /// One shape-targeting constraint per tetrahedron, targeting the rest shape.
    pub fn constrain_shape_targeting(&mut self, weight: f64) -> PdResult<usize> {
        self.constrain_elements(ConstraintKind::ShapeTargeting, |e, tet, rest| {
            ShapeTargetingConstraint::new(e, tet, rest, weight).map(Constraint::ShapeTargeting)
        })
    }

    /// One strain-limit constraint per tetrahedron.
    pub fn constrain_strain(&mut self, min: f64, max: f64, weight: f64) -> PdResult<usize> {
        self.constrain_elements(ConstraintKind::StrainLimit, |e, tet, rest| {
            StrainLimitConstraint::new(e, tet, rest, weight, min, max).map(Constraint::StrainLimit)
        })
    }

    /// Softly pins `vertex` to its rest position.
    pub fn add_positional_constraint(&mut self, vertex: usize, weight: f64) -> PdResult<usize> {
        let c = PositionalConstraint::new(vertex, self.rest_positions(), weight)?;
        Ok(self.append(ConstraintKind::Positional, vec![Constraint::Positional(c)]))
    }

    /// Appends a prebuilt constraint after checking its vertex indices.
    pub fn add_constraint(&mut self, constraint: Constraint) -> PdResult<()> {
        for &v in constraint.vertices() {
            self.check_vertex(v)?;
        }
        self.append(constraint.kind(), vec![constraint]);
        Ok(())
    }

    fn constrain_elements<F>(&mut self, kind: ConstraintKind, build: F) -> PdResult<usize>
    where
        F: Fn(usize, [usize; 4], &[DVec3]) -> PdResult<Constraint>,
    {
        if self.elements().is_empty() {
            return Err(PdError::Unsupported(format!(
                "{kind} constraints need tetrahedra, mesh has none"
            )));
        }
        let rest = self.rest_positions();
        let built = self
            .elements()
            .iter()
            .enumerate()
            .map(|(e, &tet)| build(e, tet, rest))
            .collect::<PdResult<Vec<_>>>()?;
        Ok(self.append(kind, built))
    }

    fn append(&mut self, kind: ConstraintKind, built: Vec<Constraint>) -> usize {
        let count = built.len();
        self.constraints.extend(built);
        self.bump();
        tracing::debug!(%kind, count, total = self.constraints.len(), "added constraints");
        count
    }
}
