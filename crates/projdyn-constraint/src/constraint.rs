//! The constraint contract and its variant dispatch.

use std::fmt;

use projdyn_math::{DMat3, DVec3};
use projdyn_types::{PdError, PdResult};
use serde::{Deserialize, Serialize};

use crate::corotated::CorotatedConstraint;
use crate::deformation_gradient::DeformationGradientConstraint;
use crate::edge_length::EdgeLengthConstraint;
use crate::positional::PositionalConstraint;
use crate::shape_targeting::ShapeTargetingConstraint;
use crate::strain_limit::StrainLimitConstraint;

/// Local projection target `Bᵢ pᵢ` of one constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Target {
    /// Target location of a single vertex.
    Position(DVec3),
    /// Target edge vector `x_b - x_a`.
    EdgeVector(DVec3),
    /// Target deformation gradient of a tetrahedron.
    Gradient(DMat3),
}

/// Result of the local step for one constraint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Closest configuration on the constraint manifold.
    pub target: Target,
    /// Constraint energy `wᵢ/2 ‖Aᵢ x − Bᵢ pᵢ‖²` at the current positions.
    pub energy: f64,
}

/// Discriminant of [`Constraint`], used for counting and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintKind {
    EdgeLength,
    Positional,
    DeformationGradient,
    CorotatedDeformationGradient,
    ShapeTargeting,
    StrainLimit,
}

impl ConstraintKind {
    /// All kinds, in declaration order.
    pub fn all() -> &'static [ConstraintKind] {
        &[
            Self::EdgeLength,
            Self::Positional,
            Self::DeformationGradient,
            Self::CorotatedDeformationGradient,
            Self::ShapeTargeting,
            Self::StrainLimit,
        ]
    }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Self::EdgeLength => "edge_length",
            Self::Positional => "positional",
            Self::DeformationGradient => "deformation_gradient",
            Self::CorotatedDeformationGradient => "corotated_deformation_gradient",
            Self::ShapeTargeting => "shape_targeting",
            Self::StrainLimit => "strain_limit",
        }
    }

    /// True for the variants that need tetrahedral elements.
    pub fn is_volumetric(self) -> bool {
        !matches!(self, Self::EdgeLength | Self::Positional)
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A Projective Dynamics constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    EdgeLength(EdgeLengthConstraint),
    Positional(PositionalConstraint),
    DeformationGradient(DeformationGradientConstraint),
    CorotatedDeformationGradient(CorotatedConstraint),
    ShapeTargeting(ShapeTargetingConstraint),
    StrainLimit(StrainLimitConstraint),
}

impl Constraint {
    /// Returns which variant this is.
    pub fn kind(&self) -> ConstraintKind {
        match self {
            Self::EdgeLength(_) => ConstraintKind::EdgeLength,
            Self::Positional(_) => ConstraintKind::Positional,
            Self::DeformationGradient(_) => ConstraintKind::DeformationGradient,
            Self::CorotatedDeformationGradient(_) => ConstraintKind::CorotatedDeformationGradient,
            Self::ShapeTargeting(_) => ConstraintKind::ShapeTargeting,
            Self::StrainLimit(_) => ConstraintKind::StrainLimit,
        }
    }

    /// The stiffness weight `wᵢ` given at construction.
    pub fn weight(&self) -> f64 {
        match self {
            Self::EdgeLength(c) => c.weight,
            Self::Positional(c) => c.weight,
            Self::DeformationGradient(c) => c.weight,
            Self::CorotatedDeformationGradient(c) => c.weight,
            Self::ShapeTargeting(c) => c.weight,
            Self::StrainLimit(c) => c.weight,
        }
    }

    /// Vertex rows read by this constraint.
    pub fn vertices(&self) -> &[usize] {
        match self {
            Self::EdgeLength(c) => &c.vertices,
            Self::Positional(c) => std::slice::from_ref(&c.vertex),
            Self::DeformationGradient(c) => &c.tet.indices,
            Self::CorotatedDeformationGradient(c) => &c.tet.indices,
            Self::ShapeTargeting(c) => &c.tet.indices,
            Self::StrainLimit(c) => &c.tet.indices,
        }
    }

    /// Local step: projects the current configuration onto the manifold.
    pub fn project(&self, positions: &[DVec3]) -> Projection {
        match self {
            Self::EdgeLength(c) => c.project(positions),
            Self::Positional(c) => c.project(positions),
            Self::DeformationGradient(c) => c.project(positions),
            Self::CorotatedDeformationGradient(c) => c.project(positions),
            Self::ShapeTargeting(c) => c.project(positions),
            Self::StrainLimit(c) => c.project(positions),
        }
    }

    /// Energy of the current configuration.
    #[inline]
    pub fn energy(&self, positions: &[DVec3]) -> f64 {
        self.project(positions).energy
    }

    /// Appends the `wᵢ AᵢᵀAᵢ` entries of this constraint as `(row, col, value)`.
    pub fn stiffness_triplets(&self, out: &mut Vec<(usize, usize, f64)>) {
        match self {
            Self::EdgeLength(c) => c.stiffness_triplets(out),
            Self::Positional(c) => c.stiffness_triplets(out),
            Self::DeformationGradient(c) => c.tet.stiffness_triplets(c.effective_weight(), out),
            Self::CorotatedDeformationGradient(c) => {
                c.tet.stiffness_triplets(c.effective_weight(), out)
            }
            Self::ShapeTargeting(c) => c.tet.stiffness_triplets(c.effective_weight(), out),
            Self::StrainLimit(c) => c.tet.stiffness_triplets(c.effective_weight(), out),
        }
    }

    /// Adds `wᵢ Aᵢᵀ Bᵢ pᵢ` for a projection produced by this constraint.
    pub fn accumulate_rhs(&self, projection: &Projection, rhs: &mut [DVec3]) {
        match (self, &projection.target) {
            (Self::EdgeLength(c), Target::EdgeVector(edge)) => c.accumulate_rhs(*edge, rhs),
            (Self::Positional(c), Target::Position(p)) => c.accumulate_rhs(*p, rhs),
            (Self::DeformationGradient(c), Target::Gradient(t)) => {
                c.tet.accumulate_rhs(c.effective_weight(), t, rhs)
            }
            (Self::CorotatedDeformationGradient(c), Target::Gradient(t)) => {
                c.tet.accumulate_rhs(c.effective_weight(), t, rhs)
            }
            (Self::ShapeTargeting(c), Target::Gradient(t)) => {
                c.tet.accumulate_rhs(c.effective_weight(), t, rhs)
            }
            (Self::StrainLimit(c), Target::Gradient(t)) => {
                c.tet.accumulate_rhs(c.effective_weight(), t, rhs)
            }
            _ => debug_assert!(false, "projection does not belong to a {} constraint", self.kind()),
        }
    }
}

/// Rejects negative and non-finite weights.
pub(crate) fn validate_weight(weight: f64) -> PdResult<f64> {
    if weight.is_finite() && weight >= 0.0 {
        Ok(weight)
    } else {
        Err(PdError::InvalidWeight(weight))
    }
}

/// Rejects vertex indices outside `0..count`.
pub(crate) fn check_vertex(index: usize, count: usize) -> PdResult<()> {
    if index < count {
        Ok(())
    } else {
        Err(PdError::VertexOutOfRange { index, count })
    }
}
