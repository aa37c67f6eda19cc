//! Positional constraint: softly pins a vertex to its rest position.
//!
//! Unlike hard fixing (sentinel mass), the vertex keeps its inertia and is
//! only pulled back with weight `wᵢ`.

use projdyn_math::DVec3;
use projdyn_types::PdResult;

use crate::constraint::{check_vertex, validate_weight, Projection, Target};

/// Soft pin of one vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PositionalConstraint {
    /// Constrained vertex.
    pub vertex: usize,
    /// Rest position the vertex is pulled toward.
    pub target: DVec3,
    /// Stiffness weight.
    pub weight: f64,
}

impl PositionalConstraint {
    pub fn new(vertex: usize, rest: &[DVec3], weight: f64) -> PdResult<Self> {
        check_vertex(vertex, rest.len())?;
        Ok(Self {
            vertex,
            target: rest[vertex],
            weight: validate_weight(weight)?,
        })
    }

    pub fn project(&self, positions: &[DVec3]) -> Projection {
        Projection {
            target: Target::Position(self.target),
            energy: 0.5 * self.weight * positions[self.vertex].distance_squared(self.target),
        }
    }

    pub fn stiffness_triplets(&self, out: &mut Vec<(usize, usize, f64)>) {
        out.push((self.vertex, self.vertex, self.weight));
    }

    pub fn accumulate_rhs(&self, target: DVec3, rhs: &mut [DVec3]) {
        rhs[self.vertex] += self.weight * target;
    }
}
