//! Edge-length constraint: keeps the distance between two vertices at its
//! rest value.
//!
//! `Aᵢ x = x_b − x_a`, target `pᵢ = d · (x_b − x_a) / ‖x_b − x_a‖`.

use projdyn_math::DVec3;
use projdyn_types::constants::DEGENERATE_LENGTH_THRESHOLD;
use projdyn_types::{PdError, PdResult};

use crate::constraint::{check_vertex, validate_weight, Projection, Target};

/// Spring-like constraint between two vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeLengthConstraint {
    /// `[a, b]` vertex indices.
    pub vertices: [usize; 2],
    /// Rest length `d`.
    pub rest_length: f64,
    /// Unit rest direction, used when the current edge collapses.
    pub rest_direction: DVec3,
    /// Stiffness weight.
    pub weight: f64,
}

impl EdgeLengthConstraint {
    /// Builds the constraint from rest positions.
    pub fn new(a: usize, b: usize, rest: &[DVec3], weight: f64) -> PdResult<Self> {
        check_vertex(a, rest.len())?;
        check_vertex(b, rest.len())?;
        let weight = validate_weight(weight)?;

        let edge = rest[b] - rest[a];
        let length = edge.length();
        if a == b || !(length > DEGENERATE_LENGTH_THRESHOLD) {
            return Err(PdError::DegenerateEdge { a, b, length });
        }

        Ok(Self {
            vertices: [a, b],
            rest_length: length,
            rest_direction: edge / length,
            weight,
        })
    }

    /// Current edge length.
    pub fn current_length(&self, positions: &[DVec3]) -> f64 {
        let [a, b] = self.vertices;
        positions[a].distance(positions[b])
    }

    pub fn project(&self, positions: &[DVec3]) -> Projection {
        let [a, b] = self.vertices;
        let edge = positions[b] - positions[a];
        let length = edge.length();
        let direction = if length > DEGENERATE_LENGTH_THRESHOLD {
            edge / length
        } else {
            self.rest_direction
        };
        let target = direction * self.rest_length;

        Projection {
            target: Target::EdgeVector(target),
            energy: 0.5 * self.weight * (edge - target).length_squared(),
        }
    }

    pub fn stiffness_triplets(&self, out: &mut Vec<(usize, usize, f64)>) {
        let [a, b] = self.vertices;
        let w = self.weight;
        out.push((a, a, w));
        out.push((b, b, w));
        out.push((a, b, -w));
        out.push((b, a, -w));
    }

    pub fn accumulate_rhs(&self, target: DVec3, rhs: &mut [DVec3]) {
        let [a, b] = self.vertices;
        rhs[a] -= self.weight * target;
        rhs[b] += self.weight * target;
    }
}
