//! PD system matrix and right-hand side assembly.
//!
//! Builds the constant system matrix `A = M/h² + Σ wᵢ AᵢᵀAᵢ` where:
//! - `M/h²` is the diagonal mass matrix scaled by `1/dt²`
//! - `wᵢ AᵢᵀAᵢ` is the stiffness term each constraint emits as triplets
//!
//! The matrix is N×N and shared by the three coordinate axes, so one
//! factorization serves every global solve until masses, constraints or
//! the timestep change.
//!
//! The right-hand side is `M/h² · s + Σ wᵢ Aᵢᵀ Bᵢ pᵢ` with `s` the
//! inertial prediction and `pᵢ` the local projections.

use projdyn_constraint::{Constraint, Projection};
use projdyn_math::sparse::CsrMatrix;
use projdyn_math::DVec3;

/// Assembles `M/h² + Σ wᵢ AᵢᵀAᵢ`.
pub fn assemble_system_matrix(masses: &[f64], dt: f64, constraints: &[Constraint]) -> CsrMatrix {
    let n = masses.len();
    let inv_dt2 = 1.0 / (dt * dt);

    // Capacity estimate: N diagonal + up to 16 entries per constraint
    let mut triplets: Vec<(usize, usize, f64)> = Vec::with_capacity(n + constraints.len() * 16);

    for (i, &m) in masses.iter().enumerate() {
        triplets.push((i, i, m * inv_dt2));
    }
    for constraint in constraints {
        constraint.stiffness_triplets(&mut triplets);
    }

    CsrMatrix::from_triplets(n, n, &triplets)
}

/// Inertial prediction `s = p + dt·v + dt²·M⁻¹·f`.
///
/// `forces` may be empty, meaning no external forces.
pub fn predict(
    positions: &[DVec3],
    velocities: &[DVec3],
    masses: &[f64],
    forces: &[DVec3],
    dt: f64,
    out: &mut Vec<DVec3>,
) {
    let dt2 = dt * dt;
    out.clear();
    out.extend(
        positions
            .iter()
            .zip(velocities)
            .zip(masses)
            .enumerate()
            .map(|(i, ((&p, &v), &m))| {
                let f = forces.get(i).copied().unwrap_or(DVec3::ZERO);
                p + dt * v + (dt2 / m) * f
            }),
    );
}

/// Local step: projects every constraint. Returns the total energy.
pub fn project_constraints(
    constraints: &[Constraint],
    positions: &[DVec3],
    out: &mut Vec<Projection>,
) -> f64 {
    out.clear();
    out.extend(constraints.iter().map(|c| c.project(positions)));
    out.iter().map(|p| p.energy).sum()
}

/// Assembles `M/h² · s + Σ wᵢ Aᵢᵀ Bᵢ pᵢ` into `rhs`.
pub fn assemble_rhs(
    masses: &[f64],
    dt: f64,
    predicted: &[DVec3],
    constraints: &[Constraint],
    projections: &[Projection],
    rhs: &mut Vec<DVec3>,
) {
    let inv_dt2 = 1.0 / (dt * dt);
    rhs.clear();
    rhs.extend(
        predicted
            .iter()
            .zip(masses)
            .map(|(&s, &m)| (m * inv_dt2) * s),
    );
    for (constraint, projection) in constraints.iter().zip(projections) {
        constraint.accumulate_rhs(projection, rhs);
    }
}
