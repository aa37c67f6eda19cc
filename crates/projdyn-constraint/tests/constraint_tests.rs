//! Integration tests for projdyn-constraint.

use projdyn_constraint::{
    Constraint, ConstraintKind, CorotatedConstraint, DeformationGradientConstraint,
    EdgeLengthConstraint, PositionalConstraint, RestTetrahedron, ShapeTargetingConstraint,
    StrainLimitConstraint, Target,
};
use projdyn_math::{DMat3, DQuat, DVec3};
use projdyn_types::PdError;

fn unit_tet() -> Vec<DVec3> {
    vec![
        DVec3::ZERO,
        DVec3::X,
        DVec3::Y,
        DVec3::Z,
    ]
}

fn rotation() -> DMat3 {
    DMat3::from_quat(DQuat::from_axis_angle(DVec3::new(1.0, 2.0, 3.0).normalize(), 0.9))
}

fn transformed(points: &[DVec3], m: DMat3, offset: DVec3) -> Vec<DVec3> {
    points.iter().map(|&p| m * p + offset).collect()
}

fn mat_close(a: &DMat3, b: &DMat3, tol: f64) -> bool {
    (*a - *b).to_cols_array().iter().all(|v| v.abs() < tol)
}

/// `K x` for the constraint's stiffness triplets.
fn apply_stiffness(c: &Constraint, x: &[DVec3]) -> Vec<DVec3> {
    let mut triplets = Vec::new();
    c.stiffness_triplets(&mut triplets);
    let mut out = vec![DVec3::ZERO; x.len()];
    for (r, col, v) in triplets {
        out[r] += v * x[col];
    }
    out
}

fn rhs_of(c: &Constraint, x: &[DVec3]) -> Vec<DVec3> {
    let mut rhs = vec![DVec3::ZERO; x.len()];
    let projection = c.project(x);
    c.accumulate_rhs(&projection, &mut rhs);
    rhs
}

fn all_tet_constraints(rest: &[DVec3]) -> Vec<Constraint> {
    let idx = [0, 1, 2, 3];
    vec![
        Constraint::DeformationGradient(
            DeformationGradientConstraint::new(0, idx, rest, 1e3).unwrap(),
        ),
        Constraint::CorotatedDeformationGradient(
            CorotatedConstraint::new(0, idx, rest, 1e3).unwrap(),
        ),
        Constraint::ShapeTargeting(ShapeTargetingConstraint::new(0, idx, rest, 1e3).unwrap()),
        Constraint::StrainLimit(
            StrainLimitConstraint::new(0, idx, rest, 1e3, 0.9, 1.1).unwrap(),
        ),
    ]
}

// ─── Rest Tetrahedron ─────────────────────────────────────────

#[test]
fn rest_tet_volume_and_identity_gradient() {
    let rest = unit_tet();
    let tet = RestTetrahedron::new(0, [0, 1, 2, 3], &rest).unwrap();
    assert!((tet.rest_volume - 1.0 / 6.0).abs() < 1e-12);
    assert!(mat_close(&tet.deformation_gradient(&rest), &DMat3::IDENTITY, 1e-12));
}

#[test]
fn gradient_rows_sum_to_zero() {
    let rest = vec![
        DVec3::new(0.1, -0.2, 0.3),
        DVec3::new(1.2, 0.1, 0.0),
        DVec3::new(0.0, 0.9, 0.4),
        DVec3::new(0.3, 0.2, 1.5),
    ];
    let tet = RestTetrahedron::new(0, [0, 1, 2, 3], &rest).unwrap();
    let sum: DVec3 = tet.gradients.iter().copied().sum();
    assert!(sum.length() < 1e-12);
}

#[test]
fn translation_does_not_change_gradient() {
    let rest = unit_tet();
    let tet = RestTetrahedron::new(0, [0, 1, 2, 3], &rest).unwrap();
    let moved = transformed(&rest, DMat3::IDENTITY, DVec3::new(5.0, -3.0, 2.0));
    assert!(mat_close(&tet.deformation_gradient(&moved), &DMat3::IDENTITY, 1e-12));
}

#[test]
fn flat_tet_is_degenerate() {
    let rest = vec![DVec3::ZERO, DVec3::X, DVec3::Y, DVec3::new(1.0, 1.0, 0.0)];
    match RestTetrahedron::new(7, [0, 1, 2, 3], &rest) {
        Err(PdError::DegenerateElement { element, volume }) => {
            assert_eq!(element, 7);
            assert!(volume.abs() < 1e-12);
        }
        other => panic!("expected DegenerateElement, got {other:?}"),
    }
}

#[test]
fn tet_index_out_of_range() {
    let rest = unit_tet();
    assert!(matches!(
        RestTetrahedron::new(0, [0, 1, 2, 9], &rest),
        Err(PdError::VertexOutOfRange { index: 9, count: 4 })
    ));
}

// ─── Edge Length ──────────────────────────────────────────────

#[test]
fn edge_projection_restores_rest_length() {
    let rest = vec![DVec3::ZERO, DVec3::new(2.0, 0.0, 0.0)];
    let edge = EdgeLengthConstraint::new(0, 1, &rest, 10.0).unwrap();
    assert!((edge.rest_length - 2.0).abs() < 1e-12);

    let current = vec![DVec3::ZERO, DVec3::new(0.0, 3.0, 0.0)];
    let projection = edge.project(&current);
    match projection.target {
        Target::EdgeVector(t) => assert!((t - DVec3::new(0.0, 2.0, 0.0)).length() < 1e-12),
        other => panic!("unexpected target {other:?}"),
    }
    // w/2 · |3 - 2|²
    assert!((projection.energy - 5.0).abs() < 1e-9);
}

#[test]
fn collapsed_edge_uses_rest_direction() {
    let rest = vec![DVec3::ZERO, DVec3::Z];
    let edge = EdgeLengthConstraint::new(0, 1, &rest, 1.0).unwrap();
    let current = vec![DVec3::ONE, DVec3::ONE];
    match edge.project(&current).target {
        Target::EdgeVector(t) => {
            assert!(t.is_finite());
            assert!((t - DVec3::Z).length() < 1e-12);
        }
        other => panic!("unexpected target {other:?}"),
    }
}

#[test]
fn zero_length_edge_rejected() {
    let rest = vec![DVec3::ONE, DVec3::ONE];
    assert!(matches!(
        EdgeLengthConstraint::new(0, 1, &rest, 1.0),
        Err(PdError::DegenerateEdge { a: 0, b: 1, .. })
    ));
    assert!(matches!(
        EdgeLengthConstraint::new(0, 0, &unit_tet(), 1.0),
        Err(PdError::DegenerateEdge { .. })
    ));
}

#[test]
fn negative_weight_rejected() {
    let rest = unit_tet();
    assert!(matches!(
        EdgeLengthConstraint::new(0, 1, &rest, -1.0),
        Err(PdError::InvalidWeight(_))
    ));
    assert!(matches!(
        PositionalConstraint::new(0, &rest, f64::NAN),
        Err(PdError::InvalidWeight(_))
    ));
    assert!(matches!(
        DeformationGradientConstraint::new(0, [0, 1, 2, 3], &rest, -5.0),
        Err(PdError::InvalidWeight(_))
    ));
}

#[test]
fn zero_weight_is_allowed() {
    let rest = unit_tet();
    let edge = EdgeLengthConstraint::new(0, 1, &rest, 0.0).unwrap();
    let moved = vec![DVec3::ZERO, DVec3::new(4.0, 0.0, 0.0)];
    assert_eq!(edge.project(&moved).energy, 0.0);
}

// ─── Positional ───────────────────────────────────────────────

#[test]
fn positional_targets_rest_position() {
    let rest = unit_tet();
    let pin = PositionalConstraint::new(2, &rest, 4.0).unwrap();
    let mut current = rest.clone();
    current[2] += DVec3::new(0.0, 0.0, 0.5);
    let projection = pin.project(&current);
    assert_eq!(projection.target, Target::Position(DVec3::Y));
    assert!((projection.energy - 0.5).abs() < 1e-12);
}

#[test]
fn positional_out_of_range() {
    assert!(matches!(
        PositionalConstraint::new(4, &unit_tet(), 1.0),
        Err(PdError::VertexOutOfRange { index: 4, count: 4 })
    ));
}

// ─── Rigid-Motion Invariance ──────────────────────────────────

#[test]
fn tet_constraints_have_zero_energy_under_rigid_motion() {
    let rest = unit_tet();
    let moved = transformed(&rest, rotation(), DVec3::new(0.3, -1.0, 2.0));
    for c in all_tet_constraints(&rest) {
        let projection = c.project(&moved);
        assert!(projection.energy < 1e-9, "{}: energy {}", c.kind(), projection.energy);
        match projection.target {
            Target::Gradient(t) => assert!(mat_close(&t, &rotation(), 1e-9), "{}", c.kind()),
            other => panic!("unexpected target {other:?}"),
        }
    }
}

#[test]
fn rest_configuration_is_a_fixed_point() {
    let rest = vec![
        DVec3::new(0.1, -0.2, 0.3),
        DVec3::new(1.2, 0.1, 0.0),
        DVec3::new(0.0, 0.9, 0.4),
        DVec3::new(0.3, 0.2, 1.5),
    ];
    let mut constraints = all_tet_constraints(&rest);
    constraints.push(Constraint::EdgeLength(
        EdgeLengthConstraint::new(0, 3, &rest, 7.0).unwrap(),
    ));
    constraints.push(Constraint::Positional(
        PositionalConstraint::new(1, &rest, 3.0).unwrap(),
    ));
    for c in &constraints {
        let kx = apply_stiffness(c, &rest);
        let rhs = rhs_of(c, &rest);
        for (a, b) in kx.iter().zip(&rhs) {
            assert!((*a - *b).length() < 1e-8, "{}: {a} vs {b}", c.kind());
        }
    }
}

#[test]
fn stiffness_is_symmetric() {
    let rest = unit_tet();
    for c in all_tet_constraints(&rest) {
        let mut triplets = Vec::new();
        c.stiffness_triplets(&mut triplets);
        assert_eq!(triplets.len(), 16);
        let mut dense = [[0.0; 4]; 4];
        for (r, col, v) in triplets {
            dense[r][col] += v;
        }
        for r in 0..4 {
            for col in 0..4 {
                assert!((dense[r][col] - dense[col][r]).abs() < 1e-12);
            }
            let row_sum: f64 = dense[r].iter().sum();
            assert!(row_sum.abs() < 1e-9);
        }
    }
}

#[test]
fn volumetric_weight_scales_with_rest_volume() {
    let rest = unit_tet();
    let c = DeformationGradientConstraint::new(0, [0, 1, 2, 3], &rest, 6.0).unwrap();
    assert!((c.effective_weight() - 1.0).abs() < 1e-12);
}

// ─── Targets ──────────────────────────────────────────────────

#[test]
fn deformation_gradient_snaps_stretch_to_rotation() {
    let rest = unit_tet();
    let c = DeformationGradientConstraint::new(0, [0, 1, 2, 3], &rest, 1.0).unwrap();
    let stretched = transformed(&rest, DMat3::from_diagonal(DVec3::new(2.0, 1.0, 1.0)), DVec3::ZERO);
    let projection = c.project(&stretched);
    match projection.target {
        Target::Gradient(t) => assert!(mat_close(&t, &DMat3::IDENTITY, 1e-9)),
        other => panic!("unexpected target {other:?}"),
    }
    // (1/6)/2 · |2 - 1|²
    assert!((projection.energy - 1.0 / 12.0).abs() < 1e-9);
}

#[test]
fn corotated_target_preserves_volume() {
    let rest = unit_tet();
    let c = CorotatedConstraint::new(0, [0, 1, 2, 3], &rest, 1.0).unwrap();
    let stretched = transformed(&rest, DMat3::from_diagonal(DVec3::new(2.0, 1.0, 1.0)), DVec3::ZERO);
    match c.project(&stretched).target {
        Target::Gradient(t) => {
            assert!((t.determinant() - 1.0).abs() < 1e-9);
            // stretch ratios are kept
            assert!((t.x_axis.x / t.y_axis.y - 2.0).abs() < 1e-9);
        }
        other => panic!("unexpected target {other:?}"),
    }
}

#[test]
fn corotated_collapsed_element_falls_back_to_rotation() {
    let rest = unit_tet();
    let c = CorotatedConstraint::new(0, [0, 1, 2, 3], &rest, 1.0).unwrap();
    let flattened = transformed(&rest, DMat3::from_diagonal(DVec3::new(1.0, 1.0, 0.0)), DVec3::ZERO);
    match c.project(&flattened).target {
        Target::Gradient(t) => {
            assert!(t.is_finite());
            assert!((t.determinant() - 1.0).abs() < 1e-9);
        }
        other => panic!("unexpected target {other:?}"),
    }
}

#[test]
fn shape_targeting_holds_captured_shape() {
    let rest = unit_tet();
    let mut c = ShapeTargetingConstraint::new(0, [0, 1, 2, 3], &rest, 1.0).unwrap();
    let shape = DMat3::from_cols(
        DVec3::new(1.5, 0.0, 0.0),
        DVec3::new(0.2, 0.8, 0.0),
        DVec3::new(0.0, 0.1, 1.2),
    );
    let deformed = transformed(&rest, shape, DVec3::ZERO);
    c.set_target_shape(&deformed);
    assert!(mat_close(&c.target_transform, &shape, 1e-12));

    assert!(c.project(&deformed).energy < 1e-12);
    let rotated = transformed(&deformed, rotation(), DVec3::new(1.0, 1.0, 1.0));
    assert!(c.project(&rotated).energy < 1e-9);
    // The rest shape is now away from the target.
    assert!(c.project(&rest).energy > 1e-3);
}

#[test]
fn shape_targeting_rejects_non_finite_transform() {
    let rest = unit_tet();
    let mut c = ShapeTargetingConstraint::new(0, [0, 1, 2, 3], &rest, 1.0).unwrap();
    assert!(c.set_target_transform(DMat3::from_diagonal(DVec3::splat(f64::NAN))).is_err());
    assert_eq!(c.target_transform, DMat3::IDENTITY);
}

#[test]
fn strain_limit_clamps_stretch() {
    let rest = unit_tet();
    let c = StrainLimitConstraint::new(0, [0, 1, 2, 3], &rest, 1.0, 0.9, 1.1).unwrap();
    let stretched = transformed(&rest, DMat3::from_diagonal(DVec3::new(1.5, 1.0, 0.5)), DVec3::ZERO);
    match c.project(&stretched).target {
        Target::Gradient(t) => {
            let expected = DMat3::from_diagonal(DVec3::new(1.1, 1.0, 0.9));
            assert!(mat_close(&t, &expected, 1e-9));
        }
        other => panic!("unexpected target {other:?}"),
    }
}

#[test]
fn strain_limit_inside_band_has_zero_energy() {
    let rest = unit_tet();
    let c = StrainLimitConstraint::new(0, [0, 1, 2, 3], &rest, 1.0, 0.9, 1.1).unwrap();
    let mild = transformed(&rest, DMat3::from_diagonal(DVec3::new(1.05, 0.95, 1.0)), DVec3::ZERO);
    assert!(c.project(&mild).energy < 1e-12);
}

#[test]
fn strain_limit_bounds_validated() {
    let rest = unit_tet();
    for (min, max) in [(1.2, 1.1), (0.0, 1.0), (-0.5, 1.0), (0.9, f64::INFINITY)] {
        assert!(matches!(
            StrainLimitConstraint::new(0, [0, 1, 2, 3], &rest, 1.0, min, max),
            Err(PdError::InvalidStrainBounds { .. })
        ));
    }
    assert!(StrainLimitConstraint::new(0, [0, 1, 2, 3], &rest, 1.0, 1.0, 1.0).is_ok());
}

// ─── Dispatch ─────────────────────────────────────────────────

#[test]
fn kind_and_vertices_dispatch() {
    let rest = unit_tet();
    let edge = Constraint::EdgeLength(EdgeLengthConstraint::new(1, 3, &rest, 2.0).unwrap());
    assert_eq!(edge.kind(), ConstraintKind::EdgeLength);
    assert_eq!(edge.vertices(), &[1, 3]);
    assert_eq!(edge.weight(), 2.0);

    let pin = Constraint::Positional(PositionalConstraint::new(2, &rest, 1.0).unwrap());
    assert_eq!(pin.vertices(), &[2]);
    assert!(!pin.kind().is_volumetric());

    for c in all_tet_constraints(&rest) {
        assert_eq!(c.vertices(), &[0, 1, 2, 3]);
        assert!(c.kind().is_volumetric());
    }
}

#[test]
fn kind_names_serialize_snake_case() {
    assert_eq!(ConstraintKind::all().len(), 6);
    assert_eq!(ConstraintKind::StrainLimit.to_string(), "strain_limit");
    assert_eq!(
        ConstraintKind::CorotatedDeformationGradient.name(),
        "corotated_deformation_gradient"
    );
}
