//! Integration tests for projdyn-cli scenarios.

use projdyn_cli::{GeometryConfig, ScenarioConfig};
use projdyn_solver::ConstraintSpec;
use projdyn_types::PdError;

const HANGING: &str = r#"
name = "patch"
frames = 60
mass = 1.0
pins = [0, 1]

[geometry]
type = "cloth_grid"
cols = 1
rows = 1
width = 1.0
height = 1.0

[[constraints]]
type = "edge_length"
weight = 1e6

[[drags]]
vertex = 3
direction = [0.0, 0.0, 1.0]
start_frame = 5
frames = 3

[params]
dt = 0.016
iterations = 10
"#;

// ─── Parsing ──────────────────────────────────────────────────

#[test]
fn parse_scenario() {
    let config = ScenarioConfig::from_toml_str(HANGING).unwrap();
    assert_eq!(config.name, "patch");
    assert_eq!(config.frames, 60);
    assert_eq!(config.pins, vec![0, 1]);
    assert_eq!(
        config.geometry,
        GeometryConfig::ClothGrid {
            cols: 1,
            rows: 1,
            width: 1.0,
            height: 1.0
        }
    );
    assert_eq!(config.constraints, vec![ConstraintSpec::EdgeLength { weight: 1e6 }]);
    assert_eq!(config.drags[0].frames, 3);
    assert!((config.params.dt - 0.016).abs() < 1e-15);
    assert!(config.params.gravity_enabled);
}

#[test]
fn minimal_scenario_uses_defaults() {
    let config = ScenarioConfig::from_toml_str("[geometry]\ntype = \"single_tetrahedron\"").unwrap();
    assert_eq!(config.frames, 120);
    assert_eq!(config.mass, 1.0);
    assert!(config.pins.is_empty());
    assert!(config.constraints.is_empty());
    assert_eq!(config.params.iterations, 10);
}

#[test]
fn malformed_toml_is_serialization_error() {
    assert!(matches!(
        ScenarioConfig::from_toml_str("frames = \"many\""),
        Err(PdError::Serialization(_))
    ));
}

#[test]
fn demo_round_trips_through_toml() {
    let demo = ScenarioConfig::hanging_cloth();
    let text = demo.to_toml_string().unwrap();
    assert_eq!(ScenarioConfig::from_toml_str(&text).unwrap(), demo);
}

// ─── Validation ───────────────────────────────────────────────

#[test]
fn duplicate_pins_rejected() {
    let mut config = ScenarioConfig::from_toml_str(HANGING).unwrap();
    config.pins = vec![1, 0, 1];
    assert!(matches!(config.validate(), Err(PdError::InvalidConfig(_))));
}

#[test]
fn zero_frames_rejected() {
    let mut config = ScenarioConfig::from_toml_str(HANGING).unwrap();
    config.frames = 0;
    assert!(config.validate().is_err());
}

#[test]
fn out_of_range_pin_fails_build() {
    let mut config = ScenarioConfig::from_toml_str(HANGING).unwrap();
    config.pins = vec![7];
    assert!(matches!(config.build(), Err(PdError::VertexOutOfRange { index: 7, .. })));
}

#[test]
fn out_of_range_drag_fails_build() {
    let mut config = ScenarioConfig::from_toml_str(HANGING).unwrap();
    config.drags[0].vertex = 40;
    assert!(config.build().is_err());
}

#[test]
fn volumetric_constraint_on_cloth_fails_build() {
    let mut config = ScenarioConfig::from_toml_str(HANGING).unwrap();
    config.constraints.push(ConstraintSpec::ShapeTargeting { weight: 1e6 });
    assert!(matches!(config.build(), Err(PdError::Unsupported(_))));
}

#[test]
fn invalid_mass_fails_build() {
    let mut config = ScenarioConfig::from_toml_str(HANGING).unwrap();
    config.mass = 0.0;
    assert!(matches!(config.build(), Err(PdError::InvalidMass { .. })));
}

#[test]
fn build_applies_pins_and_constraints() {
    let config = ScenarioConfig::from_toml_str(HANGING).unwrap();
    let sim = config.build().unwrap();
    assert_eq!(sim.mesh().fixed_vertices(), vec![0, 1]);
    assert_eq!(sim.mesh().constraints().len(), 5);
    assert!(sim.is_model_ready());
}

// ─── Running ──────────────────────────────────────────────────

#[test]
fn run_records_every_frame() {
    let config = ScenarioConfig::from_toml_str(HANGING).unwrap();
    let report = config.run(true).unwrap();
    let s = &report.summary;
    assert_eq!(s.frames, 60);
    assert_eq!(report.frames.len(), 60);
    assert_eq!(report.frames[59].frame, 59);
    assert_eq!(report.frames[0].positions.len(), 4);
    assert!(s.finite);
    assert_eq!(s.factorizations, 1);
    assert!(s.max_pin_drift < 1e-6);
    assert!(s.min_y < 0.0);
}

#[test]
fn run_without_recording_keeps_no_frames() {
    let config = ScenarioConfig::from_toml_str(HANGING).unwrap();
    let report = config.run(false).unwrap();
    assert!(report.frames.is_empty());
    let json = serde_json::to_string(&report).unwrap();
    assert!(!json.contains("\"frames\":["));
}

#[test]
fn tet_bar_scenario_runs() {
    let config = ScenarioConfig::from_toml_str(
        r#"
        frames = 20
        pins = [0]

        [geometry]
        type = "tet_bar"
        nx = 2
        ny = 1
        nz = 1
        size = 0.5

        [[constraints]]
        type = "corotated_deformation_gradient"

        [[constraints]]
        type = "strain_limit"
        "#,
    )
    .unwrap();
    let report = config.run(false).unwrap();
    assert!(report.summary.finite);
    assert_eq!(report.summary.constraints, 24);
}
