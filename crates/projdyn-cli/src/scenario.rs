//! Scenario configuration and execution.

use std::path::Path;
use std::time::Instant;

use projdyn_math::DVec3;
use projdyn_mesh::generators::{cloth_grid, single_tetrahedron, tet_bar};
use projdyn_mesh::DeformableMesh;
use projdyn_solver::{ConstraintSpec, Simulation, StepOutcome, StepParams};
use projdyn_types::constants::{DEFAULT_CONSTRAINT_WEIGHT, DEFAULT_DRAG_FORCE};
use projdyn_types::{PdError, PdResult};
use serde::{Deserialize, Serialize};

use crate::report::{FrameRecord, RunReport, RunSummary};

/// Fixture geometry of a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GeometryConfig {
    ClothGrid {
        cols: usize,
        rows: usize,
        width: f64,
        height: f64,
    },
    TetBar {
        nx: usize,
        ny: usize,
        nz: usize,
        size: f64,
    },
    SingleTetrahedron,
}

impl GeometryConfig {
    /// Generates the mesh with every vertex at `mass`.
    pub fn build(&self, mass: f64) -> PdResult<DeformableMesh> {
        let mesh = match *self {
            Self::ClothGrid {
                cols,
                rows,
                width,
                height,
            } => {
                if !(width > 0.0 && height > 0.0) {
                    return Err(PdError::InvalidConfig(format!(
                        "cloth size must be positive, got {width} × {height}"
                    )));
                }
                cloth_grid(cols, rows, width, height)
            }
            Self::TetBar { nx, ny, nz, size } => {
                if !(size > 0.0) {
                    return Err(PdError::InvalidConfig(format!(
                        "cube size must be positive, got {size}"
                    )));
                }
                tet_bar(nx, ny, nz, size)
            }
            Self::SingleTetrahedron => single_tetrahedron(),
        };
        DeformableMesh::with_uniform_mass(
            mesh.positions().to_vec(),
            mesh.faces().to_vec(),
            mesh.elements().to_vec(),
            mass,
        )
    }
}

/// A time-limited drag on one vertex.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DragConfig {
    pub vertex: usize,
    pub direction: [f64; 3],
    /// First frame the drag is active.
    #[serde(default)]
    pub start_frame: u64,
    /// Number of frames the drag lasts.
    #[serde(default = "default_drag_frames")]
    pub frames: u64,
}

fn default_drag_frames() -> u64 {
    1
}

impl DragConfig {
    fn is_active(&self, frame: u64) -> bool {
        frame >= self.start_frame && frame - self.start_frame < self.frames
    }
}

/// A complete headless scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    #[serde(default = "default_name")]
    pub name: String,
    pub geometry: GeometryConfig,
    /// Frames to simulate.
    #[serde(default = "default_frames")]
    pub frames: u64,
    /// Mass of every vertex.
    #[serde(default = "default_mass")]
    pub mass: f64,
    /// Vertices fixed before the first frame.
    #[serde(default)]
    pub pins: Vec<usize>,
    #[serde(default)]
    pub constraints: Vec<ConstraintSpec>,
    #[serde(default)]
    pub drags: Vec<DragConfig>,
    /// Force magnitude of a drag.
    #[serde(default = "default_drag_force")]
    pub drag_force: f64,
    #[serde(default)]
    pub params: StepParams,
}

fn default_name() -> String {
    "scenario".into()
}

fn default_frames() -> u64 {
    120
}

fn default_mass() -> f64 {
    1.0
}

fn default_drag_force() -> f64 {
    DEFAULT_DRAG_FORCE
}

impl ScenarioConfig {
    /// The built-in demo: a 10×10 cloth hanging from its top corners,
    /// tugged sideways for a few frames.
    pub fn hanging_cloth() -> Self {
        Self {
            name: "hanging_cloth".into(),
            geometry: GeometryConfig::ClothGrid {
                cols: 10,
                rows: 10,
                width: 1.0,
                height: 1.0,
            },
            frames: 120,
            mass: 1.0,
            pins: vec![0, 10],
            constraints: vec![ConstraintSpec::EdgeLength {
                weight: DEFAULT_CONSTRAINT_WEIGHT,
            }],
            drags: vec![DragConfig {
                vertex: 120,
                direction: [0.0, 0.0, 1.0],
                start_frame: 30,
                frames: 5,
            }],
            drag_force: DEFAULT_DRAG_FORCE,
            params: StepParams {
                dt: 0.016,
                ..Default::default()
            },
        }
    }

    pub fn from_toml_str(text: &str) -> PdResult<Self> {
        toml::from_str(text).map_err(|e| PdError::Serialization(e.to_string()))
    }

    pub fn load(path: impl AsRef<Path>) -> PdResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> PdResult<String> {
        toml::to_string_pretty(self).map_err(|e| PdError::Serialization(e.to_string()))
    }

    /// Checks everything that does not need the mesh.
    pub fn validate(&self) -> PdResult<()> {
        self.params.validate()?;
        if self.frames == 0 {
            return Err(PdError::InvalidConfig("frames must be at least 1".into()));
        }
        if !(self.drag_force.is_finite() && self.drag_force >= 0.0) {
            return Err(PdError::InvalidConfig(format!(
                "drag force must be non-negative, got {}",
                self.drag_force
            )));
        }
        let mut pins = self.pins.clone();
        pins.sort_unstable();
        if let Some(w) = pins.windows(2).find(|w| w[0] == w[1]) {
            return Err(PdError::InvalidConfig(format!("vertex {} pinned twice", w[0])));
        }
        Ok(())
    }

    /// Builds the simulation: mesh, constraints and pins.
    pub fn build(&self) -> PdResult<Simulation> {
        self.validate()?;
        let mesh = self.geometry.build(self.mass)?;
        let mut sim = Simulation::new(mesh, self.params.clone())
            .with_mass_per_particle(self.mass)
            .with_drag_force(self.drag_force);
        sim.apply_constraints(&self.constraints)?;
        for &pin in &self.pins {
            sim.mesh_mut().fix(pin)?;
        }
        for drag in &self.drags {
            sim.mesh().check_vertex(drag.vertex)?;
        }
        Ok(sim)
    }

    /// Runs every frame. With `record`, positions after each frame are kept.
    pub fn run(&self, record: bool) -> PdResult<RunReport> {
        let mut sim = self.build()?;
        let start = Instant::now();
        let mut frames = Vec::new();
        let mut last_residual = 0.0;

        for frame in 0..self.frames {
            if let Some(drag) = self.drags.iter().find(|d| d.is_active(frame)) {
                sim.drag(drag.vertex, DVec3::from_array(drag.direction))?;
            }
            match sim.frame()? {
                StepOutcome::Stepped(result) => last_residual = result.final_residual,
                StepOutcome::NotReady => {
                    tracing::warn!(frame, "model not ready, stopping");
                    break;
                }
            }
            if record {
                frames.push(FrameRecord::capture(frame, sim.mesh()));
            }
        }

        let summary = RunSummary::collect(
            &self.name,
            &sim,
            start.elapsed().as_secs_f64(),
            last_residual,
        );
        tracing::info!(
            scenario = %self.name,
            frames = summary.frames,
            wall_time = summary.wall_time,
            "scenario finished"
        );
        Ok(RunReport { summary, frames })
    }
}
