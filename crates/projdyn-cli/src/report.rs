//! Run results and JSON frame export.

use projdyn_mesh::DeformableMesh;
use projdyn_solver::Simulation;
use serde::{Deserialize, Serialize};

/// Vertex positions after one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub frame: u64,
    pub positions: Vec<[f64; 3]>,
}

impl FrameRecord {
    pub fn capture(frame: u64, mesh: &DeformableMesh) -> Self {
        Self {
            frame,
            positions: mesh.positions().iter().map(|p| p.to_array()).collect(),
        }
    }
}

/// Aggregate statistics of a scenario run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub name: String,
    pub vertices: usize,
    pub constraints: usize,
    pub frames: u64,
    pub factorizations: u64,
    /// Lowest vertex height at the end.
    pub min_y: f64,
    /// Largest distance of a fixed vertex from its rest position.
    pub max_pin_drift: f64,
    /// RMS position change of the last global solve.
    pub final_residual: f64,
    /// Whether every position is finite.
    pub finite: bool,
    /// Wall-clock time for all frames (seconds).
    pub wall_time: f64,
}

impl RunSummary {
    pub fn collect(name: &str, sim: &Simulation, wall_time: f64, final_residual: f64) -> Self {
        let mesh = sim.mesh();
        let positions = mesh.positions();
        let max_pin_drift = mesh
            .fixed_vertices()
            .into_iter()
            .map(|i| positions[i].distance(mesh.rest_positions()[i]))
            .fold(0.0, f64::max);

        Self {
            name: name.to_string(),
            vertices: mesh.vertex_count(),
            constraints: mesh.constraints().len(),
            frames: sim.frame_count(),
            factorizations: sim.solver().factorization_count(),
            min_y: positions.iter().map(|p| p.y).fold(f64::INFINITY, f64::min),
            max_pin_drift,
            final_residual,
            finite: positions.iter().all(|p| p.is_finite()),
            wall_time,
        }
    }

    /// Average wall time per frame in milliseconds.
    pub fn avg_frame_ms(&self) -> f64 {
        if self.frames == 0 {
            0.0
        } else {
            self.wall_time * 1e3 / self.frames as f64
        }
    }
}

/// Summary plus the optional recorded frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub summary: RunSummary,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub frames: Vec<FrameRecord>,
}
