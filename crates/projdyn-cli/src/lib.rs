//! # projdyn-cli
//!
//! Headless scenario runner behind the `projdyn` binary.
//!
//! A scenario is a TOML file naming a fixture geometry, vertex mass, pins,
//! a constraint set, optional drag requests and the step parameters:
//!
//! ```toml
//! name = "hanging_cloth"
//! frames = 120
//! mass = 1.0
//! pins = [0, 1]
//!
//! [geometry]
//! type = "cloth_grid"
//! cols = 1
//! rows = 1
//! width = 1.0
//! height = 1.0
//!
//! [[constraints]]
//! type = "edge_length"
//! weight = 1e6
//!
//! [params]
//! dt = 0.016
//! iterations = 10
//! ```

pub mod report;
pub mod scenario;

pub use report::{FrameRecord, RunReport, RunSummary};
pub use scenario::{DragConfig, GeometryConfig, ScenarioConfig};
