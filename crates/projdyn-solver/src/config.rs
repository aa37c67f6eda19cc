//! Per-step integration parameters.
//!
//! `StepParams` is plain serde data so scenarios can carry it in TOML:
//!
//! ```toml
//! dt = 0.016
//! iterations = 10
//! gravity_enabled = true
//! gravity = [0.0, -9.8, 0.0]
//! damping = 0.0
//! ```

use projdyn_math::DVec3;
use projdyn_types::constants::{DEFAULT_DT, DEFAULT_PD_ITERATIONS, GRAVITY};
use projdyn_types::{PdError, PdResult};
use serde::{Deserialize, Serialize};

/// Parameters of one simulated frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepParams {
    /// Timestep in seconds.
    pub dt: f64,

    /// Local/global iterations per step.
    pub iterations: u32,

    /// Whether gravity is added to the external forces.
    pub gravity_enabled: bool,

    /// Gravity acceleration [gx, gy, gz] in m/s².
    pub gravity: [f64; 3],

    /// Fraction of velocity removed after each step (0 = none, 1 = all).
    pub damping: f64,
}

impl Default for StepParams {
    fn default() -> Self {
        Self {
            dt: DEFAULT_DT,
            iterations: DEFAULT_PD_ITERATIONS,
            gravity_enabled: true,
            gravity: [0.0, -GRAVITY, 0.0],
            damping: 0.0,
        }
    }
}

impl StepParams {
    /// Few iterations, for quick interactive previews.
    pub fn debug() -> Self {
        Self {
            iterations: 3,
            ..Default::default()
        }
    }

    /// More iterations at a smaller timestep.
    pub fn high_quality() -> Self {
        Self {
            dt: DEFAULT_DT / 2.0,
            iterations: 30,
            ..Default::default()
        }
    }

    /// Gravity acceleration, zero when disabled.
    pub fn gravity_vector(&self) -> DVec3 {
        if self.gravity_enabled {
            DVec3::from_array(self.gravity)
        } else {
            DVec3::ZERO
        }
    }

    /// Rejects non-positive timesteps, out-of-range damping and non-finite gravity.
    pub fn validate(&self) -> PdResult<()> {
        if !(self.dt.is_finite() && self.dt > 0.0) {
            return Err(PdError::InvalidConfig(format!(
                "timestep must be positive and finite, got {}",
                self.dt
            )));
        }
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(PdError::InvalidConfig(format!(
                "damping must be in [0, 1], got {}",
                self.damping
            )));
        }
        if !self.gravity.iter().all(|g| g.is_finite()) {
            return Err(PdError::InvalidConfig("gravity must be finite".into()));
        }
        Ok(())
    }
}
