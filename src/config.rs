//! Observer configuration.
//!
//! Deserialized from the `config` object of the frame JSON; any field
//! left out takes the default below. `validate` must pass before the
//! builder or the detector sees the config.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::FovError;
use crate::types::LayerMask;

fn default_view_radius() -> f64 {
    10.0
}

fn default_view_angle() -> f64 {
    90.0
}

fn default_mesh_resolution() -> f64 {
    1.0
}

fn default_edge_resolve_iterations() -> u32 {
    4
}

fn default_edge_dst_threshold() -> f64 {
    0.5
}

fn default_mask_cutaway_dst() -> f64 {
    0.1
}

fn default_detection_delay_secs() -> f64 {
    0.2
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FovConfig {
    #[serde(default = "default_view_radius")]
    pub view_radius: f64,
    /// Full cone width in degrees, centered on the facing direction.
    #[serde(default = "default_view_angle")]
    pub view_angle: f64,
    /// Rays per degree of view angle.
    #[serde(default = "default_mesh_resolution")]
    pub mesh_resolution: f64,
    /// Bisection depth when locating an occlusion edge.
    #[serde(default = "default_edge_resolve_iterations")]
    pub edge_resolve_iterations: u32,
    /// Distance jump between adjacent hits that counts as an edge.
    #[serde(default = "default_edge_dst_threshold")]
    pub edge_dst_threshold: f64,
    /// Forward offset applied to emitted mesh vertices.
    #[serde(default = "default_mask_cutaway_dst")]
    pub mask_cutaway_dst: f64,
    #[serde(default = "default_detection_delay_secs")]
    pub detection_delay_secs: f64,
    #[serde(default)]
    pub target_mask: LayerMask,
    #[serde(default)]
    pub obstacle_mask: LayerMask,
}

impl Default for FovConfig {
    fn default() -> Self {
        Self {
            view_radius: default_view_radius(),
            view_angle: default_view_angle(),
            mesh_resolution: default_mesh_resolution(),
            edge_resolve_iterations: default_edge_resolve_iterations(),
            edge_dst_threshold: default_edge_dst_threshold(),
            mask_cutaway_dst: default_mask_cutaway_dst(),
            detection_delay_secs: default_detection_delay_secs(),
            target_mask: LayerMask::ALL,
            obstacle_mask: LayerMask::ALL,
        }
    }
}

/// Upper bound on rays per sweep. Each step allocates a boundary point
/// and costs at least one raycast every tick.
pub const MAX_RAY_STEPS: u32 = 1 << 20;

impl FovConfig {
    /// Unclamped, rounded step count. Ties round to even, so 0.5 steps
    /// rounds to 0 and fails validation.
    fn rounded_steps(&self) -> f64 {
        (self.view_angle * self.mesh_resolution).round_ties_even()
    }

    /// Number of angular steps across the view angle. Only meaningful
    /// once `validate` has passed; out-of-range counts saturate.
    pub fn step_count(&self) -> u32 {
        let steps = self.rounded_steps();
        if steps.is_nan() || steps <= 0.0 {
            0
        } else if steps >= u32::MAX as f64 {
            u32::MAX
        } else {
            steps as u32
        }
    }

    /// Angular size of one step in degrees.
    pub fn step_angle(&self) -> f64 {
        self.view_angle / self.step_count() as f64
    }

    pub fn detection_delay(&self) -> Result<Duration, FovError> {
        Duration::try_from_secs_f64(self.detection_delay_secs)
            .map_err(|_| FovError::InvalidDetectionDelay(self.detection_delay_secs))
    }

    /// Reject configurations the algorithms cannot run on.
    pub fn validate(&self) -> Result<(), FovError> {
        let angle = self.view_angle;
        if !angle.is_finite() || angle <= 0.0 || angle > 360.0 {
            return Err(FovError::InvalidViewAngle(self.view_angle));
        }
        if !self.view_radius.is_finite() || self.view_radius < 0.0 {
            return Err(FovError::InvalidViewRadius(self.view_radius));
        }
        if !self.mesh_resolution.is_finite() || self.mesh_resolution <= 0.0 {
            return Err(FovError::InvalidMeshResolution(self.mesh_resolution));
        }
        if self.step_count() < 1 {
            return Err(FovError::NoRaySteps {
                view_angle: self.view_angle,
                mesh_resolution: self.mesh_resolution,
            });
        }
        let steps = self.rounded_steps();
        if steps > MAX_RAY_STEPS as f64 {
            return Err(FovError::TooManyRaySteps {
                steps,
                max: MAX_RAY_STEPS,
            });
        }
        if !self.edge_dst_threshold.is_finite() || self.edge_dst_threshold < 0.0 {
            return Err(FovError::InvalidEdgeThreshold(self.edge_dst_threshold));
        }
        if !self.mask_cutaway_dst.is_finite() || self.mask_cutaway_dst < 0.0 {
            return Err(FovError::InvalidMaskCutaway(self.mask_cutaway_dst));
        }
        let delay = self.detection_delay_secs;
        if !delay.is_finite() || delay <= 0.0 {
            return Err(FovError::InvalidDetectionDelay(self.detection_delay_secs));
        }
        Ok(())
    }
}
