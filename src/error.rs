use thiserror::Error;

#[derive(Error, Debug)]
pub enum FovError {
    #[error("view angle must be in (0, 360] degrees, got {0}")]
    InvalidViewAngle(f64),

    #[error("view radius must be finite and non-negative, got {0}")]
    InvalidViewRadius(f64),

    #[error("mesh resolution must be finite and positive, got {0}")]
    InvalidMeshResolution(f64),

    #[error(
        "view angle {view_angle} at resolution {mesh_resolution} yields no ray steps"
    )]
    NoRaySteps { view_angle: f64, mesh_resolution: f64 },

    #[error("{steps} ray steps exceeds the limit of {max}")]
    TooManyRaySteps { steps: f64, max: u32 },

    #[error("edge distance threshold must be finite and non-negative, got {0}")]
    InvalidEdgeThreshold(f64),

    #[error("mask cutaway distance must be finite and non-negative, got {0}")]
    InvalidMaskCutaway(f64),

    #[error("detection delay must be finite and positive, got {0}s")]
    InvalidDetectionDelay(f64),

    #[error("observer is not active")]
    Inactive,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FovError {
    /// True for errors caused by a rejected configuration value.
    pub fn is_config_error(&self) -> bool {
        !matches!(self, FovError::Inactive | FovError::Json(_))
    }
}
