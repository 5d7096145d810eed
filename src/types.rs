//! Data types shared by the detector, the view builder and the JSON
//! interchange format.
//!
//! Every struct that crosses the JSON boundary derives Serialize +
//! Deserialize so frames can round-trip through `compute_frame_json`.

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

use crate::config::FovConfig;

// -- Geometry ------------------------------------------------------

/// A point or direction in world space. +Y is up, yaw 0 faces +Z.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Vec3 {
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 0.0 };
    pub const FORWARD: Vec3 = Vec3 { x: 0.0, y: 0.0, z: 1.0 };

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(self, other: Vec3) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or zero for a (near) zero vector.
    pub fn normalized(self) -> Vec3 {
        let len = self.length();
        if len < 1e-12 {
            Vec3::ZERO
        } else {
            self * (1.0 / len)
        }
    }

    /// Unsigned angle between two vectors in degrees, in [0, 180].
    /// Returns 0 when either vector is (near) zero.
    pub fn angle_deg(self, other: Vec3) -> f64 {
        let denom = (self.dot(self) * other.dot(other)).sqrt();
        if denom < 1e-15 {
            return 0.0;
        }
        (self.dot(other) / denom).clamp(-1.0, 1.0).acos().to_degrees()
    }
}

impl Add for Vec3 {
    type Output = Vec3;
    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;
    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Vec3;
    fn mul(self, rhs: f64) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Horizontal unit direction for a global yaw angle in degrees.
pub fn dir_from_yaw(angle_deg: f64) -> Vec3 {
    let rad = angle_deg.to_radians();
    Vec3::new(rad.sin(), 0.0, rad.cos())
}

/// Observer transform: world position plus yaw about +Y, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Pose {
    pub position: Vec3,
    #[serde(default)]
    pub yaw_deg: f64,
}

impl Pose {
    pub fn new(position: Vec3, yaw_deg: f64) -> Self {
        Self { position, yaw_deg }
    }

    pub fn forward(&self) -> Vec3 {
        dir_from_yaw(self.yaw_deg)
    }

    /// Direction for an angle that is either global or relative to
    /// this pose's yaw.
    pub fn dir_from_angle(&self, angle_deg: f64, angle_is_global: bool) -> Vec3 {
        if angle_is_global {
            dir_from_yaw(angle_deg)
        } else {
            dir_from_yaw(angle_deg + self.yaw_deg)
        }
    }

    /// Map a world-space point into this pose's local frame
    /// (local +Z is forward, local +X is right).
    pub fn inverse_transform_point(&self, p: Vec3) -> Vec3 {
        let d = p - self.position;
        let (sin_y, cos_y) = self.yaw_deg.to_radians().sin_cos();
        Vec3::new(
            d.x * cos_y - d.z * sin_y,
            d.y,
            d.x * sin_y + d.z * cos_y,
        )
    }
}

// -- Layers / targets ----------------------------------------------

/// Bitmask selecting which layers a query considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    pub const ALL: LayerMask = LayerMask(u32::MAX);
    pub const NONE: LayerMask = LayerMask(0);

    /// Mask with only `layer` set. Layers above 31 select nothing.
    pub fn layer(layer: u32) -> LayerMask {
        LayerMask(1u32.checked_shl(layer).unwrap_or(0))
    }

    pub fn intersects(self, other: LayerMask) -> bool {
        self.0 & other.0 != 0
    }
}

impl Default for LayerMask {
    fn default() -> Self {
        LayerMask::ALL
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TargetId(pub u32);

/// A point-like entity the detector can see.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: TargetId,
    pub position: Vec3,
    #[serde(default)]
    pub layers: LayerMask,
}

// -- Obstacles -----------------------------------------------------

/// Footprint of an obstacle in the XZ plane. Obstacles extend
/// infinitely along Y.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape_type", rename_all = "snake_case")]
pub enum ObstacleShape {
    /// Oriented box. `rotation_deg` uses the observer yaw convention:
    /// the box's depth axis points along `dir_from_yaw(rotation_deg)`.
    Box {
        width: f64,
        depth: f64,
        #[serde(default)]
        rotation_deg: f64,
    },
    Cylinder { radius: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub center: Vec3,
    #[serde(flatten)]
    pub shape: ObstacleShape,
    #[serde(default)]
    pub layers: LayerMask,
}

// -- Frame I/O -----------------------------------------------------

/// Everything needed to compute one frame for one observer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameParams {
    pub pose: Pose,
    #[serde(default)]
    pub config: FovConfig,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    #[serde(default)]
    pub targets: Vec<Target>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameResult {
    pub visible_targets: Vec<TargetId>,
    /// World-space boundary points in sweep order.
    pub boundary_points: Vec<Vec3>,
    /// Observer-local mesh vertices; vertex 0 is the apex.
    pub vertices: Vec<Vec3>,
    /// Flat triangle index list, three indices per triangle.
    pub triangles: Vec<u32>,
}
