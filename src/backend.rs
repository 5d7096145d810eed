//! Capabilities the engine consumes from its host.
//!
//! The physics side (`TargetProvider`, `RaycastBackend`) is read-only
//! and must be `Sync` so detection can test candidates in parallel.
//! The sinks receive each pass's output and decide how to present it.

use crate::mesh::ViewMesh;
use crate::types::{LayerMask, Target, TargetId, Vec3};

/// Nearest obstacle struck by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub point: Vec3,
    /// Distance from the ray origin along the ray.
    pub distance: f64,
}

pub trait RaycastBackend: Sync {
    /// Cast a ray from `origin` along the unit vector `direction`, up to
    /// `max_distance`. Returns the nearest hit against obstacles whose
    /// layers intersect `mask`.
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f64,
        mask: LayerMask,
    ) -> Option<RayHit>;
}

pub trait TargetProvider: Sync {
    /// All targets within `radius` of `center` on layers in `mask`.
    fn query_in_radius(
        &self,
        center: Vec3,
        radius: f64,
        mask: LayerMask,
    ) -> Vec<Target>;

    /// Every target on layers in `mask`, regardless of distance.
    fn all_targets(&self, mask: LayerMask) -> Vec<Target> {
        self.query_in_radius(Vec3::ZERO, f64::INFINITY, mask)
    }
}

pub trait RenderSink {
    fn upload(&mut self, mesh: &ViewMesh);
}

pub trait PresentationSink {
    fn set_target_visible(&mut self, id: TargetId, visible: bool);
}
