//! Visible-target detection.
//!
//! A target is visible when it is inside the view radius, strictly
//! inside half the view angle of the facing direction, and no obstacle
//! blocks the straight segment from the observer to it. Candidates are
//! tested in parallel; the backends are read-only during a pass.

use rayon::prelude::*;

use crate::backend::{RaycastBackend, TargetProvider};
use crate::config::FovConfig;
use crate::types::{Pose, Target, TargetId};

/// Why a candidate target was rejected, or that it is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sighting {
    Visible,
    OutOfRange,
    OutsideCone,
    Occluded,
}

/// Classify a single target against the observer.
pub fn classify_target<R: RaycastBackend + ?Sized>(
    pose: &Pose,
    config: &FovConfig,
    backend: &R,
    target: &Target,
) -> Sighting {
    let origin = pose.position;
    let offset = target.position - origin;
    let distance = offset.length();
    if distance > config.view_radius {
        return Sighting::OutOfRange;
    }
    // A target on top of the observer has no direction; treat it as dead
    // ahead and unobstructed.
    if distance < 1e-12 {
        return Sighting::Visible;
    }
    let dir = offset * (1.0 / distance);
    if pose.forward().angle_deg(dir) >= config.view_angle / 2.0 {
        return Sighting::OutsideCone;
    }
    if backend
        .raycast(origin, dir, distance, config.obstacle_mask)
        .is_some()
    {
        return Sighting::Occluded;
    }
    Sighting::Visible
}

/// Run one detection pass. The result keeps the provider's order.
pub fn find_visible_targets<P, R>(
    pose: &Pose,
    config: &FovConfig,
    provider: &P,
    backend: &R,
) -> Vec<Target>
where
    P: TargetProvider + ?Sized,
    R: RaycastBackend + ?Sized,
{
    let candidates = provider.query_in_radius(
        pose.position,
        config.view_radius,
        config.target_mask,
    );
    let visible: Vec<Target> = candidates
        .par_iter()
        .filter(|t| classify_target(pose, config, backend, t) == Sighting::Visible)
        .copied()
        .collect();
    log::debug!(
        "detection pass: {} candidates, {} visible",
        candidates.len(),
        visible.len()
    );
    visible
}

/// The set of targets seen by the latest detection pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VisibleTargets {
    targets: Vec<Target>,
}

impl VisibleTargets {
    /// Swap in the result of a new pass; nothing from the previous pass
    /// survives.
    pub fn replace(&mut self, targets: Vec<Target>) {
        self.targets = targets;
    }

    pub fn contains(&self, id: TargetId) -> bool {
        self.targets.iter().any(|t| t.id == id)
    }

    pub fn ids(&self) -> Vec<TargetId> {
        self.targets.iter().map(|t| t.id).collect()
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn clear(&mut self) {
        self.targets.clear();
    }
}
