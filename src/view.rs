//! View-polygon construction via angular ray sweep.
//!
//! Casts a fan of rays across the observer's view angle, one every
//! `view_angle / step_count` degrees. Wherever two adjacent rays disagree
//! (one hits and one misses, or both hit at very different depths) the
//! gap is bisected to place extra points on the occluding edge, so the
//! outline follows obstacle silhouettes without needing a dense fan.

use crate::backend::RaycastBackend;
use crate::config::FovConfig;
use crate::types::{Pose, Vec3};

/// Result of one ray probe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewCast {
    pub hit: bool,
    /// Strike point, or the point at full view radius on a miss.
    pub point: Vec3,
    pub distance: f64,
    /// Global yaw angle the ray was cast at, in degrees.
    pub angle_deg: f64,
}

/// Boundary points bracketing an occlusion discontinuity.
///
/// `near` lies on the same side as the first cast of the pair, `far` on
/// the same side as the second. Either is `None` when bisection never
/// landed on that side.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Edge {
    pub near: Option<Vec3>,
    pub far: Option<Vec3>,
}

/// Boundary of the visible region in sweep order. The apex (the
/// observer position) is implicit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewPolygon {
    pub points: Vec<Vec3>,
}

/// Borrowed state for one sweep.
struct Sweep<'a, R: ?Sized> {
    pose: &'a Pose,
    config: &'a FovConfig,
    backend: &'a R,
    casts: usize,
}

impl<'a, R: RaycastBackend + ?Sized> Sweep<'a, R> {
    fn new(pose: &'a Pose, config: &'a FovConfig, backend: &'a R) -> Self {
        Self {
            pose,
            config,
            backend,
            casts: 0,
        }
    }

    fn cast(&mut self, global_angle: f64) -> ViewCast {
        self.casts += 1;
        let origin = self.pose.position;
        let dir = self.pose.dir_from_angle(global_angle, true);
        let radius = self.config.view_radius;
        match self
            .backend
            .raycast(origin, dir, radius, self.config.obstacle_mask)
        {
            Some(hit) => ViewCast {
                hit: true,
                point: hit.point,
                distance: hit.distance,
                angle_deg: global_angle,
            },
            None => ViewCast {
                hit: false,
                point: origin + dir * radius,
                distance: radius,
                angle_deg: global_angle,
            },
        }
    }

    /// True if `b` lands on the same side of an edge as `a`.
    fn same_side(&self, a: &ViewCast, b: &ViewCast) -> bool {
        let threshold = self.config.edge_dst_threshold;
        let dst_exceeded = (a.distance - b.distance).abs() > threshold;
        a.hit == b.hit && !(a.hit && dst_exceeded)
    }

    fn find_edge(&mut self, near: &ViewCast, far: &ViewCast) -> Edge {
        let mut min_angle = near.angle_deg;
        let mut max_angle = far.angle_deg;
        let mut edge = Edge::default();

        for _ in 0..self.config.edge_resolve_iterations {
            let angle = (min_angle + max_angle) / 2.0;
            let mid = self.cast(angle);

            // Classified against the starting near cast, not the moving
            // bound.
            let gap = (near.distance - mid.distance).abs();
            let dst_exceeded = gap > self.config.edge_dst_threshold;
            if mid.hit == near.hit && !dst_exceeded {
                min_angle = angle;
                edge.near = Some(mid.point);
            } else {
                max_angle = angle;
                edge.far = Some(mid.point);
            }
        }
        edge
    }

    fn run(&mut self) -> ViewPolygon {
        let step_count = self.config.step_count();
        debug_assert!(step_count >= 1, "config must be validated before sweeping");
        let step_angle = self.config.step_angle();
        let start_angle = self.pose.yaw_deg - self.config.view_angle / 2.0;

        let mut points: Vec<Vec3> = Vec::with_capacity(step_count as usize + 1);
        let mut prev: Option<ViewCast> = None;
        let mut edges = 0usize;

        for i in 0..=step_count {
            let angle = start_angle + step_angle * i as f64;
            let cast = self.cast(angle);

            if let Some(prev) = prev {
                if !self.same_side(&prev, &cast) {
                    edges += 1;
                    let edge = self.find_edge(&prev, &cast);
                    points.extend(edge.near);
                    points.extend(edge.far);
                }
            }

            points.push(cast.point);
            prev = Some(cast);
        }

        log::trace!(
            "view sweep: {} steps, {} casts, {} edges, {} points",
            step_count,
            self.casts,
            edges,
            points.len()
        );
        ViewPolygon { points }
    }
}

/// Probe a single global angle from the observer.
pub fn view_cast<R: RaycastBackend + ?Sized>(
    pose: &Pose,
    config: &FovConfig,
    backend: &R,
    global_angle: f64,
) -> ViewCast {
    Sweep::new(pose, config, backend).cast(global_angle)
}

/// Bisect the angular gap between `near` and `far` to locate the
/// occlusion boundary between them.
pub fn find_edge<R: RaycastBackend + ?Sized>(
    pose: &Pose,
    config: &FovConfig,
    backend: &R,
    near: &ViewCast,
    far: &ViewCast,
) -> Edge {
    Sweep::new(pose, config, backend).find_edge(near, far)
}

/// Sweep the full view angle and return the boundary points.
///
/// `config` must have passed `FovConfig::validate`.
pub fn build_view_polygon<R: RaycastBackend + ?Sized>(
    pose: &Pose,
    config: &FovConfig,
    backend: &R,
) -> ViewPolygon {
    Sweep::new(pose, config, backend).run()
}
