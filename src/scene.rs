//! In-memory physics backend: prism obstacles and point targets.
//!
//! Obstacle footprints are precomputed once when an obstacle is added,
//! so each raycast only does the intersection math.

use crate::backend::{RayHit, RaycastBackend, TargetProvider};
use crate::collision::{
    obb_corners, ray_circle_intersection, ray_obb_intersection, Corners,
};
use crate::types::{LayerMask, Obstacle, ObstacleShape, Target, TargetId, Vec3};

#[derive(Debug, Clone)]
enum Footprint {
    Box(Corners),
    Circle { cx: f64, cz: f64, radius: f64 },
}

impl Footprint {
    fn of(obstacle: &Obstacle) -> Self {
        let c = obstacle.center;
        match obstacle.shape {
            ObstacleShape::Box {
                width,
                depth,
                rotation_deg,
            } => Footprint::Box(obb_corners(
                c.x,
                c.z,
                width / 2.0,
                depth / 2.0,
                (-rotation_deg).to_radians(),
            )),
            ObstacleShape::Cylinder { radius } => Footprint::Circle {
                cx: c.x,
                cz: c.z,
                radius,
            },
        }
    }

    fn ray_t(&self, origin: Vec3, direction: Vec3) -> Option<f64> {
        let (ox, oz, dx, dz) = (origin.x, origin.z, direction.x, direction.z);
        match *self {
            Footprint::Box(ref corners) => {
                ray_obb_intersection(ox, oz, dx, dz, corners)
            }
            Footprint::Circle { cx, cz, radius } => {
                ray_circle_intersection(ox, oz, dx, dz, cx, cz, radius)
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    obstacles: Vec<Obstacle>,
    footprints: Vec<Footprint>,
    targets: Vec<Target>,
}

impl Scene {
    pub fn new(obstacles: Vec<Obstacle>, targets: Vec<Target>) -> Self {
        let footprints = obstacles.iter().map(Footprint::of).collect();
        Self {
            obstacles,
            footprints,
            targets,
        }
    }

    pub fn add_obstacle(&mut self, obstacle: Obstacle) {
        self.footprints.push(Footprint::of(&obstacle));
        self.obstacles.push(obstacle);
    }

    /// Remove the obstacle at `index`, returning it if it existed.
    pub fn remove_obstacle(&mut self, index: usize) -> Option<Obstacle> {
        if index >= self.obstacles.len() {
            return None;
        }
        self.footprints.remove(index);
        Some(self.obstacles.remove(index))
    }

    /// Move a target; returns false if no target has that id.
    pub fn move_target(&mut self, id: TargetId, position: Vec3) -> bool {
        match self.targets.iter_mut().find(|t| t.id == id) {
            Some(t) => {
                t.position = position;
                true
            }
            None => false,
        }
    }
}

impl RaycastBackend for Scene {
    fn raycast(
        &self,
        origin: Vec3,
        direction: Vec3,
        max_distance: f64,
        mask: LayerMask,
    ) -> Option<RayHit> {
        let mut min_t = f64::INFINITY;
        for (obstacle, footprint) in self.obstacles.iter().zip(&self.footprints) {
            if !obstacle.layers.intersects(mask) {
                continue;
            }
            if let Some(t) = footprint.ray_t(origin, direction) {
                if t < min_t {
                    min_t = t;
                }
            }
        }
        if min_t.is_finite() && min_t <= max_distance {
            Some(RayHit {
                point: origin + direction * min_t,
                distance: min_t,
            })
        } else {
            None
        }
    }
}

impl TargetProvider for Scene {
    fn query_in_radius(
        &self,
        center: Vec3,
        radius: f64,
        mask: LayerMask,
    ) -> Vec<Target> {
        let r_sq = radius * radius;
        self.targets
            .iter()
            .filter(|t| t.layers.intersects(mask))
            .filter(|t| {
                let d = t.position - center;
                d.dot(d) <= r_sq
            })
            .copied()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn wall(x: f64, z: f64, width: f64, depth: f64) -> Obstacle {
        Obstacle {
            center: Vec3::new(x, 0.0, z),
            shape: ObstacleShape::Box {
                width,
                depth,
                rotation_deg: 0.0,
            },
            layers: LayerMask::ALL,
        }
    }

    fn target(id: u32, x: f64, z: f64) -> Target {
        Target {
            id: TargetId(id),
            position: Vec3::new(x, 0.0, z),
            layers: LayerMask::ALL,
        }
    }

    #[test]
    fn raycast_hits_nearest_obstacle() {
        let walls = vec![wall(0.0, 8.0, 4.0, 1.0), wall(0.0, 4.0, 4.0, 1.0)];
        let scene = Scene::new(walls, vec![]);
        let hit = scene
            .raycast(Vec3::ZERO, Vec3::FORWARD, 20.0, LayerMask::ALL)
            .unwrap();
        assert_abs_diff_eq!(hit.distance, 3.5, epsilon = 1e-9);
        assert_abs_diff_eq!(hit.point.z, 3.5, epsilon = 1e-9);
    }

    #[test]
    fn raycast_respects_max_distance() {
        let scene = Scene::new(vec![wall(0.0, 8.0, 4.0, 1.0)], vec![]);
        assert!(scene
            .raycast(Vec3::ZERO, Vec3::FORWARD, 5.0, LayerMask::ALL)
            .is_none());
    }

    #[test]
    fn raycast_respects_layers() {
        let mut w = wall(0.0, 4.0, 4.0, 1.0);
        w.layers = LayerMask::layer(3);
        let scene = Scene::new(vec![w], vec![]);
        assert!(scene
            .raycast(Vec3::ZERO, Vec3::FORWARD, 20.0, LayerMask::layer(1))
            .is_none());
        assert!(scene
            .raycast(Vec3::ZERO, Vec3::FORWARD, 20.0, LayerMask::layer(3))
            .is_some());
    }

    #[test]
    fn rotated_box_follows_yaw_convention() {
        // A long thin box rotated 90 degrees lies along the x axis.
        let o = Obstacle {
            center: Vec3::new(0.0, 0.0, 5.0),
            shape: ObstacleShape::Box {
                width: 1.0,
                depth: 10.0,
                rotation_deg: 90.0,
            },
            layers: LayerMask::ALL,
        };
        let scene = Scene::new(vec![o], vec![]);
        let hit = scene
            .raycast(Vec3::new(4.0, 0.0, 0.0), Vec3::FORWARD, 20.0, LayerMask::ALL)
            .unwrap();
        assert_abs_diff_eq!(hit.distance, 4.5, epsilon = 1e-9);
    }

    #[test]
    fn sloped_ray_distance_is_along_ray() {
        let scene = Scene::new(
            vec![Obstacle {
                center: Vec3::new(0.0, 0.0, 10.0),
                shape: ObstacleShape::Cylinder { radius: 1.0 },
                layers: LayerMask::ALL,
            }],
            vec![],
        );
        let dir = Vec3::new(0.0, 1.0, 1.0).normalized();
        let hit = scene.raycast(Vec3::ZERO, dir, 100.0, LayerMask::ALL).unwrap();
        assert_abs_diff_eq!(hit.distance, 9.0 * 2f64.sqrt(), epsilon = 1e-9);
        assert_abs_diff_eq!(hit.point.z, 9.0, epsilon = 1e-9);
    }

    #[test]
    fn remove_obstacle_clears_its_footprint() {
        let mut scene = Scene::new(vec![wall(0.0, 4.0, 4.0, 1.0)], vec![]);
        assert!(scene.remove_obstacle(0).is_some());
        assert!(scene.remove_obstacle(0).is_none());
        assert!(scene
            .raycast(Vec3::ZERO, Vec3::FORWARD, 20.0, LayerMask::ALL)
            .is_none());
    }

    #[test]
    fn query_in_radius_filters_distance_and_layers() {
        let far = target(3, 0.0, 11.0);
        let mut other_layer = target(4, 1.0, 0.0);
        other_layer.layers = LayerMask::layer(7);
        let scene = Scene::new(
            vec![],
            vec![target(1, 0.0, 5.0), target(2, 10.0, 0.0), far, other_layer],
        );
        let found = scene.query_in_radius(Vec3::ZERO, 10.0, LayerMask::layer(0));
        let ids: Vec<u32> = found.iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn move_target_updates_position() {
        let mut scene = Scene::new(vec![], vec![target(1, 0.0, 5.0)]);
        assert!(scene.move_target(TargetId(1), Vec3::new(0.0, 0.0, 50.0)));
        assert!(!scene.move_target(TargetId(9), Vec3::ZERO));
        assert!(scene
            .query_in_radius(Vec3::ZERO, 10.0, LayerMask::ALL)
            .is_empty());
    }
}
