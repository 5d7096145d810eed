//! One-shot frame computation over a self-contained scene.
//!
//! `compute_frame` is the stateless entry point used by the JSON/Python
//! surface and the benchmarks: it validates the config, builds a
//! [`Scene`] from the params, runs one detection pass and one view
//! polygon + mesh build, and returns everything in a [`FrameResult`].

use crate::detection::find_visible_targets;
use crate::error::FovError;
use crate::mesh::ViewMesh;
use crate::scene::Scene;
use crate::types::{FrameParams, FrameResult};
use crate::view::build_view_polygon;

pub fn compute_frame(params: &FrameParams) -> Result<FrameResult, FovError> {
    if let Err(e) = params.config.validate() {
        log::warn!("rejecting frame: {e}");
        return Err(e);
    }

    let scene = Scene::new(params.obstacles.clone(), params.targets.clone());
    let pose = &params.pose;
    let config = &params.config;

    let visible_targets = find_visible_targets(pose, config, &scene, &scene)
        .into_iter()
        .map(|t| t.id)
        .collect();
    let polygon = build_view_polygon(pose, config, &scene);
    let (vertices, triangles) =
        ViewMesh::from_polygon(pose, &polygon, config.mask_cutaway_dst).into_parts();

    Ok(FrameResult {
        visible_targets,
        boundary_points: polygon.points,
        vertices,
        triangles,
    })
}

/// JSON in, JSON out. Parse and serialization failures surface as
/// [`FovError::Json`].
pub fn compute_frame_json(params_json: &str) -> Result<String, FovError> {
    let params: FrameParams = serde_json::from_str(params_json)?;
    let result = compute_frame(&params)?;
    Ok(serde_json::to_string(&result)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FovConfig;
    use crate::types::{
        LayerMask, Obstacle, ObstacleShape, Pose, Target, TargetId, Vec3,
    };

    fn make_params() -> FrameParams {
        FrameParams {
            pose: Pose::new(Vec3::new(1.0, 0.0, -2.0), 20.0),
            config: FovConfig {
                view_radius: 12.0,
                view_angle: 100.0,
                mesh_resolution: 0.5,
                ..FovConfig::default()
            },
            obstacles: vec![
                Obstacle {
                    center: Vec3::new(3.0, 0.0, 4.0),
                    shape: ObstacleShape::Box {
                        width: 2.0,
                        depth: 1.0,
                        rotation_deg: 15.0,
                    },
                    layers: LayerMask::ALL,
                },
                Obstacle {
                    center: Vec3::new(-2.0, 0.0, 5.0),
                    shape: ObstacleShape::Cylinder { radius: 0.75 },
                    layers: LayerMask::ALL,
                },
            ],
            targets: vec![
                Target {
                    id: TargetId(7),
                    position: Vec3::new(1.0, 0.0, 3.0),
                    layers: LayerMask::ALL,
                },
                Target {
                    id: TargetId(8),
                    position: Vec3::new(1.0, 0.0, -8.0),
                    layers: LayerMask::ALL,
                },
            ],
        }
    }

    #[test]
    fn deterministic() {
        let r1 = compute_frame(&make_params()).unwrap();
        let r2 = compute_frame(&make_params()).unwrap();
        let j1 = serde_json::to_string(&r1).unwrap();
        let j2 = serde_json::to_string(&r2).unwrap();
        assert_eq!(j1, j2);
    }

    #[test]
    fn counts_are_consistent() {
        let r = compute_frame(&make_params()).unwrap();
        assert_eq!(r.triangles.len() % 3, 0);
        assert_eq!(r.boundary_points.len(), r.triangles.len() / 3 + 1);
        assert_eq!(r.vertices.len(), r.boundary_points.len() + 1);
        assert_eq!(r.vertices[0], Vec3::ZERO);
    }

    #[test]
    fn sees_target_ahead_not_behind() {
        let r = compute_frame(&make_params()).unwrap();
        assert_eq!(r.visible_targets, vec![TargetId(7)]);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut params = make_params();
        params.config.mesh_resolution = 0.0;
        let err = compute_frame(&params).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn json_round_trip_matches_direct_call() {
        let params_json = serde_json::to_string(&make_params()).unwrap();
        let out = compute_frame_json(&params_json).unwrap();
        let via_json: FrameResult = serde_json::from_str(&out).unwrap();
        assert_eq!(via_json, compute_frame(&make_params()).unwrap());
    }

    #[test]
    fn json_defaults_fill_config() {
        let json = r#"{
            "pose": { "position": { "x": 0.0, "z": 0.0 }, "yaw_deg": 0.0 },
            "obstacles": [
                {
                    "center": { "x": 0.0, "z": 4.0 },
                    "shape_type": "box",
                    "width": 4.0,
                    "depth": 1.0
                }
            ],
            "targets": [ { "id": 1, "position": { "x": 0.0, "z": 2.0 } } ]
        }"#;
        let out = compute_frame_json(json).unwrap();
        let r: FrameResult = serde_json::from_str(&out).unwrap();
        assert_eq!(r.visible_targets, vec![TargetId(1)]);
        // Default 90 degrees at 1 step per degree.
        assert!(r.boundary_points.len() >= 91);
        // The ray straight ahead stops at the box's near face.
        let ahead = r
            .boundary_points
            .iter()
            .find(|p| p.x.abs() < 1e-9)
            .copied()
            .unwrap();
        assert!((ahead.z - 3.5).abs() < 1e-9);
    }

    #[test]
    fn malformed_json_is_a_json_error() {
        let err = compute_frame_json("{ not json").unwrap_err();
        assert!(matches!(err, FovError::Json(_)));
        assert!(!err.is_config_error());
    }
}
