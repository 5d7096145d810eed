//! Fan triangulation of a view polygon into an observer-local mesh.

use crate::types::{Pose, Vec3};
use crate::view::ViewPolygon;

/// Renderable view mesh. Vertex 0 is the apex at the observer's local
/// origin; vertex `k + 1` is boundary point `k`. Built once per tick
/// and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewMesh {
    vertices: Vec<Vec3>,
    triangles: Vec<u32>,
}

impl ViewMesh {
    /// Triangulate `polygon` as a fan around the observer.
    ///
    /// Boundary points are moved into the observer's local frame and
    /// pushed `mask_cutaway_dst` along local forward so the mesh does not
    /// z-fight with the surfaces the rays struck.
    pub fn from_polygon(
        pose: &Pose,
        polygon: &ViewPolygon,
        mask_cutaway_dst: f64,
    ) -> Self {
        let n = polygon.points.len();
        let mut vertices = Vec::with_capacity(n + 1);
        let mut triangles = Vec::with_capacity(n.saturating_sub(1) * 3);

        let cutaway = Vec3::FORWARD * mask_cutaway_dst;
        vertices.push(Vec3::ZERO);
        for (i, &p) in polygon.points.iter().enumerate() {
            vertices.push(pose.inverse_transform_point(p) + cutaway);
            if i + 1 < n {
                let k = i as u32;
                triangles.extend_from_slice(&[0, k + 1, k + 2]);
            }
        }

        Self {
            vertices,
            triangles,
        }
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Flat index list, three indices per triangle.
    pub fn triangles(&self) -> &[u32] {
        &self.triangles
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len() / 3
    }

    pub fn into_parts(self) -> (Vec<Vec3>, Vec<u32>) {
        (self.vertices, self.triangles)
    }
}
