//! Ray intersection against obstacle footprints in the XZ plane.
//!
//! Rays are given as an origin `(ox, oz)` and a direction `(dx, dz)`
//! that need not be unit length; returned `t` values are in units of
//! that direction, so passing the XZ part of a unit 3D direction yields
//! distances along the 3D ray.

pub type Corners = [(f64, f64); 4];

/// World-space corners of an oriented box, counter-clockwise from the
/// (-w, -d) corner.
pub fn obb_corners(
    cx: f64,
    cz: f64,
    half_w: f64,
    half_d: f64,
    rot_rad: f64,
) -> Corners {
    let cos_r = rot_rad.cos();
    let sin_r = rot_rad.sin();
    const SIGNS: [(f64, f64); 4] =
        [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
    let mut corners = [(0.0, 0.0); 4];
    for (i, &(sx, sz)) in SIGNS.iter().enumerate() {
        let lx = sx * half_w;
        let lz = sz * half_d;
        corners[i] = (cx + lx * cos_r - lz * sin_r, cz + lx * sin_r + lz * cos_r);
    }
    corners
}

/// Ray-casting point-in-polygon test.
pub fn point_in_polygon(px: f64, pz: f64, vertices: &[(f64, f64)]) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, zi) = vertices[i];
        let (xj, zj) = vertices[j];
        if (zi > pz) != (zj > pz) {
            let intersect_x = (xj - xi) * (pz - zi) / (zj - zi) + xi;
            if px < intersect_x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Find parameter t where ray (ox+t*dx, oz+t*dz) hits segment.
/// Returns Some(t) if hit (t >= 0), None if miss or parallel.
#[allow(clippy::too_many_arguments)]
pub fn ray_segment_intersection(
    ox: f64,
    oz: f64,
    dx: f64,
    dz: f64,
    x1: f64,
    z1: f64,
    x2: f64,
    z2: f64,
) -> Option<f64> {
    let sx = x2 - x1;
    let sz = z2 - z1;
    let denom = dx * sz - dz * sx;
    if denom.abs() < 1e-12 {
        return None;
    }

    let t = ((x1 - ox) * sz - (z1 - oz) * sx) / denom;
    let u = ((x1 - ox) * dz - (z1 - oz) * dx) / denom;

    if t >= 0.0 && (0.0..=1.0).contains(&u) {
        Some(t)
    } else {
        None
    }
}

/// Nearest t >= 0 where the ray enters the box. A ray that starts
/// inside the box hits at t = 0.
pub fn ray_obb_intersection(
    ox: f64,
    oz: f64,
    dx: f64,
    dz: f64,
    corners: &Corners,
) -> Option<f64> {
    if point_in_polygon(ox, oz, corners) {
        return Some(0.0);
    }
    let mut min_t: Option<f64> = None;
    for i in 0..4 {
        let j = (i + 1) % 4;
        let (x1, z1) = corners[i];
        let (x2, z2) = corners[j];
        if let Some(t) = ray_segment_intersection(ox, oz, dx, dz, x1, z1, x2, z2) {
            if min_t.map_or(true, |m| t < m) {
                min_t = Some(t);
            }
        }
    }
    min_t
}

/// Nearest t >= 0 where the ray enters the circle. A ray that starts
/// inside (or on) the circle hits at t = 0.
pub fn ray_circle_intersection(
    ox: f64,
    oz: f64,
    dx: f64,
    dz: f64,
    cx: f64,
    cz: f64,
    radius: f64,
) -> Option<f64> {
    let fx = ox - cx;
    let fz = oz - cz;
    let c = fx * fx + fz * fz - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }
    let a = dx * dx + dz * dz;
    if a < 1e-24 {
        return None;
    }
    let b = 2.0 * (fx * dx + fz * dz);
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    // Origin is outside, so both roots share a sign; only the near root
    // matters.
    let t0 = (-b - disc.sqrt()) / (2.0 * a);
    if t0 >= 0.0 {
        Some(t0)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_hits_segment() {
        let t = ray_segment_intersection(0.0, 0.0, 1.0, 0.0, 5.0, -5.0, 5.0, 5.0);
        assert!(t.is_some());
        assert!((t.unwrap() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn ray_misses_segment_behind() {
        let t = ray_segment_intersection(0.0, 0.0, 1.0, 0.0, -5.0, -5.0, -5.0, 5.0);
        assert!(t.is_none());
    }

    #[test]
    fn parallel_ray_misses_segment() {
        let t = ray_segment_intersection(0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 5.0, 1.0);
        assert!(t.is_none());
    }

    #[test]
    fn point_inside_polygon() {
        let sq = vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
        assert!(point_in_polygon(5.0, 5.0, &sq));
        assert!(!point_in_polygon(15.0, 5.0, &sq));
    }

    #[test]
    fn obb_corners_rotated_quarter_turn() {
        let c = obb_corners(0.0, 0.0, 2.0, 1.0, std::f64::consts::FRAC_PI_2);
        // Width now spans z, depth spans x.
        let max_z = c.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        let max_x = c.iter().map(|p| p.0).fold(f64::NEG_INFINITY, f64::max);
        assert!((max_z - 2.0).abs() < 1e-9);
        assert!((max_x - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ray_enters_box_at_near_face() {
        let c = obb_corners(5.0, 0.0, 1.0, 1.0, 0.0);
        let t = ray_obb_intersection(0.0, 0.0, 1.0, 0.0, &c).unwrap();
        assert!((t - 4.0).abs() < 1e-9);
    }

    #[test]
    fn ray_inside_box_hits_immediately() {
        let c = obb_corners(0.0, 0.0, 1.0, 1.0, 0.0);
        assert_eq!(ray_obb_intersection(0.2, 0.1, 0.0, 1.0, &c), Some(0.0));
    }

    #[test]
    fn ray_passes_beside_box() {
        let c = obb_corners(5.0, 3.0, 1.0, 1.0, 0.0);
        assert!(ray_obb_intersection(0.0, 0.0, 1.0, 0.0, &c).is_none());
    }

    #[test]
    fn ray_hits_circle() {
        let t = ray_circle_intersection(0.0, 0.0, 0.0, 1.0, 0.0, 10.0, 2.0).unwrap();
        assert!((t - 8.0).abs() < 1e-9);
    }

    #[test]
    fn ray_misses_circle_behind_and_beside() {
        // Circle behind the ray.
        let behind = ray_circle_intersection(0.0, 0.0, 0.0, 1.0, 0.0, -10.0, 2.0);
        assert!(behind.is_none());
        // Circle off to the side.
        let aside = ray_circle_intersection(0.0, 0.0, 0.0, 1.0, 5.0, 10.0, 2.0);
        assert!(aside.is_none());
    }

    #[test]
    fn unnormalized_direction_scales_t() {
        let t = ray_circle_intersection(0.0, 0.0, 0.0, 0.5, 0.0, 10.0, 2.0).unwrap();
        assert!((t - 16.0).abs() < 1e-9);
    }
}
