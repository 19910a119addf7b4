//! Single-element snap tests: one vertex or one edge against the ray and cursor.

use glam::Vec3;

use crate::hit::{pixel_distance, ScreenTarget, SnapBest};
use crate::math::ObjectSpace;
use crate::viewport::ViewRay;

/// Length of the ray segment edges are intersected with (object-local units)
const EDGE_RAY_LENGTH: f32 = 2000.0;

/// Edges may win with a depth up to this factor behind the best so far
const EDGE_DEPTH_TOLERANCE: f32 = 1.001;

/// The query ray expressed in an object's local space
#[derive(Debug, Clone, Copy)]
pub struct SnapRay {
    /// World-space start, depths are measured from here
    pub start: Vec3,
    pub start_local: Vec3,
    /// Unit length in local space
    pub dir_local: Vec3,
    /// Length of the world direction once taken to local space
    pub local_scale: f32,
}

impl SnapRay {
    pub fn to_local(ray: &ViewRay, space: &ObjectSpace) -> Self {
        let dir_local = space.imat.transform_vector3(ray.direction);
        let local_scale = dir_local.length();
        Self {
            start: ray.start,
            start_local: space.imat.transform_point3(ray.start),
            dir_local: dir_local.normalize_or_zero(),
            local_scale,
        }
    }

    fn is_in_front(&self, local: Vec3) -> bool {
        self.dir_local.dot(local - self.start_local) > 0.0
    }
}

/// Closest points between line `a1 a2` and line `b1 b2`, as parameters along each.
/// None for parallel or degenerate lines.
pub fn isect_line_line(a1: Vec3, a2: Vec3, b1: Vec3, b2: Vec3) -> Option<(f32, f32)> {
    let d1 = a2 - a1;
    let d2 = b2 - b1;
    let r = a1 - b1;

    let a = d1.dot(d1);
    let e = d2.dot(d2);
    let b = d1.dot(d2);
    let c = d1.dot(r);
    let f = d2.dot(r);

    let denom = a * e - b * b;
    if denom <= f32::EPSILON * a * e || a == 0.0 || e == 0.0 {
        return None;
    }

    let s = (b * f - c * e) / denom;
    let t = (a * f - b * c) / denom;
    Some((s, t))
}

/// Try to snap to a single local-space vertex.
///
/// Accepts when the vertex is in front of the ray start, no farther from the
/// cursor than the best so far, and strictly closer along the ray.
pub fn snap_vertex(
    co: Vec3,
    no: Option<Vec3>,
    space: &ObjectSpace,
    screen: Option<&ScreenTarget>,
    ray: &SnapRay,
    best: &mut SnapBest,
) -> bool {
    if !ray.is_in_front(co) {
        return false;
    }

    let location = space.to_world(co);
    let new_depth = location.distance(ray.start);
    let new_dist = pixel_distance(screen, location);

    if new_dist <= best.dist_px && new_depth < best.ray_depth {
        let normal = no.map(|n| space.normal_to_world(n));
        best.accept(location, normal, new_dist, new_depth);
        true
    } else {
        false
    }
}

/// Try to snap to the point of a local-space edge closest to the ray.
///
/// Like [`snap_vertex`], except an edge a hair farther along the ray
/// (within 0.1%) still wins when it is at least as close in pixels, so the
/// snap slides along chains of slanted edges instead of sticking.
pub fn snap_edge(
    (v1, v2): (Vec3, Vec3),
    normals: Option<(Vec3, Vec3)>,
    space: &ObjectSpace,
    screen: Option<&ScreenTarget>,
    ray: &SnapRay,
    best: &mut SnapBest,
) -> bool {
    let ray_end = ray.start_local + ray.dir_local * EDGE_RAY_LENGTH;
    let Some((s, _)) = isect_line_line(v1, v2, ray.start_local, ray_end) else {
        return false;
    };

    let s = s.clamp(0.0, 1.0);
    let local = v1.lerp(v2, s);
    // Front test on the clamped point: the one that would be snapped to
    if !ray.is_in_front(local) {
        return false;
    }

    let location = space.to_world(local);
    let new_depth = location.distance(ray.start);
    let new_dist = pixel_distance(screen, location);

    if new_dist <= best.dist_px && new_depth < best.ray_depth * EDGE_DEPTH_TOLERANCE {
        let normal = normals.map(|(n1, n2)| space.normal_to_world(n1.lerp(n2, s)));
        best.accept(location, normal, new_dist, new_depth);
        true
    } else {
        false
    }
}
