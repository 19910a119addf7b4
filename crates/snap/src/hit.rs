//! Snap results and the running best threaded through a scene traversal.

use glam::{Mat4, Vec2, Vec3};
use serde::Serialize;
use shared::ObjectId;

use crate::viewport::Viewport;

/// Pixel distance given to points that cannot be projected
pub const DIST_MAX_PX: f32 = 1000.0;

/// "Unbounded" ray depth
pub const RAY_DIST_MAX: f32 = f32::MAX;

/// Location and normal of a snap
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SnapPoint {
    pub location: Vec3,
    /// None for elements without a normal (bones, curve points, empties, bundles)
    pub normal: Option<Vec3>,
}

/// A snap candidate: where it is, how far from the cursor and along the ray, and who owns it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapHit {
    pub location: Vec3,
    pub normal: Option<Vec3>,
    /// Manhattan distance to the cursor in pixels (0 for pure ray queries)
    pub dist_px: f32,
    /// World-space distance from the ray start
    pub ray_depth: f32,
    /// Face index in the owning mesh's original polygon list (face snapping only)
    pub index: Option<usize>,
    pub object: Option<ObjectId>,
    /// World matrix the element was snapped with (instance matrix for duplicates)
    pub obmat: Mat4,
}

impl SnapHit {
    pub fn point(&self) -> SnapPoint {
        SnapPoint {
            location: self.location,
            normal: self.normal,
        }
    }
}

/// Cursor position the candidates are measured against
#[derive(Debug, Clone, Copy)]
pub struct ScreenTarget<'a> {
    pub viewport: &'a Viewport,
    pub mval: Vec2,
}

impl ScreenTarget<'_> {
    pub fn pixel_distance(&self, location: Vec3) -> f32 {
        match self.viewport.project(location) {
            Some(p) => (p.x - self.mval.x).abs() + (p.y - self.mval.y).abs(),
            None => DIST_MAX_PX,
        }
    }
}

/// Pixel distance of `location`, 0 when there is no cursor to measure against
pub fn pixel_distance(screen: Option<&ScreenTarget>, location: Vec3) -> f32 {
    screen.map_or(0.0, |s| s.pixel_distance(location))
}

/// Running best of a traversal.
///
/// `dist_px` only ever shrinks. `ray_depth` shrinks for vertex and face hits;
/// edges may grow it by at most 0.1%.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapBest {
    pub dist_px: f32,
    pub ray_depth: f32,
    pub hit: Option<SnapHit>,
}

impl SnapBest {
    pub fn new(dist_px: f32, ray_depth: f32) -> Self {
        Self {
            dist_px,
            ray_depth,
            hit: None,
        }
    }

    /// Record a vertex/edge candidate that passed its acceptance test
    pub(crate) fn accept(&mut self, location: Vec3, normal: Option<Vec3>, dist_px: f32, ray_depth: f32) {
        debug_assert!(dist_px <= self.dist_px, "pixel distance must never relax");
        self.dist_px = dist_px;
        self.ray_depth = ray_depth;
        self.hit = Some(SnapHit {
            location,
            normal,
            dist_px,
            ray_depth,
            index: None,
            object: None,
            obmat: Mat4::IDENTITY,
        });
    }

    /// Record a face candidate: it tightens depth only, faces are ordered along the ray
    pub(crate) fn accept_face(
        &mut self,
        location: Vec3,
        normal: Vec3,
        index: usize,
        dist_px: f32,
        ray_depth: f32,
    ) {
        self.ray_depth = ray_depth;
        self.hit = Some(SnapHit {
            location,
            normal: Some(normal),
            dist_px,
            ray_depth,
            index: Some(index),
            object: None,
            obmat: Mat4::IDENTITY,
        });
    }

    /// Attach the owning object to the current hit
    pub(crate) fn set_owner(&mut self, object: &ObjectId, obmat: Mat4) {
        if let Some(hit) = &mut self.hit {
            hit.object = Some(object.clone());
            hit.obmat = obmat;
        }
    }
}
