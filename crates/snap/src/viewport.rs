//! 3D viewport: arc-ball camera, projection to pixels and cursor rays.

use glam::{Mat4, Vec2, Vec3, Vec4};
use serde::{Deserialize, Serialize};

/// Camera projection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Projection {
    /// Vertical field of view in degrees
    Perspective { fov: f32 },
    /// Half the visible height in world units
    Orthographic { scale: f32 },
}

/// Arc-ball camera for the 3D viewport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArcBallCamera {
    /// Horizontal rotation angle (radians)
    pub yaw: f32,
    /// Vertical rotation angle (radians)
    pub pitch: f32,
    /// Distance from target
    pub distance: f32,
    /// Camera target point
    pub target: Vec3,
    pub projection: Projection,
    pub clip_start: f32,
    pub clip_end: f32,
}

impl Default for ArcBallCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl ArcBallCamera {
    pub fn new() -> Self {
        Self {
            yaw: 0.6,
            pitch: 0.4,
            distance: 6.0,
            target: Vec3::ZERO,
            projection: Projection::Perspective { fov: 45.0 },
            clip_start: 0.1,
            clip_end: 200.0,
        }
    }

    /// Camera looking down -Z at `target` from `distance` units away
    pub fn front(target: Vec3, distance: f32, projection: Projection) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance,
            target,
            projection,
            ..Self::new()
        }
    }

    /// Camera position in world space
    pub fn eye_position(&self) -> Vec3 {
        let cy = self.yaw.cos();
        let sy = self.yaw.sin();
        let cp = self.pitch.cos();
        let sp = self.pitch.sin();

        self.target
            + Vec3::new(
                self.distance * cp * sy,
                self.distance * sp,
                self.distance * cp * cy,
            )
    }

    /// View matrix (world -> camera)
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    /// Projection matrix (camera -> clip)
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        match self.projection {
            Projection::Perspective { fov } => {
                Mat4::perspective_rh_gl(fov.to_radians(), aspect, self.clip_start, self.clip_end)
            }
            // Ortho clipping is centered on the eye, so geometry behind it stays visible
            Projection::Orthographic { scale } => Mat4::orthographic_rh_gl(
                -scale * aspect,
                scale * aspect,
                -scale,
                scale,
                -self.clip_end * 0.5,
                self.clip_end * 0.5,
            ),
        }
    }

    pub fn is_perspective(&self) -> bool {
        matches!(self.projection, Projection::Perspective { .. })
    }
}

/// Viewport region size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub width: f32,
    pub height: f32,
}

impl Region {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width * 0.5, self.height * 0.5)
    }
}

/// A ray derived from the viewport.
///
/// Depth is measured from `start`. `origin` is the view origin the ray was
/// cast from; in orthographic views it lies far behind the visible scene.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewRay {
    pub origin: Vec3,
    pub direction: Vec3,
    pub start: Vec3,
}

impl ViewRay {
    /// An explicit ray whose depth is measured from its origin
    pub fn from_origin(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
            start: origin,
        }
    }
}

/// Camera plus the region it draws into
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub camera: ArcBallCamera,
    pub region: Region,
}

impl Viewport {
    pub fn new(camera: ArcBallCamera, width: f32, height: f32) -> Self {
        Self {
            camera,
            region: Region { width, height },
        }
    }

    pub fn aspect(&self) -> f32 {
        self.region.width / self.region.height
    }

    pub fn is_perspective(&self) -> bool {
        self.camera.is_perspective()
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        self.camera.projection_matrix(self.aspect()) * self.camera.view_matrix()
    }

    /// Project a world-space point to region pixels (top-left origin).
    /// Returns None for points on or behind the perspective eye plane.
    pub fn project(&self, point: Vec3) -> Option<Vec2> {
        let p = self.view_projection() * point.extend(1.0);
        if p.w <= f32::EPSILON {
            return None;
        }
        let ndc = p.truncate() / p.w;
        Some(Vec2::new(
            (ndc.x + 1.0) * 0.5 * self.region.width,
            (1.0 - ndc.y) * 0.5 * self.region.height,
        ))
    }

    /// Cast a ray from a region pixel into the scene
    pub fn win_to_ray(&self, mval: Vec2) -> Option<ViewRay> {
        if self.region.width <= 0.0 || self.region.height <= 0.0 {
            return None;
        }

        // Region → NDC
        let ndc_x = mval.x / self.region.width * 2.0 - 1.0;
        let ndc_y = 1.0 - mval.y / self.region.height * 2.0;

        let vp_inv = self.view_projection().inverse();
        let unproject = |z: f32| {
            let w = vp_inv * Vec4::new(ndc_x, ndc_y, z, 1.0);
            w.truncate() / w.w
        };

        let near = unproject(-1.0);
        let far = unproject(1.0);
        let direction = (far - near).normalize_or_zero();
        if direction == Vec3::ZERO || !direction.is_finite() {
            return None;
        }

        let origin = if self.is_perspective() {
            self.camera.eye_position()
        } else {
            near
        };

        Some(ViewRay {
            origin,
            direction,
            start: near,
        })
    }
}
