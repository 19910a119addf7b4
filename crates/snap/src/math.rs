//! Matrix helpers: scene transforms to glam matrices, object space for snapping.

use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};
use shared::Transform;

/// World matrix of a scene transform (scale, then XYZ euler rotation in degrees, then translation)
pub fn transform_matrix(transform: &Transform) -> Mat4 {
    let [tx, ty, tz] = transform.position;
    let [rx, ry, rz] = transform.rotation;
    let [sx, sy, sz] = transform.scale;

    let rotation = Quat::from_euler(
        EulerRot::ZYX,
        (rz as f32).to_radians(),
        (ry as f32).to_radians(),
        (rx as f32).to_radians(),
    );

    Mat4::from_scale_rotation_translation(
        Vec3::new(sx as f32, sy as f32, sz as f32),
        rotation,
        Vec3::new(tx as f32, ty as f32, tz as f32),
    )
}

/// Blend two rigid matrices: lerp translation and scale, slerp rotation.
pub fn blend_matrices(a: &Mat4, b: &Mat4, t: f32) -> Mat4 {
    let (sa, ra, ta) = a.to_scale_rotation_translation();
    let (sb, rb, tb) = b.to_scale_rotation_translation();
    Mat4::from_scale_rotation_translation(sa.lerp(sb, t), ra.slerp(rb, t), ta.lerp(tb, t))
}

/// An object's world matrix together with the derived matrices snapping needs.
#[derive(Debug, Clone, Copy)]
pub struct ObjectSpace {
    /// Local -> world
    pub obmat: Mat4,
    /// World -> local
    pub imat: Mat4,
    /// Transposed inverse, for normals
    pub timat: Mat3,
}

impl ObjectSpace {
    pub fn new(obmat: Mat4) -> Self {
        let imat = obmat.inverse();
        Self {
            obmat,
            imat,
            timat: Mat3::from_mat4(imat).transpose(),
        }
    }

    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.obmat.transform_point3(local)
    }

    /// Local normal to a unit world-space normal
    pub fn normal_to_world(&self, local: Vec3) -> Vec3 {
        (self.timat * local).normalize_or_zero()
    }
}
