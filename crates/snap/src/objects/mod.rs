//! Per-object-type snapping strategies.

mod armature;
mod camera;
mod curve;
mod empty;
mod mesh;

use glam::Mat4;
use shared::{ObjectData, Scene, SceneObject};

use crate::cache::SnapCache;
use crate::hit::{ScreenTarget, SnapBest};
use crate::params::SnapElement;
use crate::viewport::ViewRay;

/// Everything that stays fixed while a query walks the scene
#[derive(Debug, Clone, Copy)]
pub(crate) struct SnapQuery<'q> {
    pub snap_to: SnapElement,
    pub ray: ViewRay,
    /// None for pure ray queries: candidates are ranked by depth alone
    pub screen: Option<ScreenTarget<'q>>,
    /// Orthographic view ray, mesh snapping rebases its start near the object
    pub ortho: bool,
}

/// Snap one object with world matrix `obmat`.
///
/// `use_obedit` makes meshes snap against the edit cage with edit-mode filtering.
/// On success the running best is stamped with the object and `obmat`.
pub(crate) fn snap_object(
    scene: &Scene,
    cache: &mut SnapCache,
    ob: &SceneObject,
    obmat: Mat4,
    use_obedit: bool,
    query: &SnapQuery,
    best: &mut SnapBest,
) -> bool {
    let snapped = match &ob.data {
        ObjectData::Mesh { .. } => mesh::snap_mesh(scene, cache, ob, obmat, use_obedit, query, best),
        ObjectData::Armature(arm) => armature::snap_armature(arm, obmat, query, best),
        ObjectData::Curve(cu) => curve::snap_curve(ob, cu, obmat, query, best),
        ObjectData::Empty => empty::snap_empty(ob, obmat, query, best),
        ObjectData::Camera(cam) => camera::snap_camera(scene, ob, cam, obmat, query, best),
        ObjectData::Lamp => false,
    };

    if snapped {
        best.set_owner(&ob.id, obmat);
    }
    snapped
}
