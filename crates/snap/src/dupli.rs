//! Expansion of duplicator objects into their instances.

use glam::Mat4;
use shared::{Scene, SceneObject};

use crate::math::transform_matrix;

/// One generated instance: the object it copies and where it is placed
#[derive(Debug, Clone, Copy)]
pub struct DupliObject<'a> {
    pub object: &'a SceneObject,
    /// World matrix of this instance
    pub obmat: Mat4,
}

/// Instances generated by `ob`, placed relative to its world matrix `obmat`.
///
/// Instances of objects missing from the scene are skipped.
pub fn object_duplilist<'a>(scene: &'a Scene, ob: &SceneObject, obmat: Mat4) -> Vec<DupliObject<'a>> {
    let Some(duplicator) = &ob.duplicator else {
        return Vec::new();
    };

    duplicator
        .instances
        .iter()
        .filter_map(|instance| {
            let Some(object) = scene.object(&instance.object) else {
                tracing::debug!(duplicator = %ob.id, object = %instance.object, "instance of unknown object");
                return None;
            };
            Some(DupliObject {
                object,
                obmat: obmat * transform_matrix(&instance.transform),
            })
        })
        .collect()
}
