//! Scene traversal: decides which objects are snapped, in which order and with which matrix.

use shared::{ObjectData, ObjectMode, Scene, SceneObject};

use crate::cache::SnapCache;
use crate::dupli::object_duplilist;
use crate::hit::SnapBest;
use crate::math::transform_matrix;
use crate::objects::{snap_object, SnapQuery};
use crate::params::{SnapObjectParams, SnapSelect};

/// Snap every eligible object of the scene, threading `best` through all of them.
///
/// Order: the edit object (when snapping to everything), the active object
/// when it is in particle edit, then the scene objects in order. Duplicators
/// snap their instances before themselves.
pub(crate) fn snap_objects_ray(
    scene: &Scene,
    cache: &mut SnapCache,
    params: &SnapObjectParams,
    query: &SnapQuery,
    best: &mut SnapBest,
) -> bool {
    let base_act = if params.use_object_active {
        scene.active_object()
    } else {
        None
    };
    let obedit = if params.use_object_edit {
        scene.edit_object()
    } else {
        None
    };

    let mut snapped = false;

    if params.snap_select == SnapSelect::All {
        if let Some(ob) = obedit {
            snapped |= snap_object(scene, cache, ob, transform_matrix(&ob.transform), true, query, best);
        }
    }

    // Particle edit flags the active object for recalculation, the scene loop would skip it
    if let Some(ob) = base_act.filter(|ob| ob.mode == ObjectMode::ParticleEdit) {
        snapped |= snap_object(scene, cache, ob, transform_matrix(&ob.transform), false, query, best);
    }

    for ob in &scene.objects {
        if !ob.visible || ob.needs_recalc {
            continue;
        }
        let is_active = base_act.is_some_and(|act| act.id == ob.id);
        let eligible = match params.snap_select {
            SnapSelect::NotSelected => !(ob.selected || ob.was_selected),
            SnapSelect::All | SnapSelect::NotEditObject => !is_active,
        };
        if !eligible {
            continue;
        }

        let obmat = transform_matrix(&ob.transform);

        if ob.is_duplicator() {
            let duplis = object_duplilist(scene, ob, obmat);
            for dupli in &duplis {
                let (dupli_snap, use_obedit) = redirect_to_edit(dupli.object, obedit);
                snapped |= snap_object(scene, cache, dupli_snap, dupli.obmat, use_obedit, query, best);
            }
            tracing::trace!(object = %ob.id, instances = duplis.len(), "snapped duplicates");
        }

        let (ob_snap, use_obedit) = redirect_to_edit(ob, obedit);
        snapped |= snap_object(scene, cache, ob_snap, obmat, use_obedit, query, best);
    }

    snapped
}

/// Objects linked to the edit object's data snap the edit data with their own matrix
fn redirect_to_edit<'a>(ob: &'a SceneObject, obedit: Option<&'a SceneObject>) -> (&'a SceneObject, bool) {
    match obedit {
        Some(edit) if shares_data(ob, edit) => (edit, true),
        _ => (ob, false),
    }
}

fn shares_data(a: &SceneObject, b: &SceneObject) -> bool {
    if a.id == b.id {
        return true;
    }
    match (&a.data, &b.data) {
        (ObjectData::Mesh { mesh: ma }, ObjectData::Mesh { mesh: mb }) => ma == mb,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::Transform;

    fn mesh(id: &str, data: &str) -> SceneObject {
        SceneObject::new(id, ObjectData::Mesh { mesh: data.into() })
    }

    #[test]
    fn test_linked_duplicates_redirect_to_edit_object() {
        let edit = mesh("edit", "shared");
        let linked = mesh("linked", "shared");
        let other = mesh("other", "own");

        let (ob, use_obedit) = redirect_to_edit(&linked, Some(&edit));
        assert_eq!(ob.id, "edit");
        assert!(use_obedit);

        let (ob, use_obedit) = redirect_to_edit(&other, Some(&edit));
        assert_eq!(ob.id, "other");
        assert!(!use_obedit);

        let (_, use_obedit) = redirect_to_edit(&linked, None);
        assert!(!use_obedit);
    }

    #[test]
    fn test_non_mesh_data_only_shared_with_itself() {
        let mut a = SceneObject::new("a", ObjectData::Empty);
        a.transform = Transform::at([1.0, 0.0, 0.0]);
        let b = SceneObject::new("b", ObjectData::Empty);
        assert!(!shares_data(&a, &b));
        assert!(shares_data(&a, &a.clone()));
    }
}
