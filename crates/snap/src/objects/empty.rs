use glam::{Mat4, Vec3};
use shared::SceneObject;

use crate::hit::SnapBest;
use crate::math::ObjectSpace;
use crate::params::SnapElement;
use crate::primitives::{snap_vertex, SnapRay};

use super::SnapQuery;

/// Snap to the empty's origin.
/// Empties that duplicate other objects only contribute through their instances.
pub(super) fn snap_empty(ob: &SceneObject, obmat: Mat4, query: &SnapQuery, best: &mut SnapBest) -> bool {
    if ob.is_duplicator() || query.snap_to != SnapElement::Vertex {
        return false;
    }

    let space = ObjectSpace::new(obmat);
    let ray = SnapRay::to_local(&query.ray, &space);
    snap_vertex(Vec3::ZERO, None, &space, query.screen.as_ref(), &ray, best)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hit::RAY_DIST_MAX;
    use crate::viewport::ViewRay;
    use shared::{Duplicator, ObjectData};

    #[test]
    fn test_empty_snaps_to_origin_unless_duplicator() {
        let query = SnapQuery {
            snap_to: SnapElement::Vertex,
            ray: ViewRay::from_origin(Vec3::new(1.0, 2.0, 10.0), Vec3::NEG_Z),
            screen: None,
            ortho: false,
        };
        let obmat = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let mut ob = SceneObject::new("empty", ObjectData::Empty);

        let mut best = SnapBest::new(f32::MAX, RAY_DIST_MAX);
        assert!(snap_empty(&ob, obmat, &query, &mut best));
        assert_eq!(best.hit.unwrap().location, Vec3::new(1.0, 2.0, 3.0));

        ob.duplicator = Some(Duplicator::default());
        let mut best = SnapBest::new(f32::MAX, RAY_DIST_MAX);
        assert!(!snap_empty(&ob, obmat, &query, &mut best));
    }
}
