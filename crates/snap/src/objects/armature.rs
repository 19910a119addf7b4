//! Armature snapping: bone heads and tails, or whole bones as edges.

use glam::{Mat4, Vec3};
use shared::Armature;

use crate::hit::SnapBest;
use crate::math::ObjectSpace;
use crate::params::SnapElement;
use crate::primitives::{snap_edge, snap_vertex, SnapRay};

use super::SnapQuery;

pub(super) fn snap_armature(arm: &Armature, obmat: Mat4, query: &SnapQuery, best: &mut SnapBest) -> bool {
    let space = ObjectSpace::new(obmat);
    let ray = SnapRay::to_local(&query.ray, &space);

    let bones: Vec<(Vec3, Vec3)> = match (&arm.edit_bones, &arm.pose) {
        (Some(edit_bones), _) => edit_bones
            .iter()
            .filter(|bone| bone.layer & arm.layers != 0)
            // Hidden, or moving with the selection
            .filter(|bone| !(bone.hidden || bone.head_selected || bone.tail_selected))
            .map(|bone| (Vec3::from(bone.head), Vec3::from(bone.tail)))
            .collect(),
        (None, Some(pose)) => pose
            .channels
            .iter()
            .filter(|pchan| pchan.has_bone && !pchan.hidden && !pchan.group_hidden)
            .map(|pchan| (Vec3::from(pchan.head), Vec3::from(pchan.tail)))
            .collect(),
        (None, None) => return false,
    };

    let screen = query.screen.as_ref();
    let mut snapped = false;
    for (head, tail) in bones {
        match query.snap_to {
            SnapElement::Vertex => {
                snapped |= snap_vertex(head, None, &space, screen, &ray, best);
                snapped |= snap_vertex(tail, None, &space, screen, &ray, best);
            }
            SnapElement::Edge => {
                snapped |= snap_edge((head, tail), None, &space, screen, &ray, best);
            }
            SnapElement::Face => {}
        }
    }
    snapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hit::RAY_DIST_MAX;
    use crate::viewport::ViewRay;
    use shared::{EditBone, Pose, PoseChannel};

    fn edit_bone(name: &str, head: [f32; 3], tail: [f32; 3]) -> EditBone {
        EditBone {
            name: name.into(),
            head,
            tail,
            layer: 1,
            hidden: false,
            head_selected: false,
            tail_selected: false,
        }
    }

    fn query(snap_to: SnapElement, origin: Vec3) -> SnapQuery<'static> {
        SnapQuery {
            snap_to,
            ray: ViewRay::from_origin(origin, Vec3::NEG_Z),
            screen: None,
            ortho: false,
        }
    }

    #[test]
    fn test_edit_bones_filtered_by_layer_and_selection() {
        let mut moving = edit_bone("moving", [0.0, 0.0, 3.0], [0.0, 1.0, 3.0]);
        moving.tail_selected = true;
        let mut other_layer = edit_bone("other", [0.0, 0.0, 2.0], [0.0, 1.0, 2.0]);
        other_layer.layer = 2;
        let arm = Armature {
            layers: 1,
            edit_bones: Some(vec![
                moving,
                other_layer,
                edit_bone("still", [0.0, 0.0, 1.0], [0.0, 1.0, 1.0]),
            ]),
            pose: None,
        };

        let mut best = SnapBest::new(f32::MAX, RAY_DIST_MAX);
        let q = query(SnapElement::Vertex, Vec3::new(0.0, 0.0, 10.0));
        assert!(snap_armature(&arm, Mat4::IDENTITY, &q, &mut best));
        // Without a cursor the head of the only candidate bone closest along the ray wins
        assert_eq!(best.hit.unwrap().location, Vec3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_pose_bone_as_edge() {
        let arm = Armature {
            layers: 1,
            edit_bones: None,
            pose: Some(Pose {
                channels: vec![
                    PoseChannel {
                        name: "hidden".into(),
                        head: [-1.0, 0.5, 4.0],
                        tail: [1.0, 0.5, 4.0],
                        has_bone: true,
                        hidden: true,
                        group_hidden: false,
                    },
                    PoseChannel {
                        name: "spine".into(),
                        head: [-1.0, 0.5, 0.0],
                        tail: [1.0, 0.5, 0.0],
                        has_bone: true,
                        hidden: false,
                        group_hidden: false,
                    },
                ],
            }),
        };

        let mut best = SnapBest::new(f32::MAX, RAY_DIST_MAX);
        let q = query(SnapElement::Edge, Vec3::new(0.25, 0.0, 10.0));
        assert!(snap_armature(&arm, Mat4::IDENTITY, &q, &mut best));
        let hit = best.hit.unwrap();
        assert!((hit.location - Vec3::new(0.25, 0.5, 0.0)).length() < 1e-5);
        assert!(hit.normal.is_none());

        let q = query(SnapElement::Face, Vec3::new(0.25, 0.0, 10.0));
        let mut best = SnapBest::new(f32::MAX, RAY_DIST_MAX);
        assert!(!snap_armature(&arm, Mat4::IDENTITY, &q, &mut best));
    }
}
