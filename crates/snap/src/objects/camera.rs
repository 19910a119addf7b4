//! Camera snapping to reconstructed motion-tracking bundles.

use glam::{Mat4, Vec3};
use shared::{CameraData, Scene, SceneObject, TrackingObject};

use crate::hit::SnapBest;
use crate::math::{blend_matrices, transform_matrix, ObjectSpace};
use crate::params::SnapElement;
use crate::primitives::{snap_vertex, SnapRay};

use super::SnapQuery;

pub(super) fn snap_camera(
    scene: &Scene,
    ob: &SceneObject,
    cam: &CameraData,
    obmat: Mat4,
    query: &SnapQuery,
    best: &mut SnapBest,
) -> bool {
    let Some(tracking) = &cam.tracking else {
        return false;
    };
    if ob.is_duplicator() || query.snap_to != SnapElement::Vertex {
        return false;
    }

    // Bundles of the camera's own track live in the original camera space
    let camera_space = ObjectSpace::new(tracking.camera_transform.as_ref().map_or(obmat, transform_matrix));
    let object_space = ObjectSpace::new(obmat);
    let camera_ray = SnapRay::to_local(&query.ray, &camera_space);
    let object_ray = SnapRay::to_local(&query.ray, &object_space);
    let screen = query.screen.as_ref();

    let mut snapped = false;
    for tracking_object in &tracking.objects {
        let (space, ray, to_object) = if tracking_object.is_camera {
            (&camera_space, &camera_ray, Mat4::IDENTITY)
        } else {
            let reconstructed = reconstructed_matrix(tracking_object, scene.frame);
            (&object_space, &object_ray, reconstructed.inverse())
        };

        for track in &tracking_object.tracks {
            let Some(bundle) = track.bundle else {
                continue;
            };
            let co = to_object.transform_point3(Vec3::from(bundle));
            snapped |= snap_vertex(co, None, space, screen, ray, best);
        }
    }
    snapped
}

/// Reconstructed camera matrix of a tracking object at `frame`.
///
/// Frames between two solved frames blend them; frames outside the solved
/// range hold the nearest solution. No solution at all gives identity.
pub(crate) fn reconstructed_matrix(tracking_object: &TrackingObject, frame: i32) -> Mat4 {
    let cameras = &tracking_object.reconstruction;
    if cameras.is_empty() {
        return Mat4::IDENTITY;
    }

    let a = cameras.iter().rposition(|c| c.frame <= frame).unwrap_or(0);
    let cam_a = &cameras[a];
    let mat_a = transform_matrix(&cam_a.transform);

    match cameras.get(a + 1) {
        Some(cam_b) if cam_a.frame < frame && cam_b.frame > cam_a.frame => {
            let t = (frame - cam_a.frame) as f32 / (cam_b.frame - cam_a.frame) as f32;
            blend_matrices(&mat_a, &transform_matrix(&cam_b.transform), t)
        }
        _ => mat_a,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hit::RAY_DIST_MAX;
    use crate::viewport::ViewRay;
    use shared::{MovieTracking, ObjectData, ReconstructedCamera, TrackingTrack, Transform};

    fn solved(frame: i32, x: f64) -> ReconstructedCamera {
        ReconstructedCamera {
            frame,
            transform: Transform::at([x, 0.0, 0.0]),
        }
    }

    fn object(reconstruction: Vec<ReconstructedCamera>) -> TrackingObject {
        TrackingObject {
            name: "object".into(),
            is_camera: false,
            tracks: vec![],
            reconstruction,
        }
    }

    #[test]
    fn test_reconstruction_interpolates_between_frames() {
        let obj = object(vec![solved(1, 0.0), solved(11, 10.0)]);
        let m = reconstructed_matrix(&obj, 6);
        assert!((m.w_axis.x - 5.0).abs() < 1e-5);
    }

    #[test]
    fn test_reconstruction_holds_outside_range() {
        let obj = object(vec![solved(5, 1.0), solved(10, 2.0)]);
        assert_eq!(reconstructed_matrix(&obj, 1).w_axis.x, 1.0);
        assert_eq!(reconstructed_matrix(&obj, 20).w_axis.x, 2.0);
        assert_eq!(reconstructed_matrix(&obj, 10).w_axis.x, 2.0);
        assert_eq!(reconstructed_matrix(&object(vec![]), 3), Mat4::IDENTITY);
    }

    fn track(bundle: [f32; 3]) -> TrackingTrack {
        TrackingTrack {
            name: "track".into(),
            bundle: Some(bundle),
        }
    }

    /// Camera at x = 5 whose footage was solved with the camera at y = 3,
    /// plus an object track solved 4 units up at the current frame
    fn tracked_scene() -> Scene {
        let tracking = MovieTracking {
            camera_transform: Some(Transform::at([0.0, 3.0, 0.0])),
            objects: vec![
                TrackingObject {
                    name: "Camera".into(),
                    is_camera: true,
                    tracks: vec![track([0.0, 0.0, -2.0])],
                    reconstruction: vec![],
                },
                TrackingObject {
                    tracks: vec![track([1.0, 0.0, 0.0])],
                    ..object(vec![ReconstructedCamera {
                        frame: 1,
                        transform: Transform::at([0.0, 0.0, 4.0]),
                    }])
                },
            ],
        };
        let mut cam = SceneObject::new(
            "cam",
            ObjectData::Camera(CameraData {
                tracking: Some(tracking),
            }),
        );
        cam.transform = Transform::at([5.0, 0.0, 0.0]);
        Scene {
            objects: vec![cam],
            frame: 1,
            ..Default::default()
        }
    }

    fn snap_down_from(scene: &Scene, origin: Vec3) -> Option<Vec3> {
        let ob = &scene.objects[0];
        let ObjectData::Camera(cam) = &ob.data else {
            panic!("camera object expected");
        };
        let query = SnapQuery {
            snap_to: SnapElement::Vertex,
            ray: ViewRay::from_origin(origin, Vec3::NEG_Z),
            screen: None,
            ortho: false,
        };
        let mut best = SnapBest::new(f32::MAX, RAY_DIST_MAX);
        let obmat = transform_matrix(&ob.transform);
        let snapped = snap_camera(scene, ob, cam, obmat, &query, &mut best);
        assert_eq!(snapped, best.hit.is_some());
        best.hit.map(|hit| hit.location)
    }

    #[test]
    fn test_camera_track_bundles_use_solved_camera_space() {
        let scene = tracked_scene();
        // Not the object matrix: that would put the bundle at (5, 3, -2)
        let location = snap_down_from(&scene, Vec3::new(0.0, 3.0, 10.0)).unwrap();
        assert!((location - Vec3::new(0.0, 3.0, -2.0)).length() < 1e-5);
    }

    #[test]
    fn test_object_track_bundles_undo_reconstruction() {
        let scene = tracked_scene();
        // (1, 0, 0) moved by the inverse solve to (1, 0, -4), then by the object matrix
        let location = snap_down_from(&scene, Vec3::new(6.0, 0.0, 0.0)).unwrap();
        assert!((location - Vec3::new(6.0, 0.0, -4.0)).length() < 1e-5);
    }
}
