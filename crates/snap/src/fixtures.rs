//! Factory functions for creating test scenes and viewports.
//!
//! Provides helpers to construct meshes, scene objects, duplicators and
//! viewports used by the unit tests, the integration tests and the probe.

use glam::{Vec2, Vec3};
use shared::*;

use crate::viewport::{ArcBallCamera, Projection, Viewport};

// ── Geometry factories ──────────────────────────────────────────

/// A single triangle facing +Z, with its three edges.
pub fn triangle_geometry(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> MeshGeometry {
    let up = [0.0, 0.0, 1.0];
    MeshGeometry {
        vertices: vec![MeshVertex::new(a, up), MeshVertex::new(b, up), MeshVertex::new(c, up)],
        edges: vec![MeshEdge::new(0, 1), MeshEdge::new(1, 2), MeshEdge::new(2, 0)],
        polys: vec![MeshPoly { verts: vec![0, 1, 2] }],
        ..Default::default()
    }
}

/// A square of side `size` centered on the Z axis at height `z`, facing +Z.
pub fn quad_geometry(size: f32, z: f32) -> MeshGeometry {
    let h = size * 0.5;
    let up = [0.0, 0.0, 1.0];
    MeshGeometry {
        vertices: vec![
            MeshVertex::new([-h, -h, z], up),
            MeshVertex::new([h, -h, z], up),
            MeshVertex::new([h, h, z], up),
            MeshVertex::new([-h, h, z], up),
        ],
        edges: vec![
            MeshEdge::new(0, 1),
            MeshEdge::new(1, 2),
            MeshEdge::new(2, 3),
            MeshEdge::new(3, 0),
        ],
        polys: vec![MeshPoly {
            verts: vec![0, 1, 2, 3],
        }],
        ..Default::default()
    }
}

/// Mesh data with only an evaluated mesh.
pub fn evaluated_mesh(geometry: MeshGeometry) -> Mesh {
    Mesh {
        evaluated: Some(geometry),
        edit: None,
    }
}

/// Mesh data being edited: `edit_mesh` carries the selection, the cage defaults to it.
pub fn edited_mesh(edit_mesh: MeshGeometry, final_mesh: Option<MeshGeometry>) -> Mesh {
    Mesh {
        evaluated: None,
        edit: Some(EditMesh {
            mesh: edit_mesh,
            cage: None,
            final_mesh,
        }),
    }
}

// ── Object factories ────────────────────────────────────────────

/// A mesh object using mesh data `mesh_id`.
pub fn mesh_object(id: &str, mesh_id: &str, transform: Transform) -> SceneObject {
    SceneObject {
        transform,
        ..SceneObject::new(id, ObjectData::Mesh { mesh: mesh_id.to_string() })
    }
}

/// An empty at `position`.
pub fn empty_object(id: &str, position: [f64; 3]) -> SceneObject {
    SceneObject {
        transform: Transform::at(position),
        ..SceneObject::new(id, ObjectData::Empty)
    }
}

/// A Bezier point at `center` with free handles one unit along -X and +X.
pub fn bezier_point(center: [f32; 3]) -> BezTriple {
    let [x, y, z] = center;
    BezTriple {
        handle_left: [x - 1.0, y, z],
        center,
        handle_right: [x + 1.0, y, z],
        select_left: false,
        select_center: false,
        select_right: false,
        hide: false,
        handle_left_type: HandleType::Free,
        handle_right_type: HandleType::Free,
    }
}

/// A curve object with one Bezier spline through `centers`.
pub fn curve_object(id: &str, centers: &[[f32; 3]]) -> SceneObject {
    let curve = Curve {
        nurbs: vec![Nurb::Bezier(centers.iter().copied().map(bezier_point).collect())],
        edit_nurbs: None,
    };
    SceneObject::new(id, ObjectData::Curve(curve))
}

/// A pose-mode armature with one bone per (head, tail) pair.
pub fn armature_object(id: &str, bones: &[([f32; 3], [f32; 3])]) -> SceneObject {
    let channels = bones
        .iter()
        .enumerate()
        .map(|(i, &(head, tail))| PoseChannel {
            name: format!("bone_{}", i),
            head,
            tail,
            has_bone: true,
            hidden: false,
            group_hidden: false,
        })
        .collect();
    let armature = Armature {
        layers: 1,
        edit_bones: None,
        pose: Some(Pose { channels }),
    };
    SceneObject::new(id, ObjectData::Armature(armature))
}

/// A camera whose own tracking object has bundles at `bundles`.
pub fn tracked_camera(id: &str, bundles: &[[f32; 3]]) -> SceneObject {
    let tracks = bundles
        .iter()
        .enumerate()
        .map(|(i, &bundle)| TrackingTrack {
            name: format!("track_{}", i),
            bundle: Some(bundle),
        })
        .collect();
    let tracking = MovieTracking {
        camera_transform: None,
        objects: vec![TrackingObject {
            name: "Camera".into(),
            is_camera: true,
            tracks,
            reconstruction: Vec::new(),
        }],
    };
    SceneObject::new(
        id,
        ObjectData::Camera(CameraData {
            tracking: Some(tracking),
        }),
    )
}

// ── Scene factories ─────────────────────────────────────────────

/// A scene with one mesh object; object and mesh data share `id`.
pub fn single_mesh_scene(id: &str, geometry: MeshGeometry, transform: Transform) -> Scene {
    let mut scene = Scene::default();
    scene.meshes.insert(id.to_string(), evaluated_mesh(geometry));
    scene.objects.push(mesh_object(id, id, transform));
    scene
}

/// A hidden-source duplicator scene.
///
/// Object `dupli` (an empty duplicator at the origin) places one instance of
/// mesh object `leaf` at each of `offsets`. The source `leaf` itself sits far
/// off to the side at x = 100.
pub fn dupli_scene(leaf: MeshGeometry, offsets: &[[f64; 3]]) -> Scene {
    let mut scene = single_mesh_scene("leaf", leaf, Transform::at([100.0, 0.0, 0.0]));
    let mut dupli = empty_object("dupli", [0.0, 0.0, 0.0]);
    dupli.duplicator = Some(Duplicator {
        instances: offsets
            .iter()
            .map(|&offset| DupliInstance {
                object: "leaf".into(),
                transform: Transform::at(offset),
            })
            .collect(),
    });
    scene.objects.push(dupli);
    scene
}

// ── Viewport factories ──────────────────────────────────────────

/// Region size used by the viewport factories (square)
pub const REGION_SIZE: f32 = 100.0;

/// Orthographic view down -Z from z = 50: 10 pixels per world unit, world origin at the region center.
pub fn ortho_viewport() -> Viewport {
    Viewport::new(
        ArcBallCamera::front(Vec3::ZERO, 50.0, Projection::Orthographic { scale: 5.0 }),
        REGION_SIZE,
        REGION_SIZE,
    )
}

/// Perspective view down -Z from z = `distance`, 45° vertical field of view.
pub fn perspective_viewport(distance: f32) -> Viewport {
    Viewport::new(
        ArcBallCamera::front(Vec3::ZERO, distance, Projection::Perspective { fov: 45.0 }),
        REGION_SIZE,
        REGION_SIZE,
    )
}

/// Region center, where the world Z axis projects in the factory viewports
pub fn region_center() -> Vec2 {
    Vec2::splat(REGION_SIZE * 0.5)
}
