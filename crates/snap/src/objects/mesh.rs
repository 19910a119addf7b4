//! Mesh snapping: vertices and faces through the BVH, edges by brute force.

use glam::{Mat4, Vec3};
use shared::{Scene, SceneObject};

use crate::bvh::{BvhKind, BvhTree};
use crate::cache::SnapCache;
use crate::derived::DerivedMesh;
use crate::hit::{pixel_distance, SnapBest, RAY_DIST_MAX};
use crate::math::ObjectSpace;
use crate::params::SnapElement;
use crate::picking::{ray_aabb_interval, Ray};
use crate::primitives::{snap_edge, snap_vertex, SnapRay};

use super::SnapQuery;

/// Bounding boxes thinner than this on any axis are grown to it
const BOUNDS_MIN_SIZE: f32 = 0.1;
/// Vertex and edge snapping also reach elements lying on the bounding box
const BOUNDS_SCALE: f32 = 1.1;

pub(super) fn snap_mesh(
    scene: &Scene,
    cache: &mut SnapCache,
    ob: &SceneObject,
    obmat: Mat4,
    use_obedit: bool,
    query: &SnapQuery,
    best: &mut SnapBest,
) -> bool {
    let Some(derived) = DerivedMesh::for_object(scene, ob, use_obedit) else {
        tracing::debug!(object = %ob.id, use_obedit, "mesh has no derived geometry, skipping");
        return false;
    };
    if derived.vertex_count() == 0 {
        return false;
    }

    let space = ObjectSpace::new(obmat);
    let mut ray = SnapRay::to_local(&query.ray, &space);
    let local_scale = ray.local_scale;
    let mut local_depth = if best.ray_depth == RAY_DIST_MAX {
        RAY_DIST_MAX
    } else {
        best.ray_depth * local_scale
    };

    // Distance along the local ray to the object, used to rebase orthographic ray starts
    let mut len_diff = None;
    if !use_obedit {
        if let Some(bounds) = derived.bounds() {
            let mut bounds = bounds.ensure_minimum_dimensions(BOUNDS_MIN_SIZE);
            if matches!(query.snap_to, SnapElement::Vertex | SnapElement::Edge) {
                bounds = bounds.scaled(BOUNDS_SCALE);
            }
            // Entry distance, negative when the ray starts inside the bounds
            match ray_aabb_interval(&Ray::new(ray.start_local, ray.dir_local), &bounds) {
                Some((tmin, _)) => len_diff = Some(tmin),
                None => return false,
            }
        }
    }

    let kind = match query.snap_to {
        SnapElement::Vertex => BvhKind::Verts,
        SnapElement::Face => BvhKind::LoopTris,
        SnapElement::Edge => return snap_mesh_edges(&derived, &space, query, &ray, best),
    };

    let skip_edit_selection = derived.edit.is_some();
    let tree = cache.tree(&ob.id, kind, || match kind {
        BvhKind::Verts => BvhTree::from_verts(derived.geometry, skip_edit_selection),
        BvhKind::LoopTris => BvhTree::from_looptris(derived.geometry, skip_edit_selection),
    });

    let mut start_offset = 0.0;
    if query.ortho {
        let len_diff = len_diff.unwrap_or_else(|| {
            tree.find_nearest(ray.start_local, f32::MAX)
                .map_or(0.0, |nearest| nearest.dist_sq.sqrt())
        });
        // Keep the rebased start a little in front of the object
        let offset = len_diff - local_scale;
        let origin_local = space.imat.transform_point3(query.ray.origin);
        let start_from_origin = ray.start_local.distance(origin_local);
        ray.start_local = origin_local + ray.dir_local * (offset - start_from_origin);
        local_depth -= offset;
        start_offset = offset;
    }

    match kind {
        BvhKind::LoopTris => {
            let Some(hit) = tree.ray_cast(&Ray::new(ray.start_local, ray.dir_local), local_depth) else {
                return false;
            };
            let depth = (hit.dist + start_offset) / local_scale;
            let location = space.to_world(hit.co);
            let dist_px = pixel_distance(query.screen.as_ref(), location);
            if dist_px > best.dist_px || depth > best.ray_depth {
                return false;
            }
            let index = derived.poly_origin(tree.looptri(hit.index).poly as usize);
            best.accept_face(location, space.normal_to_world(hit.no), index, dist_px, depth);
            true
        }
        BvhKind::Verts => {
            let local_ray = Ray::new(ray.start_local, ray.dir_local);
            let Some(nearest) = tree.find_nearest_to_ray(&local_ray, local_depth * local_depth) else {
                return false;
            };
            let (co, no) = tree.vertex(nearest.index);
            snap_vertex(co, Some(no), &space, query.screen.as_ref(), &ray, best)
        }
    }
}

fn snap_mesh_edges(
    derived: &DerivedMesh,
    space: &ObjectSpace,
    query: &SnapQuery,
    ray: &SnapRay,
    best: &mut SnapBest,
) -> bool {
    let vert_count = derived.vertex_count();
    let mut snapped = false;

    for (index, edge) in derived.geometry.edges.iter().enumerate() {
        if derived.is_edge_masked(index) {
            continue;
        }
        let [v1, v2] = edge.verts.map(|v| v as usize);
        if v1 >= vert_count || v2 >= vert_count {
            tracing::trace!(edge = index, "edge references a missing vertex");
            continue;
        }
        let co: (Vec3, Vec3) = (derived.vertex_co(v1), derived.vertex_co(v2));
        let no = (derived.vertex_no(v1), derived.vertex_no(v2));
        snapped |= snap_edge(co, Some(no), space, query.screen.as_ref(), ray, best);
    }

    snapped
}
