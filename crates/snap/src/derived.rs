//! Evaluated mesh access: which geometry an object snaps against, and its triangulation.

use glam::Vec3;
use shared::{EditMesh, MeshGeometry, ObjectMode, Scene, SceneObject};

use crate::picking::Aabb;

/// Triangle of a fan-triangulated polygon, with the polygon it came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopTri {
    pub verts: [u32; 3],
    pub poly: u32,
}

/// The geometry a mesh object is snapped against.
pub struct DerivedMesh<'a> {
    pub geometry: &'a MeshGeometry,
    /// Set only when snapping the object being edited: enables edit-mode filtering
    pub edit: Option<&'a EditMesh>,
}

impl<'a> DerivedMesh<'a> {
    /// Resolve the derived mesh of `ob`.
    ///
    /// The edit object snaps against its edit cage. Other objects with an edit
    /// mesh (objects sharing data with the edit object) use the edit mesh's
    /// final geometry, since their own evaluated mesh is stale while editing.
    pub fn for_object(scene: &'a Scene, ob: &SceneObject, use_obedit: bool) -> Option<Self> {
        let mesh = scene.mesh(ob.mesh_id()?)?;

        if use_obedit {
            let edit = mesh.edit.as_ref()?;
            return Some(Self {
                geometry: edit.cage(),
                edit: Some(edit),
            });
        }

        let geometry = match &mesh.edit {
            Some(edit) => edit.final_mesh(),
            None => mesh.evaluated.as_ref()?,
        };
        Some(Self {
            geometry,
            edit: None,
        })
    }

    pub fn vertex_count(&self) -> usize {
        self.geometry.vertices.len()
    }

    pub fn vertex_co(&self, index: usize) -> Vec3 {
        Vec3::from(self.geometry.vertices[index].co)
    }

    pub fn vertex_no(&self, index: usize) -> Vec3 {
        Vec3::from(self.geometry.vertices[index].no)
    }

    /// Local-space bounds of all vertices
    pub fn bounds(&self) -> Option<Aabb> {
        Aabb::from_points(self.geometry.vertices.iter().map(|v| Vec3::from(v.co)))
    }

    /// Index of the edit-mesh edge a derived edge came from.
    /// `None` means the derived edge has no original (generated by a modifier).
    pub fn edge_origin(&self, edge: usize) -> Option<usize> {
        match &self.geometry.edge_origin {
            Some(origins) => origins.get(edge).copied().flatten().map(|i| i as usize),
            None => Some(edge),
        }
    }

    /// Index of the original polygon for a derived polygon
    pub fn poly_origin(&self, poly: usize) -> usize {
        match &self.geometry.poly_origin {
            Some(origins) => origins
                .get(poly)
                .copied()
                .flatten()
                .map_or(poly, |i| i as usize),
            None => poly,
        }
    }

    /// Edge is skipped while editing: hidden, or one of its vertices is selected (moving)
    pub fn is_edge_masked(&self, edge: usize) -> bool {
        let Some(edit) = self.edit else {
            return false;
        };
        let Some(orig) = self.edge_origin(edge) else {
            return true;
        };
        let Some(e) = edit.mesh.edges.get(orig) else {
            return true;
        };
        let selected = |v: u32| {
            edit.mesh
                .vertices
                .get(v as usize)
                .is_some_and(|vert| vert.select)
        };
        e.hide || selected(e.verts[0]) || selected(e.verts[1])
    }
}

/// Fan-triangulate all polygons of a mesh.
pub fn mesh_looptris(geometry: &MeshGeometry) -> Vec<LoopTri> {
    let mut tris = Vec::new();
    let vert_count = geometry.vertices.len() as u32;

    for (poly_index, poly) in geometry.polys.iter().enumerate() {
        if poly.verts.len() < 3 || poly.verts.iter().any(|&v| v >= vert_count) {
            tracing::trace!("skipping degenerate polygon {poly_index}");
            continue;
        }
        let first = poly.verts[0];
        for pair in poly.verts[1..].windows(2) {
            tris.push(LoopTri {
                verts: [first, pair[0], pair[1]],
                poly: poly_index as u32,
            });
        }
    }

    tris
}

/// Whether `ob` is being edited
pub fn is_edit_mode(ob: &SceneObject) -> bool {
    ob.mode == ObjectMode::Edit
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Mesh, MeshEdge, MeshPoly, MeshVertex, ObjectData};

    fn quad() -> MeshGeometry {
        MeshGeometry {
            vertices: vec![
                MeshVertex::new([0.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
                MeshVertex::new([1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
                MeshVertex::new([1.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
                MeshVertex::new([0.0, 1.0, 0.0], [0.0, 0.0, 1.0]),
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

    #[test]
    fn test_fan_triangulation() {
        let tris = mesh_looptris(&quad());
        assert_eq!(tris.len(), 2);
        assert_eq!(tris[0].verts, [0, 1, 2]);
        assert_eq!(tris[1].verts, [0, 2, 3]);
        assert!(tris.iter().all(|t| t.poly == 0));
    }

    #[test]
    fn test_degenerate_polygons_skipped() {
        let mut geometry = quad();
        geometry.polys.push(MeshPoly { verts: vec![0, 1] });
        geometry.polys.push(MeshPoly {
            verts: vec![0, 1, 99],
        });
        assert_eq!(mesh_looptris(&geometry).len(), 2);
    }

    #[test]
    fn test_resolution_prefers_edit_data() {
        let mut scene = Scene::default();
        let mut evaluated = quad();
        evaluated.vertices[0].co = [-5.0, 0.0, 0.0];
        scene.meshes.insert(
            "quad".into(),
            Mesh {
                evaluated: Some(evaluated),
                edit: Some(EditMesh {
                    mesh: quad(),
                    cage: None,
                    final_mesh: None,
                }),
            },
        );
        let ob = SceneObject::new("ob", ObjectData::Mesh { mesh: "quad".into() });

        let derived = DerivedMesh::for_object(&scene, &ob, false).unwrap();
        assert!(derived.edit.is_none());
        assert_eq!(derived.vertex_co(0), Vec3::ZERO);

        let derived = DerivedMesh::for_object(&scene, &ob, true).unwrap();
        assert!(derived.edit.is_some());
    }

    #[test]
    fn test_missing_geometry_resolves_to_none() {
        let mut scene = Scene::default();
        scene.meshes.insert("empty".into(), Mesh::default());
        let ob = SceneObject::new("ob", ObjectData::Mesh { mesh: "empty".into() });
        assert!(DerivedMesh::for_object(&scene, &ob, false).is_none());
        assert!(DerivedMesh::for_object(&scene, &ob, true).is_none());

        let unknown = SceneObject::new("x", ObjectData::Mesh { mesh: "nope".into() });
        assert!(DerivedMesh::for_object(&scene, &unknown, false).is_none());
    }

    #[test]
    fn test_edge_masking() {
        let mut edit_mesh = quad();
        edit_mesh.vertices[1].select = true;
        edit_mesh.edges[2].hide = true;
        let mut cage = quad();
        cage.edges.push(MeshEdge::new(0, 2));
        cage.edge_origin = Some(vec![Some(0), Some(1), Some(2), Some(3), None]);
        let edit = EditMesh {
            mesh: edit_mesh,
            cage: Some(cage),
            final_mesh: None,
        };
        let derived = DerivedMesh {
            geometry: edit.cage(),
            edit: Some(&edit),
        };
        // Edges 0 and 1 touch the selected vertex, edge 2 is hidden, edge 4 has no origin
        let masked: Vec<bool> = (0..5).map(|e| derived.is_edge_masked(e)).collect();
        assert_eq!(masked, vec![true, true, true, false, true]);
    }
}
