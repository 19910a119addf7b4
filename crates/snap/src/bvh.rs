//! Bounding-volume hierarchy over mesh vertices or triangles.
//!
//! Flat node array, median split on the longest axis. The tree owns copies
//! of the positions and normals it was built from, so a tree built once
//! keeps answering for that geometry even if the mesh changes afterwards.

use glam::Vec3;
use shared::MeshGeometry;

use crate::derived::{mesh_looptris, LoopTri};
use crate::picking::{
    closest_point_on_triangle, distance_squared_to_ray, ray_aabb_interval,
    ray_triangle_intersect, Aabb, Ray,
};

const BVH_LEAF_SIZE: usize = 4;
const BVH_NONE: u32 = u32::MAX;

#[derive(Debug, Clone, Copy)]
struct BvhNode {
    bounds: Aabb,
    left: u32,
    right: u32,
    start: u32,
    count: u32,
}

impl BvhNode {
    fn is_leaf(&self) -> bool {
        self.left == BVH_NONE
    }
}

/// What the tree indexes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BvhKind {
    Verts,
    LoopTris,
}

/// Ray-cast result in the tree's (object-local) space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BvhRayHit {
    /// Looptri index
    pub index: usize,
    pub dist: f32,
    pub co: Vec3,
    /// Barycentric interpolation of the triangle's vertex normals
    pub no: Vec3,
}

/// Nearest-primitive result
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BvhNearest {
    /// Vertex index (vertex trees) or looptri index (triangle trees)
    pub index: usize,
    pub dist_sq: f32,
    pub co: Vec3,
}

#[derive(Debug, Clone)]
pub struct BvhTree {
    kind: BvhKind,
    nodes: Vec<BvhNode>,
    /// Primitive ids, leaves reference contiguous ranges
    indices: Vec<u32>,
    co: Vec<Vec3>,
    no: Vec<Vec3>,
    looptris: Vec<LoopTri>,
}

impl BvhTree {
    /// Index the vertices of a mesh.
    /// With `skip_edit_selection`, hidden and selected vertices are left out.
    pub fn from_verts(geometry: &MeshGeometry, skip_edit_selection: bool) -> Self {
        let (co, no) = copy_vertices(geometry);
        let prims: Vec<u32> = geometry
            .vertices
            .iter()
            .enumerate()
            .filter(|(_, v)| !(skip_edit_selection && (v.hide || v.select)))
            .map(|(i, _)| i as u32)
            .collect();
        let bounds: Vec<Aabb> = co
            .iter()
            .map(|&p| Aabb { min: p, max: p })
            .collect();

        Self::build(BvhKind::Verts, prims, &bounds, co, no, Vec::new())
    }

    /// Index the triangulated faces of a mesh.
    /// With `skip_edit_selection`, triangles touching a hidden or selected vertex are left out.
    pub fn from_looptris(geometry: &MeshGeometry, skip_edit_selection: bool) -> Self {
        let (co, no) = copy_vertices(geometry);
        let looptris = mesh_looptris(geometry);
        let masked = |lt: &LoopTri| {
            skip_edit_selection
                && lt.verts.iter().any(|&v| {
                    let vert = &geometry.vertices[v as usize];
                    vert.hide || vert.select
                })
        };
        let prims: Vec<u32> = looptris
            .iter()
            .enumerate()
            .filter(|(_, lt)| !masked(lt))
            .map(|(i, _)| i as u32)
            .collect();
        let bounds: Vec<Aabb> = looptris
            .iter()
            .map(|lt| {
                let [a, b, c] = lt.verts.map(|v| co[v as usize]);
                Aabb {
                    min: a.min(b).min(c),
                    max: a.max(b).max(c),
                }
            })
            .collect();

        Self::build(BvhKind::LoopTris, prims, &bounds, co, no, looptris)
    }

    fn build(
        kind: BvhKind,
        mut indices: Vec<u32>,
        bounds: &[Aabb],
        co: Vec<Vec3>,
        no: Vec<Vec3>,
        looptris: Vec<LoopTri>,
    ) -> Self {
        let mut nodes = Vec::new();
        if !indices.is_empty() {
            let len = indices.len();
            build_node(&mut nodes, bounds, &mut indices, 0, len);
        }
        Self {
            kind,
            nodes,
            indices,
            co,
            no,
            looptris,
        }
    }

    pub fn kind(&self) -> BvhKind {
        self.kind
    }

    /// Number of indexed primitives
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn vertex(&self, index: usize) -> (Vec3, Vec3) {
        (self.co[index], self.no[index])
    }

    pub fn looptri(&self, index: usize) -> &LoopTri {
        &self.looptris[index]
    }

    /// Closest triangle hit along the ray with `dist < max_dist`.
    /// `ray.direction` must be unit length. Vertex trees never report hits.
    pub fn ray_cast(&self, ray: &Ray, max_dist: f32) -> Option<BvhRayHit> {
        if self.kind != BvhKind::LoopTris || self.nodes.is_empty() {
            return None;
        }

        let mut best: Option<BvhRayHit> = None;
        let mut best_dist = max_dist;
        let mut stack = vec![0usize];

        while let Some(node_index) = stack.pop() {
            let node = &self.nodes[node_index];
            match ray_aabb_interval(ray, &node.bounds) {
                Some((tmin, _)) if tmin <= best_dist => {}
                _ => continue,
            }

            if node.is_leaf() {
                for &prim in self.leaf(node) {
                    let lt = &self.looptris[prim as usize];
                    let [i0, i1, i2] = lt.verts.map(|v| v as usize);
                    let Some((t, u, v)) =
                        ray_triangle_intersect(ray, self.co[i0], self.co[i1], self.co[i2])
                    else {
                        continue;
                    };
                    if t < best_dist {
                        best_dist = t;
                        let no = self.no[i0] * (1.0 - u - v) + self.no[i1] * u + self.no[i2] * v;
                        best = Some(BvhRayHit {
                            index: prim as usize,
                            dist: t,
                            co: ray.at(t),
                            no: no.normalize_or_zero(),
                        });
                    }
                }
            } else {
                // Right first so the left subtree is visited first
                stack.push(node.right as usize);
                stack.push(node.left as usize);
            }
        }

        best
    }

    /// Primitive closest to `point` within `sqrt(max_dist_sq)`
    pub fn find_nearest(&self, point: Vec3, max_dist_sq: f32) -> Option<BvhNearest> {
        self.nearest_by(
            max_dist_sq,
            |bounds| bounds.distance_squared_to_point(point),
            |co| point.distance_squared(co),
            |tri| closest_point_on_triangle(point, tri[0], tri[1], tri[2]),
        )
    }

    /// Primitive closest to the ray (perpendicular distance) within `sqrt(max_dist_sq)`.
    /// `ray.direction` must be unit length. Triangles measure by their corners.
    pub fn find_nearest_to_ray(&self, ray: &Ray, max_dist_sq: f32) -> Option<BvhNearest> {
        self.nearest_by(
            max_dist_sq,
            |bounds| {
                // Lower bound: distance to the bounding sphere of the box
                let radius = bounds.size().length() * 0.5;
                let d = distance_squared_to_ray(bounds.center(), ray).sqrt() - radius;
                if d > 0.0 {
                    d * d
                } else {
                    0.0
                }
            },
            |co| distance_squared_to_ray(co, ray),
            |tri| {
                tri.into_iter()
                    .min_by(|a, b| {
                        distance_squared_to_ray(*a, ray).total_cmp(&distance_squared_to_ray(*b, ray))
                    })
                    .unwrap_or(tri[0])
            },
        )
    }

    fn nearest_by(
        &self,
        max_dist_sq: f32,
        node_bound: impl Fn(&Aabb) -> f32,
        point_dist: impl Fn(Vec3) -> f32,
        tri_closest: impl Fn([Vec3; 3]) -> Vec3,
    ) -> Option<BvhNearest> {
        if self.nodes.is_empty() {
            return None;
        }

        let mut best: Option<BvhNearest> = None;
        let mut best_dist_sq = max_dist_sq;
        let mut stack = vec![0usize];

        while let Some(node_index) = stack.pop() {
            let node = &self.nodes[node_index];
            if node_bound(&node.bounds) > best_dist_sq {
                continue;
            }

            if node.is_leaf() {
                for &prim in self.leaf(node) {
                    let co = match self.kind {
                        BvhKind::Verts => self.co[prim as usize],
                        BvhKind::LoopTris => {
                            let lt = &self.looptris[prim as usize];
                            tri_closest(lt.verts.map(|v| self.co[v as usize]))
                        }
                    };
                    let dist_sq = point_dist(co);
                    if dist_sq < best_dist_sq {
                        best_dist_sq = dist_sq;
                        best = Some(BvhNearest {
                            index: prim as usize,
                            dist_sq,
                            co,
                        });
                    }
                }
            } else {
                stack.push(node.right as usize);
                stack.push(node.left as usize);
            }
        }

        best
    }

    fn leaf(&self, node: &BvhNode) -> &[u32] {
        let start = node.start as usize;
        &self.indices[start..start + node.count as usize]
    }
}

fn copy_vertices(geometry: &MeshGeometry) -> (Vec<Vec3>, Vec<Vec3>) {
    geometry
        .vertices
        .iter()
        .map(|v| (Vec3::from(v.co), Vec3::from(v.no)))
        .unzip()
}

fn build_node(
    nodes: &mut Vec<BvhNode>,
    bounds: &[Aabb],
    indices: &mut [u32],
    start: usize,
    end: usize,
) -> u32 {
    let mut node_bounds = bounds[indices[start] as usize];
    for &idx in &indices[start + 1..end] {
        node_bounds = node_bounds.union(&bounds[idx as usize]);
    }

    let count = end - start;
    let node_index = nodes.len() as u32;
    nodes.push(BvhNode {
        bounds: node_bounds,
        left: BVH_NONE,
        right: BVH_NONE,
        start: start as u32,
        count: count as u32,
    });

    if count <= BVH_LEAF_SIZE {
        return node_index;
    }

    // Split along the longest axis to balance the tree.
    let extent = node_bounds.size();
    let axis = if extent.x >= extent.y && extent.x >= extent.z {
        0
    } else if extent.y >= extent.z {
        1
    } else {
        2
    };

    // Stable sort keeps equal centers in primitive order
    indices[start..end].sort_by(|a, b| {
        let ca = bounds[*a as usize].center()[axis];
        let cb = bounds[*b as usize].center()[axis];
        ca.total_cmp(&cb)
    });

    let mid = start + count / 2;
    let left = build_node(nodes, bounds, indices, start, mid);
    let right = build_node(nodes, bounds, indices, mid, end);

    let node = &mut nodes[node_index as usize];
    node.left = left;
    node.right = right;
    node_index
}
