use glam::Vec3;

/// A ray in world (or object-local) space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// An inverted box that any `include` call will replace
    pub fn empty() -> Self {
        Self {
            min: Vec3::splat(f32::MAX),
            max: Vec3::splat(f32::MIN),
        }
    }

    /// Compute AABB from a set of points, `None` when there are none
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut aabb = Self::empty();
        let mut any = false;
        for p in points {
            aabb.include(p);
            any = true;
        }
        any.then_some(aabb)
    }

    pub fn include(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn union(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Center of the bounding box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Grow any axis thinner than `min_size` to exactly `min_size`, keeping the center.
    /// Flat objects (a single plane, a lone edge) would otherwise be missed by the box test.
    pub fn ensure_minimum_dimensions(&self, min_size: f32) -> Aabb {
        let center = self.center();
        let half = (self.size() * 0.5).max(Vec3::splat(min_size * 0.5));
        Aabb {
            min: center - half,
            max: center + half,
        }
    }

    /// Scale the box about its center
    pub fn scaled(&self, factor: f32) -> Aabb {
        let center = self.center();
        let half = self.size() * 0.5 * factor;
        Aabb {
            min: center - half,
            max: center + half,
        }
    }

    /// Squared distance from a point to the box (0 inside)
    pub fn distance_squared_to_point(&self, p: Vec3) -> f32 {
        let clamped = p.clamp(self.min, self.max);
        p.distance_squared(clamped)
    }
}

/// Ray-AABB intersection using the slab method.
/// Entry and exit distances of a ray through a box, None when it misses
/// or the box lies entirely behind the origin. The entry distance is
/// negative when the origin is inside the box.
pub fn ray_aabb_interval(ray: &Ray, aabb: &Aabb) -> Option<(f32, f32)> {
    let inv_dir = Vec3::new(
        1.0 / ray.direction.x,
        1.0 / ray.direction.y,
        1.0 / ray.direction.z,
    );

    let t1 = (aabb.min - ray.origin) * inv_dir;
    let t2 = (aabb.max - ray.origin) * inv_dir;

    let tmin = t1.x.min(t2.x).max(t1.y.min(t2.y)).max(t1.z.min(t2.z));
    let tmax = t1.x.max(t2.x).min(t1.y.max(t2.y)).min(t1.z.max(t2.z));

    if tmax < 0.0 || tmin > tmax {
        return None;
    }

    Some((tmin, tmax))
}

/// Möller-Trumbore ray-triangle intersection algorithm.
/// Returns `(t, u, v)`: the distance along the ray and the barycentric
/// weights of `v1` and `v2`, or None if there is no intersection.
pub fn ray_triangle_intersect(ray: &Ray, v0: Vec3, v1: Vec3, v2: Vec3) -> Option<(f32, f32, f32)> {
    const EPSILON: f32 = 1e-7;

    let edge1 = v1 - v0;
    let edge2 = v2 - v0;
    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < EPSILON {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);

    // Outside triangle (u)
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);

    // Outside triangle (v)
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = f * edge2.dot(q);

    // Intersection is behind ray origin
    if t > EPSILON {
        Some((t, u, v))
    } else {
        None
    }
}

/// Closest point on triangle `abc` to `p` (Voronoi region walk)
pub fn closest_point_on_triangle(p: Vec3, a: Vec3, b: Vec3, c: Vec3) -> Vec3 {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;
    let d1 = ab.dot(ap);
    let d2 = ac.dot(ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return a;
    }

    let bp = p - b;
    let d3 = ab.dot(bp);
    let d4 = ac.dot(bp);
    if d3 >= 0.0 && d4 <= d3 {
        return b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        return a + ab * (d1 / (d1 - d3));
    }

    let cp = p - c;
    let d5 = ab.dot(cp);
    let d6 = ac.dot(cp);
    if d6 >= 0.0 && d5 <= d6 {
        return c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        return a + ac * (d2 / (d2 - d6));
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        return b + (c - b) * ((d4 - d3) / ((d4 - d3) + (d5 - d6)));
    }

    let denom = 1.0 / (va + vb + vc);
    a + ab * (vb * denom) + ac * (vc * denom)
}

/// Squared distance from `p` to the ray (points behind the origin measure to the origin).
/// `ray.direction` must be unit length.
pub fn distance_squared_to_ray(p: Vec3, ray: &Ray) -> f32 {
    let t = (p - ray.origin).dot(ray.direction).max(0.0);
    p.distance_squared(ray.at(t))
}
