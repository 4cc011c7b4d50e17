//! Primitive collision shapes and intersection algorithms
//!
//! Provides the geometric leaves of the raycast engine: rays with cached
//! inverse directions, axis-aligned boxes with the slab test, and triangles
//! with the Möller–Trumbore parametric test.

use crate::foundation::math::Vec3;

/// A ray for ray casting and picking
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    /// The origin point of the ray in world space
    pub origin: Vec3,
    /// The direction of the ray (normalized at construction)
    pub direction: Vec3,
    /// Per-axis reciprocal of the direction, cached for slab tests
    pub inv_direction: Vec3,
}

impl Ray {
    /// Creates a new ray with the given origin and direction
    ///
    /// The direction is normalized and its per-axis reciprocal cached;
    /// zero components map to infinity so the slab test stays sign-uniform.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        let direction = direction.normalize();
        let inv = |d: f32| if d != 0.0 { 1.0 / d } else { f32::INFINITY };
        Self {
            origin,
            direction,
            inv_direction: Vec3::new(inv(direction.x), inv(direction.y), inv(direction.z)),
        }
    }

    /// Get a point along the ray at distance t
    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// The same ray pointing the opposite way
    pub fn reversed(&self) -> Self {
        Self::new(self.origin, -self.direction)
    }
}

/// Axis-aligned bounding box
///
/// Invariant: `min <= max` per axis once set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the box
    pub min: Vec3,
    /// Maximum corner of the box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new box from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create a box centered at a point with given half-extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Smallest box containing every point in the slice
    ///
    /// An empty slice yields a degenerate box at the origin.
    pub fn from_points(points: &[Vec3]) -> Self {
        if points.is_empty() {
            return Self::new(Vec3::zeros(), Vec3::zeros());
        }
        let mut min = Vec3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY);
        let mut max = -min;
        for p in points {
            min = min.inf(p);
            max = max.sup(p);
        }
        Self { min, max }
    }

    /// Get the centroid of the box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the half-extents of the box
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// Check if this box contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Check if this box overlaps another box
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }

    /// Test ray intersection using the slab method
    ///
    /// Returns the entry and exit distances `(tmin, tmax)` along the ray.
    /// A negative `tmin` with positive `tmax` means the origin is inside
    /// the box. Uses the ray's cached inverse direction, so any direction
    /// sign is handled without branching.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, f32)> {
        let t1 = (self.min.x - ray.origin.x) * ray.inv_direction.x;
        let t2 = (self.max.x - ray.origin.x) * ray.inv_direction.x;
        let t3 = (self.min.y - ray.origin.y) * ray.inv_direction.y;
        let t4 = (self.max.y - ray.origin.y) * ray.inv_direction.y;
        let t5 = (self.min.z - ray.origin.z) * ray.inv_direction.z;
        let t6 = (self.max.z - ray.origin.z) * ray.inv_direction.z;

        let tmin = t1.min(t2).max(t3.min(t4)).max(t5.min(t6));
        let tmax = t1.max(t2).min(t3.max(t4)).min(t5.max(t6));

        // Hit when the running max of entries stays at or below the
        // running min of exits, and the box is not entirely behind us
        if tmax >= tmin && tmax >= 0.0 {
            Some((tmin, tmax))
        } else {
            None
        }
    }

    /// Entry distance clamped to zero for rays starting inside the box
    pub fn hit_distance(&self, ray: &Ray) -> Option<f32> {
        self.intersect_ray(ray).map(|(tmin, _)| tmin.max(0.0))
    }
}

/// A triangle in world space
///
/// Vertex order defines the front-facing normal via the right-hand rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex
    pub a: Vec3,
    /// Second vertex
    pub b: Vec3,
    /// Third vertex
    pub c: Vec3,
}

impl Triangle {
    /// Creates a new triangle
    pub fn new(a: Vec3, b: Vec3, c: Vec3) -> Self {
        Self { a, b, c }
    }

    /// Front-facing normal via the right-hand rule
    pub fn normal(&self) -> Vec3 {
        let edge1 = self.b - self.a;
        let edge2 = self.c - self.a;
        edge1.cross(&edge2).normalize()
    }

    /// Centroid of the triangle
    pub fn centroid(&self) -> Vec3 {
        (self.a + self.b + self.c) / 3.0
    }

    /// The same triangle with its winding (and therefore normal) flipped
    pub fn flipped(&self) -> Self {
        Self::new(self.a, self.c, self.b)
    }

    /// Möller–Trumbore ray-triangle intersection
    ///
    /// Returns `(t, u, v)`, the distance along the ray and the barycentric
    /// coordinates of the hit, or `None` when the ray misses, runs
    /// parallel to the plane, or approaches from behind the winding.
    ///
    /// See: "Fast, Minimum Storage Ray/Triangle Intersection" by
    /// Möller & Trumbore.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<(f32, f32, f32)> {
        const EPSILON: f32 = 1e-6;

        let edge1 = self.b - self.a;
        let edge2 = self.c - self.a;

        let h = ray.direction.cross(&edge2);
        let det = edge1.dot(&h);

        // Near-degenerate (parallel) or back-facing determinant
        if det < EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = ray.origin - self.a;
        let u = inv_det * s.dot(&h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(&edge1);
        let v = inv_det * ray.direction.dot(&q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = inv_det * edge2.dot(&q);
        if t >= 0.0 {
            Some((t, u, v))
        } else {
            None // Behind the ray origin
        }
    }

    /// Möller–Trumbore test evaluated against both windings
    ///
    /// Used where mesh winding cannot be trusted, e.g. gizmo picking.
    pub fn intersect_ray_two_sided(&self, ray: &Ray) -> Option<(f32, f32, f32)> {
        self.intersect_ray(ray)
            .or_else(|| self.flipped().intersect_ray(ray))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_slab_hit_distance_from_outside() {
        // The canonical case: origin (0,0,10) looking down -Z at a unit box
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        let (tmin, tmax) = aabb.intersect_ray(&ray).unwrap();
        assert_relative_eq!(tmin, 9.0);
        assert_relative_eq!(tmax, 11.0);
        assert_relative_eq!(aabb.hit_distance(&ray).unwrap(), 9.0);
    }

    #[test]
    fn test_slab_straddles_when_origin_inside() {
        let ray = Ray::new(Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0));
        let aabb = Aabb::new(Vec3::new(-2.0, -2.0, -2.0), Vec3::new(2.0, 2.0, 2.0));

        let (tmin, tmax) = aabb.intersect_ray(&ray).unwrap();
        assert!(tmin <= 0.0 && 0.0 <= tmax);
        assert_relative_eq!(aabb.hit_distance(&ray).unwrap(), 0.0);

        // From the centroid the reversed ray sees the same straddle
        let (rmin, rmax) = aabb.intersect_ray(&ray.reversed()).unwrap();
        assert_relative_eq!(rmin, tmin);
        assert_relative_eq!(rmax, tmax);
    }

    #[test]
    fn test_slab_symmetry_under_direction_reversal() {
        // A ray through the centroid must hit from either direction with
        // mirrored entry/exit distances
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        let back = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::new(0.0, 0.0, 1.0));

        let (fwd_min, fwd_max) = aabb.intersect_ray(&ray).unwrap();
        let (rev_min, rev_max) = aabb.intersect_ray(&back).unwrap();
        assert_relative_eq!(fwd_min, rev_min);
        assert_relative_eq!(fwd_max, rev_max);
    }

    #[test]
    fn test_slab_miss_behind_origin() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, 1.0));
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        assert!(aabb.intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_slab_handles_axis_parallel_ray_offset() {
        // Direction has zero components; the inverse-direction trick must
        // not produce a false hit for a ray sliding past the box
        let ray = Ray::new(Vec3::new(5.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        let aabb = Aabb::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::new(1.0, 1.0, 1.0));

        assert!(aabb.intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_aabb_from_points() {
        let aabb = Aabb::from_points(&[
            Vec3::new(1.0, -2.0, 0.5),
            Vec3::new(-1.0, 4.0, 0.0),
            Vec3::new(0.0, 0.0, 3.0),
        ]);
        assert_relative_eq!(aabb.min.x, -1.0);
        assert_relative_eq!(aabb.max.y, 4.0);
        assert_relative_eq!(aabb.max.z, 3.0);
    }

    #[test]
    fn test_triangle_hit_through_interior_point() {
        let tri = Triangle::new(
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        // Aim at a point strictly inside the triangle
        let ray = Ray::new(Vec3::new(0.0, -0.25, 5.0), Vec3::new(0.0, 0.0, -1.0));

        let (t, u, v) = tri.intersect_ray(&ray).unwrap();
        assert_relative_eq!(t, 5.0);
        assert!(u >= 0.0 && v >= 0.0 && u + v <= 1.0);
    }

    #[test]
    fn test_triangle_miss_outside_projection() {
        let tri = Triangle::new(
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        let ray = Ray::new(Vec3::new(2.0, 2.0, 5.0), Vec3::new(0.0, 0.0, -1.0));

        assert!(tri.intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_triangle_parallel_ray_rejected() {
        let tri = Triangle::new(
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        let ray = Ray::new(Vec3::new(0.0, 0.0, 1.0), Vec3::new(1.0, 0.0, 0.0));

        assert!(tri.intersect_ray(&ray).is_none());
    }

    #[test]
    fn test_triangle_two_sided_hits_back_face() {
        let tri = Triangle::new(
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        // Approaching from behind the winding
        let ray = Ray::new(Vec3::new(0.0, -0.25, -5.0), Vec3::new(0.0, 0.0, 1.0));

        let two_sided = tri.intersect_ray_two_sided(&ray).unwrap();
        assert_relative_eq!(two_sided.0, 5.0);
    }

    #[test]
    fn test_triangle_normal_right_hand_rule() {
        let tri = Triangle::new(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        );
        let n = tri.normal();
        assert_relative_eq!(n.z, 1.0);
    }
}
