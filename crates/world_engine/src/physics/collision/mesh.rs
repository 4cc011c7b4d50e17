//! Collision mesh representations
//!
//! A static mesh is stored once in MODEL SPACE and shared; every entity
//! carries a world-space [`Collider`] of the same vertex count that is
//! overwritten in place from the template whenever the entity moves.

use crate::foundation::math::{Mat4, Point3, Vec3};
use super::primitives::{Ray, Triangle};

/// Closest-hit result of a mesh-level ray test
#[derive(Debug, Clone, Copy)]
pub struct MeshHit {
    /// Distance from the ray origin to the intersection
    pub distance: f32,
    /// The intersected triangle, in world space
    pub triangle: Triangle,
    /// Index of the triangle within the source mesh
    pub triangle_index: usize,
}

/// A collision mesh template stored in MODEL SPACE (local coordinates)
///
/// Vertices are held in triangle order: every three consecutive vertices
/// form one triangle. Templates never change after construction.
#[derive(Debug, Clone)]
pub struct CollisionMeshTemplate {
    vertices: Vec<Vec3>,
}

impl CollisionMeshTemplate {
    /// Build a template from model-space vertex and index buffers
    ///
    /// Index triples are expanded so the template and every collider built
    /// from it share a flat triangle-order layout. Trailing indices that do
    /// not complete a triple are dropped.
    pub fn from_buffers(vertices: &[Vec3], indices: &[u32]) -> Self {
        let mut expanded = Vec::with_capacity(indices.len() - indices.len() % 3);
        for triple in indices.chunks_exact(3) {
            expanded.push(vertices[triple[0] as usize]);
            expanded.push(vertices[triple[1] as usize]);
            expanded.push(vertices[triple[2] as usize]);
        }
        Self { vertices: expanded }
    }

    /// Axis-aligned cube with the given half-extent, outward winding
    ///
    /// The standard collider for props and gizmo handles, and the workhorse
    /// of the test suite.
    pub fn cube(half: f32) -> Self {
        let p = |x: f32, y: f32, z: f32| Vec3::new(x * half, y * half, z * half);
        let corners = [
            p(-1.0, -1.0, -1.0), // 0
            p(1.0, -1.0, -1.0),  // 1
            p(1.0, 1.0, -1.0),   // 2
            p(-1.0, 1.0, -1.0),  // 3
            p(-1.0, -1.0, 1.0),  // 4
            p(1.0, -1.0, 1.0),   // 5
            p(1.0, 1.0, 1.0),    // 6
            p(-1.0, 1.0, 1.0),   // 7
        ];
        // Two triangles per face, counter-clockwise seen from outside
        let indices: [u32; 36] = [
            4, 5, 6, 4, 6, 7, // +Z
            1, 0, 3, 1, 3, 2, // -Z
            5, 1, 2, 5, 2, 6, // +X
            0, 4, 7, 0, 7, 3, // -X
            7, 6, 2, 7, 2, 3, // +Y
            0, 1, 5, 0, 5, 4, // -Y
        ];
        Self::from_buffers(&corners, &indices)
    }

    /// Number of vertices (three per triangle)
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of triangles in the mesh
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// The model-space vertices in triangle order
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Closest-hit ray test with vertices transformed through a model matrix
    ///
    /// Used for static meshes that have no live collider; the template is
    /// transformed on the fly and never stored in world space.
    pub fn intersect_ray_with(&self, ray: &Ray, model: &Mat4) -> Option<MeshHit> {
        let transform = |v: &Vec3| {
            let p = model.transform_point(&Point3::new(v.x, v.y, v.z));
            Vec3::new(p.x, p.y, p.z)
        };
        closest_hit(
            self.vertices
                .chunks_exact(3)
                .map(|tri| Triangle::new(transform(&tri[0]), transform(&tri[1]), transform(&tri[2]))),
            ray,
            false,
        )
    }
}

/// Per-entity world-space collision mesh
///
/// Allocated once at entity creation; the vertex count is fixed for the
/// entity's lifetime and the contents are rewritten on every refresh.
#[derive(Debug, Clone)]
pub struct Collider {
    vertices: Vec<Vec3>,
}

impl Collider {
    /// Allocate a collider sized for a template
    pub fn for_template(template: &CollisionMeshTemplate) -> Self {
        Self {
            vertices: vec![Vec3::zeros(); template.vertex_count()],
        }
    }

    /// Overwrite the world-space vertices from the template and model matrix
    pub fn refresh(&mut self, template: &CollisionMeshTemplate, model: &Mat4) {
        debug_assert_eq!(self.vertices.len(), template.vertex_count());
        for (out, v) in self.vertices.iter_mut().zip(template.vertices()) {
            let p = model.transform_point(&Point3::new(v.x, v.y, v.z));
            *out = Vec3::new(p.x, p.y, p.z);
        }
    }

    /// The world-space vertices in triangle order
    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    /// Number of triangles in the collider
    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Closest-hit ray test over the live world-space triangles
    pub fn intersect_ray(&self, ray: &Ray) -> Option<MeshHit> {
        closest_hit(self.triangles(), ray, false)
    }

    /// Closest-hit ray test evaluating both triangle windings
    pub fn intersect_ray_two_sided(&self, ray: &Ray) -> Option<MeshHit> {
        closest_hit(self.triangles(), ray, true)
    }

    fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.vertices
            .chunks_exact(3)
            .map(|tri| Triangle::new(tri[0], tri[1], tri[2]))
    }
}

/// Walk triangles and keep the minimum-distance hit
fn closest_hit(
    triangles: impl Iterator<Item = Triangle>,
    ray: &Ray,
    two_sided: bool,
) -> Option<MeshHit> {
    let mut closest: Option<MeshHit> = None;
    let mut closest_t = f32::MAX;

    for (index, triangle) in triangles.enumerate() {
        let result = if two_sided {
            triangle.intersect_ray_two_sided(ray)
        } else {
            triangle.intersect_ray(ray)
        };
        if let Some((t, _u, _v)) = result {
            if t < closest_t {
                closest_t = t;
                closest = Some(MeshHit {
                    distance: t,
                    triangle,
                    triangle_index: index,
                });
            }
        }
    }

    closest
}
