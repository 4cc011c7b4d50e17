//! Entity-level ray tests and screen-space picking
//!
//! The entity test is a strict broad-to-narrow refinement: the cached
//! bounding box is tested first and the triangle walk runs only on a box
//! hit. The box test must dominate the common "definitely a miss" case, so
//! nothing below it is allowed to touch the collider on a miss.

use crate::assets::MeshCatalogue;
use crate::entity::{Entity, EntityHandle, EntityId};
use crate::foundation::math::{Mat4, Vec3, Vec4};
use crate::physics::collision::{MeshHit, Ray, Triangle};
use crate::world::LightKind;

/// Which entities a world-level raycast considers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RaycastFilter {
    /// Every live entity
    All,
    /// Only entities with the visible flag set
    VisibleOnly,
}

/// Closest-hit result of a world-level entity raycast
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    /// Storage handle of the hit entity
    pub entity: EntityHandle,
    /// Id of the hit entity
    pub entity_id: EntityId,
    /// Distance from the ray origin to the intersection
    pub distance: f32,
    /// The intersected world-space triangle
    pub triangle: Triangle,
    /// Index of the triangle within the entity's collider
    pub triangle_index: usize,
}

/// Result of a light-volume raycast
#[derive(Debug, Clone, Copy)]
pub struct LightHit {
    /// Which family of light was hit
    pub kind: LightKind,
    /// Index of the light in the world's light list
    pub index: usize,
    /// Distance from the ray origin to the pick box
    pub distance: f32,
}

/// Two-phase ray test against one entity
///
/// Broad phase: slab test against the cached bounds. Narrow phase, entered
/// only on a box hit: refresh the entity's collider from its current model
/// matrix, then walk its triangles for the closest hit.
pub fn intersect_entity(
    ray: &Ray,
    entity: &mut Entity,
    meshes: &MeshCatalogue,
) -> Option<MeshHit> {
    entity.bounds().intersect_ray(ray)?;

    let template = meshes.get(entity.mesh()?)?;
    entity.refresh_collider(template);
    entity.collider()?.intersect_ray(ray)
}

/// Convert a screen coordinate into a world-space ray
///
/// Screen pixels map to NDC (top-left = (-1, -1)), then un-project through
/// the inverse view-projection at the near and far planes; the ray runs
/// from the near point through the far point. Returns `None` only when the
/// combined matrix is singular, which indicates a broken camera setup
/// rather than a pick miss.
pub fn cast_pickray(
    screen_x: f32,
    screen_y: f32,
    viewport: (u32, u32),
    view: &Mat4,
    projection: &Mat4,
) -> Option<Ray> {
    let ndc_x = screen_x / viewport.0 as f32 * 2.0 - 1.0;
    let ndc_y = screen_y / viewport.1 as f32 * 2.0 - 1.0;

    let inv_view_proj = (projection * view).try_inverse()?;
    let inv_view = view.try_inverse()?;

    let unproject = |ndc_z: f32| -> Option<Vec3> {
        let clip = Vec4::new(ndc_x, ndc_y, ndc_z, 1.0);
        let h = inv_view_proj * clip;
        if h.w.abs() < f32::EPSILON {
            return None;
        }
        Some(Vec3::new(h.x / h.w, h.y / h.w, h.z / h.w))
    };

    let near = unproject(0.0)?;
    let far = unproject(1.0)?;

    // The camera position is the inverse view's translation column; the
    // ray leaves it through the picked point
    let origin = Vec3::new(inv_view[(0, 3)], inv_view[(1, 3)], inv_view[(2, 3)]);
    Some(Ray::new(origin, far - near))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn look_along_neg_z() -> (Mat4, Mat4) {
        let view = Mat4::look_at_rh(
            &nalgebra::Point3::new(0.0, 0.0, 10.0),
            &nalgebra::Point3::new(0.0, 0.0, 0.0),
            &Vec3::new(0.0, 1.0, 0.0),
        );
        let projection = Mat4::new_perspective(16.0 / 9.0, std::f32::consts::FRAC_PI_4, 0.1, 100.0);
        (view, projection)
    }

    #[test]
    fn test_pickray_through_screen_center() {
        let (view, projection) = look_along_neg_z();
        let ray = cast_pickray(960.0, 540.0, (1920, 1080), &view, &projection).unwrap();

        // Center pixel looks straight down the camera forward axis
        assert_relative_eq!(ray.direction.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(ray.direction.y, 0.0, epsilon = 1e-4);
        assert_relative_eq!(ray.direction.z, -1.0, epsilon = 1e-4);
    }

    #[test]
    fn test_pickray_right_half_leans_right() {
        let (view, projection) = look_along_neg_z();
        let ray = cast_pickray(1440.0, 540.0, (1920, 1080), &view, &projection).unwrap();

        assert!(ray.direction.x > 0.0);
        assert!(ray.direction.z < 0.0);
    }

    #[test]
    fn test_pickray_rejects_singular_projection() {
        let view = Mat4::identity();
        let projection = Mat4::zeros();
        assert!(cast_pickray(10.0, 10.0, (100, 100), &view, &projection).is_none());
    }
}
