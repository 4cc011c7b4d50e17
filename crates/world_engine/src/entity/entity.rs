//! Entity data
//!
//! The entity is a plain data record: placement, cached model matrix,
//! world-space bounds, a shared mesh handle, the in-place refreshed
//! collider, and the chunk membership bookkeeping the world maintains.

use crate::assets::MeshHandle;
use crate::foundation::math::{Mat4, Transform};
use crate::physics::collision::{Aabb, Collider, CollisionMeshTemplate};
use crate::world::GridCoord;
use super::kind::EntityKind;

bitflags::bitflags! {
    /// Per-entity state bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EntityFlags: u32 {
        /// Entity is drawn and eligible for visible-only raycasts
        const VISIBLE = 1 << 0;
        /// The collider no longer matches the model matrix
        const COLLIDER_DIRTY = 1 << 1;
    }
}

/// World-unique entity identifier, assigned monotonically at spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(u64);

impl EntityId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw numeric id
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Stable typed slot handle into a chunk's storage arena
///
/// Storage never moves or shrinks, so a handle stays valid for the owning
/// chunk's lifetime regardless of how the entity moves through the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityHandle {
    /// Dense index of the owning chunk in the world grid
    pub chunk: usize,
    /// The entity's kind, selecting the storage block
    pub kind: EntityKind,
    /// Slot within the kind's block
    pub slot: usize,
}

/// One entity living in the world
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    kind: EntityKind,
    transform: Transform,
    model_matrix: Mat4,
    bounds: Aabb,
    mesh: Option<MeshHandle>,
    collider: Option<Collider>,
    /// Per-entity state bits
    pub flags: EntityFlags,
    // Chunk membership recorded by the world's placement pass
    cell_span: Option<(GridCoord, GridCoord)>,
    cells: Vec<GridCoord>,
}

impl Entity {
    /// Create an entity at a transform, optionally referencing a mesh
    ///
    /// The collider is allocated here, once; its vertex count is fixed for
    /// the entity's lifetime.
    pub(crate) fn new(
        id: EntityId,
        kind: EntityKind,
        transform: Transform,
        mesh: Option<MeshHandle>,
        template: Option<&CollisionMeshTemplate>,
    ) -> Self {
        let model_matrix = transform.to_matrix();
        let collider = template.map(Collider::for_template);
        let bounds = Aabb::from_center_extents(transform.position, transform.scale * 0.5);

        let mut entity = Self {
            id,
            kind,
            transform,
            model_matrix,
            bounds,
            mesh,
            collider,
            flags: EntityFlags::VISIBLE | EntityFlags::COLLIDER_DIRTY,
            cell_span: None,
            cells: Vec::new(),
        };
        if let Some(template) = template {
            entity.refresh_collider(template);
        }
        entity
    }

    /// The entity's world-unique id
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// The entity's kind
    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Current placement
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    /// Cached model matrix for the current transform
    pub fn model_matrix(&self) -> &Mat4 {
        &self.model_matrix
    }

    /// Current world-space bounding box
    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Shared static mesh reference, if any
    pub fn mesh(&self) -> Option<MeshHandle> {
        self.mesh
    }

    /// The live world-space collider, if the entity has a mesh
    pub fn collider(&self) -> Option<&Collider> {
        self.collider.as_ref()
    }

    /// Move the entity and invalidate its collider
    ///
    /// Only the matrix is recomputed here; collider and bounds catch up on
    /// the next refresh so per-frame movement stays cheap.
    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
        self.model_matrix = self.transform.to_matrix();
        self.flags.insert(EntityFlags::COLLIDER_DIRTY);
    }

    /// Rewrite the collider from the current model matrix and recompute bounds
    pub fn refresh_collider(&mut self, template: &CollisionMeshTemplate) {
        if let Some(collider) = self.collider.as_mut() {
            collider.refresh(template, &self.model_matrix);
            self.bounds = Aabb::from_points(collider.vertices());
        } else {
            self.bounds =
                Aabb::from_center_extents(self.transform.position, self.transform.scale * 0.5);
        }
        self.flags.remove(EntityFlags::COLLIDER_DIRTY);
    }

    /// First and last grid coordinates of the recorded membership span
    pub fn cell_span(&self) -> Option<(GridCoord, GridCoord)> {
        self.cell_span
    }

    /// Every chunk the entity was last recorded as occupying
    pub fn cells(&self) -> &[GridCoord] {
        &self.cells
    }

    pub(crate) fn record_cells(&mut self, span: (GridCoord, GridCoord), cells: Vec<GridCoord>) {
        self.cell_span = Some(span);
        self.cells = cells;
    }

    pub(crate) fn take_cells(&mut self) -> Vec<GridCoord> {
        self.cell_span = None;
        std::mem::take(&mut self.cells)
    }
}
