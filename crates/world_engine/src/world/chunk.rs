//! World chunk
//!
//! A chunk owns one storage arena and knows where it sits in the grid.
//! Ownership (which chunk allocated the entity) and occupancy (which
//! chunks the entity's bounds overlap) are tracked separately: occupancy
//! lives in the bounded visitor list.

use crate::entity::{Entity, EntityHandle, EntityTypeRegistry};
use crate::foundation::math::Vec3;
use super::storage::{ChunkStorage, StorageError};

/// Integer coordinate of a chunk in the world grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCoord {
    /// Chunk index along X
    pub i: i32,
    /// Chunk index along Y
    pub j: i32,
    /// Chunk index along Z
    pub k: i32,
}

impl GridCoord {
    /// Create a grid coordinate
    pub fn new(i: i32, j: i32, k: i32) -> Self {
        Self { i, j, k }
    }
}

impl std::fmt::Display for GridCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.i, self.j, self.k)
    }
}

/// One cubic region of world space and the storage arena that owns the
/// entities living in it
pub struct WorldChunk {
    id: u64,
    coord: GridCoord,
    origin: Vec3,
    storage: ChunkStorage,
    visitors: Vec<EntityHandle>,
    visitor_cap: usize,
}

impl WorldChunk {
    /// Create a chunk at a grid coordinate
    ///
    /// `origin` is the world-space position of the chunk's minimum corner;
    /// ids are handed out monotonically by the world during grid
    /// construction.
    pub fn new(
        id: u64,
        coord: GridCoord,
        origin: Vec3,
        arena_bytes: usize,
        visitor_cap: usize,
    ) -> Self {
        Self {
            id,
            coord,
            origin,
            storage: ChunkStorage::new(arena_bytes),
            visitors: Vec::new(),
            visitor_cap,
        }
    }

    /// The chunk's monotonically assigned id
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Position in the chunk grid
    pub fn grid_position(&self) -> GridCoord {
        self.coord
    }

    /// World-space position of the chunk's minimum corner, in meters
    pub fn metric_position(&self) -> Vec3 {
        self.origin
    }

    /// Human-readable position, for the editor's world panel
    pub fn position_label(&self) -> String {
        format!(
            "chunk {} {} @ ({:.1}, {:.1}, {:.1}) m",
            self.id, self.coord, self.origin.x, self.origin.y, self.origin.z
        )
    }

    /// Place an entity in this chunk's arena
    pub fn add_entity(
        &mut self,
        registry: &EntityTypeRegistry,
        entity: Entity,
    ) -> Result<usize, StorageError> {
        self.storage.allocate(self.id, registry, entity)
    }

    /// Record an entity as physically overlapping this chunk
    ///
    /// The list is bounded; returns `false` without recording when it is
    /// full or the handle is already present.
    pub fn add_visitor(&mut self, handle: EntityHandle) -> bool {
        if self.visitors.contains(&handle) {
            return false;
        }
        if self.visitors.len() == self.visitor_cap {
            log::warn!(
                "chunk {}: visitor list full ({} entries), dropping entity",
                self.id,
                self.visitor_cap
            );
            return false;
        }
        self.visitors.push(handle);
        true
    }

    /// Remove an entity from the visitor list
    pub fn remove_visitor(&mut self, handle: EntityHandle) {
        self.visitors.retain(|v| *v != handle);
    }

    /// Entities currently recorded as overlapping this chunk
    pub fn visitors(&self) -> &[EntityHandle] {
        &self.visitors
    }

    /// The chunk's storage arena
    pub fn storage(&self) -> &ChunkStorage {
        &self.storage
    }

    /// Mutable access to the storage arena
    pub(crate) fn storage_mut(&mut self) -> &mut ChunkStorage {
        &mut self.storage
    }

    /// Walk every entity owned by this chunk
    ///
    /// Finite and single-pass: blocks in declaration order, slots in
    /// allocation order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.storage.iter()
    }

    /// Whether the chunk neither owns nor hosts any entity
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty() && self.visitors.is_empty()
    }
}
