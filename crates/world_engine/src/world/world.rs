//! The world: chunk grid, entity placement, and query composition
//!
//! The grid is dense and fixed at startup. Entities are owned by the chunk
//! that allocated them and visit every chunk their bounds overlap; the
//! active list tracks the chunks worth iterating. All queries complete
//! synchronously on the calling thread.

use crate::assets::MeshCatalogue;
use crate::core::config::WorldConfig;
use crate::entity::{
    Capabilities, Entity, EntityFlags, EntityHandle, EntityId, EntityKind, EntityTypeRegistry,
};
use crate::foundation::math::{Transform, Vec3};
use crate::physics::collision::{Aabb, Ray};
use crate::physics::raycaster::{self, LightHit, RaycastFilter, RaycastHit};
use super::chunk::{GridCoord, WorldChunk};
use super::light::Light;
use super::storage::StorageError;

/// Outcome class of a chunk-membership update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellStatus {
    /// Membership is correct (possibly unchanged)
    Ok,
    /// The entity's bounds leave the configured world extent
    OutOfBounds,
    /// The entity's bounds span more chunks than the per-entity cap
    EntityTooBig,
    /// Invariant violation, e.g. an inverted bounding box
    Unexpected,
}

/// Result of a chunk-membership update
///
/// Recoverable statuses leave the previous placement intact; the message
/// is suitable for a transient on-screen notification.
#[derive(Debug, Clone)]
pub struct CellUpdate {
    /// Outcome class
    pub status: CellStatus,
    /// Human-readable description of the outcome
    pub message: String,
    /// Whether the membership list actually changed
    pub changed: bool,
}

impl CellUpdate {
    fn ok(changed: bool) -> Self {
        Self {
            status: CellStatus::Ok,
            message: if changed {
                "chunk membership updated".to_string()
            } else {
                "chunk membership unchanged".to_string()
            },
            changed,
        }
    }

    fn failed(status: CellStatus, message: String) -> Self {
        Self {
            status,
            message,
            changed: false,
        }
    }
}

/// World-level failures
#[derive(thiserror::Error, Debug)]
pub enum WorldError {
    /// Entity storage could not be allocated
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Spawn position outside the configured world extent
    #[error("spawn position ({0}, {1}, {2}) is outside the world bounds")]
    SpawnOutOfBounds(f32, f32, f32),
}

/// A fixed 3D grid of chunks plus the dynamically maintained list of
/// active (non-empty) chunks
pub struct World {
    dims: [i32; 3],
    chunk_size: f32,
    half_extent: Vec3,
    max_chunks_per_entity: usize,
    light_pick_extent: f32,
    registry: EntityTypeRegistry,
    chunks: Vec<WorldChunk>,
    active: Vec<usize>,
    lights: Vec<Light>,
    next_entity_id: u64,
}

impl World {
    /// Build the dense chunk grid from a configuration
    ///
    /// Chunk ids are assigned monotonically during construction and never
    /// reused.
    pub fn new(config: &WorldConfig, registry: EntityTypeRegistry) -> Self {
        let dims = [
            config.grid_dims[0] as i32,
            config.grid_dims[1] as i32,
            config.grid_dims[2] as i32,
        ];
        let extent = config.world_extent();
        let half_extent = Vec3::new(extent[0] * 0.5, extent[1] * 0.5, extent[2] * 0.5);

        let mut chunks = Vec::with_capacity(config.chunk_count());
        let mut id = 0u64;
        for k in 0..dims[2] {
            for j in 0..dims[1] {
                for i in 0..dims[0] {
                    let coord = GridCoord::new(i, j, k);
                    let origin = Vec3::new(
                        i as f32 * config.chunk_size - half_extent.x,
                        j as f32 * config.chunk_size - half_extent.y,
                        k as f32 * config.chunk_size - half_extent.z,
                    );
                    chunks.push(WorldChunk::new(
                        id,
                        coord,
                        origin,
                        config.chunk_arena_bytes,
                        config.max_visitors_per_chunk,
                    ));
                    id += 1;
                }
            }
        }

        Self {
            dims,
            chunk_size: config.chunk_size,
            half_extent,
            max_chunks_per_entity: config.max_chunks_per_entity,
            light_pick_extent: config.light_pick_extent,
            registry,
            chunks,
            active: Vec::new(),
            lights: Vec::new(),
            next_entity_id: 0,
        }
    }

    /// Map a world-space point onto the chunk grid
    ///
    /// Shifts by half the grid extent, then integer-divides by the chunk
    /// size. `None` when the point lies outside the configured bounds.
    pub fn world_to_cell(&self, point: Vec3) -> Option<GridCoord> {
        let cell = |value: f32, axis: usize| -> Option<i32> {
            let half = self.half_extent[axis];
            let index = ((value + half) / self.chunk_size).floor() as i32;
            (0..self.dims[axis]).contains(&index).then_some(index)
        };
        Some(GridCoord::new(
            cell(point.x, 0)?,
            cell(point.y, 1)?,
            cell(point.z, 2)?,
        ))
    }

    /// World-space position of a chunk's minimum corner
    pub fn cell_origin(&self, coord: GridCoord) -> Vec3 {
        Vec3::new(
            coord.i as f32 * self.chunk_size - self.half_extent.x,
            coord.j as f32 * self.chunk_size - self.half_extent.y,
            coord.k as f32 * self.chunk_size - self.half_extent.z,
        )
    }

    fn index(&self, coord: GridCoord) -> usize {
        (coord.i + self.dims[0] * (coord.j + self.dims[1] * coord.k)) as usize
    }

    /// Total number of chunks in the grid
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// The chunk at a grid coordinate
    pub fn chunk_at(&self, coord: GridCoord) -> Option<&WorldChunk> {
        let in_grid = (0..self.dims[0]).contains(&coord.i)
            && (0..self.dims[1]).contains(&coord.j)
            && (0..self.dims[2]).contains(&coord.k);
        in_grid.then(|| &self.chunks[self.index(coord)])
    }

    /// Spawn an entity at a transform
    ///
    /// Storage is allocated in the chunk containing the spawn position and
    /// stays there for the entity's lifetime; the initial chunk-membership
    /// pass runs immediately after placement.
    pub fn spawn(
        &mut self,
        kind: EntityKind,
        transform: Transform,
        mesh: Option<crate::assets::MeshHandle>,
        meshes: &MeshCatalogue,
    ) -> Result<EntityHandle, WorldError> {
        let position = transform.position;
        let coord = self.world_to_cell(position).ok_or(WorldError::SpawnOutOfBounds(
            position.x, position.y, position.z,
        ))?;

        let template = mesh.and_then(|handle| meshes.get(handle));
        let entity = Entity::new(
            EntityId::new(self.next_entity_id),
            kind,
            transform,
            mesh,
            template,
        );

        let chunk_index = self.index(coord);
        let slot = self.chunks[chunk_index].add_entity(&self.registry, entity)?;
        self.next_entity_id += 1;

        let handle = EntityHandle {
            chunk: chunk_index,
            kind,
            slot,
        };
        self.rebuild_active();

        let placement = self.update_entity_chunks(handle);
        if placement.status != CellStatus::Ok {
            log::warn!("spawn placement: {}", placement.message);
        }
        Ok(handle)
    }

    /// Resolve a handle to the entity it names
    pub fn get(&self, handle: EntityHandle) -> Option<&Entity> {
        self.chunks
            .get(handle.chunk)?
            .storage()
            .get(handle.kind, handle.slot)
    }

    /// Mutable handle resolution
    pub fn get_mut(&mut self, handle: EntityHandle) -> Option<&mut Entity> {
        self.chunks
            .get_mut(handle.chunk)?
            .storage_mut()
            .get_mut(handle.kind, handle.slot)
    }

    /// Move an entity, refresh its collider and bounds, and re-home its
    /// chunk membership
    pub fn set_entity_transform(
        &mut self,
        handle: EntityHandle,
        transform: Transform,
        meshes: &MeshCatalogue,
    ) -> CellUpdate {
        match self.get_mut(handle) {
            Some(entity) => {
                entity.set_transform(transform);
                if let Some(template) = entity.mesh().and_then(|h| meshes.get(h)) {
                    entity.refresh_collider(template);
                }
            }
            None => {
                return CellUpdate::failed(
                    CellStatus::Unexpected,
                    "entity handle did not resolve".to_string(),
                )
            }
        }
        self.update_entity_chunks(handle)
    }

    /// Recompute which chunks an entity occupies
    ///
    /// Manages visitor membership only; storage never moves, so this is
    /// safe to call every time an entity moves. Recoverable failures leave
    /// the previous membership intact.
    pub fn update_entity_chunks(&mut self, handle: EntityHandle) -> CellUpdate {
        let Some(entity) = self.get(handle) else {
            return CellUpdate::failed(
                CellStatus::Unexpected,
                "entity handle did not resolve".to_string(),
            );
        };
        let id = entity.id().get();
        let bounds = *entity.bounds();
        let previous_span = entity.cell_span();

        let (Some(min_cell), Some(max_cell)) =
            (self.world_to_cell(bounds.min), self.world_to_cell(bounds.max))
        else {
            let update = CellUpdate::failed(
                CellStatus::OutOfBounds,
                format!("entity {id} bounds reach outside the world"),
            );
            log::warn!("{}", update.message);
            return update;
        };

        // A malformed bounding box shows up as an inverted span
        if max_cell.i < min_cell.i || max_cell.j < min_cell.j || max_cell.k < min_cell.k {
            let update = CellUpdate::failed(
                CellStatus::Unexpected,
                format!("entity {id} has an inverted chunk span {min_cell} .. {max_cell}"),
            );
            log::error!("{}", update.message);
            return update;
        }

        // Static and slow entities land here every frame
        if previous_span == Some((min_cell, max_cell)) {
            return CellUpdate::ok(false);
        }

        let span_count = ((max_cell.i - min_cell.i + 1)
            * (max_cell.j - min_cell.j + 1)
            * (max_cell.k - min_cell.k + 1)) as usize;
        if span_count > self.max_chunks_per_entity {
            let update = CellUpdate::failed(
                CellStatus::EntityTooBig,
                format!(
                    "entity {id} would span {span_count} chunks (limit {})",
                    self.max_chunks_per_entity
                ),
            );
            log::warn!("{}", update.message);
            return update;
        }

        let old_cells = match self.get_mut(handle) {
            Some(entity) => entity.take_cells(),
            None => Vec::new(),
        };
        for cell in &old_cells {
            let index = self.index(*cell);
            self.chunks[index].remove_visitor(handle);
        }

        let mut cells = Vec::with_capacity(span_count);
        for k in min_cell.k..=max_cell.k {
            for j in min_cell.j..=max_cell.j {
                for i in min_cell.i..=max_cell.i {
                    let cell = GridCoord::new(i, j, k);
                    let index = self.index(cell);
                    self.chunks[index].add_visitor(handle);
                    cells.push(cell);
                }
            }
        }
        if let Some(entity) = self.get_mut(handle) {
            entity.record_cells((min_cell, max_cell), cells);
        }

        self.rebuild_active();
        CellUpdate::ok(true)
    }

    fn rebuild_active(&mut self) {
        self.active = self
            .chunks
            .iter()
            .enumerate()
            .filter(|(_, chunk)| !chunk.is_empty())
            .map(|(index, _)| index)
            .collect();
    }

    /// Iterate the active (non-empty) chunks
    ///
    /// Finite and single-pass, in grid order.
    pub fn chunks(&self) -> impl Iterator<Item = &WorldChunk> {
        self.active.iter().filter_map(|&index| self.chunks.get(index))
    }

    /// Iterate every live entity in the world
    ///
    /// Composes the active chunks' storage iterators into one flat, finite,
    /// single-pass sequence.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.chunks().flat_map(WorldChunk::entities)
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.chunks().map(|chunk| chunk.storage().len()).sum()
    }

    /// Register a light; the returned index is what light raycasts report
    pub fn add_light(&mut self, light: Light) -> usize {
        self.lights.push(light);
        self.lights.len() - 1
    }

    /// The world's light list
    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    /// Closest-hit raycast over the world's entities
    ///
    /// Candidates come from the active chunks; `skip` excludes one entity
    /// (typically the caster), `max_distance` bounds the accepted hits.
    /// Hits must be strictly closer than both the running minimum and the
    /// bound, so the first candidate found at the minimum distance wins.
    pub fn raycast(
        &mut self,
        ray: &Ray,
        filter: RaycastFilter,
        skip: Option<EntityId>,
        max_distance: Option<f32>,
        meshes: &MeshCatalogue,
    ) -> Option<RaycastHit> {
        let limit = max_distance.unwrap_or(f32::INFINITY);
        let mut best: Option<RaycastHit> = None;

        let active = self.active.clone();
        for chunk_index in active {
            let Some(chunk) = self.chunks.get_mut(chunk_index) else {
                continue;
            };
            let storage = chunk.storage_mut();
            for block in 0..storage.block_count() {
                let Some(descriptor) = storage.block(block) else {
                    continue;
                };
                // Whole-block reject for kinds that never carry collision
                // geometry (light proxies are picked through raycast_lights)
                if !self
                    .registry
                    .has_capability(descriptor.kind, Capabilities::COLLIDABLE)
                {
                    continue;
                }
                for slot in 0..descriptor.len {
                    let Some(entity) = storage.entry_mut(block, slot) else {
                        continue;
                    };
                    if skip == Some(entity.id()) {
                        continue;
                    }
                    if filter == RaycastFilter::VisibleOnly
                        && !entity.flags.contains(EntityFlags::VISIBLE)
                    {
                        continue;
                    }

                    let entity_id = entity.id();
                    if let Some(hit) = raycaster::intersect_entity(ray, entity, meshes) {
                        let closer = best.map_or(true, |b| hit.distance < b.distance);
                        if hit.distance < limit && closer {
                            best = Some(RaycastHit {
                                entity: EntityHandle {
                                    chunk: chunk_index,
                                    kind: descriptor.kind,
                                    slot,
                                },
                                entity_id,
                                distance: hit.distance,
                                triangle: hit.triangle,
                                triangle_index: hit.triangle_index,
                            });
                        }
                    }
                }
            }
        }
        best
    }

    /// Closest-hit raycast over the world's lights
    ///
    /// Lights have no mesh; each is tested as a small synthetic box around
    /// its position so editors can pick them.
    pub fn raycast_lights(&self, ray: &Ray) -> Option<LightHit> {
        let extent = Vec3::new(
            self.light_pick_extent,
            self.light_pick_extent,
            self.light_pick_extent,
        );
        let mut best: Option<LightHit> = None;

        for (index, light) in self.lights.iter().enumerate() {
            if !light.enabled {
                continue;
            }
            let pick_box = Aabb::from_center_extents(light.position, extent);
            if let Some(distance) = pick_box.hit_distance(ray) {
                if best.map_or(true, |b| distance < b.distance) {
                    best = Some(LightHit {
                        kind: light.kind,
                        index,
                        distance,
                    });
                }
            }
        }
        best
    }

    /// Multi-ray vertical scan for ledge detection
    ///
    /// Casts `count` parallel rays stacked upward from `ray` at `spacing`
    /// intervals and keeps the hit closest in depth. Iteration runs from
    /// the highest ray down with a strict comparison, so a depth tie is
    /// resolved in favor of the ray that started highest.
    pub fn linear_raycast_array(
        &mut self,
        ray: &Ray,
        count: usize,
        spacing: f32,
        meshes: &MeshCatalogue,
    ) -> Option<RaycastHit> {
        let up = Vec3::new(0.0, 1.0, 0.0);
        let mut best: Option<RaycastHit> = None;

        for step in (0..count).rev() {
            let origin = ray.origin + up * (spacing * step as f32);
            let offset_ray = Ray::new(origin, ray.direction);
            if let Some(hit) = self.raycast(&offset_ray, RaycastFilter::All, None, None, meshes) {
                if best.map_or(true, |b| hit.distance < b.distance) {
                    best = Some(hit);
                }
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::CollisionMeshTemplate;
    use crate::world::LightKind;
    use approx::assert_relative_eq;

    fn setup() -> (World, MeshCatalogue, crate::assets::MeshHandle) {
        let config = WorldConfig::default();
        let world = World::new(&config, EntityTypeRegistry::with_defaults());
        let mut meshes = MeshCatalogue::new();
        let cube = meshes.insert(CollisionMeshTemplate::cube(1.0));
        (world, meshes, cube)
    }

    #[test]
    fn test_world_to_cell_center_of_grid() {
        let (world, _, _) = setup();
        // Default grid: 8x4x8 chunks of 50 m, centered on the origin
        let coord = world.world_to_cell(Vec3::zeros()).unwrap();
        assert_eq!(coord, GridCoord::new(4, 2, 4));
    }

    #[test]
    fn test_world_to_cell_rejects_outside_points() {
        let (world, _, _) = setup();
        assert!(world.world_to_cell(Vec3::new(1000.0, 0.0, 0.0)).is_none());
        assert!(world.world_to_cell(Vec3::new(0.0, -150.0, 0.0)).is_none());
    }

    #[test]
    fn test_cell_origin_round_trip() {
        let (world, _, _) = setup();
        let coord = GridCoord::new(3, 1, 5);
        let origin = world.cell_origin(coord);

        // A point just inside the chunk's minimum corner maps back to it
        let inside = origin + Vec3::new(1.0, 1.0, 1.0);
        assert_eq!(world.world_to_cell(inside).unwrap(), coord);
    }

    #[test]
    fn test_spawn_assigns_single_chunk_membership() {
        let (mut world, meshes, _) = setup();
        let mut catalogue = meshes;
        let mesh = catalogue.insert(CollisionMeshTemplate::cube(1.5));

        // Bounds (1,1,1)..(4,4,4): inside one 50 m chunk
        let transform = Transform::from_position(Vec3::new(2.5, 2.5, 2.5));
        let handle = world
            .spawn(EntityKind::Prop, transform, Some(mesh), &catalogue)
            .unwrap();

        let entity = world.get(handle).unwrap();
        assert_relative_eq!(entity.bounds().min.x, 1.0);
        assert_relative_eq!(entity.bounds().max.x, 4.0);
        assert_eq!(entity.cells().len(), 1);
        assert_eq!(entity.cells()[0], GridCoord::new(4, 2, 4));

        let chunk = world.chunk_at(GridCoord::new(4, 2, 4)).unwrap();
        assert_eq!(chunk.visitors(), &[handle]);
    }

    #[test]
    fn test_membership_update_is_idempotent() {
        let (mut world, meshes, cube) = setup();
        let handle = world
            .spawn(EntityKind::Prop, Transform::identity(), Some(cube), &meshes)
            .unwrap();
        let cells_before = world.get(handle).unwrap().cells().to_vec();

        for _ in 0..2 {
            let update = world.update_entity_chunks(handle);
            assert_eq!(update.status, CellStatus::Ok);
            assert!(!update.changed);
        }
        assert_eq!(world.get(handle).unwrap().cells(), cells_before.as_slice());
    }

    #[test]
    fn test_moving_entity_re_homes_visitors() {
        let (mut world, meshes, cube) = setup();
        let handle = world
            .spawn(EntityKind::Prop, Transform::identity(), Some(cube), &meshes)
            .unwrap();
        let old_cell = world.get(handle).unwrap().cells()[0];

        // Move two chunks along +X
        let update = world.set_entity_transform(
            handle,
            Transform::from_position(Vec3::new(100.0, 0.0, 0.0)),
            &meshes,
        );
        assert_eq!(update.status, CellStatus::Ok);
        assert!(update.changed);

        let new_cell = world.get(handle).unwrap().cells()[0];
        assert_ne!(old_cell, new_cell);
        assert!(world.chunk_at(old_cell).unwrap().visitors().is_empty());
        assert_eq!(world.chunk_at(new_cell).unwrap().visitors(), &[handle]);
    }

    #[test]
    fn test_oversized_entity_rejected_without_mutation() {
        let (mut world, mut meshes, _) = setup();
        let big = meshes.insert(CollisionMeshTemplate::cube(75.0));

        let handle = world
            .spawn(EntityKind::Structure, Transform::identity(), Some(big), &meshes)
            .unwrap();

        // The 150 m cube spans 4x4x4 chunks: over the 20-chunk cap, so the
        // spawn-time placement already refused to record membership
        assert!(world.get(handle).unwrap().cells().is_empty());
        let update = world.update_entity_chunks(handle);
        assert_eq!(update.status, CellStatus::EntityTooBig);
        assert!(!update.changed);
    }

    #[test]
    fn test_out_of_bounds_keeps_previous_placement() {
        let (mut world, meshes, cube) = setup();
        let handle = world
            .spawn(EntityKind::Prop, Transform::identity(), Some(cube), &meshes)
            .unwrap();
        let cells_before = world.get(handle).unwrap().cells().to_vec();

        let update = world.set_entity_transform(
            handle,
            Transform::from_position(Vec3::new(199.5, 0.0, 0.0)),
            &meshes,
        );
        assert_eq!(update.status, CellStatus::OutOfBounds);
        assert!(!update.changed);
        assert_eq!(world.get(handle).unwrap().cells(), cells_before.as_slice());
    }

    #[test]
    fn test_closest_hit_independent_of_insertion_order() {
        for swap in [false, true] {
            let (mut world, meshes, cube) = setup();
            let near = Transform::from_position(Vec3::new(0.0, 0.0, 6.0));
            let far = Transform::from_position(Vec3::new(0.0, 0.0, 0.0));

            let (first, second) = if swap { (far.clone(), near.clone()) } else { (near.clone(), far.clone()) };
            let a = world
                .spawn(EntityKind::Prop, first, Some(cube), &meshes)
                .unwrap();
            let b = world
                .spawn(EntityKind::Prop, second, Some(cube), &meshes)
                .unwrap();

            let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
            let hit = world
                .raycast(&ray, RaycastFilter::All, None, None, &meshes)
                .unwrap();

            // The cube at z=6 presents its near face at z=7
            assert_relative_eq!(hit.distance, 3.0);
            let near_handle = if swap { b } else { a };
            assert_eq!(hit.entity, near_handle);
        }
    }

    #[test]
    fn test_raycast_skip_and_max_distance() {
        let (mut world, meshes, cube) = setup();
        let near = world
            .spawn(
                EntityKind::Prop,
                Transform::from_position(Vec3::new(0.0, 0.0, 6.0)),
                Some(cube),
                &meshes,
            )
            .unwrap();
        world
            .spawn(
                EntityKind::Prop,
                Transform::from_position(Vec3::new(0.0, 0.0, 0.0)),
                Some(cube),
                &meshes,
            )
            .unwrap();

        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));

        let near_id = world.get(near).unwrap().id();
        let hit = world
            .raycast(&ray, RaycastFilter::All, Some(near_id), None, &meshes)
            .unwrap();
        assert_relative_eq!(hit.distance, 9.0);

        // Both hits are at 3 and 9; a 2 m cap excludes them all
        assert!(world
            .raycast(&ray, RaycastFilter::All, None, Some(2.0), &meshes)
            .is_none());
    }

    #[test]
    fn test_visible_only_filter() {
        let (mut world, meshes, cube) = setup();
        let near = world
            .spawn(
                EntityKind::Prop,
                Transform::from_position(Vec3::new(0.0, 0.0, 6.0)),
                Some(cube),
                &meshes,
            )
            .unwrap();
        let far = world
            .spawn(
                EntityKind::Prop,
                Transform::from_position(Vec3::new(0.0, 0.0, 0.0)),
                Some(cube),
                &meshes,
            )
            .unwrap();

        if let Some(entity) = world.get_mut(near) {
            entity.flags.remove(EntityFlags::VISIBLE);
        }

        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = world
            .raycast(&ray, RaycastFilter::VisibleOnly, None, None, &meshes)
            .unwrap();
        assert_eq!(hit.entity, far);
    }

    #[test]
    fn test_box_miss_never_touches_collider() {
        let (mut world, meshes, cube) = setup();
        let handle = world
            .spawn(EntityKind::Prop, Transform::identity(), Some(cube), &meshes)
            .unwrap();

        // Desync the matrix from the collider without refreshing
        if let Some(entity) = world.get_mut(handle) {
            entity.set_transform(Transform::from_position(Vec3::new(10.0, 0.0, 0.0)));
        }

        // Misses the (stale) bounds at the origin: narrow phase must not run
        let miss = Ray::new(Vec3::new(50.0, 50.0, 50.0), Vec3::new(1.0, 0.0, 0.0));
        assert!(world
            .raycast(&miss, RaycastFilter::All, None, None, &meshes)
            .is_none());
        let stale_max = world.get(handle).unwrap().collider().unwrap().vertices()
            .iter()
            .map(|v| v.x)
            .fold(f32::MIN, f32::max);
        assert_relative_eq!(stale_max, 1.0);

        // A box hit refreshes the collider from the current matrix
        let through_origin = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        world.raycast(&through_origin, RaycastFilter::All, None, None, &meshes);
        let fresh_max = world.get(handle).unwrap().collider().unwrap().vertices()
            .iter()
            .map(|v| v.x)
            .fold(f32::MIN, f32::max);
        assert_relative_eq!(fresh_max, 11.0);
    }

    #[test]
    fn test_raycast_lights_reports_kind_and_index() {
        let (mut world, _, _) = setup();
        world.add_light(Light::spot(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            0.5,
            Vec3::new(1.0, 1.0, 1.0),
            1.0,
            20.0,
        ));
        let point = world.add_light(Light::point(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(1.0, 1.0, 1.0),
            1.0,
            10.0,
        ));

        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = world.raycast_lights(&ray).unwrap();

        assert_eq!(hit.index, point);
        assert_eq!(hit.kind, LightKind::Point);
        assert_relative_eq!(hit.distance, 4.5);
    }

    #[test]
    fn test_disabled_lights_are_skipped() {
        let (mut world, _, _) = setup();
        let mut light = Light::point(Vec3::new(0.0, 0.0, 5.0), Vec3::new(1.0, 1.0, 1.0), 1.0, 10.0);
        light.enabled = false;
        world.add_light(light);

        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        assert!(world.raycast_lights(&ray).is_none());
    }

    #[test]
    fn test_linear_array_prefers_closest_depth() {
        let (mut world, meshes, cube) = setup();
        // Lower surface at z=1, upper surface two meters higher at z=-1
        world
            .spawn(
                EntityKind::Structure,
                Transform::from_position(Vec3::new(0.0, 0.0, 0.0)),
                Some(cube),
                &meshes,
            )
            .unwrap();
        world
            .spawn(
                EntityKind::Structure,
                Transform::from_position(Vec3::new(0.0, 2.0, -2.0)),
                Some(cube),
                &meshes,
            )
            .unwrap();

        let base = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = world.linear_raycast_array(&base, 2, 2.0, &meshes).unwrap();

        // The bottom ray's surface is closer in depth
        assert_relative_eq!(hit.distance, 9.0);
    }

    #[test]
    fn test_linear_array_tie_prefers_highest_ray() {
        let (mut world, meshes, cube) = setup();
        // One tall wall: both rays strike the same plane at the same depth
        let tall = Transform {
            position: Vec3::new(0.0, 0.0, 0.0),
            rotation: crate::foundation::math::Quat::identity(),
            scale: Vec3::new(1.0, 4.0, 1.0),
        };
        world
            .spawn(EntityKind::Structure, tall, Some(cube), &meshes)
            .unwrap();

        let base = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
        let hit = world.linear_raycast_array(&base, 2, 2.0, &meshes).unwrap();

        assert_relative_eq!(hit.distance, 9.0);
        // The +Z face splits along its diagonal; the upper ray lands in the
        // second triangle, and the tie must keep that higher ray's hit
        assert_eq!(hit.triangle_index, 1);
    }

    #[test]
    fn test_entity_iterator_covers_all_chunks() {
        let (mut world, meshes, cube) = setup();
        world
            .spawn(
                EntityKind::Prop,
                Transform::from_position(Vec3::new(-100.0, 0.0, -100.0)),
                Some(cube),
                &meshes,
            )
            .unwrap();
        world
            .spawn(
                EntityKind::Prop,
                Transform::from_position(Vec3::new(120.0, 0.0, 80.0)),
                Some(cube),
                &meshes,
            )
            .unwrap();
        world
            .spawn(EntityKind::Pickup, Transform::identity(), Some(cube), &meshes)
            .unwrap();

        assert_eq!(world.entities().count(), 3);
        assert_eq!(world.entity_count(), 3);
        assert!(world.chunks().count() >= 3);
    }

    #[test]
    fn test_active_list_tracks_occupancy() {
        let (mut world, meshes, cube) = setup();
        assert_eq!(world.chunks().count(), 0);

        world
            .spawn(EntityKind::Prop, Transform::identity(), Some(cube), &meshes)
            .unwrap();
        assert!(world.chunks().count() >= 1);
    }
}
