//! Simulation context
//!
//! A single object owning the world, the mesh catalogue, and the validated
//! configuration, constructed once at startup and passed explicitly to the
//! call sites that need it. There are no global accessors; single-instance
//! semantics come from the host owning exactly one context.

use crate::assets::MeshCatalogue;
use crate::core::config::{ConfigError, WorldConfig};
use crate::entity::EntityTypeRegistry;
use crate::world::World;

/// Everything the simulation loop needs, constructed once at startup
pub struct SimulationContext {
    /// The validated configuration the world was built from
    pub config: WorldConfig,

    /// Shared static collision meshes
    pub meshes: MeshCatalogue,

    /// The chunk grid and every entity in it
    pub world: World,
}

impl SimulationContext {
    /// Create a context from a configuration
    ///
    /// Validates the configuration, builds the entity type registry, and
    /// allocates the chunk grid.
    pub fn new(config: WorldConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let registry = EntityTypeRegistry::with_defaults();
        let world = World::new(&config, registry);

        log::info!(
            "simulation context ready: {}x{}x{} chunks of {} m, {} byte arena each",
            config.grid_dims[0],
            config.grid_dims[1],
            config.grid_dims[2],
            config.chunk_size,
            config.chunk_arena_bytes,
        );

        Ok(Self {
            config,
            meshes: MeshCatalogue::new(),
            world,
        })
    }
}
