//! # World Engine
//!
//! The spatial backbone for a real-time 3D world: chunk-partitioned entity
//! storage with fixed per-chunk memory budgets, plus the closest-hit
//! ray-casting engine built on top of it.
//!
//! ## Features
//!
//! - **Chunk Storage**: per-chunk arenas carved into fixed-capacity typed
//!   blocks; entities are placed once and never move for the chunk's lifetime
//! - **Chunk Grid**: dense 3D grid of chunks with an active-chunk list and
//!   world-space to grid-coordinate mapping
//! - **Raycasting**: slab-method box tests, Möller–Trumbore triangle tests,
//!   closest-hit mesh walks, and world-level entity/light/ledge queries
//! - **Screen Picking**: screen-coordinate to world-space ray conversion for
//!   editor and gameplay picking
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use world_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut ctx = SimulationContext::new(WorldConfig::default())?;
//!
//!     let mesh = ctx.meshes.insert(CollisionMeshTemplate::cube(1.0));
//!     let spawn = Transform::from_position(Vec3::new(0.0, 0.0, 0.0));
//!     let handle = ctx.world.spawn(EntityKind::Prop, spawn, Some(mesh), &ctx.meshes)?;
//!
//!     let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::new(0.0, 0.0, -1.0));
//!     if let Some(hit) = ctx.world.raycast(&ray, RaycastFilter::All, None, None, &ctx.meshes) {
//!         println!("hit {:?} at distance {}", hit.entity, hit.distance);
//!     }
//!     let _ = handle;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod core;
pub mod entity;
pub mod foundation;
pub mod physics;
pub mod world;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{CollisionMeshTemplate, MeshCatalogue, MeshHandle},
        core::{
            config::{Config, WorldConfig},
            context::SimulationContext,
        },
        entity::{Entity, EntityFlags, EntityHandle, EntityId, EntityKind, EntityTypeRegistry},
        foundation::math::{Mat4, Transform, Vec3},
        physics::{
            cast_pickray,
            collision::{Aabb, Ray, Triangle},
            LightHit, RaycastFilter, RaycastHit,
        },
        world::{CellStatus, CellUpdate, GridCoord, Light, LightKind, World, WorldChunk},
    };
}
