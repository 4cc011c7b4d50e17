//! Entity type registry
//!
//! Replaces static-initialization type registration with a table built
//! explicitly at startup: one entry per kind carrying the fixed per-chunk
//! instance budget, the instance byte size used for arena accounting, and
//! the capability set that drives query filtering.

use super::entity::Entity;
use super::kind::EntityKind;

bitflags::bitflags! {
    /// Capability set replacing the original trait-mixin tables
    ///
    /// Queries test capabilities instead of downcasting; dispatch stays a
    /// table lookup keyed by [`EntityKind`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Capabilities: u32 {
        /// Participates in ray/collision tests
        const COLLIDABLE = 1 << 0;
        /// Selectable by editor and gameplay picking
        const PICKABLE = 1 << 1;
        /// Drawn by the renderer (the renderer itself lives elsewhere)
        const RENDERABLE = 1 << 2;
        /// Never moves after placement
        const STATIC = 1 << 3;
    }
}

/// Per-kind storage and capability metadata
#[derive(Debug, Clone, Copy)]
pub struct EntityTypeInfo {
    /// The kind this entry describes
    pub kind: EntityKind,
    /// Maximum instances of this kind per chunk
    pub budget_per_chunk: usize,
    /// Byte size of one instance, used for arena block accounting
    pub instance_size: usize,
    /// What this kind can do
    pub capabilities: Capabilities,
}

impl EntityTypeInfo {
    /// Bytes one chunk must reserve for this kind's full block
    pub fn block_bytes(&self) -> usize {
        self.budget_per_chunk * self.instance_size
    }
}

/// Startup-built lookup table of entity type metadata
#[derive(Debug, Clone)]
pub struct EntityTypeRegistry {
    infos: [EntityTypeInfo; EntityKind::COUNT],
}

impl EntityTypeRegistry {
    /// Build the registry with the stock budgets and capabilities
    pub fn with_defaults() -> Self {
        let entry = |kind, budget_per_chunk, capabilities| EntityTypeInfo {
            kind,
            budget_per_chunk,
            instance_size: std::mem::size_of::<Entity>(),
            capabilities,
        };

        Self {
            infos: [
                entry(
                    EntityKind::Prop,
                    64,
                    Capabilities::COLLIDABLE | Capabilities::PICKABLE | Capabilities::RENDERABLE,
                ),
                entry(
                    EntityKind::Structure,
                    32,
                    Capabilities::COLLIDABLE
                        | Capabilities::PICKABLE
                        | Capabilities::RENDERABLE
                        | Capabilities::STATIC,
                ),
                entry(
                    EntityKind::Pickup,
                    32,
                    Capabilities::COLLIDABLE | Capabilities::PICKABLE | Capabilities::RENDERABLE,
                ),
                entry(EntityKind::Trigger, 16, Capabilities::COLLIDABLE | Capabilities::STATIC),
                entry(EntityKind::LightProxy, 16, Capabilities::PICKABLE),
            ],
        }
    }

    /// Metadata for a kind
    pub fn info(&self, kind: EntityKind) -> &EntityTypeInfo {
        &self.infos[kind.index()]
    }

    /// Per-chunk instance budget for a kind
    pub fn budget(&self, kind: EntityKind) -> usize {
        self.info(kind).budget_per_chunk
    }

    /// Whether a kind carries a capability
    pub fn has_capability(&self, kind: EntityKind, capability: Capabilities) -> bool {
        self.info(kind).capabilities.contains(capability)
    }

    /// All entries in declaration order
    pub fn entries(&self) -> &[EntityTypeInfo] {
        &self.infos
    }
}
