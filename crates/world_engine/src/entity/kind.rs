//! Entity kind enumeration

/// The closed set of entity types the world can store
///
/// Each kind maps to one storage block per chunk; budgets and capabilities
/// come from the [`EntityTypeRegistry`](super::EntityTypeRegistry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// Movable scenery with a collision mesh
    Prop,
    /// Large static geometry (walls, floors, platforms)
    Structure,
    /// Small collectible items
    Pickup,
    /// Invisible gameplay volumes
    Trigger,
    /// Pickable stand-in for a light source in the editor
    LightProxy,
}

impl EntityKind {
    /// Every kind, in registry declaration order
    pub const ALL: [Self; 5] = [
        Self::Prop,
        Self::Structure,
        Self::Pickup,
        Self::Trigger,
        Self::LightProxy,
    ];

    /// Number of kinds in the closed set
    pub const COUNT: usize = Self::ALL.len();

    /// Dense index used by the registry table
    pub fn index(self) -> usize {
        match self {
            Self::Prop => 0,
            Self::Structure => 1,
            Self::Pickup => 2,
            Self::Trigger => 3,
            Self::LightProxy => 4,
        }
    }

    /// Display name for diagnostics
    pub fn name(self) -> &'static str {
        match self {
            Self::Prop => "prop",
            Self::Structure => "structure",
            Self::Pickup => "pickup",
            Self::Trigger => "trigger",
            Self::LightProxy => "light-proxy",
        }
    }
}
