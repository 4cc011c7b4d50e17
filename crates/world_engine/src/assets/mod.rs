//! Asset management for shared collision geometry
//!
//! Static collision meshes are loaded once and shared between every entity
//! that references them; entities hold handles, never copies.

mod mesh_catalogue;

pub use crate::physics::collision::CollisionMeshTemplate;
pub use mesh_catalogue::{MeshCatalogue, MeshHandle};
