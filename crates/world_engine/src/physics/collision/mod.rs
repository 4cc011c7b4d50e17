//! Collision geometry and intersection algorithms
//!
//! # Architecture
//!
//! - **Model Space Storage**: static collision meshes are stored in local
//!   coordinates and shared through the asset catalogue
//! - **In-Place Refresh**: each entity's dynamic collider is a world-space
//!   vertex buffer overwritten from its template on every update
//! - **Closest Hit**: every mesh-level test returns the minimum-distance
//!   intersection along the ray
//!
//! # Key Types
//!
//! - [`Ray`], [`Aabb`], [`Triangle`] - Primitive geometric types
//! - [`CollisionMeshTemplate`] - Shared model-space mesh
//! - [`Collider`] - Per-entity world-space mesh instance

pub mod mesh;
pub mod primitives;

pub use mesh::{Collider, CollisionMeshTemplate, MeshHit};
pub use primitives::{Aabb, Ray, Triangle};
