//! Chunk-partitioned world storage
//!
//! Space is divided into a fixed grid of chunks; each chunk owns an arena
//! that provides contiguous, budgeted storage for the entities living in
//! it. The world maps coordinates onto the grid, re-homes entities as they
//! move, and composes the per-chunk iterators and raycast queries.

mod chunk;
mod light;
mod storage;
#[allow(clippy::module_inception)]
mod world;

pub use chunk::{GridCoord, WorldChunk};
pub use light::{Light, LightKind};
pub use storage::{BlockDescriptor, ChunkStorage, StorageError};
pub use world::{CellStatus, CellUpdate, World, WorldError};
