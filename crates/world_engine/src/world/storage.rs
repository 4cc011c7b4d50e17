//! Per-chunk storage arena
//!
//! One chunk owns one arena: a fixed byte budget carved lazily into
//! per-kind blocks. A block's capacity is reserved in full when it is
//! carved and never grows, so an entity's address is stable from placement
//! until the whole chunk is torn down. Entities are never freed
//! individually.

use crate::entity::{Entity, EntityKind, EntityTypeRegistry};

/// Storage failures
///
/// Arena exhaustion means the static budgets cannot fit the configured
/// kinds at all: a content or configuration bug that cannot be resolved
/// at runtime. A full block is the expected "no room" answer for a chunk
/// that has reached one kind's budget; callers must not retry it in a
/// loop.
#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    /// The arena cannot carve a block for the kind
    #[error(
        "chunk {chunk}: arena exhausted carving a {kind} block ({needed} bytes needed, {remaining} of {budget} remain)"
    )]
    ArenaExhausted {
        /// Owning chunk id
        chunk: u64,
        /// Kind whose block could not be carved
        kind: &'static str,
        /// Bytes the block would occupy
        needed: usize,
        /// Bytes left in the arena
        remaining: usize,
        /// Total arena budget
        budget: usize,
    },

    /// The kind's block is at its instance budget
    #[error("chunk {chunk}: {kind} block is full ({capacity} instances)")]
    BlockFull {
        /// Owning chunk id
        chunk: u64,
        /// Kind whose block is full
        kind: &'static str,
        /// The block's instance budget
        capacity: usize,
    },
}

/// Metadata describing one carved block
#[derive(Debug, Clone, Copy)]
pub struct BlockDescriptor {
    /// Kind stored in the block
    pub kind: EntityKind,
    /// Byte size of one instance
    pub instance_size: usize,
    /// Maximum instances the block holds
    pub capacity: usize,
    /// Live instances in the block
    pub len: usize,
    /// Byte offset of the block's start within the arena budget
    pub byte_offset: usize,
}

struct Block {
    kind: EntityKind,
    instance_size: usize,
    capacity: usize,
    byte_offset: usize,
    entities: Vec<Entity>,
}

/// Fixed-budget arena of per-kind entity blocks
pub struct ChunkStorage {
    budget_bytes: usize,
    cursor: usize,
    blocks: Vec<Block>,
}

impl ChunkStorage {
    /// Create an arena with a byte budget; nothing is allocated until the
    /// first request for a kind
    pub fn new(budget_bytes: usize) -> Self {
        Self {
            budget_bytes,
            cursor: 0,
            blocks: Vec::new(),
        }
    }

    /// Place an entity, carving the kind's block on first use
    ///
    /// Returns the slot index within the kind's block. O(1) once the block
    /// exists. The backing store reserves its full capacity when carved and
    /// never reallocates, so previously returned slots keep their address.
    pub fn allocate(
        &mut self,
        chunk_id: u64,
        registry: &EntityTypeRegistry,
        entity: Entity,
    ) -> Result<usize, StorageError> {
        let kind = entity.kind();
        let existing = self.blocks.iter().position(|b| b.kind == kind);
        let block_index = match existing {
            Some(index) => index,
            None => self.carve_block(chunk_id, kind, registry)?,
        };

        let block = &mut self.blocks[block_index];
        if block.entities.len() == block.capacity {
            log::warn!(
                "chunk {}: no room for another {} ({} instance budget reached)",
                chunk_id,
                kind.name(),
                block.capacity
            );
            return Err(StorageError::BlockFull {
                chunk: chunk_id,
                kind: kind.name(),
                capacity: block.capacity,
            });
        }

        let slot = block.entities.len();
        block.entities.push(entity);
        Ok(slot)
    }

    fn carve_block(
        &mut self,
        chunk_id: u64,
        kind: EntityKind,
        registry: &EntityTypeRegistry,
    ) -> Result<usize, StorageError> {
        let info = registry.info(kind);
        let needed = info.block_bytes();
        let remaining = self.budget_bytes - self.cursor;

        if needed > remaining {
            log::error!(
                "chunk {}: arena exhausted carving a {} block ({} bytes needed, {} remain); \
                 fixed budgets cannot be resized at runtime",
                chunk_id,
                kind.name(),
                needed,
                remaining
            );
            return Err(StorageError::ArenaExhausted {
                chunk: chunk_id,
                kind: kind.name(),
                needed,
                remaining,
                budget: self.budget_bytes,
            });
        }

        let byte_offset = self.cursor;
        self.cursor += needed;
        self.blocks.push(Block {
            kind,
            instance_size: info.instance_size,
            capacity: info.budget_per_chunk,
            byte_offset,
            entities: Vec::with_capacity(info.budget_per_chunk),
        });
        Ok(self.blocks.len() - 1)
    }

    /// Look up an entity by kind and slot
    pub fn get(&self, kind: EntityKind, slot: usize) -> Option<&Entity> {
        self.blocks
            .iter()
            .find(|b| b.kind == kind)?
            .entities
            .get(slot)
    }

    /// Mutable lookup by kind and slot
    pub fn get_mut(&mut self, kind: EntityKind, slot: usize) -> Option<&mut Entity> {
        self.blocks
            .iter_mut()
            .find(|b| b.kind == kind)?
            .entities
            .get_mut(slot)
    }

    /// Number of carved blocks
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Descriptor of the block at the given declaration index
    pub fn block(&self, index: usize) -> Option<BlockDescriptor> {
        self.blocks.get(index).map(|b| BlockDescriptor {
            kind: b.kind,
            instance_size: b.instance_size,
            capacity: b.capacity,
            len: b.entities.len(),
            byte_offset: b.byte_offset,
        })
    }

    /// Mutable access by block declaration index and slot
    pub(crate) fn entry_mut(&mut self, block: usize, slot: usize) -> Option<&mut Entity> {
        self.blocks.get_mut(block)?.entities.get_mut(slot)
    }

    /// Total live entities across all blocks
    pub fn len(&self) -> usize {
        self.blocks.iter().map(|b| b.entities.len()).sum()
    }

    /// Whether the arena holds no entities
    pub fn is_empty(&self) -> bool {
        self.blocks.iter().all(|b| b.entities.is_empty())
    }

    /// Bytes carved so far
    pub fn bytes_used(&self) -> usize {
        self.cursor
    }

    /// The arena's fixed byte budget
    pub fn bytes_budget(&self) -> usize {
        self.budget_bytes
    }

    /// Walk every entity: blocks in declaration order, slots in allocation
    /// order
    ///
    /// A finite, single-pass sequence; it reflects the arena at the moment
    /// of the call and is not restartable.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.blocks.iter().flat_map(|b| b.entities.iter())
    }
}
