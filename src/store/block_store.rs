//! Block Store
//!
//! Arena ownership, the allocation protocol and raw block I/O.

use std::ops::Range;

use tracing::{debug, trace, warn};

use crate::bitmap::Bitmap;
use crate::config::StoreConfig;
use crate::error::{BlockStoreError, Result};

use super::BlockId;

/// A fixed-block store
///
/// ## Ownership
/// The store owns exactly one buffer, the arena. The allocation index is not
/// stored separately: [`index`](Self::index) and `index_mut` build a
/// [`Bitmap`] view over the reserved byte range of the arena on demand, so
/// the view can never outlive the arena or be freed on its own.
///
/// ## Access Model
/// Single-threaded. Mutations take `&mut self`; callers that share a store
/// across threads wrap it in their own lock.
#[derive(Debug)]
pub struct BlockStore {
    /// Store geometry (validated)
    pub(super) config: StoreConfig,

    /// All stored bytes, `total_blocks * block_size` long
    pub(super) arena: Vec<u8>,

    /// Byte offset of the bitmap region inside the arena
    bitmap_offset: usize,
}

impl BlockStore {
    /// Create an empty store
    ///
    /// Steps:
    /// 1. Validate the geometry
    /// 2. Allocate and zero the arena
    /// 3. Mark every block of the bitmap region as occupied
    pub fn create(config: StoreConfig) -> Result<Self> {
        config.validate()?;

        let arena_size = config.arena_size();
        let mut arena = Vec::new();
        arena
            .try_reserve_exact(arena_size)
            .map_err(|e| BlockStoreError::Allocation(e.to_string()))?;
        arena.resize(arena_size, 0);

        let mut store = Self {
            config,
            arena,
            bitmap_offset: config.bitmap_start_block * config.block_size,
        };

        // On failure `store` is dropped here, before the error leaves
        for block_id in store.reserved_blocks() {
            store.request(block_id).map_err(|e| {
                BlockStoreError::Config(format!(
                    "cannot reserve bitmap block {}: {}",
                    block_id, e
                ))
            })?;
        }

        debug!(
            block_size = config.block_size,
            total_blocks = config.total_blocks,
            reserved = ?store.reserved_blocks(),
            "created block store"
        );

        Ok(store)
    }

    /// Create a store with the default geometry
    pub fn with_defaults() -> Result<Self> {
        Self::create(StoreConfig::default())
    }

    /// Tear the store down, releasing the arena
    ///
    /// Equivalent to dropping it.
    pub fn destroy(self) {
        drop(self);
    }

    // =========================================================================
    // Allocation Protocol
    // =========================================================================

    /// Claim a specific block
    ///
    /// Fails if the block is out of range or already occupied. The bit is
    /// re-read after setting it and the claim fails if it did not stick.
    pub fn request(&mut self, block_id: BlockId) -> Result<()> {
        self.check_range(block_id)?;

        let mut index = self.index_mut();
        if index.test(block_id) {
            return Err(BlockStoreError::BlockInUse(block_id));
        }

        index.set(block_id);
        if !index.test(block_id) {
            return Err(BlockStoreError::BitmapVerify(block_id));
        }

        Ok(())
    }

    /// Claim the lowest-numbered free block (first fit)
    pub fn allocate(&mut self) -> Result<BlockId> {
        let block_id = self
            .index()
            .find_first_zero()
            .ok_or(BlockStoreError::NoSpace)?;

        self.request(block_id)?;
        trace!(block_id, "allocated block");

        Ok(block_id)
    }

    /// Mark a block free again
    ///
    /// Best effort: out-of-range ids are ignored, and so are blocks of the
    /// bitmap region (freeing those would only corrupt the index). The block's
    /// bytes are left as they are.
    pub fn release(&mut self, block_id: BlockId) {
        if block_id >= self.config.total_blocks {
            return;
        }
        if self.reserved_blocks().contains(&block_id) {
            warn!(block_id, "refusing to release a bitmap block");
            return;
        }

        self.index_mut().reset(block_id);
        trace!(block_id, "released block");
    }

    // =========================================================================
    // Raw Block I/O
    // =========================================================================

    /// Copy one block into `out`
    ///
    /// `out` must hold at least `block_size` bytes; only the first
    /// `block_size` are written. Occupancy is not checked.
    pub fn read(&self, block_id: BlockId, out: &mut [u8]) -> Result<usize> {
        let block_size = self.config.block_size;
        check_buffer(block_size, out.len())?;

        out[..block_size].copy_from_slice(self.block(block_id)?);
        Ok(block_size)
    }

    /// Overwrite one block with the first `block_size` bytes of `data`
    ///
    /// Occupancy is neither checked nor changed.
    pub fn write(&mut self, block_id: BlockId, data: &[u8]) -> Result<usize> {
        let block_size = self.config.block_size;
        check_buffer(block_size, data.len())?;

        let range = self.block_range(block_id)?;
        self.arena[range].copy_from_slice(&data[..block_size]);
        Ok(block_size)
    }

    /// Borrow a block's bytes without copying
    pub fn block(&self, block_id: BlockId) -> Result<&[u8]> {
        let range = self.block_range(block_id)?;
        Ok(&self.arena[range])
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Number of occupied blocks, bitmap region included
    pub fn used_blocks(&self) -> usize {
        self.index().count_set()
    }

    /// Number of free blocks
    pub fn free_blocks(&self) -> usize {
        self.config.total_blocks - self.used_blocks()
    }

    /// Number of blocks in the store
    pub fn total_blocks(&self) -> usize {
        self.config.total_blocks
    }

    /// Size of a block in bytes
    pub fn block_size(&self) -> usize {
        self.config.block_size
    }

    /// Whether a block is marked occupied (false when out of range)
    pub fn is_allocated(&self, block_id: BlockId) -> bool {
        self.index().test(block_id)
    }

    /// Block ids that host the allocation bitmap
    pub fn reserved_blocks(&self) -> Range<BlockId> {
        let start = self.config.bitmap_start_block;
        start..start + self.config.bitmap_blocks()
    }

    /// Read-only view of the allocation index
    pub fn index(&self) -> Bitmap<&[u8]> {
        let range = self.bitmap_range();
        Bitmap::from_parts(self.config.total_blocks, &self.arena[range])
    }

    /// CRC32 over the whole arena
    pub fn checksum(&self) -> u32 {
        crc32fast::hash(&self.arena)
    }

    /// Get the store geometry
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn index_mut(&mut self) -> Bitmap<&mut [u8]> {
        let range = self.bitmap_range();
        Bitmap::from_parts(self.config.total_blocks, &mut self.arena[range])
    }

    fn bitmap_range(&self) -> Range<usize> {
        self.bitmap_offset..self.bitmap_offset + self.config.bitmap_bytes()
    }

    fn check_range(&self, block_id: BlockId) -> Result<()> {
        if block_id >= self.config.total_blocks {
            return Err(BlockStoreError::BlockOutOfRange {
                block_id,
                total_blocks: self.config.total_blocks,
            });
        }
        Ok(())
    }

    /// Byte range of a block inside the arena
    fn block_range(&self, block_id: BlockId) -> Result<Range<usize>> {
        self.check_range(block_id)?;
        let start = block_id * self.config.block_size;
        Ok(start..start + self.config.block_size)
    }

    /// Set any bitmap-region bit that is clear; returns how many were set
    pub(super) fn mark_reserved_blocks(&mut self) -> usize {
        let reserved = self.reserved_blocks();
        let mut index = self.index_mut();
        reserved
            .filter(|&block_id| {
                if index.test(block_id) {
                    return false;
                }
                index.set(block_id);
                true
            })
            .count()
    }
}

fn check_buffer(needed: usize, actual: usize) -> Result<()> {
    if actual < needed {
        return Err(BlockStoreError::BufferTooSmall { needed, actual });
    }
    Ok(())
}
