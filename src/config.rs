//! Configuration for the block store
//!
//! Store geometry with sensible defaults. The geometry is not recorded in the
//! image itself, so a writer and a reader must agree on every field here.

use crate::error::{BlockStoreError, Result};

/// Default size of a single block in bytes
pub const DEFAULT_BLOCK_SIZE: usize = 32;

/// Default number of blocks in a store
pub const DEFAULT_TOTAL_BLOCKS: usize = 256;

/// Default first block of the reserved bitmap region
pub const DEFAULT_BITMAP_START_BLOCK: usize = 127;

/// Geometry of a block store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    // -------------------------------------------------------------------------
    // Block Geometry
    // -------------------------------------------------------------------------
    /// Size of every block in bytes
    pub block_size: usize,

    /// Number of blocks in the arena
    pub total_blocks: usize,

    // -------------------------------------------------------------------------
    // Allocation Index Placement
    // -------------------------------------------------------------------------
    /// First block of the region holding the allocation bitmap
    pub bitmap_start_block: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            total_blocks: DEFAULT_TOTAL_BLOCKS,
            bitmap_start_block: DEFAULT_BITMAP_START_BLOCK,
        }
    }
}

impl StoreConfig {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Bytes needed to hold one bit per block
    pub fn bitmap_bytes(&self) -> usize {
        self.total_blocks.div_ceil(8)
    }

    /// Number of blocks spanned by the reserved bitmap region
    pub fn bitmap_blocks(&self) -> usize {
        if self.block_size == 0 {
            return 0;
        }
        self.bitmap_bytes().div_ceil(self.block_size)
    }

    /// Total arena size in bytes (`total_blocks * block_size`)
    ///
    /// Only meaningful once [`validate`](Self::validate) has passed.
    pub fn arena_size(&self) -> usize {
        self.total_blocks.saturating_mul(self.block_size)
    }

    /// Check that the geometry describes a usable store
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(BlockStoreError::Config(
                "block size must be non-zero".to_string(),
            ));
        }
        if self.total_blocks == 0 {
            return Err(BlockStoreError::Config(
                "total blocks must be non-zero".to_string(),
            ));
        }
        if self.total_blocks.checked_mul(self.block_size).is_none() {
            return Err(BlockStoreError::Config(format!(
                "arena of {} blocks x {} bytes overflows",
                self.total_blocks, self.block_size
            )));
        }

        let bitmap_end = self
            .bitmap_start_block
            .checked_add(self.bitmap_blocks())
            .ok_or_else(|| BlockStoreError::Config("bitmap region overflows".to_string()))?;
        if bitmap_end > self.total_blocks {
            return Err(BlockStoreError::Config(format!(
                "bitmap region [{}, {}) does not fit in {} blocks",
                self.bitmap_start_block, bitmap_end, self.total_blocks
            )));
        }

        Ok(())
    }
}

/// Builder for StoreConfig
#[derive(Default)]
pub struct ConfigBuilder {
    config: StoreConfig,
}

impl ConfigBuilder {
    /// Set the block size (in bytes)
    pub fn block_size(mut self, size: usize) -> Self {
        self.config.block_size = size;
        self
    }

    /// Set the number of blocks
    pub fn total_blocks(mut self, count: usize) -> Self {
        self.config.total_blocks = count;
        self
    }

    /// Set the first block of the reserved bitmap region
    pub fn bitmap_start_block(mut self, block: usize) -> Self {
        self.config.bitmap_start_block = block;
        self
    }

    pub fn build(self) -> StoreConfig {
        self.config
    }
}
