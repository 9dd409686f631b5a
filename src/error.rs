//! Error types for the block store
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

use crate::store::BlockId;

/// Result type alias using BlockStoreError
pub type Result<T> = std::result::Result<T, BlockStoreError>;

/// Unified error type for block store operations
#[derive(Debug, Error)]
pub enum BlockStoreError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    // -------------------------------------------------------------------------
    // Argument Errors
    // -------------------------------------------------------------------------
    #[error("Block {block_id} out of range (total blocks: {total_blocks})")]
    BlockOutOfRange { block_id: BlockId, total_blocks: usize },

    #[error("Buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    // -------------------------------------------------------------------------
    // Allocation Errors
    // -------------------------------------------------------------------------
    #[error("Block {0} is already allocated")]
    BlockInUse(BlockId),

    #[error("No free blocks left")]
    NoSpace,

    #[error("Allocation bit for block {0} did not latch")]
    BitmapVerify(BlockId),

    #[error("Bitmap overlay needs {needed} bytes, only {available} available")]
    BitmapOverlay { needed: usize, available: usize },

    #[error("Arena allocation failed: {0}")]
    Allocation(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
