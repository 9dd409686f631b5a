//! Tests for StoreConfig
//!
//! These tests verify:
//! - Defaults and derived sizes
//! - Builder overrides
//! - Geometry validation (and that create refuses bad geometry)

use blockstore::config::{DEFAULT_BITMAP_START_BLOCK, DEFAULT_BLOCK_SIZE, DEFAULT_TOTAL_BLOCKS};
use blockstore::{BlockStore, BlockStoreError, StoreConfig};

// =============================================================================
// Defaults and Derived Values
// =============================================================================

#[test]
fn test_default_geometry() {
    let config = StoreConfig::default();

    assert_eq!(config.block_size, DEFAULT_BLOCK_SIZE);
    assert_eq!(config.total_blocks, DEFAULT_TOTAL_BLOCKS);
    assert_eq!(config.bitmap_start_block, DEFAULT_BITMAP_START_BLOCK);
    assert!(config.validate().is_ok());
}

#[test]
fn test_derived_sizes() {
    let config = StoreConfig::builder()
        .block_size(16)
        .total_blocks(256)
        .bitmap_start_block(0)
        .build();

    assert_eq!(config.bitmap_bytes(), 32);
    assert_eq!(config.bitmap_blocks(), 2);
    assert_eq!(config.arena_size(), 4096);
}

#[test]
fn test_bitmap_blocks_rounds_up() {
    let config = StoreConfig::builder()
        .block_size(64)
        .total_blocks(1000)
        .bitmap_start_block(0)
        .build();

    // 1000 bits = 125 bytes = 2 blocks of 64
    assert_eq!(config.bitmap_bytes(), 125);
    assert_eq!(config.bitmap_blocks(), 2);
}

#[test]
fn test_builder_overrides() {
    let config = StoreConfig::builder()
        .block_size(512)
        .total_blocks(8192)
        .bitmap_start_block(10)
        .build();

    assert_eq!(config.block_size, 512);
    assert_eq!(config.total_blocks, 8192);
    assert_eq!(config.bitmap_start_block, 10);
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_validate_rejects_zero_block_size() {
    let config = StoreConfig::builder().block_size(0).build();

    assert!(matches!(config.validate(), Err(BlockStoreError::Config(_))));
}

#[test]
fn test_validate_rejects_zero_blocks() {
    let config = StoreConfig::builder()
        .total_blocks(0)
        .bitmap_start_block(0)
        .build();

    assert!(matches!(config.validate(), Err(BlockStoreError::Config(_))));
}

#[test]
fn test_validate_rejects_bitmap_past_end() {
    let config = StoreConfig::builder()
        .block_size(16)
        .total_blocks(256)
        .bitmap_start_block(255) // needs 2 blocks
        .build();

    assert!(matches!(config.validate(), Err(BlockStoreError::Config(_))));
}

#[test]
fn test_validate_accepts_bitmap_at_last_block() {
    let config = StoreConfig::builder()
        .block_size(32)
        .total_blocks(256)
        .bitmap_start_block(255)
        .build();

    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_rejects_overflowing_arena() {
    let config = StoreConfig::builder()
        .block_size(usize::MAX)
        .total_blocks(2)
        .bitmap_start_block(0)
        .build();

    assert!(matches!(config.validate(), Err(BlockStoreError::Config(_))));
}

#[test]
fn test_create_refuses_invalid_geometry() {
    let config = StoreConfig::builder()
        .total_blocks(64)
        .bitmap_start_block(64)
        .build();

    let result = BlockStore::create(config);

    assert!(matches!(result, Err(BlockStoreError::Config(_))));
}
