//! # blockstore
//!
//! A fixed-block storage engine with:
//! - One contiguous arena split into equal-size blocks
//! - An allocation bitmap hosted inside the arena itself
//! - First-fit allocation plus explicit claim/release of block ids
//! - Whole-store persistence as a flat, headerless image
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        BlockStore                            │
//! │      allocate / request / release / read / write            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ owns
//!                       ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Arena: [blk 0][blk 1] ... [bitmap region] ... [blk N-1]    │
//! └──────────────────────────────────┬──────────────────────────┘
//!                                    │ borrowed view
//!                                    ▼
//!                            ┌──────────────┐
//!                            │    Bitmap    │
//!                            │ (alloc index)│
//!                            └──────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use blockstore::{BlockStore, StoreConfig};
//!
//! let mut store = BlockStore::create(StoreConfig::default()).unwrap();
//! let id = store.allocate().unwrap();
//! let data = vec![7u8; store.block_size()];
//! store.write(id, &data).unwrap();
//!
//! let image = store.to_bytes();
//! let restored = BlockStore::from_bytes(image, *store.config()).unwrap();
//! assert!(restored.is_allocated(id));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod bitmap;
pub mod store;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{BlockStoreError, Result};
pub use config::StoreConfig;
pub use bitmap::Bitmap;
pub use store::{BlockId, BlockStore};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of blockstore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
