//! Store Module
//!
//! Fixed-block storage: one arena split into equal blocks, with the
//! allocation bitmap hosted inside the arena itself.
//!
//! ## Responsibilities
//! - Block lifecycle (allocate / request / release)
//! - Raw block reads and writes
//! - Whole-store persistence as a flat image
//!
//! ## Image Format
//! ```text
//! ┌──────────┬──────────┬─────┬─────────────────────┬─────┬──────────────┐
//! │ Block 0  │ Block 1  │ ... │ Bitmap region       │ ... │ Block N-1    │
//! │          │          │     │ (bitmap_start_block │     │              │
//! │          │          │     │  .. +bitmap_blocks) │     │              │
//! └──────────┴──────────┴─────┴─────────────────────┴─────┴──────────────┘
//!  offset of block i = i * block_size, total = N * block_size bytes
//! ```
//! No header, magic or version: the geometry in
//! [`StoreConfig`](crate::config::StoreConfig) must match between writer and
//! reader.

mod block_store;
mod persist;

pub use block_store::BlockStore;

/// Index of a block inside one store
pub type BlockId = usize;
