//! Store Persistence
//!
//! Writes the arena out as a flat image and loads it back.
//!
//! The allocation bitmap lives inside the arena, so it travels with the
//! image. On load the embedded bitmap is taken as the allocation index
//! verbatim; block contents are never inspected to guess occupancy.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;

use bytes::{Buf, Bytes};
use tracing::{debug, warn};

use crate::config::StoreConfig;
use crate::error::{BlockStoreError, Result};

use super::BlockStore;

impl BlockStore {
    // =========================================================================
    // Serialize
    // =========================================================================

    /// Write the full image to a file
    ///
    /// Creates the file if needed and truncates it otherwise. Returns the
    /// number of bytes written.
    pub fn serialize(&self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let mut writer = BufWriter::new(file);
        let written = self.serialize_to(&mut writer)?;

        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;

        debug!(path = %path.display(), bytes = written, "serialized block store");
        Ok(written)
    }

    /// Write the full image to any writer
    pub fn serialize_to<W: Write + ?Sized>(&self, writer: &mut W) -> Result<usize> {
        writer.write_all(&self.arena)?;
        writer.flush()?;
        Ok(self.arena.len())
    }

    /// Copy the full image into a byte buffer
    pub fn to_bytes(&self) -> Bytes {
        Bytes::copy_from_slice(&self.arena)
    }

    // =========================================================================
    // Deserialize
    // =========================================================================

    /// Load a store from an image file
    ///
    /// Bytes past the expected image size are ignored.
    pub fn deserialize(path: impl AsRef<Path>, config: StoreConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        let file_len = file.metadata()?.len();

        let mut reader = BufReader::new(file);
        let store = Self::deserialize_from(&mut reader, config)?;

        let image_len = store.arena.len() as u64;
        if file_len > image_len {
            warn!(
                path = %path.display(),
                trailing = file_len - image_len,
                "ignoring trailing bytes after image"
            );
        }

        debug!(path = %path.display(), used = store.used_blocks(), "deserialized block store");
        Ok(store)
    }

    /// Load a store from any reader
    ///
    /// Steps:
    /// 1. Create a fresh store with `config`
    /// 2. Fill its arena from `reader`; fail on a short image
    /// 3. Re-mark bitmap blocks the image left clear
    pub fn deserialize_from<R: Read + ?Sized>(reader: &mut R, config: StoreConfig) -> Result<Self> {
        let mut store = Self::create(config)?;
        let expected = store.arena.len();

        let mut filled = 0;
        while filled < expected {
            match reader.read(&mut store.arena[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        if filled < expected {
            return Err(BlockStoreError::Truncated {
                expected,
                actual: filled,
            });
        }

        let remarked = store.mark_reserved_blocks();
        if remarked > 0 {
            warn!(remarked, "image left bitmap blocks unmarked, re-marked them");
        }

        Ok(store)
    }

    /// Load a store from an in-memory image
    pub fn from_bytes<B: Buf>(data: B, config: StoreConfig) -> Result<Self> {
        Self::deserialize_from(&mut data.reader(), config)
    }
}
