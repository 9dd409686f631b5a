//! Bitmap Module
//!
//! Fixed-length bit vector used as the allocation index.
//!
//! ## Bit Layout
//! ```text
//! byte:    0                 1
//!        ┌─────────────────┬─────────────────┐
//! bit:   │ 7 6 5 4 3 2 1 0 │ 15 ... 9 8      │
//!        └─────────────────┴─────────────────┘
//! ```
//! Bit `i` lives in byte `i / 8` at position `i % 8` (LSB first), so the
//! bytes can be persisted and read back by anything that knows the bit count.
//!
//! A bitmap either owns its bytes (`Bitmap<Vec<u8>>`) or overlays bytes it
//! borrows from elsewhere (`Bitmap<&[u8]>` / `Bitmap<&mut [u8]>`).

use crate::error::{BlockStoreError, Result};

/// Bit vector over any byte storage
#[derive(Debug, Clone)]
pub struct Bitmap<B> {
    /// Backing bytes (at least `bit_count.div_ceil(8)` long)
    bytes: B,
    /// Number of addressable bits
    bit_count: usize,
}

impl Bitmap<Vec<u8>> {
    /// Create an owned bitmap with every bit cleared
    pub fn new(bit_count: usize) -> Self {
        Self {
            bytes: vec![0u8; bit_count.div_ceil(8)],
            bit_count,
        }
    }
}

impl<B: AsRef<[u8]>> Bitmap<B> {
    /// Overlay a bitmap on existing bytes
    ///
    /// The bytes are used as-is: bits already set stay set.
    pub fn overlay(bit_count: usize, bytes: B) -> Result<Self> {
        let needed = bit_count.div_ceil(8);
        let available = bytes.as_ref().len();
        if available < needed {
            return Err(BlockStoreError::BitmapOverlay { needed, available });
        }
        Ok(Self::from_parts(bit_count, bytes))
    }

    /// Overlay without the length check (caller guarantees the size)
    pub(crate) fn from_parts(bit_count: usize, bytes: B) -> Self {
        debug_assert!(bytes.as_ref().len() >= bit_count.div_ceil(8));
        Self { bytes, bit_count }
    }

    /// Number of addressable bits
    pub fn bit_count(&self) -> usize {
        self.bit_count
    }

    /// Raw backing bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.bytes.as_ref()
    }

    /// Test a bit (false if out of range)
    pub fn test(&self, index: usize) -> bool {
        if index >= self.bit_count {
            return false;
        }
        self.bytes.as_ref()[index / 8] & mask(index) != 0
    }

    /// Find the lowest clear bit
    pub fn find_first_zero(&self) -> Option<usize> {
        let bytes = &self.bytes.as_ref()[..self.bit_count.div_ceil(8)];
        bytes
            .iter()
            .enumerate()
            .find(|&(_, &byte)| byte != u8::MAX)
            .map(|(i, &byte)| i * 8 + byte.trailing_ones() as usize)
            .filter(|&index| index < self.bit_count)
    }

    /// Count set bits
    ///
    /// Stray bits past `bit_count` in the last byte are ignored.
    pub fn count_set(&self) -> usize {
        let full_bytes = self.bit_count / 8;
        let bytes = self.bytes.as_ref();

        let mut count: usize = bytes[..full_bytes]
            .iter()
            .map(|byte| byte.count_ones() as usize)
            .sum();

        let tail_bits = self.bit_count % 8;
        if tail_bits > 0 {
            let tail_mask = (1u8 << tail_bits) - 1;
            count += (bytes[full_bytes] & tail_mask).count_ones() as usize;
        }

        count
    }
}

impl<B: AsRef<[u8]> + AsMut<[u8]>> Bitmap<B> {
    /// Set a bit (no-op if out of range)
    pub fn set(&mut self, index: usize) {
        if index < self.bit_count {
            self.bytes.as_mut()[index / 8] |= mask(index);
        }
    }

    /// Clear a bit (no-op if out of range)
    pub fn reset(&mut self, index: usize) {
        if index < self.bit_count {
            self.bytes.as_mut()[index / 8] &= !mask(index);
        }
    }
}

#[inline]
fn mask(index: usize) -> u8 {
    1 << (index % 8)
}
