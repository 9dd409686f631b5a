//! Tests for Bitmap
//!
//! These tests verify:
//! - Owned and overlay construction
//! - test/set/reset semantics, including out-of-range indexes
//! - First-zero search returns the lowest clear bit
//! - Population count ignores bits past the end

use blockstore::{Bitmap, BlockStoreError};

// =============================================================================
// Construction Tests
// =============================================================================

#[test]
fn test_new_bitmap_is_clear() {
    let bitmap = Bitmap::new(100);

    assert_eq!(bitmap.bit_count(), 100);
    assert_eq!(bitmap.as_bytes().len(), 13);
    assert_eq!(bitmap.count_set(), 0);
    assert_eq!(bitmap.find_first_zero(), Some(0));
}

#[test]
fn test_overlay_keeps_existing_bits() {
    let bytes = [0b0000_0101u8, 0x00];
    let bitmap = Bitmap::overlay(16, &bytes[..]).unwrap();

    assert!(bitmap.test(0));
    assert!(!bitmap.test(1));
    assert!(bitmap.test(2));
    assert_eq!(bitmap.count_set(), 2);
}

#[test]
fn test_overlay_rejects_short_backing() {
    let bytes = [0u8; 3];
    let result = Bitmap::overlay(25, &bytes[..]);

    assert!(matches!(
        result,
        Err(BlockStoreError::BitmapOverlay { needed: 4, available: 3 })
    ));
}

#[test]
fn test_overlay_writes_through_to_backing() {
    let mut bytes = [0u8; 2];
    {
        let mut bitmap = Bitmap::overlay(16, &mut bytes[..]).unwrap();
        bitmap.set(0);
        bitmap.set(9);
    }

    assert_eq!(bytes, [0b0000_0001, 0b0000_0010]);
}

// =============================================================================
// Set / Reset / Test
// =============================================================================

#[test]
fn test_set_and_reset() {
    let mut bitmap = Bitmap::new(16);

    bitmap.set(5);
    assert!(bitmap.test(5));
    assert_eq!(bitmap.count_set(), 1);

    bitmap.reset(5);
    assert!(!bitmap.test(5));
    assert_eq!(bitmap.count_set(), 0);
}

#[test]
fn test_set_is_idempotent() {
    let mut bitmap = Bitmap::new(8);

    bitmap.set(3);
    bitmap.set(3);

    assert_eq!(bitmap.count_set(), 1);
}

#[test]
fn test_out_of_range_is_ignored() {
    let mut bitmap = Bitmap::new(10);

    bitmap.set(10);
    bitmap.set(1000);
    bitmap.reset(1000);

    assert!(!bitmap.test(10));
    assert!(!bitmap.test(1000));
    assert_eq!(bitmap.count_set(), 0);
}

#[test]
fn test_bit_layout_is_lsb_first() {
    let mut bitmap = Bitmap::new(16);

    bitmap.set(0);
    bitmap.set(7);
    bitmap.set(8);

    assert_eq!(bitmap.as_bytes(), &[0b1000_0001, 0b0000_0001]);
}

// =============================================================================
// Find First Zero
// =============================================================================

#[test]
fn test_find_first_zero_skips_full_bytes() {
    let mut bitmap = Bitmap::new(32);
    for i in 0..19 {
        bitmap.set(i);
    }

    assert_eq!(bitmap.find_first_zero(), Some(19));
}

#[test]
fn test_find_first_zero_returns_lowest_hole() {
    let mut bitmap = Bitmap::new(32);
    for i in 0..32 {
        bitmap.set(i);
    }
    bitmap.reset(20);
    bitmap.reset(4);

    assert_eq!(bitmap.find_first_zero(), Some(4));
}

#[test]
fn test_find_first_zero_full_bitmap() {
    let mut bitmap = Bitmap::new(12);
    for i in 0..12 {
        bitmap.set(i);
    }

    // Bits 12..16 of the last byte are clear but not addressable
    assert_eq!(bitmap.find_first_zero(), None);
}

#[test]
fn test_find_first_zero_empty_bitmap() {
    let bitmap = Bitmap::new(0);

    assert_eq!(bitmap.find_first_zero(), None);
    assert_eq!(bitmap.count_set(), 0);
}

// =============================================================================
// Count Set
// =============================================================================

#[test]
fn test_count_set_ignores_stray_tail_bits() {
    // 12 addressable bits; the high nibble of byte 1 is past the end
    let bytes = [0xFFu8, 0xFF];
    let bitmap = Bitmap::overlay(12, &bytes[..]).unwrap();

    assert_eq!(bitmap.count_set(), 12);
    assert_eq!(bitmap.find_first_zero(), None);
}

#[test]
fn test_count_set_many() {
    let mut bitmap = Bitmap::new(1000);
    for i in (0..1000).step_by(3) {
        bitmap.set(i);
    }

    assert_eq!(bitmap.count_set(), 334);
}
