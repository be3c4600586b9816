//! # Network Writer
//!
//! Reusable byte accumulator for outgoing messages.
//!
//! ## Design
//!
//! - Growable backing storage, doubling when a write runs past the end
//! - Cursor-based: `reset()` rewinds to zero without touching contents,
//!   stale bytes stay behind the cursor and are never observable
//! - All primitives are little-endian
//! - Meant to be reused through [`crate::pool::WriterPool`]; a writer is
//!   never destroyed once constructed

use bytemuck::{bytes_of, Pod};

use crate::DEFAULT_WRITER_CAPACITY;

/// Cursor-based writer over growable byte storage.
///
/// A writer is exclusively owned by one caller between checkout and return;
/// nothing in here synchronizes.
pub struct NetWriter {
    /// Backing storage. Grows, never shrinks.
    buffer: Vec<u8>,
    /// Write cursor. Bytes at `[0, position)` are the current payload.
    position: usize,
}

impl NetWriter {
    /// Creates a writer with the default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_WRITER_CAPACITY)
    }

    /// Creates a writer with the given initial byte capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: vec![0u8; capacity],
            position: 0,
        }
    }

    /// Rewinds the cursor to zero for reuse.
    ///
    /// Contents are not cleared; they become unreachable behind the cursor.
    #[inline]
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Returns the current cursor position.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Moves the cursor to an absolute position.
    ///
    /// # Panics
    ///
    /// Panics if `position` is past the end of the backing storage.
    #[inline]
    pub fn set_position(&mut self, position: usize) {
        assert!(
            position <= self.buffer.len(),
            "cursor {position} past end of storage ({})",
            self.buffer.len()
        );
        self.position = position;
    }

    /// Returns the number of payload bytes written so far.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.position
    }

    /// Returns true if no bytes have been written.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.position == 0
    }

    /// Returns the current byte capacity of the backing storage.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Returns the payload written so far.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer[..self.position]
    }

    /// Copies the payload into a fresh allocation.
    ///
    /// Off the hot path; the send path hands [`NetWriter::as_slice`] to the
    /// transport instead.
    #[must_use]
    pub fn to_vec(&self) -> Vec<u8> {
        self.as_slice().to_vec()
    }

    /// Grows the backing storage so `additional` more bytes fit.
    fn ensure(&mut self, additional: usize) {
        let needed = self.position + additional;
        if needed > self.buffer.len() {
            let grown = needed.max(self.buffer.len() * 2);
            self.buffer.resize(grown, 0);
        }
    }

    /// Writes a single byte.
    #[inline]
    pub fn write_u8(&mut self, value: u8) {
        self.ensure(1);
        self.buffer[self.position] = value;
        self.position += 1;
    }

    /// Writes a u16 in little-endian format.
    #[inline]
    pub fn write_u16(&mut self, value: u16) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Writes a u32 in little-endian format.
    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Writes a u64 in little-endian format.
    #[inline]
    pub fn write_u64(&mut self, value: u64) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Writes a f32 in little-endian format.
    #[inline]
    pub fn write_f32(&mut self, value: f32) {
        self.write_bytes(&value.to_le_bytes());
    }

    /// Writes a raw byte slice.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.ensure(bytes.len());
        self.buffer[self.position..self.position + bytes.len()].copy_from_slice(bytes);
        self.position += bytes.len();
    }

    /// Writes a Pod type directly.
    #[inline]
    pub fn write_pod<T: Pod>(&mut self, value: &T) {
        self.write_bytes(bytes_of(value));
    }
}

impl Default for NetWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytemuck::{Pod, Zeroable};

    #[test]
    fn test_write_primitives_little_endian() {
        let mut writer = NetWriter::with_capacity(64);
        writer.write_u8(0xAB);
        writer.write_u16(0x0102);
        writer.write_u32(0x0304_0506);
        writer.write_u64(0x0708_090A_0B0C_0D0E);

        assert_eq!(writer.len(), 1 + 2 + 4 + 8);
        assert_eq!(
            writer.as_slice(),
            &[
                0xAB, // u8
                0x02, 0x01, // u16
                0x06, 0x05, 0x04, 0x03, // u32
                0x0E, 0x0D, 0x0C, 0x0B, 0x0A, 0x09, 0x08, 0x07, // u64
            ]
        );
    }

    #[test]
    fn test_reset_rewinds_without_clearing() {
        let mut writer = NetWriter::with_capacity(16);
        writer.write_u32(0xFFFF_FFFF);
        assert_eq!(writer.len(), 4);

        writer.reset();
        assert!(writer.is_empty());
        assert_eq!(writer.as_slice(), &[] as &[u8]);

        // Overwrites stale bytes instead of appending
        writer.write_u8(1);
        assert_eq!(writer.as_slice(), &[1]);
    }

    #[test]
    fn test_growth_preserves_payload() {
        let mut writer = NetWriter::with_capacity(4);
        writer.write_u32(0x0403_0201);
        assert_eq!(writer.capacity(), 4);

        // This write crosses the end of storage and forces growth
        writer.write_u32(0x0807_0605);
        assert!(writer.capacity() >= 8);
        assert_eq!(writer.as_slice(), &[1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_growth_doubles() {
        let mut writer = NetWriter::with_capacity(8);
        writer.write_u64(0);
        writer.write_u8(0);
        assert_eq!(writer.capacity(), 16);
    }

    #[test]
    fn test_write_pod() {
        #[derive(Clone, Copy, Pod, Zeroable)]
        #[repr(C)]
        struct Sample {
            a: u32,
            b: u32,
        }

        let mut writer = NetWriter::with_capacity(16);
        writer.write_pod(&Sample { a: 1, b: 2 });
        assert_eq!(writer.as_slice(), &[1, 0, 0, 0, 2, 0, 0, 0]);
    }

    #[test]
    fn test_set_position() {
        let mut writer = NetWriter::with_capacity(8);
        writer.write_u32(0xAAAA_AAAA);
        writer.set_position(2);
        writer.write_u16(0x0102);
        assert_eq!(writer.len(), 4);
        assert_eq!(writer.as_slice(), &[0xAA, 0xAA, 0x02, 0x01]);
    }

    #[test]
    #[should_panic(expected = "past end of storage")]
    fn test_set_position_out_of_storage_panics() {
        let mut writer = NetWriter::with_capacity(8);
        writer.set_position(9);
    }
}
