//! Packing fields into a byte stream.

use crate::bitbuf::BitBuf;
use crate::error::{BitError, BitResult};

/// Appends bit fields and whole-byte values to a growing stream.
///
/// Bits go out most significant first. Multi-byte integers are written
/// little-endian and only on byte boundaries. The final partial byte is
/// zero-padded by [`finish`](Self::finish).
#[derive(Debug, Default)]
pub struct BitWriter {
    buf: BitBuf,
}

impl BitWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves room for `bytes` bytes of output.
    #[must_use]
    pub fn with_capacity(bytes: usize) -> Self {
        Self {
            buf: BitBuf::with_capacity(bytes.saturating_mul(8)),
        }
    }

    #[must_use]
    pub const fn bits_written(&self) -> usize {
        self.buf.len()
    }

    pub fn write_bit(&mut self, value: bool) {
        self.buf.push(value);
    }

    /// Writes the low `bits` bits of `value`.
    ///
    /// # Errors
    ///
    /// [`BitError::InvalidBitCount`] above 64 bits, and
    /// [`BitError::ValueOutOfRange`] when `value` is wider than `bits`.
    pub fn write_bits(&mut self, value: u64, bits: usize) -> BitResult<()> {
        self.buf.push_bits(value, bits)
    }

    /// Zero-fills up to the next byte boundary.
    pub fn align_to_byte(&mut self) {
        let pad = (8 - self.buf.len() % 8) % 8;
        for _ in 0..pad {
            self.buf.push(false);
        }
    }

    pub fn write_u8_aligned(&mut self, value: u8) -> BitResult<()> {
        self.write_aligned_bytes(&[value])
    }

    pub fn write_u16_aligned(&mut self, value: u16) -> BitResult<()> {
        self.write_aligned_bytes(&value.to_le_bytes())
    }

    pub fn write_u32_aligned(&mut self, value: u32) -> BitResult<()> {
        self.write_aligned_bytes(&value.to_le_bytes())
    }

    pub fn write_u64_aligned(&mut self, value: u64) -> BitResult<()> {
        self.write_aligned_bytes(&value.to_le_bytes())
    }

    /// Copies `bytes` verbatim.
    ///
    /// # Errors
    ///
    /// [`BitError::MisalignedAccess`] unless the stream sits on a byte
    /// boundary.
    pub fn write_aligned_bytes(&mut self, bytes: &[u8]) -> BitResult<()> {
        let bit_position = self.buf.len();
        if bit_position % 8 != 0 {
            return Err(BitError::MisalignedAccess { bit_position });
        }
        self.buf.append_aligned_bytes(bytes);
        Ok(())
    }

    /// Returns the packed bytes, zero-padding the last one.
    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.buf.into_bytes()
    }
}
