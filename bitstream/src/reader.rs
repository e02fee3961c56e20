//! Unpacking fields from a borrowed byte stream.

use crate::error::{BitError, BitResult};

/// A cursor over packed bytes.
///
/// Mirrors [`BitWriter`](crate::BitWriter): MSB-first bit fields, little-endian
/// integers on byte boundaries. A failed read leaves the cursor where it was,
/// and no input can make it panic.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> BitReader<'a> {
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    #[must_use]
    pub const fn bits_remaining(&self) -> usize {
        (self.data.len() * 8).saturating_sub(self.pos)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits_remaining() == 0
    }

    /// Offset of the next unread bit.
    #[must_use]
    pub const fn bit_position(&self) -> usize {
        self.pos
    }

    pub fn read_bit(&mut self) -> BitResult<bool> {
        Ok(self.read_bits(1)? == 1)
    }

    /// Reads a `bits`-wide field, at most 64 bits.
    ///
    /// Whole bytes are consumed at a time where the field allows it.
    pub fn read_bits(&mut self, bits: usize) -> BitResult<u64> {
        if bits > 64 {
            return Err(BitError::InvalidBitCount { bits, max_bits: 64 });
        }
        self.need(bits)?;

        let mut value = 0u64;
        let mut left = bits;
        while left > 0 {
            let byte = self.data[self.pos / 8];
            let free = 8 - self.pos % 8;
            let take = free.min(left);
            let chunk = (byte >> (free - take)) & (0xFF >> (8 - take));
            value = (value << take) | u64::from(chunk);
            self.pos += take;
            left -= take;
        }
        Ok(value)
    }

    /// Skips the padding up to the next byte boundary.
    pub fn align_to_byte(&mut self) -> BitResult<()> {
        let pad = (8 - self.pos % 8) % 8;
        self.need(pad)?;
        self.pos += pad;
        Ok(())
    }

    pub fn read_u8_aligned(&mut self) -> BitResult<u8> {
        Ok(u8::from_le_bytes(self.read_array()?))
    }

    pub fn read_u16_aligned(&mut self) -> BitResult<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32_aligned(&mut self) -> BitResult<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64_aligned(&mut self) -> BitResult<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Borrows the next `len` bytes without copying.
    ///
    /// # Errors
    ///
    /// [`BitError::MisalignedAccess`] mid-byte, [`BitError::UnexpectedEof`]
    /// when fewer than `len` bytes remain.
    pub fn read_byte_slice(&mut self, len: usize) -> BitResult<&'a [u8]> {
        if self.pos % 8 != 0 {
            return Err(BitError::MisalignedAccess {
                bit_position: self.pos,
            });
        }
        self.need(len.saturating_mul(8))?;
        let start = self.pos / 8;
        self.pos += len * 8;
        Ok(&self.data[start..start + len])
    }

    fn read_array<const N: usize>(&mut self) -> BitResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_byte_slice(N)?);
        Ok(out)
    }

    fn need(&self, bits: usize) -> BitResult<()> {
        let available = self.bits_remaining();
        if bits > available {
            return Err(BitError::UnexpectedEof {
                requested: bits,
                available,
            });
        }
        Ok(())
    }
}
