//! Owned, growable bit sequences.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Range;

use crate::error::{BitError, BitResult};

/// An owned, growable sequence of bits stored MSB-first.
///
/// Bits past [`len`](Self::len) in the final byte are always zero, so the
/// backing bytes can be compared and emitted directly with implicit zero
/// padding.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct BitBuf {
    bytes: Vec<u8>,
    len: usize,
}

impl BitBuf {
    /// Creates an empty buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            bytes: Vec::new(),
            len: 0,
        }
    }

    /// Creates an empty buffer able to hold `bits` without reallocating.
    #[must_use]
    pub fn with_capacity(bits: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8)),
            len: 0,
        }
    }

    /// Creates a buffer of `len` zero bits.
    #[must_use]
    pub fn zeros(len: usize) -> Self {
        Self {
            bytes: vec![0; len.div_ceil(8)],
            len,
        }
    }

    /// Wraps the first `bit_len` bits of `bytes`.
    ///
    /// Bits of the last byte beyond `bit_len` are cleared.
    pub fn from_bytes(bytes: &[u8], bit_len: usize) -> BitResult<Self> {
        let available = bytes.len().saturating_mul(8);
        if bit_len > available {
            return Err(BitError::UnexpectedEof {
                requested: bit_len,
                available,
            });
        }
        let mut buf = Self {
            bytes: bytes[..bit_len.div_ceil(8)].to_vec(),
            len: bit_len,
        };
        buf.clear_tail();
        Ok(buf)
    }

    /// Returns the number of bits.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the buffer holds no bits.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the backing bytes; the final byte is zero-padded.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the buffer, returning its zero-padded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Returns the bit at `index`, or `None` past the end.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        Some(self.bytes[index / 8] & (0x80 >> (index % 8)) != 0)
    }

    /// Appends one bit.
    pub fn push(&mut self, bit: bool) {
        let offset = self.len % 8;
        if offset == 0 {
            self.bytes.push(0);
        }
        if bit {
            if let Some(last) = self.bytes.last_mut() {
                *last |= 0x80 >> offset;
            }
        }
        self.len += 1;
    }

    /// Appends the low `bits` bits of `value`, most significant first.
    ///
    /// # Errors
    ///
    /// Returns [`BitError::InvalidBitCount`] if `bits > 64`.
    /// Returns [`BitError::ValueOutOfRange`] if `value` doesn't fit in `bits`.
    pub fn push_bits(&mut self, value: u64, bits: usize) -> BitResult<()> {
        if bits > 64 {
            return Err(BitError::InvalidBitCount { bits, max_bits: 64 });
        }
        if bits < 64 && value >> bits != 0 {
            return Err(BitError::ValueOutOfRange { value, bits });
        }
        for i in (0..bits).rev() {
            self.push((value >> i) & 1 == 1);
        }
        Ok(())
    }

    /// Appends `other[range]`.
    pub fn extend_from_range(&mut self, other: &Self, range: Range<usize>) -> BitResult<()> {
        if range.end > other.len {
            return Err(BitError::UnexpectedEof {
                requested: range.end,
                available: other.len,
            });
        }
        self.extend(other.iter_range(range));
        Ok(())
    }

    /// Appends whole bytes. Callers guarantee `len` is a multiple of eight.
    pub(crate) fn append_aligned_bytes(&mut self, bytes: &[u8]) {
        debug_assert_eq!(self.len % 8, 0);
        self.bytes.extend_from_slice(bytes);
        self.len += bytes.len() * 8;
    }

    /// Shortens the buffer to `len` bits. No-op if already shorter.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        self.len = len;
        self.bytes.truncate(len.div_ceil(8));
        self.clear_tail();
    }

    /// Iterates over all bits.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        self.iter_range(0..self.len)
    }

    /// Iterates over the bits starting at `start`.
    #[must_use]
    pub fn iter_from(&self, start: usize) -> Iter<'_> {
        self.iter_range(start..self.len)
    }

    fn iter_range(&self, range: Range<usize>) -> Iter<'_> {
        let end = range.end.min(self.len);
        Iter {
            buf: self,
            pos: range.start.min(end),
            end,
        }
    }

    /// Counts the zero bits in `[0, end)`.
    #[must_use]
    pub fn count_zeros_before(&self, end: usize) -> usize {
        let end = end.min(self.len);
        let full = end / 8;
        let ones: usize = self.bytes[..full]
            .iter()
            .map(|byte| byte.count_ones() as usize)
            .sum();
        let tail = (full * 8..end).filter(|&i| self.get(i) == Some(true)).count();
        end - ones - tail
    }

    /// Returns the position of the zero bit preceded by exactly `n` zeros.
    ///
    /// `nth_zero(0)` is the first zero. Returns `None` if the buffer holds
    /// `n` or fewer zeros.
    #[must_use]
    pub fn nth_zero(&self, n: usize) -> Option<usize> {
        let mut remaining = n;
        for (i, &byte) in self.bytes.iter().enumerate() {
            let start = i * 8;
            let width = (self.len - start).min(8);
            let zeros = width - byte.count_ones() as usize;
            if remaining >= zeros {
                remaining -= zeros;
                continue;
            }
            for bit in 0..width {
                if byte & (0x80 >> bit) == 0 {
                    if remaining == 0 {
                        return Some(start + bit);
                    }
                    remaining -= 1;
                }
            }
        }
        None
    }

    /// Returns the first position where `self` and `other` differ, scanning
    /// only the length of the shorter buffer.
    #[must_use]
    pub fn first_difference(&self, other: &Self) -> Option<usize> {
        let limit = self.len.min(other.len);
        for (i, (a, b)) in self
            .bytes
            .iter()
            .zip(&other.bytes)
            .take(limit.div_ceil(8))
            .enumerate()
        {
            let diff = a ^ b;
            if diff != 0 {
                let pos = i * 8 + diff.leading_zeros() as usize;
                return (pos < limit).then_some(pos);
            }
        }
        None
    }

    /// Compares two buffers as unsigned integers after right-padding the
    /// shorter one with zero bits to the longer length.
    #[must_use]
    pub fn cmp_zero_padded(&self, other: &Self) -> Ordering {
        let width = self.bytes.len().max(other.bytes.len());
        (0..width)
            .map(|i| {
                let a = self.bytes.get(i).copied().unwrap_or(0);
                let b = other.bytes.get(i).copied().unwrap_or(0);
                a.cmp(&b)
            })
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    }

    fn clear_tail(&mut self) {
        let used = self.len % 8;
        if used != 0 {
            if let Some(last) = self.bytes.last_mut() {
                *last &= 0xFF << (8 - used);
            }
        }
    }
}

impl fmt::Debug for BitBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits: String = self.iter().map(|bit| if bit { '1' } else { '0' }).collect();
        f.debug_tuple("BitBuf").field(&bits).finish()
    }
}

impl Extend<bool> for BitBuf {
    fn extend<T: IntoIterator<Item = bool>>(&mut self, iter: T) {
        for bit in iter {
            self.push(bit);
        }
    }
}

impl FromIterator<bool> for BitBuf {
    fn from_iter<T: IntoIterator<Item = bool>>(iter: T) -> Self {
        let mut buf = Self::new();
        buf.extend(iter);
        buf
    }
}

impl<'a> IntoIterator for &'a BitBuf {
    type Item = bool;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the bits of a [`BitBuf`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    buf: &'a BitBuf,
    pos: usize,
    end: usize,
}

impl Iterator for Iter<'_> {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        if self.pos >= self.end {
            return None;
        }
        let bit = self.buf.get(self.pos);
        self.pos += 1;
        bit
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.pos;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}
