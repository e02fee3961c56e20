//! Decode-time bounds on header fields.

use crate::error::{DecodeError, LimitKind, WireResult};

/// Upper bounds a decoder accepts from an untrusted header.
///
/// Each field is checked as soon as it is read, before the payload streams
/// are touched, so a forged header cannot make the decoder allocate for a
/// dictionary it will never finish.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Symbols per word.
    pub max_word_len: usize,
    pub max_word_count: usize,
    /// Table blob size in bytes.
    pub max_table_bytes: usize,
    /// Data stream size in bytes.
    pub max_data_bytes: usize,
    /// Longest single word encoding, in bits.
    pub max_code_bits: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_word_len: 64,
            max_word_count: 1 << 20,
            max_table_bytes: 64 * 1024,
            max_data_bytes: 16 * 1024 * 1024,
            max_code_bits: 4096,
        }
    }
}

impl Limits {
    /// Tight bounds for tests and fuzzing.
    #[must_use]
    pub const fn for_testing() -> Self {
        Self {
            max_word_len: 16,
            max_word_count: 4096,
            max_table_bytes: 4096,
            max_data_bytes: 64 * 1024,
            max_code_bits: 256,
        }
    }

    /// Accepts any header the format can express.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            max_word_len: usize::MAX,
            max_word_count: usize::MAX,
            max_table_bytes: usize::MAX,
            max_data_bytes: usize::MAX,
            max_code_bits: usize::MAX,
        }
    }

    #[must_use]
    pub const fn bound(&self, kind: LimitKind) -> usize {
        match kind {
            LimitKind::WordLength => self.max_word_len,
            LimitKind::WordCount => self.max_word_count,
            LimitKind::TableBytes => self.max_table_bytes,
            LimitKind::DataBytes => self.max_data_bytes,
            LimitKind::CodeBits => self.max_code_bits,
        }
    }

    /// Fails with [`DecodeError::LimitsExceeded`] when `actual` is above the
    /// bound for `kind`.
    pub fn check(&self, kind: LimitKind, actual: usize) -> WireResult<()> {
        let limit = self.bound(kind);
        if actual > limit {
            return Err(DecodeError::LimitsExceeded {
                kind,
                limit,
                actual,
            });
        }
        Ok(())
    }
}
