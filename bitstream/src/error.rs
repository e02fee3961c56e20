//! Bit-level failure reporting.

use std::fmt;

/// Result alias used throughout the crate.
pub type BitResult<T> = Result<T, BitError>;

/// A bounds or alignment violation while packing or unpacking bits.
///
/// Every variant carries the positions involved so callers can report where a
/// stream went wrong without keeping their own cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BitError {
    /// The input ended before `requested` bits could be taken.
    UnexpectedEof { requested: usize, available: usize },
    /// A field width above what a `u64` can hold.
    InvalidBitCount { bits: usize, max_bits: usize },
    /// `value` has set bits above the requested width.
    ValueOutOfRange { value: u64, bits: usize },
    /// A whole-byte operation started mid-byte.
    MisalignedAccess { bit_position: usize },
}

impl fmt::Display for BitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedEof {
                requested,
                available,
            } => write!(
                f,
                "unexpected end of input: needed {requested} bits, {available} left"
            ),
            Self::InvalidBitCount { bits, max_bits } => {
                write!(f, "field width {bits} exceeds {max_bits} bits")
            }
            Self::ValueOutOfRange { value, bits } => {
                write!(f, "{value:#x} does not fit a {bits}-bit field")
            }
            Self::MisalignedAccess { bit_position } => {
                write!(f, "byte access at unaligned bit offset {bit_position}")
            }
        }
    }
}

impl std::error::Error for BitError {}
