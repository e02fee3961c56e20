//! Error types for artifact header operations.

use std::fmt;

/// Result type for artifact header decoding.
pub type WireResult<T> = Result<T, DecodeError>;

/// Errors raised while decoding or validating an artifact header.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DecodeError {
    /// Header bytes ended before a field could be read.
    Bitstream(bitstream::BitError),

    /// Invalid magic number in the header.
    InvalidMagic { found: u32 },

    /// Unsupported artifact format version.
    UnsupportedVersion { found: u16 },

    /// Alphabet definition is unusable.
    InvalidAlphabet { reason: AlphabetReason },

    /// A scalar header field holds an impossible value.
    InvalidField { field: &'static str, value: u64 },

    /// Limits exceeded.
    LimitsExceeded {
        kind: LimitKind,
        limit: usize,
        actual: usize,
    },

    /// Header bytes continue past the last field.
    TrailingBytes { count: usize },

    /// A payload stream does not have the length the header promises.
    PayloadLengthMismatch {
        stream: Stream,
        header_len: u32,
        actual_len: usize,
    },

    /// Payload hash does not match the header.
    ChecksumMismatch { expected: u64, found: u64 },
}

/// Specific limits that can be exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LimitKind {
    WordLength,
    WordCount,
    TableBytes,
    DataBytes,
    CodeBits,
}

/// Why an alphabet was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphabetReason {
    Empty,
    TooLarge { len: usize, max: usize },
    DuplicateSymbol { byte: u8 },
    MaskLength { expected: usize, actual: usize },
}

/// The two payload streams that accompany a header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Tables,
    Data,
}

/// Errors that can occur during header encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    LengthOverflow { field: &'static str, length: usize },
    InvalidAlphabet { reason: AlphabetReason },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bitstream(err) => write!(f, "header truncated: {err}"),
            Self::InvalidMagic { found } => {
                write!(f, "invalid magic number: 0x{found:08X}")
            }
            Self::UnsupportedVersion { found } => {
                write!(f, "unsupported artifact version: {found}")
            }
            Self::InvalidAlphabet { reason } => write!(f, "invalid alphabet: {reason}"),
            Self::InvalidField { field, value } => {
                write!(f, "invalid header field {field}: {value}")
            }
            Self::LimitsExceeded {
                kind,
                limit,
                actual,
            } => {
                write!(f, "{kind} limit exceeded: {actual} > {limit}")
            }
            Self::TrailingBytes { count } => {
                write!(f, "{count} trailing bytes after header")
            }
            Self::PayloadLengthMismatch {
                stream,
                header_len,
                actual_len,
            } => {
                write!(
                    f,
                    "{stream} length mismatch: header {header_len} bytes but {actual_len} available"
                )
            }
            Self::ChecksumMismatch { expected, found } => {
                write!(
                    f,
                    "payload hash mismatch: expected 0x{expected:016X}, found 0x{found:016X}"
                )
            }
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::WordLength => "word length",
            Self::WordCount => "word count",
            Self::TableBytes => "table bytes",
            Self::DataBytes => "data bytes",
            Self::CodeBits => "code bits",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for AlphabetReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "no symbols"),
            Self::TooLarge { len, max } => write!(f, "{len} symbols, at most {max} allowed"),
            Self::DuplicateSymbol { byte } => write!(f, "duplicate symbol 0x{byte:02X}"),
            Self::MaskLength { expected, actual } => {
                write!(f, "table mask covers {actual} symbols, expected {expected}")
            }
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tables => write!(f, "table blob"),
            Self::Data => write!(f, "data stream"),
        }
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthOverflow { field, length } => {
                write!(f, "{field} length overflow: {length}")
            }
            Self::InvalidAlphabet { reason } => write!(f, "invalid alphabet: {reason}"),
        }
    }
}

impl std::error::Error for DecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bitstream(err) => Some(err),
            _ => None,
        }
    }
}

impl std::error::Error for EncodeError {}

impl From<bitstream::BitError> for DecodeError {
    fn from(err: bitstream::BitError) -> Self {
        Self::Bitstream(err)
    }
}
