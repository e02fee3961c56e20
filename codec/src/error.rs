//! Error types for codec operations.

use std::fmt;

use wire::{AlphabetReason, Stream};

use crate::types::TableId;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur while building, encoding, or decoding a dictionary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Artifact header error.
    Wire(wire::DecodeError),

    /// Artifact header could not be encoded.
    WireEncode(wire::EncodeError),

    /// Bitstream error.
    Bitstream(bitstream::BitError),

    /// Alphabet definition is unusable.
    InvalidAlphabet { reason: AlphabetReason },

    /// Alphabet contains a byte outside 7-bit ASCII.
    NonAsciiSymbol { byte: u8 },

    /// Word length is zero or too large for the header.
    InvalidWordLength { len: usize },

    /// A corpus word does not fit the alphabet or word length.
    InvalidWord { word: String, reason: WordReason },

    /// The corpus holds no words.
    EmptyCorpus,

    /// A table was requested for a context that was never observed.
    EmptyFrequencies { table: TableId },

    /// A context has no code table.
    MissingTable { table: TableId },

    /// A symbol has no code in the table of its context.
    UnknownSymbol { table: TableId, symbol: u16 },

    /// A code table is not a full binary tree and cannot be serialized.
    IncompleteTable { table: TableId },

    /// Two sorted encodings share a prefix without diverging.
    NoDivergence { rank: usize },

    /// A value does not fit the fixed-width field reserved for it.
    FormatOverflow {
        kind: OverflowKind,
        value: usize,
        max: usize,
    },

    /// A serialized code table is malformed.
    MalformedTable { table: TableId, reason: TableReason },

    /// The input bits do not form any code of the table.
    NoMatchingCode { table: TableId, bit_offset: usize },

    /// Input ended in the middle of a code.
    UnexpectedEnd { table: TableId, bit_offset: usize },

    /// A record's zero count points past its predecessor.
    InvalidZeroCount { record: usize, zero_count: u16 },

    /// A record drew fewer bits than its own divergence prefix.
    RecordUnderflow { record: usize },

    /// Data remained after the last expected item.
    TrailingData { stream: Stream, bits: usize },
}

/// Details for invalid corpus words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordReason {
    Length { expected: usize, actual: usize },
    UnknownSymbol { byte: u8, position: usize },
}

/// Fixed-width fields that can overflow at encode time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverflowKind {
    /// Right-subtree offset byte of a serialized table.
    SubtreeOffset,
    /// Symbol value stored in a 7-bit table leaf.
    LeafSymbol,
    /// Code length beyond the 64-bit code register.
    CodeLength,
    /// Longest encoded word beyond the header field.
    MaxCodeLen,
    /// Word length beyond the header field.
    WordLength,
    /// Word count beyond the header field.
    WordCount,
}

/// Details for malformed serialized tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableReason {
    Truncated { position: usize },
    ZeroOffset { position: usize },
    OffsetMismatch { expected: usize, actual: usize },
    DuplicateSymbol { symbol: u16 },
    SymbolOutOfRange { symbol: u16, alphabet_len: usize },
    PrefixConflict { symbol: u16 },
    TooDeep { depth: usize },
}

/// Coarse classification of [`CodecError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Caller-provided alphabet or corpus is invalid.
    Input,
    /// Table construction or front coding failed.
    Build,
    /// A persisted artifact is corrupt or truncated.
    Decode,
    /// A value does not fit its fixed-width format field.
    FormatOverflow,
}

impl CodecError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAlphabet { .. }
            | Self::NonAsciiSymbol { .. }
            | Self::InvalidWordLength { .. }
            | Self::InvalidWord { .. }
            | Self::EmptyCorpus => ErrorKind::Input,
            Self::EmptyFrequencies { .. }
            | Self::UnknownSymbol { .. }
            | Self::IncompleteTable { .. }
            | Self::NoDivergence { .. } => ErrorKind::Build,
            Self::FormatOverflow { .. } | Self::WireEncode(_) => ErrorKind::FormatOverflow,
            Self::Wire(_)
            | Self::Bitstream(_)
            | Self::MissingTable { .. }
            | Self::MalformedTable { .. }
            | Self::NoMatchingCode { .. }
            | Self::UnexpectedEnd { .. }
            | Self::InvalidZeroCount { .. }
            | Self::RecordUnderflow { .. }
            | Self::TrailingData { .. } => ErrorKind::Decode,
        }
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wire(e) => write!(f, "header error: {e}"),
            Self::WireEncode(e) => write!(f, "header encode error: {e}"),
            Self::Bitstream(e) => write!(f, "bitstream error: {e}"),
            Self::InvalidAlphabet { reason } => write!(f, "invalid alphabet: {reason}"),
            Self::NonAsciiSymbol { byte } => {
                write!(f, "alphabet byte 0x{byte:02X} is not ASCII")
            }
            Self::InvalidWordLength { len } => write!(f, "invalid word length {len}"),
            Self::InvalidWord { word, reason } => write!(f, "invalid word {word:?}: {reason}"),
            Self::EmptyCorpus => write!(f, "corpus has no words"),
            Self::EmptyFrequencies { table } => {
                write!(f, "{table} has no observed symbols")
            }
            Self::MissingTable { table } => write!(f, "{table} is missing"),
            Self::UnknownSymbol { table, symbol } => {
                write!(f, "symbol {symbol} has no code in {table}")
            }
            Self::IncompleteTable { table } => {
                write!(f, "{table} is not a full binary code")
            }
            Self::NoDivergence { rank } => {
                write!(f, "sorted encoding {rank} does not diverge from its predecessor")
            }
            Self::FormatOverflow { kind, value, max } => {
                write!(f, "{kind} overflow: {value} > {max}")
            }
            Self::MalformedTable { table, reason } => {
                write!(f, "malformed {table}: {reason}")
            }
            Self::NoMatchingCode { table, bit_offset } => {
                write!(f, "no code of {table} matches at bit {bit_offset}")
            }
            Self::UnexpectedEnd { table, bit_offset } => {
                write!(f, "input ended inside a code of {table} at bit {bit_offset}")
            }
            Self::InvalidZeroCount { record, zero_count } => {
                write!(
                    f,
                    "record {record}: zero count {zero_count} exceeds its predecessor"
                )
            }
            Self::RecordUnderflow { record } => {
                write!(f, "record {record} ends inside its shared prefix")
            }
            Self::TrailingData { stream, bits } => {
                write!(f, "{bits} trailing bits in {stream}")
            }
        }
    }
}

impl fmt::Display for WordReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Length { expected, actual } => {
                write!(f, "length {actual}, expected {expected}")
            }
            Self::UnknownSymbol { byte, position } => {
                write!(f, "byte 0x{byte:02X} at {position} is not in the alphabet")
            }
        }
    }
}

impl fmt::Display for OverflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::SubtreeOffset => "subtree offset",
            Self::LeafSymbol => "leaf symbol",
            Self::CodeLength => "code length",
            Self::MaxCodeLen => "max code length",
            Self::WordLength => "word length",
            Self::WordCount => "word count",
        };
        write!(f, "{name}")
    }
}

impl fmt::Display for TableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated { position } => write!(f, "truncated at byte {position}"),
            Self::ZeroOffset { position } => {
                write!(f, "zero subtree offset at byte {position}")
            }
            Self::OffsetMismatch { expected, actual } => {
                write!(f, "right subtree at byte {actual}, offset says {expected}")
            }
            Self::DuplicateSymbol { symbol } => write!(f, "symbol {symbol} appears twice"),
            Self::SymbolOutOfRange {
                symbol,
                alphabet_len,
            } => {
                write!(f, "symbol {symbol} outside alphabet of {alphabet_len}")
            }
            Self::PrefixConflict { symbol } => {
                write!(f, "code for symbol {symbol} conflicts with another prefix")
            }
            Self::TooDeep { depth } => write!(f, "code depth {depth} exceeds 64 bits"),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Wire(e) => Some(e),
            Self::WireEncode(e) => Some(e),
            Self::Bitstream(e) => Some(e),
            _ => None,
        }
    }
}

impl From<wire::DecodeError> for CodecError {
    fn from(err: wire::DecodeError) -> Self {
        Self::Wire(err)
    }
}

impl From<wire::EncodeError> for CodecError {
    fn from(err: wire::EncodeError) -> Self {
        Self::WireEncode(err)
    }
}

impl From<bitstream::BitError> for CodecError {
    fn from(err: bitstream::BitError) -> Self {
        Self::Bitstream(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Context;

    #[test]
    fn error_display_no_matching_code() {
        let err = CodecError::NoMatchingCode {
            table: TableId::Word(Context::Start),
            bit_offset: 17,
        };
        let msg = err.to_string();
        assert!(msg.contains("17"), "should mention bit offset");
        assert!(msg.contains("start"), "should mention context");
    }

    #[test]
    fn error_display_format_overflow() {
        let err = CodecError::FormatOverflow {
            kind: OverflowKind::SubtreeOffset,
            value: 130,
            max: 127,
        };
        let msg = err.to_string();
        assert!(msg.contains("subtree offset"));
        assert!(msg.contains("130"));
    }

    #[test]
    fn error_display_invalid_word() {
        let err = CodecError::InvalidWord {
            word: "AB1".to_string(),
            reason: WordReason::UnknownSymbol {
                byte: b'1',
                position: 2,
            },
        };
        let msg = err.to_string();
        assert!(msg.contains("AB1"));
        assert!(msg.contains("0x31"));
    }

    #[test]
    fn error_kinds_follow_failure_stage() {
        assert_eq!(CodecError::EmptyCorpus.kind(), ErrorKind::Input);
        assert_eq!(
            CodecError::EmptyFrequencies {
                table: TableId::Delta
            }
            .kind(),
            ErrorKind::Build
        );
        assert_eq!(
            CodecError::UnexpectedEnd {
                table: TableId::Delta,
                bit_offset: 0
            }
            .kind(),
            ErrorKind::Decode
        );
        assert_eq!(
            CodecError::FormatOverflow {
                kind: OverflowKind::LeafSymbol,
                value: 200,
                max: 127
            }
            .kind(),
            ErrorKind::FormatOverflow
        );
    }

    #[test]
    fn error_from_wire_error() {
        let wire_err = wire::DecodeError::InvalidMagic { found: 0x1234 };
        let codec_err: CodecError = wire_err.into();
        assert!(matches!(codec_err, CodecError::Wire(_)));
        assert!(std::error::Error::source(&codec_err).is_some());
    }

    #[test]
    fn error_from_bitstream_error() {
        let bit_err = bitstream::BitError::UnexpectedEof {
            requested: 1,
            available: 0,
        };
        let codec_err: CodecError = bit_err.into();
        assert!(matches!(codec_err, CodecError::Bitstream(_)));
    }

    #[test]
    fn error_source_none_for_others() {
        let err = CodecError::EmptyCorpus;
        assert!(std::error::Error::source(&err).is_none());
    }

    #[test]
    fn error_is_std_error() {
        fn assert_error<E: std::error::Error>() {}
        assert_error::<CodecError>();
    }
}
