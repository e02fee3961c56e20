//! Artifact header layout and constants.

use bitstream::{BitReader, BitWriter};

use crate::error::{AlphabetReason, DecodeError, EncodeError, LimitKind, Stream, WireResult};
use crate::hash::payload_hash;
use crate::limits::Limits;

/// Magic number identifying lexpack artifacts.
///
/// This value is fixed and must never change across versions.
pub const MAGIC: u32 = 0x4C58_504B; // "LXPK" in ASCII

/// Current artifact format version.
pub const VERSION: u16 = 1;

/// Size in bytes of the fixed-width header fields (excludes the alphabet and table mask).
pub const HEADER_FIXED_SIZE: usize = 4 + 2 + 2 + 4 + 2 + 1 + 4 + 4 + 8;

/// Largest alphabet whose symbol indices fit a 7-bit table leaf.
pub const MAX_ALPHABET_LEN: usize = 127;

/// Out-of-band metadata that accompanies the table blob and data stream.
///
/// The codec cannot decode either payload without these values: the word
/// length and count stop the front decoder, `max_code_len` sizes the virtual
/// predecessor, and `table_mask` fixes which contexts own a table in the blob.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArtifactHeader {
    /// Artifact format version.
    pub version: u16,
    /// Number of symbols in every word.
    pub word_len: u16,
    /// Number of words in the dictionary.
    pub word_count: u32,
    /// Longest encoded word in bits.
    pub max_code_len: u16,
    /// Alphabet bytes in symbol-index order.
    pub alphabet: Vec<u8>,
    /// Entry `i` is set when the context following symbol `i` has a table.
    pub table_mask: Vec<bool>,
    /// Table blob length in bytes.
    pub table_len: u32,
    /// Data stream length in bytes.
    pub data_len: u32,
    /// Hash over both payload streams.
    pub payload_hash: u64,
}

impl ArtifactHeader {
    /// Creates a header for the given dictionary shape with empty payload fields.
    ///
    /// Call [`seal`](Self::seal) once the payloads are known.
    #[must_use]
    pub fn new(
        word_len: u16,
        word_count: u32,
        max_code_len: u16,
        alphabet: Vec<u8>,
        table_mask: Vec<bool>,
    ) -> Self {
        Self {
            version: VERSION,
            word_len,
            word_count,
            max_code_len,
            alphabet,
            table_mask,
            table_len: 0,
            data_len: 0,
            payload_hash: 0,
        }
    }

    /// Records payload lengths and hash.
    pub fn seal(mut self, tables: &[u8], data: &[u8]) -> Result<Self, EncodeError> {
        self.table_len = u32::try_from(tables.len()).map_err(|_| EncodeError::LengthOverflow {
            field: "table_len",
            length: tables.len(),
        })?;
        self.data_len = u32::try_from(data.len()).map_err(|_| EncodeError::LengthOverflow {
            field: "data_len",
            length: data.len(),
        })?;
        self.payload_hash = payload_hash(tables, data);
        Ok(self)
    }

    /// Checks that both payloads match the lengths and hash recorded here.
    pub fn verify_payload(&self, tables: &[u8], data: &[u8]) -> WireResult<()> {
        check_len(Stream::Tables, self.table_len, tables.len())?;
        check_len(Stream::Data, self.data_len, data.len())?;
        let found = payload_hash(tables, data);
        if found != self.payload_hash {
            return Err(DecodeError::ChecksumMismatch {
                expected: self.payload_hash,
                found,
            });
        }
        Ok(())
    }

    /// Returns the encoded size of this header in bytes.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        HEADER_FIXED_SIZE + self.alphabet.len() + self.alphabet.len().div_ceil(8)
    }
}

fn check_len(stream: Stream, header_len: u32, actual_len: usize) -> WireResult<()> {
    if header_len as usize != actual_len {
        return Err(DecodeError::PayloadLengthMismatch {
            stream,
            header_len,
            actual_len,
        });
    }
    Ok(())
}

/// Encodes an artifact header.
pub fn encode_header(header: &ArtifactHeader) -> Result<Vec<u8>, EncodeError> {
    validate_alphabet(&header.alphabet).map_err(|reason| EncodeError::InvalidAlphabet { reason })?;
    if header.table_mask.len() != header.alphabet.len() {
        return Err(EncodeError::InvalidAlphabet {
            reason: AlphabetReason::MaskLength {
                expected: header.alphabet.len(),
                actual: header.table_mask.len(),
            },
        });
    }

    let alphabet_len =
        u8::try_from(header.alphabet.len()).map_err(|_| EncodeError::LengthOverflow {
            field: "alphabet",
            length: header.alphabet.len(),
        })?;

    let mut writer = BitWriter::with_capacity(header.encoded_len());
    write_header(header, alphabet_len, &mut writer).map_err(|_| EncodeError::LengthOverflow {
        field: "header",
        length: header.encoded_len(),
    })?;
    Ok(writer.finish())
}

fn write_header(
    header: &ArtifactHeader,
    alphabet_len: u8,
    writer: &mut BitWriter,
) -> bitstream::BitResult<()> {
    writer.write_u32_aligned(MAGIC)?;
    writer.write_u16_aligned(header.version)?;
    writer.write_u16_aligned(header.word_len)?;
    writer.write_u32_aligned(header.word_count)?;
    writer.write_u16_aligned(header.max_code_len)?;
    writer.write_u8_aligned(alphabet_len)?;
    writer.write_aligned_bytes(&header.alphabet)?;
    for &present in &header.table_mask {
        writer.write_bit(present);
    }
    writer.align_to_byte();
    writer.write_u32_aligned(header.table_len)?;
    writer.write_u32_aligned(header.data_len)?;
    writer.write_u64_aligned(header.payload_hash)?;
    Ok(())
}

/// Decodes an artifact header, validating it against `limits`.
///
/// The header must occupy `bytes` exactly.
pub fn decode_header(bytes: &[u8], limits: &Limits) -> WireResult<ArtifactHeader> {
    let mut reader = BitReader::new(bytes);

    let magic = reader.read_u32_aligned()?;
    if magic != MAGIC {
        return Err(DecodeError::InvalidMagic { found: magic });
    }
    let version = reader.read_u16_aligned()?;
    if version != VERSION {
        return Err(DecodeError::UnsupportedVersion { found: version });
    }

    let word_len = reader.read_u16_aligned()?;
    if word_len == 0 {
        return Err(DecodeError::InvalidField {
            field: "word_len",
            value: 0,
        });
    }
    limits.check(LimitKind::WordLength, word_len as usize)?;

    let word_count = reader.read_u32_aligned()?;
    if word_count == 0 {
        return Err(DecodeError::InvalidField {
            field: "word_count",
            value: 0,
        });
    }
    limits.check(LimitKind::WordCount, word_count as usize)?;

    let max_code_len = reader.read_u16_aligned()?;
    // Every symbol costs at least one bit.
    if max_code_len < word_len {
        return Err(DecodeError::InvalidField {
            field: "max_code_len",
            value: u64::from(max_code_len),
        });
    }
    limits.check(LimitKind::CodeBits, max_code_len as usize)?;

    let alphabet_len = reader.read_u8_aligned()? as usize;
    let alphabet = reader.read_byte_slice(alphabet_len)?.to_vec();
    validate_alphabet(&alphabet).map_err(|reason| DecodeError::InvalidAlphabet { reason })?;

    let mut table_mask = Vec::with_capacity(alphabet_len);
    for _ in 0..alphabet_len {
        table_mask.push(reader.read_bit()?);
    }
    reader.align_to_byte()?;

    let table_len = reader.read_u32_aligned()?;
    limits.check(LimitKind::TableBytes, table_len as usize)?;
    let data_len = reader.read_u32_aligned()?;
    limits.check(LimitKind::DataBytes, data_len as usize)?;
    let payload_hash = reader.read_u64_aligned()?;

    let trailing = reader.bits_remaining() / 8;
    if trailing != 0 {
        return Err(DecodeError::TrailingBytes { count: trailing });
    }

    Ok(ArtifactHeader {
        version,
        word_len,
        word_count,
        max_code_len,
        alphabet,
        table_mask,
        table_len,
        data_len,
        payload_hash,
    })
}

/// Checks that an alphabet is non-empty, small enough, and duplicate-free.
pub fn validate_alphabet(alphabet: &[u8]) -> Result<(), AlphabetReason> {
    if alphabet.is_empty() {
        return Err(AlphabetReason::Empty);
    }
    if alphabet.len() > MAX_ALPHABET_LEN {
        return Err(AlphabetReason::TooLarge {
            len: alphabet.len(),
            max: MAX_ALPHABET_LEN,
        });
    }
    let mut seen = [false; 256];
    for &byte in alphabet {
        if seen[byte as usize] {
            return Err(AlphabetReason::DuplicateSymbol { byte });
        }
        seen[byte as usize] = true;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> ArtifactHeader {
        ArtifactHeader::new(
            5,
            3,
            9,
            b"ABCDEF".to_vec(),
            vec![true, true, true, true, false, false],
        )
        .seal(&[0x03, 0x05], &[0xA0])
        .unwrap()
    }

    #[test]
    fn magic_is_lxpk_ascii() {
        assert_eq!(&MAGIC.to_be_bytes(), b"LXPK");
    }

    #[test]
    fn header_roundtrip() {
        let header = sample_header();
        let bytes = encode_header(&header).unwrap();
        assert_eq!(bytes.len(), header.encoded_len());
        let decoded = decode_header(&bytes, &Limits::for_testing()).unwrap();
        assert_eq!(decoded, header);
    }

    #[test]
    fn header_golden_prefix() {
        let bytes = encode_header(&sample_header()).unwrap();
        let mut expected = Vec::new();
        expected.extend_from_slice(&MAGIC.to_le_bytes());
        expected.extend_from_slice(&VERSION.to_le_bytes());
        expected.extend_from_slice(&5u16.to_le_bytes());
        expected.extend_from_slice(&3u32.to_le_bytes());
        expected.extend_from_slice(&9u16.to_le_bytes());
        expected.push(6);
        expected.extend_from_slice(b"ABCDEF");
        expected.push(0b1111_0000);
        expected.extend_from_slice(&2u32.to_le_bytes());
        expected.extend_from_slice(&1u32.to_le_bytes());
        assert_eq!(&bytes[..expected.len()], expected.as_slice());
    }

    #[test]
    fn decode_rejects_bad_magic() {
        let mut bytes = encode_header(&sample_header()).unwrap();
        bytes[0] ^= 0xFF;
        let err = decode_header(&bytes, &Limits::for_testing()).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidMagic { .. }));
    }

    #[test]
    fn decode_rejects_unknown_version() {
        let mut bytes = encode_header(&sample_header()).unwrap();
        bytes[4] = 9;
        let err = decode_header(&bytes, &Limits::for_testing()).unwrap_err();
        assert_eq!(err, DecodeError::UnsupportedVersion { found: 9 });
    }

    #[test]
    fn decode_rejects_truncated_prefixes() {
        let bytes = encode_header(&sample_header()).unwrap();
        for len in 0..bytes.len() {
            assert!(
                decode_header(&bytes[..len], &Limits::for_testing()).is_err(),
                "prefix of {len} bytes must not decode"
            );
        }
    }

    #[test]
    fn decode_rejects_trailing_bytes() {
        let mut bytes = encode_header(&sample_header()).unwrap();
        bytes.push(0);
        let err = decode_header(&bytes, &Limits::for_testing()).unwrap_err();
        assert_eq!(err, DecodeError::TrailingBytes { count: 1 });
    }

    #[test]
    fn decode_enforces_word_count_limit() {
        let mut header = sample_header();
        header.word_count = 10_000;
        let bytes = encode_header(&header).unwrap();
        let err = decode_header(&bytes, &Limits::for_testing()).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::LimitsExceeded {
                kind: LimitKind::WordCount,
                ..
            }
        ));
        assert!(decode_header(&bytes, &Limits::unlimited()).is_ok());
    }

    #[test]
    fn decode_rejects_code_len_shorter_than_word() {
        let mut header = sample_header();
        header.max_code_len = 4;
        let bytes = encode_header(&header).unwrap();
        let err = decode_header(&bytes, &Limits::for_testing()).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::InvalidField {
                field: "max_code_len",
                ..
            }
        ));
    }

    #[test]
    fn encode_rejects_duplicate_alphabet() {
        let header = ArtifactHeader::new(1, 1, 1, b"AA".to_vec(), vec![false, false]);
        let err = encode_header(&header).unwrap_err();
        assert_eq!(
            err,
            EncodeError::InvalidAlphabet {
                reason: AlphabetReason::DuplicateSymbol { byte: b'A' }
            }
        );
    }

    #[test]
    fn encode_rejects_mask_mismatch() {
        let header = ArtifactHeader::new(1, 1, 1, b"AB".to_vec(), vec![false]);
        assert!(matches!(
            encode_header(&header),
            Err(EncodeError::InvalidAlphabet {
                reason: AlphabetReason::MaskLength { .. }
            })
        ));
    }

    #[test]
    fn verify_payload_detects_tampering() {
        let header = sample_header();
        assert!(header.verify_payload(&[0x03, 0x05], &[0xA0]).is_ok());
        assert!(matches!(
            header.verify_payload(&[0x03, 0x05], &[0xA1]),
            Err(DecodeError::ChecksumMismatch { .. })
        ));
        assert!(matches!(
            header.verify_payload(&[0x03], &[0xA0]),
            Err(DecodeError::PayloadLengthMismatch {
                stream: Stream::Tables,
                ..
            })
        ));
    }

    #[test]
    fn validate_alphabet_bounds() {
        assert_eq!(validate_alphabet(&[]), Err(AlphabetReason::Empty));
        let big: Vec<u8> = (0..=127).collect();
        assert!(matches!(
            validate_alphabet(&big),
            Err(AlphabetReason::TooLarge { len: 128, .. })
        ));
        assert!(validate_alphabet(&big[..127]).is_ok());
    }
}
