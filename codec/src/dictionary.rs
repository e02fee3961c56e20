//! Whole-dictionary encoding and decoding.

use bitstream::BitBuf;
use log::debug;
use wire::{decode_header, encode_header, ArtifactHeader, Limits};

use crate::alphabet::Alphabet;
use crate::corpus::Corpus;
use crate::error::{CodecError, CodecResult, OverflowKind};
use crate::front::{front_encode, FrontDecoder};
use crate::model::ContextModel;
use crate::serialize::{decode_tables, encode_tables};
use crate::word::WordCodec;

/// Size figures of an encoded dictionary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DictionaryStats {
    pub word_count: usize,
    pub word_len: usize,
    /// Longest word encoding in bits.
    pub max_code_len: usize,
    pub table_bytes: usize,
    /// Data stream length before byte padding.
    pub data_bits: usize,
    /// Bits spent on record suffixes, excluding zero-count codes.
    pub suffix_bits: usize,
    pub distinct_zero_counts: usize,
}

impl DictionaryStats {
    /// Average data stream cost per word, tables excluded.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn bits_per_word(&self) -> f64 {
        if self.word_count == 0 {
            return 0.0;
        }
        self.data_bits as f64 / self.word_count as f64
    }
}

/// An encoded dictionary: header, table blob, and data stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub header: ArtifactHeader,
    pub tables: Vec<u8>,
    pub data: Vec<u8>,
    pub stats: DictionaryStats,
}

impl Artifact {
    /// Serializes the header.
    pub fn header_bytes(&self) -> CodecResult<Vec<u8>> {
        Ok(encode_header(&self.header)?)
    }
}

/// Encodes a corpus into an [`Artifact`].
///
/// Output is a pure function of the corpus: the same words always produce
/// identical bytes.
///
/// # Errors
///
/// Fails with [`CodecError::FormatOverflow`] when a table, zero count, or
/// header field does not fit its fixed-width field.
pub fn encode_dictionary(corpus: &Corpus) -> CodecResult<Artifact> {
    let codec = WordCodec::build(ContextModel::from_corpus(corpus))?;
    let front = front_encode(&codec, corpus)?;
    let tables = encode_tables(&codec, &front.delta)?;

    let stats = DictionaryStats {
        word_count: corpus.len(),
        word_len: corpus.word_len(),
        max_code_len: front.max_code_len,
        table_bytes: tables.len(),
        data_bits: front.data.len(),
        suffix_bits: front.suffix_bits,
        distinct_zero_counts: front.distinct_zero_counts,
    };
    let data = front.data.into_bytes();

    let alphabet = corpus.alphabet();
    let header = ArtifactHeader::new(
        header_u16(corpus.word_len(), OverflowKind::WordLength)?,
        header_u32(corpus.len(), OverflowKind::WordCount)?,
        header_u16(stats.max_code_len, OverflowKind::MaxCodeLen)?,
        alphabet.as_bytes().to_vec(),
        codec.table_mask(alphabet.len()),
    )
    .seal(&tables, &data)?;

    debug!(
        "encoded {} words of {} symbols: {} tables, {} table bytes, {} data bits, max code {} bits",
        stats.word_count,
        stats.word_len,
        codec.tables().len() + 1,
        stats.table_bytes,
        stats.data_bits,
        stats.max_code_len
    );

    Ok(Artifact {
        header,
        tables,
        data,
        stats,
    })
}

fn header_u16(value: usize, kind: OverflowKind) -> CodecResult<u16> {
    u16::try_from(value).map_err(|_| CodecError::FormatOverflow {
        kind,
        value,
        max: usize::from(u16::MAX),
    })
}

fn header_u32(value: usize, kind: OverflowKind) -> CodecResult<u32> {
    u32::try_from(value).map_err(|_| CodecError::FormatOverflow {
        kind,
        value,
        max: u32::MAX as usize,
    })
}

/// Decodes a dictionary from its three persisted byte streams.
///
/// Returns the words sorted ascending.
///
/// # Errors
///
/// Any header, checksum, table, or stream error.
pub fn decode_dictionary(
    header: &[u8],
    tables: &[u8],
    data: &[u8],
    limits: &Limits,
) -> CodecResult<Vec<String>> {
    let header = decode_header(header, limits)?;
    decode_dictionary_with_header(&header, tables, data)
}

/// Decodes a dictionary whose header has already been parsed.
pub fn decode_dictionary_with_header(
    header: &ArtifactHeader,
    tables: &[u8],
    data: &[u8],
) -> CodecResult<Vec<String>> {
    header.verify_payload(tables, data)?;

    let alphabet = Alphabet::new(&header.alphabet)?;
    let (codec, delta) = decode_tables(tables, alphabet.len(), &header.table_mask)?;
    let stream = BitBuf::from_bytes(data, data.len() * 8)?;

    let decoder = FrontDecoder::new(
        &codec,
        &delta,
        usize::from(header.word_len),
        usize::from(header.max_code_len),
    );
    let symbols = decoder.decode(&stream, header.word_count as usize)?;

    let mut words: Vec<String> = symbols.iter().map(|word| alphabet.render(word)).collect();
    words.sort_unstable();
    debug!(
        "decoded {} words from {} table bytes and {} data bytes",
        words.len(),
        tables.len(),
        data.len()
    );
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn corpus(words: &[&str]) -> Corpus {
        Corpus::new(Alphabet::latin_uppercase(), words[0].len(), words).unwrap()
    }

    fn roundtrip(artifact: &Artifact) -> CodecResult<Vec<String>> {
        let header = artifact.header_bytes()?;
        decode_dictionary(&header, &artifact.tables, &artifact.data, &Limits::default())
    }

    #[test]
    fn example_corpus_roundtrips() {
        let artifact = encode_dictionary(&corpus(&["ABCDE", "ABCDF", "AAAAA"])).unwrap();
        assert_eq!(
            roundtrip(&artifact).unwrap(),
            vec!["AAAAA", "ABCDE", "ABCDF"]
        );
        assert_eq!(artifact.header.word_count, 3);
        assert_eq!(artifact.header.word_len, 5);
        assert_eq!(artifact.stats.max_code_len, 5);
    }

    #[test]
    fn header_tracks_contexts() {
        let artifact = encode_dictionary(&corpus(&["ABCDE", "ABCDF", "AAAAA"])).unwrap();
        let mask = &artifact.header.table_mask;
        assert_eq!(mask.len(), 26);
        assert!(mask[..4].iter().all(|&present| present));
        assert!(mask[4..].iter().all(|&present| !present));
    }

    #[test]
    fn stats_are_consistent() {
        let artifact =
            encode_dictionary(&corpus(&["CAT", "COT", "COG", "DOG", "DIG", "CAB"])).unwrap();
        let stats = artifact.stats;
        assert_eq!(stats.word_count, 6);
        assert_eq!(stats.table_bytes, artifact.tables.len());
        assert_eq!(artifact.data.len(), stats.data_bits.div_ceil(8));
        assert!(stats.suffix_bits < stats.data_bits);
        assert!(stats.bits_per_word() > 0.0);
    }

    #[test]
    fn checksum_guards_payload() {
        let artifact = encode_dictionary(&corpus(&["ABCDE", "ABCDF", "AAAAA"])).unwrap();
        let header = artifact.header_bytes().unwrap();
        let mut data = artifact.data.clone();
        data[0] ^= 0x80;
        let err = decode_dictionary(&header, &artifact.tables, &data, &Limits::default())
            .unwrap_err();
        assert!(matches!(
            err,
            CodecError::Wire(wire::DecodeError::ChecksumMismatch { .. })
        ));
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn resealed_corruption_is_still_detected() {
        let artifact = encode_dictionary(&corpus(&["ABCDE", "ABCDF", "AAAAA"])).unwrap();
        let mut data = artifact.data.clone();
        data.push(0xFF);
        let header = artifact.header.clone().seal(&artifact.tables, &data).unwrap();
        let err = decode_dictionary_with_header(&header, &artifact.tables, &data).unwrap_err();
        assert!(matches!(err, CodecError::TrailingData { .. }));
    }

    #[test]
    fn header_limits_apply() {
        let artifact = encode_dictionary(&corpus(&["ABCDEFGHIJKLMNOPQ"])).unwrap();
        let header = artifact.header_bytes().unwrap();
        let err = decode_dictionary(
            &header,
            &artifact.tables,
            &artifact.data,
            &Limits::for_testing(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CodecError::Wire(wire::DecodeError::LimitsExceeded { .. })
        ));
    }

    #[test]
    fn header_fields_report_bounds() {
        assert_eq!(header_u16(7, OverflowKind::MaxCodeLen), Ok(7));
        assert_eq!(header_u32(70_000, OverflowKind::WordCount), Ok(70_000));
        assert_eq!(
            header_u16(70_000, OverflowKind::MaxCodeLen),
            Err(CodecError::FormatOverflow {
                kind: OverflowKind::MaxCodeLen,
                value: 70_000,
                max: 65_535
            })
        );
    }
}
