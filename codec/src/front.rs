//! Front coding of sorted word encodings.
//!
//! Encodings are sorted by their value zero-padded to the longest encoding,
//! then each is stored relative to its predecessor (an all-zero buffer for
//! the first) as the number of zeros the predecessor holds before the first
//! differing bit, followed by the bits after that point. The differing bit is
//! always `0` in the predecessor and `1` in the successor, so it is dropped.
//!
//! If the smallest encoding is all zeros it has no differing bit. It is then
//! written with a zero count equal to the longest encoding length and no
//! suffix; the decoder reads the word straight out of the zero buffer.

use std::iter;

use bitstream::BitBuf;
use wire::Stream;

use crate::corpus::Corpus;
use crate::delta::DeltaCoder;
use crate::error::{CodecError, CodecResult, OverflowKind};
use crate::model::FrequencyTable;
use crate::types::Symbol;
use crate::word::WordCodec;

/// One front-coded entry, before entropy coding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Record {
    /// Zeros in the predecessor before the differing bit.
    pub zero_count: u16,
    /// First bit of the entry that is written out.
    pub suffix_start: usize,
}

/// Output of [`front_encode`].
#[derive(Debug, Clone)]
pub struct FrontCoded {
    pub delta: DeltaCoder,
    pub data: BitBuf,
    pub max_code_len: usize,
    pub suffix_bits: usize,
    pub distinct_zero_counts: usize,
}

/// Sorts encodings ascending by zero-padded value.
pub fn sort_encodings(encodings: &mut [BitBuf]) {
    encodings.sort_by(BitBuf::cmp_zero_padded);
}

/// Computes the record of every entry in `sorted` against its predecessor.
///
/// # Errors
///
/// [`CodecError::NoDivergence`] if two neighbours are prefix-related or out
/// of order, which means the codes were not prefix-free.
pub fn divergence_records(sorted: &[BitBuf], max_code_len: usize) -> CodecResult<Vec<Record>> {
    let zero_count = |count: usize| {
        u16::try_from(count).map_err(|_| CodecError::FormatOverflow {
            kind: OverflowKind::MaxCodeLen,
            value: count,
            max: usize::from(u16::MAX),
        })
    };

    let origin = BitBuf::zeros(max_code_len);
    let mut prev = &origin;
    let mut records = Vec::with_capacity(sorted.len());
    for (rank, curr) in sorted.iter().enumerate() {
        let record = match prev.first_difference(curr) {
            Some(at) if prev.get(at) == Some(false) => Record {
                zero_count: zero_count(prev.count_zeros_before(at))?,
                suffix_start: at + 1,
            },
            None if rank == 0 => Record {
                zero_count: zero_count(max_code_len)?,
                suffix_start: curr.len(),
            },
            _ => return Err(CodecError::NoDivergence { rank }),
        };
        records.push(record);
        prev = curr;
    }
    Ok(records)
}

/// Encodes every corpus word and front-codes the sorted encodings.
pub fn front_encode(codec: &WordCodec, corpus: &Corpus) -> CodecResult<FrontCoded> {
    let mut encodings = corpus
        .words()
        .map(|word| codec.encode(word))
        .collect::<CodecResult<Vec<_>>>()?;
    let max_code_len = encodings.iter().map(BitBuf::len).max().unwrap_or(0);
    if max_code_len > usize::from(u16::MAX) {
        return Err(CodecError::FormatOverflow {
            kind: OverflowKind::MaxCodeLen,
            value: max_code_len,
            max: usize::from(u16::MAX),
        });
    }

    sort_encodings(&mut encodings);
    let records = divergence_records(&encodings, max_code_len)?;

    let counts: FrequencyTable = records.iter().map(|record| record.zero_count).collect();
    let delta = DeltaCoder::build(&counts)?;

    let mut data = BitBuf::with_capacity(encodings.iter().map(BitBuf::len).sum());
    let mut suffix_bits = 0;
    for (record, encoding) in records.iter().zip(&encodings) {
        delta.encode(record.zero_count, &mut data)?;
        data.extend_from_range(encoding, record.suffix_start..encoding.len())?;
        suffix_bits += encoding.len() - record.suffix_start;
    }

    Ok(FrontCoded {
        delta,
        data,
        max_code_len,
        suffix_bits,
        distinct_zero_counts: counts.len(),
    })
}

/// Sequential decoder for a front-coded data stream.
#[derive(Debug, Clone, Copy)]
pub struct FrontDecoder<'a> {
    codec: &'a WordCodec,
    delta: &'a DeltaCoder,
    word_len: usize,
    max_code_len: usize,
}

impl<'a> FrontDecoder<'a> {
    #[must_use]
    pub const fn new(
        codec: &'a WordCodec,
        delta: &'a DeltaCoder,
        word_len: usize,
        max_code_len: usize,
    ) -> Self {
        Self {
            codec,
            delta,
            word_len,
            max_code_len,
        }
    }

    /// Decodes exactly `word_count` records from `data`.
    ///
    /// Whatever follows the last record must be fewer than 8 zero bits.
    ///
    /// # Errors
    ///
    /// Decode errors from the tables if the stream is truncated or corrupt,
    /// [`CodecError::InvalidZeroCount`] or [`CodecError::RecordUnderflow`]
    /// for records inconsistent with their predecessor, and
    /// [`CodecError::TrailingData`] for leftover bits.
    pub fn decode(&self, data: &BitBuf, word_count: usize) -> CodecResult<Vec<Vec<Symbol>>> {
        // Every record costs at least one bit
        let mut words = Vec::with_capacity(word_count.min(data.len()));
        let mut prev = BitBuf::zeros(self.max_code_len);
        let mut pos = 0;

        for record in 0..word_count {
            let (zero_count, used) = self.delta.decode(&mut data.iter_from(pos), pos)?;
            pos += used;

            if record == 0 && usize::from(zero_count) == self.max_code_len {
                let (word, consumed) = self.codec.decode(&mut prev.iter(), self.word_len, pos)?;
                prev.truncate(consumed);
                words.push(word);
                continue;
            }

            let match_len = prev
                .nth_zero(usize::from(zero_count))
                .ok_or(CodecError::InvalidZeroCount { record, zero_count })?;

            let (word, consumed) = {
                let mut bits = prev
                    .iter()
                    .take(match_len)
                    .chain(iter::once(true))
                    .chain(data.iter_from(pos));
                self.codec.decode(&mut bits, self.word_len, pos)?
            };
            if consumed <= match_len {
                return Err(CodecError::RecordUnderflow { record });
            }

            let drawn = consumed - match_len - 1;
            prev.truncate(match_len);
            prev.push(true);
            prev.extend_from_range(data, pos..pos + drawn)?;
            pos += drawn;
            words.push(word);
        }

        let rest = data.len() - pos;
        if rest >= 8 || data.iter_from(pos).any(|bit| bit) {
            return Err(CodecError::TrailingData {
                stream: Stream::Data,
                bits: rest,
            });
        }
        Ok(words)
    }
}
