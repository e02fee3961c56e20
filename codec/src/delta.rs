//! Entropy coding of front-coding zero counts.

use bitstream::BitBuf;

use crate::error::{CodecError, CodecResult, OverflowKind};
use crate::huffman::build_code_table;
use crate::model::FrequencyTable;
use crate::table::CodeTable;
use crate::types::TableId;

/// Largest zero count a serialized delta table can carry.
pub const MAX_ZERO_COUNT: u16 = 127;

/// Codes zero counts with a single Huffman table over their distribution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeltaCoder {
    table: CodeTable,
}

impl DeltaCoder {
    /// Builds the coder from observed zero counts.
    ///
    /// # Errors
    ///
    /// Fails with [`CodecError::FormatOverflow`] if any count exceeds
    /// [`MAX_ZERO_COUNT`], and with [`CodecError::EmptyFrequencies`] if
    /// `counts` is empty.
    pub fn build(counts: &FrequencyTable) -> CodecResult<Self> {
        if let Some((value, _)) = counts.iter().find(|&(value, _)| value > MAX_ZERO_COUNT) {
            return Err(CodecError::FormatOverflow {
                kind: OverflowKind::LeafSymbol,
                value: usize::from(value),
                max: usize::from(MAX_ZERO_COUNT),
            });
        }
        let table = build_code_table(counts, TableId::Delta)?;
        Ok(Self { table })
    }

    #[must_use]
    pub const fn from_table(table: CodeTable) -> Self {
        Self { table }
    }

    #[must_use]
    pub const fn table(&self) -> &CodeTable {
        &self.table
    }

    pub fn encode(&self, zero_count: u16, out: &mut BitBuf) -> CodecResult<()> {
        self.table.encode_symbol(zero_count, out)
    }

    /// Decodes one zero count, returning it with the bits consumed.
    pub fn decode<I>(&self, bits: &mut I, bit_offset: usize) -> CodecResult<(u16, usize)>
    where
        I: Iterator<Item = bool>,
    {
        self.table.decode_symbol(bits, bit_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_roundtrip() {
        let counts: FrequencyTable = [0u16, 0, 0, 1, 1, 4, 9].into_iter().collect();
        let coder = DeltaCoder::build(&counts).unwrap();

        let mut out = BitBuf::new();
        for value in [9u16, 0, 4, 1] {
            coder.encode(value, &mut out).unwrap();
        }

        let mut iter = out.iter();
        let mut offset = 0;
        for expected in [9u16, 0, 4, 1] {
            let (value, used) = coder.decode(&mut iter, offset).unwrap();
            assert_eq!(value, expected);
            offset += used;
        }
        assert_eq!(offset, out.len());
    }

    #[test]
    fn most_common_count_is_shortest() {
        let counts: FrequencyTable = [2u16, 2, 2, 2, 2, 0, 1].into_iter().collect();
        let coder = DeltaCoder::build(&counts).unwrap();
        assert_eq!(coder.table().code(2).unwrap().len(), 1);
    }

    #[test]
    fn single_value_uses_one_bit() {
        let counts: FrequencyTable = [5u16].into_iter().collect();
        let coder = DeltaCoder::build(&counts).unwrap();
        let mut out = BitBuf::new();
        coder.encode(5, &mut out).unwrap();
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn oversized_count_overflows() {
        let counts: FrequencyTable = [3u16, 128].into_iter().collect();
        assert_eq!(
            DeltaCoder::build(&counts),
            Err(CodecError::FormatOverflow {
                kind: OverflowKind::LeafSymbol,
                value: 128,
                max: 127
            })
        );
    }

    #[test]
    fn unseen_count_is_rejected() {
        let counts: FrequencyTable = [0u16, 1].into_iter().collect();
        let coder = DeltaCoder::build(&counts).unwrap();
        assert!(matches!(
            coder.encode(3, &mut BitBuf::new()),
            Err(CodecError::UnknownSymbol {
                table: TableId::Delta,
                symbol: 3
            })
        ));
    }
}
