//! Context-chained word coding.

use std::collections::BTreeMap;

use bitstream::BitBuf;
use wire::MAX_ALPHABET_LEN;

use crate::error::{CodecError, CodecResult, TableReason};
use crate::huffman::build_code_table;
use crate::model::ContextModel;
use crate::table::CodeTable;
use crate::types::{Context, Symbol, TableId};

/// Encodes and decodes fixed-length words with one code table per context.
///
/// Each symbol is coded with the table of the symbol before it (or the
/// start table for the first symbol). Words carry no terminator; decoders
/// are told the word length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordCodec {
    tables: BTreeMap<Context, CodeTable>,
}

impl WordCodec {
    /// Builds one Huffman table per observed context.
    pub fn build(model: ContextModel) -> CodecResult<Self> {
        let tables = model
            .iter()
            .map(|(context, frequencies)| {
                build_code_table(frequencies, TableId::Word(context)).map(|table| (context, table))
            })
            .collect::<CodecResult<_>>()?;
        Ok(Self { tables })
    }

    /// Wraps already-built tables, keyed by context.
    #[must_use]
    pub const fn from_tables(tables: BTreeMap<Context, CodeTable>) -> Self {
        Self { tables }
    }

    #[must_use]
    pub fn table(&self, context: Context) -> Option<&CodeTable> {
        self.tables.get(&context)
    }

    /// Iterates tables in canonical context order.
    pub fn tables(&self) -> impl ExactSizeIterator<Item = &CodeTable> + '_ {
        self.tables.values()
    }

    /// Returns which `After` contexts have a table, indexed by symbol.
    #[must_use]
    pub fn table_mask(&self, alphabet_len: usize) -> Vec<bool> {
        (0..alphabet_len)
            .map(|index| {
                u8::try_from(index).is_ok_and(|index| {
                    self.tables
                        .contains_key(&Context::After(Symbol::new(index)))
                })
            })
            .collect()
    }

    /// Encodes a word into a fresh buffer.
    pub fn encode(&self, word: &[Symbol]) -> CodecResult<BitBuf> {
        let mut out = BitBuf::new();
        self.encode_into(word, &mut out)?;
        Ok(out)
    }

    /// Appends the encoding of `word` to `out`.
    pub fn encode_into(&self, word: &[Symbol], out: &mut BitBuf) -> CodecResult<()> {
        let mut context = Context::Start;
        for &symbol in word {
            self.table_for(context)?
                .encode_symbol(symbol.table_symbol(), out)?;
            context = Context::next(symbol);
        }
        Ok(())
    }

    /// Decodes `word_len` symbols from `bits`.
    ///
    /// Returns the word and the number of bits consumed.
    pub fn decode<I>(
        &self,
        bits: &mut I,
        word_len: usize,
        bit_offset: usize,
    ) -> CodecResult<(Vec<Symbol>, usize)>
    where
        I: Iterator<Item = bool>,
    {
        let mut word = Vec::with_capacity(word_len);
        let mut consumed = 0;
        let mut context = Context::Start;
        for _ in 0..word_len {
            let table = self.table_for(context)?;
            let (value, used) = table.decode_symbol(bits, bit_offset + consumed)?;
            let symbol = u8::try_from(value)
                .ok()
                .filter(|&index| usize::from(index) < MAX_ALPHABET_LEN)
                .map(Symbol::new)
                .ok_or(CodecError::MalformedTable {
                    table: table.id(),
                    reason: TableReason::SymbolOutOfRange {
                        symbol: value,
                        alphabet_len: MAX_ALPHABET_LEN,
                    },
                })?;
            consumed += used;
            word.push(symbol);
            context = Context::next(symbol);
        }
        Ok((word, consumed))
    }

    fn table_for(&self, context: Context) -> CodecResult<&CodeTable> {
        self.tables.get(&context).ok_or(CodecError::MissingTable {
            table: TableId::Word(context),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::Alphabet;
    use crate::corpus::Corpus;

    fn codec_for(words: &[&str]) -> (Corpus, WordCodec) {
        let corpus = Corpus::new(Alphabet::latin_uppercase(), words[0].len(), words).unwrap();
        let codec = WordCodec::build(ContextModel::from_corpus(&corpus)).unwrap();
        (corpus, codec)
    }

    #[test]
    fn every_word_roundtrips() {
        let (corpus, codec) = codec_for(&["ABCDE", "ABCDF", "AAAAA"]);
        for word in corpus.words() {
            let bits = codec.encode(word).unwrap();
            let mut iter = bits.iter();
            let (decoded, consumed) = codec.decode(&mut iter, 5, 0).unwrap();
            assert_eq!(decoded, word);
            assert_eq!(consumed, bits.len());
            assert!(iter.next().is_none());
        }
    }

    #[test]
    fn degenerate_contexts_cost_one_bit() {
        let (corpus, codec) = codec_for(&["XYZ"]);
        let word = corpus.words().next().unwrap();
        let bits = codec.encode(word).unwrap();
        assert_eq!(bits.len(), 3);
        assert!(bits.iter().all(|bit| !bit));
    }

    #[test]
    fn decode_reports_truncation() {
        let (corpus, codec) = codec_for(&["AB", "BA", "BB"]);
        let word = corpus.words().last().unwrap();
        let bits = codec.encode(word).unwrap();
        let truncated: BitBuf = bits.iter().take(bits.len() - 1).collect();
        let err = codec.decode(&mut truncated.iter(), 2, 0).unwrap_err();
        assert!(matches!(err, CodecError::UnexpectedEnd { .. }));
    }

    #[test]
    fn decode_reports_unknown_path() {
        // Only "QQ" exists, so every table is degenerate and rejects a 1 bit.
        let (_, codec) = codec_for(&["QQ"]);
        let err = codec
            .decode(&mut [false, true].into_iter(), 2, 40)
            .unwrap_err();
        assert!(matches!(
            err,
            CodecError::NoMatchingCode { bit_offset: 41, .. }
        ));
    }

    #[test]
    fn encode_rejects_unseen_symbol() {
        let (_, codec) = codec_for(&["AB"]);
        let err = codec
            .encode(&[Symbol::new(0), Symbol::new(2)])
            .unwrap_err();
        assert!(matches!(err, CodecError::UnknownSymbol { symbol: 2, .. }));
    }

    #[test]
    fn table_mask_marks_observed_contexts() {
        let (_, codec) = codec_for(&["AC", "CB"]);
        assert_eq!(codec.table_mask(4), vec![true, false, true, false]);
    }
}
