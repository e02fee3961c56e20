//! Compact encoding of fixed-length word dictionaries.
//!
//! This is the main codec crate. It ties together bitstream and wire to turn
//! a set of equal-length words into three byte streams (header, code tables,
//! data) and back.
//!
//! # Pipeline
//!
//! 1. Order-1 context model: symbol counts per preceding symbol.
//! 2. One Huffman table per context; words become bit strings.
//! 3. Encodings are sorted and front coded against their predecessor; the
//!    zero counts that locate each divergence get their own Huffman table.
//! 4. Tables are serialized as byte tries, the record stream is zero-padded
//!    to a byte boundary, and the header records the out-of-band metadata.
//!
//! # Design Principles
//!
//! - **Deterministic** - Same corpus produces the same bytes.
//! - **Bounded decoding** - Header limits and checksums are checked before parsing.
//! - **Fail loudly** - Corrupt or truncated input is an error, never a partial result.
//!
//! # Example
//!
//! ```
//! use codec::{decode_dictionary, encode_dictionary, Alphabet, Corpus, WireLimits};
//!
//! let corpus = Corpus::new(Alphabet::latin_uppercase(), 5, ["ABCDE", "ABCDF", "AAAAA"])?;
//! let artifact = encode_dictionary(&corpus)?;
//!
//! let header = artifact.header_bytes()?;
//! let words = decode_dictionary(&header, &artifact.tables, &artifact.data, &WireLimits::default())?;
//! assert_eq!(words, ["AAAAA", "ABCDE", "ABCDF"]);
//! # Ok::<(), codec::CodecError>(())
//! ```

mod alphabet;
mod corpus;
mod delta;
mod dictionary;
mod error;
mod front;
mod huffman;
mod model;
mod serialize;
mod table;
mod types;
mod word;

pub use alphabet::Alphabet;
pub use corpus::Corpus;
pub use delta::{DeltaCoder, MAX_ZERO_COUNT};
pub use dictionary::{
    decode_dictionary, decode_dictionary_with_header, encode_dictionary, Artifact,
    DictionaryStats,
};
pub use error::{
    CodecError, CodecResult, ErrorKind, OverflowKind, TableReason, WordReason,
};
pub use front::{divergence_records, front_encode, sort_encodings, FrontCoded, FrontDecoder, Record};
pub use huffman::build_code_table;
pub use model::{ContextModel, FrequencyTable};
pub use serialize::{decode_table, decode_tables, encode_table, encode_tables, MAX_FIELD};
pub use table::{Code, CodeTable};
pub use types::{Context, Symbol, TableId};
pub use word::WordCodec;
pub use wire::Limits as WireLimits;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        // Verify all expected items are exported
        let _ = Alphabet::latin_uppercase();
        let _ = Symbol::new(0);
        let _ = Context::Start;
        let _ = WireLimits::default();
        let _ = FrequencyTable::new();

        // Error types
        let _: CodecResult<()> = Ok(());
    }

    #[test]
    fn example_scenario_decodes_from_independent_streams() {
        let corpus =
            Corpus::new(Alphabet::latin_uppercase(), 5, ["ABCDE", "ABCDF", "AAAAA"]).unwrap();
        let artifact = encode_dictionary(&corpus).unwrap();

        // Streams persisted and reloaded separately
        let header = artifact.header_bytes().unwrap();
        let tables = artifact.tables.clone();
        let data = artifact.data.clone();
        drop(artifact);

        let words = decode_dictionary(&header, &tables, &data, &WireLimits::default()).unwrap();
        assert_eq!(words, corpus.to_strings());
    }

    #[test]
    fn encoding_is_deterministic() {
        let words = ["ZEBRA", "APPLE", "MANGO", "LEMON", "GRAPE"];
        let a = encode_dictionary(
            &Corpus::new(Alphabet::latin_uppercase(), 5, words).unwrap(),
        )
        .unwrap();
        let mut reversed = words;
        reversed.reverse();
        let b = encode_dictionary(
            &Corpus::new(Alphabet::latin_uppercase(), 5, reversed).unwrap(),
        )
        .unwrap();
        assert_eq!(a, b);
    }
}
