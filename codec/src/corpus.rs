//! Validated word sets.

use std::collections::BTreeSet;

use crate::alphabet::Alphabet;
use crate::error::{CodecError, CodecResult, WordReason};
use crate::types::Symbol;

/// A non-empty set of equal-length words over an [`Alphabet`].
///
/// Words are stored as symbol sequences in ascending symbol order with
/// duplicates collapsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Corpus {
    alphabet: Alphabet,
    word_len: usize,
    words: Vec<Vec<Symbol>>,
}

impl Corpus {
    /// Validates and collects `words`.
    ///
    /// # Errors
    ///
    /// - [`CodecError::InvalidWordLength`] if `word_len` is 0 or above `u16::MAX`
    /// - [`CodecError::InvalidWord`] for a word of the wrong length or with a
    ///   byte outside the alphabet
    /// - [`CodecError::EmptyCorpus`] if no words are given
    pub fn new<I, S>(alphabet: Alphabet, word_len: usize, words: I) -> CodecResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if word_len == 0 || word_len > usize::from(u16::MAX) {
            return Err(CodecError::InvalidWordLength { len: word_len });
        }

        let mut set = BTreeSet::new();
        for word in words {
            let word = word.as_ref();
            set.insert(parse_word(&alphabet, word_len, word)?);
        }
        if set.is_empty() {
            return Err(CodecError::EmptyCorpus);
        }

        Ok(Self {
            alphabet,
            word_len,
            words: set.into_iter().collect(),
        })
    }

    #[must_use]
    pub const fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    #[must_use]
    pub const fn word_len(&self) -> usize {
        self.word_len
    }

    /// Returns the number of distinct words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always `false`; construction rejects empty corpora.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterates the words as symbol sequences.
    pub fn words(&self) -> impl ExactSizeIterator<Item = &[Symbol]> + '_ {
        self.words.iter().map(Vec::as_slice)
    }

    /// Renders every word back to a string, in symbol order.
    #[must_use]
    pub fn to_strings(&self) -> Vec<String> {
        self.words
            .iter()
            .map(|word| self.alphabet.render(word))
            .collect()
    }
}

fn parse_word(alphabet: &Alphabet, word_len: usize, word: &str) -> CodecResult<Vec<Symbol>> {
    let invalid = |reason| CodecError::InvalidWord {
        word: word.to_string(),
        reason,
    };

    if word.len() != word_len {
        return Err(invalid(WordReason::Length {
            expected: word_len,
            actual: word.len(),
        }));
    }
    word.bytes()
        .enumerate()
        .map(|(position, byte)| {
            alphabet
                .symbol(byte)
                .ok_or_else(|| invalid(WordReason::UnknownSymbol { byte, position }))
        })
        .collect()
}
