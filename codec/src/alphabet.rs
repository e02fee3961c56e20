//! Symbol alphabets.

use crate::error::{CodecError, CodecResult};
use crate::types::Symbol;

const ASCII_LEN: usize = 128;

/// An ordered set of distinct ASCII bytes.
///
/// The position of a byte in the alphabet is its [`Symbol`] index. At most
/// 127 bytes are allowed so that every index fits a 7-bit table leaf.
#[derive(Clone, PartialEq, Eq)]
pub struct Alphabet {
    bytes: Vec<u8>,
    index: [Option<Symbol>; ASCII_LEN],
}

impl Alphabet {
    /// Creates an alphabet from its bytes, in symbol order.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidAlphabet`] for an empty, oversized, or
    /// duplicated alphabet and [`CodecError::NonAsciiSymbol`] for bytes
    /// above 0x7F.
    pub fn new(bytes: &[u8]) -> CodecResult<Self> {
        wire::validate_alphabet(bytes).map_err(|reason| CodecError::InvalidAlphabet { reason })?;

        let mut index = [None; ASCII_LEN];
        for (position, &byte) in bytes.iter().enumerate() {
            let slot = index
                .get_mut(byte as usize)
                .ok_or(CodecError::NonAsciiSymbol { byte })?;
            // validate_alphabet bounds the length to 127
            *slot = Some(Symbol::new(position as u8));
        }

        Ok(Self {
            bytes: bytes.to_vec(),
            index,
        })
    }

    /// The 26 uppercase Latin letters.
    #[must_use]
    pub fn latin_uppercase() -> Self {
        Self::from_range(b'A'..=b'Z')
    }

    /// The 26 lowercase Latin letters.
    #[must_use]
    pub fn latin_lowercase() -> Self {
        Self::from_range(b'a'..=b'z')
    }

    fn from_range(range: std::ops::RangeInclusive<u8>) -> Self {
        let bytes: Vec<u8> = range.collect();
        let mut index = [None; ASCII_LEN];
        for (position, &byte) in bytes.iter().enumerate() {
            index[byte as usize] = Some(Symbol::new(position as u8));
        }
        Self { bytes, index }
    }

    /// Returns the number of symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always `false`; alphabets hold at least one symbol.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the bytes in symbol order.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Looks up the symbol for `byte`.
    #[must_use]
    pub fn symbol(&self, byte: u8) -> Option<Symbol> {
        self.index.get(byte as usize).copied().flatten()
    }

    /// Looks up the byte for `symbol`.
    #[must_use]
    pub fn byte(&self, symbol: Symbol) -> Option<u8> {
        self.bytes.get(symbol.index() as usize).copied()
    }

    /// Renders symbols as a string. Symbols outside the alphabet are skipped.
    #[must_use]
    pub fn render(&self, symbols: &[Symbol]) -> String {
        symbols
            .iter()
            .filter_map(|&symbol| self.byte(symbol))
            .map(char::from)
            .collect()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::latin_uppercase()
    }
}

impl std::fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Alphabet")
            .field(&String::from_utf8_lossy(&self.bytes))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wire::AlphabetReason;

    #[test]
    fn latin_uppercase_maps_in_order() {
        let alphabet = Alphabet::latin_uppercase();
        assert_eq!(alphabet.len(), 26);
        assert_eq!(alphabet.symbol(b'A'), Some(Symbol::new(0)));
        assert_eq!(alphabet.symbol(b'Z'), Some(Symbol::new(25)));
        assert_eq!(alphabet.symbol(b'a'), None);
        assert_eq!(alphabet.byte(Symbol::new(2)), Some(b'C'));
        assert_eq!(alphabet.byte(Symbol::new(26)), None);
    }

    #[test]
    fn custom_alphabet_uses_given_order() {
        let alphabet = Alphabet::new(b"zyx").unwrap();
        assert_eq!(alphabet.symbol(b'z'), Some(Symbol::new(0)));
        assert_eq!(alphabet.symbol(b'x'), Some(Symbol::new(2)));
        assert_eq!(
            alphabet.render(&[Symbol::new(2), Symbol::new(0)]),
            "xz".to_string()
        );
    }

    #[test]
    fn rejects_invalid_alphabets() {
        assert_eq!(
            Alphabet::new(b""),
            Err(CodecError::InvalidAlphabet {
                reason: AlphabetReason::Empty
            })
        );
        assert!(matches!(
            Alphabet::new(b"ABA"),
            Err(CodecError::InvalidAlphabet {
                reason: AlphabetReason::DuplicateSymbol { byte: b'A' }
            })
        ));
        assert_eq!(
            Alphabet::new(&[b'A', 0xC3]),
            Err(CodecError::NonAsciiSymbol { byte: 0xC3 })
        );
    }

    #[test]
    fn largest_alphabet_is_accepted() {
        let bytes: Vec<u8> = (0..127).collect();
        let alphabet = Alphabet::new(&bytes).unwrap();
        assert_eq!(alphabet.symbol(126), Some(Symbol::new(126)));
    }

    #[test]
    fn debug_shows_bytes() {
        let alphabet = Alphabet::new(b"AB").unwrap();
        assert_eq!(format!("{alphabet:?}"), "Alphabet(\"AB\")");
    }
}
