//! Core types for the codec.

use std::fmt;

/// A symbol index into an [`Alphabet`](crate::Alphabet).
///
/// Indices are assigned in alphabet order, so comparing symbols compares
/// their position in the alphabet, not their byte values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Symbol(u8);

impl Symbol {
    /// Creates a symbol from its alphabet index.
    #[must_use]
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Returns the alphabet index.
    #[must_use]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Returns the index widened to a code table symbol.
    #[must_use]
    pub const fn table_symbol(self) -> u16 {
        self.0 as u16
    }
}

impl From<u8> for Symbol {
    fn from(index: u8) -> Self {
        Self(index)
    }
}

impl From<Symbol> for u8 {
    fn from(symbol: Symbol) -> Self {
        symbol.0
    }
}

/// The coding context of the next symbol.
///
/// The derived ordering (`Start` first, then `After` by symbol index) is the
/// canonical order in which word tables appear in the table blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Context {
    /// The first symbol of a word.
    Start,
    /// Any later symbol; carries the symbol emitted just before it.
    After(Symbol),
}

impl Context {
    /// Returns the context that follows emitting `symbol`.
    #[must_use]
    pub const fn next(symbol: Symbol) -> Self {
        Self::After(symbol)
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => write!(f, "start"),
            Self::After(symbol) => write!(f, "after #{}", symbol.index()),
        }
    }
}

/// Identifies a code table in errors and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TableId {
    /// A per-context symbol table.
    Word(Context),
    /// The zero-count delta table.
    Delta,
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Word(context) => write!(f, "word table ({context})"),
            Self::Delta => write!(f, "delta table"),
        }
    }
}
