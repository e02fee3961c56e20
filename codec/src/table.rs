//! Prefix-free code tables and their decode tries.

use std::collections::BTreeMap;

use bitstream::BitBuf;

use crate::error::{CodecError, CodecResult, TableReason};
use crate::types::TableId;

/// A single prefix code: the low `len` bits of `bits`, most significant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code {
    len: u8,
    bits: u64,
}

impl Code {
    /// Longest representable code.
    pub const MAX_LEN: u8 = 64;

    /// Creates a code, or `None` if `len` is 0 or above 64 or `bits` has
    /// set bits above `len`.
    #[must_use]
    pub const fn new(len: u8, bits: u64) -> Option<Self> {
        if len == 0 || len > Self::MAX_LEN {
            return None;
        }
        if len < 64 && bits >> len != 0 {
            return None;
        }
        Some(Self { len, bits })
    }

    #[must_use]
    pub const fn len(self) -> u8 {
        self.len
    }

    #[must_use]
    pub const fn bits(self) -> u64 {
        self.bits
    }

    /// Returns bit `index`, counting from the first emitted bit.
    #[must_use]
    pub const fn bit(self, index: u8) -> bool {
        (self.bits >> (self.len - 1 - index)) & 1 == 1
    }
}

/// Trie node. Branch children are indexed by the next input bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Node {
    Leaf(u16),
    Branch([Option<u32>; 2]),
}

pub(crate) const ROOT: usize = 0;

/// Symbol codes of one context plus the trie that decodes them.
///
/// The trie is built once; decoding a symbol walks it one node per input
/// bit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    id: TableId,
    codes: BTreeMap<u16, Code>,
    nodes: Vec<Node>,
}

impl CodeTable {
    /// Builds a table from explicit codes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::EmptyFrequencies`] for an empty code set and
    /// [`TableReason::PrefixConflict`] if one code is a prefix of another.
    pub fn from_codes(id: TableId, codes: BTreeMap<u16, Code>) -> CodecResult<Self> {
        if codes.is_empty() {
            return Err(CodecError::EmptyFrequencies { table: id });
        }

        let mut nodes = vec![Node::Branch([None, None])];
        for (&symbol, &code) in &codes {
            insert(&mut nodes, symbol, code).ok_or(CodecError::MalformedTable {
                table: id,
                reason: TableReason::PrefixConflict { symbol },
            })?;
        }

        Ok(Self { id, codes, nodes })
    }

    #[must_use]
    pub const fn id(&self) -> TableId {
        self.id
    }

    /// Returns the code for `symbol`.
    #[must_use]
    pub fn code(&self, symbol: u16) -> Option<Code> {
        self.codes.get(&symbol).copied()
    }

    /// Iterates `(symbol, code)` in ascending symbol order.
    pub fn codes(&self) -> impl Iterator<Item = (u16, Code)> + '_ {
        self.codes.iter().map(|(&symbol, &code)| (symbol, code))
    }

    /// Returns the number of coded symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Returns the longest code length in bits.
    #[must_use]
    pub fn max_code_len(&self) -> u8 {
        self.codes.values().map(|code| code.len()).max().unwrap_or(0)
    }

    /// Returns `true` for a one-symbol table whose only code is `0`.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.codes.len() == 1 && self.codes.values().all(|code| code.len() == 1 && code.bits() == 0)
    }

    /// Appends the code for `symbol` to `out`.
    pub fn encode_symbol(&self, symbol: u16, out: &mut BitBuf) -> CodecResult<()> {
        let code = self.code(symbol).ok_or(CodecError::UnknownSymbol {
            table: self.id,
            symbol,
        })?;
        out.push_bits(code.bits(), usize::from(code.len()))?;
        Ok(())
    }

    /// Decodes one symbol from `bits`, returning it with the number of bits
    /// consumed. `bit_offset` is only used for error reporting.
    ///
    /// # Errors
    ///
    /// [`CodecError::NoMatchingCode`] if the bits leave the trie and
    /// [`CodecError::UnexpectedEnd`] if `bits` ends inside a code.
    pub fn decode_symbol<I>(&self, bits: &mut I, bit_offset: usize) -> CodecResult<(u16, usize)>
    where
        I: Iterator<Item = bool>,
    {
        let mut node = ROOT;
        let mut used = 0;
        loop {
            match self.nodes[node] {
                Node::Leaf(symbol) => return Ok((symbol, used)),
                Node::Branch(children) => {
                    let bit = bits.next().ok_or(CodecError::UnexpectedEnd {
                        table: self.id,
                        bit_offset: bit_offset + used,
                    })?;
                    used += 1;
                    node = children[usize::from(bit)].ok_or(CodecError::NoMatchingCode {
                        table: self.id,
                        bit_offset,
                    })? as usize;
                }
            }
        }
    }

    pub(crate) fn node(&self, index: usize) -> Option<Node> {
        self.nodes.get(index).copied()
    }
}

/// Adds one code path to the trie. Returns `None` on a prefix conflict.
fn insert(nodes: &mut Vec<Node>, symbol: u16, code: Code) -> Option<()> {
    let mut node = ROOT;
    for index in 0..code.len() {
        let bit = usize::from(code.bit(index));
        let last = index + 1 == code.len();
        let Node::Branch(children) = nodes[node] else {
            return None;
        };
        match children[bit] {
            Some(_) if last => return None,
            Some(child) => node = child as usize,
            None => {
                let child = u32::try_from(nodes.len()).ok()?;
                nodes.push(if last {
                    Node::Leaf(symbol)
                } else {
                    Node::Branch([None, None])
                });
                if let Node::Branch(children) = &mut nodes[node] {
                    children[bit] = Some(child);
                }
                node = child as usize;
            }
        }
    }
    Some(())
}
