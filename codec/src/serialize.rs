//! Byte-oriented trie serialization of code tables.
//!
//! A table is written as its binary trie in preorder:
//!
//! - leaf: `(symbol << 1) | 1`
//! - branch: `(offset << 1) | 0`, then the `0` subtree, then the `1` subtree,
//!   where `offset` is the byte length of the `0` subtree plus one
//!
//! A root that is a single leaf byte is the one-symbol table whose only code
//! is `0`. Offsets and symbols are 7-bit, so no `0` subtree may exceed 126
//! bytes and no symbol may exceed 127.

use std::collections::BTreeMap;
use std::iter;

use log::trace;
use wire::Stream;

use crate::delta::{DeltaCoder, MAX_ZERO_COUNT};
use crate::error::{CodecError, CodecResult, OverflowKind, TableReason};
use crate::table::{Code, CodeTable, Node, ROOT};
use crate::types::{Context, Symbol, TableId};
use crate::word::WordCodec;

/// Largest value a 7-bit offset or leaf field can hold.
pub const MAX_FIELD: usize = 127;

/// Serializes one table.
///
/// # Errors
///
/// - [`CodecError::FormatOverflow`] if a subtree offset or symbol does not
///   fit in 7 bits
/// - [`CodecError::IncompleteTable`] if the code is not a full binary tree
pub fn encode_table(table: &CodeTable) -> CodecResult<Vec<u8>> {
    let mut out = Vec::with_capacity(table.len() * 2);
    if table.is_degenerate() {
        let (symbol, _) = table
            .codes()
            .next()
            .ok_or(CodecError::IncompleteTable { table: table.id() })?;
        out.push(leaf_byte(symbol)?);
    } else {
        write_node(table, ROOT, &mut out)?;
    }
    Ok(out)
}

fn write_node(table: &CodeTable, index: usize, out: &mut Vec<u8>) -> CodecResult<()> {
    match table.node(index) {
        Some(Node::Leaf(symbol)) => out.push(leaf_byte(symbol)?),
        Some(Node::Branch([Some(zero), Some(one)])) => {
            let at = out.len();
            out.push(0);
            write_node(table, zero as usize, out)?;
            let offset = out.len() - at;
            if offset > MAX_FIELD {
                return Err(CodecError::FormatOverflow {
                    kind: OverflowKind::SubtreeOffset,
                    value: offset,
                    max: MAX_FIELD,
                });
            }
            // offset <= 127 checked above
            out[at] = (offset as u8) << 1;
            write_node(table, one as usize, out)?;
        }
        _ => return Err(CodecError::IncompleteTable { table: table.id() }),
    }
    Ok(())
}

fn leaf_byte(symbol: u16) -> CodecResult<u8> {
    u8::try_from(symbol)
        .ok()
        .filter(|&symbol| usize::from(symbol) <= MAX_FIELD)
        .map(|symbol| (symbol << 1) | 1)
        .ok_or(CodecError::FormatOverflow {
            kind: OverflowKind::LeafSymbol,
            value: usize::from(symbol),
            max: MAX_FIELD,
        })
}

/// Deserializes one table from the front of `bytes`.
///
/// Symbols must be below `symbol_limit`. Returns the table and the number of
/// bytes it occupied.
pub fn decode_table(
    bytes: &[u8],
    id: TableId,
    symbol_limit: usize,
) -> CodecResult<(CodeTable, usize)> {
    let mut parser = Parser {
        bytes,
        id,
        symbol_limit,
        codes: BTreeMap::new(),
    };

    let first = parser.byte(0)?;
    let end = if first & 1 == 1 {
        let symbol = parser.leaf_symbol(first)?;
        parser.insert(symbol, 1, 0)?;
        1
    } else {
        parser.branch(0, first, 0, 0)?
    };

    let table = CodeTable::from_codes(id, parser.codes)?;
    Ok((table, end))
}

struct Parser<'a> {
    bytes: &'a [u8],
    id: TableId,
    symbol_limit: usize,
    codes: BTreeMap<u16, Code>,
}

impl Parser<'_> {
    fn malformed(&self, reason: TableReason) -> CodecError {
        CodecError::MalformedTable {
            table: self.id,
            reason,
        }
    }

    fn byte(&self, position: usize) -> CodecResult<u8> {
        self.bytes
            .get(position)
            .copied()
            .ok_or_else(|| self.malformed(TableReason::Truncated { position }))
    }

    fn leaf_symbol(&self, byte: u8) -> CodecResult<u16> {
        let symbol = u16::from(byte >> 1);
        if usize::from(symbol) >= self.symbol_limit {
            return Err(self.malformed(TableReason::SymbolOutOfRange {
                symbol,
                alphabet_len: self.symbol_limit,
            }));
        }
        Ok(symbol)
    }

    fn insert(&mut self, symbol: u16, depth: usize, prefix: u64) -> CodecResult<()> {
        let code = u8::try_from(depth)
            .ok()
            .and_then(|len| Code::new(len, prefix))
            .ok_or_else(|| self.malformed(TableReason::TooDeep { depth }))?;
        if self.codes.insert(symbol, code).is_some() {
            return Err(self.malformed(TableReason::DuplicateSymbol { symbol }));
        }
        Ok(())
    }

    /// Parses the node at `position`, returning the position just past it.
    fn node(&mut self, position: usize, depth: usize, prefix: u64) -> CodecResult<usize> {
        let byte = self.byte(position)?;
        if byte & 1 == 1 {
            let symbol = self.leaf_symbol(byte)?;
            self.insert(symbol, depth, prefix)?;
            Ok(position + 1)
        } else {
            self.branch(position, byte, depth, prefix)
        }
    }

    fn branch(&mut self, position: usize, byte: u8, depth: usize, prefix: u64) -> CodecResult<usize> {
        let offset = usize::from(byte >> 1);
        if offset == 0 {
            return Err(self.malformed(TableReason::ZeroOffset { position }));
        }
        if depth >= usize::from(Code::MAX_LEN) {
            return Err(self.malformed(TableReason::TooDeep { depth: depth + 1 }));
        }

        let zero_end = self.node(position + 1, depth + 1, prefix << 1)?;
        if zero_end != position + offset {
            return Err(self.malformed(TableReason::OffsetMismatch {
                expected: position + offset,
                actual: zero_end,
            }));
        }
        self.node(zero_end, depth + 1, (prefix << 1) | 1)
    }
}

/// Serializes every word table in canonical context order, then the delta
/// table.
pub fn encode_tables(codec: &WordCodec, delta: &DeltaCoder) -> CodecResult<Vec<u8>> {
    let mut out = Vec::new();
    for table in codec.tables().chain(iter::once(delta.table())) {
        let bytes = encode_table(table)?;
        trace!(
            "{}: {} symbols, max code {} bits, {} bytes",
            table.id(),
            table.len(),
            table.max_code_len(),
            bytes.len()
        );
        out.extend_from_slice(&bytes);
    }
    Ok(out)
}

/// Parses a table blob written by [`encode_tables`].
///
/// `table_mask[i]` says whether the context following symbol `i` has a
/// table. The blob must be consumed exactly.
pub fn decode_tables(
    bytes: &[u8],
    alphabet_len: usize,
    table_mask: &[bool],
) -> CodecResult<(WordCodec, DeltaCoder)> {
    let contexts = iter::once(Context::Start).chain(
        table_mask
            .iter()
            .enumerate()
            .filter(|&(_, &present)| present)
            .filter_map(|(index, _)| u8::try_from(index).ok())
            .map(|index| Context::After(Symbol::new(index))),
    );

    let mut position = 0;
    let mut tables = BTreeMap::new();
    for context in contexts {
        let id = TableId::Word(context);
        let (table, used) = decode_table(remaining(bytes, position), id, alphabet_len)?;
        trace!("{id}: {} symbols from {used} bytes", table.len());
        tables.insert(context, table);
        position += used;
    }

    let (delta, used) = decode_table(
        remaining(bytes, position),
        TableId::Delta,
        usize::from(MAX_ZERO_COUNT) + 1,
    )?;
    position += used;

    if position != bytes.len() {
        return Err(CodecError::TrailingData {
            stream: Stream::Tables,
            bits: (bytes.len() - position) * 8,
        });
    }

    Ok((WordCodec::from_tables(tables), DeltaCoder::from_table(delta)))
}

fn remaining(bytes: &[u8], position: usize) -> &[u8] {
    bytes.get(position..).unwrap_or_default()
}
