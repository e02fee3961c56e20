//! Huffman code construction.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use crate::error::{CodecError, CodecResult, OverflowKind};
use crate::model::FrequencyTable;
use crate::table::{Code, CodeTable};
use crate::types::TableId;

enum Merge {
    Leaf(u16),
    Pair(usize, usize),
}

/// Builds a Huffman code table from symbol frequencies.
///
/// Ties are broken by creation order: leaves rank by ascending symbol,
/// merged nodes rank after every leaf in the order they are created. The
/// first node popped becomes the `0` branch. A single symbol gets the
/// one-bit code `0`.
///
/// # Errors
///
/// - [`CodecError::EmptyFrequencies`] if `frequencies` is empty
/// - [`CodecError::FormatOverflow`] if a code would exceed 64 bits
pub fn build_code_table(frequencies: &FrequencyTable, id: TableId) -> CodecResult<CodeTable> {
    if frequencies.is_empty() {
        return Err(CodecError::EmptyFrequencies { table: id });
    }

    let mut nodes = Vec::with_capacity(frequencies.len() * 2);
    let mut heap = BinaryHeap::with_capacity(frequencies.len());
    for (symbol, count) in frequencies.iter() {
        heap.push(Reverse((count, nodes.len())));
        nodes.push(Merge::Leaf(symbol));
    }

    while heap.len() > 1 {
        let (Some(Reverse((left_weight, left))), Some(Reverse((right_weight, right)))) =
            (heap.pop(), heap.pop())
        else {
            break;
        };
        heap.push(Reverse((left_weight.saturating_add(right_weight), nodes.len())));
        nodes.push(Merge::Pair(left, right));
    }

    let root = nodes.len() - 1;
    let mut codes = BTreeMap::new();
    if let Merge::Leaf(symbol) = nodes[root] {
        codes.insert(symbol, single_bit_code(id)?);
        return CodeTable::from_codes(id, codes);
    }

    let mut stack = vec![(root, 0u64, 0usize)];
    while let Some((index, prefix, depth)) = stack.pop() {
        match nodes[index] {
            Merge::Leaf(symbol) => {
                let checked = u8::try_from(depth).ok().and_then(|len| Code::new(len, prefix));
                let code = checked.ok_or(CodecError::FormatOverflow {
                    kind: OverflowKind::CodeLength,
                    value: depth,
                    max: usize::from(Code::MAX_LEN),
                })?;
                codes.insert(symbol, code);
            }
            Merge::Pair(left, right) => {
                if depth >= usize::from(Code::MAX_LEN) {
                    return Err(CodecError::FormatOverflow {
                        kind: OverflowKind::CodeLength,
                        value: depth + 1,
                        max: usize::from(Code::MAX_LEN),
                    });
                }
                stack.push((right, (prefix << 1) | 1, depth + 1));
                stack.push((left, prefix << 1, depth + 1));
            }
        }
    }

    CodeTable::from_codes(id, codes)
}

fn single_bit_code(id: TableId) -> CodecResult<Code> {
    Code::new(1, 0).ok_or(CodecError::IncompleteTable { table: id })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Context;

    const ID: TableId = TableId::Word(Context::Start);

    fn frequencies(pairs: &[(u16, u64)]) -> FrequencyTable {
        pairs
            .iter()
            .flat_map(|&(symbol, count)| std::iter::repeat(symbol).take(count as usize))
            .collect()
    }

    fn code_string(table: &CodeTable, symbol: u16) -> String {
        let code = table.code(symbol).unwrap();
        (0..code.len())
            .map(|i| if code.bit(i) { '1' } else { '0' })
            .collect()
    }

    #[test]
    fn single_symbol_gets_one_bit() {
        let table = build_code_table(&frequencies(&[(3, 10)]), ID).unwrap();
        assert_eq!(code_string(&table, 3), "0");
        assert!(table.is_degenerate());
    }

    #[test]
    fn two_symbols_split_by_weight() {
        let table = build_code_table(&frequencies(&[(0, 5), (1, 2)]), ID).unwrap();
        // Lighter symbol pops first and takes the 0 branch
        assert_eq!(code_string(&table, 1), "0");
        assert_eq!(code_string(&table, 0), "1");
    }

    #[test]
    fn skewed_distribution_gets_short_code_for_common_symbol() {
        let table =
            build_code_table(&frequencies(&[(0, 50), (1, 10), (2, 10), (3, 5)]), ID).unwrap();
        assert_eq!(table.code(0).unwrap().len(), 1);
        assert!(table.codes().all(|(symbol, code)| symbol == 0 || code.len() > 1));
    }

    #[test]
    fn ties_break_by_symbol_order() {
        let table =
            build_code_table(&frequencies(&[(0, 1), (1, 1), (2, 1), (3, 1)]), ID).unwrap();
        assert_eq!(code_string(&table, 0), "00");
        assert_eq!(code_string(&table, 1), "01");
        assert_eq!(code_string(&table, 2), "10");
        assert_eq!(code_string(&table, 3), "11");
    }

    #[test]
    fn build_is_deterministic() {
        let freq = frequencies(&[(4, 3), (9, 3), (1, 7), (2, 1), (6, 1)]);
        let a = build_code_table(&freq, ID).unwrap();
        let b = build_code_table(&freq, ID).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn codes_satisfy_kraft_equality() {
        let freq = frequencies(&[(0, 13), (1, 1), (2, 4), (3, 4), (4, 9), (5, 2)]);
        let table = build_code_table(&freq, ID).unwrap();
        let sum: f64 = table
            .codes()
            .map(|(_, code)| 0.5f64.powi(i32::from(code.len())))
            .sum();
        assert!((sum - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_frequencies_fail() {
        assert_eq!(
            build_code_table(&FrequencyTable::new(), TableId::Delta),
            Err(CodecError::EmptyFrequencies {
                table: TableId::Delta
            })
        );
    }
}
