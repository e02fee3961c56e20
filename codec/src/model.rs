//! Per-build symbol statistics.

use std::collections::BTreeMap;

use crate::corpus::Corpus;
use crate::types::Context;

/// Occurrence counts of table symbols.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<u16, u64>,
}

impl FrequencyTable {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            counts: BTreeMap::new(),
        }
    }

    /// Counts one occurrence of `symbol`.
    pub fn record(&mut self, symbol: u16) {
        *self.counts.entry(symbol).or_insert(0) += 1;
    }

    /// Returns the count for `symbol`, zero if never seen.
    #[must_use]
    pub fn get(&self, symbol: u16) -> u64 {
        self.counts.get(&symbol).copied().unwrap_or(0)
    }

    /// Returns the number of distinct symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates `(symbol, count)` in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, u64)> + '_ {
        self.counts.iter().map(|(&symbol, &count)| (symbol, count))
    }
}

impl FromIterator<u16> for FrequencyTable {
    fn from_iter<T: IntoIterator<Item = u16>>(iter: T) -> Self {
        let mut table = Self::new();
        for symbol in iter {
            table.record(symbol);
        }
        table
    }
}

/// Order-1 symbol frequencies, one table per observed context.
///
/// Built once per encode and consumed by value; nothing is shared between
/// builds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextModel {
    tables: BTreeMap<Context, FrequencyTable>,
}

impl ContextModel {
    /// Counts every `(context, next symbol)` pair of the corpus.
    #[must_use]
    pub fn from_corpus(corpus: &Corpus) -> Self {
        let mut model = Self::default();
        for word in corpus.words() {
            let mut context = Context::Start;
            for &symbol in word {
                model
                    .tables
                    .entry(context)
                    .or_default()
                    .record(symbol.table_symbol());
                context = Context::next(symbol);
            }
        }
        model
    }

    /// Returns the frequencies observed after `context`.
    #[must_use]
    pub fn get(&self, context: Context) -> Option<&FrequencyTable> {
        self.tables.get(&context)
    }

    /// Returns the number of observed contexts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Iterates contexts in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Context, &FrequencyTable)> + '_ {
        self.tables.iter().map(|(&context, table)| (context, table))
    }
}
