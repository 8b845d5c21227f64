//! Symbol frequency counting

use std::collections::BTreeMap;

/// Occurrence count for every distinct symbol of a text
///
/// Symbols are kept in ascending code-point order, which is the order leaves
/// are handed to the tree builder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: BTreeMap<char, u64>,
}

impl FrequencyTable {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts every symbol of `text`
    pub fn from_text(text: &str) -> Self {
        let mut table = Self::new();
        for symbol in text.chars() {
            table.add(symbol, 1);
        }
        table
    }

    /// Adds `count` occurrences of `symbol`
    pub fn add(&mut self, symbol: char, count: u64) {
        *self.counts.entry(symbol).or_insert(0) += count;
    }

    /// Returns the count for a symbol (0 if never seen)
    pub fn get(&self, symbol: char) -> u64 {
        self.counts.get(&symbol).copied().unwrap_or(0)
    }

    /// Number of distinct symbols
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Iterates `(symbol, count)` pairs in ascending code-point order
    pub fn iter(&self) -> impl Iterator<Item = (char, u64)> + '_ {
        self.counts.iter().map(|(&symbol, &count)| (symbol, count))
    }
}
