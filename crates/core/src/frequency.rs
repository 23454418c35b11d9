//! Symbol frequency model.
//!
//! Counts how often each symbol occurs and remembers the order in which
//! distinct symbols were first seen. The tree builder uses that order to break
//! ties between equal weights, which keeps tree shape (and therefore every
//! code) deterministic for a given input.

/// Occurrence counts for the 256 possible symbols.
#[derive(Debug, Clone)]
pub struct FrequencyTable {
    counts: [usize; 256],
    /// Distinct symbols in first-appearance order
    order: Vec<u8>,
    total: usize,
}

impl FrequencyTable {
    /// Count every symbol in `symbols`.
    pub fn from_symbols(symbols: &[u8]) -> Self {
        let mut counts = [0usize; 256];
        let mut order = Vec::new();

        for &symbol in symbols {
            if counts[symbol as usize] == 0 {
                order.push(symbol);
            }
            counts[symbol as usize] += 1;
        }

        Self {
            counts,
            order,
            total: symbols.len(),
        }
    }

    /// Occurrences of `symbol` (0 if never seen).
    pub fn count(&self, symbol: u8) -> usize {
        self.counts[symbol as usize]
    }

    /// Number of distinct symbols.
    pub fn distinct(&self) -> usize {
        self.order.len()
    }

    /// Total number of symbols counted.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// `(symbol, count)` pairs in first-appearance order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, usize)> + '_ {
        self.order.iter().map(|&s| (s, self.counts[s as usize]))
    }
}
