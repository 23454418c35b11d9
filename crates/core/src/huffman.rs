//! Huffman tree construction, code assignment, encoding and decoding.
//!
//! The tree is built greedily from a [`FrequencyTable`]: every distinct
//! symbol starts as a leaf in a min-priority queue, and the two lightest
//! nodes are merged until one root remains. Codes are the root-to-leaf paths
//! (left = `'0'`, right = `'1'`), so the table is prefix-free by construction.
//!
//! # Determinism
//!
//! Queue entries are ordered by `(weight, sequence)`. Leaves get sequence
//! numbers in first-appearance order and merged nodes get the next free
//! number, so equal weights always pop in the same order. The first node
//! popped becomes the left child.
//!
//! # Single-symbol input
//!
//! With one distinct symbol the root is itself a leaf. Its path is empty, which
//! would be an undecodable zero-length code, so it is assigned `"0"` instead
//! and the decoder emits the symbol once per `'0'`.
//!
//! # Example
//! ```
//! use hcr_core::huffman::{Codebook, HuffmanTree};
//!
//! let tree = HuffmanTree::build(b"abracadabra").unwrap();
//! let codebook = Codebook::from_tree(&tree);
//! let bits = codebook.encode(b"abracadabra").unwrap();
//! assert_eq!(tree.decode(&bits).unwrap(), b"abracadabra");
//! ```

use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BinaryHeap};
use std::fmt::Write as _;

use log::trace;

use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;

/// A node of the Huffman tree.
///
/// Internal nodes exclusively own both children; the tree has no back-edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode {
    Leaf {
        symbol: u8,
        weight: usize,
    },
    Internal {
        weight: usize,
        left: Box<HuffNode>,
        right: Box<HuffNode>,
    },
}

impl HuffNode {
    pub fn weight(&self) -> usize {
        match self {
            HuffNode::Leaf { weight, .. } | HuffNode::Internal { weight, .. } => *weight,
        }
    }

    /// Join two subtrees under a new internal node; `left` takes the `'0'` branch.
    pub fn merge(left: Self, right: Self) -> Self {
        HuffNode::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }
}

/// Priority queue entry: lightest weight first, then lowest sequence.
#[derive(Debug)]
struct QueuedNode {
    node: HuffNode,
    key: Reverse<(usize, u64)>,
}

impl QueuedNode {
    fn new(node: HuffNode, sequence: u64) -> Self {
        let key = Reverse((node.weight(), sequence));
        Self { node, key }
    }
}

impl PartialEq for QueuedNode {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for QueuedNode {}

impl PartialOrd for QueuedNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueuedNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; the Reverse key turns it into a min-heap
        self.key.cmp(&other.key)
    }
}

/// An immutable Huffman tree.
///
/// The tree is required for decoding: the bitstring alone does not carry it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: HuffNode,
}

impl HuffmanTree {
    /// Count `symbols` and build the tree for their frequencies.
    ///
    /// # Errors
    /// Returns `HuffmanError::EmptyInput` if `symbols` is empty.
    pub fn build(symbols: &[u8]) -> Result<Self> {
        Self::from_frequencies(&FrequencyTable::from_symbols(symbols))
    }

    /// Build the tree for an existing frequency table.
    ///
    /// # Errors
    /// Returns `HuffmanError::EmptyInput` if the table counted nothing.
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Result<Self> {
        let mut queue = BinaryHeap::with_capacity(frequencies.distinct());
        let mut sequence = 0u64;

        for (symbol, weight) in frequencies.iter() {
            queue.push(QueuedNode::new(HuffNode::Leaf { symbol, weight }, sequence));
            sequence += 1;
        }

        loop {
            let first = queue.pop().ok_or(HuffmanError::EmptyInput)?;
            let Some(second) = queue.pop() else {
                return Ok(Self { root: first.node });
            };

            trace!(
                "merging weights {} + {} (sequence {})",
                first.node.weight(),
                second.node.weight(),
                sequence
            );
            queue.push(QueuedNode::new(HuffNode::merge(first.node, second.node), sequence));
            sequence += 1;
        }
    }

    pub fn root(&self) -> &HuffNode {
        &self.root
    }

    /// Total weight, i.e. the number of symbols the tree was built from.
    pub fn weight(&self) -> usize {
        self.root.weight()
    }

    /// Number of leaves (distinct symbols).
    pub fn symbol_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            match node {
                HuffNode::Leaf { .. } => count += 1,
                HuffNode::Internal { left, right, .. } => {
                    stack.push(left.as_ref());
                    stack.push(right.as_ref());
                }
            }
        }
        count
    }

    /// Length of the longest root-to-leaf path (0 for a leaf root).
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(&self.root, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            match node {
                HuffNode::Leaf { .. } => deepest = deepest.max(depth),
                HuffNode::Internal { left, right, .. } => {
                    stack.push((left.as_ref(), depth + 1));
                    stack.push((right.as_ref(), depth + 1));
                }
            }
        }
        deepest
    }

    /// Decode a `'0'`/`'1'` bitstring produced with this tree's codes.
    ///
    /// Walks from the root one bit at a time, emitting a symbol and resetting
    /// to the root whenever a leaf is reached.
    ///
    /// # Errors
    /// - `HuffmanError::InvalidBit` for any character other than `'0'`/`'1'`
    /// - `HuffmanError::InvalidCode` for a `'1'` when the root is a leaf
    /// - `HuffmanError::IncompleteCode` if the bitstring stops mid-path
    pub fn decode(&self, bits: &str) -> Result<Vec<u8>> {
        let mut decoded = Vec::new();

        if let HuffNode::Leaf { symbol, .. } = self.root {
            for (position, bit) in bits.chars().enumerate() {
                match bit {
                    '0' => decoded.push(symbol),
                    '1' => return Err(HuffmanError::InvalidCode { position }.into()),
                    found => return Err(HuffmanError::InvalidBit { position, found }.into()),
                }
            }
            return Ok(decoded);
        }

        let mut node = &self.root;
        let mut pending = 0usize;

        for (position, bit) in bits.chars().enumerate() {
            let HuffNode::Internal { left, right, .. } = node else {
                return Err(HuffmanError::InvalidCode { position }.into());
            };

            node = match bit {
                '0' => left.as_ref(),
                '1' => right.as_ref(),
                found => return Err(HuffmanError::InvalidBit { position, found }.into()),
            };
            pending += 1;

            if let HuffNode::Leaf { symbol, .. } = node {
                decoded.push(*symbol);
                node = &self.root;
                pending = 0;
            }
        }

        if pending > 0 {
            return Err(HuffmanError::IncompleteCode {
                trailing_bits: pending,
            }
            .into());
        }

        Ok(decoded)
    }

    /// Indented text dump of the tree, one node per line.
    pub fn render(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![(&self.root, 0usize, "root")];

        while let Some((node, depth, label)) = stack.pop() {
            let indent = "  ".repeat(depth);
            match node {
                HuffNode::Leaf { symbol, weight } => {
                    let _ = writeln!(
                        out,
                        "{indent}{label} -> leaf '{}' ({symbol:#04x}) [weight: {weight}]",
                        char::from(*symbol).escape_default()
                    );
                }
                HuffNode::Internal { weight, left, right } => {
                    let _ = writeln!(out, "{indent}{label} -> internal [weight: {weight}]");
                    stack.push((right.as_ref(), depth + 1, "1"));
                    stack.push((left.as_ref(), depth + 1, "0"));
                }
            }
        }

        out
    }
}

/// Mapping from symbol to its code, as a `'0'`/`'1'` string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Codebook {
    codes: BTreeMap<u8, String>,
}

impl Codebook {
    /// Assign every leaf its root path.
    ///
    /// Traversal uses an explicit stack that owns the partial path for each
    /// pending node. A leaf root gets `"0"`.
    pub fn from_tree(tree: &HuffmanTree) -> Self {
        let mut codes = BTreeMap::new();
        let mut stack = vec![(tree.root(), String::new())];

        while let Some((node, path)) = stack.pop() {
            match node {
                HuffNode::Leaf { symbol, .. } => {
                    let code = if path.is_empty() { "0".to_string() } else { path };
                    codes.insert(*symbol, code);
                }
                HuffNode::Internal { left, right, .. } => {
                    stack.push((right.as_ref(), format!("{path}1")));
                    let mut left_path = path;
                    left_path.push('0');
                    stack.push((left.as_ref(), left_path));
                }
            }
        }

        Self { codes }
    }

    /// Code for `symbol`, if it has one.
    pub fn get(&self, symbol: u8) -> Option<&str> {
        self.codes.get(&symbol).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// `(symbol, code)` pairs in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, &str)> + '_ {
        self.codes.iter().map(|(&symbol, code)| (symbol, code.as_str()))
    }

    /// Concatenate the code of every symbol, in order.
    ///
    /// # Errors
    /// Returns `HuffmanError::UnknownSymbol` for a symbol with no code.
    pub fn encode(&self, symbols: &[u8]) -> Result<String> {
        let mut bits = String::new();
        for (position, &symbol) in symbols.iter().enumerate() {
            let code = self
                .codes
                .get(&symbol)
                .ok_or(HuffmanError::UnknownSymbol { symbol, position })?;
            bits.push_str(code);
        }
        Ok(bits)
    }

    /// Frequency-weighted mean code length in bits per symbol.
    ///
    /// Symbols in `frequencies` without a code are ignored.
    pub fn average_code_length(&self, frequencies: &FrequencyTable) -> f64 {
        let mut bits = 0usize;
        let mut symbols = 0usize;
        for (symbol, count) in frequencies.iter() {
            if let Some(code) = self.codes.get(&symbol) {
                bits += code.len() * count;
                symbols += count;
            }
        }

        if symbols == 0 {
            0.0
        } else {
            bits as f64 / symbols as f64
        }
    }

    /// True if no code is a prefix of another.
    pub fn is_prefix_free(&self) -> bool {
        self.codes.iter().all(|(a, code_a)| {
            self.codes
                .iter()
                .all(|(b, code_b)| a == b || !code_b.starts_with(code_a.as_str()))
        })
    }
}
