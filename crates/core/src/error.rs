//! Error types for the hcr pipeline.
//!
//! All operations return structured errors rather than panicking. Every
//! failure is a local precondition violation: nothing here is transient, so
//! callers get the error immediately and nothing is retried.

use std::ops::RangeInclusive;
use thiserror::Error;

/// Top-level error type for all operations in the system.
///
/// Each variant corresponds to a specific failure domain:
/// - Huffman: tree construction, encoding or decoding
/// - Cipher: shift/key handling around the coder
/// - Bit I/O: packing bitstrings into bytes and back
/// - I/O: reading the message from the terminal
#[derive(Debug, Error)]
pub enum Error {
    /// Huffman codec error (e.g., empty input, truncated bitstring)
    #[error("huffman codec error: {0}")]
    Huffman(#[from] HuffmanError),

    /// Cipher error (e.g., unsupported character, bad key character)
    #[error("cipher error: {0}")]
    Cipher(#[from] CipherError),

    /// Bit packing error
    #[error("bit I/O error: {0}")]
    BitIo(#[from] BitIoError),

    /// Terminal I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Huffman codec errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HuffmanError {
    /// No symbols to count, so there is nothing to build a tree from
    #[error("empty input: cannot build a huffman tree")]
    EmptyInput,

    /// The code table has no entry for a symbol in the input
    #[error("symbol {symbol:#04x} at position {position} has no code")]
    UnknownSymbol { symbol: u8, position: usize },

    /// The bitstring ended part way down the tree
    #[error("bitstring ends mid-code ({trailing_bits} unterminated bits)")]
    IncompleteCode { trailing_bits: usize },

    /// A character other than '0' or '1' in the bitstring
    #[error("invalid bit {found:?} at position {position}")]
    InvalidBit { position: usize, found: char },

    /// The bit at this position cannot start or continue any code
    #[error("invalid huffman code at bit position {position}")]
    InvalidCode { position: usize },
}

/// Cipher errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// Only code points 0-255 can be shifted and coded
    #[error("character {ch:?} at position {position} is outside the 0-255 range")]
    UnsupportedCharacter { ch: char, position: usize },

    /// Decoded text is empty, so there is no trailing key character
    #[error("decoded text has no key character")]
    MissingKey,

    /// The trailing character does not map to a key of this scheme
    #[error("key character {key_char:?} does not encode a key in {}..={}", .range.start(), .range.end())]
    KeyOutOfRange {
        key_char: char,
        range: RangeInclusive<u8>,
    },

    /// A key source produced a key the scheme cannot carry
    #[error("key {key} is outside {}..={}", .range.start(), .range.end())]
    InvalidKey { key: u8, range: RangeInclusive<u8> },

    /// A key scheme whose range contains no keys, or whose key characters overflow 255
    #[error("key range {}..={} with offset {offset} is not usable", .range.start(), .range.end())]
    InvalidScheme {
        range: RangeInclusive<u8>,
        offset: u8,
    },
}

/// Bit packing errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BitIoError {
    /// Attempted to read past the end of the buffer
    #[error("unexpected end of bit stream")]
    UnexpectedEof,

    /// Requested more bits than the buffer can hold
    #[error("invalid bit count {count} for {bytes} bytes")]
    InvalidBitCount { count: usize, bytes: usize },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;
