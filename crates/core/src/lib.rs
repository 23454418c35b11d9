//! hcr-core: word reversal, an additive shift cipher and Huffman coding
//! chained into one reversible text pipeline.
//!
//! The forward direction obscures a message (reverse every word, shift every
//! character by a random key, append the key as a character) and then
//! compresses it with a Huffman code built for that exact text. The inverse
//! decodes with the same tree, reads the key back from the last character
//! and undoes each step.
//!
//! # Architecture
//!
//! - `frequency`: symbol counts with first-appearance order
//! - `huffman`: tree construction, code table, bitstring encode/decode
//! - `bitio`: packing '0'/'1' bitstrings into bytes
//! - `cipher`: word reversal, additive shift, key schemes and key sources
//! - `pipeline`: the forward transform and its inverse
//! - `metrics`: size, code quality and timing of a run
//!
//! # Design Principles
//!
//! - **No panics**: All errors are structured and returned to the caller
//! - **Deterministic**: ties in the tree builder break by first appearance, and
//!   keys come from an explicit [`cipher::KeySource`] that can be seeded or fixed
//! - **Not security**: the cipher hides nothing from anyone who looks

pub mod bitio;
pub mod cipher;
pub mod error;
pub mod frequency;
pub mod huffman;
pub mod metrics;
pub mod pipeline;

// Re-export commonly used types
pub use error::{Error, Result};
pub use pipeline::{Decrypted, Encrypted, Pipeline};
