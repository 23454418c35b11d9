//! The forward transform and its inverse.
//!
//! ```text
//! encrypt: text -> reverse words -> shift by key -> append key char -> huffman encode
//! decrypt: bits -> huffman decode -> split key char -> unshift -> reverse words
//! ```
//!
//! The tree travels with the [`Encrypted`] result; decryption borrows it. The
//! key does not need to be passed back in because it is the last decoded
//! character.
//!
//! # Example
//! ```
//! use hcr_core::cipher::FixedKey;
//! use hcr_core::pipeline::Pipeline;
//!
//! let pipeline = Pipeline::default();
//! let encrypted = pipeline.encrypt("ab ba", &mut FixedKey(3)).unwrap();
//! assert_eq!(encrypted.cipher_with_key, "ed#dec");
//!
//! let decrypted = pipeline.decrypt(&encrypted.compressed, &encrypted.tree).unwrap();
//! assert_eq!(decrypted.plaintext, "ab ba");
//! ```

use std::time::{Duration, Instant};

use log::debug;

use crate::bitio::pack_bits;
use crate::cipher::{self, KeyScheme, KeySource};
use crate::error::{CipherError, Result};
use crate::huffman::{Codebook, HuffmanTree};

/// Every stage of one encryption.
#[derive(Debug, Clone)]
pub struct Encrypted {
    pub original: String,
    /// Each word reversed, words joined by single spaces
    pub reversed: String,
    /// `reversed` after the additive shift
    pub shifted: String,
    pub key: u8,
    pub key_char: char,
    /// `shifted` followed by `key_char`; this is what gets compressed
    pub cipher_with_key: String,
    /// Symbols of `cipher_with_key`
    pub cipher_symbols: Vec<u8>,
    /// Huffman-encoded `cipher_with_key` as '0'/'1' characters
    pub compressed: String,
    /// Needed to decode `compressed`
    pub tree: HuffmanTree,
    pub codebook: Codebook,
    pub elapsed: Duration,
}

impl Encrypted {
    /// Encoded bits / (compressed characters * 8).
    pub fn compression_ratio(&self) -> f64 {
        self.compressed.len() as f64 / (self.cipher_symbols.len() * 8) as f64
    }

    pub fn bit_len(&self) -> usize {
        self.compressed.len()
    }

    pub fn execution_time_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    /// The compressed bits packed MSB-first into bytes.
    pub fn packed(&self) -> Result<Vec<u8>> {
        pack_bits(&self.compressed)
    }
}

/// Every stage of one decryption.
#[derive(Debug, Clone)]
pub struct Decrypted {
    pub compressed: String,
    /// Huffman-decoded text, key character included
    pub decompressed: String,
    pub key_char: char,
    pub key: u8,
    /// Decoded text without the key character, shift undone
    pub unshifted: String,
    pub plaintext: String,
    pub elapsed: Duration,
}

impl Decrypted {
    pub fn execution_time_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// Reversal, shift and Huffman coding under one key scheme.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pipeline {
    scheme: KeyScheme,
}

impl Pipeline {
    pub fn new(scheme: KeyScheme) -> Self {
        Self { scheme }
    }

    pub fn scheme(&self) -> &KeyScheme {
        &self.scheme
    }

    /// Obscure and compress `plaintext` with a key drawn from `keys`.
    ///
    /// # Errors
    /// - `CipherError::UnsupportedCharacter` for code points above 255
    /// - `CipherError::InvalidKey` if `keys` returns a key outside the scheme
    pub fn encrypt(&self, plaintext: &str, keys: &mut dyn KeySource) -> Result<Encrypted> {
        let start = Instant::now();

        // Reject unsupported characters with their position in the input
        cipher::to_symbols(plaintext)?;

        let reversed = cipher::reverse_words(plaintext);
        let key = keys.next_key(&self.scheme);
        let key_char = self.scheme.key_to_char(key)?;
        debug!("reversed {} chars, key {} ({:?})", reversed.chars().count(), key, key_char);

        let shifted_symbols = cipher::shift(&cipher::to_symbols(&reversed)?, key);
        let shifted = cipher::from_symbols(&shifted_symbols);

        let mut cipher_symbols = shifted_symbols;
        cipher_symbols.push(key + self.scheme.offset());
        let cipher_with_key = cipher::from_symbols(&cipher_symbols);

        let tree = HuffmanTree::build(&cipher_symbols)?;
        let codebook = Codebook::from_tree(&tree);
        let compressed = codebook.encode(&cipher_symbols)?;
        debug!(
            "encoded {} symbols ({} distinct) into {} bits",
            cipher_symbols.len(),
            codebook.len(),
            compressed.len()
        );

        Ok(Encrypted {
            original: plaintext.to_string(),
            reversed,
            shifted,
            key,
            key_char,
            cipher_with_key,
            cipher_symbols,
            compressed,
            tree,
            codebook,
            elapsed: start.elapsed(),
        })
    }

    /// Recover the plaintext from `compressed` and the tree that encoded it.
    ///
    /// A tree from a different message may still decode; the result is
    /// then garbage unless the key check or the decoder catches it.
    ///
    /// # Errors
    /// - Huffman decode errors (`IncompleteCode`, `InvalidBit`, `InvalidCode`)
    /// - `CipherError::MissingKey` if nothing was decoded
    /// - `CipherError::KeyOutOfRange` if the last character is not a key
    pub fn decrypt(&self, compressed: &str, tree: &HuffmanTree) -> Result<Decrypted> {
        let start = Instant::now();

        let decoded = tree.decode(compressed)?;
        let (&key_symbol, body) = decoded.split_last().ok_or(CipherError::MissingKey)?;

        let key_char = char::from(key_symbol);
        let key = self.scheme.char_to_key(key_char)?;
        debug!("decoded {} symbols, key {} ({:?})", decoded.len(), key, key_char);

        let unshifted = cipher::from_symbols(&cipher::unshift(body, key));
        let plaintext = cipher::reverse_words(&unshifted);

        Ok(Decrypted {
            compressed: compressed.to_string(),
            decompressed: cipher::from_symbols(&decoded),
            key_char,
            key,
            unshifted,
            plaintext,
            elapsed: start.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::{FixedKey, RandomKeys};
    use crate::error::{Error, HuffmanError};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_ab_ba_scenario() {
        let pipeline = Pipeline::default();
        let enc = pipeline.encrypt("ab ba", &mut FixedKey(3)).unwrap();

        assert_eq!(enc.reversed, "ba ab");
        assert_eq!(enc.shifted, "ed#de");
        assert_eq!(enc.key, 3);
        assert_eq!(enc.key_char, 'c');
        assert_eq!(enc.cipher_with_key, "ed#dec");

        let dec = pipeline.decrypt(&enc.compressed, &enc.tree).unwrap();
        assert_eq!(dec.decompressed, "ed#dec");
        assert_eq!(dec.key_char, 'c');
        assert_eq!(dec.key, 3);
        assert_eq!(dec.unshifted, "ba ab");
        assert_eq!(dec.plaintext, "ab ba");
    }

    #[test]
    fn test_roundtrip_random_keys() {
        let pipeline = Pipeline::default();
        let mut keys = RandomKeys::new(ChaCha8Rng::seed_from_u64(1));
        let text = "the quick brown fox jumps over the lazy dog";

        for _ in 0..50 {
            let enc = pipeline.encrypt(text, &mut keys).unwrap();
            assert!(pipeline.scheme().contains(enc.key));
            let dec = pipeline.decrypt(&enc.compressed, &enc.tree).unwrap();
            assert_eq!(dec.key, enc.key);
            assert_eq!(dec.plaintext, text);
        }
    }

    #[test]
    fn test_every_letter_key() {
        let pipeline = Pipeline::new(KeyScheme::LETTERS);
        for key in 1..=10 {
            let enc = pipeline.encrypt("hello there", &mut FixedKey(key)).unwrap();
            let dec = pipeline.decrypt(&enc.compressed, &enc.tree).unwrap();
            assert_eq!(dec.key, key);
            assert_eq!(dec.plaintext, "hello there");
        }
    }

    #[test]
    fn test_every_raw_key() {
        let pipeline = Pipeline::new(KeyScheme::RAW);
        for key in 1..=96 {
            let enc = pipeline.encrypt("zebra crossing", &mut FixedKey(key)).unwrap();
            assert_eq!(enc.key_char as u32, key as u32);
            let dec = pipeline.decrypt(&enc.compressed, &enc.tree).unwrap();
            assert_eq!(dec.key, key);
            assert_eq!(dec.plaintext, "zebra crossing");
        }
    }

    #[test]
    fn test_shift_wraps_past_255() {
        let pipeline = Pipeline::new(KeyScheme::RAW);
        let text = "ÿþý üû";
        let enc = pipeline.encrypt(text, &mut FixedKey(90)).unwrap();
        assert_eq!(enc.reversed, "ýþÿ ûü");
        assert_eq!(enc.shifted, "WXYzUV");
        let dec = pipeline.decrypt(&enc.compressed, &enc.tree).unwrap();
        assert_eq!(dec.plaintext, text);
    }

    #[test]
    fn test_single_symbol_text() {
        let pipeline = Pipeline::default();
        let enc = pipeline.encrypt("aaaa", &mut FixedKey(1)).unwrap();
        assert_eq!(enc.cipher_with_key, "bbbba");
        let dec = pipeline.decrypt(&enc.compressed, &enc.tree).unwrap();
        assert_eq!(dec.plaintext, "aaaa");
    }

    #[test]
    fn test_key_char_collides_with_body() {
        // '`' + 3 == 'c', the same symbol as the key character
        let pipeline = Pipeline::default();
        let enc = pipeline.encrypt("````", &mut FixedKey(3)).unwrap();
        assert_eq!(enc.cipher_with_key, "ccccc");
        assert!(enc.tree.root().is_leaf());
        assert_eq!(enc.compressed, "00000");

        let dec = pipeline.decrypt(&enc.compressed, &enc.tree).unwrap();
        assert_eq!(dec.plaintext, "````");
    }

    #[test]
    fn test_empty_text() {
        let pipeline = Pipeline::default();
        let enc = pipeline.encrypt("", &mut FixedKey(5)).unwrap();
        assert_eq!(enc.cipher_with_key, "e");
        assert_eq!(enc.compressed, "0");

        let dec = pipeline.decrypt(&enc.compressed, &enc.tree).unwrap();
        assert_eq!(dec.plaintext, "");
    }

    #[test]
    fn test_skewed_ratio() {
        let pipeline = Pipeline::default();
        let enc = pipeline.encrypt("aaaaaaaab", &mut FixedKey(2)).unwrap();
        assert!(enc.bit_len() > 0);
        assert!(enc.compression_ratio() < 1.0);
        assert_eq!(enc.packed().unwrap().len(), enc.bit_len().div_ceil(8));
    }

    #[test]
    fn test_rejects_wide_characters() {
        let pipeline = Pipeline::default();
        let err = pipeline.encrypt("snow ☃", &mut FixedKey(1)).unwrap_err();
        assert!(matches!(
            err,
            Error::Cipher(CipherError::UnsupportedCharacter { ch: '☃', position: 5 })
        ));
    }

    #[test]
    fn test_rejects_key_outside_scheme() {
        let pipeline = Pipeline::default();
        let err = pipeline.encrypt("abc", &mut FixedKey(11)).unwrap_err();
        assert!(matches!(err, Error::Cipher(CipherError::InvalidKey { key: 11, .. })));
    }

    #[test]
    fn test_truncated_bits() {
        let pipeline = Pipeline::default();
        let enc = pipeline.encrypt("attack at dawn", &mut FixedKey(4)).unwrap();
        let truncated = &enc.compressed[..enc.compressed.len() - 1];

        let err = pipeline.decrypt(truncated, &enc.tree).unwrap_err();
        assert!(matches!(
            err,
            Error::Huffman(HuffmanError::IncompleteCode { .. })
        ));
    }

    #[test]
    fn test_missing_key() {
        let pipeline = Pipeline::default();
        let enc = pipeline.encrypt("abc", &mut FixedKey(4)).unwrap();
        let err = pipeline.decrypt("", &enc.tree).unwrap_err();
        assert!(matches!(err, Error::Cipher(CipherError::MissingKey)));
    }

    #[test]
    fn test_wrong_scheme_on_decrypt() {
        let enc = Pipeline::new(KeyScheme::RAW)
            .encrypt("abc", &mut FixedKey(50))
            .unwrap();
        let err = Pipeline::new(KeyScheme::LETTERS)
            .decrypt(&enc.compressed, &enc.tree)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Cipher(CipherError::KeyOutOfRange { key_char: '2', .. })
        ));
    }
}
