//! Cipher stages around the Huffman coder.
//!
//! - Word reversal: every whitespace-separated word is reversed in place and
//!   the words are rejoined with single spaces. Applying it twice restores
//!   text whose words were already single-space separated and trimmed; any
//!   other spacing is normalised away.
//! - Additive shift: each symbol becomes `(symbol + key) mod 256`.
//! - Key embedding: the key is written as one character, `key + offset`, so
//!   it can travel at the end of the shifted text.
//!
//! Symbols are code points 0-255. Text is mapped one code point per symbol;
//! anything above 255 cannot be shifted and is rejected.
//!
//! None of this is a security boundary: the shift is recovered by anyone who
//! reads the last character.

use std::ops::RangeInclusive;

use rand::Rng;

use crate::error::{CipherError, Error, Result};

/// Reverse the characters of each word, joining words with single spaces.
pub fn reverse_words(text: &str) -> String {
    text.split_whitespace()
        .map(|word| word.chars().rev().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Map text to symbols, one per code point.
///
/// # Errors
/// Returns `CipherError::UnsupportedCharacter` for code points above 255.
pub fn to_symbols(text: &str) -> Result<Vec<u8>> {
    text.chars()
        .enumerate()
        .map(|(position, ch)| {
            u8::try_from(ch)
                .map_err(|_| Error::from(CipherError::UnsupportedCharacter { ch, position }))
        })
        .collect()
}

/// Map symbols back to text, one code point per symbol.
pub fn from_symbols(symbols: &[u8]) -> String {
    symbols.iter().copied().map(char::from).collect()
}

/// Add `key` to every symbol, wrapping at 256.
pub fn shift(symbols: &[u8], key: u8) -> Vec<u8> {
    symbols.iter().map(|s| s.wrapping_add(key)).collect()
}

/// Subtract `key` from every symbol, wrapping at 256.
pub fn unshift(symbols: &[u8], key: u8) -> Vec<u8> {
    symbols.iter().map(|s| s.wrapping_sub(key)).collect()
}

/// Which keys may be drawn and how a key is written as a character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyScheme {
    min: u8,
    max: u8,
    offset: u8,
}

impl KeyScheme {
    /// Keys 1-10 written as 'a'-'j'.
    pub const LETTERS: KeyScheme = KeyScheme {
        min: 1,
        max: 10,
        offset: 96,
    };

    /// Keys 1-96 written as the raw code point of the key.
    pub const RAW: KeyScheme = KeyScheme {
        min: 1,
        max: 96,
        offset: 0,
    };

    /// A custom scheme.
    ///
    /// # Errors
    /// Returns `CipherError::InvalidScheme` if the range is empty or
    /// `max + offset` does not fit in a symbol.
    pub fn new(range: RangeInclusive<u8>, offset: u8) -> Result<Self> {
        let (min, max) = (*range.start(), *range.end());
        if min > max || max.checked_add(offset).is_none() {
            return Err(CipherError::InvalidScheme { range, offset }.into());
        }
        Ok(Self { min, max, offset })
    }

    pub fn range(&self) -> RangeInclusive<u8> {
        self.min..=self.max
    }

    pub fn offset(&self) -> u8 {
        self.offset
    }

    pub fn contains(&self, key: u8) -> bool {
        self.range().contains(&key)
    }

    /// Character that carries `key`.
    ///
    /// # Errors
    /// Returns `CipherError::InvalidKey` if `key` is outside the range.
    pub fn key_to_char(&self, key: u8) -> Result<char> {
        if !self.contains(key) {
            return Err(CipherError::InvalidKey {
                key,
                range: self.range(),
            }
            .into());
        }
        Ok(char::from(key + self.offset))
    }

    /// Key carried by `key_char`.
    ///
    /// # Errors
    /// Returns `CipherError::KeyOutOfRange` if the character does not map to a
    /// key in the range.
    pub fn char_to_key(&self, key_char: char) -> Result<u8> {
        u8::try_from(key_char)
            .ok()
            .and_then(|code| code.checked_sub(self.offset))
            .filter(|&key| self.contains(key))
            .ok_or_else(|| {
                CipherError::KeyOutOfRange {
                    key_char,
                    range: self.range(),
                }
                .into()
            })
    }
}

impl Default for KeyScheme {
    fn default() -> Self {
        Self::LETTERS
    }
}

/// Supplies the key for each encryption.
pub trait KeySource {
    /// Pick a key for `scheme`. Implementations should stay inside
    /// `scheme.range()`; the pipeline rejects anything else.
    fn next_key(&mut self, scheme: &KeyScheme) -> u8;
}

/// Uniformly random keys from any `rand` generator.
#[derive(Debug, Clone)]
pub struct RandomKeys<R> {
    rng: R,
}

impl<R: Rng> RandomKeys<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> KeySource for RandomKeys<R> {
    fn next_key(&mut self, scheme: &KeyScheme) -> u8 {
        self.rng.gen_range(scheme.range())
    }
}

/// Always the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedKey(pub u8);

impl KeySource for FixedKey {
    fn next_key(&mut self, _scheme: &KeyScheme) -> u8 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_reverse_words() {
        assert_eq!(reverse_words("hello world"), "olleh dlrow");
        assert_eq!(reverse_words("ab ba"), "ba ab");
        assert_eq!(reverse_words(""), "");
        assert_eq!(reverse_words(reverse_words("one two three").as_str()), "one two three");
    }

    #[test]
    fn test_reverse_words_normalises_spacing() {
        assert_eq!(reverse_words("  ab   cd\t"), "ba dc");
    }

    #[test]
    fn test_shift_wraps() {
        assert_eq!(shift(&[250, 97], 10), vec![4, 107]);
        assert_eq!(unshift(&[4, 107], 10), vec![250, 97]);
    }

    #[test]
    fn test_symbols() {
        assert_eq!(to_symbols("a é").unwrap(), vec![0x61, 0x20, 0xE9]);
        assert_eq!(from_symbols(&[0x61, 0x20, 0xE9]), "a é");

        match to_symbols("ok €") {
            Err(Error::Cipher(CipherError::UnsupportedCharacter { ch, position })) => {
                assert_eq!(ch, '€');
                assert_eq!(position, 3);
            }
            other => panic!("expected unsupported character, got {:?}", other),
        }
    }

    #[test]
    fn test_letter_keys() {
        let scheme = KeyScheme::LETTERS;
        assert_eq!(scheme.key_to_char(1).unwrap(), 'a');
        assert_eq!(scheme.key_to_char(10).unwrap(), 'j');
        assert_eq!(scheme.char_to_key('c').unwrap(), 3);

        for key in scheme.range() {
            let ch = scheme.key_to_char(key).unwrap();
            assert_eq!(scheme.char_to_key(ch).unwrap(), key);
        }
    }

    #[test]
    fn test_raw_keys() {
        let scheme = KeyScheme::RAW;
        assert_eq!(scheme.range().count(), 96);
        for key in scheme.range() {
            let ch = scheme.key_to_char(key).unwrap();
            assert_eq!(ch as u32, key as u32);
            assert_eq!(scheme.char_to_key(ch).unwrap(), key);
        }
    }

    #[test]
    fn test_key_out_of_range() {
        let scheme = KeyScheme::LETTERS;
        assert!(matches!(
            scheme.char_to_key('k'),
            Err(Error::Cipher(CipherError::KeyOutOfRange { key_char: 'k', .. }))
        ));
        assert!(scheme.char_to_key('`').is_err());
        assert!(scheme.char_to_key('€').is_err());
        assert!(matches!(
            scheme.key_to_char(0),
            Err(Error::Cipher(CipherError::InvalidKey { key: 0, .. }))
        ));
    }

    #[test]
    fn test_invalid_scheme() {
        assert!(KeyScheme::new(5..=4, 0).is_err());
        assert!(KeyScheme::new(1..=200, 96).is_err());
        let scheme = KeyScheme::new(1..=26, 64).unwrap();
        assert_eq!(scheme.key_to_char(1).unwrap(), 'A');
    }

    #[test]
    fn test_random_keys_stay_in_range() {
        let mut keys = RandomKeys::new(ChaCha8Rng::seed_from_u64(7));
        for scheme in [KeyScheme::LETTERS, KeyScheme::RAW] {
            for _ in 0..500 {
                assert!(scheme.contains(keys.next_key(&scheme)));
            }
        }
    }

    #[test]
    fn test_random_keys_deterministic() {
        let mut a = RandomKeys::new(ChaCha8Rng::seed_from_u64(42));
        let mut b = RandomKeys::new(ChaCha8Rng::seed_from_u64(42));
        let scheme = KeyScheme::RAW;
        let first: Vec<u8> = (0..20).map(|_| a.next_key(&scheme)).collect();
        let second: Vec<u8> = (0..20).map(|_| b.next_key(&scheme)).collect();
        assert_eq!(first, second);
    }
}
