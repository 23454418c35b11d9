//! Sample text generation.
//!
//! When `--sample` is given instead of a message, a sentence is generated
//! from a seeded RNG. The vocabulary mixes short, repetitive words with a few
//! rarer ones so the Huffman code has a skewed distribution to work with.
//!
//! Words are joined by single spaces with no leading or trailing whitespace,
//! which is exactly the shape of text that survives a round trip unchanged.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Frequent words, drawn most of the time.
const COMMON: &[&str] = &[
    "the", "a", "of", "and", "to", "in", "is", "it", "that", "was",
];

/// Less frequent words, including some Latin-1 characters.
const RARE: &[&str] = &[
    "huffman", "cipher", "caesar", "reversal", "prefix", "entropy", "café", "naïve", "zebra",
    "quartz", "jukebox", "fjord",
];

/// Generate `words` words of sample text.
///
/// # Arguments
/// - `seed`: random seed for determinism
/// - `words`: number of words to generate
pub fn generate_sample_text(seed: u64, words: usize) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut out: Vec<&str> = Vec::with_capacity(words);

    for _ in 0..words {
        // 70% common, 30% rare
        let pool = if rng.gen_range(0..10) < 7 { COMMON } else { RARE };
        if let Some(word) = pool.choose(&mut rng) {
            out.push(*word);
        }
    }

    out.join(" ")
}
