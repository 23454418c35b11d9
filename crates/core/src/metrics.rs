//! Size and timing statistics for one encrypt/decrypt run.
//!
//! - Sizes: input characters, compressed symbols, encoded bits, packed bytes
//! - Code quality: distinct symbols, tree depth, average code length against
//!   the Shannon entropy of the compressed text
//! - Timing: encrypt and decrypt durations
//!
//! # Thread Safety
//!
//! `RunMetrics` is plain data; build one per run.

use std::time::Duration;

use crate::frequency::FrequencyTable;
use crate::pipeline::{Decrypted, Encrypted};

/// Statistics collected from an [`Encrypted`] result and, optionally, the
/// matching [`Decrypted`] result.
#[derive(Debug, Clone, PartialEq)]
pub struct RunMetrics {
    // === Sizes ===
    /// Characters in the original text
    pub input_chars: usize,

    /// Symbols handed to the coder (shifted text plus key character)
    pub coded_symbols: usize,

    /// Length of the encoded bitstring
    pub encoded_bits: usize,

    /// Bytes the bitstring occupies once packed
    pub packed_bytes: usize,

    // === Code ===
    /// Distinct symbols in the coded text
    pub distinct_symbols: usize,

    /// Longest code in bits
    pub tree_depth: usize,

    /// Frequency-weighted bits per symbol
    pub average_code_length: f64,

    /// Shannon entropy of the coded text in bits per symbol
    pub entropy: f64,

    // === Timing ===
    pub encrypt_time: Duration,

    /// Set once the run is decrypted
    pub decrypt_time: Option<Duration>,

    /// Whether decryption reproduced the original text
    pub roundtrip_ok: Option<bool>,
}

impl RunMetrics {
    /// Collect everything that is known after encryption.
    pub fn from_encrypted(encrypted: &Encrypted) -> Self {
        let frequencies = FrequencyTable::from_symbols(&encrypted.cipher_symbols);
        let encoded_bits = encrypted.bit_len();

        Self {
            input_chars: encrypted.original.chars().count(),
            coded_symbols: frequencies.total(),
            encoded_bits,
            packed_bytes: encoded_bits.div_ceil(8),
            distinct_symbols: frequencies.distinct(),
            tree_depth: encrypted.tree.depth().max(1),
            average_code_length: encrypted.codebook.average_code_length(&frequencies),
            entropy: entropy(&frequencies),
            encrypt_time: encrypted.elapsed,
            decrypt_time: None,
            roundtrip_ok: None,
        }
    }

    /// Add the outcome of decrypting this run.
    pub fn record_decrypt(&mut self, encrypted: &Encrypted, decrypted: &Decrypted) {
        self.decrypt_time = Some(decrypted.elapsed);
        self.roundtrip_ok = Some(decrypted.plaintext == encrypted.original);
    }

    /// Encoded bits / (coded symbols * 8).
    ///
    /// Returns 0.0 if nothing was coded.
    pub fn compression_ratio(&self) -> f64 {
        if self.coded_symbols == 0 {
            0.0
        } else {
            self.encoded_bits as f64 / (self.coded_symbols * 8) as f64
        }
    }

    /// Average code length over entropy; 1.0 is optimal.
    ///
    /// Returns 1.0 when the entropy is zero (single-symbol text).
    pub fn code_efficiency(&self) -> f64 {
        if self.entropy == 0.0 {
            1.0
        } else {
            self.entropy / self.average_code_length
        }
    }

    /// Print a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!("\n=== Run Summary ===");
        println!("Input:   {} chars", self.input_chars);
        println!("Coded:   {} symbols ({} distinct)", self.coded_symbols, self.distinct_symbols);
        println!("Encoded: {} bits ({} bytes packed)", self.encoded_bits, self.packed_bytes);
        println!("Ratio:   {:.1}%", self.compression_ratio() * 100.0);
        println!();

        println!("=== Code ===");
        println!("Tree depth: {}", self.tree_depth);
        println!("Average code length: {:.3} bits/symbol", self.average_code_length);
        println!("Entropy: {:.3} bits/symbol", self.entropy);
        println!("Efficiency: {:.1}%", self.code_efficiency() * 100.0);
        println!();

        println!("=== Timing ===");
        println!("Encrypt: {:.3} ms", self.encrypt_time.as_secs_f64() * 1000.0);
        if let Some(decrypt_time) = self.decrypt_time {
            println!("Decrypt: {:.3} ms", decrypt_time.as_secs_f64() * 1000.0);
        }

        match self.roundtrip_ok {
            Some(true) => println!("Verification: PASSED ✓"),
            Some(false) => println!("Verification: FAILED ✗ (plaintext mismatch)"),
            None => {}
        }
        println!();
    }

    /// Export metrics as a simple text format (for parsing/testing).
    pub fn export_text(&self) -> String {
        let mut text = format!(
            "input_chars={}\n\
             coded_symbols={}\n\
             distinct_symbols={}\n\
             encoded_bits={}\n\
             packed_bytes={}\n\
             compression_ratio={:.4}\n\
             average_code_length={:.4}\n\
             entropy={:.4}\n\
             encrypt_ms={:.3}\n",
            self.input_chars,
            self.coded_symbols,
            self.distinct_symbols,
            self.encoded_bits,
            self.packed_bytes,
            self.compression_ratio(),
            self.average_code_length,
            self.entropy,
            self.encrypt_time.as_secs_f64() * 1000.0,
        );

        if let Some(decrypt_time) = self.decrypt_time {
            text.push_str(&format!("decrypt_ms={:.3}\n", decrypt_time.as_secs_f64() * 1000.0));
        }
        if let Some(ok) = self.roundtrip_ok {
            text.push_str(&format!("roundtrip_ok={}\n", ok));
        }
        text
    }
}

/// Shannon entropy in bits per symbol.
pub fn entropy(frequencies: &FrequencyTable) -> f64 {
    let total = frequencies.total() as f64;
    if total == 0.0 {
        return 0.0;
    }

    frequencies
        .iter()
        .map(|(_, count)| {
            let p = count as f64 / total;
            -p * p.log2()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::FixedKey;
    use crate::pipeline::Pipeline;

    #[test]
    fn test_entropy() {
        assert_eq!(entropy(&FrequencyTable::from_symbols(b"aaaa")), 0.0);
        assert!((entropy(&FrequencyTable::from_symbols(b"ab")) - 1.0).abs() < 1e-12);
        assert!((entropy(&FrequencyTable::from_symbols(b"abcd")) - 2.0).abs() < 1e-12);
        assert_eq!(entropy(&FrequencyTable::from_symbols(&[])), 0.0);
    }

    #[test]
    fn test_from_encrypted() {
        let pipeline = Pipeline::default();
        let enc = pipeline.encrypt("ab ba", &mut FixedKey(3)).unwrap();
        let metrics = RunMetrics::from_encrypted(&enc);

        assert_eq!(metrics.input_chars, 5);
        assert_eq!(metrics.coded_symbols, 6);
        assert_eq!(metrics.distinct_symbols, 4);
        assert_eq!(metrics.encoded_bits, enc.compressed.len());
        assert_eq!(metrics.packed_bytes, enc.packed().unwrap().len());
        assert_eq!(metrics.compression_ratio(), enc.compression_ratio());
        assert!(metrics.decrypt_time.is_none());
    }

    #[test]
    fn test_huffman_meets_entropy_bound() {
        let pipeline = Pipeline::default();
        let text = "it was the best of times it was the worst of times";
        let metrics = RunMetrics::from_encrypted(&pipeline.encrypt(text, &mut FixedKey(6)).unwrap());

        // H <= L < H + 1 for an optimal prefix code
        assert!(metrics.average_code_length >= metrics.entropy - 1e-9);
        assert!(metrics.average_code_length < metrics.entropy + 1.0);
        assert!(metrics.code_efficiency() <= 1.0 + 1e-9);
    }

    #[test]
    fn test_record_decrypt() {
        let pipeline = Pipeline::default();
        let enc = pipeline.encrypt("hello world", &mut FixedKey(9)).unwrap();
        let dec = pipeline.decrypt(&enc.compressed, &enc.tree).unwrap();

        let mut metrics = RunMetrics::from_encrypted(&enc);
        metrics.record_decrypt(&enc, &dec);
        assert_eq!(metrics.roundtrip_ok, Some(true));
        assert!(metrics.decrypt_time.is_some());
    }

    #[test]
    fn test_export_text() {
        let pipeline = Pipeline::default();
        let enc = pipeline.encrypt("aaaa", &mut FixedKey(1)).unwrap();
        let text = RunMetrics::from_encrypted(&enc).export_text();

        assert!(text.contains("input_chars=4\n"));
        assert!(text.contains("coded_symbols=5\n"));
        assert!(text.contains("distinct_symbols=2\n"));
        assert!(!text.contains("roundtrip_ok"));
    }
}
