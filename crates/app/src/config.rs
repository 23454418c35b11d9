//! Configuration for the hcr application.
//!
//! Handles parsing command-line arguments. With no arguments the tool prompts
//! for a line of text and draws a key from a seed derived from the clock.
//! The seed is always available through `--print-config`, so any run can be
//! repeated exactly with `--seed`.

use hcr_core::cipher::{FixedKey, KeyScheme, KeySource, RandomKeys};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Default number of compressed bits shown before truncating with "...".
const DEFAULT_PREVIEW_BITS: usize = 80;

/// Default word count for `--sample`.
const DEFAULT_SAMPLE_WORDS: usize = 12;

/// Complete configuration for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // === Input ===
    /// Text given on the command line (None = prompt or sample)
    pub text: Option<String>,

    /// Generate the text instead of prompting
    pub sample: bool,

    /// Words in the generated text
    pub sample_words: usize,

    // === Keys ===
    /// Seed for key selection and sample generation
    pub seed: u64,

    /// Use this key instead of drawing one
    pub key: Option<u8>,

    /// Keys 1-96 written as raw code points instead of 1-10 as 'a'-'j'
    pub wide_keys: bool,

    // === Output ===
    /// Compressed bits shown in the report
    pub preview_bits: usize,

    /// Whether to print the resolved configuration
    pub print_config: bool,

    /// Whether to print the Huffman tree and code table
    pub print_tree: bool,

    /// Whether to print the metrics summary
    pub print_metrics: bool,
}

impl Config {
    /// Parse configuration from command-line arguments.
    ///
    /// If --seed is not provided, a time-based seed is used.
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        let mut text: Option<String> = None;
        let mut sample = false;
        let mut sample_words: Option<usize> = None;
        let mut seed: Option<u64> = None;
        let mut key: Option<u8> = None;
        let mut wide_keys = false;
        let mut preview_bits: Option<usize> = None;
        let mut print_config = false;
        let mut print_tree = false;
        let mut print_metrics = true;

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--text" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--text requires a value".to_string());
                    }
                    text = Some(args[i].clone());
                }
                "--sample" => {
                    sample = true;
                }
                "--words" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--words requires a number".to_string());
                    }
                    sample_words = Some(args[i].parse().map_err(|_| "invalid word count")?);
                }
                "--seed" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--seed requires a number".to_string());
                    }
                    seed = Some(args[i].parse().map_err(|_| "invalid seed")?);
                }
                "--key" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--key requires a number".to_string());
                    }
                    key = Some(args[i].parse().map_err(|_| "invalid key")?);
                }
                "--wide-keys" => {
                    wide_keys = true;
                }
                "--preview" => {
                    i += 1;
                    if i >= args.len() {
                        return Err("--preview requires a number".to_string());
                    }
                    preview_bits = Some(args[i].parse().map_err(|_| "invalid preview length")?);
                }
                "--print-config" => {
                    print_config = true;
                }
                "--print-tree" => {
                    print_tree = true;
                }
                "--no-metrics" => {
                    print_metrics = false;
                }
                "--help" | "-h" => {
                    print_help();
                    std::process::exit(0);
                }
                _ => {
                    return Err(format!("unknown argument: {}", args[i]));
                }
            }
            i += 1;
        }

        if text.is_some() && sample {
            return Err("--text and --sample cannot be combined".to_string());
        }

        // Determine seed (explicit or time-based)
        let seed = seed.unwrap_or_else(|| {
            use std::time::{SystemTime, UNIX_EPOCH};
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis() as u64)
                .unwrap_or_default()
        });

        let config = Config {
            text,
            sample,
            sample_words: sample_words.unwrap_or(DEFAULT_SAMPLE_WORDS),
            seed,
            key,
            wide_keys,
            preview_bits: preview_bits.unwrap_or(DEFAULT_PREVIEW_BITS),
            print_config,
            print_tree,
            print_metrics,
        };

        if let Some(key) = config.key {
            let scheme = config.scheme();
            if !scheme.contains(key) {
                let range = scheme.range();
                return Err(format!(
                    "key {} is outside {}..={}",
                    key,
                    range.start(),
                    range.end()
                ));
            }
        }

        Ok(config)
    }

    /// Key scheme selected by `--wide-keys`.
    pub fn scheme(&self) -> KeyScheme {
        if self.wide_keys {
            KeyScheme::RAW
        } else {
            KeyScheme::LETTERS
        }
    }

    /// Key source: the fixed `--key`, or keys drawn from the seed.
    pub fn key_source(&self) -> Box<dyn KeySource> {
        match self.key {
            Some(key) => Box::new(FixedKey(key)),
            None => Box::new(RandomKeys::new(ChaCha8Rng::seed_from_u64(self.seed))),
        }
    }

    /// Print the configuration in human-readable form.
    pub fn print(&self) {
        let scheme = self.scheme();
        let range = scheme.range();

        println!("=== Configuration ===");
        match (&self.text, self.sample) {
            (Some(_), _) => println!("Input: command line"),
            (None, true) => println!("Input: generated sample ({} words)", self.sample_words),
            (None, false) => println!("Input: prompt"),
        }
        println!("Seed: {}", self.seed);
        match self.key {
            Some(key) => println!("Key: {} (fixed)", key),
            None => println!("Key: random in {}..={}", range.start(), range.end()),
        }
        println!("Key character offset: {}", scheme.offset());
        println!("Preview: {} bits", self.preview_bits);
        println!();
    }
}

fn print_help() {
    println!("hcr: word reversal + shift cipher + Huffman compression");
    println!();
    println!("USAGE:");
    println!("    hcr [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    --text <TEXT>     Text to encrypt (default: prompt on stdin)");
    println!("    --sample          Generate the text from the seed");
    println!("    --words <N>       Words in the generated text (default: 12)");
    println!();
    println!("    --seed <N>        Random seed for determinism");
    println!("    --key <N>         Use this key instead of a random one");
    println!("    --wide-keys       Keys 1-96 as raw characters (default: 1-10 as 'a'-'j')");
    println!();
    println!("    --preview <N>     Compressed bits to show (default: 80)");
    println!("    --print-config    Print resolved configuration");
    println!("    --print-tree      Print the Huffman tree and code table");
    println!("    --no-metrics      Don't print metrics summary");
    println!("    --help, -h        Print this help");
    println!();
    println!("EXAMPLES:");
    println!("    hcr                                   # Prompt for text");
    println!("    hcr --text \"hello world\" --seed 42    # Deterministic run");
    println!("    hcr --sample --words 50 --print-tree  # Larger generated input");
    println!("    RUST_LOG=debug hcr --text \"ab ba\"     # Trace each stage");
    println!();
}
