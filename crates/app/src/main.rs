//! hcr: encrypt a line of text, then decrypt it again and show every stage.

mod config;
mod input_gen;

use std::io::{self, BufRead, Write};
use std::process;

use env_logger::Env;
use hcr_core::metrics::RunMetrics;
use hcr_core::{Decrypted, Encrypted, Pipeline, Result};
use log::{error, info};

use crate::config::Config;
use crate::input_gen::generate_sample_text;

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(msg) => {
            eprintln!("error: {}", msg);
            eprintln!("run with --help for usage");
            process::exit(2);
        }
    };

    if let Err(err) = run(&config) {
        error!("run failed: {}", err);
        eprintln!("error: {}", err);
        process::exit(1);
    }
}

fn run(config: &Config) -> Result<()> {
    if config.print_config {
        config.print();
    }

    let text = read_input(config)?;
    info!("input: {} chars, seed {}", text.chars().count(), config.seed);

    let pipeline = Pipeline::new(config.scheme());
    let mut keys = config.key_source();

    let encrypted = pipeline.encrypt(&text, keys.as_mut())?;
    print_encryption(&encrypted, config.preview_bits)?;

    if config.print_tree {
        print_tree(&encrypted);
    }

    let decrypted = pipeline.decrypt(&encrypted.compressed, &encrypted.tree)?;
    print_decryption(&decrypted, config.preview_bits);

    if config.print_metrics {
        let mut metrics = RunMetrics::from_encrypted(&encrypted);
        metrics.record_decrypt(&encrypted, &decrypted);
        metrics.print_summary();
    }

    Ok(())
}

/// The message from `--text`, `--sample`, or a prompt on stdin.
fn read_input(config: &Config) -> Result<String> {
    if let Some(text) = &config.text {
        return Ok(text.clone());
    }
    if config.sample {
        return Ok(generate_sample_text(config.seed, config.sample_words));
    }

    print!("Enter text to encrypt: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// First `limit` bits, with "..." if anything was cut.
fn preview(bits: &str, limit: usize) -> String {
    if bits.len() > limit {
        format!("{}...", &bits[..limit])
    } else {
        bits.to_string()
    }
}

fn print_encryption(enc: &Encrypted, preview_bits: usize) -> Result<()> {
    let packed = enc.packed()?;

    println!("\n--- ENCRYPTION OUTPUT ---");
    println!("Original Text:          {}", enc.original);
    println!("Reversed Words:         {}", enc.reversed);
    println!("Caesar Encrypted:       {}", enc.shifted.escape_debug());
    println!("Key Used:               {}", enc.key);
    println!("Key Char:               {}", enc.key_char.escape_debug());
    println!("Cipher + Key:           {}", enc.cipher_with_key.escape_debug());
    println!("Huffman Compressed:     {}", preview(&enc.compressed, preview_bits));
    println!("Compressed Size:        {} bits ({} bytes packed)", enc.bit_len(), packed.len());
    println!("Compression Ratio:      {:.4}", enc.compression_ratio());
    println!("Execution Time:         {:.2} ms", enc.execution_time_ms());
    Ok(())
}

fn print_tree(enc: &Encrypted) {
    println!("\n--- HUFFMAN TREE ---");
    print!("{}", enc.tree.render());

    println!("\n--- CODE TABLE ---");
    for (symbol, code) in enc.codebook.iter() {
        println!("{:>8}  {}", char::from(symbol).escape_debug().to_string(), code);
    }
}

fn print_decryption(dec: &Decrypted, preview_bits: usize) {
    println!("\n--- DECRYPTION OUTPUT ---");
    println!("Compressed ciphertext:  {}", preview(&dec.compressed, preview_bits));
    println!("Decompressed text:      {}", dec.decompressed.escape_debug());
    println!("Extracted Key Char:     {}", dec.key_char.escape_debug());
    println!("Extracted Key:          {}", dec.key);
    println!("Decrypted Caesar Text:  {}", dec.unshifted);
    println!("Plaintext:              {}", dec.plaintext);
    println!("Execution Time:         {:.2} ms", dec.execution_time_ms());
}
