//! Packing `'0'`/`'1'` bitstrings into bytes and back.
//!
//! The pipeline works on human-readable bitstrings. This module gives the
//! size those bits actually occupy once packed MSB-first (most significant
//! bit first) into bytes, and lets a packed payload be turned back into the
//! bitstring the decoder expects.
//!
//! # Padding Rules
//! - BitWriter: pads the final partial byte with trailing zeros
//! - BitReader: cannot tell padding from data, so the caller supplies the
//!   exact bit count
//!
//! # Example
//! ```
//! use hcr_core::bitio::{pack_bits, unpack_bits};
//!
//! let packed = pack_bits("10111").unwrap();
//! assert_eq!(packed, vec![0b1011_1000]);
//! assert_eq!(unpack_bits(&packed, 5).unwrap(), "10111");
//! ```

use crate::error::{BitIoError, HuffmanError, Result};

/// Writes bits MSB-first into a byte buffer.
///
/// # Invariants
/// - `bit_count` is always < 8
#[derive(Debug, Clone, Default)]
pub struct BitWriter {
    /// Completed bytes
    bytes: Vec<u8>,
    /// Accumulator for the current partial byte (MSB-aligned)
    bit_buffer: u8,
    /// Number of bits in bit_buffer (0-7)
    bit_count: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one bit.
    pub fn write_bit(&mut self, bit: bool) {
        if bit {
            self.bit_buffer |= 0x80 >> self.bit_count;
        }
        self.bit_count += 1;

        if self.bit_count == 8 {
            self.bytes.push(self.bit_buffer);
            self.bit_buffer = 0;
            self.bit_count = 0;
        }
    }

    /// Append every bit of a `'0'`/`'1'` string.
    ///
    /// # Errors
    /// Returns `HuffmanError::InvalidBit` for any other character; bits before
    /// it have already been written.
    pub fn write_code(&mut self, code: &str) -> Result<()> {
        for (position, found) in code.chars().enumerate() {
            match found {
                '0' => self.write_bit(false),
                '1' => self.write_bit(true),
                _ => return Err(HuffmanError::InvalidBit { position, found }.into()),
            }
        }
        Ok(())
    }

    /// Total number of bits written (including partial byte).
    pub fn bit_len(&self) -> usize {
        self.bytes.len() * 8 + self.bit_count as usize
    }

    /// Finish writing and return the bytes, zero-padding the last one.
    pub fn finish(mut self) -> Vec<u8> {
        if self.bit_count > 0 {
            self.bytes.push(self.bit_buffer);
        }
        self.bytes
    }
}

/// Reads bits MSB-first from a byte buffer.
///
/// # Invariants
/// - `bit_position` never exceeds `data.len() * 8`
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    data: &'a [u8],
    /// Current bit position (0 = MSB of first byte)
    bit_position: usize,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            bit_position: 0,
        }
    }

    /// Read a single bit.
    ///
    /// # Errors
    /// Returns `BitIoError::UnexpectedEof` once the buffer is exhausted.
    pub fn read_bit(&mut self) -> Result<bool> {
        let byte = self
            .data
            .get(self.bit_position / 8)
            .ok_or(BitIoError::UnexpectedEof)?;
        let bit = byte & (0x80 >> (self.bit_position % 8)) != 0;
        self.bit_position += 1;
        Ok(bit)
    }

    pub fn bits_remaining(&self) -> usize {
        self.data.len() * 8 - self.bit_position
    }

    pub fn is_empty(&self) -> bool {
        self.bits_remaining() == 0
    }
}

/// Pack a bitstring into bytes.
pub fn pack_bits(bits: &str) -> Result<Vec<u8>> {
    let mut writer = BitWriter::new();
    writer.write_code(bits)?;
    Ok(writer.finish())
}

/// Read the first `bit_count` bits of `bytes` back as a bitstring.
///
/// # Errors
/// Returns `BitIoError::InvalidBitCount` if `bytes` holds fewer bits.
pub fn unpack_bits(bytes: &[u8], bit_count: usize) -> Result<String> {
    if bit_count > bytes.len() * 8 {
        return Err(BitIoError::InvalidBitCount {
            count: bit_count,
            bytes: bytes.len(),
        }
        .into());
    }

    let mut reader = BitReader::new(bytes);
    let mut bits = String::with_capacity(bit_count);
    for _ in 0..bit_count {
        bits.push(if reader.read_bit()? { '1' } else { '0' });
    }
    Ok(bits)
}
