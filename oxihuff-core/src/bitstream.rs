//! Bit-level I/O operations for the Huffman payload.
//!
//! This module provides [`WordWriter`] and [`BitReader`] for writing and
//! reading variable-length codes.
//!
//! # Bit Ordering
//!
//! OxiHuff packs codes MSB-first: the first bit of the first code lands in
//! the most significant bit of a 64-bit accumulator ("bus"). Each full bus is
//! written as 8 bytes in big-endian order, so reading the output byte by byte,
//! most significant bit first, yields the code bits in the order they were
//! written.
//!
//! # Example
//!
//! ```
//! use oxihuff_core::bitstream::{BitReader, WordWriter};
//! use std::io::Cursor;
//!
//! let mut output = Vec::new();
//! {
//!     let mut writer = WordWriter::new(&mut output);
//!     writer.write_code(0b101, 3).unwrap();
//!     writer.write_code(0b1100, 4).unwrap();
//!     writer.finish().unwrap();
//! }
//! assert_eq!(output.len(), 8);
//! assert_eq!(output[0], 0b1011_1000);
//!
//! let mut reader = BitReader::new(Cursor::new(&output));
//! assert_eq!(reader.read_bit().unwrap(), Some(true));
//! assert_eq!(reader.read_bit().unwrap(), Some(false));
//! ```

use crate::error::Result;
use crate::source::ByteSource;
use std::io::{Read, Write};

/// Width of the accumulator in bits.
pub const WORD_BITS: u8 = 64;

/// Size of one flushed word in bytes.
pub const WORD_BYTES: usize = 8;

/// Mask selecting the low `width` bits of a code.
#[inline]
fn low_mask(width: u8) -> u64 {
    if width >= WORD_BITS {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// A word-oriented bit writer that wraps any `Write` implementation.
///
/// Codes are merged into a 64-bit bus from the most significant end. When
/// the bus fills up it is written out big-endian and reset. A code that does
/// not fit in the remaining space is split: its high bits complete the
/// current word and its low bits open the next one.
///
/// Call [`WordWriter::finish`] once after the last code; it writes the
/// partially filled bus (if any) with its unused low bits set to zero.
#[derive(Debug)]
pub struct WordWriter<W: Write> {
    /// Underlying writer.
    writer: W,
    /// Bit accumulator (MSB-first).
    bus: u64,
    /// Number of occupied bits in `bus`.
    filled: u8,
    /// Total code bits accepted.
    total_bits_written: u64,
    /// Number of 64-bit words flushed to `writer`.
    words_written: u64,
}

impl<W: Write> WordWriter<W> {
    /// Create a new `WordWriter` wrapping the given writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            bus: 0,
            filled: 0,
            total_bits_written: 0,
            words_written: 0,
        }
    }

    /// Get the total number of code bits written so far.
    pub fn bits_written(&self) -> u64 {
        self.total_bits_written
    }

    /// Get the number of words flushed so far.
    pub fn words_written(&self) -> u64 {
        self.words_written
    }

    /// Write the bus big-endian and reset it.
    #[inline]
    fn flush_word(&mut self) -> Result<()> {
        self.writer.write_all(&self.bus.to_be_bytes())?;
        self.words_written += 1;
        self.bus = 0;
        self.filled = 0;
        Ok(())
    }

    /// Write the low `width` bits of `code`, most significant bit first.
    ///
    /// # Arguments
    ///
    /// * `code` - The code value; bits above `width` are ignored
    /// * `width` - Number of bits to write (0-64)
    pub fn write_code(&mut self, code: u64, width: u8) -> Result<()> {
        debug_assert!(width <= WORD_BITS, "Cannot write more than 64 bits at once");

        if width == 0 {
            return Ok(());
        }

        let code = code & low_mask(width);
        let free = WORD_BITS - self.filled;
        self.total_bits_written += width as u64;

        if width < free {
            self.bus |= code << (free - width);
            self.filled += width;
        } else if width == free {
            self.bus |= code;
            self.flush_word()?;
        } else {
            // Split: high bits finish this word, low bits open the next
            let carry = width - free;
            self.bus |= code >> carry;
            self.flush_word()?;
            self.bus = (code & low_mask(carry)) << (WORD_BITS - carry);
            self.filled = carry;
        }

        Ok(())
    }

    /// Flush the partially filled bus, if any, and the underlying writer.
    ///
    /// An empty bus is not written, so a stream of `n` code bits always
    /// produces exactly `ceil(n / 64)` words.
    pub fn finish(&mut self) -> Result<()> {
        if self.filled > 0 {
            self.flush_word()?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// An MSB-first bit reader over a pull-based byte source.
///
/// Bytes are pulled one at a time; the eight bits of each byte are handed
/// out from most to least significant. Reaching the end of the input is
/// reported as `Ok(None)` rather than an error so callers can decide whether
/// that end is premature.
#[derive(Debug)]
pub struct BitReader<R: Read> {
    /// Underlying byte source.
    source: ByteSource<R>,
    /// Current byte being consumed.
    current: u8,
    /// Bits of `current` not yet handed out.
    bits_left: u8,
    /// Total bits read (for error reporting).
    total_bits_read: u64,
}

impl<R: Read> BitReader<R> {
    /// Create a new `BitReader` wrapping the given reader.
    pub fn new(reader: R) -> Self {
        Self::from_source(ByteSource::new(reader))
    }

    /// Create a `BitReader` over an existing byte source.
    pub fn from_source(source: ByteSource<R>) -> Self {
        Self {
            source,
            current: 0,
            bits_left: 0,
            total_bits_read: 0,
        }
    }

    /// Get the current bit position (for error reporting).
    pub fn bit_position(&self) -> u64 {
        self.total_bits_read
    }

    /// Get the number of whole bytes pulled from the source.
    pub fn bytes_read(&self) -> u64 {
        self.source.bytes_consumed()
    }

    /// Number of bits of the current byte that were never consumed.
    pub fn unread_bits(&self) -> u8 {
        self.bits_left
    }

    /// Read a single bit, or `None` once the input is exhausted.
    #[inline]
    pub fn read_bit(&mut self) -> Result<Option<bool>> {
        if self.bits_left == 0 {
            match self.source.next_byte()? {
                Some(byte) => {
                    self.current = byte;
                    self.bits_left = 8;
                }
                None => return Ok(None),
            }
        }

        self.bits_left -= 1;
        self.total_bits_read += 1;
        Ok(Some((self.current >> self.bits_left) & 1 == 1))
    }
}
