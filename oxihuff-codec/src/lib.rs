//! # OxiHuff Codec
//!
//! Pure Rust byte-oriented Huffman compression.
//!
//! A compressed stream consists of an encoding scheme (the code of every
//! symbol present in the input) followed by the packed payload:
//!
//! ```text
//! [decimal count]\n
//! count x [symbol: u8][code: u64 LE][length: u8]
//! [64-bit big-endian words of code bits, ending with the pseudo-EOF code]
//! ```
//!
//! The pseudo-EOF symbol shares wire value `0xFF` with the raw byte, so input
//! containing `0xFF` is rejected with [`OxiHuffError::ReservedByte`].
//!
//! ## Example
//!
//! ```rust
//! use oxihuff_codec::{compress_bytes, decompress_bytes};
//!
//! let data = b"abracadabra";
//! let compressed = compress_bytes(data).unwrap();
//! let restored = decompress_bytes(&compressed).unwrap();
//! assert_eq!(restored, data);
//! ```
//!
//! ## Step by step
//!
//! The individual stages can be driven separately on any seekable input:
//!
//! ```rust
//! use oxihuff_codec::{build_tree, pack_payload, read_scheme, unpack_payload, write_scheme};
//! use std::io::{Cursor, Seek, SeekFrom};
//!
//! let mut input = Cursor::new(b"abca".to_vec());
//! let mut compressed = Vec::new();
//!
//! let tree = build_tree(&mut input).unwrap();
//! write_scheme(&tree, &mut compressed).unwrap();
//! input.seek(SeekFrom::Start(0)).unwrap();
//! pack_payload(&mut input, &tree, &mut compressed).unwrap();
//!
//! let mut reader = Cursor::new(compressed);
//! let tree = read_scheme(&mut reader).unwrap();
//! let mut output = Vec::new();
//! unpack_payload(&mut reader, &tree, &mut output).unwrap();
//! assert_eq!(output, b"abca");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod freq;
pub mod pack;
pub mod scheme;
pub mod symbol;
pub mod table;
pub mod tree;
pub mod unpack;

// Re-exports
pub use freq::FrequencyTable;
pub use oxihuff_core::error::{OxiHuffError, Result};
pub use pack::{PackStats, pack_payload, pack_with_table};
pub use scheme::{Scheme, SchemeEntry, read_scheme, write_scheme};
pub use symbol::{PSEUDO_EOF, Symbol};
pub use table::{CodeEntry, CodeTable};
pub use tree::{CodeTree, Node, NodeId, build_tree};
pub use unpack::{DecodeState, Decoder, Step, UnpackStats, unpack_payload};

use std::io::{Cursor, Read, Seek, SeekFrom, Write};

/// Summary of a compression run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompressStats {
    /// Bytes of input compressed.
    pub input_bytes: u64,
    /// Bytes of scheme header written.
    pub scheme_bytes: u64,
    /// Number of symbols in the scheme, pseudo-EOF included.
    pub symbols: usize,
    /// Code bits in the payload.
    pub code_bits: u64,
    /// 64-bit payload words written.
    pub payload_words: u64,
}

impl CompressStats {
    /// Total bytes written.
    pub fn output_bytes(&self) -> u64 {
        self.scheme_bytes + self.payload_words * 8
    }

    /// Output size as a fraction of input size (0.0 for empty input).
    pub fn ratio(&self) -> f64 {
        if self.input_bytes == 0 {
            0.0
        } else {
            self.output_bytes() as f64 / self.input_bytes as f64
        }
    }
}

/// Summary of a decompression run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecompressStats {
    /// Number of symbols in the scheme.
    pub symbols: usize,
    /// Payload bytes consumed.
    pub payload_bytes: u64,
    /// Bytes of decoded output.
    pub output_bytes: u64,
}

/// Compress `input` into `output`.
///
/// The input is read twice: once to count frequencies and once to pack the
/// payload. Between passes it is rewound to the position it had on entry.
pub fn compress<R: Read + Seek, W: Write>(input: &mut R, output: &mut W) -> Result<CompressStats> {
    let start = input.stream_position()?;
    let tree = build_tree(&mut *input)?;
    let table = tree.code_table()?;
    let scheme = Scheme::from_table(&table);
    let scheme_bytes = scheme.write_to(&mut *output)?;

    input.seek(SeekFrom::Start(start))?;
    let packed = pack_with_table(&mut *input, &table, &mut *output)?;

    let stats = CompressStats {
        input_bytes: packed.input_bytes,
        scheme_bytes: scheme_bytes as u64,
        symbols: scheme.len(),
        code_bits: packed.code_bits,
        payload_words: packed.words,
    };
    tracing::debug!(
        input_bytes = stats.input_bytes,
        output_bytes = stats.output_bytes(),
        symbols = stats.symbols,
        "compressed"
    );
    Ok(stats)
}

/// Decompress `input` into `output`.
///
/// The payload is read one byte at a time and nothing past the byte holding
/// the end of the pseudo-EOF code is consumed, so `input` is left at the end
/// of the compressed member.
pub fn decompress<R: Read, W: Write>(input: &mut R, output: &mut W) -> Result<DecompressStats> {
    let scheme = Scheme::read_from(&mut *input)?;
    let tree = scheme.to_tree()?;
    let unpacked = unpack_payload(&mut *input, &tree, &mut *output)?;

    Ok(DecompressStats {
        symbols: scheme.len(),
        payload_bytes: unpacked.input_bytes,
        output_bytes: unpacked.output_bytes,
    })
}

/// Compress an in-memory buffer.
pub fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    compress(&mut Cursor::new(data), &mut output)?;
    Ok(output)
}

/// Decompress an in-memory buffer.
pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    decompress(&mut Cursor::new(data), &mut output)?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_text() {
        let data = b"It was the best of times, it was the worst of times.";
        let compressed = compress_bytes(data).unwrap();
        assert_eq!(decompress_bytes(&compressed).unwrap(), data);
    }

    #[test]
    fn test_stats_match_output() {
        let data = b"aaaaaaaabbbbccd";
        let mut output = Vec::new();
        let stats = compress(&mut Cursor::new(&data[..]), &mut output).unwrap();
        assert_eq!(stats.input_bytes, data.len() as u64);
        assert_eq!(stats.output_bytes(), output.len() as u64);
        assert_eq!(stats.symbols, 5);

        let mut restored = Vec::new();
        let dstats = decompress(&mut Cursor::new(&output), &mut restored).unwrap();
        assert_eq!(dstats.output_bytes, data.len() as u64);
        assert_eq!(dstats.symbols, 5);
        assert!(dstats.payload_bytes <= stats.payload_words * 8);
    }

    #[test]
    fn test_compress_rewinds_to_entry_position() {
        let mut input = Cursor::new(b"HEADERpayload".to_vec());
        input.set_position(6);
        let mut output = Vec::new();
        let stats = compress(&mut input, &mut output).unwrap();
        assert_eq!(stats.input_bytes, 7);
        assert_eq!(decompress_bytes(&output).unwrap(), b"payload");
    }

    #[test]
    fn test_ratio() {
        assert_eq!(CompressStats::default().ratio(), 0.0);
        let stats = CompressStats {
            input_bytes: 100,
            scheme_bytes: 18,
            payload_words: 4,
            ..Default::default()
        };
        assert_eq!(stats.output_bytes(), 50);
        assert!((stats.ratio() - 0.5).abs() < f64::EPSILON);
    }
}
