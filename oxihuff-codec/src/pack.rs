//! Payload packing.
//!
//! Every input byte is replaced by its code, the pseudo-EOF code is appended,
//! and the resulting bit string is written as 64-bit big-endian words (see
//! [`oxihuff_core::bitstream::WordWriter`]).

use crate::symbol::{PSEUDO_EOF, Symbol};
use crate::table::CodeTable;
use crate::tree::CodeTree;
use oxihuff_core::error::{OxiHuffError, Result};
use oxihuff_core::{ByteSource, WordWriter};
use std::io::{Read, Write};

/// Counters from a packing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackStats {
    /// Payload bytes read from the input.
    pub input_bytes: u64,
    /// Code bits emitted, pseudo-EOF included.
    pub code_bits: u64,
    /// 64-bit words written.
    pub words: u64,
}

/// Pack the bytes of `reader` using the codes of `tree`.
///
/// The reader must be positioned at the start of the same data the tree was
/// built from.
pub fn pack_payload<R: Read, W: Write>(reader: R, tree: &CodeTree, writer: W) -> Result<PackStats> {
    let table = tree.code_table()?;
    pack_with_table(reader, &table, writer)
}

/// Pack the bytes of `reader` using a precomputed code table.
pub fn pack_with_table<R: Read, W: Write>(
    reader: R,
    table: &CodeTable,
    writer: W,
) -> Result<PackStats> {
    let eof = table
        .get(Symbol::PseudoEof)
        .ok_or_else(|| OxiHuffError::missing_code(PSEUDO_EOF))?;

    let mut source = ByteSource::new(reader);
    let mut out = WordWriter::new(writer);

    while let Some(byte) = source.next_byte()? {
        if byte == PSEUDO_EOF {
            return Err(OxiHuffError::reserved_byte(source.bytes_consumed() - 1));
        }
        let entry = table
            .get(Symbol::Byte(byte))
            .ok_or_else(|| OxiHuffError::missing_code(byte))?;
        out.write_code(entry.code, entry.len)?;
    }

    out.write_code(eof.code, eof.len)?;
    out.finish()?;

    let stats = PackStats {
        input_bytes: source.bytes_consumed(),
        code_bits: out.bits_written(),
        words: out.words_written(),
    };
    tracing::debug!(
        input_bytes = stats.input_bytes,
        code_bits = stats.code_bits,
        words = stats.words,
        "packed payload"
    );
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::freq::FrequencyTable;
    use crate::table::CodeEntry;
    use std::io::Cursor;

    fn pack(data: &[u8]) -> (Vec<u8>, PackStats) {
        let tree = CodeTree::from_frequencies(&FrequencyTable::from_bytes(data).unwrap());
        let mut out = Vec::new();
        let stats = pack_payload(Cursor::new(data), &tree, &mut out).unwrap();
        (out, stats)
    }

    #[test]
    fn test_empty_payload_is_one_word() {
        let (out, stats) = pack(b"");
        assert_eq!(stats.code_bits, 1);
        assert_eq!(stats.words, 1);
        assert_eq!(out, vec![0u8; 8]);
    }

    #[test]
    fn test_single_symbol_bits() {
        // 'a' = 1, EOF = 0: three ones then a zero
        let (out, stats) = pack(b"aaa");
        assert_eq!(stats.input_bytes, 3);
        assert_eq!(stats.code_bits, 4);
        assert_eq!(out[0], 0b1110_0000);
    }

    #[test]
    fn test_word_count_is_ceil() {
        // 63 'a' + EOF = 64 bits: exactly one word, no trailing flush
        let (out, stats) = pack(&[b'a'; 63]);
        assert_eq!(stats.code_bits, 64);
        assert_eq!(stats.words, 1);
        assert_eq!(out.len(), 8);
        assert_eq!(u64::from_be_bytes(out[..8].try_into().unwrap()), u64::MAX - 1);

        // 64 'a' + EOF = 65 bits: two words
        let (out, stats) = pack(&[b'a'; 64]);
        assert_eq!(stats.words, 2);
        assert_eq!(out.len(), 16);
        assert_eq!(out[8], 0);
    }

    #[test]
    fn test_codes_split_across_words() {
        let mut table = CodeTable::new();
        table.set(Symbol::Byte(b'x'), CodeEntry::new(0b101, 3));
        table.set(Symbol::PseudoEof, CodeEntry::new(0b0, 1));

        // 21 * 3 = 63 bits, the 22nd code straddles the boundary
        let data = [b'x'; 22];
        let mut out = Vec::new();
        let stats = pack_with_table(Cursor::new(&data[..]), &table, &mut out).unwrap();
        assert_eq!(stats.code_bits, 67);
        assert_eq!(stats.words, 2);

        let first = u64::from_be_bytes(out[..8].try_into().unwrap());
        let second = u64::from_be_bytes(out[8..].try_into().unwrap());
        assert_eq!(first & 1, 1); // leading '1' of the split code
        assert_eq!(second >> 61, 0b010); // remaining "01", then EOF "0"
    }

    #[test]
    fn test_missing_code() {
        let tree = CodeTree::from_frequencies(&FrequencyTable::from_bytes(b"ab").unwrap());
        let err = pack_payload(Cursor::new(b"abc"), &tree, Vec::new()).unwrap_err();
        assert!(matches!(err, OxiHuffError::MissingCode { byte: b'c' }));
    }

    #[test]
    fn test_reserved_byte() {
        let tree = CodeTree::from_frequencies(&FrequencyTable::from_bytes(b"ab").unwrap());
        let err = pack_payload(Cursor::new(vec![b'a', 0xFF]), &tree, Vec::new()).unwrap_err();
        assert!(matches!(err, OxiHuffError::ReservedByte { offset: 1 }));
    }
}
