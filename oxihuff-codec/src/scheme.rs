//! Encoding scheme: the persisted form of a code tree.
//!
//! ## Format
//!
//! ```text
//! [decimal ASCII count]\n
//! count x [symbol: u8][code: u64 little-endian][length: u8]
//! ```
//!
//! Entries are written in wire order. Only the low `length` bits of `code`
//! are meaningful. The tree itself is never stored; readers rebuild it by
//! walking each code from the root (see [`CodeTree::insert_code`]), which is
//! the exact inverse of deriving codes from the tree.

use crate::symbol::{ALPHABET_SIZE, Symbol};
use crate::table::CodeTable;
use crate::tree::CodeTree;
use oxihuff_core::error::{OxiHuffError, Result};
use std::io::{Read, Write};

/// Size of one serialized entry in bytes.
pub const ENTRY_SIZE: usize = 10;

/// Longest count line accepted, newline excluded.
const MAX_COUNT_LINE: usize = 32;

/// One (symbol, code, length) triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemeEntry {
    /// The symbol.
    pub symbol: Symbol,
    /// Code bits, right-aligned.
    pub code: u64,
    /// Number of code bits.
    pub len: u8,
}

impl SchemeEntry {
    fn to_bytes(self) -> [u8; ENTRY_SIZE] {
        let mut buf = [0u8; ENTRY_SIZE];
        buf[0] = self.symbol.to_wire();
        buf[1..9].copy_from_slice(&self.code.to_le_bytes());
        buf[9] = self.len;
        buf
    }

    fn from_bytes(buf: &[u8; ENTRY_SIZE]) -> Self {
        let mut code = [0u8; 8];
        code.copy_from_slice(&buf[1..9]);
        Self {
            symbol: Symbol::from_wire(buf[0]),
            code: u64::from_le_bytes(code),
            len: buf[9],
        }
    }
}

/// A parsed encoding scheme.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scheme {
    entries: Vec<SchemeEntry>,
}

impl Scheme {
    /// Build a scheme from a code table. Absent symbols are skipped.
    pub fn from_table(table: &CodeTable) -> Self {
        let entries = table
            .iter()
            .map(|(symbol, e)| SchemeEntry {
                symbol,
                code: e.code,
                len: e.len,
            })
            .collect();
        Self { entries }
    }

    /// Build a scheme from a tree.
    pub fn from_tree(tree: &CodeTree) -> Result<Self> {
        Ok(Self::from_table(&tree.code_table()?))
    }

    /// The scheme entries.
    pub fn entries(&self) -> &[SchemeEntry] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the scheme has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialized size in bytes.
    pub fn encoded_len(&self) -> usize {
        self.entries.len().to_string().len() + 1 + self.entries.len() * ENTRY_SIZE
    }

    /// Serialize the scheme. Returns the number of bytes written.
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<usize> {
        let header = format!("{}\n", self.entries.len());
        writer.write_all(header.as_bytes())?;
        for entry in &self.entries {
            tracing::trace!(
                symbol = %entry.symbol,
                code = entry.code,
                len = entry.len,
                "scheme entry"
            );
            writer.write_all(&entry.to_bytes())?;
        }
        Ok(header.len() + self.entries.len() * ENTRY_SIZE)
    }

    /// Parse a scheme, consuming exactly its bytes from `reader`.
    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let count = read_count(&mut reader)?;
        let mut entries = Vec::with_capacity(count);
        let mut buf = [0u8; ENTRY_SIZE];

        for i in 0..count {
            reader.read_exact(&mut buf).map_err(|e| {
                OxiHuffError::from_read(e, format!("scheme entry {} of {}", i + 1, count))
            })?;
            let entry = SchemeEntry::from_bytes(&buf);
            tracing::trace!(
                symbol = %entry.symbol,
                code = entry.code,
                len = entry.len,
                "scheme entry"
            );
            entries.push(entry);
        }

        Ok(Self { entries })
    }

    /// Rebuild the code tree described by this scheme.
    pub fn to_tree(&self) -> Result<CodeTree> {
        let mut tree = CodeTree::empty();
        for entry in &self.entries {
            tree.insert_code(entry.symbol, entry.code, entry.len)?;
        }
        Ok(tree)
    }
}

/// Read the decimal count line, one byte at a time so nothing past the
/// newline is consumed.
fn read_count<R: Read>(reader: &mut R) -> Result<usize> {
    let mut line = Vec::new();
    let mut byte = [0u8; 1];

    loop {
        match reader.read(&mut byte) {
            Ok(0) if line.is_empty() => {
                return Err(OxiHuffError::scheme_parse("missing count line"));
            }
            Ok(0) => {
                return Err(OxiHuffError::scheme_parse("unterminated count line"));
            }
            Ok(_) if byte[0] == b'\n' => break,
            Ok(_) => {
                if line.len() >= MAX_COUNT_LINE {
                    return Err(OxiHuffError::scheme_parse("count line too long"));
                }
                line.push(byte[0]);
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    let text = String::from_utf8_lossy(&line);
    let token = text.trim();
    let count: u64 = token.parse().map_err(|_| {
        OxiHuffError::scheme_parse(format!("count {:?} is not a non-negative integer", token))
    })?;
    if count > ALPHABET_SIZE as u64 {
        return Err(OxiHuffError::scheme_parse(format!(
            "count {} exceeds the {} possible symbols",
            count, ALPHABET_SIZE
        )));
    }
    Ok(count as usize)
}

/// Write the scheme of `tree`. Returns the number of bytes written.
pub fn write_scheme<W: Write>(tree: &CodeTree, writer: W) -> Result<usize> {
    let scheme = Scheme::from_tree(tree)?;
    let written = scheme.write_to(writer)?;
    tracing::debug!(entries = scheme.len(), bytes = written, "wrote scheme");
    Ok(written)
}

/// Read a scheme and rebuild its code tree.
pub fn read_scheme<R: Read>(reader: R) -> Result<CodeTree> {
    let scheme = Scheme::read_from(reader)?;
    let tree = scheme.to_tree()?;
    tracing::debug!(entries = scheme.len(), "rebuilt code tree from scheme");
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::freq::FrequencyTable;
    use std::io::Cursor;

    fn tree_for(data: &[u8]) -> CodeTree {
        CodeTree::from_frequencies(&FrequencyTable::from_bytes(data).unwrap())
    }

    #[test]
    fn test_layout() {
        let tree = tree_for(&[b'a'; 3]);
        let mut out = Vec::new();
        let written = write_scheme(&tree, &mut out).unwrap();

        assert_eq!(written, out.len());
        assert_eq!(&out[..2], b"2\n");
        // 'a' = 1 (right), EOF = 0 (left); wire order puts 'a' first
        assert_eq!(out[2], b'a');
        assert_eq!(&out[3..11], &1u64.to_le_bytes());
        assert_eq!(out[11], 1);
        assert_eq!(out[12], 0xFF);
        assert_eq!(&out[13..21], &0u64.to_le_bytes());
        assert_eq!(out[21], 1);
        assert_eq!(out.len(), 2 + 2 * ENTRY_SIZE);
    }

    #[test]
    fn test_rebuild_same_codes() {
        let tree = tree_for(b"she sells sea shells by the sea shore");
        let mut out = Vec::new();
        write_scheme(&tree, &mut out).unwrap();

        let rebuilt = read_scheme(Cursor::new(&out)).unwrap();
        assert_eq!(rebuilt.code_table().unwrap(), tree.code_table().unwrap());
    }

    #[test]
    fn test_read_stops_after_scheme() {
        let tree = tree_for(b"abca");
        let mut out = Vec::new();
        write_scheme(&tree, &mut out).unwrap();
        let scheme_len = out.len();
        out.extend_from_slice(b"PAYLOAD");

        let mut cursor = Cursor::new(&out);
        Scheme::read_from(&mut cursor).unwrap();
        assert_eq!(cursor.position() as usize, scheme_len);
    }

    #[test]
    fn test_encoded_len() {
        let scheme = Scheme::from_tree(&tree_for(b"0123456789")).unwrap();
        let mut out = Vec::new();
        scheme.write_to(&mut out).unwrap();
        assert_eq!(scheme.encoded_len(), out.len());
    }

    #[test]
    fn test_count_not_a_number() {
        let err = Scheme::read_from(Cursor::new(b"xyz\n")).unwrap_err();
        assert!(matches!(err, OxiHuffError::SchemeParse { .. }));
    }

    #[test]
    fn test_count_negative() {
        let err = Scheme::read_from(Cursor::new(b"-1\n")).unwrap_err();
        assert!(matches!(err, OxiHuffError::SchemeParse { .. }));
    }

    #[test]
    fn test_count_missing_or_unterminated() {
        let err = Scheme::read_from(Cursor::new(b"")).unwrap_err();
        assert!(matches!(err, OxiHuffError::SchemeParse { .. }));
        let err = Scheme::read_from(Cursor::new(b"12")).unwrap_err();
        assert!(matches!(err, OxiHuffError::SchemeParse { .. }));
    }

    #[test]
    fn test_count_too_large() {
        let err = Scheme::read_from(Cursor::new(b"257\n")).unwrap_err();
        assert!(matches!(err, OxiHuffError::SchemeParse { .. }));
    }

    #[test]
    fn test_count_tolerates_crlf() {
        let scheme = Scheme::read_from(Cursor::new(b"0\r\n")).unwrap();
        assert!(scheme.is_empty());
    }

    #[test]
    fn test_truncated_entries() {
        let mut data = b"2\n".to_vec();
        data.extend_from_slice(&[b'a', 1, 0, 0, 0, 0, 0, 0, 0, 1]);
        data.extend_from_slice(&[0xFF, 0, 0]);
        let err = Scheme::read_from(Cursor::new(data)).unwrap_err();
        assert!(matches!(err, OxiHuffError::PrematureEnd { .. }));
    }

    #[test]
    fn test_conflicting_entries() {
        let mut data = b"2\n".to_vec();
        data.extend_from_slice(&[b'a', 1, 0, 0, 0, 0, 0, 0, 0, 1]);
        data.extend_from_slice(&[b'b', 1, 0, 0, 0, 0, 0, 0, 0, 1]);
        let err = read_scheme(Cursor::new(data)).unwrap_err();
        assert!(matches!(err, OxiHuffError::CorruptScheme { symbol: b'b', .. }));
    }

    #[test]
    fn test_zero_length_entry() {
        let mut data = b"1\n".to_vec();
        data.extend_from_slice(&[b'a', 0, 0, 0, 0, 0, 0, 0, 0, 0]);
        let err = read_scheme(Cursor::new(data)).unwrap_err();
        assert!(matches!(err, OxiHuffError::CorruptScheme { .. }));
    }

    #[test]
    fn test_high_code_bits_ignored() {
        // Bits above the code length are unused by the reader
        let mut data = b"2\n".to_vec();
        data.extend_from_slice(&[b'a', 0b11, 0, 0, 0, 0, 0, 0, 0x80, 1]);
        data.extend_from_slice(&[0xFF, 0b10, 0, 0, 0, 0, 0, 0, 0, 1]);
        let tree = read_scheme(Cursor::new(data)).unwrap();
        let table = tree.code_table().unwrap();
        assert_eq!(table.get(Symbol::Byte(b'a')).map(|e| e.code), Some(1));
        assert_eq!(table.get(Symbol::PseudoEof).map(|e| e.code), Some(0));
    }
}
