//! Info command implementation.

use crate::utils::{format_size, open_input};
use oxihuff_codec::{Scheme, SchemeEntry};
use serde::Serialize;
use std::io::BufReader;
use std::path::Path;

/// JSON view of a compressed file.
#[derive(Debug, Serialize)]
struct InfoOutput {
    file: String,
    size: u64,
    scheme_bytes: u64,
    payload_bytes: u64,
    symbols: usize,
    max_code_length: u8,
    entries: Vec<EntryOutput>,
}

/// JSON view of one scheme entry.
#[derive(Debug, Serialize)]
struct EntryOutput {
    symbol: u8,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    end_of_stream: bool,
    code: String,
    length: u8,
}

impl From<&SchemeEntry> for EntryOutput {
    fn from(entry: &SchemeEntry) -> Self {
        Self {
            symbol: entry.symbol.to_wire(),
            end_of_stream: entry.symbol.is_pseudo_eof(),
            code: bit_string(entry),
            length: entry.len,
        }
    }
}

fn bit_string(entry: &SchemeEntry) -> String {
    oxihuff_codec::CodeEntry::new(entry.code, entry.len).bit_string()
}

pub fn cmd_info(file: &Path, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (handle, size) = open_input(file)?;
    let scheme = Scheme::read_from(BufReader::new(handle))?;
    let info = describe(file, size, &scheme);

    if json {
        println!("{}", serde_json::to_string_pretty(&info)?);
        return Ok(());
    }

    println!("Compressed File Information");
    println!("===========================");
    println!("File: {}", info.file);
    println!("Size: {} bytes ({})", info.size, format_size(info.size));
    println!("Scheme: {} bytes, {} symbols", info.scheme_bytes, info.symbols);
    println!(
        "Payload: {} bytes ({} words)",
        info.payload_bytes,
        info.payload_bytes / 8
    );
    println!("Longest code: {} bits", info.max_code_length);
    println!();
    println!("{:>6}  {:>6}  {:>3}  Code", "Symbol", "Byte", "Len");
    println!("{}", "-".repeat(40));
    for entry in scheme.entries() {
        println!(
            "{:>6}  {:>#6x}  {:>3}  {}",
            entry.symbol.to_string(),
            entry.symbol.to_wire(),
            entry.len,
            bit_string(entry)
        );
    }

    Ok(())
}

fn describe(file: &Path, size: u64, scheme: &Scheme) -> InfoOutput {
    let scheme_bytes = scheme.encoded_len() as u64;
    InfoOutput {
        file: file.display().to_string(),
        size,
        scheme_bytes,
        payload_bytes: size.saturating_sub(scheme_bytes),
        symbols: scheme.len(),
        max_code_length: scheme.entries().iter().map(|e| e.len).max().unwrap_or(0),
        entries: scheme.entries().iter().map(EntryOutput::from).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;

    #[test]
    fn test_describe() {
        let compressed = oxihuff_codec::compress_bytes(b"abca").unwrap();
        let scheme = Scheme::read_from(Cursor::new(&compressed)).unwrap();
        let info = describe(Path::new("abca.huf"), compressed.len() as u64, &scheme);

        assert_eq!(info.symbols, 4);
        assert_eq!(info.scheme_bytes, 42);
        assert_eq!(info.payload_bytes, 8);
        assert_eq!(info.max_code_length, 2);
        assert!(info.entries.last().unwrap().end_of_stream);
    }

    #[test]
    fn test_json_shape() {
        let compressed = oxihuff_codec::compress_bytes(b"aaa").unwrap();
        let scheme = Scheme::read_from(Cursor::new(&compressed)).unwrap();
        let info = describe(Path::new("a.huf"), compressed.len() as u64, &scheme);

        let value = serde_json::to_value(&info).unwrap();
        assert_eq!(value["symbols"], 2);
        assert_eq!(value["entries"][0]["code"], "1");
        assert!(value["entries"][0].get("end_of_stream").is_none());
        assert_eq!(value["entries"][1]["end_of_stream"], true);
    }

    #[test]
    fn test_cmd_info_on_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.huf");
        fs::write(&path, oxihuff_codec::compress_bytes(b"hello").unwrap()).unwrap();
        cmd_info(&path, false).unwrap();
        cmd_info(&path, true).unwrap();
    }
}
