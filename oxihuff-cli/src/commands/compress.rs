//! Compress command implementation.

use crate::utils::{create_output, create_progress_bar, discard_output, format_size, open_input};
use oxihuff_codec::{CompressStats, compress};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

pub fn cmd_compress(
    input: &Path,
    output: &Path,
    progress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (file, size) = open_input(input)?;
    let out = create_output(output, input)?;

    match compress_file(file, size, out, progress) {
        Ok(stats) => {
            let ratio = if stats.input_bytes > 0 {
                format!("{:.1}%", stats.ratio() * 100.0)
            } else {
                "-".to_string()
            };
            println!(
                "{} -> {} ({} -> {}, {})",
                input.display(),
                output.display(),
                format_size(stats.input_bytes),
                format_size(stats.output_bytes()),
                ratio
            );
            Ok(())
        }
        Err(e) => {
            discard_output(output);
            Err(e)
        }
    }
}

/// Count, emit the scheme, rewind, and pack.
fn compress_file(
    file: File,
    size: u64,
    out: File,
    progress: bool,
) -> Result<CompressStats, Box<dyn std::error::Error>> {
    let pb = create_progress_bar(size, progress);
    let mut reader = pb.wrap_read(BufReader::new(file));
    let mut writer = BufWriter::new(out);

    let stats = compress(&mut reader, &mut writer)?;
    writer.flush()?;
    pb.finish_and_clear();

    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_compress_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("plain.txt");
        let output = dir.path().join("plain.huf");
        fs::write(&input, b"abca").unwrap();

        cmd_compress(&input, &output, false).unwrap();

        let compressed = fs::read(&output).unwrap();
        assert_eq!(
            oxihuff_codec::decompress_bytes(&compressed).unwrap(),
            b"abca"
        );
    }

    #[test]
    fn test_compress_file_stats() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("zeros.bin");
        let output = dir.path().join("zeros.huf");
        fs::write(&input, vec![0u8; 4096]).unwrap();

        let (file, size) = open_input(&input).unwrap();
        let stats = compress_file(file, size, File::create(&output).unwrap(), false).unwrap();
        assert_eq!(stats.input_bytes, 4096);
        assert_eq!(stats.output_bytes(), fs::metadata(&output).unwrap().len());
        assert!(stats.ratio() < 0.2);
    }

    #[test]
    fn test_reserved_byte_leaves_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("binary.bin");
        let output = dir.path().join("binary.huf");
        fs::write(&input, [0x00, 0xFF, 0x01]).unwrap();

        assert!(cmd_compress(&input, &output, false).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("out.huf");
        assert!(cmd_compress(&dir.path().join("missing"), &output, false).is_err());
        assert!(!output.exists());
    }
}
