//! Decompress command implementation.

use crate::utils::{create_output, create_progress_bar, discard_output, format_size, open_input};
use oxihuff_codec::{read_scheme, unpack_payload};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

pub fn cmd_decompress(
    input: &Path,
    output: &Path,
    progress: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let (file, size) = open_input(input)?;
    let pb = create_progress_bar(size, progress);
    let mut reader = pb.wrap_read(BufReader::new(file));

    // A bad scheme fails before the output file exists
    let tree = read_scheme(&mut reader)?;

    let out = create_output(output, input)?;
    let mut writer = BufWriter::new(out);

    let result = unpack_payload(&mut reader, &tree, &mut writer).and_then(|stats| {
        writer.flush()?;
        Ok(stats)
    });
    pb.finish_and_clear();

    match result {
        Ok(stats) => {
            println!(
                "{} -> {} ({})",
                input.display(),
                output.display(),
                format_size(stats.output_bytes)
            );
            Ok(())
        }
        Err(e) => {
            drop(writer);
            discard_output(output);
            Err(e.into())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_decompress_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data.huf");
        let output = dir.path().join("data.txt");
        let text = b"round and round the rugged rock the ragged rascal ran";
        fs::write(&input, oxihuff_codec::compress_bytes(text).unwrap()).unwrap();

        cmd_decompress(&input, &output, false).unwrap();
        assert_eq!(fs::read(&output).unwrap(), text);
    }

    #[test]
    fn test_bad_scheme_creates_no_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.huf");
        let output = dir.path().join("bad.txt");
        fs::write(&input, b"xyz\n0123456789").unwrap();

        let err = cmd_decompress(&input, &output, false).unwrap_err();
        assert!(err.to_string().contains("Invalid scheme header"));
        assert!(!output.exists());
    }

    #[test]
    fn test_truncated_payload_removes_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("cut.huf");
        let output = dir.path().join("cut.txt");
        let mut compressed = oxihuff_codec::compress_bytes(&[b'z'; 500]).unwrap();
        compressed.truncate(compressed.len() - 8);
        fs::write(&input, compressed).unwrap();

        assert!(cmd_decompress(&input, &output, false).is_err());
        assert!(!output.exists());
    }
}
