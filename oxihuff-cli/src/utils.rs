//! Utility functions for the CLI.

use indicatif::{ProgressBar, ProgressStyle};
use oxihuff_core::OxiHuffError;
use std::fs::{self, File};
use std::io;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "OXIHUFF_LOG";

/// Install the stderr log subscriber.
///
/// `OXIHUFF_LOG` wins when set; otherwise `--verbose` selects `debug` and
/// the default is `warn`.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

/// Create a byte progress bar with standard styling.
pub fn create_progress_bar(len: u64, enable: bool) -> ProgressBar {
    if !enable {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} {msg}")
            .expect("progress bar template is valid")
            .progress_chars("█▓▒░ "),
    );
    pb
}

/// Open an input file, checking that it is an existing regular file.
pub fn open_input(path: &Path) -> Result<(File, u64), OxiHuffError> {
    let metadata =
        fs::metadata(path).map_err(|e| OxiHuffError::stream_unavailable(path, e))?;
    if !metadata.is_file() {
        return Err(OxiHuffError::stream_unavailable(
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "not a regular file"),
        ));
    }
    let file = File::open(path).map_err(|e| OxiHuffError::stream_unavailable(path, e))?;
    Ok((file, metadata.len()))
}

/// Create the output file, refusing to overwrite the input.
pub fn create_output(path: &Path, input: &Path) -> Result<File, OxiHuffError> {
    if let (Ok(out), Ok(inp)) = (fs::canonicalize(path), fs::canonicalize(input)) {
        if out == inp {
            return Err(OxiHuffError::stream_unavailable(
                path,
                io::Error::new(io::ErrorKind::InvalidInput, "output would overwrite input"),
            ));
        }
    }
    File::create(path).map_err(|e| OxiHuffError::stream_unavailable(path, e))
}

/// Remove a partially written output file, ignoring failures.
pub fn discard_output(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        tracing::warn!(path = %path.display(), error = %e, "could not remove partial output");
    }
}

/// Format a byte count for humans.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KiB", "MiB", "GiB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}
