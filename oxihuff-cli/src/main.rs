//! OxiHuff CLI - byte-oriented Huffman compression
//!
//! Compresses files into a scheme header plus a packed payload, and restores
//! them again.

mod commands;
mod utils;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use commands::{cmd_compress, cmd_decompress, cmd_info, cmd_test};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "oxihuff")]
#[command(author, version, about = "OxiHuff - Pure Rust Huffman compressor")]
#[command(long_about = "
OxiHuff compresses files with a static Huffman code built from the file's
own byte frequencies. The code table is stored in front of the payload.

Input files must not contain the byte 0xFF, which marks end of stream.

Examples:
  oxihuff compress notes.txt notes.huf
  oxihuff decompress notes.huf notes.txt
  oxihuff info notes.huf
  oxihuff info --json notes.huf
  oxihuff test notes.huf

Set OXIHUFF_LOG (e.g. OXIHUFF_LOG=trace) to control diagnostic output.
")]
struct Cli {
    /// Show debug diagnostics on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compress a file
    #[command(alias = "c")]
    Compress {
        /// File to compress
        input: PathBuf,

        /// Compressed output file
        output: PathBuf,

        /// Show progress bar
        #[arg(short = 'P', long)]
        progress: bool,
    },

    /// Decompress a file
    #[command(alias = "d", alias = "x")]
    Decompress {
        /// Compressed file
        input: PathBuf,

        /// Restored output file
        output: PathBuf,

        /// Show progress bar
        #[arg(short = 'P', long)]
        progress: bool,
    },

    /// Show the encoding scheme of a compressed file
    #[command(alias = "i")]
    Info {
        /// Compressed file to inspect
        file: PathBuf,

        /// Output as JSON (machine-readable)
        #[arg(short, long)]
        json: bool,
    },

    /// Test compressed file integrity
    #[command(alias = "t")]
    Test {
        /// Compressed file to test
        file: PathBuf,
    },

    /// Generate shell completions
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    utils::init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Compress {
            input,
            output,
            progress,
        } => cmd_compress(&input, &output, progress),
        Commands::Decompress {
            input,
            output,
            progress,
        } => cmd_decompress(&input, &output, progress),
        Commands::Info { file, json } => cmd_info(&file, json),
        Commands::Test { file } => cmd_test(&file, cli.verbose),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "oxihuff",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
