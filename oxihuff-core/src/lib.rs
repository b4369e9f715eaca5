//! # OxiHuff Core
//!
//! Core components for the OxiHuff compressor.
//!
//! This crate provides the fundamental building blocks used by the codec:
//!
//! - [`bitstream`]: 64-bit word packing and MSB-first bit reading
//! - [`source`]: Pull-based byte source with an explicit exhausted state
//! - [`error`]: Error types
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ L3: Command line                                        │
//! │     oxihuff compress / decompress / info / test         │
//! ├─────────────────────────────────────────────────────────┤
//! │ L2: Codec                                               │
//! │     Frequency count, tree, scheme, pack/unpack          │
//! ├─────────────────────────────────────────────────────────┤
//! │ L1: BitStream (this crate)                              │
//! │     WordWriter/BitReader, ByteSource, errors            │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use oxihuff_core::bitstream::{BitReader, WordWriter};
//! use std::io::Cursor;
//!
//! let mut packed = Vec::new();
//! let mut writer = WordWriter::new(&mut packed);
//! writer.write_code(0b110, 3).unwrap();
//! writer.finish().unwrap();
//!
//! let mut reader = BitReader::new(Cursor::new(packed));
//! assert_eq!(reader.read_bit().unwrap(), Some(true));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod bitstream;
pub mod error;
pub mod source;

// Re-exports for convenience
pub use bitstream::{BitReader, WordWriter};
pub use error::{OxiHuffError, Result};
pub use source::ByteSource;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bitstream::{BitReader, WordWriter};
    pub use crate::error::{OxiHuffError, Result};
    pub use crate::source::ByteSource;
}
