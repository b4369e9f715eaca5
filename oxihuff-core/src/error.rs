//! Error types for OxiHuff operations.
//!
//! This module provides a single error type covering every failure the
//! Huffman core can report: unusable streams, malformed scheme headers,
//! structural conflicts while rebuilding a code tree, and payloads that
//! cannot be walked to their end marker.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// The main error type for OxiHuff operations.
#[derive(Debug, Error)]
pub enum OxiHuffError {
    /// I/O error from underlying reader/writer.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An input or output stream could not be opened or is not usable.
    #[error("Stream unavailable: {}: {source}", path.display())]
    StreamUnavailable {
        /// Path of the stream that could not be used.
        path: PathBuf,
        /// Underlying cause.
        source: io::Error,
    },

    /// The scheme's count line is missing or not a valid non-negative integer.
    #[error("Invalid scheme header: {message}")]
    SchemeParse {
        /// Description of the parse failure.
        message: String,
    },

    /// Structural conflict while rebuilding a code tree from a scheme.
    #[error("Corrupted encoding scheme at symbol {symbol:#04x}: {message}")]
    CorruptScheme {
        /// Wire value of the symbol whose entry could not be placed.
        symbol: u8,
        /// Description of the conflict.
        message: String,
    },

    /// The payload requires a tree branch that does not exist.
    #[error("Corrupted payload at bit position {bit_position}")]
    CorruptPayload {
        /// Payload bit position where decoding failed.
        bit_position: u64,
    },

    /// Input ran out before the scheme or payload was complete.
    #[error("Premature end of input: {context}")]
    PrematureEnd {
        /// What was being read when the input ran out.
        context: String,
    },

    /// The input contains the byte value reserved for the end-of-stream marker.
    #[error("Input byte at offset {offset} collides with the reserved end marker 0xff")]
    ReservedByte {
        /// Byte offset of the reserved value in the input.
        offset: u64,
    },

    /// A code tree path does not fit in a 64-bit code word.
    #[error("Code length {depth} exceeds the 64-bit code limit")]
    CodeTooLong {
        /// Depth of the offending leaf.
        depth: usize,
    },

    /// The packer was given a byte for which the code table has no entry.
    #[error("No code assigned for byte {byte:#04x}")]
    MissingCode {
        /// The byte without a code.
        byte: u8,
    },
}

/// Result type alias for OxiHuff operations.
pub type Result<T> = std::result::Result<T, OxiHuffError>;

impl OxiHuffError {
    /// Create a stream unavailable error.
    pub fn stream_unavailable(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::StreamUnavailable {
            path: path.into(),
            source,
        }
    }

    /// Create a scheme parse error.
    pub fn scheme_parse(message: impl Into<String>) -> Self {
        Self::SchemeParse {
            message: message.into(),
        }
    }

    /// Create a corrupted scheme error.
    pub fn corrupt_scheme(symbol: u8, message: impl Into<String>) -> Self {
        Self::CorruptScheme {
            symbol,
            message: message.into(),
        }
    }

    /// Create a corrupted payload error.
    pub fn corrupt_payload(bit_position: u64) -> Self {
        Self::CorruptPayload { bit_position }
    }

    /// Create a premature end error.
    pub fn premature_end(context: impl Into<String>) -> Self {
        Self::PrematureEnd {
            context: context.into(),
        }
    }

    /// Create a reserved byte error.
    pub fn reserved_byte(offset: u64) -> Self {
        Self::ReservedByte { offset }
    }

    /// Create a code too long error.
    pub fn code_too_long(depth: usize) -> Self {
        Self::CodeTooLong { depth }
    }

    /// Create a missing code error.
    pub fn missing_code(byte: u8) -> Self {
        Self::MissingCode { byte }
    }

    /// Map an `UnexpectedEof` I/O error to [`OxiHuffError::PrematureEnd`].
    ///
    /// Other I/O errors are passed through unchanged.
    pub fn from_read(err: io::Error, context: impl Into<String>) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Self::premature_end(context)
        } else {
            Self::Io(err)
        }
    }
}
