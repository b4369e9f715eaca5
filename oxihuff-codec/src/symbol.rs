//! Symbols of the Huffman alphabet.
//!
//! The alphabet is every byte value plus a synthetic end-of-stream marker.
//! In memory the marker is its own variant; on the wire it shares the byte
//! value [`PSEUDO_EOF`], which is why raw input may not contain that byte.

use std::fmt;

/// Number of wire slots (one per byte value).
pub const ALPHABET_SIZE: usize = 256;

/// Wire value used for the pseudo-EOF marker.
pub const PSEUDO_EOF: u8 = 0xFF;

/// A symbol of the Huffman alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    /// A literal payload byte.
    Byte(u8),
    /// End of the logical payload.
    PseudoEof,
}

impl Symbol {
    /// Decode a symbol from its wire value.
    pub const fn from_wire(value: u8) -> Self {
        if value == PSEUDO_EOF {
            Self::PseudoEof
        } else {
            Self::Byte(value)
        }
    }

    /// Wire value of this symbol.
    pub const fn to_wire(self) -> u8 {
        match self {
            Self::Byte(b) => b,
            Self::PseudoEof => PSEUDO_EOF,
        }
    }

    /// Index into 256-entry tables.
    pub const fn index(self) -> usize {
        self.to_wire() as usize
    }

    /// Check if this is the pseudo-EOF marker.
    pub const fn is_pseudo_eof(self) -> bool {
        matches!(self, Self::PseudoEof)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PseudoEof => write!(f, "EOF"),
            Self::Byte(b) if b.is_ascii_graphic() => write!(f, "'{}'", *b as char),
            Self::Byte(b) => write!(f, "0x{:02x}", b),
        }
    }
}
