//! Symbol to code lookup table.

use crate::symbol::{ALPHABET_SIZE, Symbol};

/// Longest code that fits a 64-bit code word.
pub const MAX_CODE_LENGTH: u8 = 64;

/// A single code: the low `len` bits of `code`, read MSB first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CodeEntry {
    /// Code bits, right-aligned.
    pub code: u64,
    /// Number of bits; 0 means the symbol is absent.
    pub len: u8,
}

impl CodeEntry {
    /// Create a new code entry.
    pub const fn new(code: u64, len: u8) -> Self {
        Self { code, len }
    }

    /// Check if the entry holds a code.
    pub const fn is_present(&self) -> bool {
        self.len > 0
    }

    /// Check if this code is a prefix of `other` (or equal to it).
    pub fn is_prefix_of(&self, other: &CodeEntry) -> bool {
        if self.len == 0 || self.len > other.len {
            return false;
        }
        let shift = other.len - self.len;
        let other_head = if shift >= MAX_CODE_LENGTH {
            0
        } else {
            other.code >> shift
        };
        other_head == self.code
    }

    /// Render the code as a string of `0` and `1`.
    pub fn bit_string(&self) -> String {
        (0..self.len)
            .rev()
            .map(|i| if (self.code >> i) & 1 == 1 { '1' } else { '0' })
            .collect()
    }
}

/// Codes for every symbol, indexed by wire value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTable {
    entries: [CodeEntry; ALPHABET_SIZE],
}

impl CodeTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            entries: [CodeEntry::default(); ALPHABET_SIZE],
        }
    }

    /// Look up the code of a symbol, if it has one.
    #[inline]
    pub fn get(&self, symbol: Symbol) -> Option<CodeEntry> {
        let entry = self.entries[symbol.index()];
        entry.is_present().then_some(entry)
    }

    pub(crate) fn set(&mut self, symbol: Symbol, entry: CodeEntry) {
        self.entries[symbol.index()] = entry;
    }

    /// Iterate over present codes in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, CodeEntry)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_present())
            .map(|(i, &e)| (Symbol::from_wire(i as u8), e))
    }

    /// Number of symbols with a code.
    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| e.is_present()).count()
    }

    /// Check if no symbol has a code.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for CodeTable {
    fn default() -> Self {
        Self::new()
    }
}
