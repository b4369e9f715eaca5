//! Byte frequency counting.

use crate::symbol::{ALPHABET_SIZE, PSEUDO_EOF, Symbol};
use oxihuff_core::ByteSource;
use oxihuff_core::error::{OxiHuffError, Result};
use std::io::Read;

/// Occurrence counts for every symbol, indexed by wire value.
///
/// The pseudo-EOF slot is always exactly 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; ALPHABET_SIZE],
}

impl FrequencyTable {
    /// Create a table with no bytes counted (only the pseudo-EOF).
    pub fn new() -> Self {
        let mut counts = [0u64; ALPHABET_SIZE];
        counts[PSEUDO_EOF as usize] = 1;
        Self { counts }
    }

    /// Count every byte of `reader` until it is exhausted.
    ///
    /// Fails with [`OxiHuffError::ReservedByte`] if the input contains the
    /// pseudo-EOF wire value.
    pub fn count<R: Read>(reader: R) -> Result<Self> {
        let mut table = Self::new();
        let mut source = ByteSource::new(reader);
        while let Some(byte) = source.next_byte()? {
            table.add(byte, source.bytes_consumed() - 1)?;
        }
        Ok(table)
    }

    /// Count the bytes of an in-memory slice.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let mut table = Self::new();
        for (offset, &byte) in data.iter().enumerate() {
            table.add(byte, offset as u64)?;
        }
        Ok(table)
    }

    #[inline]
    fn add(&mut self, byte: u8, offset: u64) -> Result<()> {
        if byte == PSEUDO_EOF {
            return Err(OxiHuffError::reserved_byte(offset));
        }
        self.counts[byte as usize] += 1;
        Ok(())
    }

    /// Count for a symbol.
    pub fn get(&self, symbol: Symbol) -> u64 {
        self.counts[symbol.index()]
    }

    /// Number of payload bytes counted.
    pub fn total_bytes(&self) -> u64 {
        self.iter()
            .filter(|(s, _)| !s.is_pseudo_eof())
            .map(|(_, c)| c)
            .sum()
    }

    /// Number of distinct byte values seen (excluding the pseudo-EOF).
    pub fn distinct_bytes(&self) -> usize {
        self.iter().filter(|(s, _)| !s.is_pseudo_eof()).count()
    }

    /// Iterate over symbols with a nonzero count, in wire order.
    ///
    /// The pseudo-EOF always comes last.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &count)| count > 0)
            .map(|(i, &count)| (Symbol::from_wire(i as u8), count))
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}
