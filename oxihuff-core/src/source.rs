//! Pull-based byte source.
//!
//! [`ByteSource`] turns any `Read` into a lazy sequence of bytes with an
//! explicit exhausted state. The state is checked before a byte is handed
//! out, so callers never see a stale byte after the end of input.

use crate::error::Result;
use std::io::{self, Read};

/// Default internal buffer size.
const DEFAULT_CAPACITY: usize = 8192;

/// A buffered, pull-based byte reader.
#[derive(Debug)]
pub struct ByteSource<R: Read> {
    /// Underlying reader.
    reader: R,
    /// Read-ahead buffer.
    buffer: Box<[u8]>,
    /// Next unread index in `buffer`.
    pos: usize,
    /// Number of valid bytes in `buffer`.
    len: usize,
    /// Set once the reader has returned end of input.
    exhausted: bool,
    /// Bytes handed out so far.
    consumed: u64,
}

impl<R: Read> ByteSource<R> {
    /// Create a new source with the default buffer size.
    pub fn new(reader: R) -> Self {
        Self::with_capacity(DEFAULT_CAPACITY, reader)
    }

    /// Create a new source with the given buffer size (at least 1).
    pub fn with_capacity(capacity: usize, reader: R) -> Self {
        Self {
            reader,
            buffer: vec![0u8; capacity.max(1)].into_boxed_slice(),
            pos: 0,
            len: 0,
            exhausted: false,
            consumed: 0,
        }
    }

    /// Number of bytes handed out so far.
    pub fn bytes_consumed(&self) -> u64 {
        self.consumed
    }

    /// Refill the buffer if it is empty. Returns `false` at end of input.
    fn fill(&mut self) -> Result<bool> {
        if self.pos < self.len {
            return Ok(true);
        }
        if self.exhausted {
            return Ok(false);
        }

        loop {
            match self.reader.read(&mut self.buffer) {
                Ok(0) => {
                    self.exhausted = true;
                    return Ok(false);
                }
                Ok(n) => {
                    self.pos = 0;
                    self.len = n;
                    return Ok(true);
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Check whether the input is exhausted without consuming anything.
    pub fn is_exhausted(&mut self) -> Result<bool> {
        Ok(!self.fill()?)
    }

    /// Pull the next byte, or `None` once the input is exhausted.
    #[inline]
    pub fn next_byte(&mut self) -> Result<Option<u8>> {
        if !self.fill()? {
            return Ok(None);
        }
        let byte = self.buffer[self.pos];
        self.pos += 1;
        self.consumed += 1;
        Ok(Some(byte))
    }
}

impl<R: Read> Iterator for ByteSource<R> {
    type Item = Result<u8>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_byte().transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_pulls_all_bytes() {
        let mut source = ByteSource::with_capacity(3, Cursor::new(b"abcdefg".to_vec()));
        let mut out = Vec::new();
        while let Some(b) = source.next_byte().unwrap() {
            out.push(b);
        }
        assert_eq!(out, b"abcdefg");
        assert_eq!(source.bytes_consumed(), 7);
        assert!(source.is_exhausted().unwrap());
        assert_eq!(source.next_byte().unwrap(), None);
    }

    #[test]
    fn test_empty_is_exhausted_up_front() {
        let mut source = ByteSource::new(Cursor::new(Vec::new()));
        assert!(source.is_exhausted().unwrap());
        assert_eq!(source.bytes_consumed(), 0);
    }

    #[test]
    fn test_is_exhausted_does_not_consume() {
        let mut source = ByteSource::new(Cursor::new(vec![7u8]));
        assert!(!source.is_exhausted().unwrap());
        assert_eq!(source.next_byte().unwrap(), Some(7));
    }

    #[test]
    fn test_iterator() {
        let source = ByteSource::new(Cursor::new(vec![1u8, 2, 3]));
        let bytes: Result<Vec<u8>> = source.collect();
        assert_eq!(bytes.unwrap(), vec![1, 2, 3]);
    }
}
