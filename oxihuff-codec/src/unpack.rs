//! Payload decoding.
//!
//! [`Decoder`] is a bit-driven state machine over a [`CodeTree`]:
//!
//! ```text
//!            bit                 leaf (byte)
//!   AtRoot ───────► InTree ───────────────► emit, back to AtRoot
//!                     │ ▲
//!                     └─┘ bit (branch)
//!                     │
//!                     └────────────────────► End   (leaf = pseudo-EOF)
//! ```
//!
//! Decoding finishes only at the pseudo-EOF leaf; bits after it are never
//! examined. Running out of input before that is a premature end.

use crate::symbol::Symbol;
use crate::tree::{CodeTree, Node, NodeId};
use oxihuff_core::{BitReader, ByteSource};
use oxihuff_core::error::{OxiHuffError, Result};
use std::io::{Read, Write};

/// Output is staged in chunks of this size before being written.
const OUTPUT_CHUNK: usize = 32 * 1024;

/// Position of the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeState {
    /// At the tree root, between symbols.
    AtRoot,
    /// Partway down the tree.
    InTree(NodeId),
    /// The pseudo-EOF leaf was reached.
    End,
}

/// Result of feeding one bit to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// More bits are needed to finish the current symbol.
    Pending,
    /// A leaf was reached; the byte should be emitted.
    Symbol(u8),
    /// The pseudo-EOF leaf was reached.
    End,
}

/// Bit-at-a-time Huffman decoder.
#[derive(Debug, Clone)]
pub struct Decoder<'t> {
    tree: &'t CodeTree,
    state: DecodeState,
    bits_consumed: u64,
}

impl<'t> Decoder<'t> {
    /// Create a decoder positioned at the root of `tree`.
    pub fn new(tree: &'t CodeTree) -> Self {
        Self {
            tree,
            state: DecodeState::AtRoot,
            bits_consumed: 0,
        }
    }

    /// Current state.
    pub fn state(&self) -> DecodeState {
        self.state
    }

    /// Check if the pseudo-EOF has been reached.
    pub fn is_finished(&self) -> bool {
        self.state == DecodeState::End
    }

    /// Number of bits consumed so far.
    pub fn bits_consumed(&self) -> u64 {
        self.bits_consumed
    }

    /// Follow one bit (false = left, true = right).
    ///
    /// Bits fed after [`Step::End`] are ignored.
    pub fn push_bit(&mut self, bit: bool) -> Result<Step> {
        let from = match self.state {
            DecodeState::End => return Ok(Step::End),
            DecodeState::AtRoot => self.tree.root(),
            DecodeState::InTree(node) => node,
        };

        let position = self.bits_consumed;
        self.bits_consumed += 1;

        let next = self
            .tree
            .child(from, bit)
            .ok_or_else(|| OxiHuffError::corrupt_payload(position))?;

        match *self.tree.node(next) {
            Node::Leaf {
                symbol: Symbol::PseudoEof,
            } => {
                self.state = DecodeState::End;
                Ok(Step::End)
            }
            Node::Leaf {
                symbol: Symbol::Byte(byte),
            } => {
                self.state = DecodeState::AtRoot;
                Ok(Step::Symbol(byte))
            }
            Node::Internal { .. } => {
                self.state = DecodeState::InTree(next);
                Ok(Step::Pending)
            }
        }
    }
}

/// Counters from an unpacking run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UnpackStats {
    /// Payload bytes consumed, up to and including the one holding the
    /// end of the pseudo-EOF code.
    pub input_bytes: u64,
    /// Decoded bytes written.
    pub output_bytes: u64,
}

/// Decode the payload in `reader` with `tree`, writing the bytes to `writer`.
///
/// Fails with [`OxiHuffError::CorruptPayload`] on a bit with no matching
/// branch and [`OxiHuffError::PrematureEnd`] if the input ends before the
/// pseudo-EOF code.
///
/// `reader` is pulled one byte at a time and is left positioned just after
/// the byte holding the last bit of the pseudo-EOF code. Wrap unbuffered
/// readers in a `BufReader`.
pub fn unpack_payload<R: Read, W: Write>(
    reader: R,
    tree: &CodeTree,
    mut writer: W,
) -> Result<UnpackStats> {
    let mut bits = BitReader::from_source(ByteSource::with_capacity(1, reader));
    let mut decoder = Decoder::new(tree);
    let mut staged = Vec::with_capacity(OUTPUT_CHUNK);
    let mut output_bytes = 0u64;

    loop {
        let Some(bit) = bits.read_bit()? else {
            writer.write_all(&staged)?;
            return Err(OxiHuffError::premature_end(format!(
                "payload ended after {} bits without an end-of-stream code",
                bits.bit_position()
            )));
        };

        let step = match decoder.push_bit(bit) {
            Ok(step) => step,
            Err(e) => {
                writer.write_all(&staged)?;
                return Err(e);
            }
        };

        match step {
            Step::Pending => {}
            Step::Symbol(byte) => {
                staged.push(byte);
                output_bytes += 1;
                if staged.len() == OUTPUT_CHUNK {
                    writer.write_all(&staged)?;
                    staged.clear();
                }
            }
            Step::End => break,
        }
    }

    writer.write_all(&staged)?;
    writer.flush()?;

    let stats = UnpackStats {
        input_bytes: bits.bytes_read(),
        output_bytes,
    };
    tracing::debug!(
        input_bytes = stats.input_bytes,
        output_bytes = stats.output_bytes,
        ignored_bits = bits.unread_bits(),
        "unpacked payload"
    );
    Ok(stats)
}
