//! Huffman code tree.
//!
//! The tree is stored as an arena of nodes addressed by [`NodeId`]. A node
//! is either an internal branch or a leaf holding one symbol; the variant
//! alone tells them apart, so no symbol value is reserved as a marker.
//!
//! Trees come from two places:
//!
//! - [`CodeTree::from_frequencies`]: the classic Huffman merge over a
//!   min-priority queue.
//! - [`crate::scheme`]: rebuilt code by code from a persisted scheme via
//!   [`CodeTree::insert_code`].
//!
//! Reading the path from the root to a leaf as left=0 / right=1 gives that
//! leaf's code.

use crate::freq::FrequencyTable;
use crate::symbol::Symbol;
use crate::table::{CodeEntry, CodeTable, MAX_CODE_LENGTH};
use oxihuff_core::error::{OxiHuffError, Result};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::io::Read;

/// Index of a node in the tree arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena index of this node.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A node of the code tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    /// A branch. Trees built from frequencies always have both children;
    /// trees rebuilt from a scheme may be missing some.
    Internal {
        /// Child reached by a 0 bit.
        left: Option<NodeId>,
        /// Child reached by a 1 bit.
        right: Option<NodeId>,
    },
    /// A terminal node.
    Leaf {
        /// The symbol this leaf decodes to.
        symbol: Symbol,
    },
}

impl Node {
    const EMPTY_BRANCH: Node = Node::Internal {
        left: None,
        right: None,
    };
}

/// Priority queue entry: lowest weight first, then lowest sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct QueueEntry {
    weight: u64,
    seq: u32,
    id: NodeId,
}

/// A binary prefix-code tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl CodeTree {
    /// Create a tree holding only an empty root branch.
    pub fn empty() -> Self {
        Self {
            nodes: vec![Node::EMPTY_BRANCH],
            root: NodeId(0),
        }
    }

    /// Build a Huffman tree from symbol frequencies.
    ///
    /// One leaf is created per nonzero symbol in wire order. The two
    /// lightest nodes are merged until one remains; the first node popped
    /// becomes the left child. Ties are broken by insertion order, so the
    /// result is deterministic.
    ///
    /// A lone leaf (empty input: only the pseudo-EOF) is hung under an
    /// internal root so that every leaf has a code of at least one bit.
    pub fn from_frequencies(freqs: &FrequencyTable) -> Self {
        let mut nodes = Vec::new();
        let mut heap = BinaryHeap::new();
        let mut seq = 0u32;

        for (symbol, weight) in freqs.iter() {
            let id = NodeId(nodes.len());
            nodes.push(Node::Leaf { symbol });
            heap.push(Reverse(QueueEntry { weight, seq, id }));
            seq += 1;
        }

        while heap.len() > 1 {
            let (Some(Reverse(left)), Some(Reverse(right))) = (heap.pop(), heap.pop()) else {
                break;
            };
            let id = NodeId(nodes.len());
            nodes.push(Node::Internal {
                left: Some(left.id),
                right: Some(right.id),
            });
            heap.push(Reverse(QueueEntry {
                weight: left.weight.saturating_add(right.weight),
                seq,
                id,
            }));
            seq += 1;
        }

        let root = match heap.pop() {
            Some(Reverse(top)) if matches!(nodes[top.id.0], Node::Internal { .. }) => top.id,
            top => {
                let id = NodeId(nodes.len());
                nodes.push(Node::Internal {
                    left: top.map(|Reverse(entry)| entry.id),
                    right: None,
                });
                id
            }
        };

        Self { nodes, root }
    }

    /// Root node id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Get a node by id.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Child of `id` reached by `bit` (false = left, true = right).
    ///
    /// Leaves have no children.
    #[inline]
    pub fn child(&self, id: NodeId, bit: bool) -> Option<NodeId> {
        match self.nodes[id.0] {
            Node::Internal { left, right } => {
                if bit {
                    right
                } else {
                    left
                }
            }
            Node::Leaf { .. } => None,
        }
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves.
    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    /// Number of leaves carrying the given symbol.
    pub fn count_leaves(&self, symbol: Symbol) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { symbol: s } if *s == symbol))
            .count()
    }

    /// Derive the code of every leaf reachable from the root.
    ///
    /// Fails with [`OxiHuffError::CodeTooLong`] if a leaf sits deeper than
    /// 64 levels.
    pub fn code_table(&self) -> Result<CodeTable> {
        let mut table = CodeTable::new();
        let mut stack = vec![(self.root, 0u64, 0usize)];

        while let Some((id, code, depth)) = stack.pop() {
            match self.nodes[id.0] {
                Node::Leaf { symbol } => {
                    if depth > MAX_CODE_LENGTH as usize {
                        return Err(OxiHuffError::code_too_long(depth));
                    }
                    table.set(symbol, CodeEntry::new(code, depth as u8));
                }
                Node::Internal { left, right } => {
                    if let Some(right) = right {
                        stack.push((right, (code << 1) | 1, depth + 1));
                    }
                    if let Some(left) = left {
                        stack.push((left, code << 1, depth + 1));
                    }
                }
            }
        }

        Ok(table)
    }

    /// Set the `bit` child of branch `parent` to a new node.
    fn attach(&mut self, parent: NodeId, bit: bool, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        if let Node::Internal { left, right } = &mut self.nodes[parent.0] {
            if bit {
                *right = Some(id);
            } else {
                *left = Some(id);
            }
        }
        id
    }

    /// Place a leaf for `symbol` at the path given by the low `len` bits of
    /// `code`, creating branches on the way as needed.
    ///
    /// Bits `len-1` down to `1` select the branches; bit 0 selects the slot
    /// for the new leaf. Fails with [`OxiHuffError::CorruptScheme`] when the
    /// path runs through an existing leaf or the final slot is taken.
    pub fn insert_code(&mut self, symbol: Symbol, code: u64, len: u8) -> Result<()> {
        let wire = symbol.to_wire();
        if len == 0 || len > MAX_CODE_LENGTH {
            return Err(OxiHuffError::corrupt_scheme(
                wire,
                format!("invalid code length {}", len),
            ));
        }

        let mut cur = self.root;
        for i in (1..len).rev() {
            let bit = (code >> i) & 1 == 1;
            cur = match self.child(cur, bit) {
                Some(next) => match self.nodes[next.0] {
                    Node::Internal { .. } => next,
                    Node::Leaf { symbol: existing } => {
                        return Err(OxiHuffError::corrupt_scheme(
                            wire,
                            format!("code passes through the leaf for {}", existing),
                        ));
                    }
                },
                None => self.attach(cur, bit, Node::EMPTY_BRANCH),
            };
        }

        let bit = code & 1 == 1;
        if let Some(taken) = self.child(cur, bit) {
            let message = match self.nodes[taken.0] {
                Node::Leaf { symbol: existing } => {
                    format!("code already assigned to {}", existing)
                }
                Node::Internal { .. } => "code is a prefix of another code".to_string(),
            };
            return Err(OxiHuffError::corrupt_scheme(wire, message));
        }
        self.attach(cur, bit, Node::Leaf { symbol });
        Ok(())
    }
}

/// Count the frequencies of `reader` and build its Huffman tree.
pub fn build_tree<R: Read>(reader: R) -> Result<CodeTree> {
    let freqs = FrequencyTable::count(reader)?;
    let tree = CodeTree::from_frequencies(&freqs);
    tracing::debug!(
        input_bytes = freqs.total_bytes(),
        distinct = freqs.distinct_bytes(),
        leaves = tree.leaf_count(),
        "built code tree"
    );
    Ok(tree)
}
