//! Huffman tree construction over an index-based node arena

use crate::codec::FrequencyTable;
use crate::CodecError;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Handle to a node inside a [`HuffmanTree`] arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// A node of the Huffman tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A symbol and its occurrence count
    Leaf { symbol: char, weight: u64 },

    /// Merge of two subtrees; `left` is the lighter (or earlier) one
    Internal {
        weight: u64,
        left: NodeId,
        right: NodeId,
    },
}

impl Node {
    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }
}

/// A Huffman tree stored as a flat arena
///
/// Leaves occupy the first slots in ascending code-point order, merged nodes
/// are appended as they are created. The arena index doubles as the
/// tie-break sequence number: when two candidates have the same weight the
/// one with the lower index is extracted first, so a given frequency table
/// always yields the same tree.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl HuffmanTree {
    /// Builds the tree by repeatedly merging the two lightest nodes
    ///
    /// # Returns
    ///
    /// * `Ok(HuffmanTree)` - The finished tree; a single-symbol alphabet gives a lone leaf
    /// * `Err(CodecError::EmptyAlphabet)` - The frequency table has no symbols
    pub fn build(frequencies: &FrequencyTable) -> Result<Self, CodecError> {
        if frequencies.is_empty() {
            return Err(CodecError::EmptyAlphabet);
        }

        let mut nodes = Vec::with_capacity(frequencies.len() * 2 - 1);
        let mut heap = BinaryHeap::with_capacity(frequencies.len());

        for (symbol, weight) in frequencies.iter() {
            heap.push(Reverse((weight, nodes.len())));
            nodes.push(Node::Leaf { symbol, weight });
        }

        loop {
            let Some(Reverse((left_weight, left))) = heap.pop() else {
                return Err(CodecError::EmptyAlphabet);
            };

            let Some(Reverse((right_weight, right))) = heap.pop() else {
                return Ok(Self {
                    nodes,
                    root: NodeId(left),
                });
            };

            let weight = left_weight + right_weight;
            heap.push(Reverse((weight, nodes.len())));
            nodes.push(Node::Internal {
                weight,
                left: NodeId(left),
                right: NodeId(right),
            });
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Total number of nodes (leaves and internal)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_leaf()).count()
    }
}
