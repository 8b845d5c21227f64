//! Code and reverse tables derived from a Huffman tree

use crate::codec::tree::{HuffmanTree, Node, NodeId};
use crate::codec::FrequencyTable;
use crate::CodecError;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// A root-to-leaf path, `0` = left and `1` = right
///
/// The path is packed into the low `len` bits of a `u128`, first step in the
/// most significant position. Huffman depth over a total weight below 2^64
/// stays under 93, well inside the 128 available bits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code {
    bits: u128,
    len: u8,
}

impl Code {
    pub const MAX_LEN: u8 = 128;

    /// The empty path
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns this path extended by one step, or `None` once it is full
    pub fn push(self, bit: bool) -> Option<Self> {
        if self.len >= Self::MAX_LEN {
            return None;
        }
        Some(Self {
            bits: (self.bits << 1) | u128::from(bit),
            len: self.len + 1,
        })
    }

    pub fn len(&self) -> u8 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns step `index` of the path (0 is the step taken at the root)
    pub fn bit(&self, index: u8) -> bool {
        debug_assert!(index < self.len);
        (self.bits >> (self.len - 1 - index)) & 1 == 1
    }

    /// Iterates the steps of the path from the root down
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(move |index| self.bit(index))
    }

    /// Returns true if `self` is a prefix of `other` (every code is a prefix of itself)
    pub fn is_prefix_of(&self, other: &Code) -> bool {
        if self.len == 0 {
            return true;
        }
        self.len <= other.len && other.bits >> (other.len - self.len) == self.bits
    }

    /// Parses a `"0101"` style string
    pub fn parse(text: &str) -> Result<Self, CodecError> {
        let mut code = Self::empty();
        for c in text.chars() {
            let bit = match c {
                '0' => false,
                '1' => true,
                _ => return Err(CodecError::MalformedCode(text.to_string())),
            };
            code = code.push(bit).ok_or(CodecError::CodeTooLong)?;
        }
        if code.is_empty() {
            return Err(CodecError::MalformedCode(text.to_string()));
        }
        Ok(code)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.bits() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

/// Symbol → code mapping of one compression session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeTable {
    codes: BTreeMap<char, Code>,
}

impl CodeTable {
    pub fn get(&self, symbol: char) -> Option<Code> {
        self.codes.get(&symbol).copied()
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (char, Code)> + '_ {
        self.codes.iter().map(|(&symbol, &code)| (symbol, code))
    }

    /// Returns true if no code is a prefix of another
    pub fn is_prefix_free(&self) -> bool {
        let mut rendered: Vec<String> = self.codes.values().map(Code::to_string).collect();
        rendered.sort();
        // In lexicographic order a prefix sorts immediately before some extension of it
        rendered
            .windows(2)
            .all(|pair| !pair[1].starts_with(pair[0].as_str()))
    }

    /// Renders the table as symbol → bit string, the form stored next to payloads
    pub fn to_strings(&self) -> BTreeMap<String, String> {
        self.codes
            .iter()
            .map(|(symbol, code)| (symbol.to_string(), code.to_string()))
            .collect()
    }

    /// Rebuilds a table from [`CodeTable::to_strings`] output
    ///
    /// Every key must be exactly one symbol, every value a non-empty bit
    /// string, and the resulting codes must be prefix-free.
    pub fn from_strings(entries: &BTreeMap<String, String>) -> Result<Self, CodecError> {
        let mut codes = BTreeMap::new();
        for (key, value) in entries {
            let mut chars = key.chars();
            let symbol = match (chars.next(), chars.next()) {
                (Some(symbol), None) => symbol,
                _ => return Err(CodecError::MalformedCode(format!("symbol key '{}'", key))),
            };
            codes.insert(symbol, Code::parse(value)?);
        }

        let table = Self { codes };
        if !table.is_prefix_free() {
            return Err(CodecError::MalformedCode(
                "code table is not prefix-free".to_string(),
            ));
        }
        Ok(table)
    }
}

/// Code → symbol mapping, the inverse of a [`CodeTable`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReverseTable {
    symbols: HashMap<Code, char>,
    max_len: u8,
}

impl ReverseTable {
    pub fn from_codes(codes: &CodeTable) -> Self {
        let symbols: HashMap<Code, char> = codes.iter().map(|(symbol, code)| (code, symbol)).collect();
        let max_len = symbols.keys().map(Code::len).max().unwrap_or(0);
        Self { symbols, max_len }
    }

    pub fn get(&self, code: &Code) -> Option<char> {
        self.symbols.get(code).copied()
    }

    /// Length of the longest code; a longer candidate can never match
    pub fn max_len(&self) -> u8 {
        self.max_len
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// The table pair produced by one compression session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeBook {
    pub codes: CodeTable,
    pub reverse: ReverseTable,
}

impl CodeBook {
    /// Builds the tree for `frequencies` and derives its codes
    pub fn from_frequencies(frequencies: &FrequencyTable) -> Result<Self, CodecError> {
        let tree = HuffmanTree::build(frequencies)?;
        Self::from_tree(&tree)
    }

    /// Walks the tree in pre-order with an explicit stack and records leaf paths
    ///
    /// A tree made of a single leaf gets the one-bit code `0` for its symbol.
    pub fn from_tree(tree: &HuffmanTree) -> Result<Self, CodecError> {
        let mut codes = BTreeMap::new();
        let mut stack: Vec<(NodeId, Code)> = vec![(tree.root(), Code::empty())];

        while let Some((id, path)) = stack.pop() {
            match tree.node(id) {
                Node::Leaf { symbol, .. } => {
                    let code = if path.is_empty() {
                        path.push(false).ok_or(CodecError::CodeTooLong)?
                    } else {
                        path
                    };
                    codes.insert(*symbol, code);
                }
                Node::Internal { left, right, .. } => {
                    let right_path = path.push(true).ok_or(CodecError::CodeTooLong)?;
                    let left_path = path.push(false).ok_or(CodecError::CodeTooLong)?;
                    // Right goes on first so the left subtree is visited first
                    stack.push((*right, right_path));
                    stack.push((*left, left_path));
                }
            }
        }

        Ok(Self::from_code_table(CodeTable { codes }))
    }

    pub fn from_code_table(codes: CodeTable) -> Self {
        let reverse = ReverseTable::from_codes(&codes);
        Self { codes, reverse }
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
